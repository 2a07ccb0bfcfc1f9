//! Domain layer containing the dialog kernel's pure logic.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (ids, tone, validation errors)
//! - `catalog` - Plan, subscription, brand and usage records
//! - `intent` - Closed intent set and rule-based classification
//! - `slots` - Budget and need extraction from free text
//! - `session` - Per-session dialog state and its wire form
//! - `flow` - Question lists and step transitions
//! - `recommendation` - Plan scoring and subscription matching
//! - `replies` - Canned replies per tone

pub mod catalog;
pub mod flow;
pub mod foundation;
pub mod intent;
pub mod recommendation;
pub mod replies;
pub mod session;
pub mod slots;
