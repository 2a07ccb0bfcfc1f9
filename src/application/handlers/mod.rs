//! Application handlers.
//!
//! One-shot handlers dispatched by the flow controller for intents that
//! answer in a single turn.

mod likes;
mod usage;

pub use likes::LikesHandler;
pub use usage::{preferences_from_usage, UsageHandler, UsageReport};
