//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers, the presentation tone, and the error types
//! that form the vocabulary of the recommendation domain.

mod errors;
mod ids;
mod tone;

pub use errors::ValidationError;
pub use ids::{SessionId, UserId, MAX_SESSION_ID_LENGTH};
pub use tone::Tone;
