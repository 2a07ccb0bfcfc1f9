//! Session module - per-session dialog state and its wire form.
//!
//! The record is the unit persisted by the session repository. It carries
//! only the fields the flow controller needs; everything else is stripped
//! on write.

mod record;
mod wire;

pub use record::{FlowTag, RecommendationKind, SessionRecord, Turn, DEFAULT_HISTORY_PAIRS};
pub use wire::{decode, encode, Decoded};
