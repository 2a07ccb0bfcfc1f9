//! Intent module - closed intent vocabulary and the rule-based first stage.
//!
//! The model-backed second stage lives in the application layer; this
//! module is pure and never performs I/O.

mod intent;
mod lexicon;
mod rules;

pub use intent::Intent;
pub use rules::{classify_by_rules, RuleDecision};
