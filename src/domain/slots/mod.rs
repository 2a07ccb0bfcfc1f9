//! Slot extraction - normalizes free-text answers into structured values.
//!
//! All extractors are total, deterministic and case-insensitive.

mod budget;
mod need;

pub use budget::{extract_budget, Budget, Comparator, DEFAULT_BUDGET, OPEN_CEILING_WON};
pub use need::{extract_data_need, extract_voice_need, NeedLevel};
