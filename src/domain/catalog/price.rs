//! Price normalization boundary.
//!
//! Catalog sources deliver prices either as integer Won or as decorated
//! strings ("55,000원", "5.5만원", "월 33,000"). They are converted here,
//! once, on read.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A price as delivered by a catalog source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawPrice {
    Won(i64),
    Text(String),
}

impl From<i64> for RawPrice {
    fn from(value: i64) -> Self {
        Self::Won(value)
    }
}

impl From<&str> for RawPrice {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// Errors produced when a catalog price cannot be read.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PriceError {
    #[error("negative price: {0}")]
    Negative(i64),

    #[error("price out of range: {0}")]
    OutOfRange(i64),

    #[error("unreadable price text: {0:?}")]
    Unreadable(String),
}

static MAN_UNIT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+(?:\.\d+)?)\s*만(?:\s*(\d+)\s*천)?").expect("valid regex"));

static DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").expect("valid regex"));

/// Normalizes a raw catalog price into whole Won.
pub fn normalize_price(raw: &RawPrice) -> Result<u32, PriceError> {
    match raw {
        RawPrice::Won(value) => {
            if *value < 0 {
                return Err(PriceError::Negative(*value));
            }
            u32::try_from(*value).map_err(|_| PriceError::OutOfRange(*value))
        }
        RawPrice::Text(text) => parse_price_text(text),
    }
}

fn parse_price_text(text: &str) -> Result<u32, PriceError> {
    let cleaned: String = text.chars().filter(|c| *c != ',').collect();

    if let Some(caps) = MAN_UNIT.captures(&cleaned) {
        let man: f64 = caps[1]
            .parse()
            .map_err(|_| PriceError::Unreadable(text.to_string()))?;
        let thousands: f64 = caps
            .get(2)
            .and_then(|m| m.as_str().parse().ok())
            .unwrap_or(0.0);
        let won = man * 10_000.0 + thousands * 1_000.0;
        return Ok(won.round() as u32);
    }

    let digits = DIGITS
        .find(&cleaned)
        .ok_or_else(|| PriceError::Unreadable(text.to_string()))?;
    let value: i64 = digits
        .as_str()
        .parse()
        .map_err(|_| PriceError::Unreadable(text.to_string()))?;
    u32::try_from(value).map_err(|_| PriceError::OutOfRange(value))
}
