//! Catalog item records.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::price::{normalize_price, PriceError, RawPrice};

/// A mobile plan with a normalized monthly price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub id: i64,
    pub name: String,
    pub monthly_price_won: u32,
    pub data_allowance_text: String,
    pub voice_allowance_text: String,
    pub sms_allowance_text: String,
    pub speed_tier_text: String,
    pub description: String,
}

/// A plan as read from a catalog source, before price normalization.
#[derive(Debug, Clone, Deserialize)]
pub struct RawPlan {
    pub id: i64,
    pub name: String,
    pub price: RawPrice,
    #[serde(default)]
    pub data: String,
    #[serde(default)]
    pub voice: String,
    #[serde(default)]
    pub sms: String,
    #[serde(default)]
    pub speed: String,
    #[serde(default)]
    pub description: String,
}

impl TryFrom<RawPlan> for Plan {
    type Error = PriceError;

    fn try_from(raw: RawPlan) -> Result<Self, Self::Error> {
        Ok(Self {
            id: raw.id,
            monthly_price_won: normalize_price(&raw.price)?,
            name: raw.name,
            data_allowance_text: raw.data,
            voice_allowance_text: raw.voice,
            sms_allowance_text: raw.sms,
            speed_tier_text: raw.speed,
            description: raw.description,
        })
    }
}

/// Data allowance class of a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DataTier {
    /// 3GB or less.
    Low,
    /// Between 3GB and 10GB.
    Medium,
    /// 10GB or more.
    High,
    /// No cap (throttled speed after the allowance is fine).
    Unlimited,
}

/// Voice allowance class of a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VoiceTier {
    Minutes(u32),
    Unlimited,
}

static GIGABYTES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*(gb|기가)").expect("valid regex"));

static MEGABYTES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*mb").expect("valid regex"));

static MINUTES: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)\s*분").expect("valid regex"));

impl Plan {
    /// Monthly data allowance in GB, `None` when unlimited or unreadable.
    pub fn data_allowance_gb(&self) -> Option<f64> {
        let text = &self.data_allowance_text;
        if let Some(caps) = GIGABYTES.captures(text) {
            return caps[1].parse().ok();
        }
        MEGABYTES
            .captures(text)
            .and_then(|caps| caps[1].parse::<f64>().ok())
            .map(|mb| mb / 1024.0)
    }

    /// Classifies the data allowance.
    pub fn data_tier(&self) -> DataTier {
        let lower = self.data_allowance_text.to_lowercase();
        if lower.contains("무제한") || lower.contains("unlimited") {
            return DataTier::Unlimited;
        }
        match self.data_allowance_gb() {
            Some(gb) if gb >= 10.0 => DataTier::High,
            Some(gb) if gb > 3.0 => DataTier::Medium,
            Some(_) => DataTier::Low,
            None => DataTier::Low,
        }
    }

    /// Classifies the voice allowance.
    pub fn voice_tier(&self) -> VoiceTier {
        let text = &self.voice_allowance_text;
        if text.contains("무제한") || text.contains("기본제공") || text.contains("무료") {
            return VoiceTier::Unlimited;
        }
        let minutes = MINUTES
            .captures(text)
            .and_then(|caps| caps[1].parse().ok())
            .unwrap_or(0);
        VoiceTier::Minutes(minutes)
    }
}

/// A content subscription product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: i64,
    pub title: String,
    pub category: String,
    pub monthly_price_won: u32,
    pub image: String,
}

/// A subscription as read from a catalog source, before price normalization.
#[derive(Debug, Clone, Deserialize)]
pub struct RawSubscription {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub category: String,
    pub price: RawPrice,
    #[serde(default)]
    pub image: String,
}

impl TryFrom<RawSubscription> for Subscription {
    type Error = PriceError;

    fn try_from(raw: RawSubscription) -> Result<Self, Self::Error> {
        Ok(Self {
            id: raw.id,
            monthly_price_won: normalize_price(&raw.price)?,
            title: raw.title,
            category: raw.category,
            image: raw.image,
        })
    }
}

/// A lifestyle brand offering coupons.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Brand {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub image: String,
}
