//! Subscriber usage snapshot and its derived summary.

use serde::{Deserialize, Serialize};

use super::price::{normalize_price, PriceError, RawPrice};

/// Current-month usage of a subscriber's line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserUsage {
    pub plan_name: String,
    pub plan_price: u32,
    pub remaining_data_mb: u64,
    pub remaining_voice_min: u32,
    pub remaining_sms_count: u32,
    /// Share of the data allowance already consumed, 0–100.
    pub usage_percent: f32,
}

/// Usage as read from a catalog source, before price normalization.
#[derive(Debug, Clone, Deserialize)]
pub struct RawUserUsage {
    pub plan_name: String,
    pub plan_price: RawPrice,
    #[serde(default)]
    pub remaining_data_mb: u64,
    #[serde(default)]
    pub remaining_voice_min: u32,
    #[serde(default)]
    pub remaining_sms_count: u32,
    #[serde(default)]
    pub usage_percent: f32,
}

impl TryFrom<RawUserUsage> for UserUsage {
    type Error = PriceError;

    fn try_from(raw: RawUserUsage) -> Result<Self, Self::Error> {
        Ok(Self {
            plan_price: normalize_price(&raw.plan_price)?,
            plan_name: raw.plan_name,
            remaining_data_mb: raw.remaining_data_mb,
            remaining_voice_min: raw.remaining_voice_min,
            remaining_sms_count: raw.remaining_sms_count,
            usage_percent: raw.usage_percent.clamp(0.0, 100.0),
        })
    }
}

/// How close a resource is to running out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UsagePressure {
    Relaxed,
    Moderate,
    Tight,
}

/// Derived view of a usage snapshot used by the usage one-shots.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UsageSummary {
    pub data: UsagePressure,
    pub voice: UsagePressure,
    pub sms: UsagePressure,
    /// True when the line would be better served by a larger plan.
    pub suggests_upgrade: bool,
    /// True when most of the allowance goes unused.
    pub suggests_downgrade: bool,
}

impl UserUsage {
    /// Summarizes resource pressure for explanation and plan ranking.
    pub fn summarize(&self) -> UsageSummary {
        let data = match self.usage_percent {
            p if p >= 80.0 => UsagePressure::Tight,
            p if p >= 40.0 => UsagePressure::Moderate,
            _ => UsagePressure::Relaxed,
        };
        let voice = match self.remaining_voice_min {
            0..=30 => UsagePressure::Tight,
            31..=120 => UsagePressure::Moderate,
            _ => UsagePressure::Relaxed,
        };
        let sms = match self.remaining_sms_count {
            0..=10 => UsagePressure::Tight,
            11..=50 => UsagePressure::Moderate,
            _ => UsagePressure::Relaxed,
        };

        UsageSummary {
            suggests_upgrade: data == UsagePressure::Tight,
            suggests_downgrade: data == UsagePressure::Relaxed && self.usage_percent < 20.0,
            data,
            voice,
            sms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usage(percent: f32, voice: u32) -> UserUsage {
        UserUsage {
            plan_name: "5G 스탠다드".to_string(),
            plan_price: 75_000,
            remaining_data_mb: 2_048,
            remaining_voice_min: voice,
            remaining_sms_count: 200,
            usage_percent: percent,
        }
    }

    #[test]
    fn heavy_data_use_suggests_upgrade() {
        let summary = usage(92.0, 500).summarize();
        assert_eq!(summary.data, UsagePressure::Tight);
        assert!(summary.suggests_upgrade);
        assert!(!summary.suggests_downgrade);
    }

    #[test]
    fn light_data_use_suggests_downgrade() {
        let summary = usage(10.0, 500).summarize();
        assert_eq!(summary.data, UsagePressure::Relaxed);
        assert!(summary.suggests_downgrade);
    }

    #[test]
    fn low_remaining_voice_is_tight() {
        assert_eq!(usage(50.0, 12).summarize().voice, UsagePressure::Tight);
    }

    #[test]
    fn raw_usage_clamps_percent_and_normalizes_price() {
        let raw = RawUserUsage {
            plan_name: "LTE 데이터 33".to_string(),
            plan_price: RawPrice::Text("33,000원".to_string()),
            remaining_data_mb: 0,
            remaining_voice_min: 0,
            remaining_sms_count: 0,
            usage_percent: 130.0,
        };
        let usage = UserUsage::try_from(raw).unwrap();
        assert_eq!(usage.plan_price, 33_000);
        assert_eq!(usage.usage_percent, 100.0);
    }
}
