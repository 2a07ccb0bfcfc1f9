//! Data and voice need extraction.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Normalized usage need level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NeedLevel {
    Low,
    #[default]
    Medium,
    High,
}

const HIGH_DATA_KEYWORDS: [&str; 11] = [
    "무제한", "많이", "많아", "많은", "대용량", "넉넉", "엄청", "하루종일", "unlimited", "lots", "heavy",
];
const LOW_DATA_KEYWORDS: [&str; 9] = [
    "적게", "조금", "거의 안", "별로 안", "기본", "와이파이", "little", "basic", "light",
];

static GIGABYTES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+(?:\.\d+)?)\s*(gb|기가)").expect("valid regex"));

/// Extracts the data need from a free-text answer.
///
/// Keywords win over numbers; a bare "NGB" then maps ≥10 to high and ≤3 to low.
pub fn extract_data_need(text: &str) -> NeedLevel {
    let lowered = text.to_lowercase();

    if HIGH_DATA_KEYWORDS.iter().any(|k| lowered.contains(k)) {
        return NeedLevel::High;
    }
    if LOW_DATA_KEYWORDS.iter().any(|k| lowered.contains(k)) {
        return NeedLevel::Low;
    }

    if let Some(gb) = GIGABYTES
        .captures(&lowered)
        .and_then(|caps| caps[1].parse::<f64>().ok())
    {
        return if gb >= 10.0 {
            NeedLevel::High
        } else if gb <= 3.0 {
            NeedLevel::Low
        } else {
            NeedLevel::Medium
        };
    }

    NeedLevel::Medium
}

const HIGH_VOICE_KEYWORDS: [&str; 6] = ["많이", "자주", "무제한", "하루종일", "업무", "lots"];
const LOW_VOICE_KEYWORDS: [&str; 7] = ["거의 안", "별로 안", "안 해", "안해", "적게", "조금", "little"];

/// Extracts the voice need from a free-text answer.
pub fn extract_voice_need(text: &str) -> NeedLevel {
    let lowered = text.to_lowercase();

    if LOW_VOICE_KEYWORDS.iter().any(|k| lowered.contains(k)) {
        return NeedLevel::Low;
    }
    if HIGH_VOICE_KEYWORDS.iter().any(|k| lowered.contains(k)) {
        return NeedLevel::High;
    }
    NeedLevel::Medium
}

#[cfg(test)]
mod tests {
    use super::*;

    mod data_need {
        use super::*;

        #[test]
        fn unlimited_is_high() {
            assert_eq!(extract_data_need("무제한"), NeedLevel::High);
            assert_eq!(extract_data_need("Unlimited please"), NeedLevel::High);
        }

        #[test]
        fn basic_is_low() {
            assert_eq!(extract_data_need("조금 써요"), NeedLevel::Low);
            assert_eq!(extract_data_need("BASIC"), NeedLevel::Low);
        }

        #[test]
        fn gigabyte_thresholds() {
            assert_eq!(extract_data_need("한 달에 15GB"), NeedLevel::High);
            assert_eq!(extract_data_need("10기가"), NeedLevel::High);
            assert_eq!(extract_data_need("2gb"), NeedLevel::Low);
            assert_eq!(extract_data_need("3GB"), NeedLevel::Low);
            assert_eq!(extract_data_need("6GB"), NeedLevel::Medium);
        }

        #[test]
        fn keywords_take_priority_over_numbers() {
            assert_eq!(extract_data_need("2GB인데 넉넉하게"), NeedLevel::High);
        }

        #[test]
        fn unknown_defaults_to_medium() {
            assert_eq!(extract_data_need("보통"), NeedLevel::Medium);
            assert_eq!(extract_data_need(""), NeedLevel::Medium);
        }
    }

    mod voice_need {
        use super::*;

        #[test]
        fn frequent_calls_are_high() {
            assert_eq!(extract_voice_need("많이 해요"), NeedLevel::High);
        }

        #[test]
        fn rare_calls_are_low() {
            assert_eq!(extract_voice_need("거의 안 해요"), NeedLevel::Low);
        }

        #[test]
        fn neutral_is_medium() {
            assert_eq!(extract_voice_need("보통"), NeedLevel::Medium);
        }
    }
}
