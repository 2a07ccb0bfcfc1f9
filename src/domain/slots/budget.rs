//! Budget extraction from free-text answers.
//!
//! Numeric forms are tried first, in order: range ("3-5만원"), compound
//! ("4만5천원"), "N만원", then plain Won ("45000원"). A qualifier suffix
//! after the amount decides the comparator. Without any number, keyword
//! triage applies; otherwise the default window is returned.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Upper bound used for open-ended "at least" budgets.
pub const OPEN_CEILING_WON: u32 = 200_000;

/// Window used when nothing in the answer describes a budget.
pub const DEFAULT_BUDGET: (u32, u32) = (0, 100_000);

const BARE_BELOW_WON: u32 = 5_000;
const BARE_ABOVE_WON: u32 = 10_000;
const AROUND_SLACK_WON: u32 = 5_000;

/// Qualifier attached to an extracted budget amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "won", rename_all = "snake_case")]
pub enum Comparator {
    AtLeast(u32),
    AtMost(u32),
    Around(u32),
    /// Bare amount, range, keyword or default window.
    Unqualified,
}

/// Normalized budget window in Won.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budget {
    pub min_won: u32,
    pub max_won: u32,
    pub comparator: Comparator,
}

impl Budget {
    fn window(min_won: u32, max_won: u32) -> Self {
        Self {
            min_won: min_won.min(max_won),
            max_won: max_won.max(min_won),
            comparator: Comparator::Unqualified,
        }
    }

    /// Returns true when the price sits inside the window.
    pub fn contains(&self, price_won: u32) -> bool {
        (self.min_won..=self.max_won).contains(&price_won)
    }
}

impl Default for Budget {
    fn default() -> Self {
        Self::window(DEFAULT_BUDGET.0, DEFAULT_BUDGET.1)
    }
}

static KOREAN_NUMERAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([일이삼사오육칠팔구십])\s*(만|천)").expect("valid regex"));

static RANGE_MAN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d+(?:\.\d+)?)\s*(?:만\s*원?)?\s*[-~～]\s*(\d+(?:\.\d+)?)\s*만\s*원?")
        .expect("valid regex")
});

static COMPOUND_MAN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)\s*만\s*(\d)\s*천\s*원?").expect("valid regex"));

static MAN_WON: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+(?:\.\d+)?)\s*만\s*원?(대)?").expect("valid regex"));

static PLAIN_WON: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{4,7})\s*원?").expect("valid regex"));

const NEGATED_EXCEED_MARKERS: [&str; 4] = ["안 넘", "안넘", "넘지 않", "넘지않"];
const AT_LEAST_MARKERS: [&str; 4] = ["이상", "넘", "초과", "부터"];
const AT_MOST_MARKERS: [&str; 6] = ["이하", "미만", "까지", "안쪽", "이내", "내로"];
const AROUND_MARKERS: [&str; 6] = ["정도", "쯤", "근처", "내외", "안팎", "대략"];

const CHEAP_KEYWORDS: [&str; 9] = [
    "저렴", "싼 거", "싼거", "싸게", "저가", "가성비", "알뜰", "cheap", "budget",
];
const PREMIUM_KEYWORDS: [&str; 5] = ["프리미엄", "비싼", "고급", "premium", "expensive"];
const MODERATE_KEYWORDS: [&str; 5] = ["적당", "중간", "무난", "평균", "moderate"];

/// Extracts a budget window from a free-text answer.
pub fn extract_budget(text: &str) -> Budget {
    let lowered = text.to_lowercase();
    let normalized = substitute_numerals(&lowered);

    if let Some(budget) = numeric_budget(&normalized) {
        return budget;
    }

    if CHEAP_KEYWORDS.iter().any(|k| normalized.contains(k)) {
        return Budget::window(0, 35_000);
    }
    if PREMIUM_KEYWORDS.iter().any(|k| normalized.contains(k)) {
        return Budget::window(50_000, OPEN_CEILING_WON);
    }
    if MODERATE_KEYWORDS.iter().any(|k| normalized.contains(k)) {
        return Budget::window(30_000, 50_000);
    }

    Budget::default()
}

/// Replaces a Korean numeral directly preceding a unit with its digit,
/// so "오만원" reads as "5만원" while "이하" stays intact.
fn substitute_numerals(text: &str) -> String {
    KOREAN_NUMERAL
        .replace_all(text, |caps: &regex::Captures<'_>| {
            let digit = match &caps[1] {
                "일" => "1",
                "이" => "2",
                "삼" => "3",
                "사" => "4",
                "오" => "5",
                "육" => "6",
                "칠" => "7",
                "팔" => "8",
                "구" => "9",
                _ => "10",
            };
            format!("{}{}", digit, &caps[2])
        })
        .into_owned()
}

fn man_to_won(value: &str) -> Option<u32> {
    let man: f64 = value.parse().ok()?;
    Some((man * 10_000.0).round() as u32)
}

fn numeric_budget(text: &str) -> Option<Budget> {
    if let Some(caps) = RANGE_MAN.captures(text) {
        let low = man_to_won(&caps[1])?;
        let high = man_to_won(&caps[2])?;
        return Some(Budget::window(low, high));
    }

    let (amount, rest, decade) = if let Some(caps) = COMPOUND_MAN.captures(text) {
        let man: u32 = caps[1].parse().ok()?;
        let thousand: u32 = caps[2].parse().ok()?;
        let end = caps.get(0)?.end();
        (
            man.saturating_mul(10_000).saturating_add(thousand * 1_000),
            &text[end..],
            false,
        )
    } else if let Some(caps) = MAN_WON.captures(text) {
        let end = caps.get(0)?.end();
        (man_to_won(&caps[1])?, &text[end..], caps.get(2).is_some())
    } else if let Some(caps) = PLAIN_WON.captures(text) {
        let end = caps.get(0)?.end();
        (caps[1].parse().ok()?, &text[end..], false)
    } else {
        return None;
    };

    Some(qualify(amount, rest, decade))
}

fn qualify(amount: u32, rest: &str, decade: bool) -> Budget {
    let negated_exceed = NEGATED_EXCEED_MARKERS.iter().any(|m| rest.contains(m));
    if !negated_exceed && AT_LEAST_MARKERS.iter().any(|m| rest.contains(m)) {
        return Budget {
            min_won: amount,
            max_won: OPEN_CEILING_WON.max(amount),
            comparator: Comparator::AtLeast(amount),
        };
    }
    if negated_exceed || AT_MOST_MARKERS.iter().any(|m| rest.contains(m)) {
        return Budget {
            min_won: 0,
            max_won: amount,
            comparator: Comparator::AtMost(amount),
        };
    }
    if AROUND_MARKERS.iter().any(|m| rest.contains(m)) {
        return Budget {
            min_won: amount.saturating_sub(AROUND_SLACK_WON),
            max_won: amount.saturating_add(AROUND_SLACK_WON),
            comparator: Comparator::Around(amount),
        };
    }
    if decade {
        return Budget::window(amount, amount.saturating_add(9_999));
    }
    Budget::window(
        amount.saturating_sub(BARE_BELOW_WON),
        amount.saturating_add(BARE_ABOVE_WON),
    )
}
