//! Plan scoring.
//!
//! Each plan gets up to 60 points for budget fit, 25 for data match, 10
//! for voice match and 15 for family popularity. The sum is capped at 100.
//! Ties are broken by ascending price.

use std::collections::BTreeMap;

use crate::domain::catalog::{DataTier, Plan, VoiceTier};
use crate::domain::slots::{extract_budget, extract_data_need, extract_voice_need, Budget, Comparator, NeedLevel};

/// Number of plans placed on a card.
pub const TOP_PLANS: usize = 2;

const MAX_SCORE: u32 = 100;

/// Family name fragments and their popularity bonus.
const POPULARITY: [(&str, u32); 9] = [
    ("프리미어", 15),
    ("시그니처", 12),
    ("스탠다드", 12),
    ("레귤러", 10),
    ("심플", 10),
    ("라이트", 8),
    ("슬림", 8),
    ("다이렉트", 6),
    ("미니", 5),
];

const STREAMING_SERVICES: [&str; 8] = [
    "유튜브", "넷플릭스", "티빙", "디즈니", "웨이브", "왓챠", "youtube", "netflix",
];

/// Normalized plan preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanPreferences {
    pub budget: Budget,
    pub data_need: NeedLevel,
    pub voice_need: NeedLevel,
}

impl PlanPreferences {
    /// Reads preferences from plan-flow slots. Missing slots use defaults.
    ///
    /// Video streaming in the services answer raises a low data need to
    /// medium.
    pub fn from_slots(slots: &BTreeMap<String, String>) -> Self {
        let slot = |name: &str| slots.get(name).map(String::as_str).unwrap_or_default();

        let mut data_need = extract_data_need(slot("data_usage"));
        let services = slot("services").to_lowercase();
        if data_need == NeedLevel::Low && STREAMING_SERVICES.iter().any(|s| services.contains(s)) {
            data_need = NeedLevel::Medium;
        }

        Self {
            budget: extract_budget(slot("budget")),
            data_need,
            voice_need: extract_voice_need(slot("call_usage")),
        }
    }
}

/// Per-component score of one plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreBreakdown {
    pub budget: u32,
    pub data: u32,
    pub voice: u32,
    pub popularity: u32,
}

impl ScoreBreakdown {
    /// Capped total.
    pub fn total(&self) -> u32 {
        (self.budget + self.data + self.voice + self.popularity).min(MAX_SCORE)
    }
}

/// Scores one plan against the preferences.
pub fn score_plan(plan: &Plan, prefs: &PlanPreferences) -> ScoreBreakdown {
    ScoreBreakdown {
        budget: budget_fit(plan.monthly_price_won, &prefs.budget),
        data: data_match(prefs.data_need, plan.data_tier()),
        voice: voice_match(prefs.voice_need, plan.voice_tier()),
        popularity: popularity(&plan.name),
    }
}

/// Returns the best `limit` plans, highest score first.
pub fn rank_plans(plans: &[Plan], prefs: &PlanPreferences, limit: usize) -> Vec<Plan> {
    let mut scored: Vec<(u32, &Plan)> = plans
        .iter()
        .map(|plan| (score_plan(plan, prefs).total(), plan))
        .collect();

    scored.sort_by(|(score_a, a), (score_b, b)| {
        score_b
            .cmp(score_a)
            .then(a.monthly_price_won.cmp(&b.monthly_price_won))
            .then(a.id.cmp(&b.id))
    });

    scored
        .into_iter()
        .take(limit)
        .map(|(_, plan)| plan.clone())
        .collect()
}

fn budget_fit(price: u32, budget: &Budget) -> u32 {
    let price_f = f64::from(price);
    match budget.comparator {
        Comparator::AtLeast(floor) => {
            if price < floor {
                return 10;
            }
            let ratio = price_f / f64::from(floor.max(1));
            match ratio {
                r if r <= 1.6 => 60,
                r if r <= 2.0 => 40,
                _ => 20,
            }
        }
        Comparator::AtMost(ceiling) => {
            if price > ceiling {
                return 5;
            }
            let ratio = price_f / f64::from(ceiling.max(1));
            match ratio {
                r if r >= 0.7 => 60,
                r if r >= 0.5 => 50,
                _ => 30,
            }
        }
        Comparator::Around(_) => {
            if budget.contains(price) {
                return 60;
            }
            match gap(price, budget) {
                g if g <= 10_000 => 45,
                g if g <= 20_000 => 25,
                _ => 10,
            }
        }
        Comparator::Unqualified => {
            if budget.contains(price) {
                60
            } else if price < budget.min_won {
                if budget.min_won - price <= 10_000 {
                    40
                } else {
                    20
                }
            } else if price_f / f64::from(budget.max_won.max(1)) <= 1.2 {
                30
            } else {
                10
            }
        }
    }
}

fn gap(price: u32, budget: &Budget) -> u32 {
    if price < budget.min_won {
        budget.min_won - price
    } else {
        price.saturating_sub(budget.max_won)
    }
}

fn data_match(need: NeedLevel, tier: DataTier) -> u32 {
    match (need, tier) {
        (NeedLevel::High, DataTier::Unlimited) => 25,
        (NeedLevel::High, DataTier::High) => 20,
        (NeedLevel::High, DataTier::Medium) => 5,
        (NeedLevel::High, DataTier::Low) => 0,
        (NeedLevel::Medium, DataTier::Medium) => 25,
        (NeedLevel::Medium, DataTier::High) => 20,
        (NeedLevel::Medium, DataTier::Unlimited) => 15,
        (NeedLevel::Medium, DataTier::Low) => 5,
        (NeedLevel::Low, DataTier::Low) => 25,
        (NeedLevel::Low, DataTier::Medium) => 15,
        (NeedLevel::Low, DataTier::High | DataTier::Unlimited) => 5,
    }
}

fn voice_match(need: NeedLevel, tier: VoiceTier) -> u32 {
    match (need, tier) {
        (NeedLevel::High, VoiceTier::Unlimited) => 10,
        (NeedLevel::High, VoiceTier::Minutes(_)) => 3,
        (NeedLevel::Medium, VoiceTier::Unlimited) => 10,
        (NeedLevel::Medium, VoiceTier::Minutes(m)) if m >= 300 => 10,
        (NeedLevel::Medium, VoiceTier::Minutes(_)) => 6,
        (NeedLevel::Low, VoiceTier::Minutes(_)) => 10,
        (NeedLevel::Low, VoiceTier::Unlimited) => 7,
    }
}

fn popularity(name: &str) -> u32 {
    POPULARITY
        .iter()
        .find(|(family, _)| name.contains(family))
        .map(|(_, bonus)| *bonus)
        .unwrap_or(0)
}
