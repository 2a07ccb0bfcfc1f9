//! Structured card payloads and the prose consistency check.

use crate::domain::catalog::Plan;
use crate::domain::session::RecommendationKind;

use super::subscription_matcher::SubscriptionPick;

/// Items placed on a recommendation card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecommendationCard {
    Plans(Vec<Plan>),
    Subscriptions(SubscriptionPick),
}

impl RecommendationCard {
    /// Card schema this payload belongs to.
    pub fn kind(&self) -> RecommendationKind {
        match self {
            Self::Plans(_) => RecommendationKind::Plan,
            Self::Subscriptions(_) => RecommendationKind::Subscription,
        }
    }
}

/// What a model reply talks about, judged by keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProseKind {
    Plan,
    Subscription,
    Mixed,
    Neutral,
}

impl ProseKind {
    /// Returns true when the prose is about the other card kind only.
    pub fn contradicts(&self, kind: RecommendationKind) -> bool {
        matches!(
            (self, kind),
            (Self::Plan, RecommendationKind::Subscription)
                | (Self::Subscription, RecommendationKind::Plan)
        )
    }
}

const PLAN_TERMS: [&str; 6] = ["요금제", "데이터", "통화", "gb", "기가", "plan"];
const SUBSCRIPTION_TERMS: [&str; 6] = ["구독", "ott", "스트리밍", "브랜드", "쿠폰", "subscription"];

/// Classifies a buffered model reply.
pub fn prose_kind(reply: &str) -> ProseKind {
    let lowered = reply.to_lowercase();
    let plan = PLAN_TERMS.iter().any(|t| lowered.contains(t));
    let subscription = SUBSCRIPTION_TERMS.iter().any(|t| lowered.contains(t));
    match (plan, subscription) {
        (true, true) => ProseKind::Mixed,
        (true, false) => ProseKind::Plan,
        (false, true) => ProseKind::Subscription,
        (false, false) => ProseKind::Neutral,
    }
}
