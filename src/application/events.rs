//! Response envelope events.
//!
//! Every chat response is a sequence of these, serialized as one JSON
//! object each with a `type` field. A sequence always ends with exactly
//! one `message_end` or `error`.

use serde::Serialize;

use crate::domain::catalog::{Brand, Plan, Subscription, UsageSummary, UserUsage};
use crate::domain::recommendation::{RecommendationCard, SubscriptionPick};

/// One event of a chat response.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatEvent {
    PlanRecommendations {
        plans: Vec<Plan>,
    },
    /// Chat responses carry `subscriptions` and `life_brand`; likes
    /// responses carry `data`.
    SubscriptionRecommendations {
        #[serde(skip_serializing_if = "Option::is_none")]
        subscriptions: Option<Vec<Subscription>>,
        #[serde(skip_serializing_if = "Option::is_none")]
        life_brand: Option<Brand>,
        #[serde(skip_serializing_if = "Option::is_none")]
        data: Option<SubscriptionPick>,
    },
    UsageAnalysis {
        usage: UserUsage,
        summary: UsageSummary,
    },
    MessageStart,
    MessageChunk {
        content: String,
    },
    MessageEnd,
    Error {
        message: String,
    },
}

impl ChatEvent {
    /// Card event for the chat path.
    pub fn card(card: RecommendationCard) -> Self {
        match card {
            RecommendationCard::Plans(plans) => Self::PlanRecommendations { plans },
            RecommendationCard::Subscriptions(pick) => Self::SubscriptionRecommendations {
                subscriptions: Some(vec![pick.main_subscription]),
                life_brand: pick.life_brand,
                data: None,
            },
        }
    }

    /// Card event for the likes path.
    pub fn likes_card(pick: SubscriptionPick) -> Self {
        Self::SubscriptionRecommendations {
            subscriptions: None,
            life_brand: None,
            data: Some(pick),
        }
    }

    pub fn chunk(content: impl Into<String>) -> Self {
        Self::MessageChunk {
            content: content.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    /// Returns true for `message_end` and `error`.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::MessageEnd | Self::Error { .. })
    }

    /// Returns true for card events.
    pub fn is_card(&self) -> bool {
        matches!(
            self,
            Self::PlanRecommendations { .. } | Self::SubscriptionRecommendations { .. }
        )
    }
}
