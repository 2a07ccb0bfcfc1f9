//! Recommendation module - deterministic ranking of catalog items.
//!
//! - `plan_scorer` - weighted plan scoring over collected plan slots
//! - `subscription_matcher` - main subscription plus lifestyle brand pick
//! - `card` - structured card payloads and the prose consistency check

mod card;
mod plan_scorer;
mod subscription_matcher;

pub use card::{prose_kind, ProseKind, RecommendationCard};
pub use plan_scorer::{rank_plans, score_plan, PlanPreferences, ScoreBreakdown, TOP_PLANS};
pub use subscription_matcher::{match_subscription, mentioned_names, SubscriptionPick};
