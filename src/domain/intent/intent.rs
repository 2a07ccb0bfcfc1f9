//! The closed set of intents an utterance can be classified into.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::session::FlowTag;

/// Intent tag assigned to one user utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Greeting,
    PlanRequest,
    SubscriptionRequest,
    UsageBasedRecommendation,
    LikesBasedRecommendation,
    CurrentUsage,
    PersonalityQuiz,
    TechIssue,
    OffTopicInteresting,
    OffTopicBoring,
    OffTopicUnclear,
    Nonsense,
    MultiturnAnswer,
}

impl Intent {
    /// Every intent, in declaration order.
    pub const ALL: [Intent; 13] = [
        Intent::Greeting,
        Intent::PlanRequest,
        Intent::SubscriptionRequest,
        Intent::UsageBasedRecommendation,
        Intent::LikesBasedRecommendation,
        Intent::CurrentUsage,
        Intent::PersonalityQuiz,
        Intent::TechIssue,
        Intent::OffTopicInteresting,
        Intent::OffTopicBoring,
        Intent::OffTopicUnclear,
        Intent::Nonsense,
        Intent::MultiturnAnswer,
    ];

    /// Wire tag of this intent.
    pub fn as_tag(&self) -> &'static str {
        match self {
            Self::Greeting => "greeting",
            Self::PlanRequest => "plan_request",
            Self::SubscriptionRequest => "subscription_request",
            Self::UsageBasedRecommendation => "usage_based_recommendation",
            Self::LikesBasedRecommendation => "likes_based_recommendation",
            Self::CurrentUsage => "current_usage",
            Self::PersonalityQuiz => "personality_quiz",
            Self::TechIssue => "tech_issue",
            Self::OffTopicInteresting => "off_topic_interesting",
            Self::OffTopicBoring => "off_topic_boring",
            Self::OffTopicUnclear => "off_topic_unclear",
            Self::Nonsense => "nonsense",
            Self::MultiturnAnswer => "multiturn_answer",
        }
    }

    /// Parses an exact wire tag.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|intent| intent.as_tag() == tag)
    }

    /// Reads a tag out of free-form model output.
    ///
    /// Accepts surrounding whitespace, quotes, backticks and a trailing
    /// period; anything else is rejected so no free-form text escapes.
    pub fn from_model_output(output: &str) -> Option<Self> {
        let cleaned = output
            .trim()
            .trim_matches(|c: char| c == '"' || c == '\'' || c == '`' || c == '.')
            .trim()
            .to_lowercase();
        Self::from_tag(&cleaned)
    }

    /// The question flow this intent starts, if any.
    pub fn flow(&self) -> Option<FlowTag> {
        match self {
            Self::PlanRequest => Some(FlowTag::Plan),
            Self::SubscriptionRequest => Some(FlowTag::Subscription),
            Self::PersonalityQuiz => Some(FlowTag::Personality),
            _ => None,
        }
    }

    /// Returns true for intents that start a question flow.
    pub fn starts_flow(&self) -> bool {
        self.flow().is_some()
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}
