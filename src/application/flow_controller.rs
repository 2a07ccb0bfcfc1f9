//! Flow controller - per-session state machine over question flows.
//!
//! | From            | Event                  | To      | Action                        |
//! |-----------------|------------------------|---------|-------------------------------|
//! | idle            | flow-starting intent   | step 1  | ask Q1                        |
//! | idle            | other intent           | idle    | canned reply or one-shot      |
//! | step k < N      | any utterance          | step k+1| store answer, ask Q(k+1)      |
//! | step N          | any utterance          | idle    | store answer, recommend       |
//! | step > N        | any utterance          | idle    | reclassify and reprocess      |
//!
//! The controller only mutates the record; persisting it is up to the caller.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::domain::catalog::{Brand, Subscription};
use crate::domain::flow::{advance, finish, question, Transition};
use crate::domain::foundation::{Tone, UserId};
use crate::domain::intent::Intent;
use crate::domain::recommendation::{
    match_subscription, rank_plans, PlanPreferences, RecommendationCard, SubscriptionPick,
    TOP_PLANS,
};
use crate::domain::replies::CannedReply;
use crate::domain::session::{FlowTag, RecommendationKind, SessionRecord};
use crate::ports::{CatalogError, CatalogReader, CompletionRequest, RequestMetadata};

use super::events::ChatEvent;
use super::handlers::{LikesHandler, UsageHandler};
use super::intent_classifier::IntentClassifier;
use super::prompts;

/// Errors raised while handling a turn.
#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    #[error("catalog failure: {0}")]
    Catalog(#[from] CatalogError),

    #[error("{flow:?} flow has no question {step}")]
    MissingQuestion { flow: FlowTag, step: u8 },
}

/// One user turn as seen by the controller.
#[derive(Debug, Clone)]
pub struct TurnInput<'a> {
    pub utterance: &'a str,
    pub tone: Tone,
    pub user_id: Option<&'a UserId>,
    pub metadata: RequestMetadata,
}

/// A card whose final content may depend on the model's prose.
#[derive(Debug, Clone, PartialEq)]
pub enum PendingCard {
    /// Card fixed before the prose is written.
    Ready(RecommendationCard),
    /// Subscription card matched against the user's answers and the prose.
    MatchReply {
        user_texts: Vec<String>,
        subscriptions: Vec<Subscription>,
        brands: Vec<Brand>,
    },
    /// Likes-path card.
    Likes(SubscriptionPick),
}

impl PendingCard {
    pub fn kind(&self) -> RecommendationKind {
        match self {
            Self::Ready(card) => card.kind(),
            Self::MatchReply { .. } | Self::Likes(_) => RecommendationKind::Subscription,
        }
    }

    /// Builds the card event once the prose is known.
    pub fn resolve(self, prose: &str) -> Option<ChatEvent> {
        match self {
            Self::Ready(card) => Some(ChatEvent::card(card)),
            Self::MatchReply {
                user_texts,
                subscriptions,
                brands,
            } => {
                let texts: Vec<&str> = user_texts.iter().map(String::as_str).collect();
                let reply = Some(prose).filter(|p| !p.trim().is_empty());
                match_subscription(&texts, reply, &subscriptions, &brands)
                    .map(|pick| ChatEvent::card(RecommendationCard::Subscriptions(pick)))
            }
            Self::Likes(pick) => Some(ChatEvent::likes_card(pick)),
        }
    }
}

/// Model-written reply, optionally led by analysis and card events.
#[derive(Debug, Clone)]
pub struct GeneratedReply {
    pub lead: Option<ChatEvent>,
    pub card: Option<PendingCard>,
    pub request: CompletionRequest,
}

/// What the composer has to stream for a turn.
#[derive(Debug, Clone)]
pub enum Reply {
    /// Fixed text, no model call.
    Text(String),
    Generated(GeneratedReply),
}

impl Reply {
    fn canned(reply: CannedReply, tone: Tone) -> Self {
        Self::Text(reply.text(tone).to_string())
    }
}

/// Drives sessions through flows and one-shots.
#[derive(Clone)]
pub struct FlowController {
    classifier: IntentClassifier,
    catalog: Arc<dyn CatalogReader>,
    usage: Arc<UsageHandler>,
    likes: Arc<LikesHandler>,
}

impl FlowController {
    pub fn new(classifier: IntentClassifier, catalog: Arc<dyn CatalogReader>) -> Self {
        Self {
            classifier,
            usage: Arc::new(UsageHandler::new(catalog.clone())),
            likes: Arc::new(LikesHandler::new(catalog.clone())),
            catalog,
        }
    }

    /// Applies one utterance to the session and decides the reply.
    pub async fn handle(
        &self,
        record: &mut SessionRecord,
        input: TurnInput<'_>,
    ) -> Result<Reply, FlowError> {
        match advance(record, input.utterance) {
            Transition::Ask { flow, step } => {
                tracing::debug!(?flow, step, "Asking next question");
                let text = question(flow, step, input.tone)
                    .ok_or(FlowError::MissingQuestion { flow, step })?;
                Ok(Reply::Text(text.to_string()))
            }
            Transition::Complete { flow, slots } => self.complete(record, flow, slots, input).await,
            Transition::Classify => {
                let context = record
                    .history
                    .last()
                    .map(|turn| format!("{} / {}", turn.user, turn.assistant));
                let intent = self
                    .classifier
                    .classify(input.utterance, context.as_deref(), input.metadata.clone())
                    .await;
                self.dispatch(record, intent, input).await
            }
        }
    }

    async fn dispatch(
        &self,
        record: &mut SessionRecord,
        intent: Intent,
        input: TurnInput<'_>,
    ) -> Result<Reply, FlowError> {
        if let Some(flow) = intent.flow() {
            record.start_flow(flow);
            tracing::info!(?flow, "Flow started");
            let text = question(flow, 1, input.tone)
                .ok_or(FlowError::MissingQuestion { flow, step: 1 })?;
            return Ok(Reply::Text(text.to_string()));
        }

        match intent {
            Intent::CurrentUsage => self.current_usage(input).await,
            Intent::UsageBasedRecommendation => self.usage_recommendation(record, input).await,
            Intent::LikesBasedRecommendation => {
                let liked = self.likes.liked_in(input.utterance).await?;
                self.likes(record, &liked, input.tone, input.metadata).await
            }
            other => {
                let reply = CannedReply::for_intent(other).unwrap_or(CannedReply::OffTopicUnclear);
                Ok(Reply::canned(reply, input.tone))
            }
        }
    }

    async fn complete(
        &self,
        record: &mut SessionRecord,
        flow: FlowTag,
        slots: BTreeMap<String, String>,
        input: TurnInput<'_>,
    ) -> Result<Reply, FlowError> {
        let history = record.history.clone();
        let card = match flow.completion_kind() {
            RecommendationKind::Plan => {
                let plans = self.catalog.list_plans().await?;
                let ranked = rank_plans(&plans, &PlanPreferences::from_slots(&slots), TOP_PLANS);
                if ranked.is_empty() {
                    record.clear_flow();
                    return Ok(Reply::canned(CannedReply::CatalogEmpty, input.tone));
                }
                let request = prompts::plan_recommendation(
                    input.metadata,
                    input.tone,
                    &history,
                    input.utterance,
                    &ranked,
                    &slots,
                );
                (PendingCard::Ready(RecommendationCard::Plans(ranked)), request)
            }
            RecommendationKind::Subscription => {
                let subscriptions = self.catalog.list_subscriptions().await?;
                let brands = self.catalog.list_brands().await?;
                if subscriptions.is_empty() {
                    record.clear_flow();
                    return Ok(Reply::canned(CannedReply::CatalogEmpty, input.tone));
                }
                let request = prompts::subscription_recommendation(
                    input.metadata,
                    input.tone,
                    &history,
                    input.utterance,
                    &slots,
                    &subscriptions,
                    &brands,
                );
                let pending = PendingCard::MatchReply {
                    user_texts: slots.into_values().collect(),
                    subscriptions,
                    brands,
                };
                (pending, request)
            }
        };

        let (card, request) = card;
        finish(record, card.kind());
        tracing::info!(?flow, kind = ?card.kind(), "Flow completed");

        Ok(Reply::Generated(GeneratedReply {
            lead: None,
            card: Some(card),
            request,
        }))
    }

    async fn current_usage(&self, input: TurnInput<'_>) -> Result<Reply, FlowError> {
        let Some(user_id) = input.user_id else {
            return Ok(Reply::canned(CannedReply::UsageGuidance, input.tone));
        };
        let Some(report) = self.usage.report(user_id).await? else {
            return Ok(Reply::canned(CannedReply::UsageGuidance, input.tone));
        };

        let request = prompts::usage_analysis(
            input.metadata,
            input.tone,
            input.utterance,
            &report.usage,
            &report.summary,
        );
        Ok(Reply::Generated(GeneratedReply {
            lead: Some(ChatEvent::UsageAnalysis {
                usage: report.usage,
                summary: report.summary,
            }),
            card: None,
            request,
        }))
    }

    async fn usage_recommendation(
        &self,
        record: &mut SessionRecord,
        input: TurnInput<'_>,
    ) -> Result<Reply, FlowError> {
        let Some(user_id) = input.user_id else {
            return Ok(Reply::canned(CannedReply::UsageGuidance, input.tone));
        };
        let Some(report) = self.usage.report(user_id).await? else {
            return Ok(Reply::canned(CannedReply::UsageGuidance, input.tone));
        };

        let plans = self.usage.recommend(&report).await?;
        if plans.is_empty() {
            return Ok(Reply::canned(CannedReply::CatalogEmpty, input.tone));
        }

        let request = prompts::usage_recommendation(
            input.metadata,
            input.tone,
            input.utterance,
            &report.usage,
            &plans,
        );
        record.last_kind = Some(RecommendationKind::Plan);
        Ok(Reply::Generated(GeneratedReply {
            lead: None,
            card: Some(PendingCard::Ready(RecommendationCard::Plans(plans))),
            request,
        }))
    }

    /// Likes-based one-shot for an explicit list of liked names.
    pub async fn likes(
        &self,
        record: &mut SessionRecord,
        liked: &[String],
        tone: Tone,
        metadata: RequestMetadata,
    ) -> Result<Reply, FlowError> {
        let Some(pick) = self.likes.pick(liked).await? else {
            return Ok(Reply::canned(CannedReply::LikesGuidance, tone));
        };

        let request = prompts::likes_recommendation(metadata, tone, liked, &pick);
        record.last_kind = Some(RecommendationKind::Subscription);
        Ok(Reply::Generated(GeneratedReply {
            lead: None,
            card: Some(PendingCard::Likes(pick)),
            request,
        }))
    }
}
