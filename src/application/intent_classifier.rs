//! Two-stage intent classification.
//!
//! The rule stage settles confident cases without a network call. Anything
//! else is offered to the model under a deadline; an out-of-set answer,
//! an error or a timeout leaves the rule result in place.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;

use crate::domain::intent::{classify_by_rules, Intent};
use crate::ports::{AIProvider, RequestMetadata};

use super::prompts;

/// Default deadline for the model stage.
pub const DEFAULT_CLASSIFY_TIMEOUT: Duration = Duration::from_secs(10);

/// Classifies utterances into the closed intent set.
#[derive(Clone)]
pub struct IntentClassifier {
    ai: Arc<dyn AIProvider>,
    deadline: Duration,
}

impl IntentClassifier {
    pub fn new(ai: Arc<dyn AIProvider>) -> Self {
        Self {
            ai,
            deadline: DEFAULT_CLASSIFY_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    /// Returns exactly one intent for the utterance.
    ///
    /// `context` is passed to the model stage only.
    pub async fn classify(
        &self,
        utterance: &str,
        context: Option<&str>,
        metadata: RequestMetadata,
    ) -> Intent {
        let decision = classify_by_rules(utterance);
        if decision.confident {
            tracing::debug!(intent = %decision.intent, "Rule stage settled intent");
            return decision.intent;
        }

        let request = prompts::classification(metadata, utterance, context);
        match timeout(self.deadline, self.ai.complete(request)).await {
            Ok(Ok(response)) => match Intent::from_model_output(&response.content) {
                Some(intent) => {
                    tracing::debug!(rule = %decision.intent, model = %intent, "Model stage settled intent");
                    intent
                }
                None => {
                    tracing::debug!(
                        rule = %decision.intent,
                        output = %response.content,
                        "Model answered outside the intent set"
                    );
                    decision.intent
                }
            },
            Ok(Err(e)) => {
                tracing::warn!(rule = %decision.intent, error = %e, "Intent model call failed");
                decision.intent
            }
            Err(_) => {
                tracing::warn!(
                    rule = %decision.intent,
                    timeout_secs = self.deadline.as_secs(),
                    "Intent model call timed out"
                );
                decision.intent
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::{MockAIProvider, MockError};
    use crate::domain::foundation::SessionId;

    fn metadata() -> RequestMetadata {
        RequestMetadata::new(SessionId::new("s1").unwrap(), "trace")
    }

    async fn classify(provider: MockAIProvider, utterance: &str) -> (Intent, MockAIProvider) {
        let classifier = IntentClassifier::new(Arc::new(provider.clone()));
        let intent = classifier.classify(utterance, None, metadata()).await;
        (intent, provider)
    }

    #[tokio::test]
    async fn confident_rules_skip_the_model() {
        let (intent, provider) = classify(MockAIProvider::new(), "안녕").await;
        assert_eq!(intent, Intent::Greeting);
        assert_eq!(provider.call_count(), 0);

        let (intent, provider) = classify(MockAIProvider::new(), "asdfasdf").await;
        assert_eq!(intent, Intent::Nonsense);
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn model_can_override_tentative_rule() {
        let provider = MockAIProvider::new().with_completion("subscription_request");
        let (intent, provider) = classify(provider, "요금제 말고 다른 거").await;
        assert_eq!(intent, Intent::SubscriptionRequest);
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn out_of_set_answer_keeps_rule_result() {
        let provider = MockAIProvider::new().with_completion("I think it's about plans");
        let (intent, _) = classify(provider, "요금제 추천해줘").await;
        assert_eq!(intent, Intent::PlanRequest);
    }

    #[tokio::test]
    async fn model_error_keeps_rule_result() {
        let provider = MockAIProvider::new().with_completion_error(MockError::Unavailable {
            message: "down".into(),
        });
        let (intent, _) = classify(provider, "요금제 추천해줘").await;
        assert_eq!(intent, Intent::PlanRequest);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_model_times_out_to_rule_result() {
        let provider = MockAIProvider::new()
            .with_completion("subscription_request")
            .with_delay(Duration::from_secs(30));
        let classifier = IntentClassifier::new(Arc::new(provider));

        let intent = classifier.classify("요금제 추천해줘", None, metadata()).await;
        assert_eq!(intent, Intent::PlanRequest);
    }

    #[tokio::test]
    async fn context_reaches_the_model_prompt() {
        let provider = MockAIProvider::new();
        let classifier = IntentClassifier::new(Arc::new(provider.clone()));
        classifier
            .classify("요금제 추천해줘", Some("구독 얘기 중"), metadata())
            .await;

        let calls = provider.get_calls();
        assert!(calls[0].messages[0].content.contains("구독 얘기 중"));
    }
}
