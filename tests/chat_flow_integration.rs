//! Integration tests for chat turns driven end to end through `ChatService`.
//!
//! These tests verify:
//! 1. The plan and subscription question flows produce the expected cards
//! 2. Conversational intents short-circuit without starting a flow
//! 3. Every response ends with exactly one terminal event
//! 4. Concurrent writes to one session resolve last-writer-wins
//!
//! Uses the mock AI provider, in-memory key/value store and sample catalog.

use futures::StreamExt;
use std::sync::Arc;
use std::time::Duration;

use carrier_chat::adapters::ai::{MockAIProvider, MockError};
use carrier_chat::adapters::catalog::InMemoryCatalog;
use carrier_chat::adapters::session::InMemoryKeyValueStore;
use carrier_chat::application::{
    ChatEvent, ChatRequest, ChatService, FlowController, IntentClassifier, LikesRequest,
    SessionPolicy, SessionRepository, StreamComposer,
};
use carrier_chat::domain::foundation::{SessionId, Tone};
use carrier_chat::domain::replies::CannedReply;
use carrier_chat::domain::session::{FlowTag, SessionRecord};

// =============================================================================
// Test Infrastructure
// =============================================================================

struct TestApp {
    service: ChatService,
    sessions: SessionRepository,
}

impl TestApp {
    fn new(provider: MockAIProvider) -> Self {
        let ai = Arc::new(provider);
        let sessions = SessionRepository::new(
            Arc::new(InMemoryKeyValueStore::default()),
            SessionPolicy::default(),
        );
        let controller = FlowController::new(
            IntentClassifier::new(ai.clone()),
            Arc::new(InMemoryCatalog::sample()),
        );
        let composer =
            StreamComposer::new(ai, sessions.clone()).with_chunk_delay(Duration::ZERO);
        Self {
            service: ChatService::new(sessions.clone(), controller, composer),
            sessions,
        }
    }

    async fn say(&self, session: &str, message: &str) -> Vec<ChatEvent> {
        self.service
            .chat(ChatRequest {
                session_id: session.to_string(),
                message: message.to_string(),
                tone: None,
                user_id: None,
            })
            .collect()
            .await
    }

    async fn record(&self, session: &str) -> SessionRecord {
        self.sessions.load(&sid(session)).await
    }
}

fn sid(value: &str) -> SessionId {
    SessionId::new(value).unwrap()
}

fn prose(events: &[ChatEvent]) -> String {
    events
        .iter()
        .filter_map(|e| match e {
            ChatEvent::MessageChunk { content } => Some(content.as_str()),
            _ => None,
        })
        .collect()
}

fn assert_single_terminal(events: &[ChatEvent]) {
    let terminals = events.iter().filter(|e| e.is_terminal()).count();
    assert_eq!(terminals, 1, "expected exactly one terminal event in {events:?}");
    assert!(events.last().is_some_and(ChatEvent::is_terminal));
}

// =============================================================================
// Plan flow
// =============================================================================

#[tokio::test]
async fn plan_flow_happy_path() {
    let app = TestApp::new(MockAIProvider::new().with_stream_reply("두 요금제를 추천드려요."));

    let events = app.say("s1", "요금제 추천해줘").await;
    assert_eq!(prose(&events), "데이터는 얼마나 사용하시나요?");
    assert!(!events.iter().any(ChatEvent::is_card));

    app.say("s1", "무제한").await;
    app.say("s1", "많이 해요").await;
    let events = app.say("s1", "유튜브").await;
    assert!(prose(&events).starts_with("예산은 어느 정도"));

    let events = app.say("s1", "5만원 이하").await;
    match &events[0] {
        ChatEvent::PlanRecommendations { plans } => {
            assert_eq!(plans.len(), 2);
            assert!(plans.iter().all(|p| p.monthly_price_won <= 50_000));
            assert_eq!(plans[0].name, "LTE 다이렉트 45");
        }
        other => panic!("expected plan card first, got {other:?}"),
    }
    assert_eq!(events[1], ChatEvent::MessageStart);
    assert_eq!(prose(&events), "두 요금제를 추천드려요.");
    assert_single_terminal(&events);

    let record = app.record("s1").await;
    assert!(record.is_idle());
    assert!(record.slots.is_empty());
    assert_eq!(record.last_kind, None);
}

#[tokio::test]
async fn at_least_budget_picks_mid_priced_plans() {
    let app = TestApp::new(MockAIProvider::new());
    for message in ["요금제 추천해줘", "보통", "보통", "일반"] {
        app.say("s2", message).await;
    }

    let events = app.say("s2", "5만원 이상").await;
    match &events[0] {
        ChatEvent::PlanRecommendations { plans } => {
            assert!(!plans.is_empty());
            assert!(plans
                .iter()
                .all(|p| (50_000..=80_000).contains(&p.monthly_price_won)));
        }
        other => panic!("expected plan card first, got {other:?}"),
    }
}

#[tokio::test]
async fn identical_flows_on_fresh_sessions_pick_same_top_plan() {
    let app = TestApp::new(MockAIProvider::new());
    let mut tops = Vec::new();
    for session in ["a", "b"] {
        for message in ["요금제 추천해줘", "무제한", "많이 해요", "유튜브"] {
            app.say(session, message).await;
        }
        let events = app.say(session, "5만원 이하").await;
        if let ChatEvent::PlanRecommendations { plans } = &events[0] {
            tops.push(plans[0].id);
        }
    }
    assert_eq!(tops.len(), 2);
    assert_eq!(tops[0], tops[1]);
}

// =============================================================================
// Subscription flow
// =============================================================================

#[tokio::test]
async fn subscription_flow_honours_mentioned_service() {
    let app = TestApp::new(MockAIProvider::new().with_stream_reply("재밌게 보세요!"));
    for message in ["구독 추천해줘", "드라마랑 영화", "스마트폰으로 봐요", "주로 저녁에"] {
        app.say("s5", message).await;
    }

    let events = app.say("s5", "넷플릭스가 좋아요").await;
    match &events[0] {
        ChatEvent::SubscriptionRecommendations { subscriptions, .. } => {
            let subscriptions = subscriptions.as_ref().unwrap();
            assert!(subscriptions[0].title.contains("넷플릭스"));
        }
        other => panic!("expected subscription card first, got {other:?}"),
    }
    assert_single_terminal(&events);
    assert!(app.record("s5").await.is_idle());
}

#[tokio::test]
async fn personality_flow_ends_in_subscription_card() {
    let app = TestApp::new(MockAIProvider::new());
    let events = app.say("p1", "성향 테스트 해볼래").await;
    assert!(!prose(&events).is_empty());
    assert_eq!(app.record("p1").await.flow, Some(FlowTag::Personality));

    for message in ["혼자 있을 때", "음악 듣기", "멜론", "차분한 편"] {
        app.say("p1", message).await;
    }
    let record = app.record("p1").await;
    assert!(record.is_idle());
}

// =============================================================================
// Short-circuit replies
// =============================================================================

#[tokio::test]
async fn greeting_does_not_start_a_flow() {
    let provider = MockAIProvider::new();
    let app = TestApp::new(provider.clone());

    let events = app.say("g1", "안녕").await;
    assert_eq!(prose(&events), CannedReply::Greeting.text(Tone::Formal));
    assert!(app.record("g1").await.flow.is_none());
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn nonsense_asks_to_rephrase() {
    let app = TestApp::new(MockAIProvider::new());
    let events = app.say("n1", "asdfasdf").await;
    assert_eq!(prose(&events), CannedReply::Nonsense.text(Tone::Formal));
    assert_single_terminal(&events);
}

#[tokio::test]
async fn playful_tone_changes_canned_text() {
    let app = TestApp::new(MockAIProvider::new());
    let events: Vec<ChatEvent> = app
        .service
        .chat(ChatRequest {
            session_id: "t1".into(),
            message: "안녕".into(),
            tone: Some(Tone::Playful),
            user_id: None,
        })
        .collect()
        .await;
    assert_eq!(prose(&events), CannedReply::Greeting.text(Tone::Playful));
}

// =============================================================================
// Envelope termination
// =============================================================================

#[tokio::test]
async fn every_response_has_exactly_one_terminal_event() {
    let app = TestApp::new(
        MockAIProvider::new()
            .with_stream_failing_after(
                "잠시만요 곧",
                MockError::Network {
                    message: "reset".into(),
                },
            )
            .with_stream_error(MockError::Unavailable {
                message: "down".into(),
            }),
    );

    for message in ["안녕", "asdfasdf", "요금제 추천해줘", "무제한", "많이 해요", "유튜브"] {
        assert_single_terminal(&app.say("e1", message).await);
    }

    // Prose fails mid-stream: card, partial text, apology, end.
    let events = app.say("e1", "5만원 이하").await;
    assert!(events[0].is_card());
    assert!(prose(&events).starts_with("잠시만요 곧"));
    assert_single_terminal(&events);

    // Prose fails before any text.
    for message in ["요금제 추천해줘", "무제한", "많이 해요", "유튜브"] {
        app.say("e2", message).await;
    }
    let events = app.say("e2", "5만원 이하").await;
    assert!(prose(&events).contains(CannedReply::TryAgainShortly.text(Tone::Formal)));
    assert_single_terminal(&events);

    // Invalid request.
    let events = app.say("", "안녕").await;
    assert_eq!(events.len(), 1);
    assert!(matches!(events[0], ChatEvent::Error { .. }));

    let events: Vec<ChatEvent> = app
        .service
        .recommend_likes(LikesRequest {
            session_id: "e3".into(),
            liked: vec!["티빙".into()],
            tone: None,
        })
        .collect()
        .await;
    assert_single_terminal(&events);
}

// =============================================================================
// Concurrency
// =============================================================================

#[tokio::test]
async fn sequential_writes_are_last_writer_wins() {
    let app = TestApp::new(MockAIProvider::new());
    let id = sid("lw");

    let mut first = SessionRecord::default();
    first.start_flow(FlowTag::Plan);
    let mut second = SessionRecord::default();
    second.start_flow(FlowTag::Subscription);

    app.sessions.save(&id, &first).await;
    app.sessions.save(&id, &second).await;

    assert_eq!(app.record("lw").await.flow, Some(FlowTag::Subscription));
}

#[tokio::test]
async fn concurrent_turns_leave_a_consistent_record() {
    let app = TestApp::new(MockAIProvider::new().with_delay(Duration::from_millis(5)));

    let (a, b) = tokio::join!(
        app.say("race", "요금제 추천해줘"),
        app.say("race", "구독 추천해줘")
    );
    assert_single_terminal(&a);
    assert_single_terminal(&b);

    let record = app.record("race").await;
    assert!(record.is_consistent());
    assert!(matches!(
        record.flow,
        Some(FlowTag::Plan) | Some(FlowTag::Subscription)
    ));
    assert_eq!(record.step, 1);
    assert_eq!(record.history.len(), 1);
}
