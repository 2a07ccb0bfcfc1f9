//! Model prompt construction.

use std::collections::BTreeMap;
use std::fmt::Write;

use crate::domain::catalog::{Brand, Plan, Subscription, UsageSummary, UserUsage};
use crate::domain::foundation::Tone;
use crate::domain::intent::Intent;
use crate::domain::recommendation::SubscriptionPick;
use crate::domain::session::Turn;
use crate::ports::{CompletionRequest, MessageRole, RequestMetadata};

const ASSISTANT_ROLE: &str =
    "당신은 통신사 고객에게 요금제와 구독 서비스를 추천하는 상담 챗봇입니다.";

fn system_prompt(tone: Tone, task: &str) -> String {
    format!("{}\n{}\n{}", ASSISTANT_ROLE, task, tone.prompt_directive())
}

fn with_history(mut request: CompletionRequest, history: &[Turn]) -> CompletionRequest {
    for turn in history {
        request = request
            .with_message(MessageRole::User, turn.user.clone())
            .with_message(MessageRole::Assistant, turn.assistant.clone());
    }
    request
}

fn describe_slots(slots: &BTreeMap<String, String>) -> String {
    slots
        .iter()
        .map(|(name, answer)| format!("- {}: {}", name, answer))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Single-tag classification prompt for the model stage of the classifier.
pub fn classification(
    metadata: RequestMetadata,
    utterance: &str,
    context: Option<&str>,
) -> CompletionRequest {
    let tags = Intent::ALL
        .iter()
        .map(|intent| intent.as_tag())
        .collect::<Vec<_>>()
        .join(", ");
    let system = format!(
        "사용자 발화의 의도를 다음 태그 중 하나로만 답하세요: {}.\n태그 외의 다른 말은 쓰지 마세요.",
        tags
    );

    let mut content = String::new();
    if let Some(context) = context.filter(|c| !c.trim().is_empty()) {
        let _ = writeln!(content, "이전 대화: {}", context);
    }
    let _ = write!(content, "발화: {}", utterance);

    CompletionRequest::new(metadata)
        .with_system_prompt(system)
        .with_message(MessageRole::User, content)
        .with_max_tokens(16)
        .with_temperature(0.0)
}

/// Prose accompanying a plan card.
pub fn plan_recommendation(
    metadata: RequestMetadata,
    tone: Tone,
    history: &[Turn],
    utterance: &str,
    plans: &[Plan],
    answers: &BTreeMap<String, String>,
) -> CompletionRequest {
    let mut task = String::from(
        "아래 요금제가 이미 추천 카드로 표시되었습니다. 고객의 답변을 근거로 각 요금제를 추천하는 이유를 짧게 설명하세요. 다른 요금제나 구독 서비스는 언급하지 마세요.\n",
    );
    for plan in plans {
        let _ = writeln!(
            task,
            "- {} (월 {}원, 데이터 {}, 통화 {})",
            plan.name, plan.monthly_price_won, plan.data_allowance_text, plan.voice_allowance_text
        );
    }
    if !answers.is_empty() {
        let _ = write!(task, "고객 답변:\n{}", describe_slots(answers));
    }

    with_history(CompletionRequest::new(metadata), history)
        .with_system_prompt(system_prompt(tone, &task))
        .with_message(MessageRole::User, utterance)
}

/// Prose choosing a subscription and lifestyle brand from the catalog.
///
/// The model is asked to put its picks in bold so they can be matched.
pub fn subscription_recommendation(
    metadata: RequestMetadata,
    tone: Tone,
    history: &[Turn],
    utterance: &str,
    answers: &BTreeMap<String, String>,
    subscriptions: &[Subscription],
    brands: &[Brand],
) -> CompletionRequest {
    let mut task = String::from(
        "고객의 답변에 맞는 구독 서비스 하나와 라이프 브랜드 하나를 아래 목록에서 골라 **이름** 형식으로 강조하고 이유를 설명하세요.\n구독 서비스:\n",
    );
    for sub in subscriptions {
        let _ = writeln!(task, "- {} ({}, 월 {}원)", sub.title, sub.category, sub.monthly_price_won);
    }
    task.push_str("라이프 브랜드:\n");
    for brand in brands {
        let _ = writeln!(task, "- {} ({})", brand.name, brand.description);
    }
    if !answers.is_empty() {
        let _ = write!(task, "고객 답변:\n{}", describe_slots(answers));
    }

    with_history(CompletionRequest::new(metadata), history)
        .with_system_prompt(system_prompt(tone, &task))
        .with_message(MessageRole::User, utterance)
}

/// Explanation of the subscriber's current usage.
pub fn usage_analysis(
    metadata: RequestMetadata,
    tone: Tone,
    utterance: &str,
    usage: &UserUsage,
    summary: &UsageSummary,
) -> CompletionRequest {
    let task = format!(
        "고객의 이번 달 사용량을 쉽게 설명하세요.\n요금제: {} (월 {}원)\n남은 데이터: {}MB (사용률 {:.0}%)\n남은 통화: {}분\n남은 문자: {}건\n{}",
        usage.plan_name,
        usage.plan_price,
        usage.remaining_data_mb,
        usage.usage_percent,
        usage.remaining_voice_min,
        usage.remaining_sms_count,
        if summary.suggests_upgrade {
            "데이터가 부족하니 상위 요금제를 권유하세요."
        } else if summary.suggests_downgrade {
            "데이터가 많이 남으니 더 저렴한 요금제를 권유하세요."
        } else {
            "현재 요금제가 적절하다고 안내하세요."
        }
    );

    CompletionRequest::new(metadata)
        .with_system_prompt(system_prompt(tone, &task))
        .with_message(MessageRole::User, utterance)
}

/// Prose accompanying a plan card derived from current usage.
pub fn usage_recommendation(
    metadata: RequestMetadata,
    tone: Tone,
    utterance: &str,
    usage: &UserUsage,
    plans: &[Plan],
) -> CompletionRequest {
    let mut task = format!(
        "고객은 현재 {} (월 {}원)를 쓰고 있고 데이터 사용률은 {:.0}%입니다. 아래 요금제가 추천 카드로 표시되었습니다. 현재 사용 패턴과 비교해 추천 이유를 설명하세요.\n",
        usage.plan_name, usage.plan_price, usage.usage_percent
    );
    for plan in plans {
        let _ = writeln!(task, "- {} (월 {}원, 데이터 {})", plan.name, plan.monthly_price_won, plan.data_allowance_text);
    }

    CompletionRequest::new(metadata)
        .with_system_prompt(system_prompt(tone, &task))
        .with_message(MessageRole::User, utterance)
}

/// Prose accompanying a likes-based pick.
pub fn likes_recommendation(
    metadata: RequestMetadata,
    tone: Tone,
    liked: &[String],
    pick: &SubscriptionPick,
) -> CompletionRequest {
    let brand = pick
        .life_brand
        .as_ref()
        .map(|b| b.name.as_str())
        .unwrap_or("없음");
    let task = format!(
        "고객이 좋아하는 서비스와 브랜드: {}.\n추천 구독: {}, 추천 라이프 브랜드: {}.\n고객 취향과 연결해 추천 이유를 설명하세요.",
        liked.join(", "),
        pick.main_subscription.title,
        brand
    );

    CompletionRequest::new(metadata)
        .with_system_prompt(system_prompt(tone, &task))
        .with_message(MessageRole::User, liked.join(", "))
}
