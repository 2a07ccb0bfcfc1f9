//! Deterministic first stage of intent classification.
//!
//! Rules run in a fixed order and the first hit wins. Greeting, nonsense,
//! tech issue and multi-turn answer hits are confident and skip the
//! model stage.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

use super::intent::Intent;
use super::lexicon::*;

const SHORT_ANSWER_CHARS: usize = 10;

/// Outcome of the rule stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleDecision {
    pub intent: Intent,
    /// When true the model stage must not run.
    pub confident: bool,
}

impl RuleDecision {
    fn confident(intent: Intent) -> Self {
        Self {
            intent,
            confident: true,
        }
    }

    fn tentative(intent: Intent) -> Self {
        Self {
            intent,
            confident: false,
        }
    }
}

static KEYBOARD_ROW: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:[qwertyuiop]{3,}|[asdfghjkl]{3,}|[zxcvbnm]{3,}|[ㅂㅈㄷㄱㅅㅛㅕㅑㅐㅔ]{3,}|[ㅁㄴㅇㄹㅎㅗㅓㅏㅣ]{3,}|[ㅋㅌㅊㅍㅠㅜㅡ]{3,})$",
    )
    .expect("valid regex")
});

static DIGITS_ONLY: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{3,}$").expect("valid regex"));

static PUNCTUATION_ONLY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\p{P}\p{S}]{3,}$").expect("valid regex"));

static JAMO_ONLY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[ㄱ-ㅎㅏ-ㅣ]{3,}$").expect("valid regex"));

static GREETING_LEADING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:안녕|하이|헬로|hi|hello|hey)(?:하세요|하십니까|요)?[\s!~.,?^ㅎㅋ]*$")
        .expect("valid regex")
});

static GREETING_TRAILING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\S{1,8}\s*(?:안녕하세요|반갑습니다|반가워요?)[\s!~.^]*$").expect("valid regex")
});

static GREETING_WHOLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:처음 ?뵙겠습니다|반가워요?|좋은 (?:아침|하루)(?:이에요|입니다)?)[\s!~.]*$")
        .expect("valid regex")
});

static MAN_WON_ANSWER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d+\s*만\s*원?\s*(?:대|이하|이상|정도|쯤|까지|미만)?[\s요.]*$")
        .expect("valid regex")
});

/// Runs the ordered rule list against an utterance.
pub fn classify_by_rules(utterance: &str) -> RuleDecision {
    let text = utterance.trim().to_lowercase();

    if text.is_empty() {
        return RuleDecision::tentative(Intent::OffTopicUnclear);
    }
    if is_nonsense(&text) {
        return RuleDecision::confident(Intent::Nonsense);
    }
    if is_greeting(&text) {
        return RuleDecision::confident(Intent::Greeting);
    }
    if text.chars().count() < 2 {
        return RuleDecision::tentative(Intent::OffTopicUnclear);
    }
    if is_multiturn_answer(&text) {
        return RuleDecision::confident(Intent::MultiturnAnswer);
    }
    if contains_any(&text, TECH_ISSUE_KEYWORDS) {
        return RuleDecision::confident(Intent::TechIssue);
    }

    let ordered: [(&[&str], Intent); 10] = [
        (PLAN_PHRASES, Intent::PlanRequest),
        (PLAN_WORDS, Intent::PlanRequest),
        (SUBSCRIPTION_PHRASES, Intent::SubscriptionRequest),
        (SUBSCRIPTION_WORDS, Intent::SubscriptionRequest),
        (USAGE_BASED_PHRASES, Intent::UsageBasedRecommendation),
        (LIKES_BASED_PHRASES, Intent::LikesBasedRecommendation),
        (CURRENT_USAGE_KEYWORDS, Intent::CurrentUsage),
        (PERSONALITY_KEYWORDS, Intent::PersonalityQuiz),
        (INTERESTING_TOPICS, Intent::OffTopicInteresting),
        (BORING_TOPICS, Intent::OffTopicBoring),
    ];
    if let Some((_, intent)) = ordered.iter().find(|(set, _)| contains_any(&text, set)) {
        return RuleDecision::tentative(*intent);
    }

    if text.ends_with('?') || contains_any(&text, QUESTION_WORDS) {
        return RuleDecision::tentative(Intent::OffTopicUnclear);
    }
    RuleDecision::tentative(Intent::Greeting)
}

fn is_nonsense(text: &str) -> bool {
    let length = text.chars().count();
    let distinct: HashSet<char> = text.chars().filter(|c| !c.is_whitespace()).collect();
    let laughter = distinct.iter().all(|c| LAUGHTER_GLYPHS.contains(c));

    if length > 3 && distinct.len() <= 2 && !laughter {
        return true;
    }
    if TEST_STRINGS.contains(&text) {
        return true;
    }
    if length <= 2 {
        return false;
    }
    if KEYBOARD_ROW.is_match(text) || DIGITS_ONLY.is_match(text) || PUNCTUATION_ONLY.is_match(text)
    {
        return !laughter;
    }
    JAMO_ONLY.is_match(text) && !laughter
}

fn is_greeting(text: &str) -> bool {
    let bare = text.trim_end_matches(|c: char| "!~.?^ ".contains(c));
    GREETING_WORDS.contains(&bare)
        || GREETING_LEADING.is_match(text)
        || GREETING_TRAILING.is_match(text)
        || GREETING_WHOLE.is_match(text)
}

fn is_multiturn_answer(text: &str) -> bool {
    if contains_any(text, REQUEST_VERBS) {
        return false;
    }
    let bare = text.trim_end_matches(|c: char| "!~.?^ ".contains(c));
    if YES_NO.contains(&bare) || MAN_WON_ANSWER.is_match(text) {
        return true;
    }
    if text.chars().count() > SHORT_ANSWER_CHARS {
        return false;
    }
    contains_any(text, ANSWER_VOCABULARY) || ANSWER_SUFFIXES.iter().any(|s| bare.ends_with(s))
}
