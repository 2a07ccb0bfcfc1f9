//! Tone-templated canned replies.

use crate::domain::foundation::Tone;
use crate::domain::intent::Intent;

/// Reply that needs no model call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CannedReply {
    Greeting,
    TechIssue,
    OffTopicInteresting,
    OffTopicBoring,
    OffTopicUnclear,
    Nonsense,
    /// An answer arrived while no question was pending.
    StrayAnswer,
    /// A mid-flow failure reset the flow.
    FlowReset,
    /// A collaborator failed while streaming.
    StreamInterrupted,
    /// A collaborator timed out.
    TryAgainShortly,
    /// Usage handlers need a known user.
    UsageGuidance,
    /// Likes handler needs at least one liked service or brand.
    LikesGuidance,
    /// The catalog returned nothing to recommend.
    CatalogEmpty,
}

impl CannedReply {
    /// Canned reply for intents handled without a flow or one-shot.
    pub fn for_intent(intent: Intent) -> Option<Self> {
        match intent {
            Intent::Greeting => Some(Self::Greeting),
            Intent::TechIssue => Some(Self::TechIssue),
            Intent::OffTopicInteresting => Some(Self::OffTopicInteresting),
            Intent::OffTopicBoring => Some(Self::OffTopicBoring),
            Intent::OffTopicUnclear => Some(Self::OffTopicUnclear),
            Intent::Nonsense => Some(Self::Nonsense),
            Intent::MultiturnAnswer => Some(Self::StrayAnswer),
            _ => None,
        }
    }

    /// Reply text in the given tone.
    pub fn text(&self, tone: Tone) -> &'static str {
        let (formal, playful) = match self {
            Self::Greeting => (
                "안녕하세요! 요금제나 구독 서비스 추천이 필요하시면 말씀해 주세요.",
                "안녕! 요금제나 구독 서비스 고민 있으면 말해줘~",
            ),
            Self::TechIssue => (
                "불편을 드려 죄송합니다. 기술적인 문제는 고객센터(114)로 문의해 주시면 빠르게 도와드리겠습니다.",
                "헉, 불편했겠다 ㅠㅠ 기술 문제는 고객센터(114)에 물어보는 게 제일 빨라!",
            ),
            Self::OffTopicInteresting => (
                "흥미로운 이야기네요! 저는 요금제와 구독 서비스 추천을 도와드리고 있어요. 관련해서 궁금한 점이 있으신가요?",
                "오 재밌는 얘기다! 근데 난 요금제랑 구독 추천 담당이야. 그쪽으로 궁금한 거 있어?",
            ),
            Self::OffTopicBoring => (
                "그러셨군요. 기분 전환에 좋은 구독 서비스를 찾아드릴까요?",
                "심심할 땐 새 구독 서비스 하나 찾아볼까?",
            ),
            Self::OffTopicUnclear => (
                "죄송하지만 질문을 잘 이해하지 못했어요. 요금제 추천, 구독 추천, 사용량 조회 중 원하시는 것을 말씀해 주세요.",
                "음, 무슨 말인지 잘 모르겠어! 요금제 추천, 구독 추천, 사용량 조회 중에 골라줄래?",
            ),
            Self::Nonsense => (
                "입력하신 내용을 이해하지 못했어요. 다시 한 번 말씀해 주시겠어요?",
                "앗, 무슨 뜻인지 모르겠어! 다시 말해줄래?",
            ),
            Self::StrayAnswer => (
                "어떤 도움이 필요하신가요? '요금제 추천해줘'처럼 말씀해 주시면 바로 도와드릴게요.",
                "뭘 도와줄까? '요금제 추천해줘'처럼 말해주면 바로 찾아줄게!",
            ),
            Self::FlowReset => (
                "죄송합니다. 처리 중 문제가 발생해 처음부터 다시 시작할게요. 원하시는 추천을 다시 말씀해 주세요.",
                "미안, 중간에 문제가 생겼어 ㅠㅠ 처음부터 다시 말해줄래?",
            ),
            Self::StreamInterrupted => (
                " 죄송합니다. 답변을 생성하는 중 문제가 발생했어요.",
                " 앗, 답변하다가 문제가 생겼어 ㅠㅠ",
            ),
            Self::TryAgainShortly => (
                "응답이 지연되고 있어요. 잠시 후 다시 시도해 주세요.",
                "지금 좀 느리네 ㅠㅠ 조금 있다가 다시 해줄래?",
            ),
            Self::UsageGuidance => (
                "사용량 정보를 확인하려면 로그인된 사용자 정보가 필요해요. 로그인 후 다시 요청해 주세요.",
                "사용량을 보려면 로그인이 필요해! 로그인하고 다시 물어봐줘~",
            ),
            Self::LikesGuidance => (
                "좋아하시는 서비스나 브랜드를 알려주시면 맞춤 추천을 드릴게요. 예: 넷플릭스, 스타벅스",
                "좋아하는 서비스나 브랜드 알려주면 딱 맞게 골라줄게! 넷플릭스나 스타벅스 같은 거!",
            ),
            Self::CatalogEmpty => (
                "지금은 추천할 수 있는 상품 정보를 불러오지 못했어요. 잠시 후 다시 시도해 주세요.",
                "지금 상품 정보를 못 불러왔어 ㅠㅠ 조금 이따 다시 해보자!",
            ),
        };
        tone.pick(formal, playful)
    }
}
