//! Question text for every flow step, in both tones.

use crate::domain::foundation::Tone;
use crate::domain::session::FlowTag;

struct Question {
    formal: &'static str,
    playful: &'static str,
}

const PLAN_QUESTIONS: [Question; 4] = [
    Question {
        formal: "데이터는 얼마나 사용하시나요?",
        playful: "데이터 얼마나 써? 많이 쓰는 편이야?",
    },
    Question {
        formal: "통화는 얼마나 하시나요?",
        playful: "통화는 자주 하는 편이야?",
    },
    Question {
        formal: "자주 이용하시는 서비스가 있으신가요? (예: 유튜브, 넷플릭스, 음악 스트리밍)",
        playful: "자주 쓰는 앱이나 서비스 있어? 유튜브나 넷플릭스 같은 거!",
    },
    Question {
        formal: "예산은 어느 정도로 생각하시나요?",
        playful: "한 달 요금은 얼마 정도까지 괜찮아?",
    },
];

const SUBSCRIPTION_QUESTIONS: [Question; 4] = [
    Question {
        formal: "주로 어떤 콘텐츠를 즐기시나요? (영화, 드라마, 음악, 책 등)",
        playful: "요즘 뭐 즐겨 봐? 영화, 드라마, 음악, 책 중에 골라봐!",
    },
    Question {
        formal: "주로 어떤 기기로 이용하시나요?",
        playful: "주로 폰으로 봐, 아니면 TV나 태블릿?",
    },
    Question {
        formal: "하루에 어느 정도 시간 동안 이용하시나요?",
        playful: "하루에 얼마나 보는 편이야?",
    },
    Question {
        formal: "특별히 선호하시는 서비스나 브랜드가 있으신가요?",
        playful: "특별히 좋아하는 서비스나 브랜드 있어?",
    },
];

const PERSONALITY_QUESTIONS: [Question; 4] = [
    Question {
        formal: "여유 시간이 생기면 주로 무엇을 하시나요?",
        playful: "시간 남으면 보통 뭐 해?",
    },
    Question {
        formal: "가장 즐기시는 취미는 무엇인가요?",
        playful: "제일 좋아하는 취미가 뭐야?",
    },
    Question {
        formal: "새로운 것과 익숙한 것 중 어느 쪽을 더 선호하시나요?",
        playful: "새로운 거랑 익숙한 거, 뭐가 더 좋아?",
    },
    Question {
        formal: "평소 소비 스타일은 어떠신가요? (알뜰형, 경험형 등)",
        playful: "돈 쓸 때 스타일이 어때? 아끼는 편이야, 경험에 쓰는 편이야?",
    },
];

/// Text of question `step` (1-based) of `flow`, or `None` past the end.
pub fn question(flow: FlowTag, step: u8, tone: Tone) -> Option<&'static str> {
    let questions: &[Question] = match flow {
        FlowTag::Plan => &PLAN_QUESTIONS,
        FlowTag::Subscription => &SUBSCRIPTION_QUESTIONS,
        FlowTag::Personality => &PERSONALITY_QUESTIONS,
    };
    let index = usize::from(step).checked_sub(1)?;
    questions
        .get(index)
        .map(|q| tone.pick(q.formal, q.playful))
}
