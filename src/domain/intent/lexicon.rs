//! Keyword sets used by the rule stage.
//!
//! Phrase sets are checked before the single-word sets of the same intent.
//! All entries are lowercase; utterances are lowercased before matching.

pub(super) const LAUGHTER_GLYPHS: &[char] = &['ㅋ', 'ㅎ', 'ㅠ', 'ㅜ', 'ㅡ', '~', '^', 'k'];

pub(super) const TEST_STRINGS: &[&str] = &[
    "test", "testing", "테스트", "asdf", "qwer", "qwerty", "ㅁㄴㅇㄹ", "ㅂㅈㄷㄱ", "1234", "abcd",
];

pub(super) const GREETING_WORDS: &[&str] = &[
    "안녕",
    "안녕하세요",
    "안녕하십니까",
    "하이",
    "헬로",
    "ㅎㅇ",
    "hi",
    "hello",
    "hey",
    "반가워",
    "반가워요",
    "반갑습니다",
    "좋은 아침",
];

pub(super) const ANSWER_VOCABULARY: &[&str] = &[
    "무제한", "많이", "보통", "적게", "조금", "거의", "상관없", "아무거나", "몰라", "모르겠",
    "자주", "가끔", "저렴", "적당", "유튜브", "넷플릭스", "음악", "영화", "드라마", "게임",
];

pub(super) const YES_NO: &[&str] = &[
    "네", "넵", "예", "응", "어", "ㅇㅇ", "ㄴㄴ", "아니", "아니요", "아뇨", "좋아", "싫어", "yes",
    "no", "ok", "okay",
];

pub(super) const ANSWER_SUFFIXES: &[&str] = &[
    "해요", "써요", "봐요", "없어요", "있어요", "돼요", "좋아요", "들어요", "편이에요",
];

pub(super) const REQUEST_VERBS: &[&str] = &["추천", "알려", "찾아", "보여", "바꾸", "변경"];

pub(super) const TECH_ISSUE_KEYWORDS: &[&str] = &[
    "안돼",
    "안 돼",
    "안되",
    "안 되",
    "오류",
    "에러",
    "버그",
    "먹통",
    "끊겨",
    "끊김",
    "느려",
    "안터",
    "안 터",
    "개통",
    "유심",
    "로그인",
    "error",
    "bug",
];

pub(super) const PLAN_PHRASES: &[&str] = &[
    "요금제 추천",
    "요금제 알려",
    "요금제 바꾸",
    "요금제 변경",
    "요금제 찾",
    "요금제 비교",
    "플랜 추천",
    "데이터 많은 요금",
    "싼 요금",
    "통신비 줄",
    "recommend a plan",
];

pub(super) const PLAN_WORDS: &[&str] = &["요금제", "플랜", "통신비", "데이터 요금", "plan"];

pub(super) const SUBSCRIPTION_PHRASES: &[&str] = &[
    "구독 추천",
    "구독 서비스",
    "구독 알려",
    "ott 추천",
    "볼만한 구독",
    "구독할 만한",
    "구독할만한",
];

pub(super) const SUBSCRIPTION_WORDS: &[&str] = &["구독", "ott", "subscription"];

pub(super) const USAGE_BASED_PHRASES: &[&str] = &[
    "사용량으로 추천",
    "사용량 기반",
    "사용량 보고",
    "사용량에 맞",
    "사용 패턴",
    "내 패턴",
    "쓰는 만큼",
];

pub(super) const LIKES_BASED_PHRASES: &[&str] = &[
    "좋아하는 브랜드",
    "좋아하는 서비스",
    "좋아하는 걸로",
    "관심 있는 브랜드",
    "취향",
    "좋아해",
];

pub(super) const CURRENT_USAGE_KEYWORDS: &[&str] = &[
    "사용량",
    "남은 데이터",
    "잔여",
    "얼마나 남",
    "이번 달",
    "내 요금",
    "얼마 썼",
];

pub(super) const PERSONALITY_KEYWORDS: &[&str] = &[
    "성향", "성격", "mbti", "ubti", "심리 테스트", "테스트 해", "유형 테스트", "나한테 맞는",
];

pub(super) const INTERESTING_TOPICS: &[&str] = &[
    "날씨", "영화", "음식", "여행", "음악", "연애", "운동", "게임", "맛집", "스포츠", "뉴스",
];

pub(super) const BORING_TOPICS: &[&str] = &[
    "심심", "지루", "졸려", "피곤", "할 거 없", "할게 없", "그냥", "배고파",
];

pub(super) const QUESTION_WORDS: &[&str] = &["뭐", "어떻게", "왜", "무엇", "언제", "어디"];

/// Returns true when any entry of `set` occurs in `text`.
pub(super) fn contains_any(text: &str, set: &[&str]) -> bool {
    set.iter().any(|entry| text.contains(entry))
}
