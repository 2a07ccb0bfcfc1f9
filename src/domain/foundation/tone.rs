//! Presentation tone threaded through questions, canned replies and prompts.

use serde::{Deserialize, Serialize};

/// Presentation-only style selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    /// Polite, honorific register.
    #[default]
    Formal,
    /// Casual register with emoji.
    Playful,
}

impl Tone {
    /// Parses a tone tag, falling back to `Formal` for unknown values.
    pub fn parse_lenient(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "playful" | "casual" | "muneoz" => Self::Playful,
            _ => Self::Formal,
        }
    }

    /// Picks the variant of a templated string matching this tone.
    pub fn pick<'a>(&self, formal: &'a str, playful: &'a str) -> &'a str {
        match self {
            Self::Formal => formal,
            Self::Playful => playful,
        }
    }

    /// Style instruction appended to model prompts.
    pub fn prompt_directive(&self) -> &'static str {
        match self {
            Self::Formal => "정중한 존댓말로, 간결하고 신뢰감 있게 답변하세요.",
            Self::Playful => "친근한 반말로, 이모지를 적당히 섞어 밝게 답변하세요.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_tone_is_formal() {
        assert_eq!(Tone::default(), Tone::Formal);
    }

    #[test]
    fn parses_known_and_unknown_tags() {
        assert_eq!(Tone::parse_lenient("playful"), Tone::Playful);
        assert_eq!(Tone::parse_lenient(" PLAYFUL "), Tone::Playful);
        assert_eq!(Tone::parse_lenient("formal"), Tone::Formal);
        assert_eq!(Tone::parse_lenient("pirate"), Tone::Formal);
    }

    #[test]
    fn deserializes_lowercase() {
        let tone: Tone = serde_json::from_str("\"playful\"").unwrap();
        assert_eq!(tone, Tone::Playful);
    }

    #[test]
    fn pick_selects_by_tone() {
        assert_eq!(Tone::Formal.pick("a", "b"), "a");
        assert_eq!(Tone::Playful.pick("a", "b"), "b");
    }
}
