//! Session record and its invariants.
//!
//! # Invariants
//!
//! - `flow.is_some()` if and only if `step > 0`
//! - `step <= flow.len() + 1`
//! - every slot key belongs to some flow's slot list
//! - `history.len()` never exceeds the configured pair count

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Number of user/assistant pairs kept by default.
pub const DEFAULT_HISTORY_PAIRS: usize = 5;

/// Question flow a session can be in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowTag {
    #[serde(alias = "plan_flow")]
    Plan,
    #[serde(alias = "subscription_flow")]
    Subscription,
    #[serde(alias = "ubti", alias = "personality_flow")]
    Personality,
}

impl FlowTag {
    /// Every flow, in declaration order.
    pub const ALL: [FlowTag; 3] = [FlowTag::Plan, FlowTag::Subscription, FlowTag::Personality];

    /// Slot names in question order.
    pub fn slot_names(&self) -> &'static [&'static str] {
        match self {
            Self::Plan => &["data_usage", "call_usage", "services", "budget"],
            Self::Subscription => &["content_type", "device_usage", "time_usage", "preference"],
            Self::Personality => &["situation", "hobby", "preference", "style"],
        }
    }

    /// Number of questions in the flow.
    pub fn len(&self) -> u8 {
        self.slot_names().len() as u8
    }

    /// Kind of card produced when the flow completes.
    pub fn completion_kind(&self) -> RecommendationKind {
        match self {
            Self::Plan => RecommendationKind::Plan,
            Self::Subscription | Self::Personality => RecommendationKind::Subscription,
        }
    }

    /// Returns true when `name` is a slot of any flow.
    pub fn is_known_slot(name: &str) -> bool {
        Self::ALL.iter().any(|flow| flow.slot_names().contains(&name))
    }
}

/// Kind of the last completed recommendation; selects the card schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    Plan,
    Subscription,
}

/// One user/assistant exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub user: String,
    pub assistant: String,
}

/// Dialog state of one session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionRecord {
    pub flow: Option<FlowTag>,
    /// 0 is idle, k means question k was asked, `len + 1` means complete.
    pub step: u8,
    pub slots: BTreeMap<String, String>,
    pub history: Vec<Turn>,
    pub last_kind: Option<RecommendationKind>,
}

impl SessionRecord {
    /// Returns true when no flow is active.
    pub fn is_idle(&self) -> bool {
        self.flow.is_none()
    }

    /// Returns true when every answer of the active flow has been collected.
    pub fn is_complete(&self) -> bool {
        self.flow.is_some_and(|flow| self.step > flow.len())
    }

    /// Enters `flow` at question 1, discarding previous answers.
    pub fn start_flow(&mut self, flow: FlowTag) {
        self.flow = Some(flow);
        self.step = 1;
        self.slots.clear();
    }

    /// Returns to idle, discarding answers. History and last kind are kept.
    pub fn clear_flow(&mut self) {
        self.flow = None;
        self.step = 0;
        self.slots.clear();
    }

    /// Slot awaiting an answer at the current step.
    pub fn pending_slot(&self) -> Option<&'static str> {
        let flow = self.flow?;
        let index = usize::from(self.step).checked_sub(1)?;
        flow.slot_names().get(index).copied()
    }

    /// Appends an exchange, keeping the last `max_pairs` of them.
    pub fn push_turn(&mut self, user: impl Into<String>, assistant: impl Into<String>, max_pairs: usize) {
        self.history.push(Turn {
            user: user.into(),
            assistant: assistant.into(),
        });
        self.truncate_history(max_pairs);
    }

    /// Drops the oldest exchanges beyond `max_pairs`.
    pub fn truncate_history(&mut self, max_pairs: usize) {
        if self.history.len() > max_pairs {
            let excess = self.history.len() - max_pairs;
            self.history.drain(..excess);
        }
    }

    /// Removes slot keys that belong to no flow.
    pub fn retain_known_slots(&mut self) {
        self.slots.retain(|name, _| FlowTag::is_known_slot(name));
    }

    /// Checks the flow/step invariants.
    pub fn is_consistent(&self) -> bool {
        match self.flow {
            None => self.step == 0,
            Some(flow) => self.step >= 1 && self.step <= flow.len() + 1,
        }
    }

    /// Repairs a record that violates the flow/step invariants by
    /// clearing its flow. Returns true when a repair happened.
    pub fn normalize(&mut self) -> bool {
        if self.is_consistent() {
            return false;
        }
        self.clear_flow();
        true
    }
}
