//! Pure step transition of the flow state machine.
//!
//! | From            | Utterance | To        |
//! |-----------------|-----------|-----------|
//! | idle            | any       | `Classify`|
//! | step k < N      | any       | `Ask(k+1)`|
//! | step N          | any       | `Complete`|
//! | step N + 1      | any       | idle, `Classify` |

use std::collections::BTreeMap;

use crate::domain::session::{FlowTag, RecommendationKind, SessionRecord};

/// What the controller must do after an utterance was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// The utterance must be classified as a fresh request.
    Classify,
    /// The answer was stored; ask question `step`.
    Ask { flow: FlowTag, step: u8 },
    /// The last answer was stored; recommend from `slots`.
    Complete {
        flow: FlowTag,
        slots: BTreeMap<String, String>,
    },
}

/// Applies an utterance to the session's flow state.
///
/// Inconsistent records and records left at completion are cleared and
/// the utterance is handed to classification.
pub fn advance(record: &mut SessionRecord, utterance: &str) -> Transition {
    record.normalize();

    let Some(flow) = record.flow else {
        return Transition::Classify;
    };
    let Some(slot) = record.pending_slot() else {
        record.clear_flow();
        return Transition::Classify;
    };

    record
        .slots
        .insert(slot.to_string(), utterance.trim().to_string());
    record.step += 1;

    if record.is_complete() {
        Transition::Complete {
            flow,
            slots: record.slots.clone(),
        }
    } else {
        Transition::Ask {
            flow,
            step: record.step,
        }
    }
}

/// Returns the session to idle after a recommendation was produced.
pub fn finish(record: &mut SessionRecord, kind: RecommendationKind) {
    record.clear_flow();
    record.last_kind = Some(kind);
}
