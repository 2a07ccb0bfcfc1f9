//! Compact wire form of a session record.
//!
//! Field names are shortened on write and expanded on read. Records written
//! under older key names are migrated on read; the caller rewrites them
//! when [`Decoded::needs_rewrite`] is set.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use super::record::{FlowTag, RecommendationKind, SessionRecord, Turn};

/// Older top-level keys and the short key each maps to.
const LEGACY_KEYS: [(&str, &str); 10] = [
    ("flow", "f"),
    ("flow_type", "f"),
    ("step", "s"),
    ("plan_step", "s"),
    ("slots", "a"),
    ("user_answers", "a"),
    ("history", "h"),
    ("chat_history", "h"),
    ("last_kind", "k"),
    ("last_recommendation_type", "k"),
];

/// Older slot names and their canonical names.
const LEGACY_SLOTS: [(&str, &str); 8] = [
    ("data", "data_usage"),
    ("call", "call_usage"),
    ("voice", "call_usage"),
    ("service", "services"),
    ("price", "budget"),
    ("content", "content_type"),
    ("device", "device_usage"),
    ("time", "time_usage"),
];

#[derive(Debug, Default, Serialize, Deserialize)]
struct WireRecord {
    #[serde(rename = "f", default, skip_serializing_if = "Option::is_none")]
    flow: Option<FlowTag>,
    #[serde(rename = "s", default, skip_serializing_if = "is_zero")]
    step: u8,
    #[serde(rename = "a", default, skip_serializing_if = "BTreeMap::is_empty")]
    slots: BTreeMap<String, String>,
    #[serde(rename = "h", default, skip_serializing_if = "Vec::is_empty")]
    history: Vec<WireTurn>,
    #[serde(rename = "k", default, skip_serializing_if = "Option::is_none")]
    last_kind: Option<RecommendationKind>,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireTurn {
    #[serde(rename = "u", alias = "user")]
    user: String,
    #[serde(rename = "a", alias = "assistant")]
    assistant: String,
}

fn is_zero(step: &u8) -> bool {
    *step == 0
}

/// Result of reading a stored record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    pub record: SessionRecord,
    /// True when legacy keys were migrated or invariants repaired.
    pub needs_rewrite: bool,
}

/// Serializes the essential fields of `record` in compact form.
///
/// Unknown slots are stripped and history is cut to `max_pairs`.
pub fn encode(record: &SessionRecord, max_pairs: usize) -> Result<String, serde_json::Error> {
    let skip = record.history.len().saturating_sub(max_pairs);
    let wire = WireRecord {
        flow: record.flow,
        step: record.step,
        slots: record
            .slots
            .iter()
            .filter(|(name, _)| FlowTag::is_known_slot(name))
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect(),
        history: record
            .history
            .iter()
            .skip(skip)
            .map(|turn| WireTurn {
                user: turn.user.clone(),
                assistant: turn.assistant.clone(),
            })
            .collect(),
        last_kind: record.last_kind,
    };
    serde_json::to_string(&wire)
}

/// Parses a stored record, migrating legacy keys and repairing invariants.
pub fn decode(raw: &str) -> Result<Decoded, serde_json::Error> {
    let mut value: Value = serde_json::from_str(raw)?;
    let mut migrated = false;

    if let Value::Object(map) = &mut value {
        migrated |= migrate_top_level(map);
        if let Some(Value::Object(slots)) = map.get_mut("a") {
            migrated |= migrate_slots(slots);
        }
    }

    let wire: WireRecord = serde_json::from_value(value)?;
    let mut record = SessionRecord {
        flow: wire.flow,
        step: wire.step,
        slots: wire.slots,
        history: wire
            .history
            .into_iter()
            .map(|turn| Turn {
                user: turn.user,
                assistant: turn.assistant,
            })
            .collect(),
        last_kind: wire.last_kind,
    };

    let slot_count = record.slots.len();
    record.retain_known_slots();
    let stripped = record.slots.len() != slot_count;
    let repaired = record.normalize();

    Ok(Decoded {
        record,
        needs_rewrite: migrated || stripped || repaired,
    })
}

fn migrate_top_level(map: &mut Map<String, Value>) -> bool {
    let mut migrated = false;
    for (legacy, short) in LEGACY_KEYS {
        if let Some(value) = map.remove(legacy) {
            migrated = true;
            map.entry(short).or_insert(value);
        }
    }
    migrated
}

fn migrate_slots(slots: &mut Map<String, Value>) -> bool {
    let mut migrated = false;
    for (legacy, canonical) in LEGACY_SLOTS {
        if let Some(value) = slots.remove(legacy) {
            migrated = true;
            slots.entry(canonical).or_insert(value);
        }
    }
    migrated
}
