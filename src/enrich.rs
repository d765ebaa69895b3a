use std::collections::{HashMap, HashSet};

use serde_json::Value;

use crate::error::Result;
use crate::record::QuestContext;

const QUEST_ACTIONS: &[&str] = &["accepted", "turned_in"];

/// Distinct quest ids from accepted/turned-in quest events, first-seen order.
pub fn collect_quest_ids(events: &[Value]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut ids = Vec::new();

    for event in events {
        if event.get("type").and_then(Value::as_str) != Some("quest") {
            continue;
        }
        let Some(data) = event.get("data") else {
            continue;
        };
        let action = data.get("action").and_then(Value::as_str);
        if !action.is_some_and(|a| QUEST_ACTIONS.contains(&a)) {
            continue;
        }
        let Some(id) = data.get("questID").and_then(id_text) else {
            continue;
        };
        if seen.insert(id.clone()) {
            ids.push(id);
        }
    }

    ids
}

/// Attach `data.questContext` to every quest event that carries a quest id.
/// Unmatched ids get `null`; all other events pass through untouched.
pub fn attach_quest_context(events: Vec<Value>, quests: &[QuestContext]) -> Result<Vec<Value>> {
    let mut by_id: HashMap<String, Value> = HashMap::new();
    for quest in quests {
        if let Some(key) = quest.join_key() {
            by_id.insert(key, serde_json::to_value(quest)?);
        }
    }

    let enriched = events
        .into_iter()
        .map(|mut event| {
            if event.get("type").and_then(Value::as_str) != Some("quest") {
                return event;
            }
            let key = event
                .get("data")
                .and_then(|d| d.get("questID"))
                .filter(|id| !id.is_null())
                .map(|id| id_text(id).unwrap_or_else(|| id.to_string()));
            if let (Some(key), Some(data)) = (key, event.get_mut("data").and_then(Value::as_object_mut)) {
                let context = by_id.get(&key).cloned().unwrap_or(Value::Null);
                data.insert("questContext".to_string(), context);
            }
            event
        })
        .collect();

    Ok(enriched)
}

/// Numbers and strings become text ids; anything else is not an id.
fn id_text(v: &Value) -> Option<String> {
    match v {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.clone()),
        _ => None,
    }
}

// ── Tests ──
