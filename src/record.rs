use serde::Serialize;

/// NPC reference taken from an infobox Start:/End: link.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NpcRef {
    pub id: Option<i64>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemReward {
    pub item_id: i64,
    pub quantity: i64,
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReputationReward {
    pub faction: String,
    pub amount: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Rewards {
    pub xp: Option<i64>,
    pub money: Option<i64>,
    pub items: Vec<ItemReward>,
    pub reputation: Vec<ReputationReward>,
}

/// One parsed quest page. Every scalar defaults to `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestRecord {
    #[serde(rename = "questID")]
    pub quest_id: Option<i64>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub description_long: Option<String>,
    pub completion_text: Option<String>,
    pub level: Option<i64>,
    pub required_level: Option<i64>,
    pub side: Option<String>,
    pub start_npc: NpcRef,
    pub end_npc: NpcRef,
    pub sharable: bool,
    pub patch: Option<String>,
    pub location: Option<String>,
    pub rewards: Rewards,
}

/// Returned in place of a `QuestRecord` when there is no usable input text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorRecord {
    /// Requested identifier, set by the fetch stage only.
    #[serde(rename = "questID", skip_serializing_if = "Option::is_none")]
    pub quest_id: Option<String>,
    pub error: String,
    pub raw: Option<String>,
}

impl ErrorRecord {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            quest_id: None,
            error: error.into(),
            raw: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum QuestContext {
    Quest(Box<QuestRecord>),
    Error(ErrorRecord),
}

impl QuestContext {
    pub fn as_quest(&self) -> Option<&QuestRecord> {
        match self {
            QuestContext::Quest(q) => Some(q),
            QuestContext::Error(_) => None,
        }
    }

    /// Identifier used to join this context back into the event log.
    /// Quest records only ever use the parsed id.
    pub fn join_key(&self) -> Option<String> {
        match self {
            QuestContext::Quest(q) => q.quest_id.map(|id| id.to_string()),
            QuestContext::Error(e) => e.quest_id.clone(),
        }
    }
}

// ── Tests ──
