use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use tracing::debug;

static PAGE_INFO_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<script[^>]+id="data\.page\.info"[^>]*>([^<]+)</script>"#).unwrap()
});

/// Entity-type code the page-info block uses for quests.
const QUEST_ENTITY_TYPE: i64 = 5;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageInfo {
    entity_type: Option<i64>,
    entity_id: Option<i64>,
}

/// Quest id from the page-info block. Other entity types yield `None`.
pub fn extract(html: &str) -> Option<i64> {
    let caps = PAGE_INFO_RE.captures(html)?;
    let info: PageInfo = match serde_json::from_str(caps[1].trim()) {
        Ok(info) => info,
        Err(e) => {
            debug!("page info block is not valid JSON: {}", e);
            return None;
        }
    };
    if info.entity_type == Some(QUEST_ENTITY_TYPE) {
        info.entity_id
    } else {
        None
    }
}
