pub mod extract;
pub mod text;

use crate::record::{ErrorRecord, QuestContext};

pub const MISSING_HTML: &str = "Missing or invalid HTML";

/// Parse one quest page. Absent or empty input gives an error record;
/// anything else gives a quest record, however little was recognized.
pub fn parse_quest_html(html: Option<&str>) -> QuestContext {
    match html {
        Some(html) if !html.is_empty() => {
            QuestContext::Quest(Box::new(extract::extract_all(html)))
        }
        _ => QuestContext::Error(ErrorRecord::new(MISSING_HTML)),
    }
}

/// Raw response body variant: bytes that are not UTF-8 count as "not text".
pub fn parse_quest_bytes(body: &[u8]) -> QuestContext {
    parse_quest_html(std::str::from_utf8(body).ok())
}

// ── Tests ──
