use serde_json::Value;
use tracing::{debug, info};

use crate::error::{PipelineError, Result};
use crate::settings::Settings;

/// Read the configured session log as UTF-8 text.
pub fn read_session(settings: &Settings) -> Result<String> {
    let path = settings.session_file()?;
    info!("Reading session log: {}", path.display());
    std::fs::read_to_string(&path).map_err(|source| PipelineError::ReadSession { path, source })
}

/// One event per non-blank line. Lines that are not JSON are dropped.
pub fn parse_events(content: &str) -> Vec<Value> {
    let mut events = Vec::new();
    for (n, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str(line) {
            Ok(v) => events.push(v),
            Err(e) => debug!("skipping line {}: {}", n + 1, e),
        }
    }
    events
}

/// Serialize events back to line-delimited JSON.
pub fn to_jsonl(events: &[Value]) -> Result<String> {
    let mut out = String::new();
    for event in events {
        out.push_str(&serde_json::to_string(event)?);
        out.push('\n');
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn skips_blank_and_broken_lines() {
        let content = "{\"type\":\"quest\"}\n\n   \nnot json\r\n{\"type\":\"loot\",\"data\":{}}\n{\"trailing\":";
        let events = parse_events(content);
        assert_eq!(events, vec![json!({"type": "quest"}), json!({"type": "loot", "data": {}})]);
    }

    #[test]
    fn jsonl_keeps_key_order() {
        let events = parse_events("{\"z\":1,\"a\":2}\n{\"type\":\"x\"}");
        assert_eq!(to_jsonl(&events).unwrap(), "{\"z\":1,\"a\":2}\n{\"type\":\"x\"}\n");
    }

    #[test]
    fn missing_file_is_fatal() {
        let settings = Settings {
            path_to_sessions: std::env::temp_dir().join("quest-enricher-does-not-exist"),
            realm: "Nowhere".into(),
            character_name: "Nobody".into(),
            session: "99".into(),
            base_url: "http://localhost/quest=".into(),
            concurrency: 1,
        };
        assert!(matches!(read_session(&settings), Err(PipelineError::ReadSession { .. })));
    }
}
