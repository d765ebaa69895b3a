use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use tracing::debug;

use crate::parser::text::decode_entities;

static LD_JSON_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<script type="application/ld\+json">\s*(\{.*?\})\s*</script>"#).unwrap()
});
static TITLE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<title>([^<]+)</title>").unwrap());
static TITLE_SUFFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s*-\s*Quest\s*-\s*.*$").unwrap());
static META_DESC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<meta name="description" content="([^"]*)""#).unwrap());

#[derive(Debug, Default, PartialEq, Eq)]
pub struct Summary {
    pub title: Option<String>,
    pub description: Option<String>,
}

/// Title and short description. Structured data first, then `<title>` and
/// the description meta tag; each field falls back on its own.
pub fn extract(html: &str) -> Summary {
    let mut out = from_structured_data(html);

    if out.title.is_none() {
        out.title = TITLE_RE.captures(html).and_then(|caps| {
            let bare = TITLE_SUFFIX_RE.replace(&caps[1], "");
            non_empty(decode_entities(bare.trim()))
        });
    }
    if out.description.is_none() {
        out.description = META_DESC_RE
            .captures(html)
            .and_then(|caps| non_empty(decode_entities(&caps[1])));
    }

    out
}

fn from_structured_data(html: &str) -> Summary {
    let Some(caps) = LD_JSON_RE.captures(html) else {
        return Summary::default();
    };
    let ld: Value = match serde_json::from_str(caps[1].trim()) {
        Ok(v) => v,
        Err(e) => {
            debug!("structured data block is not valid JSON: {}", e);
            return Summary::default();
        }
    };
    let field = |key: &str| ld.get(key).and_then(scalar_text).map(|s| decode_entities(&s));
    Summary {
        title: field("name"),
        description: field("description"),
    }
}

/// Non-empty strings, non-zero numbers and `true` read as text; anything
/// else is absent.
fn scalar_text(v: &Value) -> Option<String> {
    match v {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        Value::Bool(true) => Some("true".to_string()),
        _ => None,
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structured_data_wins() {
        let html = r#"<title>Other - Quest - TBC</title>
<script type="application/ld+json">{"name":"Test Quest","description":"A level 20 Elwynn Forest Quest"}</script>"#;
        let s = extract(html);
        assert_eq!(s.title.as_deref(), Some("Test Quest"));
        assert_eq!(s.description.as_deref(), Some("A level 20 Elwynn Forest Quest"));
    }

    #[test]
    fn structured_data_is_decoded() {
        let html = r#"<script type="application/ld+json">
  {"name":"Hogger&apos;s Bane","description":"Kill &lt;Hogger&gt;"}
</script>"#;
        let s = extract(html);
        assert_eq!(s.title.as_deref(), Some("Hogger's Bane"));
        assert_eq!(s.description.as_deref(), Some("Kill <Hogger>"));
    }

    #[test]
    fn title_and_meta_fallback() {
        let html = r#"<head><title>Test Quest - Quest - Classic</title>
<meta name="description" content="Bring &quot;wolf meat&quot; to Bob."></head>"#;
        let s = extract(html);
        assert_eq!(s.title.as_deref(), Some("Test Quest"));
        assert_eq!(s.description.as_deref(), Some("Bring \"wolf meat\" to Bob."));
    }

    #[test]
    fn title_suffix_case_insensitive() {
        let s = extract("<title>The Defias Brotherhood - QUEST - World of Warcraft</title>");
        assert_eq!(s.title.as_deref(), Some("The Defias Brotherhood"));
    }

    #[test]
    fn fields_fall_back_independently() {
        let html = r#"<script type="application/ld+json">{"name":"Only Name"}</script>
<title>Ignored - Quest - TBC</title>
<meta name="description" content="From meta">"#;
        let s = extract(html);
        assert_eq!(s.title.as_deref(), Some("Only Name"));
        assert_eq!(s.description.as_deref(), Some("From meta"));
    }

    #[test]
    fn broken_structured_data_falls_back() {
        let html = r#"<script type="application/ld+json">{"name": oops}</script><title>Plain</title>"#;
        let s = extract(html);
        assert_eq!(s.title.as_deref(), Some("Plain"));
        assert_eq!(s.description, None);
    }

    #[test]
    fn scalar_structured_fields_read_as_text() {
        let html = r#"<script type="application/ld+json">{"name":1984,"description":{"text":"x"}}</script>
<meta name="description" content="From meta">"#;
        let s = extract(html);
        assert_eq!(s.title.as_deref(), Some("1984"));
        assert_eq!(s.description.as_deref(), Some("From meta"));
    }

    #[test]
    fn nothing_found() {
        assert_eq!(extract("<p>no head</p>"), Summary::default());
    }
}
