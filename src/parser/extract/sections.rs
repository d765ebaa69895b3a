use std::sync::LazyLock;

use regex::Regex;

use crate::parser::text::clean_fragment;

static DESCRIPTION_HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<h2[^>]*>\s*Description\s*</h2>\s*").unwrap());
static ANY_HEADING_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<h2[^>]*>").unwrap());
static COMPLETION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<h2[^>]*>.*?Completion.*?</h2>.*?<div[^>]*id="[^"]*-completion"[^>]*>(.*?)</div>"#)
        .unwrap()
});

#[derive(Debug, Default, PartialEq, Eq)]
pub struct Sections {
    pub description_long: Option<String>,
    pub completion_text: Option<String>,
}

pub fn extract(html: &str) -> Sections {
    Sections {
        description_long: description_long(html),
        completion_text: completion_text(html),
    }
}

/// Everything after the "Description" heading up to the next `<h2>` or the
/// end of the document.
fn description_long(html: &str) -> Option<String> {
    let heading = DESCRIPTION_HEADING_RE.find(html)?;
    let rest = &html[heading.end()..];
    let body = match ANY_HEADING_RE.find(rest) {
        Some(next) => &rest[..next.start()],
        None => rest,
    };
    clean_fragment(body)
}

fn completion_text(html: &str) -> Option<String> {
    let caps = COMPLETION_RE.captures(html)?;
    clean_fragment(&caps[1])
}
