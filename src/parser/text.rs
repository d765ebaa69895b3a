use std::sync::LazyLock;

use regex::Regex;

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());
static WS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Replacement order matters: `&amp;` runs after `&lt;`/`&gt;`, so
/// double-encoded input comes out single-encoded rather than fully decoded.
const ENTITIES: &[(&str, &str)] = &[
    ("&apos;", "'"),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&amp;", "&"),
    ("&quot;", "\""),
];

/// Single left-to-right pass over a fixed entity set. Not recursive.
pub fn decode_entities(s: &str) -> String {
    ENTITIES
        .iter()
        .fold(s.to_string(), |acc, (from, to)| acc.replace(from, to))
}

/// Replace every tag with a space, collapse whitespace runs, trim.
pub fn strip_html(s: &str) -> String {
    let spaced = TAG_RE.replace_all(s, " ");
    WS_RE.replace_all(&spaced, " ").trim().to_string()
}

/// Shared strip → decode → trim used by the section extractors.
/// Empty output maps to `None`.
pub fn clean_fragment(s: &str) -> Option<String> {
    let text = decode_entities(&strip_html(s)).trim().to_string();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Leading-integer parse in the spirit of a lenient number read:
/// optional sign, digits, anything after is ignored.
pub fn parse_leading_int(s: &str) -> Option<i64> {
    let t = s.trim_start();
    let (sign, rest) = match t.strip_prefix('-') {
        Some(r) => (-1, r),
        None => (1, t.strip_prefix('+').unwrap_or(t)),
    };
    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse::<i64>().ok().map(|n| n * sign)
}

// ── Tests ──
