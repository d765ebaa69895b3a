use std::sync::LazyLock;

use regex::Regex;

use crate::parser::text::decode_entities;
use crate::record::NpcRef;

static INFOBOX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"WH\.markup\.printHtml\s*\(\s*"((?:[^"\\]|\\.)*)"\s*,\s*"infobox-contents-0""#)
        .unwrap()
});
static LEVEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\[li\]Level:\s*(\d+)\[/li\]").unwrap());
static REQ_LEVEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\[li\]Requires level\s*(\d+)\[/li\]").unwrap());
static HORDE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\[span[^\]]*icon-horde[^\]]*\]([^\[]+)\[/span\]").unwrap());
static ALLIANCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\[span[^\]]*icon-alliance[^\]]*\]([^\[]+)\[/span\]").unwrap()
});
static START_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\[icon name=quest-start\]Start:\s*\[url=/(?:[\w-]+/)?npc=(\d+)/[^\]]+\]([^\[]+)\[/url\]")
        .unwrap()
});
static END_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\[icon name=quest-end\]End:\s*\[url=/(?:[\w-]+/)?npc=(\d+)/[^\]]+\]([^\[]+)\[/url\]")
        .unwrap()
});
static SHARABLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\[li\]Sharable\[/li\]").unwrap());
// The acronym attribute keeps its \" escapes after unescaping.
static PATCH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)Added in patch \[acronym=\\?"[^"\\]*\\?"\]([^\[]+)\[/acronym\]"#).unwrap()
});

#[derive(Debug, Default, PartialEq, Eq)]
pub struct Infobox {
    pub level: Option<i64>,
    pub required_level: Option<i64>,
    pub side: Option<String>,
    pub start_npc: NpcRef,
    pub end_npc: NpcRef,
    pub sharable: bool,
    pub patch: Option<String>,
}

/// Infobox markup is passed to the page's renderer as an escaped string
/// literal; only `\/` and `\'` are unescaped before scanning.
pub fn extract(html: &str) -> Infobox {
    let Some(caps) = INFOBOX_RE.captures(html) else {
        return Infobox::default();
    };
    let markup = caps[1].replace("\\/", "/").replace("\\'", "'");
    scan_markup(&markup)
}

fn scan_markup(markup: &str) -> Infobox {
    // Horde is tested first; the two never co-occur on a well-formed page.
    let side = HORDE_RE
        .captures(markup)
        .or_else(|| ALLIANCE_RE.captures(markup))
        .map(|c| c[1].trim().to_string());

    let patch = PATCH_RE.captures(markup).map(|c| c[1].trim().to_string());

    Infobox {
        level: int_at(&LEVEL_RE, markup),
        required_level: int_at(&REQ_LEVEL_RE, markup),
        side,
        start_npc: npc_link(&START_RE, markup),
        end_npc: npc_link(&END_RE, markup),
        sharable: SHARABLE_RE.is_match(markup),
        patch,
    }
}

fn int_at(re: &Regex, markup: &str) -> Option<i64> {
    re.captures(markup).and_then(|c| c[1].parse().ok())
}

fn npc_link(re: &Regex, markup: &str) -> NpcRef {
    match re.captures(markup) {
        Some(c) => NpcRef {
            id: c[1].parse().ok(),
            name: Some(decode_entities(c[2].trim())),
        },
        None => NpcRef::default(),
    }
}
