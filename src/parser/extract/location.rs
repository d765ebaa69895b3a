use std::sync::LazyLock;

use regex::Regex;

static LOCATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)A level \d+ (\w+(?:\s+\w+)*) Quest").unwrap());

/// Zone name from a short description like "A level 20 Elwynn Forest Quest".
pub fn extract(description: &str) -> Option<String> {
    LOCATION_RE
        .captures(description)
        .map(|caps| caps[1].trim().to_string())
}
