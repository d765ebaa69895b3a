use std::sync::LazyLock;

use regex::Regex;

use crate::parser::text::decode_entities;
use crate::record::ReputationReward;

static REP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:<span[^>]*>)?(\d+)(?:</span>)?\s*reputation with\s*<a[^>]*>([^<]+)<").unwrap()
});

const GAINS_MARKER: &str = "Gains</h2>";

/// Every "N reputation with <faction>" after the "Gains" heading, in page
/// order. Repeated factions stay separate entries.
pub fn extract(html: &str) -> Vec<ReputationReward> {
    let Some(idx) = html.find(GAINS_MARKER) else {
        return Vec::new();
    };
    let section = &html[idx + GAINS_MARKER.len()..];

    REP_RE
        .captures_iter(section)
        .filter_map(|caps| {
            Some(ReputationReward {
                amount: caps[1].parse().ok()?,
                faction: decode_entities(caps[2].trim()),
            })
        })
        .collect()
}
