use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;

use crate::parser::text::decode_entities;
use crate::record::ItemReward;

static ICON_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"g_items\.createIcon\((\d+),\s*(\d+)").unwrap());
static ITEM_LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"href="/(?:[\w-]+/)?item=(\d+)/[^"]*"[^>]*>([^<]+)<"#).unwrap()
});

const REWARDS_MARKER: &str = "Rewards</h2>";
/// Window length in characters, counted from the start of the marker.
/// Anything past it is never seen.
pub const REWARDS_WINDOW_CHARS: usize = 4000;

/// Item rewards from the bounded window after the "Rewards" heading.
///
/// Icon calls are the primary source. Only when none survive are the item
/// links read directly, with quantities looked up across the whole page.
pub fn extract(html: &str) -> Vec<ItemReward> {
    let Some(window) = rewards_window(html) else {
        return Vec::new();
    };

    let items = from_icons(window);
    if !items.is_empty() {
        return items;
    }
    from_links(window, html)
}

fn rewards_window(html: &str) -> Option<&str> {
    let idx = html.find(REWARDS_MARKER)?;
    let start = idx + REWARDS_MARKER.len();
    let end = html[idx..]
        .char_indices()
        .nth(REWARDS_WINDOW_CHARS)
        .map(|(i, _)| idx + i)
        .unwrap_or(html.len());
    Some(&html[start..end.max(start)])
}

fn from_icons(window: &str) -> Vec<ItemReward> {
    let names = link_names(window);
    let mut seen = HashSet::new();
    let mut items = Vec::new();

    for caps in ICON_RE.captures_iter(window) {
        let (Ok(item_id), Ok(quantity)) = (caps[1].parse::<i64>(), caps[2].parse::<i64>()) else {
            continue;
        };
        // A zero-quantity icon does not claim the id.
        if quantity < 1 || !seen.insert(item_id) {
            continue;
        }
        items.push(ItemReward {
            item_id,
            quantity,
            name: names.get(&item_id).cloned(),
        });
    }

    items
}

fn from_links(window: &str, html: &str) -> Vec<ItemReward> {
    let quantities = icon_quantities(html);
    let mut seen = HashSet::new();
    let mut items = Vec::new();

    for caps in ITEM_LINK_RE.captures_iter(window) {
        let Ok(item_id) = caps[1].parse::<i64>() else {
            continue;
        };
        if !seen.insert(item_id) {
            continue;
        }
        let quantity = quantities.get(&item_id).copied().unwrap_or(1);
        if quantity < 1 {
            continue;
        }
        items.push(ItemReward {
            item_id,
            quantity,
            name: Some(decode_entities(caps[2].trim())),
        });
    }

    items
}

/// First link text per item id.
fn link_names(text: &str) -> HashMap<i64, String> {
    let mut names = HashMap::new();
    for caps in ITEM_LINK_RE.captures_iter(text) {
        if let Ok(id) = caps[1].parse::<i64>() {
            names
                .entry(id)
                .or_insert_with(|| decode_entities(caps[2].trim()));
        }
    }
    names
}

/// First icon-call quantity per item id, zero quantities included.
fn icon_quantities(text: &str) -> HashMap<i64, i64> {
    let mut quantities = HashMap::new();
    for caps in ICON_RE.captures_iter(text) {
        if let (Ok(id), Ok(qty)) = (caps[1].parse::<i64>(), caps[2].parse::<i64>()) {
            quantities.entry(id).or_insert(qty);
        }
    }
    quantities
}
