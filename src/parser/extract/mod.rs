pub mod identity;
pub mod infobox;
pub mod items;
pub mod location;
pub mod reputation;
pub mod scaling;
pub mod sections;
pub mod summary;

use crate::record::{QuestRecord, Rewards};

/// Run every extractor over the same page and merge the parts.
/// Only location reads another extractor's output (the short description).
pub fn extract_all(html: &str) -> QuestRecord {
    let quest_id = identity::extract(html);
    let summary = summary::extract(html);
    let infobox = infobox::extract(html);
    let scaling = scaling::extract(html);
    let sections = sections::extract(html);
    let items = items::extract(html);
    let reputation = reputation::extract(html);
    let location = summary.description.as_deref().and_then(location::extract);

    QuestRecord {
        quest_id,
        title: summary.title,
        description: summary.description,
        description_long: sections.description_long,
        completion_text: sections.completion_text,
        level: infobox.level,
        required_level: infobox.required_level,
        side: infobox.side,
        start_npc: infobox.start_npc,
        end_npc: infobox.end_npc,
        sharable: infobox.sharable,
        patch: infobox.patch,
        location,
        rewards: Rewards {
            xp: scaling.xp,
            money: scaling.money,
            items,
            reputation,
        },
    }
}
