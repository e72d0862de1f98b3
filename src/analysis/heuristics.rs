//! Rule-based deck advice derived from a [`StatisticsSnapshot`].
//!
//! Every rule is evaluated on its own and all matching rules fire; the output
//! keeps rule order.

use crate::config;
use crate::models::{Advisory, AdvisoryKind, Priority, StatisticsSnapshot};

/// Produce advisories for a deck's statistics.
pub fn recommend(stats: &StatisticsSnapshot) -> Vec<Advisory> {
    let rules: [fn(&StatisticsSnapshot) -> Option<Advisory>; 2] = [deck_size_rule, mana_base_rule];
    rules
        .iter()
        .filter_map(|rule| rule(stats))
        .collect()
}

/// Number of lands a deck of `total_cards` should run.
pub fn land_target(total_cards: u32) -> u32 {
    (config::LAND_RATIO * f64::from(total_cards)).floor() as u32
}

fn deck_size_rule(stats: &StatisticsSnapshot) -> Option<Advisory> {
    if stats.total_cards >= config::MIN_DECK_SIZE {
        return None;
    }
    let missing = config::MIN_DECK_SIZE - stats.total_cards;
    Some(Advisory {
        kind: AdvisoryKind::Warning,
        message: format!("Deck needs {} more cards to be legal", missing),
        reason: "Minimum deck size requirement".to_string(),
        priority: Priority::High,
    })
}

fn mana_base_rule(stats: &StatisticsSnapshot) -> Option<Advisory> {
    let target = land_target(stats.total_cards);
    if stats.lands >= target {
        return None;
    }
    Some(Advisory {
        kind: AdvisoryKind::Add,
        message: format!("Add {} more lands", target - stats.lands),
        reason: "Insufficient mana base".to_string(),
        priority: Priority::High,
    })
}
