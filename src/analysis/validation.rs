//! Constructed-format legality checks.
//!
//! These are advisory: the deck model accepts any composition, and the
//! checks only report what a tournament would reject, plus mana-base
//! warnings for land counts and color sources.

use std::collections::{BTreeMap, HashSet};

use crate::catalog::CardLookup;
use crate::config;
use crate::models::{DeckComposition, ValidationIssue, ValidationRule, Zone};

/// List every rule the deck currently breaks.
///
/// Ids the catalog cannot resolve are only counted toward deck and sideboard
/// size; copy limits and color identity need the card itself.
pub fn validate<L>(deck: &DeckComposition, lookup: &L) -> Vec<ValidationIssue>
where
    L: CardLookup + ?Sized,
{
    let mut issues = Vec::new();

    let main_total = deck.total(Zone::Mainboard);
    if main_total < config::MIN_DECK_SIZE {
        issues.push(ValidationIssue {
            rule: ValidationRule::DeckSize,
            message: format!(
                "Deck must have at least {} cards (currently {})",
                config::MIN_DECK_SIZE,
                main_total
            ),
        });
    }

    issues.extend(copy_limit_issues(deck, lookup));

    let side_total = deck.total(Zone::Sideboard);
    if side_total > config::MAX_SIDEBOARD_SIZE {
        issues.push(ValidationIssue {
            rule: ValidationRule::SideboardSize,
            message: format!(
                "Sideboard must have at most {} cards (currently {})",
                config::MAX_SIDEBOARD_SIZE,
                side_total
            ),
        });
    }

    issues.extend(color_identity_issues(deck, lookup));
    issues.extend(mana_base_issues(deck, lookup));

    issues
}

/// Copies are counted per card name, so different printings of one card
/// share the limit.
fn copy_limit_issues<L>(deck: &DeckComposition, lookup: &L) -> Vec<ValidationIssue>
where
    L: CardLookup + ?Sized,
{
    let mut by_name: BTreeMap<&str, (u32, bool)> = BTreeMap::new();
    for (id, &qty) in &deck.mainboard {
        if let Some(card) = lookup.lookup(id) {
            let entry = by_name.entry(card.name.as_str()).or_insert((0, false));
            entry.0 = entry.0.saturating_add(qty);
            entry.1 |= card.is_basic_land();
        }
    }

    by_name
        .into_iter()
        .filter(|(_, (qty, basic))| *qty > config::MAX_COPIES && !*basic)
        .map(|(name, (qty, _))| ValidationIssue {
            rule: ValidationRule::CopyLimit,
            message: format!("Too many copies of {} ({}/{})", name, qty, config::MAX_COPIES),
        })
        .collect()
}

fn color_identity_issues<L>(deck: &DeckComposition, lookup: &L) -> Vec<ValidationIssue>
where
    L: CardLookup + ?Sized,
{
    if deck.colors.is_empty() {
        return Vec::new();
    }

    let allowed: HashSet<&str> = deck.colors.iter().map(String::as_str).collect();
    let mut seen = HashSet::new();
    let mut issues = Vec::new();

    for id in deck.mainboard.keys().chain(deck.sideboard.keys()) {
        if !seen.insert(id.as_str()) {
            continue;
        }
        let Some(card) = lookup.lookup(id) else {
            continue;
        };
        if card.color_identity.iter().all(|c| allowed.contains(c.as_str())) {
            continue;
        }
        issues.push(ValidationIssue {
            rule: ValidationRule::ColorIdentity,
            message: format!(
                "Card '{}' has colors [{}] that are not in deck colors [{}]",
                card.name,
                card.color_identity.join(", "),
                deck.colors.join(", ")
            ),
        });
    }

    issues
}

/// Land count bounds and per-color source requirements over the mainboard.
///
/// A color needs `MANA_SOURCES_FULL_COLOR` sources scaled by its share of
/// the resolved non-land units.
fn mana_base_issues<L>(deck: &DeckComposition, lookup: &L) -> Vec<ValidationIssue>
where
    L: CardLookup + ?Sized,
{
    let mut lands = 0u64;
    let mut spells = 0u64;
    let mut demand: BTreeMap<String, u64> = BTreeMap::new();
    let mut sources: BTreeMap<String, u64> = BTreeMap::new();

    for (id, &qty) in &deck.mainboard {
        let Some(card) = lookup.lookup(id) else {
            continue;
        };
        let qty = u64::from(qty);
        if card.is_land() {
            lands += qty;
            for color in card.mana_colors() {
                *sources.entry(color).or_insert(0) += qty;
            }
        } else {
            spells += qty;
            for color in &card.color_identity {
                *demand.entry(color.clone()).or_insert(0) += qty;
            }
        }
    }

    let mut issues = Vec::new();

    if lands < u64::from(config::MIN_LANDS) {
        issues.push(ValidationIssue {
            rule: ValidationRule::LandCount,
            message: format!(
                "Too few lands ({}; at least {} recommended)",
                lands,
                config::MIN_LANDS
            ),
        });
    } else if lands > u64::from(config::MAX_LANDS) {
        issues.push(ValidationIssue {
            rule: ValidationRule::LandCount,
            message: format!(
                "Too many lands ({}; at most {} recommended)",
                lands,
                config::MAX_LANDS
            ),
        });
    }

    if spells == 0 {
        return issues;
    }

    for (color, units) in demand {
        let share = units as f64 / spells as f64;
        let required = (config::MANA_SOURCES_FULL_COLOR * share).ceil() as u64;
        let have = sources.get(&color).copied().unwrap_or(0);
        if have < required {
            issues.push(ValidationIssue {
                rule: ValidationRule::ManaSources,
                message: format!(
                    "Insufficient {} mana sources ({} of {} needed)",
                    color, have, required
                ),
            });
        }
    }

    issues
}
