//! Mainboard statistics: type counts, mana curve and CMC central tendency.

use std::collections::BTreeMap;

use crate::catalog::CardLookup;
use crate::config;
use crate::models::{CardType, StatisticsSnapshot};

/// Join a mainboard against a catalog and aggregate it.
///
/// Ids the catalog cannot resolve are counted as zero-cost placeholders; this
/// never fails. Lands are left out of the curve, the average and the median.
/// Counters saturate at `u32::MAX` instead of overflowing.
pub fn analyze<L>(mainboard: &BTreeMap<String, u32>, lookup: &L) -> StatisticsSnapshot
where
    L: CardLookup + ?Sized,
{
    let mut stats = StatisticsSnapshot {
        mana_curve: (0..=config::CURVE_CAP).map(|bucket| (bucket, 0)).collect(),
        ..Default::default()
    };

    let mut cmc_sum = 0.0;
    let mut non_land: Vec<(f64, u32)> = Vec::new();

    for (id, &qty) in mainboard {
        let card = lookup.resolve(id);

        bump(&mut stats.total_cards, qty);
        if card.is_land() {
            bump(&mut stats.lands, qty);
        }
        if card.is_creature() {
            bump(&mut stats.creatures, qty);
        }
        if card.is_spell() {
            bump(&mut stats.spells, qty);
        }
        if card.is_type(CardType::Artifact) {
            bump(&mut stats.artifacts, qty);
        }
        if card.is_type(CardType::Enchantment) {
            bump(&mut stats.enchantments, qty);
        }
        if card.is_type(CardType::Planeswalker) {
            bump(&mut stats.planeswalkers, qty);
        }

        for color in &card.color_identity {
            bump(stats.color_distribution.entry(color.clone()).or_insert(0), qty);
        }
        bump(stats.type_distribution.entry(card.type_line.clone()).or_insert(0), qty);

        if card.is_land() {
            continue;
        }

        bump(stats.mana_curve.entry(curve_bucket(card.cmc)).or_insert(0), qty);
        cmc_sum += card.cmc * f64::from(qty);
        non_land.push((card.cmc, qty));
    }

    let units: u64 = non_land.iter().map(|&(_, qty)| u64::from(qty)).sum();
    if units > 0 {
        stats.average_cmc = cmc_sum / units as f64;
        stats.median_cmc = weighted_median(&mut non_land, units);
    }

    stats
}

/// Histogram bucket for a cost: floored, clamped to the curve cap.
pub fn curve_bucket(cmc: f64) -> u8 {
    let floored = cmc.max(0.0).floor();
    if floored >= f64::from(config::CURVE_CAP) {
        config::CURVE_CAP
    } else {
        floored as u8
    }
}

fn bump(counter: &mut u32, qty: u32) {
    *counter = counter.saturating_add(qty);
}

/// Median of the multiset where each `(cmc, qty)` pair stands for `qty`
/// copies. `units` is the total copy count and must be non-zero.
fn weighted_median(pairs: &mut [(f64, u32)], units: u64) -> f64 {
    pairs.sort_by(|a, b| a.0.total_cmp(&b.0));

    // 0-based positions of the middle unit(s) in sorted order.
    let upper = units / 2;
    let lower = if units % 2 == 0 { upper - 1 } else { upper };

    let mut seen = 0u64;
    let mut low_value = None;
    for &(cmc, qty) in pairs.iter() {
        seen += u64::from(qty);
        if low_value.is_none() && lower < seen {
            low_value = Some(cmc);
        }
        if upper < seen {
            return (low_value.unwrap_or(cmc) + cmc) / 2.0;
        }
    }
    0.0
}
