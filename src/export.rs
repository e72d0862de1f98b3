//! Plain-text deck list export in the Arena import format.
//!
//! ```text
//! Deck
//! 4 Lightning Bolt (A25) 141
//!
//! Sideboard
//! 2 Negate (M21) 59
//! ```

use std::borrow::Cow;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt::Write;

use crate::catalog::CardLookup;
use crate::config;
use crate::models::{CardRef, DeckComposition};

/// Render a deck as a line-oriented list.
///
/// Entries are ordered by CMC, then by name in dictionary order. The sideboard section is only
/// written when the sideboard has cards.
pub fn export_deck_list<L>(deck: &DeckComposition, lookup: &L) -> String
where
    L: CardLookup + ?Sized,
{
    let mut out = String::from("Deck\n");
    write_section(&mut out, &deck.mainboard, lookup);

    if !deck.sideboard.is_empty() {
        out.push_str("\nSideboard\n");
        write_section(&mut out, &deck.sideboard, lookup);
    }

    out
}

/// Format one `<qty> <name> (<SET>) <number>` line, without a newline.
pub fn format_entry(quantity: u32, card: &CardRef) -> String {
    let set_code = if card.set_code.trim().is_empty() {
        config::UNKNOWN_SET_CODE.to_string()
    } else {
        card.set_code.to_uppercase()
    };
    let mut line = format!("{} {} ({})", quantity, card.name, set_code);
    if let Some(number) = card.collector_number.as_deref().filter(|n| !n.is_empty()) {
        line.push(' ');
        line.push_str(number);
    }
    line
}

fn write_section<L>(out: &mut String, entries: &BTreeMap<String, u32>, lookup: &L)
where
    L: CardLookup + ?Sized,
{
    let mut rows: Vec<(Cow<'_, CardRef>, u32)> = entries
        .iter()
        .map(|(id, &qty)| (lookup.resolve(id), qty))
        .collect();

    rows.sort_by(|(a, _), (b, _)| {
        a.cmc
            .total_cmp(&b.cmc)
            .then_with(|| name_order(&a.name, &b.name))
    });

    for (card, qty) in rows {
        // Writing to a String cannot fail.
        let _ = writeln!(out, "{}", format_entry(qty, &card));
    }
}

/// Dictionary order for card names: letters compare case-insensitively, and
/// names differing only in case put lowercase first (`"elf" < "Elf" < "Zombie"`).
pub fn name_order(a: &str, b: &str) -> Ordering {
    let folded = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));
    folded.then_with(|| b.cmp(a))
}
