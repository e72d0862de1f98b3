//! Arena deck list export tests.

mod common;

use std::collections::HashMap;

use std::cmp::Ordering;

use mtga_deckbuilder::export::{format_entry, name_order};
use mtga_deckbuilder::{export_deck_list, CardRef, DeckComposition};

fn two_card_catalog() -> HashMap<String, CardRef> {
    let a = CardRef::new("a", "A", 2.0, "Creature").with_set("ABC", "12");
    let b = CardRef::new("b", "B", 1.0, "Instant").with_set("XYZ", "3");
    HashMap::from([(a.id.clone(), a), (b.id.clone(), b)])
}

#[test]
fn mainboard_only_export_is_sorted_by_cmc() {
    let deck = DeckComposition::with_cards("Two", "standard", [("a", 2), ("b", 1)], []).unwrap();
    assert_eq!(
        export_deck_list(&deck, &two_card_catalog()),
        "Deck\n1 B (XYZ) 3\n2 A (ABC) 12\n"
    );
}

#[test]
fn sideboard_section_follows_blank_line() {
    let catalog = common::sample_catalog();
    let deck = DeckComposition::with_cards(
        "Burn",
        "standard",
        [("bolt", 4), ("mountain", 20)],
        [("counterspell", 2)],
    )
    .unwrap();

    assert_eq!(
        export_deck_list(&deck, &catalog),
        "Deck\n20 Mountain (M21) 269\n4 Lightning Bolt (A25) 141\n\nSideboard\n2 Counterspell (A25) 50\n"
    );
}

#[test]
fn equal_cmc_sorts_by_name() {
    let catalog = common::sample_catalog();
    let deck =
        DeckComposition::with_cards("Red", "standard", [("fireball", 1), ("bolt", 1)], []).unwrap();
    assert_eq!(
        export_deck_list(&deck, &catalog),
        "Deck\n1 Fireball (M10) 136\n1 Lightning Bolt (A25) 141\n"
    );
}

#[test]
fn equal_cmc_name_ties_ignore_case() {
    let zombie = CardRef::new("zombie", "Zombie", 1.0, "Token Creature — Zombie").with_set("T1", "1");
    let elf = CardRef::new("elf", "elf", 1.0, "Token Creature — Elf").with_set("T1", "2");
    let catalog = HashMap::from([(zombie.id.clone(), zombie), (elf.id.clone(), elf)]);
    let deck =
        DeckComposition::with_cards("Tokens", "standard", [("zombie", 1), ("elf", 1)], []).unwrap();

    assert_eq!(
        export_deck_list(&deck, &catalog),
        "Deck\n1 elf (T1) 2\n1 Zombie (T1) 1\n"
    );
}

#[test]
fn name_order_puts_lowercase_first_on_case_ties() {
    assert_eq!(name_order("elf", "Zombie"), Ordering::Less);
    assert_eq!(name_order("elf", "Elf"), Ordering::Less);
    assert_eq!(name_order("Elf", "elf"), Ordering::Greater);
    assert_eq!(name_order("Bolt", "Bolt"), Ordering::Equal);
    assert_eq!(name_order("Ant", "ant hill"), Ordering::Less);
}

#[test]
fn empty_deck_exports_header_only() {
    let deck = DeckComposition::new("Empty", "standard");
    assert_eq!(export_deck_list(&deck, &common::sample_catalog()), "Deck\n");
}

#[test]
fn set_code_is_uppercased() {
    assert_eq!(format_entry(4, &common::bolt()), "4 Lightning Bolt (A25) 141");
}

#[test]
fn unknown_card_uses_placeholder_and_unk_set() {
    let deck = DeckComposition::with_cards("Ghost", "standard", [("ghost", 1)], []).unwrap();
    assert_eq!(
        export_deck_list(&deck, &common::sample_catalog()),
        "Deck\n1 Unknown Card (UNK)\n"
    );
}

#[test]
fn missing_collector_number_is_omitted() {
    let card = CardRef::new("x", "Mystery", 3.0, "Sorcery");
    assert_eq!(format_entry(2, &card), "2 Mystery (UNK)");
}
