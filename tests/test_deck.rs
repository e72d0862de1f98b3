//! Deck composition tests: adding, removing and the zone invariants.

use mtga_deckbuilder::{add_card, remove_card, DeckComposition, DeckError, Zone};
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// add_card
// ---------------------------------------------------------------------------

#[test]
fn add_card_creates_entry() {
    let deck = DeckComposition::new("Burn", "standard");
    let deck = add_card(&deck, "bolt", 4, false).unwrap();
    assert_eq!(deck.quantity(Zone::Mainboard, "bolt"), 4);
    assert!(deck.sideboard.is_empty());
}

#[test]
fn add_card_accumulates() {
    let mut deck = DeckComposition::new("Burn", "standard");
    deck.add_card("bolt", 2, Zone::Mainboard).unwrap();
    deck.add_card("bolt", 1, Zone::Mainboard).unwrap();
    assert_eq!(deck.quantity(Zone::Mainboard, "bolt"), 3);
}

#[test]
fn add_card_to_sideboard_leaves_mainboard_alone() {
    let deck = DeckComposition::new("Burn", "standard");
    let deck = add_card(&deck, "negate", 2, true).unwrap();
    assert_eq!(deck.quantity(Zone::Sideboard, "negate"), 2);
    assert!(deck.mainboard.is_empty());
}

#[test]
fn add_card_rejects_non_positive_quantity() {
    let deck = add_card(&DeckComposition::new("Burn", "standard"), "bolt", 1, false).unwrap();

    for qty in [0, -3] {
        let err = add_card(&deck, "bolt", qty, false).unwrap_err();
        assert!(matches!(err, DeckError::InvalidArgument(_)));
    }
    assert_eq!(deck.quantity(Zone::Mainboard, "bolt"), 1);
}

#[test]
fn failed_add_leaves_mutable_deck_untouched() {
    let mut deck = DeckComposition::new("Burn", "standard");
    deck.add_card("bolt", 2, Zone::Mainboard).unwrap();
    let before = deck.clone();
    assert!(deck.add_card("bolt", 0, Zone::Mainboard).is_err());
    assert_eq!(deck, before);
}

#[test]
fn add_card_rejects_overflow() {
    let mut deck = DeckComposition::new("Big", "casual");
    deck.add_card("x", i64::from(u32::MAX), Zone::Mainboard).unwrap();
    let err = deck.add_card("x", 1, Zone::Mainboard).unwrap_err();
    assert!(matches!(err, DeckError::InvalidArgument(_)));
}

// ---------------------------------------------------------------------------
// remove_card
// ---------------------------------------------------------------------------

#[test]
fn remove_card_decrements() {
    let deck = add_card(&DeckComposition::new("Burn", "standard"), "bolt", 3, false).unwrap();
    let deck = remove_card(&deck, "bolt", false);
    assert_eq!(deck.quantity(Zone::Mainboard, "bolt"), 2);
}

#[test]
fn remove_last_copy_drops_key() {
    let deck = add_card(&DeckComposition::new("Burn", "standard"), "bolt", 1, false).unwrap();
    let deck = remove_card(&deck, "bolt", false);
    assert!(!deck.mainboard.contains_key("bolt"));
}

#[test]
fn remove_unknown_card_is_noop() {
    let deck = add_card(&DeckComposition::new("Burn", "standard"), "bolt", 2, false).unwrap();
    assert_eq!(remove_card(&deck, "unknown", false), deck);
    assert_eq!(remove_card(&deck, "bolt", true), deck);
}

// ---------------------------------------------------------------------------
// Construction and totals
// ---------------------------------------------------------------------------

#[test]
fn with_cards_accumulates_repeated_ids() {
    let deck = DeckComposition::with_cards(
        "Mixed",
        "standard",
        [("bolt", 2), ("bears", 3), ("bolt", 1)],
        [("negate", 2)],
    )
    .unwrap();
    assert_eq!(deck.quantity(Zone::Mainboard, "bolt"), 3);
    assert_eq!(deck.total(Zone::Mainboard), 6);
    assert_eq!(deck.total(Zone::Sideboard), 2);
    assert!(deck.is_draft());
}

#[test]
fn with_cards_rejects_zero_quantity() {
    let result = DeckComposition::with_cards("Bad", "standard", [("bolt", 0)], []);
    assert!(result.is_err());
}

#[test]
fn deck_json_uses_camel_case_and_skips_missing_id() {
    let mut deck = DeckComposition::new("Burn", "standard");
    deck.strategy_tags = vec!["aggro".into()];
    deck.add_card("bolt", 4, Zone::Mainboard).unwrap();

    let value = serde_json::to_value(&deck).unwrap();
    assert!(value.get("id").is_none());
    assert_eq!(value["strategyTags"], serde_json::json!(["aggro"]));
    assert_eq!(value["mainboard"]["bolt"], 4);

    let back: DeckComposition = serde_json::from_value(value).unwrap();
    assert_eq!(back, deck);
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn every_quantity_stays_positive(ops in prop::collection::vec((0usize..4, -2i64..5, any::<bool>()), 0..40)) {
        let ids = ["a", "b", "c", "d"];
        let mut deck = DeckComposition::new("Prop", "standard");
        for (idx, qty, remove) in ops {
            if remove {
                deck = remove_card(&deck, ids[idx], false);
            } else if let Ok(updated) = add_card(&deck, ids[idx], qty, false) {
                deck = updated;
            }
            prop_assert!(deck.mainboard.values().all(|q| *q >= 1));
        }
    }

    #[test]
    fn add_then_remove_restores_count(start in 1i64..10, added in 1i64..5) {
        let deck = add_card(&DeckComposition::new("Prop", "standard"), "x", start, false).unwrap();
        let mut updated = add_card(&deck, "x", added, false).unwrap();
        for _ in 0..added {
            updated = remove_card(&updated, "x", false);
        }
        prop_assert_eq!(updated, deck);
    }
}
