//! End-to-end smoke test against the live Scryfall API.
//!
//! Fetches a small real query, stores it, builds a deck and runs every
//! analysis and export path over it.
//!
//! Run with:
//! ```sh
//! cargo test -- --ignored --nocapture
//! ```

use mtga_deckbuilder::queries::SearchCardsParams;
use mtga_deckbuilder::{DeckComposition, DeckRepository, DeckWorkshop, ScryfallClient, Zone};
use std::time::Duration;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Print a section header to stderr.
fn section(name: &str) {
    eprintln!("\n{}", "=".repeat(60));
    eprintln!("  {}", name);
    eprintln!("{}", "=".repeat(60));
}

/// Counters for pass/fail reporting.
struct Counters {
    pass: usize,
    fail: usize,
}

impl Counters {
    fn new() -> Self {
        Self { pass: 0, fail: 0 }
    }

    fn check(&mut self, label: &str, condition: bool, detail: &str) {
        let status = if condition { "PASS" } else { "FAIL" };
        if condition {
            self.pass += 1;
        } else {
            self.fail += 1;
        }
        if detail.is_empty() {
            eprintln!("  [{}] {}", status, label);
        } else {
            eprintln!("  [{}] {} -- {}", status, label, detail);
        }
    }
}

// ---------------------------------------------------------------------------
// Main smoke test
// ---------------------------------------------------------------------------

#[test]
#[ignore]
fn smoke_test() {
    let tmp = tempfile::tempdir().unwrap();
    let workshop = DeckWorkshop::builder()
        .cache_dir(tmp.path())
        .timeout(Duration::from_secs(30))
        .build()
        .unwrap();
    let mut c = Counters::new();

    // ================================================================
    // 1. SCRYFALL CLIENT
    // ================================================================
    section("Scryfall client");

    let client = ScryfallClient::new("https://api.scryfall.com", Duration::from_secs(30)).unwrap();
    let bolt = client.get_card_by_name("Lightning Bolt", true).unwrap();
    c.check(
        "get_card_by_name exact",
        bolt.name == "Lightning Bolt" && bolt.cmc == 1.0,
        &format!("id={}", bolt.id),
    );

    let by_id = client.get_card(&bolt.id).unwrap();
    c.check("get_card by id", by_id.id == bolt.id, "");

    let fuzzy = client.get_card_by_name("lightnin bolt", false).unwrap();
    c.check("get_card_by_name fuzzy", fuzzy.name == "Lightning Bolt", "");

    let none = client.search("t:nonexistenttypeline").unwrap();
    c.check("empty search", none.is_empty(), "");

    // ================================================================
    // 2. SYNC
    // ================================================================
    section("Sync");

    let query = "set:m21 r:mythic";
    let stored = workshop.sync_cards(query).unwrap();
    c.check("sync_cards", stored > 0, &format!("stored={}", stored));
    c.check("snapshot cached", workshop.cache().contains("set_m21_r_mythic"), "");

    let again = workshop.sync_cards(query).unwrap();
    c.check("sync from cache", again == stored, "");

    // ================================================================
    // 3. DECK
    // ================================================================
    section("Deck");

    let cards = workshop
        .cards()
        .search(&SearchCardsParams {
            limit: Some(5),
            ..Default::default()
        })
        .unwrap();
    let mut deck = DeckComposition::new("Smoke", "standard");
    for card in &cards {
        workshop.add_card(&mut deck, &card.id, 2, Zone::Mainboard).unwrap();
    }
    c.check(
        "add_card",
        deck.total(Zone::Mainboard) == 2 * cards.len() as u32,
        "",
    );

    let analysis = workshop.analyze(&deck).unwrap();
    c.check(
        "analyze",
        analysis.statistics.total_cards == deck.total(Zone::Mainboard),
        &format!("advisories={}", analysis.advisories.len()),
    );

    let list = workshop.export(&deck).unwrap();
    c.check("export", list.starts_with("Deck\n"), "");
    eprintln!("{}", list);

    let saved = workshop.decks().create(&deck).unwrap();
    c.check("create deck", saved.id.is_some(), "");

    // ================================================================
    // SUMMARY
    // ================================================================
    section("SMOKE TEST COMPLETE");
    eprintln!("  Passed:  {}", c.pass);
    eprintln!("  Failed:  {}", c.fail);

    assert_eq!(c.fail, 0, "{} smoke test checks failed", c.fail);
}
