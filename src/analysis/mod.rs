//! Pure, synchronous deck analysis over a pre-fetched catalog.

pub mod heuristics;
pub mod stats;
pub mod validation;

pub use heuristics::{land_target, recommend};
pub use stats::{analyze, curve_bucket};
pub use validation::validate;

use crate::catalog::CardLookup;
use crate::models::{DeckAnalysis, DeckComposition};

/// Statistics, advisories and legality issues for one deck.
pub fn analyze_deck<L>(deck: &DeckComposition, lookup: &L) -> DeckAnalysis
where
    L: CardLookup + ?Sized,
{
    let statistics = analyze(&deck.mainboard, lookup);
    let advisories = recommend(&statistics);
    let issues = validate(deck, lookup);
    DeckAnalysis {
        statistics,
        advisories,
        issues,
    }
}
