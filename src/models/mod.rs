pub mod analysis;
pub mod card;
pub mod deck;

pub use analysis::*;
pub use card::*;
pub use deck::{DeckComposition, Zone};
