//! Query modules over the local DuckDB database.
//!
//! Each module provides a store struct that borrows from a
//! [`Connection`](crate::connection::Connection) and exposes methods
//! returning `Result<T>` with typed models.

pub mod cards;
pub mod decks;

pub use cards::{CardStore, SearchCardsParams};
pub use decks::DeckStore;
