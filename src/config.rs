use std::path::PathBuf;
use std::time::Duration;

pub const SCRYFALL_BASE: &str = "https://api.scryfall.com";

/// Scryfall asks clients to stay at or below ten requests per second.
pub const SCRYFALL_REQUESTS_PER_SECOND: f64 = 10.0;
pub const SCRYFALL_MAX_RETRIES: u32 = 3;
/// Upper bound on a server-requested `Retry-After` wait.
pub const SCRYFALL_MAX_RETRY_WAIT: Duration = Duration::from_secs(60);
/// Upper bound on the spacing between requests, however low the rate.
pub const SCRYFALL_MAX_REQUEST_INTERVAL: Duration = Duration::from_secs(60);
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

// -- Deck rules -------------------------------------------------------------

pub const MIN_DECK_SIZE: u32 = 60;
pub const MAX_SIDEBOARD_SIZE: u32 = 15;
pub const MAX_COPIES: u32 = 4;

/// Land counts outside this range are flagged by validation.
pub const MIN_LANDS: u32 = 20;
pub const MAX_LANDS: u32 = 28;

/// Sources a color needs when every non-land card is of that color; scaled
/// down by the color's share of the non-land units.
pub const MANA_SOURCES_FULL_COLOR: f64 = 20.0;

/// Target share of the mainboard that should be lands.
pub const LAND_RATIO: f64 = 0.4;

/// Highest mana-curve bucket; it collects every card at this cost or above.
pub const CURVE_CAP: u8 = 7;

pub const UNKNOWN_CARD_NAME: &str = "Unknown Card";
pub const UNKNOWN_SET_CODE: &str = "UNK";

pub const COLOR_CODES: [&str; 5] = ["W", "U", "B", "R", "G"];

pub const BASIC_LAND_NAMES: [&str; 6] = ["Plains", "Island", "Swamp", "Mountain", "Forest", "Wastes"];

/// Basic land subtypes and the color each one taps for.
pub const BASIC_LAND_TYPES: [(&str, &str); 5] = [
    ("plains", "W"),
    ("island", "U"),
    ("swamp", "B"),
    ("mountain", "R"),
    ("forest", "G"),
];

pub fn is_color_code(code: &str) -> bool {
    COLOR_CODES.contains(&code)
}

pub fn default_cache_dir() -> PathBuf {
    if let Some(cache) = dirs::cache_dir() {
        cache.join("mtga-deckbuilder")
    } else {
        PathBuf::from(".mtga-deckbuilder-cache")
    }
}
