use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config;

// ---------------------------------------------------------------------------
// CardRef — The canonical catalog card
// ---------------------------------------------------------------------------

/// A catalog card as the deck core sees it.
///
/// Every upstream shape (Scryfall JSON, database rows, legacy aliases) is
/// collapsed into this struct by [`crate::catalog::normalize_card`] before
/// it reaches the deck model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardRef {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub mana_cost: String,
    #[serde(default)]
    pub cmc: f64,
    #[serde(default)]
    pub color_identity: Vec<String>,
    #[serde(default)]
    pub type_line: String,
    #[serde(default)]
    pub rarity: String,
    #[serde(default)]
    pub set_code: String,
    pub collector_number: Option<String>,

    // -- Display-only fields --
    pub oracle_text: Option<String>,
    pub power: Option<String>,
    pub toughness: Option<String>,
    pub loyalty: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    pub image_uri: Option<String>,
}

impl CardRef {
    /// Minimal card with the given identity and type; everything else empty.
    pub fn new(id: impl Into<String>, name: impl Into<String>, cmc: f64, type_line: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            mana_cost: String::new(),
            cmc,
            color_identity: Vec::new(),
            type_line: type_line.into(),
            rarity: String::new(),
            set_code: String::new(),
            collector_number: None,
            oracle_text: None,
            power: None,
            toughness: None,
            loyalty: None,
            keywords: Vec::new(),
            image_uri: None,
        }
    }

    /// Stand-in for an id the catalog could not resolve.
    ///
    /// Zero cost and an empty type line, so it counts toward deck totals but
    /// never toward a typed counter.
    pub fn placeholder(id: impl Into<String>) -> Self {
        Self::new(id, config::UNKNOWN_CARD_NAME, 0.0, "")
    }

    pub fn with_set(mut self, set_code: impl Into<String>, collector_number: impl Into<String>) -> Self {
        self.set_code = set_code.into();
        self.collector_number = Some(collector_number.into());
        self
    }

    pub fn with_colors(mut self, colors: &[&str]) -> Self {
        self.color_identity = colors.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn with_mana_cost(mut self, mana_cost: impl Into<String>) -> Self {
        self.mana_cost = mana_cost.into();
        self
    }

    pub fn is_type(&self, card_type: CardType) -> bool {
        card_type.matches(&self.type_line)
    }

    pub fn is_land(&self) -> bool {
        self.is_type(CardType::Land)
    }

    pub fn is_creature(&self) -> bool {
        self.is_type(CardType::Creature)
    }

    /// Instants and sorceries, except creature cards that also carry one of
    /// those words (e.g. adventure creatures).
    pub fn is_spell(&self) -> bool {
        (self.is_type(CardType::Instant) || self.is_type(CardType::Sorcery)) && !self.is_creature()
    }

    pub fn is_basic_land(&self) -> bool {
        config::BASIC_LAND_NAMES.contains(&self.name.as_str())
            || self.type_line.to_lowercase().contains("basic land")
    }

    /// Colors a land can supply: its color identity plus any basic land
    /// subtype on the type line. Empty for non-lands.
    pub fn mana_colors(&self) -> Vec<String> {
        if !self.is_land() {
            return Vec::new();
        }
        let mut colors = self.color_identity.clone();
        let type_line = self.type_line.to_lowercase();
        for (subtype, color) in config::BASIC_LAND_TYPES {
            if type_line.contains(subtype) && !colors.iter().any(|c| c == color) {
                colors.push(color.to_string());
            }
        }
        colors
    }

    pub fn mana(&self) -> ManaCost {
        ManaCost::parse(&self.mana_cost)
    }
}

// ---------------------------------------------------------------------------
// CardType
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardType {
    Land,
    Creature,
    Artifact,
    Enchantment,
    Planeswalker,
    Instant,
    Sorcery,
}

impl CardType {
    pub const ALL: [CardType; 7] = [
        CardType::Land,
        CardType::Creature,
        CardType::Artifact,
        CardType::Enchantment,
        CardType::Planeswalker,
        CardType::Instant,
        CardType::Sorcery,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CardType::Land => "land",
            CardType::Creature => "creature",
            CardType::Artifact => "artifact",
            CardType::Enchantment => "enchantment",
            CardType::Planeswalker => "planeswalker",
            CardType::Instant => "instant",
            CardType::Sorcery => "sorcery",
        }
    }

    /// Case-insensitive substring test against a type line.
    pub fn matches(self, type_line: &str) -> bool {
        type_line.to_lowercase().contains(self.as_str())
    }
}

impl fmt::Display for CardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ManaCost — Parsed bracketed-symbol cost
// ---------------------------------------------------------------------------

/// Breakdown of a `{2}{U}{U}`-style cost into generic and colored parts.
///
/// Symbols other than plain numbers and single color letters (`{X}`,
/// hybrid, phyrexian) are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManaCost {
    pub total: u32,
    pub generic: u32,
    pub colored: BTreeMap<String, u32>,
}

impl ManaCost {
    pub fn parse(mana_cost: &str) -> Self {
        let mut cost = ManaCost::default();
        for symbol in mana_cost
            .split(|c| c == '{' || c == '}')
            .filter(|s| !s.is_empty())
        {
            if let Ok(n) = symbol.parse::<u32>() {
                cost.generic = cost.generic.saturating_add(n);
            } else if config::is_color_code(symbol) {
                *cost.colored.entry(symbol.to_string()).or_insert(0) += 1;
            }
        }
        cost.total = cost
            .colored
            .values()
            .fold(cost.generic, |acc, &n| acc.saturating_add(n));
        cost
    }

    pub fn pips(&self, color: &str) -> u32 {
        self.colored.get(color).copied().unwrap_or(0)
    }
}

