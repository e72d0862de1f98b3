use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// StatisticsSnapshot — Derived mainboard statistics
// ---------------------------------------------------------------------------

/// Aggregated mainboard statistics. Recomputed on every read, never stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsSnapshot {
    pub total_cards: u32,
    pub lands: u32,
    pub creatures: u32,
    pub spells: u32,
    pub artifacts: u32,
    pub enchantments: u32,
    pub planeswalkers: u32,
    /// Non-land units per CMC bucket; bucket 7 holds everything at 7 or more.
    pub mana_curve: BTreeMap<u8, u32>,
    pub average_cmc: f64,
    pub median_cmc: f64,
    /// Units whose color identity includes each color code.
    pub color_distribution: BTreeMap<String, u32>,
    /// Units per exact type line, lands included.
    pub type_distribution: BTreeMap<String, u32>,
}

impl StatisticsSnapshot {
    pub fn non_land_cards(&self) -> u32 {
        self.total_cards.saturating_sub(self.lands)
    }
}

// ---------------------------------------------------------------------------
// Advisory
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdvisoryKind {
    Warning,
    Add,
    Remove,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

/// A single deck-building suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Advisory {
    pub kind: AdvisoryKind,
    pub message: String,
    pub reason: String,
    pub priority: Priority,
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.reason)
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationRule {
    DeckSize,
    CopyLimit,
    SideboardSize,
    ColorIdentity,
    LandCount,
    ManaSources,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub rule: ValidationRule,
    pub message: String,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

// ---------------------------------------------------------------------------
// DeckAnalysis — Everything the workshop reports about one deck
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeckAnalysis {
    pub statistics: StatisticsSnapshot,
    pub advisories: Vec<Advisory>,
    pub issues: Vec<ValidationIssue>,
}

impl DeckAnalysis {
    pub fn is_legal(&self) -> bool {
        self.issues.is_empty()
    }
}
