use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{DeckError, Result};

// ---------------------------------------------------------------------------
// Zone
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Zone {
    Mainboard,
    Sideboard,
}

impl Zone {
    pub fn from_sideboard_flag(to_sideboard: bool) -> Self {
        if to_sideboard {
            Zone::Sideboard
        } else {
            Zone::Mainboard
        }
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Zone::Mainboard => f.write_str("mainboard"),
            Zone::Sideboard => f.write_str("sideboard"),
        }
    }
}

// ---------------------------------------------------------------------------
// DeckComposition — Card multisets plus descriptive metadata
// ---------------------------------------------------------------------------

/// A deck as stored and edited: two `card id -> quantity` maps plus metadata.
///
/// Quantities are always at least one. Removing the last copy of a card drops
/// its key instead of leaving a zero behind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckComposition {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    pub format: String,
    pub description: Option<String>,
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default)]
    pub strategy_tags: Vec<String>,
    #[serde(default)]
    pub mainboard: BTreeMap<String, u32>,
    #[serde(default)]
    pub sideboard: BTreeMap<String, u32>,
}

impl DeckComposition {
    /// An empty, unsaved deck.
    pub fn new(name: impl Into<String>, format: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            format: format.into(),
            ..Default::default()
        }
    }

    /// Build a deck from `(card id, quantity)` pairs.
    ///
    /// Repeated ids accumulate. Fails on the first non-positive quantity.
    pub fn with_cards<'a, M, S>(
        name: impl Into<String>,
        format: impl Into<String>,
        mainboard: M,
        sideboard: S,
    ) -> Result<Self>
    where
        M: IntoIterator<Item = (&'a str, i64)>,
        S: IntoIterator<Item = (&'a str, i64)>,
    {
        let mut deck = Self::new(name, format);
        for (id, qty) in mainboard {
            deck.add_card(id, qty, Zone::Mainboard)?;
        }
        for (id, qty) in sideboard {
            deck.add_card(id, qty, Zone::Sideboard)?;
        }
        Ok(deck)
    }

    pub fn is_draft(&self) -> bool {
        self.id.is_none()
    }

    pub fn zone(&self, zone: Zone) -> &BTreeMap<String, u32> {
        match zone {
            Zone::Mainboard => &self.mainboard,
            Zone::Sideboard => &self.sideboard,
        }
    }

    fn zone_mut(&mut self, zone: Zone) -> &mut BTreeMap<String, u32> {
        match zone {
            Zone::Mainboard => &mut self.mainboard,
            Zone::Sideboard => &mut self.sideboard,
        }
    }

    pub fn quantity(&self, zone: Zone, card_id: &str) -> u32 {
        self.zone(zone).get(card_id).copied().unwrap_or(0)
    }

    /// Sum of all quantities in a zone, saturating at `u32::MAX`.
    pub fn total(&self, zone: Zone) -> u32 {
        self.zone(zone)
            .values()
            .fold(0u32, |acc, &qty| acc.saturating_add(qty))
    }

    /// Add `quantity` copies of a card to a zone.
    ///
    /// A non-positive quantity is rejected with
    /// [`DeckError::InvalidArgument`] and the deck is left untouched.
    pub fn add_card(&mut self, card_id: &str, quantity: i64, zone: Zone) -> Result<()> {
        if quantity <= 0 {
            return Err(DeckError::InvalidArgument(format!(
                "Card quantity must be positive for card {} (got {})",
                card_id, quantity
            )));
        }
        let add = u32::try_from(quantity).map_err(|_| {
            DeckError::InvalidArgument(format!("Card quantity {} is too large", quantity))
        })?;

        let current = self.quantity(zone, card_id);
        let updated = current.checked_add(add).ok_or_else(|| {
            DeckError::InvalidArgument(format!("Quantity overflow for card {}", card_id))
        })?;
        self.zone_mut(zone).insert(card_id.to_string(), updated);
        Ok(())
    }

    /// Remove one copy of a card from a zone.
    ///
    /// The key disappears when its count reaches zero. Unknown ids are ignored.
    pub fn remove_card(&mut self, card_id: &str, zone: Zone) {
        let entries = self.zone_mut(zone);
        if let Some(qty) = entries.get_mut(card_id) {
            if *qty <= 1 {
                entries.remove(card_id);
            } else {
                *qty -= 1;
            }
        }
    }
}

/// Value-returning form of [`DeckComposition::add_card`].
///
/// The input deck is never modified; on error it is simply not replaced.
pub fn add_card(
    deck: &DeckComposition,
    card_id: &str,
    quantity: i64,
    to_sideboard: bool,
) -> Result<DeckComposition> {
    let mut updated = deck.clone();
    updated.add_card(card_id, quantity, Zone::from_sideboard_flag(to_sideboard))?;
    Ok(updated)
}

/// Value-returning form of [`DeckComposition::remove_card`].
pub fn remove_card(deck: &DeckComposition, card_id: &str, to_sideboard: bool) -> DeckComposition {
    let mut updated = deck.clone();
    updated.remove_card(card_id, Zone::from_sideboard_flag(to_sideboard));
    updated
}
