//! Card store queries against the DuckDB `cards` table.

use serde::Deserialize;

use crate::catalog::CardCatalog;
use crate::connection::Connection;
use crate::error::Result;
use crate::models::{CardRef, DeckComposition};
use crate::sql_builder::{SqlBuilder, SqlValue};

// ---------------------------------------------------------------------------
// SearchCardsParams
// ---------------------------------------------------------------------------

/// Parameters for the card search.
///
/// All fields are optional. When `None`, the corresponding filter is skipped.
#[derive(Debug, Clone, Default)]
pub struct SearchCardsParams {
    /// Case-insensitive substring; a value containing `%` is used as the
    /// LIKE pattern verbatim.
    pub name: Option<String>,
    pub set_code: Option<String>,
    pub color_identity: Option<Vec<String>>,
    pub type_line: Option<String>,
    pub rarity: Option<String>,
    pub cmc: Option<f64>,
    pub cmc_lte: Option<f64>,
    pub cmc_gte: Option<f64>,
    pub text: Option<String>,
    pub keyword: Option<String>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

// ---------------------------------------------------------------------------
// CardRow
// ---------------------------------------------------------------------------

/// One `cards` row; list columns hold JSON text.
#[derive(Debug, Deserialize)]
struct CardRow {
    id: String,
    name: String,
    mana_cost: Option<String>,
    cmc: Option<f64>,
    color_identity: Option<String>,
    type_line: Option<String>,
    rarity: Option<String>,
    set_code: Option<String>,
    collector_number: Option<String>,
    oracle_text: Option<String>,
    power: Option<String>,
    toughness: Option<String>,
    loyalty: Option<String>,
    keywords: Option<String>,
    image_uri: Option<String>,
}

impl CardRow {
    fn into_card(self) -> Result<CardRef> {
        Ok(CardRef {
            id: self.id,
            name: self.name,
            mana_cost: self.mana_cost.unwrap_or_default(),
            cmc: self.cmc.unwrap_or(0.0),
            color_identity: parse_list(self.color_identity.as_deref())?,
            type_line: self.type_line.unwrap_or_default(),
            rarity: self.rarity.unwrap_or_default(),
            set_code: self.set_code.unwrap_or_default(),
            collector_number: self.collector_number,
            oracle_text: self.oracle_text,
            power: self.power,
            toughness: self.toughness,
            loyalty: self.loyalty,
            keywords: parse_list(self.keywords.as_deref())?,
            image_uri: self.image_uri,
        })
    }
}

fn parse_list(raw: Option<&str>) -> Result<Vec<String>> {
    match raw {
        Some(s) if !s.trim().is_empty() => Ok(serde_json::from_str(s)?),
        _ => Ok(Vec::new()),
    }
}

// ---------------------------------------------------------------------------
// CardStore
// ---------------------------------------------------------------------------

/// Query interface for the locally stored card catalog.
pub struct CardStore<'a> {
    conn: &'a Connection,
}

impl<'a> CardStore<'a> {
    /// Create a new `CardStore` bound to the given connection.
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    // -- Writes ------------------------------------------------------------

    /// Insert a card, replacing any stored card with the same id.
    pub fn upsert(&self, card: &CardRef) -> Result<()> {
        let params = vec![
            SqlValue::from(&card.id),
            SqlValue::from(&card.name),
            SqlValue::from(&card.mana_cost),
            SqlValue::from(card.cmc),
            SqlValue::from(serde_json::to_string(&card.color_identity)?),
            SqlValue::from(&card.type_line),
            SqlValue::from(&card.rarity),
            SqlValue::from(&card.set_code),
            SqlValue::from(card.collector_number.clone()),
            SqlValue::from(card.oracle_text.clone()),
            SqlValue::from(card.power.clone()),
            SqlValue::from(card.toughness.clone()),
            SqlValue::from(card.loyalty.clone()),
            SqlValue::from(serde_json::to_string(&card.keywords)?),
            SqlValue::from(card.image_uri.clone()),
        ];
        self.conn.execute_statement(
            "INSERT OR REPLACE INTO cards VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            &params,
        )?;
        Ok(())
    }

    /// Upsert a batch of cards in one transaction. Returns the number written.
    pub fn upsert_many(&self, cards: &[CardRef]) -> Result<usize> {
        let raw = self.conn.raw();
        raw.execute_batch("BEGIN TRANSACTION")?;
        for card in cards {
            if let Err(e) = self.upsert(card) {
                raw.execute_batch("ROLLBACK")?;
                return Err(e);
            }
        }
        raw.execute_batch("COMMIT")?;
        tracing::info!(count = cards.len(), "stored cards");
        Ok(cards.len())
    }

    /// Delete a card. Returns `true` if a row was removed.
    pub fn delete(&self, id: &str) -> Result<bool> {
        let affected = self
            .conn
            .execute_statement("DELETE FROM cards WHERE id = ?", &[SqlValue::from(id)])?;
        Ok(affected > 0)
    }

    // -- Lookup ------------------------------------------------------------

    /// Retrieve a single card by id.
    pub fn get(&self, id: &str) -> Result<Option<CardRef>> {
        let (sql, params) = SqlBuilder::new("cards").where_eq("id", id).limit(1).build();
        self.fetch(&sql, &params)
            .map(|cards| cards.into_iter().next())
    }

    /// Retrieve every stored card among `ids`. Unknown ids are skipped.
    pub fn get_many(&self, ids: &[&str]) -> Result<Vec<CardRef>> {
        let (sql, params) = SqlBuilder::new("cards")
            .where_in("id", ids)
            .order_by(&["id ASC"])
            .build();
        self.fetch(&sql, &params)
    }

    /// All cards matching an exact name, across printings.
    pub fn get_by_name(&self, name: &str) -> Result<Vec<CardRef>> {
        let (sql, params) = SqlBuilder::new("cards")
            .where_eq("name", name)
            .order_by(&["set_code ASC", "collector_number ASC"])
            .build();
        self.fetch(&sql, &params)
    }

    /// Pre-fetch every card a deck references into an in-memory catalog.
    pub fn catalog_for(&self, deck: &DeckComposition) -> Result<CardCatalog> {
        let ids: Vec<&str> = deck
            .mainboard
            .keys()
            .chain(deck.sideboard.keys())
            .map(String::as_str)
            .collect();
        Ok(CardCatalog::from_cards(self.get_many(&ids)?))
    }

    /// Total number of stored cards.
    pub fn count(&self) -> Result<i64> {
        self.conn.count("cards", None, &[])
    }

    // -- Search ------------------------------------------------------------

    /// Search cards with optional filters, ordered by CMC then name.
    pub fn search(&self, params: &SearchCardsParams) -> Result<Vec<CardRef>> {
        let mut qb = SqlBuilder::new("cards");

        // -- name: partial match unless the caller supplies wildcards --------
        if let Some(ref name) = params.name {
            if name.contains('%') {
                qb.where_like("name", name);
            } else {
                qb.where_like("name", &format!("%{}%", name));
            }
        }

        if let Some(ref sc) = params.set_code {
            qb.where_eq_ignore_case("set_code", sc);
        }

        // -- color_identity: every listed color must be present -------------
        if let Some(ref colors) = params.color_identity {
            for color in colors {
                qb.where_like("color_identity", &format!("%\"{}\"%", color));
            }
        }

        if let Some(ref tl) = params.type_line {
            qb.where_like("type_line", &format!("%{}%", tl));
        }

        if let Some(ref rarity) = params.rarity {
            qb.where_eq_ignore_case("rarity", rarity);
        }

        if let Some(cmc) = params.cmc {
            qb.where_eq("cmc", cmc);
        }
        if let Some(lte) = params.cmc_lte {
            qb.where_lte("cmc", lte);
        }
        if let Some(gte) = params.cmc_gte {
            qb.where_gte("cmc", gte);
        }

        if let Some(ref text) = params.text {
            qb.where_like("oracle_text", &format!("%{}%", text));
        }

        if let Some(ref kw) = params.keyword {
            qb.where_like("keywords", &format!("%\"{}\"%", kw));
        }

        qb.order_by(&["cmc ASC", "name ASC"]);

        if let Some(limit) = params.limit {
            qb.limit(limit);
        }
        if let Some(offset) = params.offset {
            qb.offset(offset);
        }

        let (sql, sql_params) = qb.build();
        self.fetch(&sql, &sql_params)
    }

    fn fetch(&self, sql: &str, params: &[SqlValue]) -> Result<Vec<CardRef>> {
        self.conn
            .execute_into::<CardRow>(sql, params)?
            .into_iter()
            .map(CardRow::into_card)
            .collect()
    }
}
