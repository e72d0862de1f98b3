//! DuckDB-backed deck repository.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::connection::Connection;
use crate::error::{DeckError, Result};
use crate::models::DeckComposition;
use crate::repository::{
    check_storable, deck_not_found, duplicate_name, require_id, DeckRepository,
};
use crate::sql_builder::{SqlBuilder, SqlValue};

/// One `decks` row. Zones and tag lists are JSON text.
#[derive(Debug, Deserialize)]
struct DeckRow {
    id: i64,
    name: String,
    format: String,
    description: Option<String>,
    colors: Option<String>,
    strategy_tags: Option<String>,
    mainboard: Option<String>,
    sideboard: Option<String>,
}

impl DeckRow {
    fn into_deck(self) -> Result<DeckComposition> {
        Ok(DeckComposition {
            id: Some(self.id),
            name: self.name,
            format: self.format,
            description: self.description,
            colors: parse_or_default(self.colors.as_deref())?,
            strategy_tags: parse_or_default(self.strategy_tags.as_deref())?,
            mainboard: parse_or_default::<BTreeMap<String, u32>>(self.mainboard.as_deref())?,
            sideboard: parse_or_default::<BTreeMap<String, u32>>(self.sideboard.as_deref())?,
        })
    }
}

fn parse_or_default<T>(raw: Option<&str>) -> Result<T>
where
    T: serde::de::DeserializeOwned + Default,
{
    match raw {
        Some(s) if !s.trim().is_empty() => Ok(serde_json::from_str(s)?),
        _ => Ok(T::default()),
    }
}

/// Column values after `id`, in schema order.
fn row_params(deck: &DeckComposition) -> Result<Vec<SqlValue>> {
    Ok(vec![
        SqlValue::from(&deck.name),
        SqlValue::from(&deck.format),
        SqlValue::from(deck.description.clone()),
        SqlValue::from(serde_json::to_string(&deck.colors)?),
        SqlValue::from(serde_json::to_string(&deck.strategy_tags)?),
        SqlValue::from(serde_json::to_string(&deck.mainboard)?),
        SqlValue::from(serde_json::to_string(&deck.sideboard)?),
    ])
}

/// Saved decks in the `decks` table.
pub struct DeckStore<'a> {
    conn: &'a Connection,
}

impl<'a> DeckStore<'a> {
    /// Create a new `DeckStore` bound to the given connection.
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Look up a saved deck by exact name.
    pub fn get_by_name(&self, name: &str) -> Result<Option<DeckComposition>> {
        let (sql, params) = SqlBuilder::new("decks")
            .where_eq("name", name)
            .limit(1)
            .build();
        Ok(self.fetch(&sql, &params)?.into_iter().next())
    }

    /// Number of saved decks.
    pub fn count(&self) -> Result<i64> {
        self.conn.count("decks", None, &[])
    }

    fn name_taken(&self, name: &str, except: Option<i64>) -> Result<bool> {
        let n = match except {
            Some(id) => self.conn.count(
                "decks",
                Some("name = ? AND id <> ?"),
                &[SqlValue::from(name), SqlValue::from(id)],
            )?,
            None => self
                .conn
                .count("decks", Some("name = ?"), &[SqlValue::from(name)])?,
        };
        Ok(n > 0)
    }

    fn next_id(&self) -> Result<i64> {
        self.conn
            .execute_scalar("SELECT nextval('deck_id_seq')", &[])?
            .and_then(|v| v.as_i64())
            .ok_or_else(|| {
                DeckError::InvalidArgument("deck id sequence returned no value".into())
            })
    }

    fn fetch(&self, sql: &str, params: &[SqlValue]) -> Result<Vec<DeckComposition>> {
        self.conn
            .execute_into::<DeckRow>(sql, params)?
            .into_iter()
            .map(DeckRow::into_deck)
            .collect()
    }
}

impl DeckRepository for DeckStore<'_> {
    fn create(&self, deck: &DeckComposition) -> Result<DeckComposition> {
        check_storable(deck)?;
        if self.name_taken(&deck.name, None)? {
            return Err(duplicate_name(&deck.name));
        }

        let id = self.next_id()?;
        let mut params = vec![SqlValue::from(id)];
        params.extend(row_params(deck)?);
        self.conn.execute_statement(
            "INSERT INTO decks (id, name, format, description, colors, strategy_tags, mainboard, sideboard) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            &params,
        )?;
        tracing::debug!(id, name = %deck.name, "created deck");

        let mut saved = deck.clone();
        saved.id = Some(id);
        Ok(saved)
    }

    fn get(&self, id: i64) -> Result<Option<DeckComposition>> {
        let (sql, params) = SqlBuilder::new("decks").where_eq("id", id).limit(1).build();
        Ok(self.fetch(&sql, &params)?.into_iter().next())
    }

    fn update(&self, deck: &DeckComposition) -> Result<DeckComposition> {
        let id = require_id(deck)?;
        check_storable(deck)?;
        if self.get(id)?.is_none() {
            return Err(deck_not_found(id));
        }
        if self.name_taken(&deck.name, Some(id))? {
            return Err(duplicate_name(&deck.name));
        }

        let mut params = row_params(deck)?;
        params.push(SqlValue::from(id));
        self.conn.execute_statement(
            "UPDATE decks SET name = ?, format = ?, description = ?, colors = ?, \
             strategy_tags = ?, mainboard = ?, sideboard = ? WHERE id = ?",
            &params,
        )?;
        tracing::debug!(id, "updated deck");
        Ok(deck.clone())
    }

    fn delete(&self, id: i64) -> Result<()> {
        let affected = self
            .conn
            .execute_statement("DELETE FROM decks WHERE id = ?", &[SqlValue::from(id)])?;
        if affected == 0 {
            return Err(deck_not_found(id));
        }
        tracing::debug!(id, "deleted deck");
        Ok(())
    }

    fn list(&self, skip: usize, limit: usize) -> Result<Vec<DeckComposition>> {
        let (sql, params) = SqlBuilder::new("decks")
            .order_by(&["id ASC"])
            .limit(limit)
            .offset(skip)
            .build();
        self.fetch(&sql, &params)
    }

    fn search_by_format(&self, format: &str) -> Result<Vec<DeckComposition>> {
        let (sql, params) = SqlBuilder::new("decks")
            .where_eq_ignore_case("format", format)
            .order_by(&["id ASC"])
            .build();
        self.fetch(&sql, &params)
    }
}
