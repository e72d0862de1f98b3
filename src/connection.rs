//! DuckDB connection wrapper: schema setup and query execution.
//!
//! Cards and decks live in two plain tables. List- and map-valued fields
//! (color identity, keywords, deck zones) are stored as JSON text so rows
//! round-trip through `serde_json` without DuckDB list binding.

use std::collections::HashMap;
use std::path::Path;

use duckdb::{types::ValueRef, Connection as DuckDbConnection};
use serde::de::DeserializeOwned;

use crate::error::Result;
use crate::sql_builder::SqlValue;

const SCHEMA: &str = "
CREATE SEQUENCE IF NOT EXISTS deck_id_seq START 1;

CREATE TABLE IF NOT EXISTS cards (
    id VARCHAR PRIMARY KEY,
    name VARCHAR NOT NULL,
    mana_cost VARCHAR,
    cmc DOUBLE,
    color_identity VARCHAR,
    type_line VARCHAR,
    rarity VARCHAR,
    set_code VARCHAR,
    collector_number VARCHAR,
    oracle_text VARCHAR,
    power VARCHAR,
    toughness VARCHAR,
    loyalty VARCHAR,
    keywords VARCHAR,
    image_uri VARCHAR
);

CREATE TABLE IF NOT EXISTS decks (
    id BIGINT PRIMARY KEY DEFAULT nextval('deck_id_seq'),
    name VARCHAR NOT NULL,
    format VARCHAR NOT NULL,
    description VARCHAR,
    colors VARCHAR,
    strategy_tags VARCHAR,
    mainboard VARCHAR,
    sideboard VARCHAR
);
";

/// Owns the DuckDB database holding the card store and deck store.
pub struct Connection {
    conn: DuckDbConnection,
}

impl Connection {
    /// Open an in-memory database with the schema created.
    pub fn open_in_memory() -> Result<Self> {
        Self::init(DuckDbConnection::open_in_memory()?)
    }

    /// Open (or create) a database file with the schema created.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Self::init(DuckDbConnection::open(path.as_ref())?)
    }

    fn init(conn: DuckDbConnection) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        tracing::debug!("deck database schema ready");
        Ok(Self { conn })
    }

    /// Execute a query and return results as a `Vec` of `HashMap`s.
    ///
    /// Each row maps column names to `serde_json::Value`s.
    pub fn execute(
        &self,
        sql: &str,
        params: &[SqlValue],
    ) -> Result<Vec<HashMap<String, serde_json::Value>>> {
        let mut stmt = self.conn.prepare(sql)?;
        let param_values = as_params(params);

        let mut rows_result = stmt.query(param_values.as_slice())?;

        // Column metadata is only available once the query has run.
        let column_names: Vec<String> = rows_result
            .as_ref()
            .map(|s| s.column_names().into_iter().map(|n| n.to_string()).collect())
            .unwrap_or_default();

        let mut out: Vec<HashMap<String, serde_json::Value>> = Vec::new();

        while let Some(row) = rows_result.next()? {
            let mut map = HashMap::with_capacity(column_names.len());
            for (i, col_name) in column_names.iter().enumerate() {
                map.insert(col_name.clone(), convert_value_ref(row.get_ref(i)?));
            }
            out.push(map);
        }

        Ok(out)
    }

    /// Execute a query and deserialize each row into type `T`.
    pub fn execute_into<T: DeserializeOwned>(
        &self,
        sql: &str,
        params: &[SqlValue],
    ) -> Result<Vec<T>> {
        let rows = self.execute(sql, params)?;
        let mut results = Vec::with_capacity(rows.len());
        for row in rows {
            let value = serde_json::Value::Object(row.into_iter().collect());
            results.push(serde_json::from_value(value)?);
        }
        Ok(results)
    }

    /// Execute a query and return the first column of the first row.
    ///
    /// Returns `None` if the result set is empty.
    pub fn execute_scalar(
        &self,
        sql: &str,
        params: &[SqlValue],
    ) -> Result<Option<serde_json::Value>> {
        let mut stmt = self.conn.prepare(sql)?;
        let param_values = as_params(params);

        let mut rows = stmt.query(param_values.as_slice())?;

        if let Some(row) = rows.next()? {
            Ok(Some(convert_value_ref(row.get_ref(0)?)))
        } else {
            Ok(None)
        }
    }

    /// Run an INSERT/UPDATE/DELETE and return the number of affected rows.
    pub fn execute_statement(&self, sql: &str, params: &[SqlValue]) -> Result<usize> {
        let mut stmt = self.conn.prepare(sql)?;
        let param_values = as_params(params);
        Ok(stmt.execute(param_values.as_slice())?)
    }

    /// Count rows in a table matching an optional `WHERE` fragment.
    pub fn count(&self, table: &str, condition: Option<&str>, params: &[SqlValue]) -> Result<i64> {
        let sql = match condition {
            Some(cond) => format!("SELECT COUNT(*) FROM {} WHERE {}", table, cond),
            None => format!("SELECT COUNT(*) FROM {}", table),
        };
        Ok(self
            .execute_scalar(&sql, params)?
            .and_then(|v| v.as_i64())
            .unwrap_or(0))
    }

    /// Access the underlying DuckDB connection for advanced usage.
    pub fn raw(&self) -> &DuckDbConnection {
        &self.conn
    }
}

fn as_params(params: &[SqlValue]) -> Vec<&dyn duckdb::ToSql> {
    params.iter().map(|p| p as &dyn duckdb::ToSql).collect()
}

/// Convert a DuckDB `ValueRef` to a `serde_json::Value`.
fn convert_value_ref(val: ValueRef<'_>) -> serde_json::Value {
    match val {
        ValueRef::Null => serde_json::Value::Null,
        ValueRef::Boolean(b) => serde_json::Value::Bool(b),
        ValueRef::TinyInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::SmallInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::Int(n) => serde_json::Value::Number(n.into()),
        ValueRef::BigInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::HugeInt(n) => match i64::try_from(n) {
            Ok(i) => serde_json::Value::Number(i.into()),
            Err(_) => serde_json::Value::String(n.to_string()),
        },
        ValueRef::Float(f) => serde_json::Number::from_f64(f as f64)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        ValueRef::Double(f) => serde_json::Number::from_f64(f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        ValueRef::Text(bytes) => serde_json::Value::String(String::from_utf8_lossy(bytes).to_string()),
        _ => serde_json::Value::Null,
    }
}
