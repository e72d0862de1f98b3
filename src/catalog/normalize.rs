//! Boundary adapter from loosely-shaped card JSON to [`CardRef`].
//!
//! Card data arrives from Scryfall (`type_line`, `color_identity`, `set`),
//! from MTGJSON-style exports (`type`, `colorIdentity`, `manaValue`,
//! `setCode`) and from older database dumps that mix both. Every alias is
//! resolved here so the deck core only ever sees one shape.

use serde_json::Value;

use crate::config;
use crate::error::{DeckError, Result};
use crate::models::CardRef;

const FACE_SEPARATOR: &str = " // ";

/// Normalize one card object into a [`CardRef`].
///
/// Fails with [`DeckError::InvalidArgument`] when the id or name is missing,
/// when the cost is negative, or when a color code is not one of `WUBRG`.
pub fn normalize_card(raw: &Value) -> Result<CardRef> {
    let obj = raw
        .as_object()
        .ok_or_else(|| DeckError::InvalidArgument("Card data must be a JSON object".into()))?;

    let id = first_str(raw, &["id", "uuid", "card_id", "cardId"])
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| DeckError::InvalidArgument("Card is missing an id".into()))?;

    let name = first_str(raw, &["name"])
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .ok_or_else(|| DeckError::InvalidArgument(format!("Card {} has an empty name", id)))?;

    let faces: Vec<&Value> = obj
        .get("card_faces")
        .or_else(|| obj.get("cardFaces"))
        .and_then(|v| v.as_array())
        .map(|arr| arr.iter().collect())
        .unwrap_or_default();

    let type_line = first_str(raw, &["type_line", "typeLine", "type"])
        .or_else(|| joined_face_field(&faces, "type_line"))
        .unwrap_or_default();

    let mana_cost = first_str(raw, &["mana_cost", "manaCost"])
        .or_else(|| joined_face_field(&faces, "mana_cost"))
        .unwrap_or_default();

    let cmc = first_f64(raw, &["cmc", "manaValue", "mana_value", "convertedManaCost"]).unwrap_or(0.0);
    if cmc < 0.0 {
        return Err(DeckError::InvalidArgument(format!(
            "Converted mana cost (CMC) cannot be negative for card {}",
            id
        )));
    }

    let color_identity = first_list(raw, &["color_identity", "colorIdentity", "colors"]);
    if let Some(bad) = color_identity.iter().find(|c| !config::is_color_code(c)) {
        return Err(DeckError::InvalidArgument(format!(
            "Invalid color '{}' in color identity of card {}. Must be one of: W, U, B, R, G",
            bad, id
        )));
    }

    let image_uri = first_str(raw, &["image_uri", "imageUri"])
        .or_else(|| normal_image(raw))
        .or_else(|| faces.first().and_then(|f| normal_image(f)));

    Ok(CardRef {
        id,
        name,
        mana_cost,
        cmc,
        color_identity,
        type_line,
        rarity: first_str(raw, &["rarity"]).unwrap_or_default(),
        set_code: first_str(raw, &["set", "set_code", "setCode"]).unwrap_or_default(),
        collector_number: first_str(raw, &["collector_number", "collectorNumber", "number"]),
        oracle_text: first_str(raw, &["oracle_text", "oracleText", "text"]),
        power: first_str(raw, &["power"]),
        toughness: first_str(raw, &["toughness"]),
        loyalty: first_str(raw, &["loyalty"]),
        keywords: first_list(raw, &["keywords"]),
        image_uri,
    })
}

/// Normalize every card in a JSON array or a `{"data": [...]}` envelope.
pub fn normalize_cards(raw: &Value) -> Result<Vec<CardRef>> {
    let items = match raw {
        Value::Array(arr) => arr,
        Value::Object(map) => match map.get("data") {
            Some(Value::Array(arr)) => arr,
            _ => return Ok(vec![normalize_card(raw)?]),
        },
        _ => {
            return Err(DeckError::InvalidArgument(
                "Expected a card object or an array of cards".into(),
            ))
        }
    };
    items.iter().map(normalize_card).collect()
}

// ---------------------------------------------------------------------------
// Field helpers
// ---------------------------------------------------------------------------

fn first_str(raw: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|k| match raw.get(*k)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn first_f64(raw: &Value, keys: &[&str]) -> Option<f64> {
    keys.iter().find_map(|k| match raw.get(*k)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

/// Lists come either as JSON arrays or as `"R, U"` strings.
fn first_list(raw: &Value, keys: &[&str]) -> Vec<String> {
    for key in keys {
        match raw.get(*key) {
            Some(Value::Array(arr)) => {
                return arr
                    .iter()
                    .filter_map(|v| v.as_str())
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect();
            }
            Some(Value::String(s)) => {
                return s
                    .split(',')
                    .map(|p| p.trim().to_string())
                    .filter(|p| !p.is_empty())
                    .collect();
            }
            _ => continue,
        }
    }
    Vec::new()
}

fn normal_image(raw: &Value) -> Option<String> {
    raw.get("image_uris")
        .and_then(|u| u.get("normal"))
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
}

/// Join a per-face field with `" // "` when every face has it, otherwise fall
/// back to the first face that does.
fn joined_face_field(faces: &[&Value], key: &str) -> Option<String> {
    let values: Vec<&str> = faces
        .iter()
        .filter_map(|f| f.get(key).and_then(|v| v.as_str()))
        .filter(|s| !s.is_empty())
        .collect();
    if values.is_empty() {
        None
    } else if values.len() == faces.len() {
        Some(values.join(FACE_SEPARATOR))
    } else {
        Some(values[0].to_string())
    }
}
