use paleo_types::{Transcript, WordBox};
use serde_json::Value;

use crate::toon;

const FIELDS: [&str; 4] = ["x", "y", "w", "h"];

/// Decode a coordinate-mode answer into word boxes.
///
/// Never fails: anything that does not decode becomes
/// [`Transcript::Undecodable`] carrying the raw answer.
pub fn decode_word_boxes(raw: &str) -> Transcript {
    match toon::decode(raw)
        .map_err(|e| e.to_string())
        .and_then(|value| word_boxes(&value))
    {
        Ok(words) => Transcript::Words(words),
        Err(error) => {
            tracing::warn!("Failed to decode word boxes: {error}");
            Transcript::Undecodable {
                error,
                raw: raw.to_string(),
            }
        }
    }
}

fn word_boxes(value: &Value) -> Result<Vec<WordBox>, String> {
    let rows = word_table(value).ok_or_else(|| "no word table in answer".to_string())?;

    rows.iter()
        .enumerate()
        .map(|(index, row)| word_box(row).map_err(|e| format!("word {index}: {e}")))
        .collect()
}

/// Root array, the `words` field, or the first array of objects
fn word_table(value: &Value) -> Option<&Vec<Value>> {
    match value {
        Value::Array(rows) => Some(rows),
        Value::Object(map) => map
            .get("words")
            .and_then(Value::as_array)
            .or_else(|| {
                map.values()
                    .filter_map(Value::as_array)
                    .find(|rows| rows.iter().all(Value::is_object))
            }),
        _ => None,
    }
}

fn word_box(row: &Value) -> Result<WordBox, String> {
    let raw = match row.get("raw") {
        Some(Value::String(text)) => text.clone(),
        // "1885" decodes as a number
        Some(Value::Number(number)) => number.to_string(),
        Some(Value::Bool(flag)) => flag.to_string(),
        _ => return Err("missing `raw`".to_string()),
    };

    let mut coords = [0.0; 4];
    for (slot, field) in coords.iter_mut().zip(FIELDS) {
        *slot = match row.get(field) {
            Some(Value::Number(number)) => number.as_f64(),
            Some(Value::String(text)) => text.trim().parse().ok(),
            _ => None,
        }
        .ok_or_else(|| format!("missing or non-numeric `{field}`"))?;
    }

    let [x, y, w, h] = coords;
    Ok(WordBox { raw, x, y, w, h })
}
