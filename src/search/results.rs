//! Flattening of raw engine responses

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Reserved key highlight fragments are merged under
pub const HIGHLIGHT_KEY: &str = "highlight";

/// A hit's source attributes, plus highlights when present
pub type SearchRecord = Map<String, Value>;

/// A user completion option
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSuggestion {
    pub id: Value,
    pub username: Value,
    pub fullname: Value,
}

/// Records from `hits.hits`. Missing shapes yield no records.
pub fn extract_hits(raw: &Value) -> Vec<SearchRecord> {
    let hits = match raw.pointer("/hits/hits").and_then(Value::as_array) {
        Some(hits) => hits,
        None => return Vec::new(),
    };

    hits.iter()
        .map(|hit| {
            let mut record = hit
                .get("_source")
                .and_then(Value::as_object)
                .cloned()
                .unwrap_or_default();

            if let Some(highlight) = hit.get(HIGHLIGHT_KEY).filter(|h| is_present(h)) {
                record.insert(HIGHLIGHT_KEY.to_string(), highlight.clone());
            }
            record
        })
        .collect()
}

/// Total hit count from `hits.total`.
///
/// Accepts both the bare number and the `{"value": n}` form; anything else is 0.
pub fn extract_total(raw: &Value) -> u64 {
    match raw.pointer("/hits/total") {
        Some(Value::Number(n)) => n.as_u64().unwrap_or(0),
        Some(Value::Object(total)) => total.get("value").and_then(Value::as_u64).unwrap_or(0),
        _ => 0,
    }
}

/// Options of the first suggestion group
fn suggest_options(raw: &Value) -> &[Value] {
    raw.pointer("/suggest/suggest/0/options")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// `"schema.name"` for each table option
pub fn table_suggestions(raw: &Value) -> Vec<String> {
    suggest_options(raw)
        .iter()
        .map(|option| {
            let schema = source_str(option, "schema");
            let name = source_str(option, "name");
            format!("{}.{}", schema, name)
        })
        .collect()
}

/// `{id, username, fullname}` for each user option
pub fn user_suggestions(raw: &Value) -> Vec<UserSuggestion> {
    suggest_options(raw)
        .iter()
        .map(|option| UserSuggestion {
            id: source_value(option, "id"),
            username: source_value(option, "username"),
            fullname: source_value(option, "fullname"),
        })
        .collect()
}

fn source_value(option: &Value, key: &str) -> Value {
    option
        .get("_source")
        .and_then(|source| source.get(key))
        .cloned()
        .unwrap_or(Value::Null)
}

fn source_str(option: &Value, key: &str) -> String {
    match source_value(option, key) {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Null, empty containers and empty strings count as absent
fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
        Value::Number(_) => true,
    }
}
