//! Lenient field deserializers: partially-filled forms must never fail ingestion.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::text_or_list::TextOrList;

/// Any value that does not fit `T` becomes `T::default()`.
pub fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// Arrays keep the elements that fit `T`; any other shape is an empty list.
pub fn vec_of<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Value::deserialize(deserializer)? {
        Value::Array(items) => Ok(items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect()),
        _ => Ok(Vec::new()),
    }
}

/// A display string; numbers are stringified, lists are joined with spaces,
/// anything else is empty.
pub fn string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let raw = TextOrList::deserialize(deserializer)?;
    Ok(match raw {
        TextOrList::Text(s) => s.trim().to_string(),
        TextOrList::List(items) => items.join(" ").trim().to_string(),
    })
}

/// An optional display string; blank becomes `None`.
pub fn optional_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    let s = string(deserializer)?;
    Ok((!s.is_empty()).then_some(s))
}

/// A string list; a single string is split on commas and newlines.
pub fn string_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    let raw = TextOrList::deserialize(deserializer)?;
    let items: Vec<String> = match raw {
        TextOrList::List(items) => items,
        TextOrList::Text(s) => s.split([',', '\n']).map(String::from).collect(),
    };
    Ok(items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect())
}
