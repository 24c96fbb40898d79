//! `TextOrList`: the string-or-list shape that form fields arrive in, and the
//! serde helpers that fold it into canonical fields at ingestion.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::bullets::normalizer::{
    normalize_bullets, normalize_highlights, split_sentences, BulletInput,
};

/// A field that may arrive as one string or an ordered list of strings.
///
/// Deserialization never fails: numbers become text, and anything that is
/// neither a string, a number nor an array becomes an empty list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TextOrList {
    Text(String),
    List(Vec<String>),
}

impl Default for TextOrList {
    fn default() -> Self {
        TextOrList::List(Vec::new())
    }
}

impl From<Value> for TextOrList {
    fn from(value: Value) -> Self {
        match value {
            Value::String(s) => TextOrList::Text(s),
            Value::Number(n) => TextOrList::Text(n.to_string()),
            Value::Array(items) => TextOrList::List(items.into_iter().filter_map(item_text).collect()),
            _ => TextOrList::default(),
        }
    }
}

impl<'de> Deserialize<'de> for TextOrList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Value::deserialize(deserializer)?.into())
    }
}

impl TextOrList {
    pub fn as_input(&self) -> BulletInput<'_> {
        BulletInput::from(self)
    }

    pub fn is_blank(&self) -> bool {
        match self {
            TextOrList::Text(s) => s.trim().is_empty(),
            TextOrList::List(items) => items.iter().all(|s| s.trim().is_empty()),
        }
    }

    /// Flattens to one string, list entries separated by newlines.
    pub fn joined(&self) -> String {
        match self {
            TextOrList::Text(s) => s.clone(),
            TextOrList::List(items) => items.join("\n"),
        }
    }
}

/// Array elements: strings kept, numbers stringified, objects contribute `text`.
fn item_text(item: Value) -> Option<String> {
    match item {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Object(map) => map.get("text").and_then(Value::as_str).map(String::from),
        _ => None,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// deserialize_with helpers
// ────────────────────────────────────────────────────────────────────────────

/// Entry bullets: normalized via the bullet normalizer.
pub fn bullets<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    let raw = TextOrList::deserialize(deserializer)?;
    Ok(normalize_bullets(raw.as_input()))
}

/// Professional summary: one entry per list item, or one per sentence of a string.
pub fn summary<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    let raw = TextOrList::deserialize(deserializer)?;
    Ok(summary_entries(&raw))
}

/// Personal highlights: one normalized paragraph.
pub fn highlights<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let raw = TextOrList::deserialize(deserializer)?;
    Ok(normalize_highlights(raw.as_input()))
}

/// Fallback bullet source; list entries are kept on separate lines, blank becomes `None`.
pub fn fallback_text<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    let raw = TextOrList::deserialize(deserializer)?;
    if raw.is_blank() {
        return Ok(None);
    }
    Ok(Some(raw.joined()))
}

pub fn summary_entries(raw: &TextOrList) -> Vec<String> {
    match raw {
        TextOrList::List(items) => items
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect(),
        TextOrList::Text(text) => split_sentences(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_string_becomes_text() {
        let v: TextOrList = serde_json::from_value(json!("Led team")).unwrap();
        assert_eq!(v, TextOrList::Text("Led team".to_string()));
    }

    #[test]
    fn test_array_keeps_strings_numbers_and_text_fields() {
        let v: TextOrList =
            serde_json::from_value(json!(["a", 3, {"text": "b"}, {"other": 1}, null, true]))
                .unwrap();
        assert_eq!(
            v,
            TextOrList::List(vec!["a".to_string(), "3".to_string(), "b".to_string()])
        );
    }

    #[test]
    fn test_malformed_shapes_become_empty_list() {
        for value in [json!(null), json!(false), json!({"a": "b"})] {
            let v: TextOrList = serde_json::from_value(value).unwrap();
            assert_eq!(v, TextOrList::default());
        }
    }

    #[test]
    fn test_scalar_number_becomes_text() {
        let v: TextOrList = serde_json::from_value(json!(42)).unwrap();
        assert_eq!(v, TextOrList::Text("42".to_string()));
        let v: TextOrList = serde_json::from_value(json!(3.5)).unwrap();
        assert_eq!(v, TextOrList::Text("3.5".to_string()));
    }

    #[test]
    fn test_summary_entries_by_shape() {
        let list = TextOrList::List(vec![" First. ".to_string(), "".to_string(), "Second".to_string()]);
        assert_eq!(summary_entries(&list), vec!["First.", "Second"]);

        let text = TextOrList::Text("Analyst with 5 years. Loves SQL!".to_string());
        assert_eq!(summary_entries(&text), vec!["Analyst with 5 years", "Loves SQL"]);
    }

    #[test]
    fn test_serializes_untagged() {
        assert_eq!(
            serde_json::to_value(TextOrList::Text("x".to_string())).unwrap(),
            json!("x")
        );
        assert_eq!(
            serde_json::to_value(TextOrList::List(vec!["x".to_string()])).unwrap(),
            json!(["x"])
        );
    }
}
