//! Canonical resume data model consumed by the renderer.
//!
//! Ingestion folds every string-or-list field into one shape, so nothing past
//! deserialization handles unions. Every field is lenient: a partially-filled
//! form always deserializes.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::lenient;
use super::text_or_list;

pub const DEFAULT_LANGUAGE_LEVEL: &str = "Basic";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Profile {
    #[serde(deserialize_with = "lenient::optional_string")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient::optional_string")]
    pub email: Option<String>,
    #[serde(deserialize_with = "lenient::optional_string")]
    pub phone: Option<String>,
    #[serde(deserialize_with = "lenient::optional_string")]
    pub location: Option<String>,
    #[serde(deserialize_with = "lenient::optional_string")]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JobEntry {
    #[serde(deserialize_with = "lenient::string")]
    pub title: String,
    #[serde(deserialize_with = "lenient::string")]
    pub company: String,
    #[serde(deserialize_with = "lenient::optional_string")]
    pub location: Option<String>,
    #[serde(deserialize_with = "lenient::optional_string")]
    pub start_date: Option<String>,
    #[serde(deserialize_with = "lenient::optional_string")]
    pub end_date: Option<String>,
    #[serde(deserialize_with = "text_or_list::bullets")]
    pub bullets: Vec<String>,
    /// Bullet source used only when `bullets` is empty.
    #[serde(
        deserialize_with = "text_or_list::fallback_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub summary: Option<String>,
    #[serde(
        deserialize_with = "text_or_list::fallback_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,
}

impl JobEntry {
    pub fn fallback_text(&self) -> Option<&str> {
        self.summary.as_deref().or(self.description.as_deref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EducationEntry {
    #[serde(deserialize_with = "lenient::string")]
    pub degree: String,
    #[serde(deserialize_with = "lenient::string")]
    pub institution: String,
    #[serde(deserialize_with = "lenient::optional_string")]
    pub location: Option<String>,
    #[serde(deserialize_with = "lenient::optional_string")]
    pub start_date: Option<String>,
    #[serde(deserialize_with = "lenient::optional_string")]
    pub end_date: Option<String>,
    #[serde(deserialize_with = "text_or_list::bullets")]
    pub bullets: Vec<String>,
    #[serde(
        deserialize_with = "text_or_list::fallback_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub summary: Option<String>,
    #[serde(
        deserialize_with = "text_or_list::fallback_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,
}

impl EducationEntry {
    pub fn fallback_text(&self) -> Option<&str> {
        self.summary.as_deref().or(self.description.as_deref())
    }
}

/// A spoken language. A plain string carries no level; a structured entry
/// without a level is read as [`DEFAULT_LANGUAGE_LEVEL`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "LanguageInput", into = "LanguageInput")]
pub struct Language {
    pub language: String,
    pub level: Option<String>,
}

impl Language {
    /// Display form: `English` or `English (Fluent)`.
    pub fn display(&self) -> String {
        match &self.level {
            Some(level) => format!("{} ({})", self.language, level),
            None => self.language.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum LanguageInput {
    Plain(String),
    Structured {
        language: String,
        #[serde(default)]
        level: Option<String>,
    },
}

impl From<LanguageInput> for Language {
    fn from(input: LanguageInput) -> Self {
        match input {
            LanguageInput::Plain(language) => Language {
                language: language.trim().to_string(),
                level: None,
            },
            LanguageInput::Structured { language, level } => {
                let level = level
                    .map(|l| l.trim().to_string())
                    .filter(|l| !l.is_empty())
                    .unwrap_or_else(|| DEFAULT_LANGUAGE_LEVEL.to_string());
                Language {
                    language: language.trim().to_string(),
                    level: Some(level),
                }
            }
        }
    }
}

impl From<Language> for LanguageInput {
    fn from(language: Language) -> Self {
        match language.level {
            None => LanguageInput::Plain(language.language),
            level => LanguageInput::Structured {
                language: language.language,
                level,
            },
        }
    }
}

fn languages<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Language>, D::Error> {
    let items = match Value::deserialize(deserializer)? {
        Value::Array(items) => items,
        Value::String(s) => vec![Value::String(s)],
        _ => Vec::new(),
    };
    Ok(items
        .into_iter()
        .filter_map(|item| serde_json::from_value::<Language>(item).ok())
        .filter(|l| !l.language.is_empty())
        .collect())
}

/// The canonical resume shape. Owned by the form layer; render only reads it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResumeDocumentModel {
    #[serde(deserialize_with = "lenient::or_default")]
    pub profile: Profile,
    /// One entry per rendered summary bullet.
    #[serde(deserialize_with = "text_or_list::summary")]
    pub summary: Vec<String>,
    #[serde(deserialize_with = "text_or_list::highlights")]
    pub personal_highlights: String,
    #[serde(deserialize_with = "lenient::vec_of")]
    pub experience: Vec<JobEntry>,
    #[serde(deserialize_with = "lenient::vec_of")]
    pub education: Vec<EducationEntry>,
    #[serde(deserialize_with = "lenient::string_list")]
    pub skills: Vec<String>,
    #[serde(deserialize_with = "languages")]
    pub languages: Vec<Language>,
    #[serde(
        rename = "workingRightsAU",
        deserialize_with = "lenient::optional_string"
    )]
    pub working_rights_au: Option<String>,
    #[serde(deserialize_with = "lenient::optional_string")]
    pub working_rights_other: Option<String>,
    #[serde(deserialize_with = "lenient::optional_string")]
    pub linkedin: Option<String>,
}

/// Covered / missing keyword sets for one "check mode" render. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoverageReview {
    #[serde(deserialize_with = "lenient::string_list")]
    pub covered: Vec<String>,
    #[serde(deserialize_with = "lenient::string_list")]
    pub missing: Vec<String>,
}

impl CoverageReview {
    pub fn is_empty(&self) -> bool {
        self.covered.is_empty() && self.missing.is_empty()
    }
}
