use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Flavor assumed when a request or a model reply does not name one.
pub const DEFAULT_LANGUAGE: &str = "javascript";

/// Resolve an optional language to the flavor actually used.
///
/// Only a missing or empty value falls back; anything else is kept verbatim.
pub fn resolve_language(language: Option<&str>) -> &str {
    language
        .filter(|language| !language.is_empty())
        .unwrap_or(DEFAULT_LANGUAGE)
}

/// A named bucket that scopes query history. Identity is the name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Structured subset of a model reply.
///
/// Every field has an empty default so a reply that could not be parsed
/// still yields a storable record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedResult {
    pub regex: Option<String>,
    #[serde(default)]
    pub flags: String,
    #[serde(default)]
    pub explanation: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default)]
    pub sample_matches: Vec<String>,
    #[serde(default)]
    pub sample_non_matches: Vec<String>,
    #[serde(default)]
    pub notes: String,
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

impl Default for ExtractedResult {
    fn default() -> Self {
        Self {
            regex: None,
            flags: String::new(),
            explanation: String::new(),
            language: default_language(),
            sample_matches: Vec::new(),
            sample_non_matches: Vec::new(),
            notes: String::new(),
        }
    }
}

/// Fields supplied when a generation is logged. Id and timestamp are
/// assigned by the store.
#[derive(Debug, Clone)]
pub struct NewQueryLog {
    pub instruction: String,
    pub examples: Vec<String>,
    pub language: String,
    pub model: String,
    pub raw_response: String,
    pub extracted: ExtractedResult,
    pub profile_id: Option<String>,
}

/// One persisted generation request/response pair. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryLog {
    pub id: String,
    pub instruction: String,
    pub examples: Vec<String>,
    pub language: String,
    pub model: String,
    pub raw_response: String,
    pub extracted: ExtractedResult,
    #[serde(rename = "profile")]
    pub profile_id: Option<String>,
    pub created_at: DateTime<Utc>,
}
