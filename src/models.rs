//! Data models for article metadata returned by the search API.
//!
//! This module defines the core data structures used throughout the
//! application:
//! - [`ArticleRecord`]: One search result, kept as an opaque field mapping
//! - [`SearchEnvelope`] / [`SearchBody`]: The JSON envelope the API wraps
//!   results in
//!
//! Records are deliberately schemaless: the API is asked for a configured
//! list of fields and whatever comes back is carried through to the CSV
//! writer unchanged. Only the two fields the aggregation step needs —
//! publication date and pillar name — get typed accessors.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Field carrying the article's publication timestamp.
pub const PUBLICATION_DATE_FIELD: &str = "webPublicationDate";

/// Field carrying the article's editorial pillar (section group).
pub const PILLAR_FIELD: &str = "pillarName";

/// Timestamp format the API uses for publication dates.
const PUBLICATION_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// A single article search result.
///
/// The record is an opaque mapping of named JSON fields. The set of fields
/// present depends on what the request asked for via `show-fields`; callers
/// look values up by name rather than through a fixed struct so the field
/// whitelist can change without touching this type.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(transparent)]
pub struct ArticleRecord {
    fields: Map<String, Value>,
}

impl ArticleRecord {
    /// Look up a field by name and render it as a string.
    ///
    /// String values are returned as-is; other non-null JSON values are
    /// rendered with their JSON representation (the CSV writer wants text
    /// for every cell). Missing or `null` fields return `None`.
    pub fn field(&self, name: &str) -> Option<String> {
        match self.fields.get(name) {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(other) => Some(other.to_string()),
        }
    }

    /// Parse the record's publication timestamp.
    ///
    /// The API emits ISO-8601 `Z`-suffixed timestamps like
    /// `2024-02-11T08:00:00Z`. Returns `None` when the field is missing or
    /// does not parse; the fetch loop decides what to do with such records.
    pub fn publication_date(&self) -> Option<NaiveDateTime> {
        let raw = self.field(PUBLICATION_DATE_FIELD)?;
        NaiveDateTime::parse_from_str(&raw, PUBLICATION_DATE_FORMAT).ok()
    }

    /// The record's editorial pillar, if the API supplied one.
    pub fn pillar(&self) -> Option<String> {
        self.field(PILLAR_FIELD)
    }
}

/// Top-level JSON envelope around a search response.
#[derive(Debug, Deserialize)]
pub struct SearchEnvelope {
    /// The response body; the API nests everything under `response`.
    pub response: SearchBody,
}

/// The body of a search response.
#[derive(Debug, Deserialize)]
pub struct SearchBody {
    /// Response status reported by the API (e.g. `"ok"`).
    #[serde(default)]
    pub status: String,
    /// The page of results; absent means an empty page.
    #[serde(default)]
    pub results: Vec<ArticleRecord>,
}
