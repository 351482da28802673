use serde::Serialize;
use serde_json::{Map, Value};

use crate::covers::{CoverSize, Covers};

/// One search result.
///
/// Built only by [`crate::validate::validate`]; a missing or null
/// `author_name` becomes an empty list and a null `cover_edition_key`
/// becomes `None`.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct Book {
    pub title: String,
    pub author_name: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_edition_key: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Book {
    pub fn authors(&self) -> String {
        self.author_name.join(", ")
    }

    pub fn thumbnail_url(&self, covers: &Covers) -> Option<String> {
        self.cover_edition_key
            .as_deref()
            .map(|key| covers.url(key, CoverSize::Small))
    }

    pub fn cover_url(&self, covers: &Covers) -> Option<String> {
        self.cover_edition_key
            .as_deref()
            .map(|key| covers.url(key, CoverSize::Large))
    }
}

/// Result set for one query. `num_found` counts every match on the server
/// and is usually larger than `docs.len()`.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct SearchResponse {
    pub num_found: u64,
    pub docs: Vec<Book>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
