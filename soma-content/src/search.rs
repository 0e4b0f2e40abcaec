//! Free-text matching over precomputed, lower-cased search fields.

use serde::{Deserialize, Serialize};

/// How a query is matched against a record's searchable fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SearchMode {
    /// The whole query must appear inside a single field.
    #[default]
    Substring,
    /// Every whitespace-separated term must appear in some field.
    AllTerms,
}

/// Normalized form of a user query.
///
/// Queries are trimmed and lower-cased. An empty query matches nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    text: String,
}

impl Query {
    pub fn parse(raw: &str) -> Option<Self> {
        let text = raw.trim().to_lowercase();
        if text.is_empty() {
            None
        } else {
            Some(Self { text })
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.text.split_whitespace()
    }

    /// Check a record's lower-cased fields against this query.
    pub fn matches(&self, fields: &[String], mode: SearchMode) -> bool {
        match mode {
            SearchMode::Substring => fields.iter().any(|f| f.contains(self.text.as_str())),
            SearchMode::AllTerms => self
                .terms()
                .all(|term| fields.iter().any(|f| f.contains(term))),
        }
    }
}
