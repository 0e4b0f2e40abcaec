//! Error types for soma-content

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContentError {
    /// A record is missing something the index cannot work without.
    #[error("Malformed record at position {position} (id {id:?}): {reason}")]
    MalformedRecord {
        position: usize,
        id: String,
        reason: String,
    },

    #[error("Failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Content directory not found: {}", .0.display())]
    MissingDirectory(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Built-in {collection} collection is invalid: {source}")]
    Builtin {
        collection: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, ContentError>;
