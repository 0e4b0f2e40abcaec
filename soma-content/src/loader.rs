//! Reading authored content from disk.
//!
//! A content directory holds `*.json` files, searched recursively. Each file
//! carries a single record or an array of records. Files are visited in
//! file-name order within each directory, so the resulting collection order
//! is stable across runs.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

use crate::config::{default_content_dir, CatalogConfig};
use crate::error::{ContentError, Result};
use crate::gastroenterology;
use crate::record::ContentRecord;

#[derive(Deserialize)]
#[serde(untagged)]
enum ContentFile {
    Many(Vec<ContentRecord>),
    One(Box<ContentRecord>),
}

impl ContentFile {
    fn into_records(self) -> Vec<ContentRecord> {
        match self {
            Self::Many(records) => records,
            Self::One(record) => vec![*record],
        }
    }
}

/// Loads content records from a directory tree.
#[derive(Debug, Clone)]
pub struct ContentLoader {
    root: PathBuf,
}

impl ContentLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Content files under the root, in load order.
    pub fn files(&self) -> Result<Vec<PathBuf>> {
        if !self.root.is_dir() {
            return Err(ContentError::MissingDirectory(self.root.clone()));
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(&self.root)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_hidden(e))
        {
            let entry = entry?;
            if entry.file_type().is_file() && is_json(entry.path()) {
                files.push(entry.into_path());
            }
        }
        Ok(files)
    }

    /// Load every record under the root.
    pub fn load(&self) -> Result<Vec<ContentRecord>> {
        let files = self.files()?;
        let mut records = Vec::new();
        for path in &files {
            records.extend(load_file(path)?);
        }

        debug!(
            root = %self.root.display(),
            files = files.len(),
            records = records.len(),
            "Loaded content directory"
        );
        Ok(records)
    }
}

/// Records selected by a catalog config, built-in collections first.
///
/// An explicitly configured directory must exist. The platform default
/// directory is read only when present.
pub fn load_configured(config: &CatalogConfig) -> Result<Vec<ContentRecord>> {
    let mut records = Vec::new();
    if config.include_builtin {
        records.extend(gastroenterology::education_entries()?);
    }

    match &config.content_dir {
        Some(dir) => records.extend(ContentLoader::new(dir).load()?),
        None => {
            if let Some(dir) = default_content_dir().filter(|d| d.is_dir()) {
                records.extend(ContentLoader::new(dir).load()?);
            }
        }
    }

    debug!(records = records.len(), builtin = config.include_builtin, "Assembled catalog records");
    Ok(records)
}

/// Parse one content file.
pub fn load_file(path: &Path) -> Result<Vec<ContentRecord>> {
    let bytes = fs::read(path)?;
    let file: ContentFile = serde_json::from_slice(&bytes).map_err(|source| ContentError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    let records = file.into_records();
    debug!(path = %path.display(), records = records.len(), "Parsed content file");
    Ok(records)
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}
