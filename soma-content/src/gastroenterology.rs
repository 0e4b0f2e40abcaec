//! Built-in gastroenterology collections.
//!
//! Two collections ship with the crate, embedded at compile time:
//!
//! - the educational set: nine condition records and two procedure records,
//!   grouped under the `conditions` and `procedures` subcategories
//! - the specialty reference: flat clinical reference cards grouped by organ
//!   ([`GiSubcategory`](crate::specialty::GiSubcategory))
//!
//! [`GiDatabase`] wraps the educational set with the lookup, search and
//! grouping operations consumers use.

use tracing::debug;

use crate::error::{ContentError, Result};
use crate::index::ContentIndex;
use crate::record::ContentRecord;
use crate::search::SearchMode;
use crate::specialty::SpecialtyEntry;

const EDUCATION_JSON: &str = include_str!("../data/gastroenterology/education.json");
const SPECIALTY_REFERENCE_JSON: &str = include_str!("../data/gastroenterology/specialty-reference.json");

pub const SPECIALTY: &str = "gastroenterology";

/// Record type of the gastroenterology collection.
pub type GiSpecialtyEntry = ContentRecord;

/// The educational records, in authored order.
pub fn education_entries() -> Result<Vec<GiSpecialtyEntry>> {
    serde_json::from_str(EDUCATION_JSON).map_err(|source| ContentError::Builtin {
        collection: "gastroenterology education",
        source,
    })
}

/// The flat reference cards, in authored order.
pub fn specialty_entries() -> Result<Vec<SpecialtyEntry>> {
    serde_json::from_str(SPECIALTY_REFERENCE_JSON).map_err(|source| ContentError::Builtin {
        collection: "gastroenterology specialty reference",
        source,
    })
}

/// Index over the reference cards.
pub fn specialty_reference() -> Result<ContentIndex<SpecialtyEntry>> {
    ContentIndex::build(specialty_entries()?)
}

/// Query surface over the gastroenterology educational records.
#[derive(Debug, Clone)]
pub struct GiDatabase {
    index: ContentIndex<GiSpecialtyEntry>,
    search_mode: SearchMode,
}

impl GiDatabase {
    /// Build from the embedded collection.
    pub fn load() -> Result<Self> {
        let db = Self::from_records(education_entries()?)?;
        debug!(entries = db.gi_entry_count(), "Loaded gastroenterology database");
        Ok(db)
    }

    pub fn from_records(records: impl IntoIterator<Item = GiSpecialtyEntry>) -> Result<Self> {
        Ok(Self {
            index: ContentIndex::build(records)?,
            search_mode: SearchMode::default(),
        })
    }

    pub fn with_search_mode(mut self, mode: SearchMode) -> Self {
        self.search_mode = mode;
        self
    }

    /// Record by id, if present.
    pub fn get_gi_entry(&self, id: &str) -> Option<&GiSpecialtyEntry> {
        self.index.get(id)
    }

    /// Records matching `query`, in collection order. Blank queries match nothing.
    pub fn search_gi_entries(&self, query: &str) -> Vec<&GiSpecialtyEntry> {
        self.index.search_with(query, self.search_mode)
    }

    /// Records whose subcategory is exactly `subcategory`.
    pub fn gi_by_subcategory(&self, subcategory: &str) -> Vec<&GiSpecialtyEntry> {
        self.index.by_subcategory(subcategory)
    }

    pub fn gi_entry_count(&self) -> usize {
        self.index.len()
    }

    pub fn index(&self) -> &ContentIndex<GiSpecialtyEntry> {
        &self.index
    }

    pub fn into_index(self) -> ContentIndex<GiSpecialtyEntry> {
        self.index
    }
}
