//! Soma Content - medical education content index
//!
//! Structured, multi-level educational records (conditions, procedures,
//! concepts) organized by specialty, plus the in-memory index that serves
//! lookups, free-text search and taxonomy grouping over them.
//!
//! ## Record schemas
//!
//! | Schema | Type | Levels carry |
//! |--------|------|--------------|
//! | `educational` | [`EducationalContent`] | summary, explanation, key terms, clinical notes |
//! | `legacy` | [`LegacyEducationalContent`] | title, markdown body, flashcards, quiz |
//!
//! Both are wrapped in [`ContentRecord`] and indexed uniformly.
//!
//! ## Usage
//!
//! ```no_run
//! use soma_content::GiDatabase;
//!
//! let db = GiDatabase::load()?;
//! let gerd = db.get_gi_entry("condition-gerd-peptic-ulcer");
//! let hits = db.search_gi_entries("celiac");
//! let conditions = db.gi_by_subcategory("conditions");
//! # Ok::<(), soma_content::ContentError>(())
//! ```
//!
//! ## Features
//!
//! - `typescript` - Export the record model to TypeScript via ts-rs

pub mod config;
pub mod error;
pub mod gastroenterology;
pub mod handle;
pub mod index;
pub mod loader;
pub mod record;
pub mod search;
pub mod specialty;
pub mod types;
pub mod validation;

// Re-exports
pub use config::{CatalogConfig, SearchConfig};
pub use error::{ContentError, Result};
pub use gastroenterology::{GiDatabase, GiSpecialtyEntry};
pub use handle::{Catalog, CatalogHandle};
pub use index::{ContentIndex, IndexedRecord, UNCATEGORIZED};
pub use loader::{load_configured, ContentLoader};
pub use record::{ContentRecord, DanglingReference};
pub use search::{Query, SearchMode};
pub use specialty::{GiSubcategory, SpecialtyEntry};
pub use types::{
    ComplexityLevel, ContentStatus, ContentType, CrossReference, EducationalContent,
    LegacyEducationalContent, Relationship,
};
pub use validation::{
    ContentValidator, IssueCategory, Severity, ValidationConfig, ValidationIssue, ValidationReport,
};
