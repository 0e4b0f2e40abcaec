//! Shared, swappable catalog.
//!
//! Readers take an `Arc` snapshot and query it without holding any lock.
//! Reloading builds a fresh index off to the side and swaps the pointer, so
//! a published index is never mutated in place.

use std::sync::{Arc, RwLock};

use tracing::{debug, info};

use crate::error::Result;
use crate::index::ContentIndex;
use crate::record::ContentRecord;

pub type Catalog = ContentIndex<ContentRecord>;

#[derive(Debug)]
pub struct CatalogHandle {
    current: RwLock<Arc<Catalog>>,
}

impl CatalogHandle {
    pub fn new(index: Catalog) -> Self {
        Self {
            current: RwLock::new(Arc::new(index)),
        }
    }

    /// The index as of now. Later swaps do not affect the returned snapshot.
    pub fn snapshot(&self) -> Arc<Catalog> {
        // A poisoned lock still holds a complete index; only the pointer is guarded.
        let guard = self.current.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&guard)
    }

    /// Publish a new index, returning the one it replaced.
    pub fn replace(&self, index: Catalog) -> Arc<Catalog> {
        let next = Arc::new(index);
        let mut guard = self.current.write().unwrap_or_else(|e| e.into_inner());
        let previous = std::mem::replace(&mut *guard, next);
        info!(
            previous = previous.len(),
            current = guard.len(),
            "Catalog replaced"
        );
        previous
    }

    /// Publish `index` only if its content differs from the current one.
    pub fn replace_if_changed(&self, index: Catalog) -> Result<bool> {
        let incoming = index.fingerprint()?;
        let current = self.snapshot().fingerprint()?;
        if incoming == current {
            debug!(fingerprint = %current, "Catalog unchanged, keeping current index");
            return Ok(false);
        }
        self.replace(index);
        Ok(true)
    }
}

impl From<Catalog> for CatalogHandle {
    fn from(index: Catalog) -> Self {
        Self::new(index)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::types::*;

    fn record(id: &str, summary: &str) -> ContentRecord {
        let mut levels = BTreeMap::new();
        levels.insert(
            ComplexityLevel::new(1).unwrap(),
            LegacyLevel {
                title: "Intro".to_string(),
                description: summary.to_string(),
                content: "body".to_string(),
                flashcards: vec![],
                quiz: vec![],
            },
        );
        LegacyEducationalContent {
            id: id.to_string(),
            title: id.to_uppercase(),
            category: "Embryology".to_string(),
            subcategory: "General".to_string(),
            description: summary.to_string(),
            levels,
        }
        .into()
    }

    fn catalog(records: Vec<ContentRecord>) -> Catalog {
        ContentIndex::build(records).unwrap()
    }

    #[test]
    fn test_snapshot_survives_replace() {
        let handle = CatalogHandle::new(catalog(vec![record("a", "first")]));
        let before = handle.snapshot();

        let previous = handle.replace(catalog(vec![record("a", "first"), record("b", "second")]));
        assert!(Arc::ptr_eq(&before, &previous));
        assert_eq!(before.len(), 1);
        assert_eq!(handle.snapshot().len(), 2);
    }

    #[test]
    fn test_replace_if_changed() {
        let handle = CatalogHandle::new(catalog(vec![record("a", "first")]));
        let original = handle.snapshot();

        assert!(!handle.replace_if_changed(catalog(vec![record("a", "first")])).unwrap());
        assert!(Arc::ptr_eq(&original, &handle.snapshot()));

        assert!(handle.replace_if_changed(catalog(vec![record("a", "edited")])).unwrap());
        assert!(!Arc::ptr_eq(&original, &handle.snapshot()));
    }

    #[test]
    fn test_concurrent_readers() {
        let handle = Arc::new(CatalogHandle::new(catalog(vec![record("a", "first")])));
        let readers: Vec<_> = (0..4)
            .map(|_| {
                let handle = Arc::clone(&handle);
                std::thread::spawn(move || handle.snapshot().len())
            })
            .collect();
        handle.replace(catalog(vec![record("a", "x"), record("b", "y")]));

        for reader in readers {
            let seen = reader.join().unwrap();
            assert!(seen == 1 || seen == 2);
        }
    }
}
