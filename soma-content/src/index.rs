//! In-memory content index.
//!
//! Built once from an ordered collection of records, then only read. Lookups
//! by id are O(1), subcategory grouping is precomputed, and search runs over
//! lower-cased copies of each record's searchable fields so queries never
//! re-normalize the content.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::error::{ContentError, Result};
use crate::search::{Query, SearchMode};

/// Group key for records that carry no subcategory or category.
pub const UNCATEGORIZED: &str = "uncategorized";

/// Identity, taxonomy and searchable text of an indexable record.
pub trait IndexedRecord {
    /// Unique, stable identifier
    fn record_id(&self) -> &str;

    /// Display label (name or title)
    fn display_name(&self) -> &str;

    /// Grouping key used by [`ContentIndex::by_subcategory`]
    fn taxonomy(&self) -> &str;

    /// Fields a free-text query is matched against
    fn search_fields(&self) -> Vec<&str>;

    /// Describe why the record cannot be indexed, if it cannot.
    fn structural_defect(&self) -> Option<String> {
        if self.record_id().trim().is_empty() {
            return Some("empty id".to_string());
        }
        if self.display_name().trim().is_empty() {
            return Some("empty display name".to_string());
        }
        None
    }
}

/// Immutable registry of records with id lookup, search and grouping.
///
/// Duplicate ids resolve as last write wins: the later record replaces the
/// earlier one but keeps the earlier one's position in collection order.
#[derive(Debug, Clone)]
pub struct ContentIndex<R> {
    /// Records in collection order, one per distinct id
    records: Vec<R>,
    /// Id to slot in `records`
    by_id: HashMap<String, usize>,
    /// Taxonomy key to slots, ascending
    by_taxonomy: HashMap<String, Vec<usize>>,
    /// Taxonomy keys in order of first appearance
    taxonomy_order: Vec<String>,
    /// Lower-cased search fields, parallel to `records`
    search_text: Vec<Vec<String>>,
}

impl<R: IndexedRecord> ContentIndex<R> {
    /// Build the index, failing on the first malformed record.
    pub fn build(records: impl IntoIterator<Item = R>) -> Result<Self> {
        let mut slots: Vec<R> = Vec::new();
        let mut by_id: HashMap<String, usize> = HashMap::new();
        let mut overwritten = 0usize;

        for (position, record) in records.into_iter().enumerate() {
            if let Some(reason) = record.structural_defect() {
                return Err(ContentError::MalformedRecord {
                    position,
                    id: record.record_id().to_string(),
                    reason,
                });
            }

            let existing = by_id.get(record.record_id()).copied();
            match existing {
                Some(slot) => {
                    warn!(
                        id = %record.record_id(),
                        position,
                        "Duplicate record id, later record replaces earlier one"
                    );
                    slots[slot] = record;
                    overwritten += 1;
                }
                None => {
                    by_id.insert(record.record_id().to_string(), slots.len());
                    slots.push(record);
                }
            }
        }

        let mut by_taxonomy: HashMap<String, Vec<usize>> = HashMap::new();
        let mut taxonomy_order = Vec::new();
        let mut search_text = Vec::with_capacity(slots.len());

        for (slot, record) in slots.iter().enumerate() {
            let key = record.taxonomy();
            match by_taxonomy.get_mut(key) {
                Some(group) => group.push(slot),
                None => {
                    taxonomy_order.push(key.to_string());
                    by_taxonomy.insert(key.to_string(), vec![slot]);
                }
            }

            search_text.push(
                record
                    .search_fields()
                    .into_iter()
                    .map(str::to_lowercase)
                    .collect(),
            );
        }

        debug!(
            records = slots.len(),
            subcategories = taxonomy_order.len(),
            duplicates = overwritten,
            "Built content index"
        );

        Ok(Self {
            records: slots,
            by_id,
            by_taxonomy,
            taxonomy_order,
            search_text,
        })
    }

    /// Look up a record by id.
    pub fn get(&self, id: &str) -> Option<&R> {
        self.by_id.get(id).map(|&slot| &self.records[slot])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    /// Number of indexed records (distinct ids).
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records in collection order.
    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, R> {
        self.records.iter()
    }

    /// Case-insensitive substring search, in collection order.
    ///
    /// A blank query returns nothing.
    pub fn search(&self, query: &str) -> Vec<&R> {
        self.search_with(query, SearchMode::Substring)
    }

    /// Search requiring every whitespace-separated term to match some field.
    pub fn search_all_terms(&self, query: &str) -> Vec<&R> {
        self.search_with(query, SearchMode::AllTerms)
    }

    pub fn search_with(&self, query: &str, mode: SearchMode) -> Vec<&R> {
        let Some(query) = Query::parse(query) else {
            return Vec::new();
        };

        self.records
            .iter()
            .zip(&self.search_text)
            .filter(|(_, fields)| query.matches(fields, mode))
            .map(|(record, _)| record)
            .collect()
    }

    /// Records whose subcategory equals `subcategory` exactly (case-sensitive).
    pub fn by_subcategory(&self, subcategory: &str) -> Vec<&R> {
        self.by_taxonomy
            .get(subcategory)
            .map(|slots| slots.iter().map(|&slot| &self.records[slot]).collect())
            .unwrap_or_default()
    }

    /// Records in any of the given subcategories, in collection order.
    pub fn by_subcategories<S: AsRef<str>>(&self, subcategories: &[S]) -> Vec<&R> {
        let wanted: HashSet<&str> = subcategories.iter().map(|s| s.as_ref()).collect();
        self.records
            .iter()
            .filter(|record| wanted.contains(record.taxonomy()))
            .collect()
    }

    /// Distinct subcategories in order of first appearance.
    pub fn subcategories(&self) -> impl Iterator<Item = &str> {
        self.taxonomy_order.iter().map(String::as_str)
    }

    pub fn subcategory_counts(&self) -> BTreeMap<&str, usize> {
        self.by_taxonomy
            .iter()
            .map(|(key, slots)| (key.as_str(), slots.len()))
            .collect()
    }

    /// All ids, sorted.
    pub fn ids_sorted(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.by_id.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}

impl<R: IndexedRecord + Serialize> ContentIndex<R> {
    /// SHA-256 over the serialized records in collection order.
    pub fn fingerprint(&self) -> Result<String> {
        let mut hasher = Sha256::new();
        for record in &self.records {
            hasher.update(serde_json::to_vec(record)?);
            hasher.update([0u8]);
        }
        Ok(hex::encode(hasher.finalize()))
    }
}

impl<'a, R> IntoIterator for &'a ContentIndex<R> {
    type Item = &'a R;
    type IntoIter = std::slice::Iter<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Serialize)]
    struct Note {
        id: String,
        name: String,
        group: String,
        body: String,
    }

    impl IndexedRecord for Note {
        fn record_id(&self) -> &str {
            &self.id
        }

        fn display_name(&self) -> &str {
            &self.name
        }

        fn taxonomy(&self) -> &str {
            &self.group
        }

        fn search_fields(&self) -> Vec<&str> {
            vec![self.name.as_str(), self.body.as_str()]
        }
    }

    fn note(id: &str, name: &str, group: &str, body: &str) -> Note {
        Note {
            id: id.to_string(),
            name: name.to_string(),
            group: group.to_string(),
            body: body.to_string(),
        }
    }

    fn sample() -> ContentIndex<Note> {
        ContentIndex::build(vec![
            note("a", "Alpha", "letters", "first of the greek letters"),
            note("one", "One", "numbers", "smallest positive integer"),
            note("b", "Beta", "letters", "second letter"),
            note("two", "Two", "numbers", "even prime"),
        ])
        .unwrap()
    }

    #[test]
    fn test_get_and_count() {
        let index = sample();
        assert_eq!(index.len(), 4);
        assert_eq!(index.get("b").map(|n| n.name.as_str()), Some("Beta"));
        assert!(index.get("missing").is_none());
        assert!(index.contains("two"));
    }

    #[test]
    fn test_search_preserves_collection_order() {
        let index = sample();
        let ids: Vec<&str> = index.search("letter").iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_empty_query_matches_nothing() {
        let index = sample();
        assert!(index.search("").is_empty());
        assert!(index.search("  ").is_empty());
        assert!(index.search_all_terms("").is_empty());
    }

    #[test]
    fn test_search_is_idempotent() {
        let index = sample();
        assert_eq!(index.search("e"), index.search("e"));
    }

    #[test]
    fn test_all_terms_search() {
        let index = sample();
        let hits = index.search_all_terms("even PRIME");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "two");
    }

    #[test]
    fn test_grouping_is_exact_and_ordered() {
        let index = sample();
        let numbers: Vec<&str> = index.by_subcategory("numbers").iter().map(|n| n.id.as_str()).collect();
        assert_eq!(numbers, vec!["one", "two"]);
        assert!(index.by_subcategory("Numbers").is_empty());

        let groups: Vec<&str> = index.subcategories().collect();
        assert_eq!(groups, vec!["letters", "numbers"]);
        assert_eq!(index.subcategory_counts().get("letters"), Some(&2));
    }

    #[test]
    fn test_by_subcategories_keeps_collection_order() {
        let index = sample();
        let ids: Vec<&str> = index
            .by_subcategories(&["numbers", "letters"])
            .iter()
            .map(|n| n.id.as_str())
            .collect();
        assert_eq!(ids, vec!["a", "one", "b", "two"]);
    }

    #[test]
    fn test_duplicate_id_last_write_wins_in_first_position() {
        let index = ContentIndex::build(vec![
            note("x", "Old", "g", ""),
            note("y", "Other", "g", ""),
            note("x", "New", "h", ""),
        ])
        .unwrap();

        assert_eq!(index.len(), 2);
        assert_eq!(index.get("x").unwrap().name, "New");
        assert_eq!(index.records()[0].id, "x");
        assert!(index.by_subcategory("h").iter().any(|n| n.id == "x"));
        assert!(index.by_subcategory("g").iter().all(|n| n.id != "x"));
    }

    #[test]
    fn test_malformed_record_fails_build() {
        let err = ContentIndex::build(vec![note("ok", "Fine", "g", ""), note(" ", "Blank", "g", "")])
            .unwrap_err();
        match err {
            ContentError::MalformedRecord { position, .. } => assert_eq!(position, 1),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_ids_sorted() {
        assert_eq!(sample().ids_sorted(), vec!["a", "b", "one", "two"]);
    }

    #[test]
    fn test_fingerprint_tracks_content() {
        let a = sample();
        let b = sample();
        assert_eq!(a.fingerprint().unwrap(), b.fingerprint().unwrap());

        let c = ContentIndex::build(vec![note("a", "Alpha", "letters", "changed")]).unwrap();
        assert_ne!(a.fingerprint().unwrap(), c.fingerprint().unwrap());
    }
}
