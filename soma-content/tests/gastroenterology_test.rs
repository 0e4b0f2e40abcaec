//! Gastroenterology database integration tests

use std::collections::HashSet;

use soma_content::gastroenterology::{education_entries, specialty_reference};
use soma_content::{ContentRecord, GiDatabase, GiSubcategory};

const CONDITION_IDS: [&str; 9] = [
    "condition-gerd-peptic-ulcer",
    "condition-inflammatory-bowel-disease",
    "condition-irritable-bowel-syndrome",
    "condition-liver-diseases",
    "condition-gallbladder-disease",
    "condition-pancreatitis",
    "condition-gi-cancers",
    "condition-gi-bleeding",
    "condition-celiac-malabsorption",
];

fn db() -> GiDatabase {
    GiDatabase::load().expect("embedded collection loads")
}

fn ids<'a>(records: &[&'a ContentRecord]) -> Vec<&'a str> {
    records.iter().map(|r| r.id()).collect()
}

#[test]
fn test_get_gerd_entry() {
    let db = db();
    let gerd = db.get_gi_entry("condition-gerd-peptic-ulcer").expect("GERD record");
    assert_eq!(gerd.display_name(), "GERD and Peptic Ulcer Disease");
}

#[test]
fn test_unknown_id_is_not_found() {
    assert!(db().get_gi_entry("does-not-exist").is_none());
}

#[test]
fn test_search_celiac() {
    let db = db();
    let hits = ids(&db.search_gi_entries("celiac"));
    assert!(hits.contains(&"condition-celiac-malabsorption"));
}

#[test]
fn test_conditions_subcategory_excludes_procedures() {
    let db = db();
    let conditions = ids(&db.gi_by_subcategory("conditions"));
    assert_eq!(conditions, CONDITION_IDS.to_vec());
    assert_eq!(db.gi_by_subcategory("procedures").len(), 2);
    assert!(db.gi_by_subcategory("Conditions").is_empty());
}

#[test]
fn test_entry_count() {
    let db = db();
    assert_eq!(db.gi_entry_count(), 11);
    assert_eq!(db.gi_entry_count(), education_entries().unwrap().len());
}

#[test]
fn test_every_record_round_trips_through_lookup() {
    let db = db();
    for record in education_entries().unwrap() {
        assert_eq!(db.get_gi_entry(record.id()), Some(&record));
    }
}

#[test]
fn test_name_substrings_find_their_record() {
    let db = db();
    for record in db.index().records() {
        let name = record.display_name();
        let chars: Vec<char> = name.chars().collect();
        let middle: String = chars[chars.len() / 4..chars.len() * 3 / 4].iter().collect();
        for query in [name.to_string(), name.to_uppercase(), middle] {
            if query.trim().is_empty() {
                continue;
            }
            assert!(
                db.search_gi_entries(&query).iter().any(|r| r.id() == record.id()),
                "query {query:?} missed {}",
                record.id()
            );
        }
    }
}

#[test]
fn test_blank_search_is_empty_and_idempotent() {
    let db = db();
    assert!(db.search_gi_entries("").is_empty());
    assert!(db.search_gi_entries("   ").is_empty());
    assert_eq!(db.search_gi_entries("liver"), db.search_gi_entries("liver"));
}

#[test]
fn test_subcategories_partition_the_collection() {
    let db = db();
    let index = db.index();

    let mut seen = Vec::new();
    for subcategory in index.subcategories() {
        let group = index.by_subcategory(subcategory);
        assert!(group.iter().all(|r| r.taxonomy() == subcategory));
        seen.extend(group.iter().map(|r| r.id()));
    }

    assert_eq!(seen.len(), index.len());
    let unique: HashSet<&str> = seen.iter().copied().collect();
    assert_eq!(unique.len(), index.len());
}

#[test]
fn test_subcategory_preserves_collection_order() {
    let db = db();
    let order: Vec<&str> = db.index().iter().map(|r| r.id()).collect();
    let procedures = ids(&db.gi_by_subcategory("procedures"));
    let positions: Vec<usize> = procedures
        .iter()
        .map(|id| order.iter().position(|o| o == id).unwrap())
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_dangling_cross_references_are_tolerated() {
    let db = db();
    let dangling = db.index().dangling_references();
    assert!(dangling
        .iter()
        .any(|d| d.reference.target_id == "condition-eosinophilic-esophagitis"));

    let related = db.index().related("condition-gerd-peptic-ulcer");
    let targets: Vec<&str> = related.iter().map(|(_, r)| r.id()).collect();
    assert_eq!(targets, vec!["condition-gi-bleeding", "procedure-upper-endoscopy"]);
}

#[test]
fn test_specialty_reference_groups() {
    let reference = specialty_reference().unwrap();
    assert_eq!(reference.len(), 25);

    let counts = reference.subcategory_counts();
    assert_eq!(counts.get("hepatic"), Some(&4));
    assert_eq!(counts.get("colorectal"), Some(&4));
    assert_eq!(counts.get("procedural"), Some(&2));
    assert_eq!(counts.values().sum::<usize>(), 25);

    for sub in GiSubcategory::all() {
        assert!(!reference.by_subcategory(sub.as_str()).is_empty(), "{sub}");
    }
}

#[test]
fn test_specialty_reference_searches_spanish_names() {
    let reference = specialty_reference().unwrap();
    let first = reference.records().first().unwrap();
    let hits = reference.search(&first.name_es);
    assert!(hits.iter().any(|e| e.id == first.id));
}
