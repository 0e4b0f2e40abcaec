//! Record model for authored medical education content.
//!
//! Two schemas exist side by side in the authored corpus: the current
//! [`EducationalContent`] shape and the older [`LegacyEducationalContent`]
//! shape used by the embryology modules. Both are wrapped by
//! [`ContentRecord`](crate::record::ContentRecord) before indexing.
//!
//! JSON field names are camelCase to match the authored content. With the
//! `typescript` feature enabled, these types can be exported to TypeScript
//! using ts-rs for the presentation layer.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

#[cfg(feature = "typescript")]
use ts_rs::TS;

/// Depth tier of an explanation, from 1 (lay summary) to 5 (expert).
///
/// Authored content uses levels as object keys, so a level deserializes from
/// either a number or a numeric string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(into = "u8")]
pub struct ComplexityLevel(u8);

impl ComplexityLevel {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    /// Build a level, rejecting values outside 1..=5.
    pub fn new(value: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&value).then_some(Self(value))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// All five levels, shallowest first.
    pub fn all() -> impl Iterator<Item = Self> {
        (Self::MIN..=Self::MAX).map(Self)
    }

    pub fn label(&self) -> &'static str {
        match self.0 {
            1 => "lay",
            2 => "student",
            3 => "clinical",
            4 => "specialist",
            _ => "expert",
        }
    }
}

impl TryFrom<u8> for ComplexityLevel {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| {
            format!(
                "complexity level {} outside {}..={}",
                value,
                Self::MIN,
                Self::MAX
            )
        })
    }
}

impl From<ComplexityLevel> for u8 {
    fn from(level: ComplexityLevel) -> Self {
        level.0
    }
}

impl<'de> Deserialize<'de> for ComplexityLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct LevelVisitor;

        impl Visitor<'_> for LevelVisitor {
            type Value = ComplexityLevel;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a complexity level between 1 and 5")
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
                u8::try_from(value)
                    .ok()
                    .and_then(ComplexityLevel::new)
                    .ok_or_else(|| E::invalid_value(de::Unexpected::Unsigned(value), &self))
            }

            fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
                u8::try_from(value)
                    .ok()
                    .and_then(ComplexityLevel::new)
                    .ok_or_else(|| E::invalid_value(de::Unexpected::Signed(value), &self))
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
                value
                    .trim()
                    .parse::<u8>()
                    .ok()
                    .and_then(ComplexityLevel::new)
                    .ok_or_else(|| E::invalid_value(de::Unexpected::Str(value), &self))
            }
        }

        deserializer.deserialize_any(LevelVisitor)
    }
}

impl fmt::Display for ComplexityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "kebab-case")]
pub enum ContentType {
    Structure,
    System,
    Pathway,
    Process,
    Condition,
    Concept,
    Topic,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Structure => "structure",
            Self::System => "system",
            Self::Pathway => "pathway",
            Self::Process => "process",
            Self::Condition => "condition",
            Self::Concept => "concept",
            Self::Topic => "topic",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a cross-referenced record relates to its source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "kebab-case")]
pub enum Relationship {
    Parent,
    Child,
    Sibling,
    Related,
    SeeAlso,
}

/// Publishing status. Display data only; nothing in the index acts on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "lowercase")]
pub enum ContentStatus {
    Draft,
    Review,
    Published,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "lowercase")]
pub enum ClinicalRelevance {
    Low,
    Medium,
    High,
    Critical,
}

/// A term and its definition, shown alongside a level's explanation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct KeyTerm {
    pub term: String,
    pub definition: String,
}

/// Body of one complexity level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct LevelContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "typescript", ts(type = "number | null"))]
    pub level: Option<ComplexityLevel>,
    pub summary: String,
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub key_terms: Vec<KeyTerm>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clinical_notes: Option<String>,
    #[serde(default)]
    pub analogies: Vec<String>,
    #[serde(default)]
    pub examples: Vec<String>,
    #[serde(default)]
    pub patient_counseling_points: Vec<String>,
}

/// Bibliographic source backing a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct Citation {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
}

/// Diagram, image or animation attached to a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct MediaAsset {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Weak link to another record by id.
///
/// The target may not exist in any loaded collection. Consumers resolve it
/// with a lookup and treat a miss as "no link", never as an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct CrossReference {
    pub target_id: String,
    pub target_type: ContentType,
    pub relationship: Relationship,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct ExamRelevance {
    #[serde(default)]
    pub usmle: bool,
    #[serde(default)]
    pub nbme: bool,
    #[serde(default)]
    pub shelf: Vec<String>,
}

/// Free-form classification of a record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct ContentTags {
    #[serde(default)]
    pub systems: Vec<String>,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clinical_relevance: Option<ClinicalRelevance>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exam_relevance: Option<ExamRelevance>,
}

/// A topic explained at up to five depths, in the current schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct EducationalContent {
    pub id: String,
    #[serde(rename = "type")]
    pub content_type: ContentType,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_es: Option<String>,
    #[serde(default)]
    pub alternate_names: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialty: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icd11: Option<String>,
    #[cfg_attr(feature = "typescript", ts(type = "Record<number, LevelContent>"))]
    pub levels: BTreeMap<ComplexityLevel, LevelContent>,
    #[serde(default)]
    pub media: Vec<MediaAsset>,
    #[serde(default)]
    pub citations: Vec<Citation>,
    #[serde(default)]
    pub cross_references: Vec<CrossReference>,
    #[serde(default)]
    pub tags: ContentTags,
    pub created_at: String,
    pub updated_at: String,
    pub version: u32,
    pub status: ContentStatus,
    #[serde(default)]
    pub contributors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct Flashcard {
    pub id: String,
    pub front: String,
    pub back: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub id: String,
    pub question: String,
    pub options: Vec<String>,
    /// Index into `options`
    pub correct_answer: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

/// One level of a legacy record: markdown body plus study aids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct LegacyLevel {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub flashcards: Vec<Flashcard>,
    #[serde(default)]
    pub quiz: Vec<QuizQuestion>,
}

/// Older course-style schema (title, category, markdown levels).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct LegacyEducationalContent {
    pub id: String,
    pub title: String,
    pub category: String,
    pub subcategory: String,
    pub description: String,
    #[cfg_attr(feature = "typescript", ts(type = "Record<number, LegacyLevel>"))]
    pub levels: BTreeMap<ComplexityLevel, LegacyLevel>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complexity_level_bounds() {
        assert!(ComplexityLevel::new(0).is_none());
        assert!(ComplexityLevel::new(6).is_none());
        assert_eq!(ComplexityLevel::new(3).map(ComplexityLevel::get), Some(3));
        assert_eq!(ComplexityLevel::all().count(), 5);
    }

    #[test]
    fn test_levels_deserialize_from_string_keys() {
        let json = r#"{"1": {"summary": "lay"}, "4": {"summary": "deep"}}"#;
        let levels: BTreeMap<ComplexityLevel, LevelContent> = serde_json::from_str(json).unwrap();

        let keys: Vec<u8> = levels.keys().map(|l| l.get()).collect();
        assert_eq!(keys, vec![1, 4]);
        assert!(levels.values().all(|l| l.key_terms.is_empty()));
    }

    #[test]
    fn test_out_of_range_level_rejected() {
        let json = r#"{"9": {"summary": "nope"}}"#;
        let parsed: Result<BTreeMap<ComplexityLevel, LevelContent>, _> = serde_json::from_str(json);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_relationship_wire_names() {
        let rel: Relationship = serde_json::from_str("\"see-also\"").unwrap();
        assert_eq!(rel, Relationship::SeeAlso);
        assert!(serde_json::from_str::<Relationship>("\"cousin\"").is_err());
    }

    #[test]
    fn test_cross_reference_camel_case() {
        let json = r#"{"targetId": "condition-x", "targetType": "condition", "relationship": "related"}"#;
        let xref: CrossReference = serde_json::from_str(json).unwrap();
        assert_eq!(xref.target_id, "condition-x");
        assert_eq!(xref.target_type, ContentType::Condition);
        assert!(xref.label.is_none());
    }
}
