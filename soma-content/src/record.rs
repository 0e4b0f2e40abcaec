//! Uniform view over both content schemas.

use serde::{Deserialize, Serialize};

use crate::index::{ContentIndex, IndexedRecord, UNCATEGORIZED};
use crate::types::{CrossReference, EducationalContent, LegacyEducationalContent};

/// A record in either schema.
///
/// Serialized with an explicit `"schema"` tag so loaders never have to guess
/// the shape of a record from its fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "schema", rename_all = "kebab-case")]
pub enum ContentRecord {
    Educational(EducationalContent),
    Legacy(LegacyEducationalContent),
}

impl ContentRecord {
    pub fn id(&self) -> &str {
        match self {
            Self::Educational(c) => &c.id,
            Self::Legacy(c) => &c.id,
        }
    }

    /// `name` for current records, `title` for legacy ones.
    pub fn display_name(&self) -> &str {
        match self {
            Self::Educational(c) => &c.name,
            Self::Legacy(c) => &c.title,
        }
    }

    pub fn specialty(&self) -> Option<&str> {
        match self {
            Self::Educational(c) => c.specialty.as_deref(),
            Self::Legacy(_) => None,
        }
    }

    pub fn category(&self) -> Option<&str> {
        match self {
            Self::Educational(c) => c.category.as_deref(),
            Self::Legacy(c) => Some(&c.category),
        }
    }

    pub fn subcategory(&self) -> Option<&str> {
        match self {
            Self::Educational(c) => c.subcategory.as_deref(),
            Self::Legacy(c) => Some(&c.subcategory),
        }
    }

    /// Grouping key: subcategory, then category, then [`UNCATEGORIZED`].
    pub fn taxonomy(&self) -> &str {
        self.subcategory()
            .or_else(|| self.category())
            .unwrap_or(UNCATEGORIZED)
    }

    pub fn level_count(&self) -> usize {
        match self {
            Self::Educational(c) => c.levels.len(),
            Self::Legacy(c) => c.levels.len(),
        }
    }

    /// Outgoing weak links. Legacy records carry none.
    pub fn cross_references(&self) -> &[CrossReference] {
        match self {
            Self::Educational(c) => &c.cross_references,
            Self::Legacy(_) => &[],
        }
    }

    pub fn keywords(&self) -> &[String] {
        match self {
            Self::Educational(c) => &c.tags.keywords,
            Self::Legacy(_) => &[],
        }
    }

    pub fn as_educational(&self) -> Option<&EducationalContent> {
        match self {
            Self::Educational(c) => Some(c),
            Self::Legacy(_) => None,
        }
    }

    pub fn is_legacy(&self) -> bool {
        matches!(self, Self::Legacy(_))
    }
}

impl From<EducationalContent> for ContentRecord {
    fn from(content: EducationalContent) -> Self {
        Self::Educational(content)
    }
}

impl From<LegacyEducationalContent> for ContentRecord {
    fn from(content: LegacyEducationalContent) -> Self {
        Self::Legacy(content)
    }
}

impl IndexedRecord for ContentRecord {
    fn record_id(&self) -> &str {
        self.id()
    }

    fn display_name(&self) -> &str {
        ContentRecord::display_name(self)
    }

    fn taxonomy(&self) -> &str {
        ContentRecord::taxonomy(self)
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = Vec::new();
        match self {
            Self::Educational(c) => {
                fields.push(c.name.as_str());
                fields.extend(c.name_es.as_deref());
                fields.extend(c.alternate_names.iter().map(String::as_str));
                for level in c.levels.values() {
                    fields.push(level.summary.as_str());
                    fields.extend(level.key_terms.iter().map(|k| k.term.as_str()));
                }
                fields.extend(c.tags.keywords.iter().map(String::as_str));
            }
            Self::Legacy(c) => {
                fields.push(c.title.as_str());
                fields.push(c.description.as_str());
                for level in c.levels.values() {
                    fields.push(level.title.as_str());
                    fields.push(level.description.as_str());
                }
            }
        }
        fields
    }

    fn structural_defect(&self) -> Option<String> {
        if self.id().trim().is_empty() {
            return Some("empty id".to_string());
        }
        if self.display_name().trim().is_empty() {
            return Some("empty display name".to_string());
        }
        if self.level_count() == 0 {
            return Some("record has no levels".to_string());
        }
        None
    }
}

/// A cross reference whose target is not in the index.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DanglingReference<'a> {
    pub source_id: &'a str,
    pub reference: &'a CrossReference,
}

impl ContentIndex<ContentRecord> {
    /// Resolve a record's cross references against this index.
    ///
    /// Targets that are not indexed are skipped. An unknown `id` yields an
    /// empty list.
    pub fn related(&self, id: &str) -> Vec<(&CrossReference, &ContentRecord)> {
        let Some(record) = self.get(id) else {
            return Vec::new();
        };

        record
            .cross_references()
            .iter()
            .filter_map(|xref| self.get(&xref.target_id).map(|target| (xref, target)))
            .collect()
    }

    /// Every cross reference in the index whose target is missing.
    pub fn dangling_references(&self) -> Vec<DanglingReference<'_>> {
        self.iter()
            .flat_map(move |record| {
                record
                    .cross_references()
                    .iter()
                    .filter(move |xref| !self.contains(&xref.target_id))
                    .map(move |reference| DanglingReference {
                        source_id: record.id(),
                        reference,
                    })
            })
            .collect()
    }
}
