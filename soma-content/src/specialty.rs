//! Flat specialty reference entries.
//!
//! A compact clinical reference card per topic (pathophysiology, workup,
//! management, red flags) used by the specialty databases alongside the
//! multi-level educational records.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::index::IndexedRecord;

#[cfg(feature = "typescript")]
use ts_rs::TS;

/// Organ or practice area of a gastroenterology reference entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "kebab-case")]
pub enum GiSubcategory {
    Esophageal,
    Gastric,
    Hepatic,
    Pancreatic,
    Biliary,
    SmallBowel,
    Colorectal,
    Functional,
    Procedural,
}

impl GiSubcategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Esophageal => "esophageal",
            Self::Gastric => "gastric",
            Self::Hepatic => "hepatic",
            Self::Pancreatic => "pancreatic",
            Self::Biliary => "biliary",
            Self::SmallBowel => "small-bowel",
            Self::Colorectal => "colorectal",
            Self::Functional => "functional",
            Self::Procedural => "procedural",
        }
    }

    pub fn all() -> [Self; 9] {
        [
            Self::Esophageal,
            Self::Gastric,
            Self::Hepatic,
            Self::Pancreatic,
            Self::Biliary,
            Self::SmallBowel,
            Self::Colorectal,
            Self::Functional,
            Self::Procedural,
        ]
    }
}

impl fmt::Display for GiSubcategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One reference card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct SpecialtyEntry {
    pub id: String,
    pub name: String,
    pub name_es: String,
    pub subcategory: GiSubcategory,
    pub summary: String,
    pub pathophysiology: String,
    pub clinical_features: Vec<String>,
    pub diagnostic_workup: Vec<String>,
    pub management: String,
    pub dietary_recommendations: String,
    pub medications: Vec<String>,
    pub when_to_refer: String,
    pub red_flags: Vec<String>,
    pub patient_tip: String,
}

impl IndexedRecord for SpecialtyEntry {
    fn record_id(&self) -> &str {
        &self.id
    }

    fn display_name(&self) -> &str {
        &self.name
    }

    fn taxonomy(&self) -> &str {
        self.subcategory.as_str()
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str(), self.name_es.as_str(), self.summary.as_str()];
        fields.extend(self.clinical_features.iter().map(String::as_str));
        fields.extend(self.medications.iter().map(String::as_str));
        fields
    }
}
