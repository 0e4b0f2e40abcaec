//! Record-level content validation.
//!
//! Checks authored records for completeness and quality before they are
//! published: required levels, placeholder text, Spanish names, ICD-11
//! codes, cross-reference targets and metadata. Validation never fails;
//! it produces a [`ValidationReport`] that callers judge with
//! [`ValidationReport::is_valid`].

use std::collections::{HashMap, HashSet};
use std::fmt;

use chrono::{DateTime, NaiveDate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::Result;
use crate::index::ContentIndex;
use crate::record::ContentRecord;
use crate::types::{ComplexityLevel, EducationalContent, LegacyEducationalContent};

const PLACEHOLDER_PATTERN: &str = r"(?i)\b(todo|fixme|placeholder)\b";
const ICD11_PATTERN: &str = r"^[A-Z]\d{1,2}\.?\d{0,3}$";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

/// What part of a record an issue concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IssueCategory {
    Levels,
    KeyTerms,
    Placeholder,
    Localization,
    Icd11,
    CrossReference,
    Metadata,
    Quiz,
    DuplicateId,
}

impl IssueCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Levels => "levels",
            Self::KeyTerms => "key-terms",
            Self::Placeholder => "placeholder",
            Self::Localization => "localization",
            Self::Icd11 => "icd11",
            Self::CrossReference => "cross-reference",
            Self::Metadata => "metadata",
            Self::Quiz => "quiz",
            Self::DuplicateId => "duplicate-id",
        }
    }
}

impl fmt::Display for IssueCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationIssue {
    pub record_id: String,
    pub severity: Severity,
    pub category: IssueCategory,
    pub message: String,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "[{tag}] {} ({}): {}", self.record_id, self.category, self.message)
    }
}

/// Validator settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Levels every record must provide
    pub required_levels: Vec<u8>,
    /// Treat warnings as failures
    pub fail_on_warnings: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            required_levels: ComplexityLevel::all().map(u8::from).collect(),
            fail_on_warnings: false,
        }
    }
}

/// Outcome of validating a collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub records_checked: usize,
    pub issues: Vec<ValidationIssue>,
    #[serde(default)]
    pub fail_on_warnings: bool,
}

impl ValidationReport {
    pub fn errors(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|i| i.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|i| i.severity == Severity::Warning)
    }

    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings().count()
    }

    /// False when any error exists, or any warning under `fail_on_warnings`.
    pub fn is_valid(&self) -> bool {
        let blocking = if self.fail_on_warnings {
            self.issues.len()
        } else {
            self.error_count()
        };
        blocking == 0
    }

    pub fn for_record<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a ValidationIssue> {
        self.issues.iter().filter(move |i| i.record_id == id)
    }
}

/// Applies the record rules to a collection of records.
#[derive(Debug, Clone)]
pub struct ContentValidator {
    config: ValidationConfig,
    required: Vec<ComplexityLevel>,
    placeholder: Regex,
    icd11: Regex,
}

impl ContentValidator {
    pub fn new(config: ValidationConfig) -> Result<Self> {
        let required = config
            .required_levels
            .iter()
            .filter_map(|&value| {
                let level = ComplexityLevel::new(value);
                if level.is_none() {
                    warn!(level = value, "Ignoring required level outside 1..=5");
                }
                level
            })
            .collect();

        Ok(Self {
            config,
            required,
            placeholder: Regex::new(PLACEHOLDER_PATTERN)?,
            icd11: Regex::new(ICD11_PATTERN)?,
        })
    }

    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Validate records in collection order.
    ///
    /// Duplicate ids are reported here since an index has already collapsed
    /// them. Cross references resolve against the ids in `records`.
    pub fn validate(&self, records: &[ContentRecord]) -> ValidationReport {
        let known: HashSet<&str> = records.iter().map(ContentRecord::id).collect();
        let mut issues = Vec::new();

        let mut seen: HashMap<&str, usize> = HashMap::new();
        for record in records {
            *seen.entry(record.id()).or_default() += 1;
        }
        let mut reported = HashSet::new();
        for record in records {
            let count = seen.get(record.id()).copied().unwrap_or_default();
            if count > 1 && reported.insert(record.id()) {
                issues.push(issue(
                    record.id(),
                    Severity::Error,
                    IssueCategory::DuplicateId,
                    format!("id appears {count} times"),
                ));
            }
        }

        for record in records {
            let mut sink = IssueSink {
                record_id: record.id(),
                issues: &mut issues,
            };
            match record {
                ContentRecord::Educational(content) => {
                    self.check_educational(content, &known, &mut sink)
                }
                ContentRecord::Legacy(content) => self.check_legacy(content, &mut sink),
            }
        }

        let report = ValidationReport {
            records_checked: records.len(),
            issues,
            fail_on_warnings: self.config.fail_on_warnings,
        };

        debug!(
            records = report.records_checked,
            errors = report.error_count(),
            warnings = report.warning_count(),
            "Validated content"
        );

        report
    }

    /// Validate an already built index.
    pub fn validate_index(&self, index: &ContentIndex<ContentRecord>) -> ValidationReport {
        self.validate(index.records())
    }

    fn check_educational(
        &self,
        content: &EducationalContent,
        known: &HashSet<&str>,
        sink: &mut IssueSink<'_>,
    ) {
        for level in &self.required {
            if !content.levels.contains_key(level) {
                sink.error(IssueCategory::Levels, format!("missing level {level}"));
            }
        }

        for (level, body) in &content.levels {
            if body.summary.trim().is_empty() {
                sink.error(IssueCategory::Levels, format!("level {level} has an empty summary"));
            }
            if body.explanation.trim().is_empty() {
                sink.error(
                    IssueCategory::Levels,
                    format!("level {level} has an empty explanation"),
                );
            }
            if body.key_terms.is_empty() {
                sink.warning(IssueCategory::KeyTerms, format!("level {level} has no key terms"));
            }
            for term in &body.key_terms {
                if term.term.trim().is_empty() || term.definition.trim().is_empty() {
                    sink.error(
                        IssueCategory::KeyTerms,
                        format!("level {level} has a key term without term or definition"),
                    );
                }
            }

            self.check_placeholder(sink, &format!("level {level} summary"), &body.summary);
            self.check_placeholder(sink, &format!("level {level} explanation"), &body.explanation);
            if let Some(notes) = &body.clinical_notes {
                self.check_placeholder(sink, &format!("level {level} clinical notes"), notes);
            }
            for term in &body.key_terms {
                self.check_placeholder(sink, &format!("level {level} key term"), &term.term);
                self.check_placeholder(sink, &format!("level {level} key term"), &term.definition);
            }
        }

        self.check_placeholder(sink, "name", &content.name);
        match content.name_es.as_deref().map(str::trim) {
            Some(name_es) if !name_es.is_empty() => {
                self.check_placeholder(sink, "Spanish name", name_es)
            }
            _ => sink.warning(IssueCategory::Localization, "missing Spanish name (nameEs)".to_string()),
        }

        if let Some(code) = &content.icd11 {
            if !self.icd11.is_match(code) {
                sink.warning(IssueCategory::Icd11, format!("icd11 code {code:?} is not well formed"));
            }
        }
        for tag in &content.tags.systems {
            if let Some(code) = icd11_tag_code(tag) {
                if !self.icd11.is_match(code) {
                    sink.warning(IssueCategory::Icd11, format!("systems tag {tag:?} is not a valid ICD-11 code"));
                }
            }
        }

        for xref in &content.cross_references {
            if xref.target_id.trim().is_empty() {
                sink.error(IssueCategory::CrossReference, "cross reference with empty target".to_string());
            } else if !known.contains(xref.target_id.as_str()) {
                warn!(
                    id = %content.id,
                    target = %xref.target_id,
                    "Cross reference target not found"
                );
                sink.warning(
                    IssueCategory::CrossReference,
                    format!("cross reference target {} not found", xref.target_id),
                );
            }
        }

        if content.version == 0 {
            sink.error(IssueCategory::Metadata, "version must be at least 1".to_string());
        }
        for (field, value) in [("createdAt", &content.created_at), ("updatedAt", &content.updated_at)] {
            if !is_valid_date(value) {
                sink.error(IssueCategory::Metadata, format!("{field} {value:?} is not a valid date"));
            }
        }
    }

    fn check_legacy(&self, content: &LegacyEducationalContent, sink: &mut IssueSink<'_>) {
        for level in &self.required {
            if !content.levels.contains_key(level) {
                sink.error(IssueCategory::Levels, format!("missing level {level}"));
            }
        }

        for (level, body) in &content.levels {
            if body.content.trim().is_empty() {
                sink.error(IssueCategory::Levels, format!("level {level} has empty content"));
            }
            self.check_placeholder(sink, &format!("level {level} content"), &body.content);

            for question in &body.quiz {
                if question.correct_answer >= question.options.len() {
                    sink.error(
                        IssueCategory::Quiz,
                        format!(
                            "quiz {} answer index {} out of range for {} options",
                            question.id,
                            question.correct_answer,
                            question.options.len()
                        ),
                    );
                }
            }
        }
    }

    fn check_placeholder(&self, sink: &mut IssueSink<'_>, field: &str, text: &str) {
        if let Some(found) = self.placeholder.find(text) {
            sink.error(
                IssueCategory::Placeholder,
                format!("{field} contains placeholder text {:?}", found.as_str()),
            );
        }
    }
}

struct IssueSink<'a> {
    record_id: &'a str,
    issues: &'a mut Vec<ValidationIssue>,
}

impl IssueSink<'_> {
    fn error(&mut self, category: IssueCategory, message: String) {
        self.issues.push(issue(self.record_id, Severity::Error, category, message));
    }

    fn warning(&mut self, category: IssueCategory, message: String) {
        self.issues.push(issue(self.record_id, Severity::Warning, category, message));
    }
}

fn issue(record_id: &str, severity: Severity, category: IssueCategory, message: String) -> ValidationIssue {
    ValidationIssue {
        record_id: record_id.to_string(),
        severity,
        category,
        message,
    }
}

/// Code part of a systems tag that looks like an ICD-11 code.
///
/// Accepts `ICD-11:K21.0`, `ICD-11 K21.0` and bare codes starting with a
/// capital letter followed by a digit.
fn icd11_tag_code(tag: &str) -> Option<&str> {
    if let Some(rest) = tag.strip_prefix("ICD-11") {
        return Some(rest.trim_start_matches([':', ' ']).trim());
    }
    let mut chars = tag.chars();
    match (chars.next(), chars.next()) {
        (Some(first), Some(second)) if first.is_ascii_uppercase() && second.is_ascii_digit() => Some(tag),
        _ => None,
    }
}

fn is_valid_date(value: &str) -> bool {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok() || DateTime::parse_from_rfc3339(value).is_ok()
}
