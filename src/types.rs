#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Opaque student key (a UCInetID, login, or institutional ID).
///
/// Always constructed through [`IdNormalizer`] so that the grade report and
/// the partner roster agree on spelling.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StudentId(String);

impl StudentId {
    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for StudentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for StudentId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Normalizes raw identifier text at ingestion.
///
/// Whitespace is always trimmed; case is folded to lowercase unless
/// `case_sensitive` is set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IdNormalizer {
    /// Keep identifiers exactly as written (apart from trimming).
    pub case_sensitive: bool,
}

impl IdNormalizer {
    /// Creates a normalizer.
    pub fn new(case_sensitive: bool) -> Self {
        Self { case_sensitive }
    }

    /// Normalizes `raw`, returning `None` if nothing is left after trimming.
    pub fn normalize(&self, raw: &str) -> Option<StudentId> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }

        Some(if self.case_sensitive {
            StudentId(trimmed.to_owned())
        } else {
            StudentId(trimmed.to_lowercase())
        })
    }
}

/// One parsed record of the grade report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeEntry {
    /// Who the score belongs to.
    pub identifier:  StudentId,
    /// The raw score, never negative.
    pub score:       f64,
    /// 1-based line of the report the record came from.
    pub line_number: usize,
}

/// A final `(identifier, score)` row, ready for the gradebook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedResult {
    /// The student the row is for.
    pub identifier: StudentId,
    /// The score after partner resolution.
    pub score:      f64,
}

impl MergedResult {
    /// Creates a new result row.
    pub fn new(identifier: StudentId, score: f64) -> Self {
        Self { identifier, score }
    }
}

/// Formats a score in shortest round-trip form (`8`, `4.123`).
pub fn format_score(score: f64) -> String {
    format!("{score}")
}
