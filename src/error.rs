#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::path::PathBuf;

use crate::types::StudentId;

/// Every way a conversion can fail.
///
/// Each message names the component that failed and, where there is one, the
/// input line or row, so a grader can go straight to the bad data.
#[derive(thiserror::Error, Debug)]
pub enum RawGradesError {
    /// A required config key is missing or one of its values is unusable.
    #[error("config: key `{key}`: {reason}")]
    Configuration {
        /// The offending config key.
        key:    &'static str,
        /// What is wrong with it.
        reason: String,
    },
    /// The config file itself could not be decoded.
    #[error("config: could not decode {}: {source}", .path.display())]
    ConfigDecode {
        /// Path of the config file.
        path:   PathBuf,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
    /// A grade report line could not be split into identifier and score.
    #[error(
        "grade report: line {line_number}: cannot read `{line}` as `identifier<delimiter>score` \
         (expected {expected})"
    )]
    MalformedRecord {
        /// 1-based line number.
        line_number: usize,
        /// The raw line text.
        line:        String,
        /// What the parser expected at the failure point.
        expected:    String,
    },
    /// The same student appears twice in the grade report with different
    /// scores.
    #[error(
        "grade report: line {line_number}: `{identifier}` already scored {first} on line \
         {first_line}, refusing to pick between {first} and {second}"
    )]
    DuplicateIdentifier {
        /// The repeated student.
        identifier:  StudentId,
        /// Score from the first occurrence.
        first:       f64,
        /// Line of the first occurrence.
        first_line:  usize,
        /// Score from the conflicting occurrence.
        second:      f64,
        /// Line of the conflicting occurrence.
        line_number: usize,
    },
    /// A roster row does not name exactly two distinct students.
    #[error("partner roster: row {row}: {reason}")]
    MalformedRosterRow {
        /// 1-based row number in the roster file, header included.
        row:    usize,
        /// What is wrong with the row.
        reason: String,
    },
    /// The roster places one student in two different pairs.
    #[error(
        "partner roster: row {row}: `{identifier}` is paired with `{existing}` (row \
         {existing_row}) and also with `{conflicting}`"
    )]
    PairConflict {
        /// The student claimed by two pairs.
        identifier:   StudentId,
        /// Partner from the earlier pairing.
        existing:     StudentId,
        /// Row the earlier pairing came from.
        existing_row: usize,
        /// Partner from the conflicting pairing.
        conflicting:  StudentId,
        /// Row of the conflicting pairing.
        row:          usize,
    },
    /// The roster CSV could not be read at all.
    #[error("partner roster: {0}")]
    Roster(#[source] csv::Error),
    /// Writing the gradebook CSV failed.
    #[error("canvas output: {0}")]
    Serialization(String),
    /// A file could not be read or written.
    #[error("could not access {}: {source}", .path.display())]
    Io {
        /// The file being read or written.
        path:   PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl From<csv::Error> for RawGradesError {
    fn from(err: csv::Error) -> Self {
        RawGradesError::Roster(err)
    }
}

/// Convenience alias used across the library.
pub type Result<T, E = RawGradesError> = std::result::Result<T, E>;
