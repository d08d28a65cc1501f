#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::fmt::Display;

use serde::Serialize;

use crate::types::{StudentId, format_score};

/// Data-quality findings that are reported to the grader but never stop a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    /// A score is above the assignment's points possible (extra credit, or a
    /// grading script bug).
    ScoreExceedsPointsPossible {
        /// Who got the score.
        identifier:  StudentId,
        /// The score as reported.
        score:       f64,
        /// Points possible for the assignment.
        points:      f64,
        /// Line of the grade report.
        line_number: usize,
    },
    /// The same record was listed twice with the same score.
    RepeatedRecord {
        /// The repeated student.
        identifier:  StudentId,
        /// Line of the first occurrence.
        first_line:  usize,
        /// Line of the repeat.
        line_number: usize,
    },
    /// A student named a partner who did not name them back.
    AsymmetricPartner {
        /// The student who filled in the roster row.
        student: StudentId,
        /// The partner they named.
        partner: StudentId,
        /// Roster row of the one-sided claim.
        row:     usize,
    },
    /// One member of a pair has no row in the grade report.
    PartnerMissingSubmission {
        /// The partner that was graded.
        submitter:  StudentId,
        /// The partner with no grade row.
        missing:    StudentId,
        /// A graded identifier that looks like a misspelling of `missing`.
        suggestion: Option<StudentId>,
    },
    /// Both partners were graded, with different scores.
    ScoresDiverged {
        /// First partner, in report order.
        first:        StudentId,
        /// Their raw score.
        first_score:  f64,
        /// Second partner.
        second:       StudentId,
        /// Their raw score.
        second_score: f64,
        /// Score assigned to both.
        resolved:     f64,
    },
}

impl Warning {
    /// Logs the warning through `tracing`.
    pub fn emit(&self) {
        tracing::warn!("{self}");
    }
}

impl Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Warning::ScoreExceedsPointsPossible {
                identifier,
                score,
                points,
                line_number,
            } => write!(
                f,
                "grade report: line {line_number}: `{identifier}` scored {} out of {}",
                format_score(*score),
                format_score(*points)
            ),
            Warning::RepeatedRecord {
                identifier,
                first_line,
                line_number,
            } => write!(
                f,
                "grade report: line {line_number}: `{identifier}` repeats line {first_line}, \
                 keeping the first"
            ),
            Warning::AsymmetricPartner {
                student,
                partner,
                row,
            } => write!(
                f,
                "partner roster: row {row}: `{student}` named `{partner}`, who did not name them \
                 back"
            ),
            Warning::PartnerMissingSubmission {
                submitter,
                missing,
                suggestion,
            } => {
                write!(
                    f,
                    "`{missing}` (partner of `{submitter}`) has no grade row, no row will be \
                     written for them"
                )?;
                if let Some(suggestion) = suggestion {
                    write!(f, "; did you mean `{suggestion}`?")?;
                }
                Ok(())
            }
            Warning::ScoresDiverged {
                first,
                first_score,
                second,
                second_score,
                resolved,
            } => write!(
                f,
                "partners `{first}` ({}) and `{second}` ({}) were graded differently, both get {}",
                format_score(*first_score),
                format_score(*second_score),
                format_score(*resolved)
            ),
        }
    }
}
