#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

/// The `peg` grammar for individual report lines.
pub mod parser;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use crate::{
    error::{RawGradesError, Result},
    types::{GradeEntry, IdNormalizer, StudentId},
    warning::Warning,
};

/// How fields are separated on each line of the grade report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Delimiter {
    /// A tab or a comma, whichever the line uses.
    #[default]
    Auto,
    /// Tab separated.
    Tab,
    /// Comma separated.
    Comma,
    /// Any run of spaces and tabs.
    Whitespace,
}

impl Delimiter {
    /// Delimiter characters accepted between identifier and score.
    fn separators(self) -> &'static [char] {
        match self {
            Delimiter::Auto => &['\t', ','],
            Delimiter::Tab => &['\t'],
            Delimiter::Comma => &[','],
            Delimiter::Whitespace => &[' ', '\t'],
        }
    }

    /// Splits one non-blank line into its raw identifier and score.
    fn split(self, line: &str) -> std::result::Result<(&str, f64), String> {
        let parsed = match self {
            Delimiter::Whitespace => parser::report::whitespace_record(line),
            _ => parser::report::delimited_record(line, self.separators()),
        };

        parsed.map_err(|e| e.expected.to_string())
    }
}

/// Options for [`GradeReport::parse`].
#[derive(Debug, Clone, Copy, Default, TypedBuilder)]
#[builder(field_defaults(default))]
pub struct ParseOptions {
    /// Field delimiter convention.
    pub delimiter:  Delimiter,
    /// Identifier normalization shared with the partner roster.
    pub normalizer: IdNormalizer,
}

/// A parsed grade report: one score per student, in order of first appearance.
#[derive(Debug, Clone, Default)]
pub struct GradeReport {
    /// Entries in report order.
    entries:  Vec<GradeEntry>,
    /// Position of each student in `entries`.
    index:    HashMap<StudentId, usize>,
    /// Non-fatal findings made while parsing.
    warnings: Vec<Warning>,
}

impl GradeReport {
    /// Parses the raw text of a grade report.
    ///
    /// A leading byte-order mark and blank lines are skipped. Any other line
    /// that is not exactly an identifier and a non-negative score fails the
    /// whole parse, as does a student listed twice with two different scores.
    pub fn parse(text: &str, options: &ParseOptions) -> Result<Self> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let mut report = GradeReport::default();

        for (i, line) in text.lines().enumerate() {
            let line_number = i + 1;
            if line.trim().is_empty() {
                continue;
            }

            let (raw_id, score) =
                options
                    .delimiter
                    .split(line)
                    .map_err(|expected| RawGradesError::MalformedRecord {
                        line_number,
                        line: line.to_owned(),
                        expected,
                    })?;

            let identifier = options.normalizer.normalize(raw_id).ok_or_else(|| {
                RawGradesError::MalformedRecord {
                    line_number,
                    line: line.to_owned(),
                    expected: "student identifier".into(),
                }
            })?;

            report.push(GradeEntry {
                identifier,
                score,
                line_number,
            })?;
        }

        tracing::debug!("Parsed {} grade records", report.len());
        Ok(report)
    }

    /// Adds an entry, enforcing one score per student.
    fn push(&mut self, entry: GradeEntry) -> Result<()> {
        if let Some(&existing) = self.index.get(&entry.identifier) {
            let first = &self.entries[existing];
            if first.score != entry.score {
                return Err(RawGradesError::DuplicateIdentifier {
                    identifier:  entry.identifier,
                    first:       first.score,
                    first_line:  first.line_number,
                    second:      entry.score,
                    line_number: entry.line_number,
                });
            }

            self.warnings.push(Warning::RepeatedRecord {
                identifier:  entry.identifier,
                first_line:  first.line_number,
                line_number: entry.line_number,
            });
            return Ok(());
        }

        self.index.insert(entry.identifier.clone(), self.entries.len());
        self.entries.push(entry);
        Ok(())
    }

    /// All entries, in report order.
    pub fn entries(&self) -> &[GradeEntry] {
        &self.entries
    }

    /// The entry for `identifier`, if the student was graded.
    pub fn get(&self, identifier: &StudentId) -> Option<&GradeEntry> {
        self.index.get(identifier).map(|&i| &self.entries[i])
    }

    /// The raw score for `identifier`, if the student was graded.
    pub fn score(&self, identifier: &StudentId) -> Option<f64> {
        self.get(identifier).map(|e| e.score)
    }

    /// Number of distinct students.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the report has no records.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Warnings raised while parsing.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Flags every score above `points` possible.
    pub fn over_points(&self, points: f64) -> Vec<Warning> {
        self.entries
            .iter()
            .filter(|e| e.score > points)
            .map(|e| Warning::ScoreExceedsPointsPossible {
                identifier:  e.identifier.clone(),
                score:       e.score,
                points,
                line_number: e.line_number,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<GradeReport> {
        GradeReport::parse(text, &ParseOptions::default())
    }

    fn scores(report: &GradeReport) -> Vec<(&str, f64)> {
        report
            .entries()
            .iter()
            .map(|e| (e.identifier.as_str(), e.score))
            .collect()
    }

    #[test]
    fn keeps_report_order() {
        let report = parse("carol,10\nalice\t8\nbob, 6.5\n").unwrap();
        assert_eq!(scores(&report), vec![("carol", 10.0), ("alice", 8.0), ("bob", 6.5)]);
        let bob = IdNormalizer::default().normalize("bob").unwrap();
        assert_eq!(report.get(&bob).unwrap().line_number, 3);
    }

    #[test]
    fn skips_blank_lines_and_trims_ids() {
        let report = parse("\n  Alice ,8\n\n  bob\t4.123\r\n").unwrap();
        assert_eq!(scores(&report), vec![("alice", 8.0), ("bob", 4.123)]);
    }

    #[test]
    fn case_sensitive_ids_are_kept() {
        let options = ParseOptions::builder()
            .normalizer(IdNormalizer::new(true))
            .build();
        let report = GradeReport::parse("Alice,8\nalice,7\n", &options).unwrap();
        assert_eq!(scores(&report), vec![("Alice", 8.0), ("alice", 7.0)]);
    }

    #[test]
    fn rejects_missing_field() {
        let err = parse("bob,6\nalice,,10\n").unwrap_err();
        match err {
            RawGradesError::MalformedRecord {
                line_number, line, ..
            } => {
                assert_eq!(line_number, 2);
                assert_eq!(line, "alice,,10");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejects_extra_field_negative_and_bare_ids() {
        let huge = format!("alice,1{}", "0".repeat(400));
        for bad in ["alice,8,9", "alice,-1", "alice", ",8", "alice,eight", huge.as_str()] {
            assert!(
                matches!(parse(bad), Err(RawGradesError::MalformedRecord { line_number: 1, .. })),
                "`{bad}` should not parse"
            );
        }
    }

    #[test]
    fn whitespace_delimiter_collapses_runs() {
        let options = ParseOptions::builder()
            .delimiter(Delimiter::Whitespace)
            .build();
        let report = GradeReport::parse("student1   8.0\nstudent2\t \t0\n", &options).unwrap();
        assert_eq!(scores(&report), vec![("student1", 8.0), ("student2", 0.0)]);
        assert!(GradeReport::parse("student 3 4.123", &options).is_err());
    }

    #[test]
    fn leading_byte_order_mark_is_not_part_of_the_first_id() {
        let report = parse("\u{feff}alice,8\nbob,6\n").unwrap();
        assert_eq!(scores(&report), vec![("alice", 8.0), ("bob", 6.0)]);
    }

    #[test]
    fn tab_delimiter_keeps_commas_in_ids() {
        let options = ParseOptions::builder().delimiter(Delimiter::Tab).build();
        let report = GradeReport::parse("lee, ann\t7\nbob\t 6\n", &options).unwrap();
        assert_eq!(scores(&report), vec![("lee, ann", 7.0), ("bob", 6.0)]);
        assert!(GradeReport::parse("alice,8", &options).is_err());
    }

    #[test]
    fn comma_delimiter_refuses_tabs() {
        let options = ParseOptions::builder().delimiter(Delimiter::Comma).build();
        assert!(GradeReport::parse("alice\t8", &options).is_err());
    }

    #[test]
    fn conflicting_duplicate_is_an_error() {
        let err = parse("alice,8\nbob,6\nALICE,9\n").unwrap_err();
        assert!(matches!(
            err,
            RawGradesError::DuplicateIdentifier {
                first_line: 1,
                line_number: 3,
                ..
            }
        ));
    }

    #[test]
    fn identical_duplicate_is_collapsed() {
        let report = parse("alice,8\nalice,8.0\n").unwrap();
        assert_eq!(report.len(), 1);
        assert_eq!(report.warnings().len(), 1);
    }

    #[test]
    fn flags_scores_over_points() {
        let report = parse("alice,11\nbob,10\n").unwrap();
        let warnings = report.over_points(10.0);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].to_string().contains("`alice` scored 11 out of 10"));
    }
}
