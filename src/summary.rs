#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use colored::Colorize;
use itertools::Itertools;
use serde::Serialize;
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Panel, Style, object::Rows},
};

use crate::{
    pipeline::Conversion,
    types::{StudentId, format_score},
    warning::Warning,
};

/// One line of the run summary
#[derive(Tabled, Serialize, Clone, Debug)]
pub struct SummaryRow {
    /// The graded student.
    #[tabled(rename = "Student")]
    pub student:     String,
    /// Score from the grade report.
    #[tabled(rename = "Raw")]
    pub raw:         String,
    /// Score written to the gradebook.
    #[tabled(rename = "Final")]
    #[serde(rename = "final")]
    pub final_score: String,
    /// Partner from the roster, if any.
    #[tabled(rename = "Partner")]
    pub partner:     String,
}

/// A serializable overview of a conversion.
#[derive(Serialize, Debug)]
pub struct Summary<'a> {
    /// Assignment name.
    pub assignment: &'a str,
    /// Points possible, as configured.
    pub points:     &'a str,
    /// Per-student rows.
    pub rows:       Vec<SummaryRow>,
    /// Warnings raised during the run.
    pub warnings:   &'a [Warning],
}

impl<'a> Summary<'a> {
    /// Builds the summary for `conversion`.
    pub fn new(conversion: &'a Conversion) -> Self {
        let partner = |id: &StudentId| {
            conversion
                .roster()
                .and_then(|r| r.partner_of(id))
                .map(ToString::to_string)
                .unwrap_or_default()
        };

        let rows = conversion
            .results()
            .iter()
            .map(|result| SummaryRow {
                student:     result.identifier.to_string(),
                raw:         conversion
                    .report()
                    .score(&result.identifier)
                    .map(format_score)
                    .unwrap_or_default(),
                final_score: format_score(result.score),
                partner:     partner(&result.identifier),
            })
            .collect();

        Self {
            assignment: conversion.config().assignment(),
            points: conversion.config().points().raw(),
            rows,
            warnings: conversion.warnings(),
        }
    }

    /// Renders the summary as a terminal table followed by any warnings.
    pub fn render(&self) -> String {
        let changed = self.rows.iter().filter(|r| r.raw != r.final_score).count();
        let table = Table::new(&self.rows)
            .with(Panel::header(format!("{} ({} points)", self.assignment, self.points)))
            .with(Panel::footer(format!(
                "{} students, {} scores changed by partner merge",
                self.rows.len(),
                changed
            )))
            .with(
                Modify::new(Rows::first())
                    .with(Alignment::center())
                    .with(Alignment::center_vertical()),
            )
            .with(
                Modify::new(Rows::last())
                    .with(Alignment::center())
                    .with(Alignment::center_vertical()),
            )
            .with(Style::modern())
            .to_string();

        if self.warnings.is_empty() {
            return table;
        }

        let warnings = self
            .warnings
            .iter()
            .map(|w| format!("  {} {w}", "!".yellow().bold()))
            .join("\n");
        format!(
            "{table}\n{}\n{warnings}",
            format!("{} warning(s):", self.warnings.len()).yellow()
        )
    }
}
