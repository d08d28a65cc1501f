#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::collections::HashMap;

use serde::Serialize;
use typed_builder::TypedBuilder;

use crate::{
    constants::{FORM_PARTNER_COLUMN, FORM_STUDENT_COLUMN},
    error::{RawGradesError, Result},
    types::{IdNormalizer, StudentId},
    warning::Warning,
};

/// Two students who submitted jointly.
///
/// Equality ignores order and bookkeeping: `(a, b) == (b, a)`.
#[derive(Debug, Clone, Serialize)]
pub struct PartnerPair {
    /// The student whose row introduced the pair.
    claimant:     StudentId,
    /// The partner they named.
    partner:      StudentId,
    /// Roster row the pair was first seen on.
    row:          usize,
    /// Whether the partner also named the claimant.
    reciprocated: bool,
}

impl PartnerPair {
    /// Whether `identifier` is one of the two members.
    pub fn contains(&self, identifier: &StudentId) -> bool {
        &self.claimant == identifier || &self.partner == identifier
    }

    /// The other member of the pair, if `identifier` is in it.
    pub fn partner_of(&self, identifier: &StudentId) -> Option<&StudentId> {
        if &self.claimant == identifier {
            Some(&self.partner)
        } else if &self.partner == identifier {
            Some(&self.claimant)
        } else {
            None
        }
    }

    /// The member that is not `identifier`; callers guarantee membership.
    fn other(&self, identifier: &StudentId) -> &StudentId {
        if &self.claimant == identifier {
            &self.partner
        } else {
            &self.claimant
        }
    }

    /// Roster row the pair was first seen on.
    pub fn row(&self) -> usize {
        self.row
    }

    /// Whether both students named each other.
    pub fn is_reciprocated(&self) -> bool {
        self.reciprocated
    }
}

impl PartialEq for PartnerPair {
    fn eq(&self, other: &Self) -> bool {
        (self.claimant == other.claimant && self.partner == other.partner)
            || (self.claimant == other.partner && self.partner == other.claimant)
    }
}

impl Eq for PartnerPair {}

/// Which two columns of the roster hold the identifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RosterColumns {
    /// The course Google Form questions if the header has them, otherwise the
    /// first two columns.
    #[default]
    Detect,
    /// Two header names.
    Named(String, String),
}

/// Options for [`PartnerRoster::parse`].
#[derive(Debug, Clone, TypedBuilder)]
#[builder(field_defaults(default))]
pub struct RosterOptions {
    /// Whether the first row is a header.
    #[builder(default = true)]
    pub has_headers: bool,
    /// Column selection.
    #[builder(setter(into))]
    pub columns:     RosterColumns,
    /// Whether every pair is expected to be listed from both sides. `None`
    /// expects it exactly when the Google Form layout is detected.
    pub reciprocal:  Option<bool>,
    /// Identifier normalization shared with the grade report.
    pub normalizer:  IdNormalizer,
}

impl Default for RosterOptions {
    fn default() -> Self {
        RosterOptions::builder().build()
    }
}

/// The set of partner pairs for one assignment.
#[derive(Debug, Clone, Default)]
pub struct PartnerRoster {
    /// Pairs, in the order they were first seen.
    pairs:    Vec<PartnerPair>,
    /// Position of each paired student's pair in `pairs`.
    index:    HashMap<StudentId, usize>,
    /// Students who submitted a roster row without naming a partner.
    solo:     Vec<StudentId>,
    /// Non-fatal findings made while reading the roster.
    warnings: Vec<Warning>,
}

impl PartnerRoster {
    /// Reads a roster from CSV text.
    ///
    /// Every row must name exactly two distinct students, or just one (a
    /// student working alone). A student may appear in several rows, but only
    /// ever with the same partner.
    pub fn parse(text: &str, options: &RosterOptions) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(options.has_headers)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(text.as_bytes());

        let (first_col, second_col, form_layout) = locate_columns(&mut reader, options)?;
        let reciprocal = options.reciprocal.unwrap_or(form_layout);
        let mut roster = PartnerRoster::default();

        for (i, record) in reader.records().enumerate() {
            let record = record?;
            let row = record
                .position()
                .map(|p| p.line() as usize)
                .unwrap_or(i + 1 + usize::from(options.has_headers));

            let student = record
                .get(first_col)
                .and_then(|cell| options.normalizer.normalize(cell));
            let partner = record
                .get(second_col)
                .and_then(|cell| options.normalizer.normalize(cell));

            match (student, partner) {
                (None, None) => {
                    return Err(RawGradesError::MalformedRosterRow {
                        row,
                        reason: format!(
                            "expected two student identifiers in columns {} and {}, found none",
                            first_col + 1,
                            second_col + 1
                        ),
                    });
                }
                (Some(a), Some(b)) if a == b => {
                    return Err(RawGradesError::MalformedRosterRow {
                        row,
                        reason: format!("`{a}` is listed as their own partner"),
                    });
                }
                (Some(a), Some(b)) => roster.claim(a, b, row)?,
                (Some(alone), None) | (None, Some(alone)) => {
                    tracing::debug!("Roster row {row}: `{alone}` has no partner");
                    roster.solo.push(alone);
                }
            }
        }

        if reciprocal {
            roster.warnings.extend(
                roster
                    .pairs
                    .iter()
                    .filter(|p| !p.reciprocated)
                    .map(|p| Warning::AsymmetricPartner {
                        student: p.claimant.clone(),
                        partner: p.partner.clone(),
                        row:     p.row,
                    }),
            );
        }

        tracing::debug!(
            "Read {} partner pairs and {} solo rows from the roster",
            roster.pairs.len(),
            roster.solo.len()
        );
        Ok(roster)
    }

    /// Builds a roster from in-memory pairs, applying the same consistency
    /// rules as [`PartnerRoster::parse`]. Rows are numbered from 1.
    pub fn from_pairs<I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (StudentId, StudentId)>,
    {
        let mut roster = PartnerRoster::default();
        for (i, (a, b)) in pairs.into_iter().enumerate() {
            if a == b {
                return Err(RawGradesError::MalformedRosterRow {
                    row:    i + 1,
                    reason: format!("`{a}` is listed as their own partner"),
                });
            }
            roster.claim(a, b, i + 1)?;
        }
        Ok(roster)
    }

    /// Records that `student` named `partner` on `row`.
    fn claim(&mut self, student: StudentId, partner: StudentId, row: usize) -> Result<()> {
        if let Some(&i) = self.index.get(&student) {
            let pair = &mut self.pairs[i];
            if pair.contains(&partner) {
                if pair.claimant != student {
                    pair.reciprocated = true;
                }
                return Ok(());
            }

            return Err(RawGradesError::PairConflict {
                existing: pair.other(&student).clone(),
                existing_row: pair.row,
                identifier: student,
                conflicting: partner,
                row,
            });
        }

        if let Some(&i) = self.index.get(&partner) {
            let pair = &self.pairs[i];
            return Err(RawGradesError::PairConflict {
                existing: pair.other(&partner).clone(),
                existing_row: pair.row,
                identifier: partner,
                conflicting: student,
                row,
            });
        }

        let slot = self.pairs.len();
        self.index.insert(student.clone(), slot);
        self.index.insert(partner.clone(), slot);
        self.pairs.push(PartnerPair {
            claimant: student,
            partner,
            row,
            reciprocated: false,
        });
        Ok(())
    }

    /// The pair `identifier` belongs to, if any.
    pub fn pair_of(&self, identifier: &StudentId) -> Option<&PartnerPair> {
        self.index.get(identifier).map(|&i| &self.pairs[i])
    }

    /// The partner of `identifier`, if any.
    pub fn partner_of(&self, identifier: &StudentId) -> Option<&StudentId> {
        self.pair_of(identifier)
            .and_then(|pair| pair.partner_of(identifier))
    }

    /// Whether `identifier` belongs to a pair.
    pub fn is_paired(&self, identifier: &StudentId) -> bool {
        self.index.contains_key(identifier)
    }

    /// All pairs, in the order they were first seen.
    pub fn pairs(&self) -> &[PartnerPair] {
        &self.pairs
    }

    /// Students who filled in a row without naming a partner.
    pub fn solo(&self) -> &[StudentId] {
        &self.solo
    }

    /// Warnings raised while reading the roster.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }
}

/// Resolves the two identifier columns, and whether the Google Form layout
/// was recognised.
fn locate_columns<R: std::io::Read>(
    reader: &mut csv::Reader<R>,
    options: &RosterOptions,
) -> Result<(usize, usize, bool)> {
    let headers = if options.has_headers {
        Some(reader.headers()?.clone())
    } else {
        None
    };
    let position = |name: &str| {
        headers
            .as_ref()
            .and_then(|h| h.iter().position(|column| column == name.trim()))
    };

    match &options.columns {
        RosterColumns::Named(a, b) => {
            let find = |name: &str| {
                position(name).ok_or_else(|| RawGradesError::Configuration {
                    key:    "partner_columns",
                    reason: if headers.is_some() {
                        format!("the roster header has no column named `{name}`")
                    } else {
                        "column names need a roster header row".into()
                    },
                })
            };
            Ok((find(a)?, find(b)?, false))
        }
        RosterColumns::Detect => {
            match (position(FORM_STUDENT_COLUMN), position(FORM_PARTNER_COLUMN)) {
                (Some(a), Some(b)) => {
                    tracing::debug!("Detected the Google Form roster layout");
                    Ok((a, b, true))
                }
                _ => Ok((0, 1, false)),
            }
        }
    }
}
