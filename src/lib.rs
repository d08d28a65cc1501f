//! # rawgrades
//!
//! Turns the raw score report an autograder prints into a Canvas gradebook
//! import file, merging scores for students who submitted with a partner.

#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

/// Writing Canvas gradebook import files
pub mod canvas;
/// Loading and validating the JSON run configuration
pub mod config;
/// A module defining a bunch of constant values to be used throughout
pub mod constants;
/// Library error type
pub mod error;
/// Parsing raw grade reports
pub mod grades;
/// Resolving partnered submissions into final scores
pub mod merge;
/// Reading, merging and rendering in one pass
pub mod pipeline;
/// Reading partner rosters
pub mod roster;
/// Terminal and JSON summaries of a run
pub mod summary;
/// Shared data types
pub mod types;
/// Non-fatal data-quality findings
pub mod warning;

pub use config::{Config, Points};
pub use error::RawGradesError;
pub use grades::{Delimiter, GradeReport, ParseOptions};
pub use merge::{MergeOutcome, MergePolicy, ScoreMerger};
pub use pipeline::{Conversion, convert, run};
pub use roster::{PartnerPair, PartnerRoster, RosterColumns, RosterOptions};
pub use summary::Summary;
pub use types::{GradeEntry, IdNormalizer, MergedResult, StudentId};
pub use warning::Warning;
