#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use crate::{
    error::{RawGradesError, Result},
    grades::{Delimiter, ParseOptions},
    merge::MergePolicy,
    roster::{RosterColumns, RosterOptions},
    types::IdNormalizer,
};

/// Points possible for an assignment, kept both as written and as a number.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Points {
    /// Text written to the gradebook, exactly as configured.
    raw:   String,
    /// Numeric value, used to flag scores above it.
    value: f64,
}

impl Points {
    /// Parses a points-possible value such as `"5"` or `"12.5"`.
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        let value = raw
            .parse::<f64>()
            .map_err(|_| RawGradesError::Configuration {
                key:    "points",
                reason: format!("`{raw}` is not a number"),
            })?;

        if !value.is_finite() || value < 0.0 {
            return Err(RawGradesError::Configuration {
                key:    "points",
                reason: format!("`{raw}` is not a non-negative number"),
            });
        }

        Ok(Self {
            raw: raw.to_owned(),
            value,
        })
    }

    /// The value as written in the config.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The numeric value.
    pub fn value(&self) -> f64 {
        self.value
    }
}

/// `points` may be a JSON number or a numeric string.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawPoints {
    /// `"points": 5`
    Number(serde_json::Number),
    /// `"points": "5"`
    Text(String),
}

/// The config file as written; every field optional so missing keys can be
/// reported by name.
#[derive(Deserialize)]
struct RawConfig {
    /// Points possible.
    points:              Option<RawPoints>,
    /// Assignment name.
    assignment:          Option<String>,
    /// Where to write the gradebook file.
    output_file:         Option<PathBuf>,
    /// Grade report path.
    grades:              Option<PathBuf>,
    /// Partner roster path.
    partners:            Option<PathBuf>,
    /// Merge policy for two-sided pairs.
    #[serde(default)]
    merge_policy:        MergePolicy,
    /// Grade report delimiter.
    #[serde(default)]
    grades_delimiter:    Delimiter,
    /// Header names of the two roster identifier columns.
    partner_columns:     Option<[String; 2]>,
    /// Whether the roster has a header row.
    partner_headers:     Option<bool>,
    /// Whether roster pairs should be listed from both sides.
    partners_reciprocal: Option<bool>,
    /// Keep identifier case.
    #[serde(default)]
    case_sensitive:      bool,
}

/// A validated conversion config.
#[derive(Debug, Clone, TypedBuilder)]
pub struct Config {
    /// Points possible for the assignment.
    points:              Points,
    /// Assignment name, as Canvas shows it.
    #[builder(setter(into))]
    assignment:          String,
    /// Where the gradebook file goes.
    #[builder(setter(into))]
    output_file:         PathBuf,
    /// Raw grade report.
    #[builder(setter(into))]
    grades:              PathBuf,
    /// Optional partner roster.
    #[builder(default, setter(strip_option, into))]
    partners:            Option<PathBuf>,
    /// Rule for two-sided pairs.
    #[builder(default)]
    merge_policy:        MergePolicy,
    /// Grade report delimiter.
    #[builder(default)]
    grades_delimiter:    Delimiter,
    /// Header names of the roster identifier columns.
    #[builder(default)]
    partner_columns:     Option<(String, String)>,
    /// Whether the roster has a header row.
    #[builder(default = true)]
    partner_headers:     bool,
    /// Whether roster pairs should be listed from both sides.
    #[builder(default)]
    partners_reciprocal: Option<bool>,
    /// Keep identifier case.
    #[builder(default)]
    case_sensitive:      bool,
}

impl Config {
    /// Reads and validates a JSON config file.
    ///
    /// Relative paths inside the file are taken relative to the working
    /// directory, not to the config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| RawGradesError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text, path)
    }

    /// Validates config JSON that was read from `origin`.
    pub fn parse(text: &str, origin: &Path) -> Result<Self> {
        let raw: RawConfig =
            serde_json::from_str(text).map_err(|source| RawGradesError::ConfigDecode {
                path: origin.to_path_buf(),
                source,
            })?;

        let points = match raw.points {
            Some(RawPoints::Number(n)) => Points::parse(&n.to_string())?,
            Some(RawPoints::Text(s)) => Points::parse(&s)?,
            None => return Err(missing("points")),
        };

        let assignment = raw.assignment.ok_or_else(|| missing("assignment"))?;
        if assignment.trim().is_empty() {
            return Err(RawGradesError::Configuration {
                key:    "assignment",
                reason: "must not be empty".into(),
            });
        }

        let output_file = raw.output_file.ok_or_else(|| missing("output_file"))?;
        let grades = existing_file("grades", raw.grades.ok_or_else(|| missing("grades"))?)?;
        let partners = raw
            .partners
            .map(|p| existing_file("partners", p))
            .transpose()?;

        let partner_headers = raw.partner_headers.unwrap_or(true);
        if raw.partner_columns.is_some() && !partner_headers {
            return Err(RawGradesError::Configuration {
                key:    "partner_columns",
                reason: "column names need `partner_headers` to be true".into(),
            });
        }

        Ok(Config {
            points,
            assignment,
            output_file,
            grades,
            partners,
            merge_policy: raw.merge_policy,
            grades_delimiter: raw.grades_delimiter,
            partner_columns: raw.partner_columns.map(|[a, b]| (a, b)),
            partner_headers,
            partners_reciprocal: raw.partners_reciprocal,
            case_sensitive: raw.case_sensitive,
        })
    }

    /// Points possible.
    pub fn points(&self) -> &Points {
        &self.points
    }

    /// Assignment name.
    pub fn assignment(&self) -> &str {
        &self.assignment
    }

    /// Output file path.
    pub fn output_file(&self) -> &Path {
        &self.output_file
    }

    /// Replaces the output file path.
    pub fn set_output_file(&mut self, path: PathBuf) {
        self.output_file = path;
    }

    /// Grade report path.
    pub fn grades(&self) -> &Path {
        &self.grades
    }

    /// Partner roster path, if the assignment allowed partners.
    pub fn partners(&self) -> Option<&Path> {
        self.partners.as_deref()
    }

    /// Merge policy.
    pub fn merge_policy(&self) -> MergePolicy {
        self.merge_policy
    }

    /// Identifier normalization for both input files.
    pub fn normalizer(&self) -> IdNormalizer {
        IdNormalizer::new(self.case_sensitive)
    }

    /// Options for the grade report parser.
    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions::builder()
            .delimiter(self.grades_delimiter)
            .normalizer(self.normalizer())
            .build()
    }

    /// Options for the roster reader.
    pub fn roster_options(&self) -> RosterOptions {
        let columns = match &self.partner_columns {
            Some((a, b)) => RosterColumns::Named(a.clone(), b.clone()),
            None => RosterColumns::Detect,
        };

        RosterOptions::builder()
            .has_headers(self.partner_headers)
            .columns(columns)
            .reciprocal(self.partners_reciprocal)
            .normalizer(self.normalizer())
            .build()
    }
}

/// Error for a required key that is absent.
fn missing(key: &'static str) -> RawGradesError {
    RawGradesError::Configuration {
        key,
        reason: "missing from config file".into(),
    }
}

/// Requires `path` to name an existing file.
fn existing_file(key: &'static str, path: PathBuf) -> Result<PathBuf> {
    if path.is_file() {
        Ok(path)
    } else {
        Err(RawGradesError::Configuration {
            key,
            reason: format!("{} is not a valid path", path.display()),
        })
    }
}
