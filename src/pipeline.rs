#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::path::Path;

use crate::{
    canvas,
    config::Config,
    error::{RawGradesError, Result},
    grades::GradeReport,
    merge::{MergeOutcome, ScoreMerger},
    roster::PartnerRoster,
    types::MergedResult,
    warning::Warning,
};

/// Everything a run produced, before anything is written.
#[derive(Debug, Clone)]
pub struct Conversion {
    /// The config the run used.
    config:   Config,
    /// The parsed grade report.
    report:   GradeReport,
    /// The partner roster, if the assignment had one.
    roster:   Option<PartnerRoster>,
    /// Merged rows.
    outcome:  MergeOutcome,
    /// Every warning, in the order the components raised them.
    warnings: Vec<Warning>,
    /// The Canvas file, ready to write.
    rendered: String,
}

impl Conversion {
    /// The config the run used.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The parsed grade report.
    pub fn report(&self) -> &GradeReport {
        &self.report
    }

    /// The partner roster, if any.
    pub fn roster(&self) -> Option<&PartnerRoster> {
        self.roster.as_ref()
    }

    /// Final rows, in report order.
    pub fn results(&self) -> &[MergedResult] {
        &self.outcome.results
    }

    /// All warnings raised during the run.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// The rendered Canvas file.
    pub fn rendered(&self) -> &str {
        &self.rendered
    }

    /// Writes the Canvas file to the configured output path.
    pub fn write(&self) -> Result<()> {
        canvas::write(self.config.output_file(), &self.rendered)
    }
}

/// Reads an input file in full.
fn read_input(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| RawGradesError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Runs a conversion end to end without writing anything.
///
/// Every input is read and checked first, so a failure here means no output
/// file was touched.
pub fn run(config: &Config) -> Result<Conversion> {
    tracing::info!("Reading grades from {}", config.grades().display());
    let report = GradeReport::parse(&read_input(config.grades())?, &config.parse_options())?;

    let roster = match config.partners() {
        Some(path) => {
            tracing::info!("Reading partners from {}", path.display());
            Some(PartnerRoster::parse(&read_input(path)?, &config.roster_options())?)
        }
        None => None,
    };

    let outcome = ScoreMerger::new(config.merge_policy()).merge(&report, roster.as_ref());

    let mut warnings = report.warnings().to_vec();
    warnings.extend(report.over_points(config.points().value()));
    if let Some(roster) = &roster {
        warnings.extend_from_slice(roster.warnings());
    }
    warnings.extend(outcome.warnings.iter().cloned());
    warnings.iter().for_each(Warning::emit);

    let rendered = canvas::render(config.assignment(), config.points().raw(), &outcome.results)?;
    tracing::info!(
        "Merged {} students ({} partner pairs) for {}",
        outcome.results.len(),
        roster.as_ref().map_or(0, |r| r.pairs().len()),
        config.assignment()
    );

    Ok(Conversion {
        config: config.clone(),
        report,
        roster,
        outcome,
        warnings,
        rendered,
    })
}

/// Runs a conversion and writes the result.
pub fn convert(config: &Config) -> Result<Conversion> {
    let conversion = run(config)?;
    conversion.write()?;
    Ok(conversion)
}
