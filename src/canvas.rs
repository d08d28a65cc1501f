#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Canvas gradebook import files look like this:
//!
//! ```text
//! ,Project 4
//! Points Possible,5
//! student1,3
//! student2,4
//! ```

use std::path::Path;

use crate::{
    constants::POINTS_POSSIBLE_LABEL,
    error::{RawGradesError, Result},
    types::{MergedResult, format_score},
};

/// Renders a complete Canvas import file in memory.
///
/// `assignment` and `points` are written verbatim, quoted only where CSV
/// requires it.
pub fn render(assignment: &str, points: &str, results: &[MergedResult]) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    let serialization = |e: csv::Error| RawGradesError::Serialization(e.to_string());

    writer
        .write_record(["", assignment])
        .map_err(serialization)?;
    writer
        .write_record([POINTS_POSSIBLE_LABEL, points])
        .map_err(serialization)?;
    for result in results {
        writer
            .write_record([result.identifier.as_str(), format_score(result.score).as_str()])
            .map_err(serialization)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| RawGradesError::Serialization(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| RawGradesError::Serialization(e.to_string()))
}

/// Writes a rendered file to `path` in a single call.
pub fn write(path: &Path, rendered: &str) -> Result<()> {
    std::fs::write(path, rendered).map_err(|e| {
        RawGradesError::Serialization(format!("could not write {}: {e}", path.display()))
    })?;
    tracing::info!("Wrote {}", path.display());
    Ok(())
}
