#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use similar::TextDiff;

use crate::{
    constants::TYPO_SIMILARITY_THRESHOLD,
    grades::GradeReport,
    roster::PartnerRoster,
    types::{MergedResult, StudentId},
    warning::Warning,
};

/// How two partners' individually recorded scores become one shared score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergePolicy {
    /// The better of the two scores.
    #[default]
    Highest,
    /// The worse of the two scores.
    Lowest,
    /// The mean of the two scores.
    Average,
}

impl MergePolicy {
    /// Combines two recorded scores into the shared one.
    pub fn combine(self, a: f64, b: f64) -> f64 {
        match self {
            MergePolicy::Highest => a.max(b),
            MergePolicy::Lowest => a.min(b),
            MergePolicy::Average => (a + b) / 2.0,
        }
    }
}

/// The result of merging a grade report with a partner roster.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MergeOutcome {
    /// One row per graded student, in report order.
    pub results:  Vec<MergedResult>,
    /// Data-quality findings from the merge.
    pub warnings: Vec<Warning>,
}

/// Applies a [`MergePolicy`] to partnered submissions.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoreMerger {
    /// Rule for pairs where both partners were graded.
    policy: MergePolicy,
}

impl ScoreMerger {
    /// Creates a merger using `policy`.
    pub fn new(policy: MergePolicy) -> Self {
        Self { policy }
    }

    /// Resolves every graded student's final score.
    ///
    /// The report decides who gets a row and in what order; the roster only
    /// changes scores. A partner who was graded alone hands their score to
    /// the other member of the pair, but no row is invented for a partner
    /// the report never mentions. Each pair is resolved once.
    pub fn merge(&self, report: &GradeReport, roster: Option<&PartnerRoster>) -> MergeOutcome {
        let mut shared: HashMap<&StudentId, f64> = HashMap::new();
        let mut warnings = Vec::new();

        if let Some(roster) = roster {
            for entry in report.entries() {
                if shared.contains_key(&entry.identifier) {
                    continue;
                }
                let Some(partner) = roster.partner_of(&entry.identifier) else {
                    continue;
                };

                match report.get(partner) {
                    Some(other) => {
                        let score = self.policy.combine(entry.score, other.score);
                        if entry.score != other.score {
                            warnings.push(Warning::ScoresDiverged {
                                first:        entry.identifier.clone(),
                                first_score:  entry.score,
                                second:       other.identifier.clone(),
                                second_score: other.score,
                                resolved:     score,
                            });
                        }
                        shared.insert(&entry.identifier, score);
                        shared.insert(&other.identifier, score);
                    }
                    None => {
                        warnings.push(Warning::PartnerMissingSubmission {
                            submitter:  entry.identifier.clone(),
                            missing:    partner.clone(),
                            suggestion: closest_unpaired(partner, report, roster),
                        });
                        shared.insert(&entry.identifier, entry.score);
                    }
                }
            }
        }

        let results = report
            .entries()
            .iter()
            .map(|entry| {
                let score = shared
                    .get(&entry.identifier)
                    .copied()
                    .unwrap_or(entry.score);
                MergedResult::new(entry.identifier.clone(), score)
            })
            .collect();

        MergeOutcome { results, warnings }
    }
}

/// Finds the graded, unpaired identifier most similar to `missing`, if any is
/// similar enough to be a likely misspelling.
fn closest_unpaired(
    missing: &StudentId,
    report: &GradeReport,
    roster: &PartnerRoster,
) -> Option<StudentId> {
    report
        .entries()
        .iter()
        .filter(|e| !roster.is_paired(&e.identifier))
        .map(|e| {
            let ratio = TextDiff::from_chars(missing.as_str(), e.identifier.as_str()).ratio();
            (&e.identifier, ratio)
        })
        .filter(|(_, ratio)| *ratio >= TYPO_SIMILARITY_THRESHOLD)
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(identifier, _)| identifier.clone())
}
