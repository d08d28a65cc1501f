#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

/// Google Form question holding the UCInetID of the student filling the form.
pub const FORM_STUDENT_COLUMN: &str = "What is your UCI Net ID (**NOT** your ID number)?  For most \
                                       students, it is the prefix to your @uci.edu email address).";

/// Google Form question holding the UCInetID of the student's partner.
pub const FORM_PARTNER_COLUMN: &str = "What is your partner's UCI Net ID?";

/// Label Canvas expects at the start of the second row of an import file.
pub const POINTS_POSSIBLE_LABEL: &str = "Points Possible";

/// Minimum character-level similarity for a graded identifier to be suggested
/// as the intended spelling of a missing partner.
pub const TYPO_SIMILARITY_THRESHOLD: f32 = 0.8;

/// Environment variable holding a `tracing` filter directive.
pub const LOG_ENV_VAR: &str = "RAWGRADES_LOG";
