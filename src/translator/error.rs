use thiserror::Error;

/// Usage text shown whenever a time predicate cannot be interpreted
pub const TIME_FILTER_USAGE: &str = "Must use \"( time_generated geq 'YYYY/MM/DD hh:mm:ss' ) and ( time_generated leq 'YYYY/MM/DD hh:mm:ss' )\" in this order to search between times.\nOr a single \"time_generated geq <OR> leq\", \"receive_time\" is also accepted, both translated to \"TimeGenerated\".";

/// Errors raised while translating a PAN filter
///
/// Only the time-range stage can fail; every other stage treats a missing
/// match as a no-op.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("Incorrect PAN time format ({occurrences} time field reference(s) found)\n\n{usage}", usage = TIME_FILTER_USAGE)]
    MalformedTimeFilter { occurrences: usize },

    #[error("Invalid PAN timestamp '{literal}': {reason}")]
    InvalidTimestamp { literal: String, reason: String },

    #[error("Timestamp '{literal}' does not exist in timezone {timezone} (skipped by a daylight saving transition)")]
    NonexistentLocalTime { literal: String, timezone: String },
}
