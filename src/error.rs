//! Error types for the series engine

use thiserror::Error;

use crate::statement::StatementError;

/// Main error type for series operations
///
/// All failures are local and synchronous: they are surfaced to the
/// immediate caller and never retried. Length checks run before any
/// mutation, so a failed bulk update leaves the series untouched.
#[derive(Error, Debug)]
pub enum Error {
    /// Caller-supplied value count disagrees with the expected count
    #[error("Length mismatch: expected {expected} values, got {actual}")]
    LengthMismatch {
        /// Number of values the operation requires
        expected: usize,
        /// Number of values the caller supplied
        actual: usize,
    },

    /// Conditional statement failed to compile
    #[error("Invalid conditional statement: {0}")]
    Statement(#[from] StatementError),

    /// Fixed-format location block could not be parsed
    #[error("Location parse error: {0}")]
    LocationParse(String),

    /// Unrecognized sampling frequency label
    #[error("Unknown frequency label: '{0}'")]
    UnknownFrequency(String),

    /// Calendar timestamp with out-of-range fields
    #[error("Invalid timestamp: month {month}, day {day}, hour {hour}")]
    InvalidTimestamp {
        /// Month component (valid range 1-12)
        month: u8,
        /// Day component (valid range 1 to the month's length)
        day: u8,
        /// Hour-of-day component (valid range 1-24)
        hour: u8,
    },

    /// Analysis period with out-of-range bounds
    #[error("Invalid analysis period: {0}")]
    InvalidPeriod(String),

    /// Average over zero samples
    #[error("Cannot average an empty set of samples")]
    EmptyAverage,
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
