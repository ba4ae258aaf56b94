use thiserror::Error;

/// Errors raised at the parsing and import/export boundaries.
///
/// The arithmetic itself is total: totals and schedules never fail, malformed
/// numbers are coerced to zero instead (see [`crate::core::numeric`]).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CalcError {
    /// CSV reading or writing failed.
    #[error("CSV error: {0}")]
    Csv(String),

    /// A date string could not be parsed.
    #[error("invalid date: {0}")]
    InvalidDate(String),

    /// A required column is absent from an imported header row.
    #[error("missing column: {0}")]
    MissingColumn(String),
}
