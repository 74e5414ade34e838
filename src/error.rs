//! Error types for the top spenders ranker.

use thiserror::Error;

/// Result type alias for ranker operations
pub type Result<T> = std::result::Result<T, RankerError>;

/// Fatal errors that end a run.
#[derive(Error, Debug)]
pub enum RankerError {
    /// Failed to open or read the input file, or write the report
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reading error
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    /// Malformed JSON request argument
    #[error("Invalid request: {0}")]
    Request(#[from] serde_json::Error),

    /// Row rejected while running in strict mode
    #[error("Invalid transaction at row {row}: {source}")]
    InvalidRecord { row: usize, source: DecodeError },

    /// Filter names a field or operator the evaluator does not support
    #[error("Unsupported filter: field `{field}` with operator `{cmp}`")]
    UnknownFilter { field: String, cmp: String },

    /// Filter literal cannot be parsed for its field
    #[error("Invalid value `{value}` for filter field `{field}`")]
    InvalidFilterValue { field: String, value: String },

    /// Missing request argument
    #[error("Missing request argument. Usage: top-spenders '<json request>'")]
    MissingArgument,
}

/// Reasons a single input row cannot become a transaction.
///
/// These are row-level: the engine logs and skips the row unless strict mode
/// is enabled.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("expected {expected} columns, found {found}")]
    MissingColumns { expected: usize, found: usize },

    #[error("invalid {field} `{value}`")]
    InvalidNumber { field: &'static str, value: String },

    #[error("{field} must not be negative, got `{value}`")]
    Negative { field: &'static str, value: String },

    #[error("invalid timestamp `{value}`: {reason}")]
    InvalidTimestamp { value: String, reason: String },

    #[error("total of amount `{amount}` at rate `{rate}` cannot be represented exactly")]
    UnrepresentableTotal { amount: String, rate: String },

    #[error("malformed CSV record: {0}")]
    Malformed(String),
}
