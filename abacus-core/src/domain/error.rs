// abacus-core/src/domain/error.rs

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum DomainError {
    #[error("Invalid input: {0}")]
    #[diagnostic(
        code(abacus::domain::invalid_input),
        help("Check that the dataset is not empty and carries every configured column.")
    )]
    InvalidInput(String),

    #[error("Insufficient data: {rows} rows, the statistical model needs at least {required}")]
    #[diagnostic(
        code(abacus::domain::insufficient_data),
        help("Provide a larger dataset or lower `detection.min_rows`.")
    )]
    InsufficientData { rows: usize, required: usize },

    #[error("Degenerate column '{column}': {reason}")]
    #[diagnostic(
        code(abacus::domain::degenerate_column),
        help("Exclude the column via `encoding.exclude_columns` or set `encoding.zero_variance: substitute`.")
    )]
    DegenerateColumn { column: String, reason: String },

    #[error("Invalid pattern for '{field}': {source}")]
    #[diagnostic(code(abacus::domain::pattern))]
    InvalidPattern {
        field: String,
        #[source]
        source: regex::Error,
    },

    #[error("Dataset record not found: {0}")]
    #[diagnostic(code(abacus::domain::record_not_found))]
    RecordNotFound(String),

    #[error("Persistence Error: {0}")]
    #[diagnostic(code(abacus::domain::persistence))]
    Persistence(String),
}
