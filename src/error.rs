//! Error types for Seqfeat

use thiserror::Error;

/// Errors that can occur during extraction
///
/// Every variant is fatal: the pipeline stops at the first error and the
/// output file is not finalized.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: record is empty")]
    EmptyLine { line: usize },

    #[error("line {line}: cannot parse label token {token:?} as an integer")]
    LabelParse { line: usize, token: String },

    #[error("line {line}: record with label {label} has no symbol tokens")]
    EmptyRecord { line: usize, label: i64 },

    #[error("line {line}: unknown symbol token {token:?}")]
    UnknownSymbol { line: usize, token: String },

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),
}
