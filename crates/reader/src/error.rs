//! Reader error types

use contracts::ContractError;
use thiserror::Error;

/// Failure while reading a probe recording
#[derive(Debug, Error)]
pub enum ReaderError {
    #[error("failed to read recording: {0}")]
    Io(#[from] std::io::Error),

    /// File contains no lines at all
    #[error("recording is empty")]
    EmptyFile,

    /// Header block is never followed by a column header line
    #[error("no column header found after the metadata block")]
    MissingHeader,

    /// A sample cell could not be parsed
    #[error("line {line}, column '{column}': {message}")]
    Parse {
        /// 1-based line number in the file
        line: usize,
        column: String,
        message: String,
    },

    /// Sample table is not well-formed CSV (unbalanced quotes, ragged rows)
    #[error("malformed sample table at line {line}: {source}")]
    Csv {
        /// 1-based line number in the file
        line: usize,
        #[source]
        source: csv::Error,
    },

    #[error("failed to write recording: {0}")]
    Write(#[from] csv::Error),

    /// Parsed columns do not form a valid sample table
    #[error(transparent)]
    Table(#[from] ContractError),
}

/// Reader Result type alias
pub type Result<T> = std::result::Result<T, ReaderError>;
