//! Error taxonomy for store and analyzer operations.
//!
//! The variants a caller is expected to handle are [`Error::NotFound`]
//! (unknown identifier), [`Error::Unavailable`] (a reachable-dependency
//! fault worth retrying), and [`Error::Validation`] (malformed input,
//! rejected before any mutation). The remaining variants are internal
//! faults.
//!
//! Word-cloud generation failure deliberately has no variant here: it
//! is absorbed inside `Analyzer::analyze` and shows up only as an
//! absent word-cloud location plus a log line.

use thiserror::Error;

/// Typed failure surfaced by the docsim services.
#[derive(Debug, Error)]
pub enum Error {
    /// The requested identifier has no corresponding record.
    #[error("{0} not found")]
    NotFound(String),

    /// An upstream dependency could not be reached; the caller may retry.
    #[error("upstream unavailable: {0}")]
    Unavailable(String),

    /// Malformed input, rejected before any storage or record mutation.
    #[error("invalid request: {0}")]
    Validation(String),

    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
