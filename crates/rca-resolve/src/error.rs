//! Resolution and record-source error types.

use std::path::PathBuf;

use rca_core::errors::CoreError;
use thiserror::Error;

/// Why a precedence branch was skipped. Rendered into
/// [`ResolutionErrors`](rca_core::context::ResolutionErrors), never returned.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BranchError {
    /// The requested id resolved to no record.
    #[error("Could not find {param} {id}")]
    NotFound { param: &'static str, id: String },

    /// The record was found but carries unusable data.
    #[error("Could not use {param} {id}: {source}")]
    Invalid {
        param: &'static str,
        id: String,
        source: CoreError,
    },

    /// The record's timestamps produce a window outside the calendar range.
    #[error("Could not use {param} {id}: time range out of bounds")]
    OutOfRange { param: &'static str, id: String },
}

/// Failures while fetching records. The loader turns each into absence.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}
