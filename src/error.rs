//! Error types for the packaging front-end.
//!
//! Config and target-resolution failures are recovered where they happen and
//! never surface here; everything in this module aborts the batch.

use thiserror::Error;

/// Result type alias for packager operations
pub type Result<T> = std::result::Result<T, PackagerError>;

/// Main error type for all packager operations
#[derive(Error, Debug)]
pub enum PackagerError {
    /// CLI argument errors
    #[error(transparent)]
    Cli(#[from] CliError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A builder ran but did not produce a usable result
    #[error("builder {builder} failed: {reason}")]
    Builder {
        /// Builder identifier or path
        builder: String,
        /// Reason for the failure
        reason: String,
    },

    /// No builder could be resolved for an identifier
    #[error("builder {builder} not found: {reason}")]
    BuilderNotFound {
        /// Builder identifier that was looked up
        builder: String,
        /// Lookup failure
        reason: String,
    },

    /// Generic errors from anyhow
    #[error("{0}")]
    Anyhow(#[from] anyhow::Error),
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },
}
