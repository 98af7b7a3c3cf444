//! Run-fatal error type for the scan engine
//!
//! Per-node failures never surface here; they are folded into the `error`
//! column of the node's record. `ScanError` covers only conditions that
//! abort the whole run.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort the run.
#[derive(Debug, Error)]
pub enum ScanError {
    /// A scan target passed on the command line does not exist.
    #[error("scan target does not exist: {0}")]
    MissingTarget(PathBuf),

    /// The CSV sink could not be written to or flushed.
    #[error("failed to write CSV output: {0}")]
    Csv(#[from] csv::Error),

    /// I/O failure on the output stream itself.
    #[error("output stream error: {0}")]
    Io(#[from] io::Error),

    /// An exclusion pattern is not valid glob syntax.
    #[error("invalid exclusion pattern `{pattern}`: {source}")]
    BadPattern {
        pattern: String,
        source: glob::PatternError,
    },

    /// The SIGINT handler could not be installed.
    #[error("failed to install interrupt handler: {0}")]
    Interrupt(#[from] ctrlc::Error),
}
