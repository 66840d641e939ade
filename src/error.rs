//! # Error Handling
//!
//! This module defines the centralized error handling mechanism for the
//! `wiki2git` application. It uses the `thiserror` library to create an
//! `Error` enum covering every failure mode the conversion pipeline can
//! hit, each variant carrying the context needed for a useful diagnostic.
//!
//! All failures here are terminal: the pipeline never recovers or retries.
//! The only non-fatal condition in the whole tool — an unreadable namespace
//! blacklist — is handled in the `blacklist` module and never surfaces as
//! an `Error` value.
//!
//! The `Result<T>` alias is used throughout the library; the binary's
//! commands convert into `anyhow::Error` at the boundary so the process
//! exits non-zero with the diagnostic on stderr, away from the command
//! stream on stdout.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for wiki2git operations
#[derive(Error, Debug)]
pub enum Error {
    /// The export stream is malformed at a known position.
    ///
    /// Includes the 1-based line and the absolute byte offset of the token
    /// that failed to parse.
    #[error("parse error at line {line}, byte {offset}: {message}")]
    Parse {
        message: String,
        line: u64,
        offset: u64,
    },

    /// A revision carried a timestamp that is not the fixed 20-character
    /// `YYYY-MM-DDThh:mm:ssZ` form.
    #[error("malformed timestamp {value:?}: expected YYYY-MM-DDThh:mm:ssZ")]
    Timestamp { value: String },

    /// A revision id could not be read as a number, so no mark can be
    /// assigned to its blob and commit.
    #[error("revision id {value:?} is not numeric")]
    RevisionId { value: String },

    /// Reading or writing the auxiliary spool file failed.
    ///
    /// The ordered history cannot be produced with entries missing, so
    /// this always aborts the run.
    #[error("spool file error for '{}': {source}", path.display())]
    Spool {
        path: PathBuf,
        source: std::io::Error,
    },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
