//! Error types shared across the crate.

use std::io;
use thiserror::Error;

/// Errors surfaced by parsing, configuration and the merge pipelines.
///
/// Every stage returns the first error it hits; there are no retries and no
/// partial results.
#[derive(Error, Debug)]
pub enum MergeError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("bad input: interval token {token:?}: {reason}")]
    BadInput { token: String, reason: String },

    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, MergeError>;
