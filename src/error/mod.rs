//! # Error Module
//!
//! Error types for the duplicate tree finder.
//!
//! ## Design Principles
//! - **Never panic** on user data - return errors instead
//! - **Include context** - file paths, line numbers, the offending token
//! - Input errors are fatal and surface before any pipeline work starts

use std::num::ParseIntError;
use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum DedupError {
    #[error("Input error: {0}")]
    Input(#[from] InputError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to serialize report: {0}")]
    Report(#[from] serde_json::Error),
}

/// Errors that occur while reading the tree input
#[derive(Error, Debug)]
pub enum InputError {
    #[error("Failed to read input file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid integer {token:?} on line {line}: {source}")]
    InvalidToken {
        line: usize,
        token: String,
        #[source]
        source: ParseIntError,
    },
}

/// Convenience Result type alias
pub type Result<T> = std::result::Result<T, DedupError>;
