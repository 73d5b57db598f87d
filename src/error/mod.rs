//! # Error Module
//!
//! Error types for the media sweeper.
//!
//! Most failure modes in the scan pipeline are deliberately *not* errors:
//! a photo that fails to decode is counted and skipped, and a cancelled scan
//! simply stops emitting progress. The types here cover the cases that do
//! halt the pipeline, chiefly the media store being unreachable.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum SweepError {
    #[error("Media store error: {0}")]
    Store(#[from] StoreError),

    #[error("Scan failed: {0}")]
    Scan(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Output error: {0}")]
    Output(String),
}

/// Errors raised by a media store implementation
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Media library not found: {path}")]
    LibraryNotFound { path: PathBuf },

    #[error("Permission denied accessing: {path}")]
    PermissionDenied { path: PathBuf },

    #[error("Failed to enumerate media library {path}: {source}")]
    Enumeration {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to delete {id}: {source}")]
    Deletion {
        id: String,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience Result type alias
pub type Result<T> = std::result::Result<T, SweepError>;
