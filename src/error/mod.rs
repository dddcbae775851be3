//! # Error Module
//!
//! Error types for the range generator.
//!
//! ## Design Principles
//! - **Never panic** on user data - return errors instead
//! - **Include context** - paths, frame names, what went wrong
//! - **Per-frame errors are not fatal** - they are collected, the run continues
//! - **Run-level errors abort** - configuration, directory and output failures

use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum RangeGenError {
    #[error("Scanning error: {0}")]
    Scan(#[from] ScanError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Output error: {0}")]
    Output(#[from] OutputError),

    #[error("Run was cancelled")]
    Cancelled,
}

impl RangeGenError {
    /// Process exit code for this error.
    ///
    /// Cancellation is a clean exit: nothing was written. Code 2 (frame read
    /// error) is reserved; unreadable frames are reported per frame and never
    /// abort a run.
    pub fn exit_code(&self) -> u8 {
        match self {
            RangeGenError::Config(_) => 1,
            RangeGenError::Scan(_) => 3,
            RangeGenError::Output(_) => 4,
            RangeGenError::Cancelled => 0,
        }
    }
}

/// Errors that occur while enumerating frames
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Input directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    #[error("Permission denied accessing: {path}")]
    PermissionDenied { path: PathBuf },

    #[error("Failed to read directory {path}: {source}")]
    ReadDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Frame file name is not valid UTF-8: {path}")]
    InvalidFileName { path: PathBuf },
}

/// Errors that occur while hashing a single frame
#[derive(Error, Debug)]
pub enum HashError {
    #[error("Failed to decode frame {path}: {reason}")]
    DecodeError { path: PathBuf, reason: String },

    #[error("Failed to open frame file {path}: {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid digest {digest:?}: expected hexadecimal characters only")]
    InvalidDigest { digest: String },

    #[error("Frame {frame} was already hashed")]
    DuplicateFrame { frame: String },

    #[error("Unsupported hash size: {size} (must be between 2 and 64, and a multiple of 4 for blockhash)")]
    UnsupportedHashSize { size: u32 },
}

/// Errors in the run configuration, raised before any hashing starts
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid command-line arguments")]
    InvalidArguments,

    #[error("Can't convert threshold {value:?} to a non-negative integer")]
    InvalidThreshold { value: String },

    #[error("Failed to start worker pool with {jobs} threads: {reason}")]
    WorkerPool { jobs: usize, reason: String },

    #[error("No frame extensions configured")]
    NoExtensions,

    #[error("Invalid hasher settings: {0}")]
    Hasher(#[source] HashError),
}

/// Errors that occur while writing the range list
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to create temporary output next to {path}: {source}")]
    CreateTemp {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write ranges to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to replace {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience Result type alias
pub type Result<T> = std::result::Result<T, RangeGenError>;
