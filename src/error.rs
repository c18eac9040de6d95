//! Centralized error and warning types for chatShell.
//!
//! [`ChatError`] is for conditions that stop the pipeline. Per-item problems
//! (one bad file, one message, one missing photo) are [`Warning`]s carried
//! next to the successful payload in [`Loaded`].

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// All errors produced by the chatShell library.
#[derive(Error, Debug)]
pub enum ChatError {
    /// I/O error with the associated file path.
    #[error("I/O error reading '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The archive directory does not exist.
    #[error("Archive directory not found: {0}")]
    DirectoryNotFound(PathBuf),

    /// The archive path exists but is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// Nothing could be loaded from the archive.
    #[error("No messages found in the archive")]
    EmptyArchive,

    /// The cache file is corrupt or was written by an incompatible version.
    #[error("Corrupt or incompatible cache '{path}': {reason}")]
    InvalidCache { path: PathBuf, reason: String },

    /// A date argument could not be parsed.
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// A configuration value is out of range or malformed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Convenience alias for `Result<T, ChatError>`.
pub type Result<T> = std::result::Result<T, ChatError>;

impl ChatError {
    /// Create an `Io` variant from a path and an `io::Error`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// A recoverable, per-item problem found while building a view.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Warning {
    /// A JSON or media file could not be opened or read.
    #[error("Cannot read '{path}': {reason}")]
    FileAccess { path: PathBuf, reason: String },

    /// A JSON file is not valid JSON.
    #[error("Cannot parse '{path}': {reason}")]
    Parse { path: PathBuf, reason: String },

    /// One element of a `messages` array could not be decoded.
    #[error("Skipping message #{index} in '{path}': {reason}")]
    MalformedRecord {
        path: PathBuf,
        index: usize,
        reason: String,
    },

    /// One element of a `messages` array has no timestamp.
    #[error("Skipping message #{index} in '{path}': no timestamp")]
    MissingTimestamp { path: PathBuf, index: usize },

    /// One optional field of a message could not be decoded. The message was
    /// kept without it (or without the bad list entry).
    #[error("Ignoring '{field}' of message #{index} in '{path}': {reason}")]
    MalformedField {
        path: PathBuf,
        index: usize,
        field: String,
        reason: String,
    },

    /// Text repair failed; the original content was kept.
    #[error("Could not repair text of message at {timestamp_ms}: {reason}")]
    EncodingRepair { timestamp_ms: i64, reason: String },

    /// An attachment does not exist in the local media directory.
    #[error("Media file not found: {path}")]
    MissingMedia { path: PathBuf },
}

impl Warning {
    /// Short machine-friendly name of the warning kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::FileAccess { .. } => "file_access",
            Self::Parse { .. } => "parse",
            Self::MalformedRecord { .. } => "malformed_record",
            Self::MissingTimestamp { .. } => "missing_timestamp",
            Self::MalformedField { .. } => "malformed_field",
            Self::EncodingRepair { .. } => "encoding_repair",
            Self::MissingMedia { .. } => "missing_media",
        }
    }
}

/// A successfully built value together with the warnings found on the way.
#[derive(Debug, Clone)]
pub struct Loaded<T> {
    pub value: T,
    pub warnings: Vec<Warning>,
}

impl<T> Loaded<T> {
    /// Wrap a value that produced no warnings.
    pub fn clean(value: T) -> Self {
        Self {
            value,
            warnings: Vec::new(),
        }
    }

    /// Transform the payload, keeping the warnings.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Loaded<U> {
        Loaded {
            value: f(self.value),
            warnings: self.warnings,
        }
    }
}
