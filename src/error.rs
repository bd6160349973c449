//! Conversion error types

use crate::record::RecordKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while decoding, buffering or writing a single source file
#[derive(Debug, Error)]
pub enum ConvertError {
    /// Filesystem open/read/write failure
    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Source ended in the middle of a frame
    #[error("truncated frame in {path:?} at byte {offset}")]
    Truncated { path: PathBuf, offset: u64 },
    /// Malformed or unrecognized framing
    #[error("format error in {path:?} at byte {offset}: {detail}")]
    Format {
        path: PathBuf,
        offset: u64,
        detail: String,
    },
    /// Decoded record variant does not match the buffer's kind
    #[error("record kind mismatch: expected {expected}, found {found}")]
    KindMismatch {
        expected: RecordKind,
        found: RecordKind,
    },
    /// Another file in the same batch already wrote this output path
    #[error("output {output:?} already written by {claimed_by:?} in this batch")]
    OutputClaimed { output: PathBuf, claimed_by: PathBuf },
    /// Column lengths disagree at write time
    #[error("schema error: {0}")]
    Schema(String),
    /// Parquet encoder failure
    #[error("parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
    /// Arrow array or batch construction failure
    #[error("arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
}

impl ConvertError {
    /// Wrap an I/O error with the path it happened on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Build a format error for a byte offset within a source file
    pub fn format(path: impl Into<PathBuf>, offset: u64, detail: impl Into<String>) -> Self {
        Self::Format {
            path: path.into(),
            offset,
            detail: detail.into(),
        }
    }

    /// Classify this error into the reported taxonomy
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Io { .. } | Self::Truncated { .. } | Self::Parquet(_) => ErrorKind::Io,
            Self::Format { .. } => ErrorKind::Format,
            Self::KindMismatch { .. } => ErrorKind::KindMismatch,
            Self::OutputClaimed { .. } => ErrorKind::DuplicateOutput,
            Self::Schema(_) | Self::Arrow(_) => ErrorKind::Schema,
        }
    }
}

/// Error category carried by a failed conversion outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Io,
    Format,
    KindMismatch,
    Schema,
    /// Output name collides with an earlier file of the batch
    DuplicateOutput,
    /// Batch was cancelled before this file started
    Cancelled,
}

impl ErrorKind {
    /// Internal-consistency faults, as opposed to bad input
    pub fn is_internal(self) -> bool {
        matches!(self, Self::KindMismatch | Self::Schema)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Io => "io",
            Self::Format => "format",
            Self::KindMismatch => "kind_mismatch",
            Self::Schema => "schema",
            Self::DuplicateOutput => "duplicate_output",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub type Result<T> = std::result::Result<T, ConvertError>;
