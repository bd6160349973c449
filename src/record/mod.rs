//! Record model
//!
//! Record kinds, decoded records, source file descriptors and path-based
//! kind classification

mod classify;
mod types;

pub use classify::{classify, classify_with_reason, Classification, ClassifyReason};
pub use types::{MinuteBar, Record, TickQuote};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Granularity of a source file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    /// OHLCV minute bars
    Minute,
    /// Trade ticks with bid/ask
    Tick,
}

impl RecordKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RecordKind::Minute => "minute",
            RecordKind::Tick => "tick",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An input file submitted for conversion, with its kind fixed at creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceFile {
    path: PathBuf,
    kind: RecordKind,
    #[serde(skip)]
    reason: Option<ClassifyReason>,
}

impl SourceFile {
    /// Create a source file, classifying its kind from the path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let Classification { kind, reason } = classify_with_reason(&path);
        Self {
            path,
            kind,
            reason: Some(reason),
        }
    }

    /// Create a pre-classified source file
    pub fn with_kind(path: impl Into<PathBuf>, kind: RecordKind) -> Self {
        Self {
            path: path.into(),
            kind,
            reason: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    /// Classification rule that picked the kind, `None` if pre-classified
    pub fn classify_reason(&self) -> Option<ClassifyReason> {
        self.reason
    }

    /// File name for display
    pub fn display_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}
