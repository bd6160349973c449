//! Per-file outcomes and batch summary

use crate::error::ErrorKind;
use crate::record::RecordKind;
use serde::Serialize;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Terminal result of converting one source file
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ConversionOutcome {
    Succeeded {
        source: PathBuf,
        kind: RecordKind,
        output: PathBuf,
        records: usize,
    },
    Failed {
        source: PathBuf,
        kind: RecordKind,
        error: ErrorKind,
        message: String,
        /// Records decoded before the failure
        records_decoded: usize,
    },
}

impl ConversionOutcome {
    pub fn source(&self) -> &Path {
        match self {
            Self::Succeeded { source, .. } | Self::Failed { source, .. } => source,
        }
    }

    pub fn kind(&self) -> RecordKind {
        match self {
            Self::Succeeded { kind, .. } | Self::Failed { kind, .. } => *kind,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded { .. })
    }

    /// Error category of a failed outcome
    pub fn error(&self) -> Option<ErrorKind> {
        match self {
            Self::Succeeded { .. } => None,
            Self::Failed { error, .. } => Some(*error),
        }
    }

    /// Records written on success, records decoded before failure otherwise
    pub fn records(&self) -> usize {
        match self {
            Self::Succeeded { records, .. } => *records,
            Self::Failed {
                records_decoded, ..
            } => *records_decoded,
        }
    }

    pub(crate) fn source_name(&self) -> String {
        let source = self.source();
        source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| source.display().to_string())
    }

    /// One-line description, as shown in progress output
    pub fn describe(&self) -> String {
        match self {
            Self::Succeeded {
                output, records, ..
            } => format!(
                "{}: converted {} records -> {}",
                self.source_name(),
                records,
                output.display()
            ),
            Self::Failed { error, message, .. } => {
                format!("{}: FAILED ({}): {}", self.source_name(), error, message)
            }
        }
    }
}

/// Outcomes of a completed batch, in input order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchSummary {
    pub batch_id: Uuid,
    pub outcomes: Vec<ConversionOutcome>,
    pub elapsed_ms: u64,
}

impl BatchSummary {
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.len() - self.succeeded()
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed() == 0
    }

    /// Records written across all successful files
    pub fn total_records(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.is_success())
            .map(|o| o.records())
            .sum()
    }

    pub fn failures(&self) -> impl Iterator<Item = &ConversionOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }

    /// Format as table for CLI output
    pub fn format_table(&self) -> String {
        let mut out = String::new();
        out.push_str("══════════════════════════════════════════════════════\n");
        out.push_str("                  CONVERSION SUMMARY\n");
        out.push_str("══════════════════════════════════════════════════════\n");
        for outcome in &self.outcomes {
            let mark = if outcome.is_success() { "✓" } else { "✗" };
            out.push_str(&format!(" {} {}\n", mark, outcome.describe()));
        }
        out.push_str("──────────────────────────────────────────────────────\n");
        out.push_str(&format!(" Files:      {:>10}\n", self.len()));
        out.push_str(&format!(" Succeeded:  {:>10}\n", self.succeeded()));
        out.push_str(&format!(" Failed:     {:>10}\n", self.failed()));
        out.push_str(&format!(" Records:    {:>10}\n", self.total_records()));
        out.push_str(&format!(" Elapsed:    {:>8}ms\n", self.elapsed_ms));
        out.push_str("══════════════════════════════════════════════════════\n");
        out
    }
}
