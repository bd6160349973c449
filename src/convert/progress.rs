//! Progress events

use super::ConversionOutcome;
use serde::Serialize;

/// Emitted after each file completes, and once more when the batch ends
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressEvent {
    /// Files finished so far
    pub completed: usize,
    pub total: usize,
    /// `completed / total * 100`, in `[0, 100]`
    pub percent: f64,
    pub message: String,
    /// Outcome of the file that just finished; `None` on the final event
    pub outcome: Option<ConversionOutcome>,
}

impl ProgressEvent {
    pub(crate) fn file_done(completed: usize, total: usize, outcome: ConversionOutcome) -> Self {
        Self {
            completed,
            total,
            percent: percent(completed, total),
            message: format!("[{}/{}] {}", completed, total, outcome.describe()),
            outcome: Some(outcome),
        }
    }

    pub(crate) fn finished(total: usize, succeeded: usize) -> Self {
        Self {
            completed: total,
            total,
            percent: 100.0,
            message: format!(
                "=== Conversion complete: {} of {} files converted ===",
                succeeded, total
            ),
            outcome: None,
        }
    }

    /// True for the final event of a batch
    pub fn is_final(&self) -> bool {
        self.outcome.is_none()
    }
}

/// Share of files finished, as a percentage
pub fn percent(completed: usize, total: usize) -> f64 {
    if total == 0 {
        100.0
    } else {
        completed as f64 / total as f64 * 100.0
    }
}

/// Receives progress events from a running batch, in file order
pub trait ProgressSink {
    fn on_progress(&mut self, event: ProgressEvent);
}

impl<F: FnMut(ProgressEvent)> ProgressSink for F {
    fn on_progress(&mut self, event: ProgressEvent) {
        self(event)
    }
}
