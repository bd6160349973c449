//! Background batch worker
//!
//! Runs a batch on a dedicated blocking thread and streams its events back
//! to the caller over a channel.

use super::{BatchConverter, BatchSummary, CancellationFlag, ProgressEvent};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinHandle};
use uuid::Uuid;

/// Events streamed from a running batch, in order
#[derive(Debug, Clone)]
pub enum BatchEvent {
    /// Worker picked up the batch
    Started { batch_id: Uuid, total: usize },
    /// A file finished, or the final 100% marker
    Progress(ProgressEvent),
    /// Every file has an outcome
    Completed(BatchSummary),
}

/// Worker errors
#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("batch worker panicked: {0}")]
    Join(#[from] JoinError),
    #[error("batch worker exited without a summary")]
    Incomplete,
}

/// Handle to a batch running on its worker
pub struct BatchHandle {
    batch_id: Uuid,
    events: mpsc::UnboundedReceiver<BatchEvent>,
    task: JoinHandle<BatchConverter>,
    cancel: CancellationFlag,
}

impl BatchConverter {
    /// Move the batch onto a dedicated worker thread
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn(mut self) -> BatchHandle {
        let (tx, rx) = mpsc::unbounded_channel();
        let batch_id = self.batch_id();
        let cancel = self.cancellation();

        let task = tokio::task::spawn_blocking(move || {
            let total = self.files().len();
            // Receiver may be gone; the batch still runs to completion
            let _ = tx.send(BatchEvent::Started { batch_id, total });

            let summary = self
                .run(&mut |event: ProgressEvent| {
                    let _ = tx.send(BatchEvent::Progress(event));
                })
                .clone();

            let _ = tx.send(BatchEvent::Completed(summary));
            self
        });

        BatchHandle {
            batch_id,
            events: rx,
            task,
            cancel,
        }
    }
}

impl BatchHandle {
    pub fn batch_id(&self) -> Uuid {
        self.batch_id
    }

    /// Request cancellation; takes effect before the next file starts
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn cancellation(&self) -> CancellationFlag {
        self.cancel.clone()
    }

    /// Next event, or `None` once the worker has finished and all events
    /// have been received
    pub async fn next_event(&mut self) -> Option<BatchEvent> {
        self.events.recv().await
    }

    /// Wait for the worker and return the batch summary
    pub async fn join(self) -> Result<BatchSummary, WorkerError> {
        let converter = self.task.await?;
        converter.into_summary().ok_or(WorkerError::Incomplete)
    }
}
