//! Batch conversion
//!
//! Orchestrates classify → decode → buffer → write for every file of a
//! batch, isolating failures per file and reporting progress in input order

mod batch;
mod outcome;
mod progress;
mod worker;

pub use batch::{BatchConverter, BatchState, CancellationFlag, ConvertOptions};
pub use outcome::{BatchSummary, ConversionOutcome};
pub use progress::{percent, ProgressEvent, ProgressSink};
pub use worker::{BatchEvent, BatchHandle, WorkerError};
