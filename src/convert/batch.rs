//! Batch conversion state machine

use super::{BatchSummary, ConversionOutcome, ProgressEvent, ProgressSink};
use crate::codec::{MinuteCodec, RecordCodec, TickCodec};
use crate::columns::ColumnBuffer;
use crate::config::{Config, WriterConfig};
use crate::data::ParquetWriter;
use crate::error::{ConvertError, ErrorKind};
use crate::record::{RecordKind, SourceFile};
use crate::telemetry::metrics;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

/// Lifecycle of a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchState {
    Pending,
    Running,
    Completed,
}

/// Options shared by every file in a batch
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Output file extension, without the dot
    pub extension: String,
    pub writer: WriterConfig,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            extension: "parquet".to_string(),
            writer: WriterConfig::default(),
        }
    }
}

impl ConvertOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            extension: config.convert.extension.clone(),
            writer: config.writer.clone(),
        }
    }
}

/// Cooperative cancellation, observed between files only
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, Copy)]
enum Stage {
    Open,
    Decode,
    Write,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Open => "open",
            Stage::Decode => "decode",
            Stage::Write => "write",
        })
    }
}

/// A single file's failure with the progress made before it
struct FileFailure {
    stage: Stage,
    error: ConvertError,
    records: usize,
}

impl FileFailure {
    fn new(stage: Stage, error: ConvertError, records: usize) -> Self {
        Self {
            stage,
            error,
            records,
        }
    }

    fn message(&self) -> String {
        format!(
            "{} failed after {} records: {}",
            self.stage, self.records, self.error
        )
    }
}

/// Decode one file to exhaustion and write its columns
///
/// The codec is bound statically, so the decode loop has no per-record
/// dispatch on the kind.
fn convert_with<C: RecordCodec>(
    source: &Path,
    writer: &ParquetWriter,
    output: &Path,
) -> Result<usize, FileFailure> {
    let mut codec = C::open(source).map_err(|e| FileFailure::new(Stage::Open, e, 0))?;
    let mut buffer = ColumnBuffer::new(C::KIND);

    while !codec.is_exhausted() {
        let record = codec
            .read_next()
            .map_err(|e| FileFailure::new(Stage::Decode, e, buffer.len()))?;
        buffer
            .append(record)
            .map_err(|e| FileFailure::new(Stage::Decode, e, buffer.len()))?;
    }

    let records = buffer.len();
    let written = writer
        .write(buffer.drain(), output)
        .map_err(|e| FileFailure::new(Stage::Write, e, records))?;

    if written != records {
        return Err(FileFailure::new(
            Stage::Write,
            ConvertError::Schema(format!(
                "decoded {} records but wrote {} rows",
                records, written
            )),
            records,
        ));
    }

    Ok(records)
}

/// Converts an ordered list of source files into one output file each
///
/// Files are processed one at a time in input order. A failure converting one
/// file is recorded in its outcome and never stops the rest of the batch.
pub struct BatchConverter {
    batch_id: Uuid,
    files: Vec<SourceFile>,
    output_dir: PathBuf,
    options: ConvertOptions,
    writer: ParquetWriter,
    cancel: CancellationFlag,
    state: BatchState,
    summary: Option<BatchSummary>,
}

impl BatchConverter {
    /// Submit a batch; it stays `Pending` until run
    pub fn new(
        files: Vec<SourceFile>,
        output_dir: impl Into<PathBuf>,
        options: ConvertOptions,
    ) -> Self {
        let writer = ParquetWriter::new(options.writer.clone());
        Self {
            batch_id: Uuid::new_v4(),
            files,
            output_dir: output_dir.into(),
            options,
            writer,
            cancel: CancellationFlag::default(),
            state: BatchState::Pending,
            summary: None,
        }
    }

    pub fn batch_id(&self) -> Uuid {
        self.batch_id
    }

    pub fn state(&self) -> BatchState {
        self.state
    }

    pub fn files(&self) -> &[SourceFile] {
        &self.files
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Handle for cancelling this batch from another thread
    pub fn cancellation(&self) -> CancellationFlag {
        self.cancel.clone()
    }

    /// Summary, once the batch has completed
    pub fn summary(&self) -> Option<&BatchSummary> {
        self.summary.as_ref()
    }

    pub fn into_summary(self) -> Option<BatchSummary> {
        self.summary
    }

    /// Output path for a source: `<output_dir>/<file stem>.<extension>`
    pub fn output_path(&self, source: &SourceFile) -> PathBuf {
        let stem = source
            .path()
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "output".to_string());
        self.output_dir
            .join(format!("{}.{}", stem, self.options.extension))
    }

    /// Run the batch to completion, reporting progress to `sink`
    ///
    /// Running an already completed batch returns its existing summary.
    pub fn run<S: ProgressSink + ?Sized>(&mut self, sink: &mut S) -> &BatchSummary {
        let summary = match self.summary.take() {
            Some(summary) => {
                tracing::warn!(batch_id = %self.batch_id, "Batch already completed");
                summary
            }
            None => self.execute(sink),
        };
        self.summary.insert(summary)
    }

    fn execute<S: ProgressSink + ?Sized>(&mut self, sink: &mut S) -> BatchSummary {
        self.state = BatchState::Running;
        let started = Instant::now();
        let total = self.files.len();

        let span = tracing::info_span!("batch", batch_id = %self.batch_id);
        let _enter = span.enter();
        tracing::info!(files = total, output_dir = ?self.output_dir, "Batch started");

        // output path -> source that wrote it
        let mut claimed: HashMap<PathBuf, PathBuf> = HashMap::new();
        let mut outcomes = Vec::with_capacity(total);
        for (index, source) in self.files.iter().enumerate() {
            let outcome = if self.cancel.is_cancelled() {
                ConversionOutcome::Failed {
                    source: source.path().to_path_buf(),
                    kind: source.kind(),
                    error: ErrorKind::Cancelled,
                    message: "batch cancelled before this file started".to_string(),
                    records_decoded: 0,
                }
            } else {
                self.convert_file(source, &mut claimed)
            };

            sink.on_progress(ProgressEvent::file_done(index + 1, total, outcome.clone()));
            outcomes.push(outcome);
        }

        let elapsed = started.elapsed();
        let summary = BatchSummary {
            batch_id: self.batch_id,
            outcomes,
            elapsed_ms: elapsed.as_millis() as u64,
        };

        sink.on_progress(ProgressEvent::finished(total, summary.succeeded()));
        metrics::record_batch_duration(elapsed);
        tracing::info!(
            succeeded = summary.succeeded(),
            failed = summary.failed(),
            records = summary.total_records(),
            elapsed_ms = summary.elapsed_ms,
            "Batch completed"
        );

        self.state = BatchState::Completed;
        summary
    }

    fn convert_file(
        &self,
        source: &SourceFile,
        claimed: &mut HashMap<PathBuf, PathBuf>,
    ) -> ConversionOutcome {
        let started = Instant::now();
        let name = source.display_name();
        let kind = source.kind();

        if let Some(reason) = source.classify_reason().filter(|r| r.is_fallback()) {
            tracing::warn!(
                file = %name,
                %kind,
                %reason,
                "Record kind guessed from path layout"
            );
        }

        let output = self.output_path(source);
        let result = match claimed.get(&output) {
            Some(earlier) => Err(FileFailure::new(
                Stage::Open,
                ConvertError::OutputClaimed {
                    output: output.clone(),
                    claimed_by: earlier.clone(),
                },
                0,
            )),
            None => match kind {
                RecordKind::Minute => {
                    convert_with::<MinuteCodec>(source.path(), &self.writer, &output)
                }
                RecordKind::Tick => {
                    convert_with::<TickCodec>(source.path(), &self.writer, &output)
                }
            },
        };

        match result {
            Ok(records) => {
                claimed.insert(output.clone(), source.path().to_path_buf());
                metrics::record_converted(kind, records, started.elapsed());
                tracing::info!(file = %name, %kind, records, output = ?output, "Converted");
                ConversionOutcome::Succeeded {
                    source: source.path().to_path_buf(),
                    kind,
                    output,
                    records,
                }
            }
            Err(failure) => {
                let error = failure.error.kind();
                let message = failure.message();
                metrics::record_failed(kind, error);
                if error.is_internal() {
                    tracing::error!(
                        file = %name,
                        %kind,
                        %error,
                        %message,
                        "Internal fault converting file"
                    );
                } else {
                    tracing::warn!(file = %name, %kind, %error, %message, "Conversion failed");
                }
                ConversionOutcome::Failed {
                    source: source.path().to_path_buf(),
                    kind,
                    error,
                    message,
                    records_decoded: failure.records,
                }
            }
        }
    }
}
