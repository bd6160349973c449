//! Conversion metrics
//!
//! Emitted through the `metrics` facade; nothing is recorded unless the
//! embedding application installs a recorder.

use crate::error::ErrorKind;
use crate::record::RecordKind;
use std::time::Duration;

const FILES_CONVERTED: &str = "ncd_files_converted_total";
const FILES_FAILED: &str = "ncd_files_failed_total";
const RECORDS_DECODED: &str = "ncd_records_decoded_total";
const FILE_DURATION: &str = "ncd_file_duration_seconds";
const BATCH_DURATION: &str = "ncd_batch_duration_seconds";

/// Count a successfully converted file and its records
pub fn record_converted(kind: RecordKind, records: usize, elapsed: Duration) {
    metrics::counter!(FILES_CONVERTED, "kind" => kind.as_str()).increment(1);
    metrics::counter!(RECORDS_DECODED, "kind" => kind.as_str()).increment(records as u64);
    metrics::histogram!(FILE_DURATION, "kind" => kind.as_str()).record(elapsed.as_secs_f64());
}

/// Count a failed file, labelled by error category
pub fn record_failed(kind: RecordKind, error: ErrorKind) {
    metrics::counter!(FILES_FAILED, "kind" => kind.as_str(), "error" => error.as_str())
        .increment(1);
}

pub fn record_batch_duration(elapsed: Duration) {
    metrics::histogram!(BATCH_DURATION).record(elapsed.as_secs_f64());
}
