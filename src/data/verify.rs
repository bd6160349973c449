//! Read-back verification of converted files

use super::schema::{detect_kind, price_columns};
use crate::error::{ConvertError, Result};
use crate::record::RecordKind;
use arrow::array::{Array, Float64Array, Int64Array, TimestampMicrosecondArray};
use arrow::record_batch::RecordBatch;
use chrono::{DateTime, Utc};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Serialize;
use std::collections::HashSet;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

/// Verification result for one Parquet file
#[derive(Debug, Clone, Default, Serialize)]
pub struct VerifyReport {
    pub path: PathBuf,
    /// Kind detected from the schema
    pub kind: Option<RecordKind>,
    pub rows: usize,
    pub first_timestamp: Option<DateTime<Utc>>,
    pub last_timestamp: Option<DateTime<Utc>>,
    /// Range of each price column, in schema order
    pub columns: Vec<ColumnRange>,
    /// Lowest and highest value across all price columns
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub total_volume: i64,
    pub null_values: usize,
    /// Rows whose timestamp is earlier than the previous row's
    pub out_of_order: usize,
    /// Rows identical in every column to an earlier row
    pub duplicate_rows: usize,
    pub negative_volumes: usize,
    /// Problems that fail verification
    pub issues: Vec<String>,
    /// Problems worth reporting that do not fail verification
    pub warnings: Vec<String>,
}

/// Observed value range of one price column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnRange {
    pub name: &'static str,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl ColumnRange {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            min: None,
            max: None,
        }
    }

    fn include(&mut self, value: f64) {
        self.min = Some(self.min.map_or(value, |m| m.min(value)));
        self.max = Some(self.max.map_or(value, |m| m.max(value)));
    }
}

impl VerifyReport {
    pub fn passed(&self) -> bool {
        self.issues.is_empty()
    }

    /// Format as text for CLI output
    pub fn format_text(&self) -> String {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string());

        let mut out = format!("{}\n", name);
        out.push_str(&format!(
            "  kind:    {}\n",
            self.kind.map(|k| k.as_str()).unwrap_or("unknown")
        ));
        out.push_str(&format!("  rows:    {}\n", self.rows));
        if let (Some(first), Some(last)) = (self.first_timestamp, self.last_timestamp) {
            out.push_str(&format!(
                "  range:   {} .. {} ({})\n",
                first.to_rfc3339(),
                last.to_rfc3339(),
                format_span(last - first)
            ));
        }
        for range in &self.columns {
            if let (Some(lo), Some(hi)) = (range.min, range.max) {
                out.push_str(&format!(
                    "  {:<8} {:.2} .. {:.2}\n",
                    format!("{}:", range.name),
                    lo,
                    hi
                ));
            }
        }
        out.push_str(&format!("  volume:  {}\n", self.total_volume));
        for warning in &self.warnings {
            out.push_str(&format!("  warning: {}\n", warning));
        }
        for issue in &self.issues {
            out.push_str(&format!("  FAILED:  {}\n", issue));
        }
        if self.passed() {
            out.push_str("  PASSED\n");
        }
        out
    }
}

fn format_span(span: chrono::Duration) -> String {
    let secs = span.num_seconds();
    format!(
        "{}d {:02}:{:02}:{:02}",
        secs / 86_400,
        (secs % 86_400) / 3_600,
        (secs % 3_600) / 60,
        secs % 60
    )
}

/// Verify one file, folding read failures into the report
pub fn verify_file(path: &Path) -> VerifyReport {
    match inspect(path) {
        Ok(report) => report,
        Err(e) => VerifyReport {
            path: path.to_path_buf(),
            issues: vec![format!("cannot read file: {}", e)],
            ..Default::default()
        },
    }
}

/// List files with the given extension directly inside a directory, sorted by name
pub fn parquet_files(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| ConvertError::io(dir, e))? {
        let path = entry.map_err(|e| ConvertError::io(dir, e))?.path();
        let is_parquet = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case(extension));
        if path.is_file() && is_parquet {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn inspect(path: &Path) -> Result<VerifyReport> {
    let file = File::open(path).map_err(|e| ConvertError::io(path, e))?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let kind = detect_kind(builder.schema());
    let reader = builder.build()?;

    let mut report = VerifyReport {
        path: path.to_path_buf(),
        kind,
        ..Default::default()
    };

    let Some(kind) = kind else {
        report
            .issues
            .push("schema matches neither the minute nor the tick layout".to_string());
        return Ok(report);
    };

    report.columns = price_columns(kind).iter().copied().map(ColumnRange::new).collect();

    let mut last_ts: Option<i64> = None;
    let mut min_ts: Option<i64> = None;
    let mut max_ts: Option<i64> = None;
    let mut seen: HashSet<Vec<Option<u64>>> = HashSet::new();

    for batch in reader {
        let batch = batch?;
        report.rows += batch.num_rows();
        report.null_values += batch.columns().iter().map(|c| c.null_count()).sum::<usize>();

        let timestamps = column::<TimestampMicrosecondArray>(&batch, "timestamp")?;
        let price_arrays = price_columns(kind)
            .iter()
            .map(|name| column::<Float64Array>(&batch, name))
            .collect::<Result<Vec<_>>>()?;
        let volumes = column::<Int64Array>(&batch, "volume")?;

        for row in 0..batch.num_rows() {
            // Row key over every column, nulls included, for duplicate detection
            let mut key = Vec::with_capacity(price_arrays.len() + 2);

            let ts = timestamps.is_valid(row).then(|| timestamps.value(row));
            if let Some(ts) = ts {
                if last_ts.is_some_and(|prev| ts < prev) {
                    report.out_of_order += 1;
                }
                last_ts = Some(ts);
                min_ts = Some(min_ts.map_or(ts, |m| m.min(ts)));
                max_ts = Some(max_ts.map_or(ts, |m| m.max(ts)));
            }
            key.push(ts.map(|t| t as u64));

            for (range, prices) in report.columns.iter_mut().zip(&price_arrays) {
                let price = prices.is_valid(row).then(|| prices.value(row));
                if let Some(price) = price {
                    range.include(price);
                }
                key.push(price.map(f64::to_bits));
            }

            let volume = volumes.is_valid(row).then(|| volumes.value(row));
            if let Some(volume) = volume {
                if volume < 0 {
                    report.negative_volumes += 1;
                }
                report.total_volume = report.total_volume.saturating_add(volume);
            }
            key.push(volume.map(|v| v as u64));

            if !seen.insert(key) {
                report.duplicate_rows += 1;
            }
        }
    }

    report.min_price = report.columns.iter().filter_map(|c| c.min).reduce(f64::min);
    report.max_price = report.columns.iter().filter_map(|c| c.max).reduce(f64::max);
    report.first_timestamp = min_ts.and_then(DateTime::from_timestamp_micros);
    report.last_timestamp = max_ts.and_then(DateTime::from_timestamp_micros);

    if report.negative_volumes > 0 {
        report
            .issues
            .push(format!("{} negative volume values", report.negative_volumes));
    }
    if report.null_values > 0 {
        report
            .warnings
            .push(format!("{} null values", report.null_values));
    }
    if report.duplicate_rows > 0 {
        report
            .warnings
            .push(format!("{} duplicate rows", report.duplicate_rows));
    }
    if report.out_of_order > 0 {
        report.warnings.push(format!(
            "{} rows are earlier than the row before them",
            report.out_of_order
        ));
    }

    Ok(report)
}

fn column<'a, T: Array + 'static>(batch: &'a RecordBatch, name: &str) -> Result<&'a T> {
    batch
        .column_by_name(name)
        .and_then(|c| c.as_any().downcast_ref::<T>())
        .ok_or_else(|| ConvertError::Schema(format!("column '{}' is missing or mistyped", name)))
}
