//! Parquet column writer

use super::schema::schema_for;
use crate::columns::ColumnSet;
use crate::config::{CompressionCodec, WriterConfig};
use crate::error::{ConvertError, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array, TimestampMicrosecondArray};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::{Compression, ZstdLevel};
use parquet::file::properties::WriterProperties;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Writes one column set per output file
///
/// Output is written to a hidden sibling file and renamed into place, so the
/// target path only ever holds a complete file.
#[derive(Debug, Clone, Default)]
pub struct ParquetWriter {
    config: WriterConfig,
}

impl ParquetWriter {
    pub fn new(config: WriterConfig) -> Self {
        Self { config }
    }

    fn properties(&self) -> WriterProperties {
        let compression = match self.config.compression {
            CompressionCodec::Snappy => Compression::SNAPPY,
            CompressionCodec::Zstd => Compression::ZSTD(ZstdLevel::default()),
            CompressionCodec::None => Compression::UNCOMPRESSED,
        };

        WriterProperties::builder()
            .set_compression(compression)
            .set_max_row_group_size(self.config.max_row_group_size.max(1))
            .build()
    }

    /// Write a column set to `path`, overwriting any existing file
    ///
    /// Returns the number of rows written.
    pub fn write(&self, columns: ColumnSet, path: &Path) -> Result<usize> {
        let rows = columns.validate()?;
        let batch = to_record_batch(columns)?;

        let partial = partial_path(path);
        let written = self
            .write_file(&partial, &batch)
            .and_then(|()| fs::rename(&partial, path).map_err(|e| ConvertError::io(path, e)));

        if let Err(e) = written {
            if partial.exists() {
                if let Err(cleanup) = fs::remove_file(&partial) {
                    tracing::warn!(
                        path = ?partial,
                        error = %cleanup,
                        "Failed to remove partial output"
                    );
                }
            }
            return Err(e);
        }

        tracing::debug!(path = ?path, rows, "Wrote Parquet file");

        Ok(rows)
    }

    fn write_file(&self, path: &Path, batch: &RecordBatch) -> Result<()> {
        let file = File::create(path).map_err(|e| ConvertError::io(path, e))?;
        let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(self.properties()))?;

        if batch.num_rows() > 0 {
            writer.write(batch)?;
        }
        writer.close()?;

        Ok(())
    }
}

/// Temporary path next to the final output
fn partial_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{}.partial", name))
}

fn to_record_batch(columns: ColumnSet) -> Result<RecordBatch> {
    let schema = Arc::new(schema_for(columns.kind()));

    let arrays: Vec<ArrayRef> = match columns {
        ColumnSet::Minute(c) => vec![
            Arc::new(TimestampMicrosecondArray::from(c.timestamp).with_timezone("UTC")),
            Arc::new(Float64Array::from(c.open)),
            Arc::new(Float64Array::from(c.high)),
            Arc::new(Float64Array::from(c.low)),
            Arc::new(Float64Array::from(c.close)),
            Arc::new(Int64Array::from(c.volume)),
        ],
        ColumnSet::Tick(c) => vec![
            Arc::new(TimestampMicrosecondArray::from(c.timestamp).with_timezone("UTC")),
            Arc::new(Float64Array::from(c.price)),
            Arc::new(Float64Array::from(c.bid)),
            Arc::new(Float64Array::from(c.ask)),
            Arc::new(Int64Array::from(c.volume)),
        ],
    };

    Ok(RecordBatch::try_new(schema, arrays)?)
}
