//! NCD encoder
//!
//! Writes the same layout the decode adapters read. Values are written as
//! given, without the validation the decoders apply.

use super::header::Header;
use crate::record::{Record, RecordKind};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Writes a header followed by fixed-size frames
pub struct NcdWriter<W: Write> {
    inner: W,
    kind: RecordKind,
    records: usize,
}

impl NcdWriter<BufWriter<File>> {
    /// Create (or truncate) a file and write its header
    pub fn create(path: &Path, kind: RecordKind) -> io::Result<Self> {
        Self::new(BufWriter::new(File::create(path)?), kind)
    }
}

impl<W: Write> NcdWriter<W> {
    pub fn new(mut inner: W, kind: RecordKind) -> io::Result<Self> {
        inner.write_all(&Header::new(kind).encode())?;
        Ok(Self {
            inner,
            kind,
            records: 0,
        })
    }

    /// Append one record; it must match the writer's kind
    pub fn write_record(&mut self, record: &Record) -> io::Result<()> {
        match (self.kind, record) {
            (RecordKind::Minute, Record::Minute(bar)) => {
                self.inner.write_all(&bar.timestamp.timestamp_micros().to_le_bytes())?;
                for v in [bar.open, bar.high, bar.low, bar.close] {
                    self.inner.write_all(&v.to_le_bytes())?;
                }
                self.inner.write_all(&bar.volume.to_le_bytes())?;
            }
            (RecordKind::Tick, Record::Tick(tick)) => {
                self.inner
                    .write_all(&tick.timestamp.timestamp_micros().to_le_bytes())?;
                for v in [tick.price, tick.bid, tick.ask] {
                    self.inner.write_all(&v.to_le_bytes())?;
                }
                self.inner.write_all(&tick.volume.to_le_bytes())?;
            }
            (kind, record) => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("cannot write a {} record to a {} file", record.kind(), kind),
                ));
            }
        }
        self.records += 1;
        Ok(())
    }

    pub fn records_written(&self) -> usize {
        self.records
    }

    /// Flush and return the underlying writer
    pub fn finish(mut self) -> io::Result<W> {
        self.inner.flush()?;
        Ok(self.inner)
    }
}
