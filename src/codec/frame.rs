//! Forward-only frame reader shared by the decode adapters

use super::header::{Header, HEADER_LEN};
use crate::error::{ConvertError, Result};
use crate::record::RecordKind;
use chrono::{DateTime, Utc};
use std::fs::File;
use std::io::{BufReader, ErrorKind, Read};
use std::path::{Path, PathBuf};

/// Reads the header and then fixed-size frames from a source file
///
/// Exhaustion is decided from the file length captured at open, so checking
/// it never touches the disk.
pub(crate) struct FrameReader {
    path: PathBuf,
    reader: BufReader<File>,
    offset: u64,
    len: u64,
}

impl FrameReader {
    /// Open a file and validate its header against the expected kind
    pub fn open(path: &Path, kind: RecordKind) -> Result<Self> {
        let file = File::open(path).map_err(|e| ConvertError::io(path, e))?;
        let len = file
            .metadata()
            .map_err(|e| ConvertError::io(path, e))?
            .len();

        let mut reader = Self {
            path: path.to_path_buf(),
            reader: BufReader::with_capacity(64 * 1024, file),
            offset: 0,
            len,
        };
        reader.read_header(kind)?;
        Ok(reader)
    }

    fn read_header(&mut self, kind: RecordKind) -> Result<()> {
        if self.len < HEADER_LEN as u64 {
            return Err(ConvertError::format(
                &self.path,
                0,
                format!(
                    "file is {} bytes, shorter than the {}-byte header",
                    self.len, HEADER_LEN
                ),
            ));
        }

        let (_, buf) = self.read_frame::<HEADER_LEN>()?;
        let header = Header::parse(&buf).map_err(|d| ConvertError::format(&self.path, 0, d))?;

        if header.kind != kind {
            return Err(ConvertError::format(
                &self.path,
                6,
                format!(
                    "header declares {} records but the file was classified as {}",
                    header.kind, kind
                ),
            ));
        }

        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_exhausted(&self) -> bool {
        self.offset >= self.len
    }

    /// Read the next `N` bytes, returning them with their starting offset
    pub fn read_frame<const N: usize>(&mut self) -> Result<(u64, [u8; N])> {
        let start = self.offset;
        if self.len.saturating_sub(start) < N as u64 {
            return Err(ConvertError::Truncated {
                path: self.path.clone(),
                offset: start,
            });
        }

        let mut buf = [0u8; N];
        self.reader.read_exact(&mut buf).map_err(|e| {
            if e.kind() == ErrorKind::UnexpectedEof {
                ConvertError::Truncated {
                    path: self.path.clone(),
                    offset: start,
                }
            } else {
                ConvertError::io(&self.path, e)
            }
        })?;
        self.offset += N as u64;

        Ok((start, buf))
    }
}

/// Little-endian field cursor over one frame
pub(crate) struct Fields<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Fields<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn take8(&mut self) -> [u8; 8] {
        let mut out = [0u8; 8];
        out.copy_from_slice(&self.buf[self.pos..self.pos + 8]);
        self.pos += 8;
        out
    }

    pub fn i64(&mut self) -> i64 {
        i64::from_le_bytes(self.take8())
    }

    pub fn f64(&mut self) -> f64 {
        f64::from_le_bytes(self.take8())
    }
}

/// Validates decoded field values, producing format errors at a frame offset
pub(crate) struct FrameCheck<'a> {
    pub path: &'a Path,
    pub offset: u64,
}

impl FrameCheck<'_> {
    pub fn timestamp(&self, micros: i64) -> Result<DateTime<Utc>> {
        DateTime::from_timestamp_micros(micros).ok_or_else(|| {
            ConvertError::format(
                self.path,
                self.offset,
                format!("timestamp {} is out of range", micros),
            )
        })
    }

    pub fn price(&self, field: &str, value: f64) -> Result<f64> {
        if value.is_finite() {
            Ok(value)
        } else {
            Err(ConvertError::format(
                self.path,
                self.offset,
                format!("{} is not finite ({})", field, value),
            ))
        }
    }

    pub fn volume(&self, value: i64) -> Result<i64> {
        if value >= 0 {
            Ok(value)
        } else {
            Err(ConvertError::format(
                self.path,
                self.offset,
                format!("negative volume {}", value),
            ))
        }
    }

    pub fn fail(&self, detail: impl Into<String>) -> ConvertError {
        ConvertError::format(self.path, self.offset, detail)
    }
}
