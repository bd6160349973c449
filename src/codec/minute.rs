//! Minute bar decode adapter

use super::frame::{Fields, FrameCheck, FrameReader};
use super::RecordCodec;
use crate::error::Result;
use crate::record::{MinuteBar, Record, RecordKind};
use std::path::Path;

/// Minute frame: timestamp, open, high, low, close, volume
pub const MINUTE_FRAME_LEN: usize = 48;

/// Decodes minute bar files
pub struct MinuteCodec {
    frames: FrameReader,
    records: usize,
}

impl MinuteCodec {
    fn decode(path: &Path, offset: u64, buf: &[u8; MINUTE_FRAME_LEN]) -> Result<MinuteBar> {
        let check = FrameCheck { path, offset };
        let mut f = Fields::new(buf);

        let timestamp = check.timestamp(f.i64())?;
        let open = check.price("open", f.f64())?;
        let high = check.price("high", f.f64())?;
        let low = check.price("low", f.f64())?;
        let close = check.price("close", f.f64())?;
        let volume = check.volume(f.i64())?;

        if high < low {
            return Err(check.fail(format!("high {} below low {}", high, low)));
        }

        Ok(MinuteBar {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        })
    }
}

impl RecordCodec for MinuteCodec {
    const KIND: RecordKind = RecordKind::Minute;

    fn open(path: &Path) -> Result<Self> {
        Ok(Self {
            frames: FrameReader::open(path, Self::KIND)?,
            records: 0,
        })
    }

    fn is_exhausted(&self) -> bool {
        self.frames.is_exhausted()
    }

    fn read_next(&mut self) -> Result<Record> {
        let (offset, buf) = self.frames.read_frame::<MINUTE_FRAME_LEN>()?;
        let bar = Self::decode(self.frames.path(), offset, &buf)?;
        self.records += 1;
        Ok(Record::Minute(bar))
    }

    fn records_read(&self) -> usize {
        self.records
    }

    fn path(&self) -> &Path {
        self.frames.path()
    }
}
