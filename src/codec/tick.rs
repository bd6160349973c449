//! Tick decode adapter

use super::frame::{Fields, FrameCheck, FrameReader};
use super::RecordCodec;
use crate::error::Result;
use crate::record::{Record, RecordKind, TickQuote};
use std::path::Path;

/// Tick frame: timestamp, price, bid, ask, volume
pub const TICK_FRAME_LEN: usize = 40;

/// Decodes tick files
pub struct TickCodec {
    frames: FrameReader,
    records: usize,
}

impl TickCodec {
    fn decode(path: &Path, offset: u64, buf: &[u8; TICK_FRAME_LEN]) -> Result<TickQuote> {
        let check = FrameCheck { path, offset };
        let mut f = Fields::new(buf);

        Ok(TickQuote {
            timestamp: check.timestamp(f.i64())?,
            price: check.price("price", f.f64())?,
            bid: check.price("bid", f.f64())?,
            ask: check.price("ask", f.f64())?,
            volume: check.volume(f.i64())?,
        })
    }
}

impl RecordCodec for TickCodec {
    const KIND: RecordKind = RecordKind::Tick;

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
        let (offset, buf) = self.frames.read_frame::<TICK_FRAME_LEN>()?;
        let tick = Self::decode(self.frames.path(), offset, &buf)?;
        self.records += 1;
        Ok(Record::Tick(tick))
    }

    fn records_read(&self) -> usize {
        self.records
    }

    fn path(&self) -> &Path {
        self.frames.path()
    }
}
