//! NCD record codecs
//!
//! Sequential, forward-only decoding of fixed-layout market-data files.
//! Each file starts with a 16-byte header (magic, version, kind tag) followed
//! by fixed-size little-endian frames until end of file.

mod encode;
mod frame;
mod header;
mod minute;
mod tick;

pub use encode::NcdWriter;
pub use header::{Header, HEADER_LEN, MAGIC, VERSION};
pub use minute::{MinuteCodec, MINUTE_FRAME_LEN};
pub use tick::{TickCodec, TICK_FRAME_LEN};

use crate::error::Result;
use crate::record::{Record, RecordKind};
use std::path::Path;

/// Per-kind decoder over one open source file
///
/// Callers check [`is_exhausted`](RecordCodec::is_exhausted) before every
/// [`read_next`](RecordCodec::read_next). Reading past the end yields a
/// truncation error.
pub trait RecordCodec: Sized {
    /// Kind of record this codec produces
    const KIND: RecordKind;

    /// Open a file and validate its header
    fn open(path: &Path) -> Result<Self>;

    /// True once every complete frame has been consumed
    fn is_exhausted(&self) -> bool;

    /// Decode the next frame
    fn read_next(&mut self) -> Result<Record>;

    /// Number of records decoded so far
    fn records_read(&self) -> usize;

    fn path(&self) -> &Path;
}
