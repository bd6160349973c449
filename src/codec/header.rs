//! NCD file header

use crate::record::RecordKind;

/// File magic
pub const MAGIC: [u8; 4] = *b"NCDF";
/// Only supported layout version
pub const VERSION: u16 = 1;
/// Header size in bytes
pub const HEADER_LEN: usize = 16;

const KIND_MINUTE: u8 = 0;
const KIND_TICK: u8 = 1;

/// Parsed file header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub version: u16,
    pub kind: RecordKind,
}

impl Header {
    pub fn new(kind: RecordKind) -> Self {
        Self {
            version: VERSION,
            kind,
        }
    }

    /// Parse and sanity-check a header, returning a description on failure
    pub fn parse(buf: &[u8; HEADER_LEN]) -> Result<Self, String> {
        if buf[0..4] != MAGIC {
            return Err(format!(
                "bad magic {:02x?}, expected {:02x?}",
                &buf[0..4],
                MAGIC
            ));
        }

        let version = u16::from_le_bytes([buf[4], buf[5]]);
        if version != VERSION {
            return Err(format!("unsupported version {}", version));
        }

        let kind = match buf[6] {
            KIND_MINUTE => RecordKind::Minute,
            KIND_TICK => RecordKind::Tick,
            other => return Err(format!("unknown record kind tag {}", other)),
        };

        if buf[7] != 0 {
            return Err(format!("reserved header byte is {}, expected 0", buf[7]));
        }

        Ok(Self { version, kind })
    }

    pub fn encode(&self) -> [u8; HEADER_LEN] {
        let mut buf = [0u8; HEADER_LEN];
        buf[0..4].copy_from_slice(&MAGIC);
        buf[4..6].copy_from_slice(&self.version.to_le_bytes());
        buf[6] = match self.kind {
            RecordKind::Minute => KIND_MINUTE,
            RecordKind::Tick => KIND_TICK,
        };
        buf
    }
}
