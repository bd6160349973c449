//! Shared fixtures for writing source files

use chrono::{DateTime, Utc};
use ncd_convert::codec::NcdWriter;
use ncd_convert::record::{MinuteBar, Record, RecordKind, TickQuote};
use std::fs;
use std::path::{Path, PathBuf};

pub const BASE_TS: i64 = 1_735_689_600;

pub fn ts(minute: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(BASE_TS + minute * 60, 0).unwrap()
}

pub fn minute_bar(i: i64) -> MinuteBar {
    let open = 5_000.0 + i as f64;
    MinuteBar {
        timestamp: ts(i),
        open,
        high: open + 2.0,
        low: open - 1.0,
        close: open + 0.5,
        volume: 100 + i,
    }
}

pub fn tick_quote(i: i64) -> TickQuote {
    let price = 20_000.0 + i as f64 * 0.25;
    TickQuote {
        timestamp: ts(i),
        price,
        bid: price - 0.25,
        ask: price + 0.25,
        volume: 1 + i,
    }
}

/// Write a source file of `count` generated records, creating parent dirs
pub fn write_source(path: &Path, kind: RecordKind, count: i64) -> PathBuf {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let mut writer = NcdWriter::create(path, kind).unwrap();
    for i in 0..count {
        let record: Record = match kind {
            RecordKind::Minute => minute_bar(i).into(),
            RecordKind::Tick => tick_quote(i).into(),
        };
        writer.write_record(&record).unwrap();
    }
    writer.finish().unwrap();
    path.to_path_buf()
}

/// Write raw bytes, creating parent dirs
pub fn write_raw(path: &Path, bytes: &[u8]) -> PathBuf {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, bytes).unwrap();
    path.to_path_buf()
}
