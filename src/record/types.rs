//! Decoded record types

use super::RecordKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One OHLCV minute bar
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MinuteBar {
    /// Bar timestamp (microsecond precision)
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}

/// One trade with the prevailing quote
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TickQuote {
    /// Trade timestamp (microsecond precision)
    pub timestamp: DateTime<Utc>,
    /// Last traded price
    pub price: f64,
    pub bid: f64,
    pub ask: f64,
    pub volume: i64,
}

/// A decoded record from a source file
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Record {
    Minute(MinuteBar),
    Tick(TickQuote),
}

impl Record {
    /// Kind tag of this record
    pub fn kind(&self) -> RecordKind {
        match self {
            Record::Minute(_) => RecordKind::Minute,
            Record::Tick(_) => RecordKind::Tick,
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Record::Minute(bar) => bar.timestamp,
            Record::Tick(tick) => tick.timestamp,
        }
    }
}

impl From<MinuteBar> for Record {
    fn from(bar: MinuteBar) -> Self {
        Record::Minute(bar)
    }
}

impl From<TickQuote> for Record {
    fn from(tick: TickQuote) -> Self {
        Record::Tick(tick)
    }
}
