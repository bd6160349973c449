//! Typed column accumulation
//!
//! Records are appended in decode order into parallel vectors, one per
//! field. Index `i` across every vector describes the `i`-th record.

use crate::error::{ConvertError, Result};
use crate::record::{MinuteBar, Record, RecordKind, TickQuote};

/// Minute bar columns; timestamps are epoch microseconds
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MinuteColumns {
    pub timestamp: Vec<i64>,
    pub open: Vec<f64>,
    pub high: Vec<f64>,
    pub low: Vec<f64>,
    pub close: Vec<f64>,
    pub volume: Vec<i64>,
}

impl MinuteColumns {
    fn push(&mut self, bar: &MinuteBar) {
        self.timestamp.push(bar.timestamp.timestamp_micros());
        self.open.push(bar.open);
        self.high.push(bar.high);
        self.low.push(bar.low);
        self.close.push(bar.close);
        self.volume.push(bar.volume);
    }

    fn lengths(&self) -> [(&'static str, usize); 6] {
        [
            ("timestamp", self.timestamp.len()),
            ("open", self.open.len()),
            ("high", self.high.len()),
            ("low", self.low.len()),
            ("close", self.close.len()),
            ("volume", self.volume.len()),
        ]
    }
}

/// Tick columns; timestamps are epoch microseconds
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickColumns {
    pub timestamp: Vec<i64>,
    pub price: Vec<f64>,
    pub bid: Vec<f64>,
    pub ask: Vec<f64>,
    pub volume: Vec<i64>,
}

impl TickColumns {
    fn push(&mut self, tick: &TickQuote) {
        self.timestamp.push(tick.timestamp.timestamp_micros());
        self.price.push(tick.price);
        self.bid.push(tick.bid);
        self.ask.push(tick.ask);
        self.volume.push(tick.volume);
    }

    fn lengths(&self) -> [(&'static str, usize); 5] {
        [
            ("timestamp", self.timestamp.len()),
            ("price", self.price.len()),
            ("bid", self.bid.len()),
            ("ask", self.ask.len()),
            ("volume", self.volume.len()),
        ]
    }
}

/// Columns of a single record kind
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnSet {
    Minute(MinuteColumns),
    Tick(TickColumns),
}

impl ColumnSet {
    /// Empty column set for a kind
    pub fn empty(kind: RecordKind) -> Self {
        match kind {
            RecordKind::Minute => ColumnSet::Minute(MinuteColumns::default()),
            RecordKind::Tick => ColumnSet::Tick(TickColumns::default()),
        }
    }

    pub fn kind(&self) -> RecordKind {
        match self {
            ColumnSet::Minute(_) => RecordKind::Minute,
            ColumnSet::Tick(_) => RecordKind::Tick,
        }
    }

    /// Row count, taken from the timestamp column
    pub fn len(&self) -> usize {
        match self {
            ColumnSet::Minute(c) => c.timestamp.len(),
            ColumnSet::Tick(c) => c.timestamp.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check that every column has the same length
    pub fn validate(&self) -> Result<usize> {
        let lengths: Vec<(&str, usize)> = match self {
            ColumnSet::Minute(c) => c.lengths().to_vec(),
            ColumnSet::Tick(c) => c.lengths().to_vec(),
        };

        let rows = self.len();
        match lengths.iter().find(|(_, len)| *len != rows) {
            Some((name, len)) => Err(ConvertError::Schema(format!(
                "{} column '{}' has {} values, timestamp has {}",
                self.kind(),
                name,
                len,
                rows
            ))),
            None => Ok(rows),
        }
    }
}

/// Accumulates records of one configured kind
#[derive(Debug)]
pub struct ColumnBuffer {
    columns: ColumnSet,
}

impl ColumnBuffer {
    pub fn new(kind: RecordKind) -> Self {
        Self {
            columns: ColumnSet::empty(kind),
        }
    }

    pub fn kind(&self) -> RecordKind {
        self.columns.kind()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Append a record; the buffer is left untouched on a kind mismatch
    pub fn append(&mut self, record: Record) -> Result<()> {
        match (&mut self.columns, &record) {
            (ColumnSet::Minute(cols), Record::Minute(bar)) => cols.push(bar),
            (ColumnSet::Tick(cols), Record::Tick(tick)) => cols.push(tick),
            (cols, record) => {
                return Err(ConvertError::KindMismatch {
                    expected: cols.kind(),
                    found: record.kind(),
                })
            }
        }
        Ok(())
    }

    /// Take the accumulated columns, leaving the buffer empty
    pub fn drain(&mut self) -> ColumnSet {
        let kind = self.kind();
        std::mem::replace(&mut self.columns, ColumnSet::empty(kind))
    }
}
