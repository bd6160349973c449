//! Output schemas

use crate::record::RecordKind;
use arrow::datatypes::{DataType, Field, Schema, TimeUnit};

/// Timezone stamped on the timestamp column
pub const TIMESTAMP_TZ: &str = "UTC";

fn timestamp_field() -> Field {
    Field::new(
        "timestamp",
        DataType::Timestamp(TimeUnit::Microsecond, Some(TIMESTAMP_TZ.into())),
        false,
    )
}

fn price_field(name: &str) -> Field {
    Field::new(name, DataType::Float64, false)
}

fn volume_field() -> Field {
    Field::new("volume", DataType::Int64, false)
}

/// Minute bar schema: timestamp, open, high, low, close, volume
pub fn minute_schema() -> Schema {
    Schema::new(vec![
        timestamp_field(),
        price_field("open"),
        price_field("high"),
        price_field("low"),
        price_field("close"),
        volume_field(),
    ])
}

/// Tick schema: timestamp, price, bid, ask, volume
pub fn tick_schema() -> Schema {
    Schema::new(vec![
        timestamp_field(),
        price_field("price"),
        price_field("bid"),
        price_field("ask"),
        volume_field(),
    ])
}

pub fn schema_for(kind: RecordKind) -> Schema {
    match kind {
        RecordKind::Minute => minute_schema(),
        RecordKind::Tick => tick_schema(),
    }
}

/// Price-valued columns of a kind
pub fn price_columns(kind: RecordKind) -> &'static [&'static str] {
    match kind {
        RecordKind::Minute => &["open", "high", "low", "close"],
        RecordKind::Tick => &["price", "bid", "ask"],
    }
}

/// Identify which record kind a schema was written for
///
/// Field names and data types must match exactly; nullability is ignored.
pub fn detect_kind(schema: &Schema) -> Option<RecordKind> {
    [RecordKind::Minute, RecordKind::Tick]
        .into_iter()
        .find(|kind| {
            let expected = schema_for(*kind);
            expected.fields().len() == schema.fields().len()
                && expected
                    .fields()
                    .iter()
                    .zip(schema.fields().iter())
                    .all(|(a, b)| a.name() == b.name() && a.data_type() == b.data_type())
        })
}
