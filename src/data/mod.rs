//! Columnar output
//!
//! Parquet schemas, the column writer, and read-back verification

mod parquet;
mod schema;
mod verify;

pub use self::parquet::ParquetWriter;
pub use schema::{detect_kind, minute_schema, price_columns, schema_for, tick_schema};
pub use verify::{parquet_files, verify_file, ColumnRange, VerifyReport};
