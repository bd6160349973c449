//! ncd-convert: Batch converter from NCD market-data files to Parquet
//!
//! This library provides the core components for:
//! - Path-based classification of minute and tick files
//! - Frame decoding and validation of NCD records
//! - Columnar buffering of decoded records
//! - Atomic Parquet writing with a fixed per-kind schema
//! - Sequential batch conversion with per-file outcomes and progress
//! - Verification of converted Parquet files

pub mod cli;
pub mod codec;
pub mod columns;
pub mod config;
pub mod convert;
pub mod data;
pub mod error;
pub mod record;
pub mod telemetry;
