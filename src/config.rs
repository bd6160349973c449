//! Configuration types for ncd-convert

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub convert: ConvertConfig,
    #[serde(default)]
    pub writer: WriterConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Batch conversion configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConvertConfig {
    /// Base directory that relative input paths are resolved against
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_dir: Option<PathBuf>,

    /// Output directory used when `--output` is not given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,

    /// Extension of the written files
    #[serde(default = "default_extension")]
    pub extension: String,
}

fn default_extension() -> String {
    "parquet".to_string()
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            source_dir: None,
            output_dir: None,
            extension: default_extension(),
        }
    }
}

/// Parquet compression codec
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CompressionCodec {
    #[default]
    Snappy,
    Zstd,
    None,
}

/// Parquet writer configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WriterConfig {
    #[serde(default)]
    pub compression: CompressionCodec,

    /// Maximum rows per row group
    #[serde(default = "default_max_row_group_size")]
    pub max_row_group_size: usize,
}

fn default_max_row_group_size() -> usize {
    1024 * 1024
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            compression: CompressionCodec::default(),
            max_row_group_size: default_max_row_group_size(),
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable format
    #[default]
    Pretty,
    /// JSON format for log aggregation
    Json,
}

/// Telemetry configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub log_format: LogFormat,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: LogFormat::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}
