//! CLI interface for ncd-convert
//!
//! Provides subcommands for:
//! - `convert`: Convert NCD files to Parquet
//! - `verify`: Check converted Parquet files
//! - `classify`: Show how paths would be classified
//! - `config`: Show the effective configuration

mod classify;
mod convert;
mod verify;

pub use classify::ClassifyArgs;
pub use convert::{resolve_inputs, ConvertArgs};
pub use verify::VerifyArgs;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "ncd-convert")]
#[command(about = "Convert NCD market-data files (minute bars and ticks) to Parquet")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, default_value = "ncd-convert.toml")]
    pub config: String,

    /// Override the configured log level
    #[arg(long)]
    pub log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert NCD files to Parquet
    Convert(ConvertArgs),
    /// Verify converted Parquet files
    Verify(VerifyArgs),
    /// Show the record kind each path would be converted as
    Classify(ClassifyArgs),
    /// Show the effective configuration
    Config,
}

/// Report output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}
