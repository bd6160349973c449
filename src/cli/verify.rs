//! Verify command implementation

use super::OutputFormat;
use crate::config::Config;
use crate::data::{parquet_files, verify_file};
use anyhow::bail;
use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Parquet file, or directory of Parquet files
    pub path: PathBuf,

    /// Report format
    #[arg(long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

impl VerifyArgs {
    /// Verify every file; returns whether all passed
    ///
    /// Directories are searched for files with the configured output extension.
    pub async fn execute(&self, config: &Config) -> anyhow::Result<bool> {
        let files = if self.path.is_file() {
            vec![self.path.clone()]
        } else if self.path.is_dir() {
            parquet_files(&self.path, &config.convert.extension)?
        } else {
            bail!("path {:?} does not exist", self.path);
        };

        if files.is_empty() {
            println!(
                "No .{} files found in {}",
                config.convert.extension,
                self.path.display()
            );
            return Ok(false);
        }

        let reports: Vec<_> = files.iter().map(|f| verify_file(f)).collect();
        let passed = reports.iter().filter(|r| r.passed()).count();

        match self.format {
            OutputFormat::Table => {
                for report in &reports {
                    println!("{}", report.format_text());
                }
                println!("Total files: {}", reports.len());
                println!("Passed: {}", passed);
                println!("Failed: {}", reports.len() - passed);
            }
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&reports)?),
        }

        tracing::info!(files = reports.len(), passed, "Verification finished");

        Ok(passed == reports.len())
    }
}
