//! Convert command implementation

use super::OutputFormat;
use crate::config::Config;
use crate::convert::{BatchConverter, BatchEvent, ConvertOptions};
use crate::record::{RecordKind, SourceFile};
use anyhow::{bail, Context};
use clap::Args;
use std::fs;
use std::path::{Path, PathBuf};

/// Source file extension picked up when an input is a directory
const SOURCE_EXTENSION: &str = "ncd";

#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// NCD files, or directories to search for NCD files
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Output directory for Parquet files (must exist)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Convert every input as this kind instead of inferring it from the path
    #[arg(long, value_enum)]
    pub kind: Option<RecordKind>,

    /// Summary format
    #[arg(long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

impl ConvertArgs {
    /// Run the batch; returns whether every file converted
    pub async fn execute(&self, config: &Config) -> anyhow::Result<bool> {
        let output_dir = self
            .output
            .clone()
            .or_else(|| config.convert.output_dir.clone())
            .context("no output directory: pass --output or set convert.output_dir")?;
        if !output_dir.is_dir() {
            bail!("output directory {:?} does not exist", output_dir);
        }

        let paths = resolve_inputs(&self.inputs, config.convert.source_dir.as_deref())?;
        if paths.is_empty() {
            bail!("no .{} files found in the given inputs", SOURCE_EXTENSION);
        }

        let files: Vec<SourceFile> = paths
            .into_iter()
            .map(|path| match self.kind {
                Some(kind) => SourceFile::with_kind(path, kind),
                None => SourceFile::new(path),
            })
            .collect();

        let converter =
            BatchConverter::new(files, output_dir, ConvertOptions::from_config(config));
        let mut handle = converter.spawn();

        let cancel = handle.cancellation();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("Interrupt received, stopping after the current file");
                cancel.cancel();
            }
        });

        while let Some(event) = handle.next_event().await {
            match event {
                BatchEvent::Started { batch_id, total } => {
                    tracing::info!(%batch_id, total, "Converting files");
                }
                BatchEvent::Progress(progress) => {
                    if self.format == OutputFormat::Table {
                        println!("{:>5.1}% {}", progress.percent, progress.message);
                    }
                }
                BatchEvent::Completed(_) => {}
            }
        }

        let summary = handle.join().await?;
        match self.format {
            OutputFormat::Table => println!("{}", summary.format_table()),
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        }

        Ok(summary.all_succeeded())
    }
}

/// Expand command-line inputs into source file paths
///
/// Relative paths that do not exist are looked up under `source_dir`.
/// Directories expand to the `.ncd` files beneath them, sorted. Other paths
/// are passed through as given, so a missing file becomes a failed outcome
/// rather than aborting the batch.
pub fn resolve_inputs(
    inputs: &[PathBuf],
    source_dir: Option<&Path>,
) -> anyhow::Result<Vec<PathBuf>> {
    let mut paths = Vec::new();

    for input in inputs {
        let path = match source_dir {
            Some(base) if input.is_relative() && !input.exists() => base.join(input),
            _ => input.clone(),
        };

        if path.is_dir() {
            let mut found = Vec::new();
            collect_sources(&path, &mut found)
                .with_context(|| format!("failed to list {:?}", path))?;
            found.sort();
            tracing::debug!(dir = ?path, files = found.len(), "Expanded input directory");
            paths.extend(found);
        } else {
            paths.push(path);
        }
    }

    Ok(paths)
}

fn collect_sources(dir: &Path, out: &mut Vec<PathBuf>) -> std::io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        // file_type does not follow symlinks, so linked directories are skipped
        if entry.file_type()?.is_dir() {
            collect_sources(&path, out)?;
        } else if path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case(SOURCE_EXTENSION))
        {
            out.push(path);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_directory_expands_recursively() {
        let dir = TempDir::new().unwrap();
        let minute = dir.path().join("minute").join("ES 03-25");
        fs::create_dir_all(&minute).unwrap();
        fs::write(minute.join("20250102.ncd"), b"").unwrap();
        fs::write(minute.join("20250101.NCD"), b"").unwrap();
        fs::write(minute.join("readme.txt"), b"").unwrap();

        let paths = resolve_inputs(&[dir.path().to_path_buf()], None).unwrap();
        assert_eq!(
            paths,
            vec![minute.join("20250101.NCD"), minute.join("20250102.ncd")]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_directory_not_followed() {
        let dir = TempDir::new().unwrap();
        let minute = dir.path().join("minute");
        fs::create_dir_all(&minute).unwrap();
        fs::write(minute.join("ES.ncd"), b"").unwrap();
        std::os::unix::fs::symlink(dir.path(), minute.join("loop")).unwrap();

        let paths = resolve_inputs(&[dir.path().to_path_buf()], None).unwrap();
        assert_eq!(paths, vec![minute.join("ES.ncd")]);
    }

    #[test]
    fn test_relative_input_resolved_against_source_dir() {
        let dir = TempDir::new().unwrap();
        let tick = dir.path().join("tick");
        fs::create_dir_all(&tick).unwrap();
        fs::write(tick.join("NQ.ncd"), b"").unwrap();

        let rel = PathBuf::from("tick/NQ.ncd");
        let paths = resolve_inputs(&[rel], Some(dir.path())).unwrap();
        assert_eq!(paths, vec![tick.join("NQ.ncd")]);
    }

    #[test]
    fn test_missing_file_passed_through() {
        let missing = PathBuf::from("/nonexistent/minute/ES.ncd");
        let paths = resolve_inputs(&[missing.clone()], None).unwrap();
        assert_eq!(paths, vec![missing]);
    }

    #[test]
    fn test_input_order_preserved() {
        let inputs = vec![PathBuf::from("/x/b.ncd"), PathBuf::from("/x/a.ncd")];
        assert_eq!(resolve_inputs(&inputs, None).unwrap(), inputs);
    }
}
