//! Classify command implementation

use crate::record::classify_with_reason;
use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct ClassifyArgs {
    /// Paths to classify
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,
}

impl ClassifyArgs {
    pub fn execute(&self) {
        for path in &self.paths {
            let c = classify_with_reason(path);
            let marker = if c.reason.is_fallback() { "?" } else { " " };
            println!(
                "{:<6}{} {:<34} {}",
                c.kind.as_str(),
                marker,
                c.reason.to_string(),
                path.display()
            );
        }
    }
}
