//! Output module for harvest results
//!
//! This module handles:
//! - Writing the newline-joined corpus to a file
//! - Computing and printing harvest statistics

pub mod stats;

pub use stats::{print_statistics, HarvestStatistics};

use crate::harvest::HarvestReport;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output to {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Writes a report's corpus to `output_path`
///
/// Missing parent directories are created. The file ends with a trailing
/// newline unless the corpus is empty.
///
/// # Arguments
///
/// * `report` - The finished harvest session
/// * `output_path` - Destination file, overwritten if present
pub fn write_corpus(report: &HarvestReport, output_path: &Path) -> OutputResult<()> {
    let to_error = |source: std::io::Error| OutputError::Write {
        path: output_path.display().to_string(),
        source,
    };

    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(to_error)?;
    }

    let mut file = File::create(output_path).map_err(to_error)?;
    file.write_all(report.corpus.as_bytes()).map_err(to_error)?;
    if !report.corpus.is_empty() {
        file.write_all(b"\n").map_err(to_error)?;
    }

    tracing::info!(
        "Wrote {} blocks ({} bytes) to {}",
        report.blocks.len(),
        report.corpus.len(),
        output_path.display()
    );
    Ok(())
}
