//! Output writers for profile reports.
//!
//! This module handles writing reports to disk:
//! - Text reports (truncate-and-create)
//! - JSON reports, and reading them back

pub mod json;
pub mod text;

// Re-export main functions
pub use json::{read_json_report, write_json_report};
pub use text::write_report;

use crate::utils::error::OutputError;
use log::debug;
use std::path::Path;

/// Validate an output path and create its missing parent directories
///
/// **Private** - shared by the text and JSON writers
fn prepare_output_path(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }

    // Check if we're trying to overwrite a directory
    if path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            debug!("Creating parent directories: {}", parent.display());
            std::fs::create_dir_all(parent).map_err(|e| {
                OutputError::InvalidPath(format!(
                    "Cannot create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    Ok(())
}
