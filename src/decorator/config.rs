//! Profile configuration captured when a callable is decorated.

use crate::stats::SortBy;
use crate::utils::config::{DEFAULT_EXTENSION, JSON_EXTENSION};
use std::path::{Path, PathBuf};

/// Report file format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportFormat {
    /// Human-readable table, one frame per line
    #[default]
    Text,
    /// Versioned JSON document
    Json,
}

impl ReportFormat {
    /// Extension of default output files in this format
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Text => DEFAULT_EXTENSION,
            ReportFormat::Json => JSON_EXTENSION,
        }
    }
}

/// Options for a profiled callable
///
/// **Public** - built once, passed by value to `decorate`
///
/// # Example
/// ```ignore
/// let config = ProfileConfig::new()
///     .with_sort_by(["calls", "cumulative"])
///     .with_lines_to_print(10)
///     .with_strip_dirs(true);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileConfig {
    /// Report path; `None` writes `<target name>.<extension>` to the current directory
    pub output_file: Option<PathBuf>,

    /// Sort criteria
    pub sort_by: SortBy,

    /// Maximum number of statistic lines; `None` prints all of them
    pub lines_to_print: Option<usize>,

    /// Remove directory prefixes from file names in the report
    pub strip_dirs: bool,

    /// Report format
    pub format: ReportFormat,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            output_file: None,
            sort_by: SortBy::default(),
            lines_to_print: None,
            strip_dirs: false,
            format: ReportFormat::Text,
        }
    }
}

impl ProfileConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_output_file(mut self, output_file: impl Into<PathBuf>) -> Self {
        self.output_file = Some(output_file.into());
        self
    }

    pub fn with_sort_by(mut self, sort_by: impl Into<SortBy>) -> Self {
        self.sort_by = sort_by.into();
        self
    }

    pub fn with_lines_to_print(mut self, lines: usize) -> Self {
        self.lines_to_print = Some(lines);
        self
    }

    pub fn with_strip_dirs(mut self, strip_dirs: bool) -> Self {
        self.strip_dirs = strip_dirs;
        self
    }

    pub fn with_format(mut self, format: ReportFormat) -> Self {
        self.format = format;
        self
    }
}

/// Path a report for `target_name` is written to
///
/// **Public** - the explicit output file wins, otherwise the target name
/// plus the format's extension
pub fn derive_output_path(
    output_file: Option<&Path>,
    target_name: &str,
    format: ReportFormat,
) -> PathBuf {
    match output_file {
        Some(path) => path.to_path_buf(),
        None => PathBuf::from(format!("{}.{}", target_name, format.extension())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::SortKey;

    #[test]
    fn test_defaults() {
        let config = ProfileConfig::default();
        assert_eq!(config.output_file, None);
        assert_eq!(config.sort_by.resolve().unwrap(), vec![SortKey::Cumulative]);
        assert_eq!(config.lines_to_print, None);
        assert!(!config.strip_dirs);
        assert_eq!(config.format, ReportFormat::Text);
    }

    #[test]
    fn test_builder() {
        let config = ProfileConfig::new()
            .with_output_file("out/report.txt")
            .with_sort_by(vec![SortKey::Calls, SortKey::Time])
            .with_lines_to_print(5)
            .with_strip_dirs(true)
            .with_format(ReportFormat::Json);

        assert_eq!(config.output_file, Some(PathBuf::from("out/report.txt")));
        assert_eq!(
            config.sort_by.resolve().unwrap(),
            vec![SortKey::Calls, SortKey::Time]
        );
        assert_eq!(config.lines_to_print, Some(5));
        assert!(config.strip_dirs);
    }

    #[test]
    fn test_derive_output_path() {
        assert_eq!(
            derive_output_path(None, "product_counter_v1", ReportFormat::Text),
            PathBuf::from("product_counter_v1.prof")
        );
        assert_eq!(
            derive_output_path(None, "Inventory.restock", ReportFormat::Json),
            PathBuf::from("Inventory.restock.prof.json")
        );
        assert_eq!(
            derive_output_path(Some(Path::new("custom.txt")), "ignored", ReportFormat::Json),
            PathBuf::from("custom.txt")
        );
    }
}
