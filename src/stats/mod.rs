//! Profile statistics: the table, sort keys and report rendering.
//!
//! This module turns the raw timings of a profiling session into:
//! - A sortable statistics table with optional directory stripping
//! - A text report limited to a number of lines
//! - A JSON report

pub mod report;
pub mod sort_key;
pub mod table;

// Re-export main types and functions
pub use report::{render_text, visible_rows, CallerRecord, FunctionRecord, ProfileReport, TextReport};
pub use sort_key::{SortBy, SortKey, SortSpec};
pub use table::{FunctionStats, Stats};
