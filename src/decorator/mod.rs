//! Profiling decorators.
//!
//! This module wraps callables so that every call is profiled and its
//! statistics report is written to a file:
//! - `decorate` for a single function or closure
//! - `decorate_type` for the members of a type
//! - the `profiled!` macro for named functions

pub mod config;
pub mod type_profiler;
pub mod wrapper;

// Re-export main types and functions
pub use config::{derive_output_path, ProfileConfig, ReportFormat};
pub use type_profiler::{decorate_type, TypeProfiler};
pub use wrapper::{decorate, last_path_segment, Invoke, Profiled};
