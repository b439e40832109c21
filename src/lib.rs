//! Profile Decorator
//!
//! Wrap a function, closure or the members of a type in a deterministic
//! profiler and write a sorted statistics report to a file instead of
//! standard output.
//!
//! ## Getting Started
//!
//! ```ignore
//! use profile_decorator::{decorate, profile_scope, ProfileConfig};
//!
//! fn create_counter(products: &[String]) -> HashMap<String, usize> {
//!     profile_scope!();
//!     // ...
//! }
//!
//! let counter = decorate(
//!     "product_counter",
//!     |products: &[String]| create_counter(products),
//!     ProfileConfig::new()
//!         .with_sort_by("cumulative")
//!         .with_lines_to_print(10)
//!         .with_strip_dirs(true),
//! )?;
//!
//! // Writes product_counter.prof and returns the counts
//! let counts = counter.call((products.as_slice(),))?;
//! ```
//!
//! Only frames marked with `profile_scope!`, `profile_fn` or a decorator
//! are recorded; the report lists those frames.

pub mod decorator;
pub mod output;
pub mod profiler;
pub mod stats;
pub mod utils;

pub use decorator::{decorate, decorate_type, ProfileConfig, Profiled, ReportFormat, TypeProfiler};
pub use profiler::{profile_fn, FrameKey};
pub use stats::{SortBy, SortKey, Stats};
pub use utils::error::{ConfigurationError, OutputError, ProfileError};
