//! Frame identity for profiled code.
//!
//! A frame is identified the same way a deterministic profiler identifies a
//! function: source file, line and function name.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::panic::Location;

/// Identity of a profiled frame
///
/// **Public** - key of every statistics entry
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FrameKey {
    /// Source file as recorded at the instrumentation site
    pub file: String,

    /// Line of the instrumentation site
    pub line: u32,

    /// Function name
    pub function: String,
}

impl FrameKey {
    pub fn new(file: impl Into<String>, line: u32, function: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            line,
            function: function.into(),
        }
    }

    /// Build a key from a caller location (see `#[track_caller]`)
    pub fn from_location(location: &Location<'_>, function: impl Into<String>) -> Self {
        Self::new(location.file(), location.line(), function)
    }

    /// Standard `file:line(function)` label used in reports
    pub fn label(&self) -> String {
        format!("{}:{}({})", self.file, self.line, self.function)
    }

    /// Same frame with the directory part of the file removed
    pub fn stripped(&self) -> Self {
        Self {
            file: base_name(&self.file).to_string(),
            line: self.line,
            function: self.function.clone(),
        }
    }
}

impl fmt::Display for FrameKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}({})", self.file, self.line, self.function)
    }
}

/// Final path component of a file name, for either separator style
pub fn base_name(file: &str) -> &str {
    file.rsplit(['/', '\\']).next().unwrap_or(file)
}

/// Reduce a `std::any::type_name` path to a bare function name
///
/// **Public** - used by the `function_name!` macro
///
/// Drops the probe item the macro declares, any closure segments and
/// the module path, so `my_crate::demo::count::__probe` becomes `count`.
pub fn short_function_name(full: &'static str) -> &'static str {
    let mut name = full.strip_suffix("::__probe").unwrap_or(full);
    while let Some(outer) = name.strip_suffix("::{{closure}}") {
        name = outer;
    }
    name.rsplit("::").next().unwrap_or(name)
}

/// Name of the enclosing function as a `&'static str`
#[macro_export]
macro_rules! function_name {
    () => {{
        fn __probe() {}
        fn __type_name_of<T>(_: T) -> &'static str {
            ::std::any::type_name::<T>()
        }
        $crate::profiler::frame::short_function_name(__type_name_of(__probe))
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_format() {
        let key = FrameKey::new("src/demo.rs", 42, "count");
        assert_eq!(key.label(), "src/demo.rs:42(count)");
        assert_eq!(key.to_string(), key.label());
    }

    #[test]
    fn test_stripped_removes_directories() {
        let key = FrameKey::new("/home/user/project/src/demo.rs", 7, "count");
        assert_eq!(key.stripped().file, "demo.rs");

        let windows = FrameKey::new(r"C:\work\src\demo.rs", 7, "count");
        assert_eq!(windows.stripped().file, "demo.rs");
    }

    #[test]
    fn test_short_function_name() {
        assert_eq!(short_function_name("my_crate::demo::count::__probe"), "count");
        assert_eq!(
            short_function_name("my_crate::demo::count::{{closure}}::{{closure}}::__probe"),
            "count"
        );
        assert_eq!(short_function_name("main"), "main");
    }

    #[test]
    fn test_function_name_macro() {
        fn sample_function() -> &'static str {
            crate::function_name!()
        }
        assert_eq!(sample_function(), "sample_function");
    }
}
