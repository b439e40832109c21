//! Configuration defaults and constants shared across the crate.

/// Extension appended to the target name when no output file is given
pub const DEFAULT_EXTENSION: &str = "prof";

/// Extension used instead of [`DEFAULT_EXTENSION`] for JSON reports
pub const JSON_EXTENSION: &str = "prof.json";

/// Sort key applied when the caller does not choose one
pub const DEFAULT_SORT_KEY: &str = "cumulative";

/// Current JSON report schema version
pub const REPORT_SCHEMA_VERSION: &str = "1.0.0";

// Column header of the text report, matching the row layout in stats::report
pub const TEXT_COLUMN_HEADER: &str =
    "   ncalls  tottime  percall  cumtime  percall filename:lineno(function)";
