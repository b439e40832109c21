//! Report rendering for profile statistics.
//!
//! Two formats are supported:
//! - Plain text, one frame per line (the default)
//! - A versioned JSON document (see [`ProfileReport`])

use super::table::Stats;
use crate::utils::config::{REPORT_SCHEMA_VERSION, TEXT_COLUMN_HEADER};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Render statistics as a text report
///
/// **Public** - main entry point for text output
///
/// # Arguments
/// * `stats` - Sorted (or unsorted) statistics
/// * `lines_to_print` - Maximum number of statistic lines, `None` for all
///
/// # Example
/// ```text
///          12 function calls (9 primitive calls) in 0.021 seconds
///
///    Ordered by: cumulative time
///    List reduced from 6 to 2 due to restriction <2>
///
///    ncalls  tottime  percall  cumtime  percall filename:lineno(function)
///         1    0.001    0.001    0.021    0.021 demo.rs:40(product_counter_v1)
///         1    0.015    0.015    0.015    0.015 demo.rs:61(create_counter)
/// ```
pub fn render_text(stats: &Stats, lines_to_print: Option<usize>) -> String {
    TextReport {
        stats,
        lines_to_print,
    }
    .to_string()
}

/// Text report view over a statistics table
///
/// Unsorted tables are listed in table order and say so in place of the
/// "Ordered by" line. Nothing but the totals is written when no row is shown.
pub struct TextReport<'a> {
    pub stats: &'a Stats,
    pub lines_to_print: Option<usize>,
}

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stats = self.stats;
        let total_calls = stats.total_calls();
        let primitive_calls = stats.primitive_calls();
        write!(f, "         {} function calls", total_calls)?;
        if total_calls != primitive_calls {
            write!(f, " ({} primitive calls)", primitive_calls)?;
        }
        writeln!(f, " in {:.3} seconds", stats.total_time())?;
        writeln!(f)?;

        let shown = visible_rows(stats.len(), self.lines_to_print);
        if shown == 0 {
            return Ok(());
        }

        if stats.sorted_by().is_empty() {
            writeln!(f, "   Random listing order was used")?;
        } else {
            writeln!(f, "   Ordered by: {}", ordered_by(stats).join(", "))?;
        }
        if let Some(limit) = self.lines_to_print {
            if shown < stats.len() {
                writeln!(
                    f,
                    "   List reduced from {} to {} due to restriction <{}>",
                    stats.len(),
                    shown,
                    limit
                )?;
            }
        }
        writeln!(f)?;

        writeln!(f, "{}", TEXT_COLUMN_HEADER)?;
        for (key, entry) in stats.rows().take(shown) {
            writeln!(
                f,
                "{:>9} {} {} {} {} {}",
                entry.calls_column(),
                Seconds(Some(entry.total_time)),
                Seconds(entry.time_per_call()),
                Seconds(Some(entry.cumulative_time)),
                Seconds(entry.cumulative_per_call()),
                key.label()
            )?;
        }
        writeln!(f)?;
        writeln!(f)
    }
}

/// Number of rows a report shows for a table of `len` entries
pub fn visible_rows(len: usize, lines_to_print: Option<usize>) -> usize {
    lines_to_print.map_or(len, |limit| limit.min(len))
}

fn ordered_by(stats: &Stats) -> Vec<&'static str> {
    stats.sorted_by().iter().map(|key| key.description()).collect()
}

/// Eight-column seconds cell, blank when undefined
struct Seconds(Option<f64>);

impl fmt::Display for Seconds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(value) => write!(f, "{:8.3}", value),
            None => f.write_str("        "),
        }
    }
}

/// JSON profile report
///
/// **Public** - written for `ReportFormat::Json`, read back by `validate`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileReport {
    /// Schema version for compatibility checking
    pub version: String,

    /// Name of the profiled target
    pub target: String,

    /// Sum of all calls
    pub total_calls: u64,

    /// Sum of all primitive calls
    pub primitive_calls: u64,

    /// Total profiled time in seconds
    pub total_time: f64,

    /// Sort key descriptions, in application order
    pub ordered_by: Vec<String>,

    /// Number of entries before the line restriction was applied
    pub total_entries: usize,

    /// Reported entries in order
    pub entries: Vec<FunctionRecord>,

    /// Timestamp when the report was generated
    pub generated_at: String,
}

/// One frame in a JSON report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionRecord {
    pub file: String,
    pub line: u32,
    pub function: String,
    pub ncalls: u64,
    pub primitive_calls: u64,
    pub tottime: f64,
    pub cumtime: f64,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub callers: Vec<CallerRecord>,
}

/// A calling frame and how often it made the call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallerRecord {
    pub caller: String,
    pub calls: u64,
}

impl ProfileReport {
    /// Build a report from statistics, honouring the line restriction
    pub fn from_stats(target: impl Into<String>, stats: &Stats, lines_to_print: Option<usize>) -> Self {
        let entries = stats
            .rows()
            .take(visible_rows(stats.len(), lines_to_print))
            .map(|(key, entry)| FunctionRecord {
                file: key.file.clone(),
                line: key.line,
                function: key.function.clone(),
                ncalls: entry.total_calls,
                primitive_calls: entry.primitive_calls,
                tottime: entry.total_time,
                cumtime: entry.cumulative_time,
                callers: entry
                    .callers
                    .iter()
                    .map(|(caller, calls)| CallerRecord {
                        caller: caller.label(),
                        calls: *calls,
                    })
                    .collect(),
            })
            .collect();

        Self {
            version: REPORT_SCHEMA_VERSION.to_string(),
            target: target.into(),
            total_calls: stats.total_calls(),
            primitive_calls: stats.primitive_calls(),
            total_time: stats.total_time(),
            ordered_by: ordered_by(stats).into_iter().map(String::from).collect(),
            total_entries: stats.len(),
            entries,
            generated_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profiler::FrameKey;
    use crate::stats::{FunctionStats, SortKey};
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;

    fn sample() -> Stats {
        let main = FrameKey::new("src/main.rs", 3, "main");
        let mut helper_callers = BTreeMap::new();
        helper_callers.insert(main.clone(), 1);

        Stats::from_entries(vec![
            (
                main,
                FunctionStats {
                    primitive_calls: 1,
                    total_calls: 1,
                    total_time: 0.25,
                    cumulative_time: 1.0,
                    callers: BTreeMap::new(),
                },
            ),
            (
                FrameKey::new("src/helper.rs", 8, "helper"),
                FunctionStats {
                    primitive_calls: 1,
                    total_calls: 3,
                    total_time: 0.75,
                    cumulative_time: 0.75,
                    callers: helper_callers,
                },
            ),
        ])
    }

    #[test]
    fn test_render_full_report() {
        let mut stats = sample();
        stats.sort_stats(&[SortKey::Cumulative]);

        let expected = "         4 function calls (2 primitive calls) in 1.000 seconds\n\
                        \n\
                        \x20  Ordered by: cumulative time\n\
                        \n\
                        \x20  ncalls  tottime  percall  cumtime  percall filename:lineno(function)\n\
                        \x20       1    0.250    0.250    1.000    1.000 src/main.rs:3(main)\n\
                        \x20     3/1    0.750    0.250    0.750    0.750 src/helper.rs:8(helper)\n\
                        \n\n";
        assert_eq!(render_text(&stats, None), expected);
    }

    #[test]
    fn test_render_with_restriction() {
        let mut stats = sample();
        stats.sort_stats(&[SortKey::Time]);

        let text = render_text(&stats, Some(1));
        assert!(text.contains("   Ordered by: internal time\n"));
        assert!(text.contains("   List reduced from 2 to 1 due to restriction <1>\n"));
        assert!(text.contains("src/helper.rs:8(helper)"));
        assert!(!text.contains("src/main.rs:3(main)"));
    }

    #[test]
    fn test_restriction_larger_than_table() {
        let text = render_text(&sample(), Some(10));
        assert!(!text.contains("List reduced"));
        assert!(!text.contains("Ordered by"));
    }

    #[test]
    fn test_render_unsorted_table() {
        let mut stats = sample();
        stats.sort_stats(&[]);

        let expected = "         4 function calls (2 primitive calls) in 1.000 seconds\n\
                        \n\
                        \x20  Random listing order was used\n\
                        \n\
                        \x20  ncalls  tottime  percall  cumtime  percall filename:lineno(function)\n\
                        \x20     3/1    0.750    0.250    0.750    0.750 src/helper.rs:8(helper)\n\
                        \x20       1    0.250    0.250    1.000    1.000 src/main.rs:3(main)\n\
                        \n\n";
        assert_eq!(render_text(&stats, None), expected);
    }

    #[test]
    fn test_render_zero_lines() {
        let mut stats = sample();
        stats.sort_stats(&[SortKey::Cumulative]);

        let text = render_text(&stats, Some(0));
        assert_eq!(text, "         4 function calls (2 primitive calls) in 1.000 seconds\n\n");
    }

    #[test]
    fn test_json_report_from_stats() {
        let mut stats = sample();
        stats.sort_stats(&[SortKey::Calls, SortKey::Cumulative]);

        let report = ProfileReport::from_stats("main", &stats, Some(1));
        assert_eq!(report.version, REPORT_SCHEMA_VERSION);
        assert_eq!(report.total_entries, 2);
        assert_eq!(report.entries.len(), 1);
        assert_eq!(report.entries[0].function, "helper");
        assert_eq!(report.entries[0].callers[0].caller, "src/main.rs:3(main)");
        assert_eq!(report.ordered_by, vec!["call count", "cumulative time"]);
    }
}
