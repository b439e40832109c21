//! Statistics table produced by a profiling session.
//!
//! The table keeps one [`FunctionStats`] per frame and an ordering over
//! them. Sorting is stable, so applying several keys in sequence yields
//! the usual "first by X, ties broken by Y" order.

use super::sort_key::SortKey;
use crate::profiler::FrameKey;
use log::debug;
use std::collections::BTreeMap;

/// Statistics for one frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FunctionStats {
    /// Calls not induced by recursion
    pub primitive_calls: u64,

    /// All calls, recursive ones included
    pub total_calls: u64,

    /// Time spent in the frame itself, in seconds
    pub total_time: f64,

    /// Time spent in the frame and everything it called, in seconds
    pub cumulative_time: f64,

    /// Number of calls per calling frame
    pub callers: BTreeMap<FrameKey, u64>,
}

impl FunctionStats {
    /// Fold another entry for the same frame into this one
    pub fn merge(&mut self, other: FunctionStats) {
        self.primitive_calls += other.primitive_calls;
        self.total_calls += other.total_calls;
        self.total_time += other.total_time;
        self.cumulative_time += other.cumulative_time;
        for (caller, calls) in other.callers {
            *self.callers.entry(caller).or_insert(0) += calls;
        }
    }

    /// Internal time per call, if the frame was called at all
    pub fn time_per_call(&self) -> Option<f64> {
        (self.total_calls > 0).then(|| self.total_time / self.total_calls as f64)
    }

    /// Cumulative time per primitive call
    pub fn cumulative_per_call(&self) -> Option<f64> {
        (self.primitive_calls > 0).then(|| self.cumulative_time / self.primitive_calls as f64)
    }

    /// `ncalls` column: `total/primitive` when recursion happened
    pub fn calls_column(&self) -> String {
        if self.total_calls == self.primitive_calls {
            self.total_calls.to_string()
        } else {
            format!("{}/{}", self.total_calls, self.primitive_calls)
        }
    }
}

/// Profile statistics with an ordering
///
/// **Public** - built by the profiler, consumed by report renderers
#[derive(Debug, Clone, Default)]
pub struct Stats {
    entries: BTreeMap<FrameKey, FunctionStats>,
    order: Vec<FrameKey>,
    sorted_by: Vec<SortKey>,
}

impl Stats {
    /// Build a table from frame entries
    ///
    /// Entries with the same key are merged. The initial order follows the
    /// frame keys (file, line, function).
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (FrameKey, FunctionStats)>,
    {
        let mut table: BTreeMap<FrameKey, FunctionStats> = BTreeMap::new();
        for (key, stats) in entries {
            table.entry(key).or_default().merge(stats);
        }
        let order = table.keys().cloned().collect();

        Self {
            entries: table,
            order,
            sorted_by: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &FrameKey) -> Option<&FunctionStats> {
        self.entries.get(key)
    }

    /// Keys applied by the last [`Stats::sort_stats`], empty if unsorted
    pub fn sorted_by(&self) -> &[SortKey] {
        &self.sorted_by
    }

    /// Sum of all calls
    pub fn total_calls(&self) -> u64 {
        self.entries.values().map(|s| s.total_calls).sum()
    }

    /// Sum of all primitive calls
    pub fn primitive_calls(&self) -> u64 {
        self.entries.values().map(|s| s.primitive_calls).sum()
    }

    /// Total profiled time, the sum of every frame's internal time
    pub fn total_time(&self) -> f64 {
        self.entries.values().map(|s| s.total_time).sum()
    }

    /// Entries in the current order
    pub fn rows(&self) -> impl Iterator<Item = (&FrameKey, &FunctionStats)> {
        self.order
            .iter()
            .filter_map(|key| self.entries.get_key_value(key))
    }

    /// Remove directory prefixes from every file name
    ///
    /// **Public** - shortens report lines
    ///
    /// Frames that become indistinguishable are merged, callers included.
    /// Any previous ordering is discarded.
    pub fn strip_dirs(&mut self) -> &mut Self {
        let before = self.entries.len();
        let entries = std::mem::take(&mut self.entries);

        let stripped = entries.into_iter().map(|(key, mut stats)| {
            stats.callers = stats
                .callers
                .into_iter()
                .fold(BTreeMap::new(), |mut callers, (caller, calls)| {
                    *callers.entry(caller.stripped()).or_insert(0) += calls;
                    callers
                });
            (key.stripped(), stats)
        });

        *self = Self::from_entries(stripped);
        debug!("Stripped directories: {} -> {} entries", before, self.entries.len());
        self
    }

    /// Order entries by `keys`, applied in sequence
    ///
    /// **Public** - the first key decides, each later key breaks remaining ties
    pub fn sort_stats(&mut self, keys: &[SortKey]) -> &mut Self {
        let entries = &self.entries;
        self.order.sort_by(|a, b| {
            let (Some(a_stats), Some(b_stats)) = (entries.get(a), entries.get(b)) else {
                return a.cmp(b);
            };
            keys.iter()
                .map(|key| key.compare((a, a_stats), (b, b_stats)))
                .find(|ordering| ordering.is_ne())
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        self.sorted_by = keys.to_vec();
        debug!("Sorted {} entries by {:?}", self.order.len(), keys);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn entry(calls: u64, tottime: f64, cumtime: f64) -> FunctionStats {
        FunctionStats {
            primitive_calls: calls,
            total_calls: calls,
            total_time: tottime,
            cumulative_time: cumtime,
            callers: BTreeMap::new(),
        }
    }

    fn names(stats: &Stats) -> Vec<String> {
        stats.rows().map(|(key, _)| key.function.clone()).collect()
    }

    fn sample() -> Stats {
        Stats::from_entries(vec![
            (FrameKey::new("/src/a.rs", 10, "alpha"), entry(1, 0.1, 0.9)),
            (FrameKey::new("/src/b.rs", 5, "beta"), entry(5, 0.3, 0.3)),
            (FrameKey::new("/src/c.rs", 1, "gamma"), entry(5, 0.2, 0.5)),
        ])
    }

    #[test]
    fn test_totals() {
        let stats = sample();
        assert_eq!(stats.total_calls(), 11);
        assert_eq!(stats.primitive_calls(), 11);
        assert!((stats.total_time() - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_sort_by_cumulative() {
        let mut stats = sample();
        stats.sort_stats(&[SortKey::Cumulative]);
        assert_eq!(names(&stats), vec!["alpha", "gamma", "beta"]);
        assert_eq!(stats.sorted_by(), &[SortKey::Cumulative]);
    }

    #[test]
    fn test_sort_by_calls_then_cumulative() {
        let mut stats = sample();
        stats.sort_stats(&[SortKey::Calls, SortKey::Cumulative]);
        assert_eq!(names(&stats), vec!["gamma", "beta", "alpha"]);
    }

    #[test]
    fn test_sort_by_name_and_line() {
        let mut stats = sample();
        stats.sort_stats(&[SortKey::Line]);
        assert_eq!(names(&stats), vec!["gamma", "beta", "alpha"]);
        stats.sort_stats(&[SortKey::Name]);
        assert_eq!(names(&stats), vec!["alpha", "beta", "gamma"]);
    }

    #[test]
    fn test_strip_dirs_merges_collisions() {
        let caller = FrameKey::new("/one/main.rs", 1, "main");
        let mut first = entry(2, 0.1, 0.2);
        first.callers.insert(caller.clone(), 2);
        let mut second = entry(3, 0.2, 0.4);
        second.callers.insert(FrameKey::new("/two/main.rs", 1, "main"), 3);

        let mut stats = Stats::from_entries(vec![
            (FrameKey::new("/one/util.rs", 4, "helper"), first),
            (FrameKey::new("/two/util.rs", 4, "helper"), second),
        ]);
        stats.strip_dirs();

        assert_eq!(stats.len(), 1);
        let merged = stats.get(&FrameKey::new("util.rs", 4, "helper")).unwrap();
        assert_eq!(merged.total_calls, 5);
        assert_eq!(merged.callers.get(&caller.stripped()), Some(&5));
        assert!(stats.sorted_by().is_empty());
    }

    #[test]
    fn test_calls_column() {
        let mut recursive = entry(1, 0.0, 0.0);
        recursive.total_calls = 4;
        assert_eq!(recursive.calls_column(), "4/1");
        assert_eq!(entry(3, 0.0, 0.0).calls_column(), "3");
    }

    #[test]
    fn test_per_call_with_zero_calls() {
        let empty = FunctionStats::default();
        assert_eq!(empty.time_per_call(), None);
        assert_eq!(empty.cumulative_per_call(), None);
    }
}
