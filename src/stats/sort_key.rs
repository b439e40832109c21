//! Sort keys for ordering profile statistics.
//!
//! A sort key can be given as a [`SortKey`] value or by name. Names accept
//! the usual aliases (`ncalls`, `cumtime`, `tottime`, ...) and any unique
//! prefix. [`SortBy`] holds one key or an ordered sequence of keys; later
//! keys only break ties left by earlier ones.

use super::table::FunctionStats;
use crate::profiler::FrameKey;
use crate::utils::config::DEFAULT_SORT_KEY;
use crate::utils::error::ConfigurationError;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Criterion for ordering report lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Call count (descending)
    Calls,
    /// Cumulative time (descending)
    Cumulative,
    /// File name (ascending)
    Filename,
    /// Line number (ascending)
    Line,
    /// Function name (ascending)
    Name,
    /// Function name, then file, then line (ascending)
    Nfl,
    /// Primitive call count (descending)
    Pcalls,
    /// `file:line(function)` label (ascending)
    Stdname,
    /// Internal time (descending)
    Time,
}

/// Every accepted sort key name, aliases included
const SORT_KEY_NAMES: &[(&str, SortKey)] = &[
    ("calls", SortKey::Calls),
    ("ncalls", SortKey::Calls),
    ("cumulative", SortKey::Cumulative),
    ("cumtime", SortKey::Cumulative),
    ("file", SortKey::Filename),
    ("filename", SortKey::Filename),
    ("module", SortKey::Filename),
    ("line", SortKey::Line),
    ("name", SortKey::Name),
    ("nfl", SortKey::Nfl),
    ("pcalls", SortKey::Pcalls),
    ("stdname", SortKey::Stdname),
    ("time", SortKey::Time),
    ("tottime", SortKey::Time),
];

impl SortKey {
    /// Canonical name of the key
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Calls => "calls",
            SortKey::Cumulative => "cumulative",
            SortKey::Filename => "filename",
            SortKey::Line => "line",
            SortKey::Name => "name",
            SortKey::Nfl => "nfl",
            SortKey::Pcalls => "pcalls",
            SortKey::Stdname => "stdname",
            SortKey::Time => "tottime",
        }
    }

    /// Human-readable description used in the "Ordered by" report line
    pub fn description(&self) -> &'static str {
        match self {
            SortKey::Calls => "call count",
            SortKey::Cumulative => "cumulative time",
            SortKey::Filename => "file name",
            SortKey::Line => "line number",
            SortKey::Name => "function name",
            SortKey::Nfl => "name/file/line",
            SortKey::Pcalls => "primitive call count",
            SortKey::Stdname => "standard name",
            SortKey::Time => "internal time",
        }
    }

    /// Resolve a key name, alias or unique prefix
    ///
    /// **Public** - used when validating a configuration
    ///
    /// # Errors
    /// * `ConfigurationError::UnknownSortKey` - nothing matches
    /// * `ConfigurationError::AmbiguousSortKey` - prefix matches several keys
    pub fn parse(name: &str) -> Result<Self, ConfigurationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ConfigurationError::UnknownSortKey(name.to_string()));
        }

        if let Some((_, key)) = SORT_KEY_NAMES.iter().find(|(candidate, _)| *candidate == name) {
            return Ok(*key);
        }

        let mut matches: Vec<(&str, SortKey)> = SORT_KEY_NAMES
            .iter()
            .filter(|(candidate, _)| candidate.starts_with(name))
            .copied()
            .collect();
        matches.dedup_by_key(|(_, key)| *key);

        match matches.as_slice() {
            [] => Err(ConfigurationError::UnknownSortKey(name.to_string())),
            [(_, key)] => Ok(*key),
            several => Err(ConfigurationError::AmbiguousSortKey {
                key: name.to_string(),
                candidates: several
                    .iter()
                    .map(|(candidate, _)| *candidate)
                    .collect::<Vec<_>>()
                    .join(", "),
            }),
        }
    }

    /// Compare two entries under this key alone
    pub fn compare(
        &self,
        (a_key, a): (&FrameKey, &FunctionStats),
        (b_key, b): (&FrameKey, &FunctionStats),
    ) -> Ordering {
        match self {
            SortKey::Calls => b.total_calls.cmp(&a.total_calls),
            SortKey::Pcalls => b.primitive_calls.cmp(&a.primitive_calls),
            SortKey::Cumulative => b.cumulative_time.total_cmp(&a.cumulative_time),
            SortKey::Time => b.total_time.total_cmp(&a.total_time),
            SortKey::Filename => a_key.file.cmp(&b_key.file),
            SortKey::Line => a_key.line.cmp(&b_key.line),
            SortKey::Name => a_key.function.cmp(&b_key.function),
            SortKey::Nfl => a_key
                .function
                .cmp(&b_key.function)
                .then_with(|| a_key.file.cmp(&b_key.file))
                .then_with(|| a_key.line.cmp(&b_key.line)),
            SortKey::Stdname => a_key.label().cmp(&b_key.label()),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// One sort criterion as the caller supplied it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortSpec {
    /// A key name, resolved when the configuration is validated
    Named(String),
    /// An already typed key
    Key(SortKey),
}

impl SortSpec {
    fn resolve(&self) -> Result<SortKey, ConfigurationError> {
        match self {
            SortSpec::Named(name) => SortKey::parse(name),
            SortSpec::Key(key) => Ok(*key),
        }
    }
}

impl From<&str> for SortSpec {
    fn from(name: &str) -> Self {
        SortSpec::Named(name.to_string())
    }
}

impl From<String> for SortSpec {
    fn from(name: String) -> Self {
        SortSpec::Named(name)
    }
}

impl From<SortKey> for SortSpec {
    fn from(key: SortKey) -> Self {
        SortSpec::Key(key)
    }
}

impl fmt::Display for SortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortSpec::Named(name) => f.write_str(name),
            SortSpec::Key(key) => f.write_str(key.as_str()),
        }
    }
}

/// Sort criteria: a single key or an ordered sequence of keys
///
/// **Public** - the `sort_by` option of a profile configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortBy {
    specs: Vec<SortSpec>,
}

impl SortBy {
    /// Criteria from any sequence of names or keys
    pub fn sequence<I, T>(specs: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<SortSpec>,
    {
        Self {
            specs: specs.into_iter().map(Into::into).collect(),
        }
    }

    pub fn specs(&self) -> &[SortSpec] {
        &self.specs
    }

    /// Resolve every criterion to a [`SortKey`], in order
    ///
    /// An empty sequence resolves to no keys, leaving the table unsorted.
    ///
    /// # Errors
    /// * any error from [`SortKey::parse`]
    pub fn resolve(&self) -> Result<Vec<SortKey>, ConfigurationError> {
        self.specs.iter().map(SortSpec::resolve).collect()
    }
}

impl Default for SortBy {
    fn default() -> Self {
        SortBy::from(DEFAULT_SORT_KEY)
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.specs.iter().map(ToString::to_string).collect();
        f.write_str(&names.join(", "))
    }
}

impl From<&str> for SortBy {
    fn from(name: &str) -> Self {
        Self::sequence([name])
    }
}

impl From<String> for SortBy {
    fn from(name: String) -> Self {
        Self::sequence([name])
    }
}

impl From<SortKey> for SortBy {
    fn from(key: SortKey) -> Self {
        Self::sequence([key])
    }
}

impl<T: Into<SortSpec>> From<Vec<T>> for SortBy {
    fn from(specs: Vec<T>) -> Self {
        Self::sequence(specs)
    }
}

impl<T: Into<SortSpec>, const N: usize> From<[T; N]> for SortBy {
    fn from(specs: [T; N]) -> Self {
        Self::sequence(specs)
    }
}

impl<T: Into<SortSpec> + Clone> From<&[T]> for SortBy {
    fn from(specs: &[T]) -> Self {
        Self::sequence(specs.iter().cloned())
    }
}
