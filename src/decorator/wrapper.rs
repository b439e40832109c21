//! The profiled callable.
//!
//! [`decorate`] validates a [`ProfileConfig`] and wraps a target. Every
//! [`Profiled::call`] then:
//! 1. Starts a profiling session on the current thread
//! 2. Runs the target inside its own frame
//! 3. Stops the session, even if the target panicked
//! 4. Sorts, strips and limits the statistics
//! 5. Writes the report (truncate-and-create)
//! 6. Returns the target's value, or resumes its panic

use super::config::{derive_output_path, ProfileConfig, ReportFormat};
use crate::output::{write_json_report, write_report};
use crate::profiler::{self, FrameKey};
use crate::stats::{render_text, ProfileReport, SortKey, Stats};
use crate::utils::error::{ConfigurationError, ProfileError};
use log::{debug, error};
use std::panic::{self, AssertUnwindSafe, Location};
use std::path::PathBuf;

/// A callable taking its arguments as a tuple
///
/// Implemented for every `Fn` with up to six arguments, so a target
/// `fn(a, b)` is called as `profiled.call((a, b))` and a target without
/// arguments as `profiled.call(())`.
pub trait Invoke<Args> {
    type Output;

    fn invoke(&self, args: Args) -> Self::Output;
}

macro_rules! impl_invoke {
    ($($arg:ident),*) => {
        impl<Func, Ret, $($arg,)*> Invoke<($($arg,)*)> for Func
        where
            Func: Fn($($arg),*) -> Ret,
        {
            type Output = Ret;

            #[allow(non_snake_case)]
            fn invoke(&self, ($($arg,)*): ($($arg,)*)) -> Ret {
                self($($arg),*)
            }
        }
    };
}

impl_invoke!();
impl_invoke!(A);
impl_invoke!(A, B);
impl_invoke!(A, B, C);
impl_invoke!(A, B, C, D);
impl_invoke!(A, B, C, D, E);
impl_invoke!(A, B, C, D, E, F);

/// Resolved, validated report options
#[derive(Debug, Clone)]
pub(crate) struct ReportSettings {
    pub(crate) output_file: Option<PathBuf>,
    pub(crate) sort_keys: Vec<SortKey>,
    pub(crate) lines_to_print: Option<usize>,
    pub(crate) strip_dirs: bool,
    pub(crate) format: ReportFormat,
}

impl ReportSettings {
    /// Validate a configuration
    ///
    /// # Errors
    /// * `ConfigurationError` - `sort_by` names an unknown or ambiguous key
    pub(crate) fn from_config(config: ProfileConfig) -> Result<Self, ConfigurationError> {
        let sort_keys = config.sort_by.resolve()?;
        Ok(Self {
            output_file: config.output_file,
            sort_keys,
            lines_to_print: config.lines_to_print,
            strip_dirs: config.strip_dirs,
            format: config.format,
        })
    }
}

/// A target wrapped in the profiler
///
/// **Public** - returned by [`decorate`]
#[derive(Debug, Clone)]
pub struct Profiled<F> {
    name: String,
    frame: FrameKey,
    settings: ReportSettings,
    target: F,
}

/// Wrap `target` so every call is profiled and reported to a file
///
/// **Public** - main entry point of the crate
///
/// # Arguments
/// * `name` - Target name, used for the frame and the default output file
/// * `target` - Callable to profile
/// * `config` - Report options, validated now
///
/// # Errors
/// * `ConfigurationError` - invalid `sort_by`; raised here, never at call time
///
/// # Example
/// ```ignore
/// let counter = decorate("count_words", count_words, ProfileConfig::default())?;
/// let counts = counter.call((text,))?;
/// ```
#[track_caller]
pub fn decorate<F>(
    name: impl Into<String>,
    target: F,
    config: ProfileConfig,
) -> Result<Profiled<F>, ConfigurationError> {
    let settings = ReportSettings::from_config(config)?;
    Ok(Profiled::from_settings(
        name.into(),
        Location::caller(),
        target,
        settings,
    ))
}

impl<F> Profiled<F> {
    pub(crate) fn from_settings(
        name: String,
        location: &Location<'_>,
        target: F,
        settings: ReportSettings,
    ) -> Self {
        debug!(
            "Decorated {} (sort by {:?}, lines {:?}, strip dirs {})",
            name, settings.sort_keys, settings.lines_to_print, settings.strip_dirs
        );
        Self {
            frame: FrameKey::from_location(location, name.clone()),
            name,
            settings,
            target,
        }
    }

    /// Target name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Where each call writes its report
    pub fn output_path(&self) -> PathBuf {
        derive_output_path(
            self.settings.output_file.as_deref(),
            &self.name,
            self.settings.format,
        )
    }

    /// Unwrap the target
    pub fn into_inner(self) -> F {
        self.target
    }

    /// Call the target under the profiler and write its report
    ///
    /// **Public** - the wrapped callable
    ///
    /// # Returns
    /// The target's own return value
    ///
    /// # Errors
    /// * `ProfileError::Output` - the report could not be written
    ///
    /// # Panics
    /// Resumes the target's panic, unchanged, after the report is written
    pub fn call<Args>(&self, args: Args) -> Result<<F as Invoke<Args>>::Output, ProfileError>
    where
        F: Invoke<Args>,
    {
        let session = profiler::start_session();
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            let _frame = profiler::enter(self.frame.clone());
            self.target.invoke(args)
        }));
        let stats = session.finish();

        match outcome {
            Ok(value) => {
                self.write(stats)?;
                Ok(value)
            }
            Err(payload) => {
                if let Err(err) = self.write(stats) {
                    error!("Failed to write profile report for {}: {}", self.name, err);
                }
                panic::resume_unwind(payload)
            }
        }
    }

    fn write(&self, mut stats: Stats) -> Result<PathBuf, ProfileError> {
        if self.settings.strip_dirs {
            stats.strip_dirs();
        }
        stats.sort_stats(&self.settings.sort_keys);

        let path = self.output_path();
        match self.settings.format {
            ReportFormat::Text => {
                let text = render_text(&stats, self.settings.lines_to_print);
                write_report(&text, &path)?;
            }
            ReportFormat::Json => {
                let report =
                    ProfileReport::from_stats(&self.name, &stats, self.settings.lines_to_print);
                write_json_report(&report, &path)?;
            }
        }

        Ok(path)
    }
}

/// Decorate a named function, using its identifier as the target name
///
/// ```ignore
/// let counter = profiled!(product_counter_v1, ProfileConfig::new().with_lines_to_print(10))?;
/// ```
#[macro_export]
macro_rules! profiled {
    ($target:path) => {
        $crate::profiled!($target, $crate::decorator::ProfileConfig::default())
    };
    ($target:path, $config:expr) => {
        $crate::decorator::decorate(
            $crate::decorator::last_path_segment(stringify!($target)),
            $target,
            $config,
        )
    };
}

/// Final segment of a path as written in source (`a::b::c` gives `c`)
pub fn last_path_segment(path: &str) -> &str {
    path.rsplit("::").next().unwrap_or(path).trim()
}
