//! Deterministic, instrumentation-based profiler.
//!
//! This module records how often instrumented frames run and how long they
//! take while a session is active on the current thread:
//! - Call and primitive (non-recursive) call counts
//! - Internal time (excluding instrumented children)
//! - Cumulative time (including children)
//! - Caller edges

pub mod frame;
pub mod session;

// Re-export main types and functions
pub use frame::{base_name, FrameKey};
pub use session::{enter, is_active, start_session, FrameGuard, SessionGuard};

use std::panic::Location;

/// Run `f` inside a named frame
///
/// **Public** - instrumentation for closures and code without a named function
#[track_caller]
pub fn profile_fn<R>(name: &str, f: impl FnOnce() -> R) -> R {
    let _frame = enter(FrameKey::from_location(Location::caller(), name));
    f()
}

/// Record the enclosing scope as a frame of the current profiling session.
///
/// With no argument the frame is named after the enclosing function;
/// an explicit name can be given instead. Outside a session this is a no-op.
///
/// ```ignore
/// fn create_counter(products: &[String]) -> HashMap<String, usize> {
///     profile_scope!();
///     // ...
/// }
/// ```
#[macro_export]
macro_rules! profile_scope {
    () => {
        let _profile_scope_guard = $crate::profiler::enter($crate::profiler::FrameKey::new(
            file!(),
            line!(),
            $crate::function_name!(),
        ));
    };
    ($name:expr) => {
        let _profile_scope_guard =
            $crate::profiler::enter($crate::profiler::FrameKey::new(file!(), line!(), $name));
    };
}
