//! Per-thread profiling sessions.
//!
//! A session records every frame entered on its thread between
//! [`start_session`] and [`SessionGuard::finish`]. Frames are opened with
//! [`enter`] and closed when the returned [`FrameGuard`] drops, so a panic
//! unwinding through instrumented code still closes its frames.
//!
//! Several sessions may be active at once (a profiled call inside another
//! profiled call). A frame entered while they are active is recorded in all
//! of them.

use super::frame::FrameKey;
use crate::stats::{FunctionStats, Stats};
use log::{debug, warn};
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap};
use std::time::{Duration, Instant};

thread_local! {
    static SESSIONS: RefCell<Vec<Session>> = const { RefCell::new(Vec::new()) };
    static NEXT_SESSION_ID: Cell<u64> = const { Cell::new(0) };
}

/// A frame that has been entered but not yet closed
#[derive(Debug)]
struct ActiveFrame {
    key: FrameKey,
    started: Instant,
    child_time: Duration,
    primitive: bool,
    caller: Option<FrameKey>,
}

/// Timings accumulated for one frame key
#[derive(Debug, Default)]
struct FrameTimings {
    total_calls: u64,
    primitive_calls: u64,
    internal: Duration,
    cumulative: Duration,
    callers: HashMap<FrameKey, u64>,
}

#[derive(Debug)]
struct Session {
    id: u64,
    stack: Vec<ActiveFrame>,
    timings: HashMap<FrameKey, FrameTimings>,
}

impl Session {
    fn new(id: u64) -> Self {
        Self {
            id,
            stack: Vec::new(),
            timings: HashMap::new(),
        }
    }

    fn enter(&mut self, key: FrameKey, now: Instant) {
        // Only the outermost activation of a frame is primitive
        let primitive = !self.stack.iter().any(|frame| frame.key == key);
        let caller = self.stack.last().map(|frame| frame.key.clone());

        self.stack.push(ActiveFrame {
            key,
            started: now,
            child_time: Duration::ZERO,
            primitive,
            caller,
        });
    }

    fn exit(&mut self, key: &FrameKey, now: Instant) {
        let Some(position) = self.stack.iter().rposition(|frame| &frame.key == key) else {
            return;
        };

        // Frames above the one being closed lost their guard; close them too
        while self.stack.len() > position {
            if let Some(frame) = self.stack.pop() {
                self.close(frame, now);
            }
        }
    }

    fn close(&mut self, frame: ActiveFrame, now: Instant) {
        let elapsed = now.saturating_duration_since(frame.started);
        let internal = elapsed.saturating_sub(frame.child_time);

        if let Some(parent) = self.stack.last_mut() {
            parent.child_time += elapsed;
        }

        let timings = self.timings.entry(frame.key).or_default();
        timings.total_calls += 1;
        timings.internal += internal;

        if frame.primitive {
            timings.primitive_calls += 1;
            timings.cumulative += elapsed;
        }

        if let Some(caller) = frame.caller {
            *timings.callers.entry(caller).or_insert(0) += 1;
        }
    }

    fn into_stats(mut self, now: Instant) -> Stats {
        if !self.stack.is_empty() {
            warn!(
                "Profiling session {} finished with {} open frame(s); closing them",
                self.id,
                self.stack.len()
            );
        }
        while let Some(frame) = self.stack.pop() {
            self.close(frame, now);
        }

        Stats::from_entries(self.timings.into_iter().map(|(key, timings)| {
            let stats = FunctionStats {
                primitive_calls: timings.primitive_calls,
                total_calls: timings.total_calls,
                total_time: timings.internal.as_secs_f64(),
                cumulative_time: timings.cumulative.as_secs_f64(),
                callers: timings.callers.into_iter().collect::<BTreeMap<_, _>>(),
            };
            (key, stats)
        }))
    }
}

/// Start a profiling session on the current thread
///
/// **Public** - the session ends when the guard is finished or dropped
pub fn start_session() -> SessionGuard {
    let id = NEXT_SESSION_ID.with(|next| {
        let id = next.get();
        next.set(id.wrapping_add(1));
        id
    });

    SESSIONS.with(|sessions| sessions.borrow_mut().push(Session::new(id)));
    debug!("Started profiling session {}", id);

    SessionGuard { id: Some(id) }
}

/// Whether any session is recording on the current thread
pub fn is_active() -> bool {
    SESSIONS.with(|sessions| !sessions.borrow().is_empty())
}

/// Enter a frame in every active session on this thread
///
/// **Public** - the frame closes when the returned guard drops.
/// Without an active session the guard is inert.
pub fn enter(key: FrameKey) -> FrameGuard {
    let now = Instant::now();
    let session_ids = SESSIONS.with(|sessions| {
        let mut sessions = sessions.borrow_mut();
        sessions
            .iter_mut()
            .map(|session| {
                session.enter(key.clone(), now);
                session.id
            })
            .collect::<Vec<_>>()
    });

    FrameGuard { key, session_ids }
}

/// Guard closing a frame on drop
#[must_use = "the frame closes as soon as the guard is dropped"]
#[derive(Debug)]
pub struct FrameGuard {
    key: FrameKey,
    session_ids: Vec<u64>,
}

impl Drop for FrameGuard {
    fn drop(&mut self) {
        if self.session_ids.is_empty() {
            return;
        }
        let now = Instant::now();
        let _ = SESSIONS.try_with(|sessions| {
            let mut sessions = sessions.borrow_mut();
            for session in sessions
                .iter_mut()
                .filter(|session| self.session_ids.contains(&session.id))
            {
                session.exit(&self.key, now);
            }
        });
    }
}

/// Guard owning an active session
///
/// Dropping it without calling [`SessionGuard::finish`] discards the data.
#[must_use = "the session stops as soon as the guard is dropped"]
#[derive(Debug)]
pub struct SessionGuard {
    id: Option<u64>,
}

impl SessionGuard {
    /// Stop the session and return its statistics
    pub fn finish(mut self) -> Stats {
        let now = Instant::now();
        match self.id.take().and_then(remove_session) {
            Some(session) => {
                debug!(
                    "Finished profiling session {} ({} frames)",
                    session.id,
                    session.timings.len()
                );
                session.into_stats(now)
            }
            None => Stats::default(),
        }
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        if let Some(id) = self.id.take() {
            debug!("Discarding profiling session {}", id);
            let _ = remove_session(id);
        }
    }
}

fn remove_session(id: u64) -> Option<Session> {
    SESSIONS
        .try_with(|sessions| {
            let mut sessions = sessions.borrow_mut();
            let position = sessions.iter().position(|session| session.id == id)?;
            Some(sessions.remove(position))
        })
        .ok()
        .flatten()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn key(function: &str) -> FrameKey {
        FrameKey::new("src/sample.rs", 1, function)
    }

    #[test]
    fn test_enter_without_session_is_inert() {
        assert!(!is_active());
        let guard = enter(key("lonely"));
        assert!(guard.session_ids.is_empty());
    }

    #[test]
    fn test_counts_calls_and_callers() {
        let session = start_session();
        {
            let _outer = enter(key("outer"));
            for _ in 0..3 {
                let _inner = enter(key("inner"));
            }
        }
        let stats = session.finish();

        let inner = stats.get(&key("inner")).unwrap();
        assert_eq!(inner.total_calls, 3);
        assert_eq!(inner.primitive_calls, 3);
        assert_eq!(inner.callers.get(&key("outer")), Some(&3));

        let outer = stats.get(&key("outer")).unwrap();
        assert_eq!(outer.total_calls, 1);
        assert!(outer.cumulative_time >= inner.cumulative_time);
        assert!(!is_active());
    }

    #[test]
    fn test_recursion_counts_primitive_calls_once() {
        fn recurse(depth: u32) {
            let _frame = enter(FrameKey::new("src/sample.rs", 1, "recurse"));
            if depth > 0 {
                recurse(depth - 1);
            }
        }

        let session = start_session();
        recurse(4);
        let stats = session.finish();

        let entry = stats.get(&key("recurse")).unwrap();
        assert_eq!(entry.total_calls, 5);
        assert_eq!(entry.primitive_calls, 1);
    }

    #[test]
    fn test_internal_time_excludes_children() {
        let session = start_session();
        {
            let _parent = enter(key("parent"));
            let _child = enter(key("child"));
            thread::sleep(Duration::from_millis(20));
        }
        let stats = session.finish();

        let parent = stats.get(&key("parent")).unwrap();
        let child = stats.get(&key("child")).unwrap();
        assert!(child.total_time >= 0.015);
        assert!(parent.total_time < child.total_time);
        assert!(parent.cumulative_time >= child.cumulative_time);
    }

    #[test]
    fn test_nested_sessions_both_record() {
        let outer = start_session();
        let _outer_frame = enter(key("outer_work"));

        let inner = start_session();
        {
            let _shared = enter(key("shared"));
        }
        let inner_stats = inner.finish();
        drop(_outer_frame);
        let outer_stats = outer.finish();

        assert!(inner_stats.get(&key("shared")).is_some());
        assert!(inner_stats.get(&key("outer_work")).is_none());
        assert!(outer_stats.get(&key("shared")).is_some());
        assert!(outer_stats.get(&key("outer_work")).is_some());
    }

    #[test]
    fn test_dropped_session_is_removed() {
        {
            let _session = start_session();
            assert!(is_active());
        }
        assert!(!is_active());
    }

    #[test]
    fn test_open_frames_closed_on_finish() {
        let session = start_session();
        let frame = enter(key("leaked"));
        std::mem::forget(frame);
        let stats = session.finish();

        assert_eq!(stats.get(&key("leaked")).unwrap().total_calls, 1);
    }
}
