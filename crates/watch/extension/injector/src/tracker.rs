use std::time::Duration;

use tracing::trace;
use watch_primitives::{Debouncer, Scheduler};

/// Remembers the last seen `location.pathname`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTracker {
    last: String,
}

impl PathTracker {
    pub fn new(path: impl Into<String>) -> Self {
        Self { last: path.into() }
    }

    /// Records `path` and reports whether it differs from the previous one.
    pub fn observe(&mut self, path: &str) -> bool {
        if self.last == path {
            return false;
        }
        self.last.clear();
        self.last.push_str(path);
        true
    }

    pub fn last(&self) -> &str {
        &self.last
    }
}

/// Turns DOM mutations into debounced channel lookups, skipping mutations that left the path
/// unchanged.
#[derive(Debug)]
pub struct PageWatcher<S: Scheduler> {
    tracker: PathTracker,
    debouncer: Debouncer<(), S>,
}

impl<S: Scheduler> PageWatcher<S> {
    pub fn new(
        initial_path: impl Into<String>,
        scheduler: S,
        wait: Duration,
        on_change: impl Fn() + 'static,
    ) -> Self {
        Self {
            tracker: PathTracker::new(initial_path),
            debouncer: Debouncer::new(scheduler, wait, move |()| on_change()),
        }
    }

    pub fn on_mutation(&mut self, path: &str) {
        if self.tracker.observe(path) {
            trace!(path, "Path changed");
            self.debouncer.call(());
        }
    }
}
