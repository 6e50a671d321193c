use std::{
    cell::{Cell, RefCell},
    fmt,
    rc::Rc,
    time::Duration,
};

use gloo_timers::callback::Timeout;
use tracing::trace;

/// Runs a task once after a delay. Dropping the returned handle cancels the task if it has
/// not run yet.
pub trait Scheduler {
    type Handle;

    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) -> Self::Handle;
}

/// Browser `setTimeout` via `gloo-timers`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeoutScheduler;

impl Scheduler for TimeoutScheduler {
    type Handle = Timeout;

    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) -> Self::Handle {
        let millis = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);
        Timeout::new(millis, task)
    }
}

/// Collapses a burst of calls into a single invocation of `callback` with the arguments of the
/// last call, once `wait` has passed without a new call.
///
/// At most one invocation is pending at a time; each call cancels it and starts a fresh delay.
pub struct Debouncer<A, S: Scheduler> {
    scheduler: S,
    wait: Duration,
    callback: Rc<dyn Fn(A)>,
    pending: RefCell<Option<S::Handle>>,
    // Set while a scheduled call has neither run nor been cancelled
    armed: Rc<Cell<bool>>,
}

impl<A: 'static, S: Scheduler> Debouncer<A, S> {
    pub fn new(scheduler: S, wait: Duration, callback: impl Fn(A) + 'static) -> Self {
        Self {
            scheduler,
            wait,
            callback: Rc::new(callback),
            pending: RefCell::new(None),
            armed: Rc::new(Cell::new(false)),
        }
    }

    pub fn call(&self, args: A) {
        let callback = self.callback.clone();
        let armed = self.armed.clone();
        let handle = self.scheduler.schedule(
            self.wait,
            Box::new(move || {
                armed.set(false);
                callback(args);
            }),
        );

        if self.armed.replace(true) {
            trace!(wait_ms = self.wait.as_millis() as u64, "Debounce timer reset");
        }
        // Replacing the previous handle drops it, which cancels the superseded call.
        self.pending.replace(Some(handle));
    }

    pub fn cancel(&self) {
        self.armed.set(false);
        self.pending.take();
    }
}

impl<A, S: Scheduler> Debouncer<A, S> {
    /// Whether a call is waiting for its quiet window to pass.
    pub fn is_pending(&self) -> bool {
        self.armed.get()
    }
}

impl<A, S: Scheduler> fmt::Debug for Debouncer<A, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Debouncer")
            .field("wait", &self.wait)
            .field("pending", &self.is_pending())
            .finish_non_exhaustive()
    }
}

#[cfg(any(test, feature = "test-utils"))]
mod manual {
    use std::{
        cell::{Cell, RefCell},
        rc::Rc,
        time::Duration,
    };

    use super::Scheduler;

    struct Task {
        due: Duration,
        seq: u64,
        cancelled: Rc<Cell<bool>>,
        run: Box<dyn FnOnce()>,
    }

    #[derive(Default)]
    struct Clock {
        now: Duration,
        seq: u64,
        tasks: Vec<Task>,
    }

    /// A scheduler driven by [`ManualScheduler::advance`] instead of wall-clock time.
    #[derive(Clone, Default)]
    pub struct ManualScheduler {
        clock: Rc<RefCell<Clock>>,
    }

    /// Cancels its task when dropped.
    #[derive(Debug)]
    pub struct ManualHandle {
        cancelled: Rc<Cell<bool>>,
    }

    impl Drop for ManualHandle {
        fn drop(&mut self) {
            self.cancelled.set(true);
        }
    }

    impl std::fmt::Debug for ManualScheduler {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            let clock = self.clock.borrow();
            f.debug_struct("ManualScheduler")
                .field("now", &clock.now)
                .field("tasks", &clock.tasks.len())
                .finish()
        }
    }

    impl ManualScheduler {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn now(&self) -> Duration {
            self.clock.borrow().now
        }

        /// Tasks that are scheduled and not cancelled.
        pub fn pending(&self) -> usize {
            self.clock
                .borrow()
                .tasks
                .iter()
                .filter(|task| !task.cancelled.get())
                .count()
        }

        /// Moves the clock forward, running every task that falls due in order.
        pub fn advance(&self, by: Duration) {
            let target = self.clock.borrow().now + by;
            while let Some(task) = self.next_due(target) {
                {
                    let mut clock = self.clock.borrow_mut();
                    clock.now = clock.now.max(task.due);
                }
                (task.run)();
            }
            self.clock.borrow_mut().now = target;
        }

        fn next_due(&self, target: Duration) -> Option<Task> {
            let mut clock = self.clock.borrow_mut();
            clock.tasks.retain(|task| !task.cancelled.get());
            let index = clock
                .tasks
                .iter()
                .enumerate()
                .filter(|(_, task)| task.due <= target)
                .min_by_key(|(_, task)| (task.due, task.seq))
                .map(|(index, _)| index)?;
            Some(clock.tasks.remove(index))
        }
    }

    impl Scheduler for ManualScheduler {
        type Handle = ManualHandle;

        fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) -> Self::Handle {
            let cancelled = Rc::new(Cell::new(false));
            let mut clock = self.clock.borrow_mut();
            let due = clock.now + delay;
            let seq = clock.seq;
            clock.seq += 1;
            clock.tasks.push(Task {
                due,
                seq,
                cancelled: cancelled.clone(),
                run: task,
            });
            ManualHandle { cancelled }
        }
    }
}

#[cfg(any(test, feature = "test-utils"))]
pub use manual::{ManualHandle, ManualScheduler};
