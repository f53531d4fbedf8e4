#![forbid(unsafe_code)]

//! Deterministic, host-driven delayed tasks.
//!
//! The scheduler never reads a wall clock. The host reports the current
//! monotonic time through [`Scheduler::pop_due`] (or [`Scheduler::set_now`])
//! and arms its own timer for [`Scheduler::next_deadline`].
//!
//! While a due task is handed out, the scheduler's clock sits at that task's
//! due time, so work scheduled from inside the task is relative to when the
//! task was meant to run rather than when the host got around to it.
//!
//! ```
//! use core::time::Duration;
//! use adminkit_core::Scheduler;
//!
//! let mut scheduler = Scheduler::new();
//! let handle = scheduler.schedule(Duration::from_millis(500), "fade");
//! scheduler.schedule(Duration::from_millis(100), "reset");
//! assert!(scheduler.cancel(handle));
//!
//! let now = Duration::from_secs(1);
//! assert_eq!(scheduler.pop_due(now), Some("reset"));
//! assert_eq!(scheduler.pop_due(now), None);
//! ```

use core::time::Duration;

/// Identifies one scheduled task for cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskHandle(u64);

#[derive(Debug, Clone)]
struct Scheduled<T> {
    handle: TaskHandle,
    due: Duration,
    task: T,
}

/// Pending delayed tasks ordered by `(due, insertion)`.
#[derive(Debug, Clone)]
pub struct Scheduler<T> {
    now: Duration,
    next_handle: u64,
    pending: Vec<Scheduled<T>>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> {
    /// Create a scheduler whose clock starts at `0`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_handle: 0,
            pending: Vec::new(),
        }
    }

    /// Current scheduler time.
    #[must_use]
    pub const fn now(&self) -> Duration {
        self.now
    }

    /// Move the clock forward to `now`. Earlier times are ignored.
    pub fn set_now(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }

    /// Run `task` once `delay` has elapsed from the current time.
    pub fn schedule(&mut self, delay: Duration, task: T) -> TaskHandle {
        let handle = TaskHandle(self.next_handle);
        self.next_handle += 1;
        let due = self.now.saturating_add(delay);
        let at = self
            .pending
            .partition_point(|entry| (entry.due, entry.handle) <= (due, handle));
        self.pending.insert(at, Scheduled { handle, due, task });
        handle
    }

    /// Drop a pending task. Returns `false` if it already ran or was cancelled.
    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        let before = self.pending.len();
        self.pending.retain(|entry| entry.handle != handle);
        self.pending.len() != before
    }

    /// Whether `handle` is still waiting to run.
    #[must_use]
    pub fn is_pending(&self, handle: TaskHandle) -> bool {
        self.pending.iter().any(|entry| entry.handle == handle)
    }

    /// Take the earliest task due at or before `now`.
    ///
    /// The clock advances to that task's due time. Once nothing is due the
    /// clock advances to `now` and `None` is returned.
    pub fn pop_due(&mut self, now: Duration) -> Option<T> {
        match self.pending.first() {
            Some(entry) if entry.due <= now => {
                let entry = self.pending.remove(0);
                self.set_now(entry.due);
                Some(entry.task)
            }
            _ => {
                self.set_now(now);
                None
            }
        }
    }

    /// Earliest due time among pending tasks.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.pending.first().map(|entry| entry.due)
    }

    /// Number of pending tasks.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn drain<T>(scheduler: &mut Scheduler<T>, now: Duration) -> Vec<T> {
        let mut out = Vec::new();
        while let Some(task) = scheduler.pop_due(now) {
            out.push(task);
        }
        out
    }

    #[test]
    fn tasks_run_in_due_then_insertion_order() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(ms(30), "c");
        scheduler.schedule(ms(10), "a");
        scheduler.schedule(ms(10), "b");
        assert_eq!(scheduler.next_deadline(), Some(ms(10)));
        assert_eq!(drain(&mut scheduler, ms(100)), vec!["a", "b", "c"]);
        assert_eq!(scheduler.now(), ms(100));
    }

    #[test]
    fn nothing_runs_early() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(ms(5000), ());
        assert_eq!(scheduler.pop_due(ms(4999)), None);
        assert_eq!(scheduler.pending(), 1);
        assert_eq!(scheduler.pop_due(ms(5000)), Some(()));
    }

    #[test]
    fn nested_schedules_are_relative_to_due_time() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(ms(5000), "fade");
        // Host wakes up late.
        assert_eq!(scheduler.pop_due(ms(5400)), Some("fade"));
        assert_eq!(scheduler.now(), ms(5000));
        scheduler.schedule(ms(550), "remove");
        assert_eq!(scheduler.next_deadline(), Some(ms(5550)));
        assert_eq!(scheduler.pop_due(ms(5400)), None);
        assert_eq!(scheduler.pop_due(ms(5550)), Some("remove"));
    }

    #[test]
    fn cancel_is_single_shot() {
        let mut scheduler = Scheduler::new();
        let handle = scheduler.schedule(ms(8000), "reset");
        assert!(scheduler.is_pending(handle));
        assert!(scheduler.cancel(handle));
        assert!(!scheduler.cancel(handle));
        assert_eq!(scheduler.next_deadline(), None);
    }

    #[test]
    fn clock_never_runs_backwards() {
        let mut scheduler: Scheduler<()> = Scheduler::new();
        scheduler.set_now(ms(200));
        scheduler.set_now(ms(100));
        assert_eq!(scheduler.now(), ms(200));
        assert_eq!(scheduler.pop_due(ms(50)), None);
        assert_eq!(scheduler.now(), ms(200));
    }
}
