//! Timer queue for debounce, delay and countdown tasks
//!
//! Everything runs on one event loop. The embedder drives a monotonic
//! millisecond clock; a controller drains due tasks with
//! [`TimerQueue::pop_due`] and then [`TimerQueue::settle`]s the clock.
//! A task fired at deadline `d` observes `now() == d`, so follow-up tasks
//! scheduled from its handler are placed relative to `d`.
//!
//! [`TimerQueue::schedule`] counts from the queue clock, so an event handler
//! must drain and settle up to the event's time before scheduling.

use core::sync::atomic::{AtomicU64, Ordering};
use core::time::Duration;
use std::collections::BTreeMap;

use hashbrown::HashMap;

/// A point on the event loop's monotonic clock
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Instant {
    millis: u64,
}

impl Instant {
    /// Start of the clock.
    pub const ZERO: Instant = Instant { millis: 0 };

    /// Instant `millis` milliseconds after the start of the clock.
    pub const fn from_millis(millis: u64) -> Self {
        Self { millis }
    }

    /// Milliseconds since the start of the clock.
    pub fn as_millis(&self) -> u64 {
        self.millis
    }

    /// Duration since the given instant (zero if `earlier` is later).
    pub fn duration_since(&self, earlier: Instant) -> Duration {
        Duration::from_millis(self.millis.saturating_sub(earlier.millis))
    }

    /// Returns `Some(t)` if `t` is representable.
    pub fn checked_add(&self, duration: Duration) -> Option<Instant> {
        let millis = u64::try_from(duration.as_millis()).ok()?;
        self.millis
            .checked_add(millis)
            .map(|millis| Instant { millis })
    }
}

impl core::ops::Add<Duration> for Instant {
    type Output = Instant;

    fn add(self, rhs: Duration) -> Instant {
        self.checked_add(rhs).unwrap_or(Instant { millis: u64::MAX })
    }
}

impl core::ops::Sub<Instant> for Instant {
    type Output = Duration;

    fn sub(self, rhs: Instant) -> Duration {
        self.duration_since(rhs)
    }
}

static NEXT_TASK_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a scheduled task.
///
/// Ids grow monotonically, so two tasks with the same deadline fire in the
/// order they were scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskId(u64);

impl TaskId {
    fn new() -> Self {
        Self(NEXT_TASK_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Get raw value
    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// Cancellable one-shot tasks ordered by deadline.
#[derive(Debug)]
pub struct TimerQueue<T> {
    now: Instant,
    tasks: BTreeMap<(Instant, TaskId), T>,
    deadlines: HashMap<TaskId, Instant>,
}

impl<T> TimerQueue<T> {
    /// Create an empty queue at the start of the clock.
    pub fn new() -> Self {
        Self {
            now: Instant::ZERO,
            tasks: BTreeMap::new(),
            deadlines: HashMap::new(),
        }
    }

    /// Current time as last observed by the queue.
    pub fn now(&self) -> Instant {
        self.now
    }

    /// Schedule `task` to fire `delay` from now.
    pub fn schedule(&mut self, delay: Duration, task: T) -> TaskId {
        let id = TaskId::new();
        let deadline = self.now + delay;
        self.tasks.insert((deadline, id), task);
        self.deadlines.insert(id, deadline);
        log::trace!("[Timer] scheduled #{} at {}ms", id.raw(), deadline.as_millis());
        id
    }

    /// Cancel a pending task, returning it if it had not fired yet.
    pub fn cancel(&mut self, id: TaskId) -> Option<T> {
        let deadline = self.deadlines.remove(&id)?;
        log::trace!("[Timer] cancelled #{}", id.raw());
        self.tasks.remove(&(deadline, id))
    }

    /// Whether the task is still waiting to fire.
    pub fn is_pending(&self, id: TaskId) -> bool {
        self.deadlines.contains_key(&id)
    }

    /// Deadline of the earliest pending task.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.tasks.keys().next().map(|(deadline, _)| *deadline)
    }

    /// Remove and return the earliest task due at or before `until`.
    ///
    /// The queue clock moves to the task's deadline.
    pub fn pop_due(&mut self, until: Instant) -> Option<(TaskId, T)> {
        let key = *self.tasks.keys().next()?;
        if key.0 > until {
            return None;
        }
        let task = self.tasks.remove(&key)?;
        self.deadlines.remove(&key.1);
        if key.0 > self.now {
            self.now = key.0;
        }
        Some((key.1, task))
    }

    /// Move the clock forward to `until` once all due tasks are drained.
    pub fn settle(&mut self, until: Instant) {
        if until > self.now {
            self.now = until;
        }
    }

    /// Number of pending tasks.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether no task is pending.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn fires_in_deadline_order() {
        let mut queue = TimerQueue::new();
        queue.schedule(ms(300), "late");
        queue.schedule(ms(100), "early");

        let (_, first) = queue.pop_due(Instant::from_millis(1000)).unwrap();
        let (_, second) = queue.pop_due(Instant::from_millis(1000)).unwrap();
        assert_eq!(first, "early");
        assert_eq!(second, "late");
        assert!(queue.pop_due(Instant::from_millis(1000)).is_none());
    }

    #[test]
    fn same_deadline_keeps_schedule_order() {
        let mut queue = TimerQueue::new();
        queue.schedule(ms(50), 1);
        queue.schedule(ms(50), 2);
        queue.schedule(ms(50), 3);

        let order: Vec<i32> = core::iter::from_fn(|| queue.pop_due(Instant::from_millis(50)))
            .map(|(_, v)| v)
            .collect();
        assert_eq!(order, vec![1, 2, 3]);
    }

    #[test]
    fn not_due_before_deadline() {
        let mut queue = TimerQueue::new();
        queue.schedule(ms(300), ());
        assert!(queue.pop_due(Instant::from_millis(299)).is_none());
        assert!(queue.pop_due(Instant::from_millis(300)).is_some());
    }

    #[test]
    fn cancel_removes_task() {
        let mut queue = TimerQueue::new();
        let id = queue.schedule(ms(10), "x");
        assert!(queue.is_pending(id));
        assert_eq!(queue.cancel(id), Some("x"));
        assert!(!queue.is_pending(id));
        assert!(queue.cancel(id).is_none());
        assert!(queue.is_empty());
    }

    #[test]
    fn clock_follows_fired_deadline() {
        let mut queue = TimerQueue::new();
        queue.schedule(ms(1000), "tick");
        let _ = queue.pop_due(Instant::from_millis(5000));
        assert_eq!(queue.now(), Instant::from_millis(1000));

        // follow-up scheduled from the handler is relative to the deadline
        queue.schedule(ms(1000), "tick");
        assert_eq!(queue.next_deadline(), Some(Instant::from_millis(2000)));

        queue.settle(Instant::from_millis(5000));
        assert_eq!(queue.now(), Instant::from_millis(5000));
    }

    #[test]
    fn settle_never_moves_backwards() {
        let mut queue: TimerQueue<()> = TimerQueue::new();
        queue.settle(Instant::from_millis(100));
        queue.settle(Instant::from_millis(40));
        assert_eq!(queue.now(), Instant::from_millis(100));
    }

    #[test]
    fn instant_arithmetic() {
        let a = Instant::from_millis(250);
        let b = a + ms(50);
        assert_eq!(b.as_millis(), 300);
        assert_eq!(b - a, ms(50));
        assert_eq!(a - b, Duration::ZERO);
    }
}
