//! Virtual time for the single-threaded UI loop.
//!
//! Components never sleep. They own a [`TimerSet`], schedule deadlines against
//! the session clock and are driven forward with `advance_to(now)`, handling
//! each expiry at its own deadline.

use std::time::Duration;

/// Monotonic session clock measured from the moment the session started.
#[derive(Debug, Default, Clone)]
pub struct SessionClock {
    now: Duration,
}

impl SessionClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn reset(&mut self) {
        self.now = Duration::ZERO;
    }

    pub fn advance(&mut self, delta: Duration) {
        self.now += delta;
    }

    /// Moves the clock to `time`. Earlier timestamps are ignored so the clock
    /// never runs backwards.
    pub fn advance_to(&mut self, time: Duration) -> Duration {
        self.now = self.now.max(time);
        self.now
    }
}

/// Handle to a scheduled timer. Only valid for the [`TimerSet`] that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

/// A timer that reached its deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Expired<K> {
    pub id: TimerId,
    pub kind: K,
    /// The deadline the timer fired at, not the time the caller advanced to.
    pub at: Duration,
}

#[derive(Debug, Clone)]
struct TimerEntry<K> {
    id: TimerId,
    kind: K,
    deadline: Duration,
    period: Option<Duration>,
}

/// Component-scoped collection of cancelable one-shot and repeating timers.
#[derive(Debug)]
pub struct TimerSet<K> {
    entries: Vec<TimerEntry<K>>,
    next_id: u64,
}

impl<K> Default for TimerSet<K> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 0,
        }
    }
}

impl<K: Copy> TimerSet<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fires once at `now + delay`.
    pub fn schedule_once(&mut self, kind: K, now: Duration, delay: Duration) -> TimerId {
        self.insert(kind, now + delay, None)
    }

    /// Fires every `period`, first at `now + period`. A zero period is
    /// clamped to one millisecond.
    pub fn schedule_every(&mut self, kind: K, now: Duration, period: Duration) -> TimerId {
        let period = period.max(Duration::from_millis(1));
        self.insert(kind, now + period, Some(period))
    }

    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        self.entries.len() != before
    }

    pub fn cancel_all(&mut self) {
        self.entries.clear();
    }

    pub fn is_scheduled(&self, id: TimerId) -> bool {
        self.entries.iter().any(|entry| entry.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.entries.iter().map(|entry| entry.deadline).min()
    }

    /// Takes the earliest timer due at or before `now`. Ties fire in the order
    /// they were scheduled. Repeating timers are re-armed one period later
    /// and keep their id.
    pub fn pop_due(&mut self, now: Duration) -> Option<Expired<K>> {
        let position = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.deadline <= now)
            .min_by_key(|(_, entry)| (entry.deadline, entry.id))
            .map(|(position, _)| position)?;

        let entry = &mut self.entries[position];
        let expired = Expired {
            id: entry.id,
            kind: entry.kind,
            at: entry.deadline,
        };
        let period = entry.period;

        match period {
            Some(period) => self.entries[position].deadline += period,
            None => {
                self.entries.swap_remove(position);
            }
        }

        Some(expired)
    }

    fn insert(&mut self, kind: K, deadline: Duration, period: Option<Duration>) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.entries.push(TimerEntry {
            id,
            kind,
            deadline,
            period,
        });
        id
    }
}
