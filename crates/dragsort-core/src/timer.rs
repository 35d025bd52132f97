#![forbid(unsafe_code)]

//! Deterministic, host-advanced time.
//!
//! Nothing here sleeps or spawns. The host owns the clock and tells the
//! controller what time it is; deferred work sits in a [`TimerQueue`] until
//! the host drains it with [`TimerQueue::pop_due`].
//!
//! # Invariants
//!
//! 1. A [`TimerId`] is never reused within one queue.
//! 2. Due timers pop in deadline order; equal deadlines pop in scheduling order.
//! 3. A cancelled timer never pops.

use web_time::Duration;

/// Monotonic clock controlled by the host.
#[derive(Debug, Default, Clone)]
pub struct DeterministicClock {
    now: Duration,
}

impl DeterministicClock {
    /// Create a clock starting at `0`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            now: Duration::ZERO,
        }
    }

    /// Current monotonic time.
    #[must_use]
    pub const fn now(&self) -> Duration {
        self.now
    }

    /// Set current monotonic time.
    pub fn set(&mut self, now: Duration) {
        self.now = now;
    }

    /// Advance monotonic time by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        self.now = self.now.saturating_add(dt);
    }
}

/// Handle to one scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

impl TimerId {
    /// Raw sequence number.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone)]
struct TimerEntry<K> {
    id: TimerId,
    deadline: Duration,
    kind: K,
}

/// Pending one-shot timers tagged with a payload `K`.
#[derive(Debug, Clone)]
pub struct TimerQueue<K> {
    entries: Vec<TimerEntry<K>>,
    next_id: u64,
}

impl<K> Default for TimerQueue<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> TimerQueue<K> {
    /// Create an empty queue.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 1,
        }
    }

    /// Schedule `kind` to fire at `deadline`.
    pub fn schedule(&mut self, deadline: Duration, kind: K) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        #[cfg(feature = "tracing")]
        tracing::trace!(timer = id.0, deadline_us = deadline.as_micros() as u64, "timer scheduled");
        self.entries.push(TimerEntry { id, deadline, kind });
        id
    }

    /// Cancel a pending timer, returning its payload if it was still pending.
    pub fn cancel(&mut self, id: TimerId) -> Option<K> {
        let pos = self.entries.iter().position(|entry| entry.id == id)?;
        #[cfg(feature = "tracing")]
        tracing::trace!(timer = id.0, "timer cancelled");
        Some(self.entries.swap_remove(pos).kind)
    }

    /// Whether `id` is still pending.
    #[must_use]
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.entries.iter().any(|entry| entry.id == id)
    }

    /// Earliest pending deadline.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.entries.iter().map(|entry| entry.deadline).min()
    }

    /// Remove and return the earliest timer due at `now`, if any.
    pub fn pop_due(&mut self, now: Duration) -> Option<(TimerId, K)> {
        let pos = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.deadline <= now)
            .min_by_key(|(_, entry)| (entry.deadline, entry.id))
            .map(|(pos, _)| pos)?;
        let entry = self.entries.swap_remove(pos);
        Some((entry.id, entry.kind))
    }

    /// Remove every pending timer, returning the payloads in scheduling order.
    pub fn drain(&mut self) -> Vec<K> {
        let mut entries = std::mem::take(&mut self.entries);
        entries.sort_by_key(|entry| entry.id);
        entries.into_iter().map(|entry| entry.kind).collect()
    }

    /// Number of pending timers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
