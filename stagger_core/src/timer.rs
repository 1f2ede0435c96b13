// Copyright 2026 the Stagger Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deadline-ordered timer queue.
//!
//! [`TimerQueue`] is the single scheduling primitive every time-driven
//! behavior in this crate builds on: staggered reveal starts, notification
//! show/hide cycles, and anything else that needs a callback "no earlier
//! than" a deadline.
//!
//! The queue is pumped, not callback-driven: each host tick calls
//! [`pop_due`](TimerQueue::pop_due) in a loop and routes the returned
//! [`TimerFire`]s to their owners. This keeps the whole engine on one
//! logical thread and makes cancellation a plain data operation — there is
//! no callback to race against.
//!
//! Timers are addressed by generational [`TimerId`] handles. Slots are
//! recycled through a free list; a fired or cancelled one-shot bumps its
//! slot generation, so stale handles are rejected rather than cancelling an
//! unrelated later timer. Cancellation is idempotent on every exit path.
//!
//! # Ordering
//!
//! `pop_due` returns fires in deadline order; equal deadlines resolve by
//! slot index, which for non-recycled slots is schedule order. Deadlines are
//! lower bounds only — a fire is delivered on the first pump at or after its
//! deadline, never before.

use alloc::vec::Vec;

use core::fmt;

use crate::time::{Duration, Instant};

/// A handle to a scheduled timer.
///
/// Carries a slot index and a generation counter; the handle goes stale when
/// the timer fires (one-shot), is cancelled, or the queue is cleared.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId {
    idx: u32,
    generation: u32,
}

impl fmt::Debug for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TimerId({}@gen{})", self.idx, self.generation)
    }
}

/// A due timer returned by [`TimerQueue::pop_due`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimerFire {
    /// The timer that fired. For one-shot timers the handle is already stale
    /// by the time the fire is returned; it is still valid for routing by
    /// equality against stored handles.
    pub id: TimerId,
    /// The deadline the timer was armed for (not the pump time, which may be
    /// later).
    pub deadline: Instant,
}

/// Deadline-ordered queue of one-shot and repeating timers.
#[derive(Debug)]
pub struct TimerQueue {
    deadline: Vec<Instant>,
    /// `Some` for repeating timers; the re-arm period.
    period: Vec<Option<Duration>>,
    armed: Vec<bool>,
    generation: Vec<u32>,
    free_list: Vec<u32>,
    len: u32,
}

impl Default for TimerQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl TimerQueue {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self {
            deadline: Vec::new(),
            period: Vec::new(),
            armed: Vec::new(),
            generation: Vec::new(),
            free_list: Vec::new(),
            len: 0,
        }
    }

    /// Schedules a one-shot timer for the given deadline.
    pub fn schedule_at(&mut self, deadline: Instant) -> TimerId {
        self.insert(deadline, None)
    }

    /// Schedules a repeating timer. The first fire is due at `first`; each
    /// subsequent fire is due `every` after the previous *deadline* (fixed
    /// cadence — a slow host catches up rather than drifting).
    pub fn schedule_repeating(&mut self, first: Instant, every: Duration) -> TimerId {
        self.insert(first, Some(every))
    }

    fn insert(&mut self, deadline: Instant, period: Option<Duration>) -> TimerId {
        let idx = if let Some(idx) = self.free_list.pop() {
            self.deadline[idx as usize] = deadline;
            self.period[idx as usize] = period;
            self.armed[idx as usize] = true;
            idx
        } else {
            let idx = self.len;
            self.len += 1;
            self.deadline.push(deadline);
            self.period.push(period);
            self.armed.push(true);
            self.generation.push(0);
            idx
        };
        TimerId {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    /// Cancels a timer. Returns `true` if the handle referred to an armed
    /// timer; stale or already-fired handles return `false` (cancellation is
    /// idempotent).
    pub fn cancel(&mut self, id: TimerId) -> bool {
        if !self.is_armed(id) {
            return false;
        }
        self.release(id.idx);
        true
    }

    /// Returns whether the handle refers to a currently armed timer.
    #[must_use]
    pub fn is_armed(&self, id: TimerId) -> bool {
        (id.idx < self.len)
            && self.armed[id.idx as usize]
            && self.generation[id.idx as usize] == id.generation
    }

    /// Returns the number of currently armed timers.
    #[must_use]
    pub fn armed_count(&self) -> usize {
        self.armed.iter().filter(|&&a| a).count()
    }

    /// Returns the earliest armed deadline, for hosts that sleep between
    /// pumps.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        let mut next: Option<Instant> = None;
        for idx in 0..self.len as usize {
            if self.armed[idx] && next.is_none_or(|d| self.deadline[idx] < d) {
                next = Some(self.deadline[idx]);
            }
        }
        next
    }

    /// Pops the earliest timer whose deadline is at or before `now`.
    ///
    /// Returns `None` when nothing is due. Call in a loop each pump so that
    /// several timers due within one tick all fire, in deadline order.
    /// Repeating timers are re-armed (same handle) before their fire is
    /// returned; one-shot timers are released and their handle goes stale.
    pub fn pop_due(&mut self, now: Instant) -> Option<TimerFire> {
        let mut best: Option<u32> = None;
        for idx in 0..self.len {
            if !self.armed[idx as usize] || self.deadline[idx as usize] > now {
                continue;
            }
            // Earliest deadline wins; ties break toward the lower slot.
            if best.is_none_or(|b| self.deadline[idx as usize] < self.deadline[b as usize]) {
                best = Some(idx);
            }
        }

        let idx = best?;
        let deadline = self.deadline[idx as usize];
        let id = TimerId {
            idx,
            generation: self.generation[idx as usize],
        };

        match self.period[idx as usize] {
            Some(every) => {
                self.deadline[idx as usize] = deadline.saturating_add(every);
            }
            None => self.release(idx),
        }

        Some(TimerFire { id, deadline })
    }

    /// Cancels every armed timer. Used on teardown so no callback outlives
    /// its owner.
    pub fn clear(&mut self) {
        for idx in 0..self.len {
            if self.armed[idx as usize] {
                self.release(idx);
            }
        }
    }

    /// Disarms a slot, bumps its generation, and recycles it.
    fn release(&mut self, idx: u32) {
        self.armed[idx as usize] = false;
        self.generation[idx as usize] += 1;
        self.free_list.push(idx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_shot_fires_once_at_deadline() {
        let mut q = TimerQueue::new();
        let id = q.schedule_at(Instant::from_millis(100));

        assert!(q.pop_due(Instant::from_millis(99)).is_none());

        let fire = q.pop_due(Instant::from_millis(100)).unwrap();
        assert_eq!(fire.id, id);
        assert_eq!(fire.deadline, Instant::from_millis(100));

        // Handle is stale after the fire.
        assert!(!q.is_armed(id));
        assert!(q.pop_due(Instant::from_millis(200)).is_none());
    }

    #[test]
    fn fires_in_deadline_order() {
        let mut q = TimerQueue::new();
        let late = q.schedule_at(Instant::from_millis(300));
        let early = q.schedule_at(Instant::from_millis(100));
        let mid = q.schedule_at(Instant::from_millis(200));

        let now = Instant::from_millis(500);
        assert_eq!(q.pop_due(now).unwrap().id, early);
        assert_eq!(q.pop_due(now).unwrap().id, mid);
        assert_eq!(q.pop_due(now).unwrap().id, late);
        assert!(q.pop_due(now).is_none());
    }

    #[test]
    fn equal_deadlines_fire_in_schedule_order() {
        let mut q = TimerQueue::new();
        let first = q.schedule_at(Instant::from_millis(100));
        let second = q.schedule_at(Instant::from_millis(100));

        let now = Instant::from_millis(100);
        assert_eq!(q.pop_due(now).unwrap().id, first);
        assert_eq!(q.pop_due(now).unwrap().id, second);
    }

    #[test]
    fn repeating_timer_keeps_cadence() {
        let mut q = TimerQueue::new();
        let id = q.schedule_repeating(Instant::from_millis(45_000), Duration::from_millis(45_000));

        let fire = q.pop_due(Instant::from_millis(45_010)).unwrap();
        assert_eq!(fire.id, id);
        assert_eq!(fire.deadline, Instant::from_millis(45_000));
        assert!(q.is_armed(id), "repeating timer stays armed");

        // Re-armed relative to the deadline, not the (late) pump time.
        assert_eq!(q.next_deadline(), Some(Instant::from_millis(90_000)));
    }

    #[test]
    fn late_pump_delivers_missed_repeats_in_order() {
        let mut q = TimerQueue::new();
        let id = q.schedule_repeating(Instant::from_millis(10), Duration::from_millis(10));

        // Pump after three periods have elapsed: three fires, oldest first.
        let now = Instant::from_millis(30);
        assert_eq!(q.pop_due(now).unwrap().deadline, Instant::from_millis(10));
        assert_eq!(q.pop_due(now).unwrap().deadline, Instant::from_millis(20));
        assert_eq!(q.pop_due(now).unwrap().deadline, Instant::from_millis(30));
        assert!(q.pop_due(now).is_none());
        assert!(q.is_armed(id));
    }

    #[test]
    fn cancel_is_idempotent() {
        let mut q = TimerQueue::new();
        let id = q.schedule_at(Instant::from_millis(100));

        assert!(q.cancel(id));
        assert!(!q.cancel(id), "second cancel is a no-op");
        assert!(q.pop_due(Instant::from_millis(200)).is_none());
    }

    #[test]
    fn stale_handle_does_not_cancel_recycled_slot() {
        let mut q = TimerQueue::new();
        let old = q.schedule_at(Instant::from_millis(100));
        assert!(q.cancel(old));

        // Recycles the same slot with a bumped generation.
        let new = q.schedule_at(Instant::from_millis(200));
        assert!(!q.cancel(old), "stale handle must not hit the new timer");
        assert!(q.is_armed(new));
    }

    #[test]
    fn cancel_repeating_stops_the_cycle() {
        let mut q = TimerQueue::new();
        let id = q.schedule_repeating(Instant::from_millis(50), Duration::from_millis(50));
        let _ = q.pop_due(Instant::from_millis(50)).unwrap();

        assert!(q.cancel(id));
        assert!(q.pop_due(Instant::from_millis(1_000)).is_none());
    }

    #[test]
    fn clear_disarms_everything() {
        let mut q = TimerQueue::new();
        let a = q.schedule_at(Instant::from_millis(10));
        let b = q.schedule_repeating(Instant::from_millis(20), Duration::from_millis(20));

        q.clear();
        assert_eq!(q.armed_count(), 0);
        assert!(!q.is_armed(a));
        assert!(!q.is_armed(b));
        assert!(q.pop_due(Instant::from_millis(1_000)).is_none());
    }

    #[test]
    fn next_deadline_tracks_earliest() {
        let mut q = TimerQueue::new();
        assert_eq!(q.next_deadline(), None);

        let _ = q.schedule_at(Instant::from_millis(300));
        let early = q.schedule_at(Instant::from_millis(100));
        assert_eq!(q.next_deadline(), Some(Instant::from_millis(100)));

        assert!(q.cancel(early));
        assert_eq!(q.next_deadline(), Some(Instant::from_millis(300)));
    }

    #[test]
    fn mixed_one_shot_and_repeating() {
        let mut q = TimerQueue::new();
        let shot = q.schedule_at(Instant::from_millis(30));
        let rep = q.schedule_repeating(Instant::from_millis(20), Duration::from_millis(25));

        let now = Instant::from_millis(50);
        assert_eq!(q.pop_due(now).unwrap().id, rep); // due 20
        assert_eq!(q.pop_due(now).unwrap().id, shot); // due 30
        assert_eq!(q.pop_due(now).unwrap().id, rep); // due 45
        assert!(q.pop_due(now).is_none());
    }
}
