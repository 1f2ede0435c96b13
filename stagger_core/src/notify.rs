// Copyright 2026 the Stagger Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Timed notification tooltip scheduling.
//!
//! [`NotificationScheduler`] drives a dismissible tooltip attached to a
//! persistent anchor control (a floating action button): show it a fixed
//! delay after mount, auto-hide it after a visible window, and re-show it on
//! a repeating reminder interval for as long as the page is mounted.
//!
//! The state machine is `Idle → PendingFirstShow → Visible ⇄ Hidden`, with
//! a *suspended* overlay while the pointer is over the anchor:
//!
//! - Entering suspension forces the tooltip visible (the user is engaging)
//!   and blocks every timer-driven hide until suspension ends. The blocked
//!   auto-hide fire is consumed, not deferred; after the pointer leaves, the
//!   tooltip stays up until the next timer-driven or explicit hide.
//! - `suspended` is re-read at the instant each timer fires, never at
//!   schedule time — pointer state may have changed in between.
//!
//! Explicit dismissal hides immediately and cancels only the pending
//! auto-hide; the repeating reminder keeps running, so the tooltip comes
//! back on the next interval even right after being dismissed. That is the
//! shipped behavior, pinned by `dismiss_does_not_stop_repeat_cycle` below.
//!
//! [`unmount`](NotificationScheduler::unmount) cancels the initial, repeat,
//! and auto-hide timers — all three, on every exit path — so no callback
//! ever fires against a torn-down view.

use crate::target::{TargetId, TargetStore};
use crate::time::{Duration, Instant};
use crate::timer::{TimerFire, TimerId, TimerQueue};

/// Timing configuration for the notification cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NotificationConfig {
    /// Delay from mount to the first show.
    pub initial_delay: Duration,
    /// How long each show stays up before auto-hiding.
    pub visible_duration: Duration,
    /// Interval between reminder re-shows.
    pub repeat_interval: Duration,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(2),
            visible_duration: Duration::from_secs(6),
            repeat_interval: Duration::from_secs(45),
        }
    }
}

/// Lifecycle phase of the notification tooltip.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotificationPhase {
    /// Not mounted; no timers armed.
    Idle,
    /// Mounted, waiting out the initial delay.
    PendingFirstShow,
    /// Tooltip is up.
    Visible,
    /// Tooltip is down, reminder timer still running.
    Hidden,
}

/// Schedules the show/hide cycle of a dismissible notification tooltip.
#[derive(Debug)]
pub struct NotificationScheduler {
    config: NotificationConfig,
    /// The tooltip element whose shown flag this scheduler drives.
    tooltip: TargetId,
    phase: NotificationPhase,
    suspended: bool,
    initial_timer: Option<TimerId>,
    repeat_timer: Option<TimerId>,
    hide_timer: Option<TimerId>,
}

impl NotificationScheduler {
    /// Creates an unmounted scheduler for the given tooltip target.
    #[must_use]
    pub fn new(tooltip: TargetId, config: NotificationConfig) -> Self {
        Self {
            config,
            tooltip,
            phase: NotificationPhase::Idle,
            suspended: false,
            initial_timer: None,
            repeat_timer: None,
            hide_timer: None,
        }
    }

    /// Arms the initial and repeating timers and hides the tooltip.
    ///
    /// # Panics
    ///
    /// Panics if the scheduler is already mounted.
    pub fn mount(&mut self, now: Instant, timers: &mut TimerQueue, store: &mut TargetStore) {
        assert!(
            self.phase == NotificationPhase::Idle,
            "notification scheduler already mounted"
        );
        if store.is_alive(self.tooltip) {
            store.set_shown(self.tooltip, false);
        }
        self.phase = NotificationPhase::PendingFirstShow;
        self.initial_timer = Some(timers.schedule_at(now + self.config.initial_delay));
        self.repeat_timer = Some(timers.schedule_repeating(
            now + self.config.repeat_interval,
            self.config.repeat_interval,
        ));
    }

    /// Routes a timer fire. Returns whether the fire belonged to this
    /// scheduler.
    ///
    /// `suspended` is checked here, at fire time — a show suppressed by
    /// suspension is skipped, and a blocked auto-hide is consumed.
    pub fn on_timer(
        &mut self,
        fire: &TimerFire,
        now: Instant,
        timers: &mut TimerQueue,
        store: &mut TargetStore,
    ) -> bool {
        if self.initial_timer == Some(fire.id) {
            self.initial_timer = None;
            if !self.suspended {
                self.show(now, timers, store);
            }
            return true;
        }
        if self.repeat_timer == Some(fire.id) {
            // Repeating: the queue has already re-armed this handle.
            if !self.suspended {
                self.show(now, timers, store);
            }
            return true;
        }
        if self.hide_timer == Some(fire.id) {
            self.hide_timer = None;
            if !self.suspended {
                self.hide(store);
            }
            return true;
        }
        false
    }

    /// Explicit user dismissal: hide immediately, cancel only the pending
    /// auto-hide. The reminder interval keeps running.
    pub fn dismiss(&mut self, timers: &mut TimerQueue, store: &mut TargetStore) {
        if let Some(timer) = self.hide_timer.take() {
            let _ = timers.cancel(timer);
        }
        if self.phase == NotificationPhase::Visible {
            self.hide(store);
        }
    }

    /// Pointer entered the anchor control: suspend timer-driven hides and
    /// force the tooltip visible. This engagement show arms no auto-hide.
    pub fn pointer_enter(&mut self, store: &mut TargetStore) {
        self.suspended = true;
        if self.phase != NotificationPhase::Idle && self.phase != NotificationPhase::Visible {
            self.phase = NotificationPhase::Visible;
            if store.is_alive(self.tooltip) {
                store.set_shown(self.tooltip, true);
            }
        }
    }

    /// Pointer left the anchor control: resume timer-driven behavior. Does
    /// not hide.
    pub fn pointer_leave(&mut self) {
        self.suspended = false;
    }

    /// Cancels every armed timer and returns to `Idle`. Safe to call on any
    /// exit path, including before the first show.
    pub fn unmount(&mut self, timers: &mut TimerQueue) {
        if let Some(timer) = self.initial_timer.take() {
            let _ = timers.cancel(timer);
        }
        if let Some(timer) = self.repeat_timer.take() {
            let _ = timers.cancel(timer);
        }
        if let Some(timer) = self.hide_timer.take() {
            let _ = timers.cancel(timer);
        }
        self.phase = NotificationPhase::Idle;
        self.suspended = false;
    }

    fn show(&mut self, now: Instant, timers: &mut TimerQueue, store: &mut TargetStore) {
        // Re-entrant: a repeat tick during a visible window replaces the
        // pending auto-hide, extending the window.
        if let Some(timer) = self.hide_timer.take() {
            let _ = timers.cancel(timer);
        }
        self.phase = NotificationPhase::Visible;
        if store.is_alive(self.tooltip) {
            store.set_shown(self.tooltip, true);
        }
        self.hide_timer = Some(timers.schedule_at(now + self.config.visible_duration));
    }

    fn hide(&mut self, store: &mut TargetStore) {
        self.phase = NotificationPhase::Hidden;
        if store.is_alive(self.tooltip) {
            store.set_shown(self.tooltip, false);
        }
    }

    /// Current lifecycle phase.
    #[must_use]
    pub fn phase(&self) -> NotificationPhase {
        self.phase
    }

    /// Whether the tooltip is currently up.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.phase == NotificationPhase::Visible
    }

    /// Whether the pointer is over the anchor control.
    #[must_use]
    pub fn is_suspended(&self) -> bool {
        self.suspended
    }
}
