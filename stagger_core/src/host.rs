// Copyright 2026 the Stagger Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host contract for embedding the animation core.
//!
//! The core owns no clock, no layout, and no pointer input. A *host* — a
//! rendering/layout engine with a frame callback — supplies those and wires
//! the pieces together. The host provides:
//!
//! - **Tick source** — A periodic callback (display link, animation frame)
//!   with a monotonic `now`. The core is pumped, never called back.
//!
//! - **Geometry feed** — Element layout rectangles pushed into the
//!   [`TargetStore`] via [`set_bounds`](crate::target::TargetStore::set_bounds),
//!   plus the current viewport rectangle passed to
//!   [`ViewportObserver::update`](crate::viewport::ViewportObserver::update).
//!
//! - **Pointer events** — Enter/leave on the notification anchor, forwarded
//!   to [`NotificationScheduler::pointer_enter`] /
//!   [`pointer_leave`](crate::notify::NotificationScheduler::pointer_leave).
//!
//! - **Style application** — A [`StyleWriter`] that applies drained
//!   [`StyleChanges`] to the native view tree each tick.
//!
//! - **Teardown** — On unmount, for every exit path: unobserve every
//!   observation, detach every group and counter, unmount the notification
//!   scheduler, and clear the timer queue. After teardown no callback may
//!   touch the destroyed view; the generational handles make violations
//!   detectable rather than silent.
//!
//! The notification's action opens an external messaging deep link; that
//! URL is static host data handed to the platform, never constructed or
//! validated by the core.
//!
//! # Tick pseudocode
//!
//! ```rust,ignore
//! fn on_tick(now: Instant) {
//!     // Geometry: push fresh bounds, then recompute visibility.
//!     observer.update(&store, viewport, &mut events);
//!     for event in events.drain(..) {
//!         sequencer.on_visibility(&event, now, &mut timers);
//!         counters.on_visibility(&event, now);
//!     }
//!
//!     // Timers: pump everything due, route to the owner.
//!     while let Some(fire) = timers.pop_due(now) {
//!         if sequencer.on_timer(&fire, now) {
//!             continue;
//!         }
//!         let _ = notifier.on_timer(&fire, now, &mut timers, &mut store);
//!     }
//!
//!     // Animate: step transitions and counters.
//!     sequencer.advance(now, &mut store);
//!     counters.advance(now, &mut store);
//!
//!     // Apply: drain dirty channels into the native tree.
//!     store.evaluate_into(&mut changes);
//!     writer.apply(&store, &changes);
//! }
//! ```
//!
//! [`NotificationScheduler::pointer_enter`]: crate::notify::NotificationScheduler::pointer_enter
//! [`TargetStore`]: crate::target::TargetStore

use crate::target::{StyleChanges, TargetStore};

/// Applies evaluated style changes to a host-native view tree.
///
/// DOM-style and test-double writers implement this trait, enabling generic
/// tick loops and deterministic harnesses.
pub trait StyleWriter {
    /// Applies the given [`StyleChanges`] to the backing view tree, reading
    /// current property values from `store` as needed.
    fn apply(&mut self, store: &TargetStore, changes: &StyleChanges);
}
