// Copyright 2026 the Stagger Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Visibility-driven animation sequencing and timed-notification scheduling.
//!
//! `stagger_core` implements the behavioral core of scroll-triggered page
//! animation: staggered entrance reveals, eased integer count-ups, and a
//! periodic notification tooltip, all driven by one shared concept — an
//! element's visibility state starts timed, one-shot or repeating
//! animations. It is `no_std` compatible (with `alloc`) and owns no clock,
//! layout, or input; hosts pump it from their frame callback.
//!
//! # Architecture
//!
//! Each host tick flows through the same pipeline:
//!
//! ```text
//!   Host (tick source, geometry, pointer events)
//!       │
//!       ▼
//!   ViewportObserver::update() ──► VisibilityEvents ──┐
//!                                                     ▼
//!   TimerQueue::pop_due() ──► TimerFires ──► RevealSequencer /
//!                                            CounterAnimator /
//!                                            NotificationScheduler
//!                                                     │
//!                                                     ▼
//!   TargetStore::evaluate() ──► StyleChanges ──► StyleWriter::apply()
//! ```
//!
//! **[`target`]** — Struct-of-arrays element registry with generational
//! handles. Geometry is set by the host; style outputs are written by the
//! animation behaviors and drained per tick.
//!
//! **[`dirty`]** — Multi-channel change tracking via `understory_dirty`.
//! Style mutations mark the appropriate channel; evaluation drains them all
//! into incremental change lists.
//!
//! **[`time`]** — Nanosecond [`Instant`](time::Instant) and
//! [`Duration`](time::Duration) newtypes for host-fed monotonic time.
//!
//! **[`timer`]** — Deadline-ordered [`TimerQueue`](timer::TimerQueue) with
//! one-shot and repeating entries; the single scheduling primitive every
//! behavior uses.
//!
//! **[`viewport`]** — Edge-triggered visibility observation with `once` and
//! trigger-margin semantics.
//!
//! **[`easing`]** — Easing curves and closed-form spring response.
//!
//! **[`reveal`]** — Staggered one-way entrance reveals for ordered groups.
//!
//! **[`counter`]** — Once-per-lifetime eased integer count-up.
//!
//! **[`notify`]** — Initial-delay / auto-hide / repeat-interval notification
//! tooltip state machine with a hover-suspend overlay.
//!
//! **[`host`]** — The [`StyleWriter`](host::StyleWriter) contract hosts
//! implement, and the full embedding obligations.
//!
//! **[`trace`]** — [`TraceSink`](trace::TraceSink) trait and event types
//! for loop instrumentation, with zero-overhead
//! [`Tracer`](trace::Tracer) wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one
//!   branch per call site).
//! - `trace-rich` (disabled by default, implies `trace`): Gates per-target
//!   style-write records.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod counter;
pub mod dirty;
pub mod easing;
pub mod host;
pub mod notify;
pub mod reveal;
pub mod target;
pub mod time;
pub mod timer;
pub mod trace;
pub mod viewport;
