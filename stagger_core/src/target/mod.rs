// Copyright 2026 the Stagger Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Animation target registry.
//!
//! A *target* is one renderable element the animation engine can observe and
//! write styles to. Each target has:
//!
//! - An identity ([`TargetId`]) — a generational handle that becomes stale
//!   when the target is destroyed, so in-flight animations and observations
//!   can detect teardown instead of writing into a recycled slot.
//! - **Geometry** set by the host: [`bounds`](TargetStore::set_bounds), the
//!   element's layout rectangle in page coordinates. The core never measures
//!   anything itself.
//! - **Style outputs** written by animations and drained to the host:
//!   [`opacity`](TargetStore::set_opacity),
//!   [`offset`](TargetStore::set_offset) (translation from the layout
//!   position), [`display_value`](TargetStore::set_display_value) (rendered
//!   counter integer), and the [`shown`](TargetStore::set_shown) flag.
//!
//! Targets are stored in struct-of-arrays layout with index handles;
//! destroyed slots are recycled through a free list with generation checks.
//!
//! # Change tracking
//!
//! Mutations mark per-category dirty channels (see [`dirty`](crate::dirty)).
//! [`TargetStore::evaluate`] drains all channels into [`StyleChanges`],
//! which a [`StyleWriter`](crate::host::StyleWriter) applies incrementally.

mod evaluate;
mod id;
mod store;

pub use evaluate::StyleChanges;
pub use id::TargetId;
pub use store::TargetStore;
