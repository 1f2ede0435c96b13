// Copyright 2026 the Stagger Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dirty-tracking channel constants.
//!
//! Style and geometry mutations on the [`TargetStore`] mark one of these
//! channels (via [`understory_dirty`]); each
//! [`evaluate`](crate::target::TargetStore::evaluate) call drains them all
//! into [`StyleChanges`](crate::target::StyleChanges) so hosts apply only
//! what actually moved this tick.
//!
//! Every channel here is local-only: targets are independent elements with
//! no inherited properties, so no dependency edges are registered and
//! marking never propagates. (Group-to-item sequencing is a *timing*
//! relationship, handled by the reveal scheduler, not an invalidation
//! relationship.)
//!
//! [`TargetStore`]: crate::target::TargetStore

use understory_dirty::Channel;

/// Host-reported layout bounds changed.
pub const BOUNDS: Channel = Channel::new(0);

/// Animated opacity changed.
pub const OPACITY: Channel = Channel::new(1);

/// Animated translation offset changed.
pub const OFFSET: Channel = Channel::new(2);

/// Displayed counter value changed.
pub const VALUE: Channel = Channel::new(3);

/// Shown/hidden presentation flag changed.
pub const SHOWN: Channel = Channel::new(4);
