// Copyright 2026 the Stagger Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Monotonic time for animation scheduling.
//!
//! [`Instant`] is a point on the host's monotonic timeline, stored as
//! nanoseconds in a `u64`. Hosts are expected to feed a monotonically
//! non-decreasing `now` into the event loop; the core never reads a clock
//! itself.
//!
//! [`Duration`] is a span on the same timeline. Both types are plain
//! newtypes so that schedule arithmetic stays explicit and overflow-checked
//! where it matters (deadlines far in the future).

use core::fmt;
use core::ops::{Add, Sub};

/// Nanoseconds per millisecond.
const NANOS_PER_MILLI: u64 = 1_000_000;

/// Nanoseconds per second.
const NANOS_PER_SEC: u64 = 1_000_000_000;

/// A point on the host's monotonic timeline, in nanoseconds.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Instant(pub u64);

impl Instant {
    /// The origin of the timeline (mount time for most hosts).
    pub const ZERO: Self = Self(0);

    /// Creates an instant from a millisecond offset.
    #[inline]
    #[must_use]
    pub const fn from_millis(millis: u64) -> Self {
        Self(millis * NANOS_PER_MILLI)
    }

    /// Returns the raw nanosecond value.
    #[inline]
    #[must_use]
    pub const fn nanos(self) -> u64 {
        self.0
    }

    /// Returns this instant as whole milliseconds (truncating).
    #[inline]
    #[must_use]
    pub const fn as_millis(self) -> u64 {
        self.0 / NANOS_PER_MILLI
    }

    /// Returns the duration since an earlier instant, or zero if `earlier`
    /// is actually later.
    #[inline]
    #[must_use]
    pub const fn saturating_duration_since(self, earlier: Self) -> Duration {
        Duration(self.0.saturating_sub(earlier.0))
    }

    /// Checked addition of a duration.
    #[inline]
    #[must_use]
    pub const fn checked_add(self, duration: Duration) -> Option<Self> {
        match self.0.checked_add(duration.0) {
            Some(t) => Some(Self(t)),
            None => None,
        }
    }

    /// Saturating addition of a duration.
    #[inline]
    #[must_use]
    pub const fn saturating_add(self, duration: Duration) -> Self {
        Self(self.0.saturating_add(duration.0))
    }
}

impl Add<Duration> for Instant {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Duration) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub<Duration> for Instant {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Duration) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl Sub for Instant {
    type Output = Duration;

    #[inline]
    fn sub(self, rhs: Self) -> Duration {
        Duration(self.0 - rhs.0)
    }
}

impl fmt::Debug for Instant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Instant({}ms)", self.as_millis())
    }
}

/// A span of time in nanoseconds.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Duration(pub u64);

impl Duration {
    /// A zero-length duration.
    pub const ZERO: Self = Self(0);

    /// Creates a duration from milliseconds.
    #[inline]
    #[must_use]
    pub const fn from_millis(millis: u64) -> Self {
        Self(millis * NANOS_PER_MILLI)
    }

    /// Creates a duration from whole seconds.
    #[inline]
    #[must_use]
    pub const fn from_secs(secs: u64) -> Self {
        Self(secs * NANOS_PER_SEC)
    }

    /// Returns the raw nanosecond value.
    #[inline]
    #[must_use]
    pub const fn nanos(self) -> u64 {
        self.0
    }

    /// Returns this duration as whole milliseconds (truncating).
    #[inline]
    #[must_use]
    pub const fn as_millis(self) -> u64 {
        self.0 / NANOS_PER_MILLI
    }

    /// Returns this duration as fractional seconds.
    #[inline]
    #[must_use]
    pub fn as_secs_f64(self) -> f64 {
        self.0 as f64 / NANOS_PER_SEC as f64
    }

    /// Saturating addition.
    #[inline]
    #[must_use]
    pub const fn saturating_add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }

    /// Saturating subtraction.
    #[inline]
    #[must_use]
    pub const fn saturating_sub(self, rhs: Self) -> Self {
        Self(self.0.saturating_sub(rhs.0))
    }

    /// Multiplies this duration by an integer factor, saturating on overflow.
    #[inline]
    #[must_use]
    pub const fn saturating_mul(self, factor: u64) -> Self {
        Self(self.0.saturating_mul(factor))
    }
}

impl Add for Duration {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Duration {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl fmt::Debug for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Duration({}ms)", self.as_millis())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn millisecond_constructors() {
        assert_eq!(Instant::from_millis(2000).nanos(), 2_000_000_000);
        assert_eq!(Duration::from_millis(45_000), Duration::from_secs(45));
        assert_eq!(Duration::from_secs(6).as_millis(), 6000);
    }

    #[test]
    fn instant_duration_arithmetic() {
        let t = Instant::from_millis(100);
        let d = Duration::from_millis(40);
        assert_eq!((t + d).as_millis(), 140);
        assert_eq!((t - d).as_millis(), 60);
        assert_eq!(Instant::from_millis(150) - t, Duration::from_millis(50));
    }

    #[test]
    fn saturating_duration_since_clamps_to_zero() {
        let early = Instant::from_millis(100);
        let late = Instant::from_millis(300);
        assert_eq!(late.saturating_duration_since(early), Duration::from_millis(200));
        assert_eq!(early.saturating_duration_since(late), Duration::ZERO);
    }

    #[test]
    fn checked_add_overflow() {
        let t = Instant(u64::MAX - 10);
        assert!(t.checked_add(Duration(20)).is_none());
        assert_eq!(t.checked_add(Duration(10)), Some(Instant(u64::MAX)));
        assert_eq!(t.saturating_add(Duration(20)), Instant(u64::MAX));
    }

    #[test]
    fn fractional_seconds() {
        let d = Duration::from_millis(2500);
        assert!((d.as_secs_f64() - 2.5).abs() < 1e-12);
    }

    #[test]
    fn duration_saturating_ops() {
        let a = Duration::from_millis(100);
        let b = Duration::from_millis(250);
        assert_eq!(a.saturating_sub(b), Duration::ZERO);
        assert_eq!(b.saturating_sub(a), Duration::from_millis(150));
        assert_eq!(a.saturating_mul(3), Duration::from_millis(300));
        assert_eq!(Duration(u64::MAX).saturating_add(a), Duration(u64::MAX));
    }
}
