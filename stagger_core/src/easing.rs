// Copyright 2026 the Stagger Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Easing curves and spring response for reveal transitions.
//!
//! [`Easing`] maps normalized progress `t ∈ [0, 1]` to an output fraction
//! with exact endpoints — animations that finish must land on their terminal
//! style precisely, so every curve here guarantees `eval(0) = 0` and
//! `eval(1) = 1`.
//!
//! [`Spring`] is the other transition model: a closed-form damped harmonic
//! step response from 0 to 1, parameterized by stiffness and damping (unit
//! mass). Springs have no fixed duration; callers poll
//! [`settled`](Spring::settled) and snap to the terminal value once the
//! envelope has decayed.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

/// `ln(1000)`: settle is declared once the decay envelope drops below 1e-3.
const SETTLE_LOG: f64 = 6.907_755_278_982_137;

/// `e^x` through `powf`, which is available in `no_std` builds.
fn exp(x: f64) -> f64 {
    core::f64::consts::E.powf(x)
}

/// A unit-interval cubic Bézier, control points `(x1, y1)` and `(x2, y2)`
/// with fixed endpoints `(0, 0)` and `(1, 1)` — the CSS `cubic-bezier`
/// timing-function model.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UnitBezier {
    /// First control point, x.
    pub x1: f64,
    /// First control point, y.
    pub y1: f64,
    /// Second control point, x.
    pub x2: f64,
    /// Second control point, y.
    pub y2: f64,
}

impl UnitBezier {
    /// Creates a unit Bézier from its two control points.
    #[must_use]
    pub const fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Evaluates the curve at input fraction `u`, solving the parametric x
    /// polynomial for the curve parameter first (Newton, with a bisection
    /// fallback for flat regions).
    #[must_use]
    pub fn eval(&self, u: f64) -> f64 {
        if u <= 0.0 {
            return 0.0;
        }
        if u >= 1.0 {
            return 1.0;
        }

        // Polynomial coefficients for x(t) and y(t) with p0 = 0, p3 = 1.
        let cx = 3.0 * self.x1;
        let bx = 3.0 * (self.x2 - self.x1) - cx;
        let ax = 1.0 - cx - bx;
        let cy = 3.0 * self.y1;
        let by = 3.0 * (self.y2 - self.y1) - cy;
        let ay = 1.0 - cy - by;

        let sample_x = |t: f64| ((ax * t + bx) * t + cx) * t;
        let sample_dx = |t: f64| (3.0 * ax * t + 2.0 * bx) * t + cx;

        // Newton iterations from the input as the initial guess.
        let mut t = u;
        for _ in 0..8 {
            let err = sample_x(t) - u;
            if err.abs() < 1e-7 {
                break;
            }
            let d = sample_dx(t);
            if d.abs() < 1e-6 {
                break;
            }
            t -= err / d;
        }

        // Bisection fallback if Newton wandered out of range.
        if !(0.0..=1.0).contains(&t) || (sample_x(t) - u).abs() >= 1e-7 {
            let (mut lo, mut hi) = (0.0_f64, 1.0_f64);
            t = u;
            while hi - lo > 1e-7 {
                if sample_x(t) < u {
                    lo = t;
                } else {
                    hi = t;
                }
                t = (lo + hi) / 2.0;
            }
        }

        ((ay * t + by) * t + cy) * t
    }
}

/// A normalized easing curve.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Easing {
    /// Identity mapping.
    Linear,
    /// Cubic ease-out: fast start, decelerating finish. Used by the counter
    /// animation.
    EaseOut,
    /// Quarter-circle ease-out: very fast start, long tail.
    CircOut,
    /// Arbitrary CSS-style `cubic-bezier` curve.
    Bezier(UnitBezier),
}

impl Easing {
    /// The emphasized deceleration curve used by heading reveals,
    /// `cubic-bezier(0.22, 1, 0.36, 1)`.
    pub const EMPHASIZED_OUT: Self = Self::Bezier(UnitBezier::new(0.22, 1.0, 0.36, 1.0));

    /// Maps progress `t` (clamped to `[0, 1]`) to an output fraction.
    #[must_use]
    pub fn eval(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseOut => 1.0 - (1.0 - t).powi(3),
            Self::CircOut => (1.0 - (1.0 - t).powi(2)).sqrt(),
            Self::Bezier(b) => b.eval(t),
        }
    }
}

/// A damped harmonic spring with unit mass, evaluated as a closed-form step
/// response from 0 to 1.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Spring {
    /// Spring constant. Higher is faster.
    pub stiffness: f64,
    /// Damping coefficient. Relative to `2·√stiffness` (critical damping),
    /// lower values overshoot and oscillate.
    pub damping: f64,
}

impl Spring {
    /// Creates a spring from stiffness and damping.
    ///
    /// # Panics
    ///
    /// Panics if either parameter is not strictly positive.
    #[must_use]
    pub fn new(stiffness: f64, damping: f64) -> Self {
        assert!(stiffness > 0.0, "spring stiffness must be positive");
        assert!(damping > 0.0, "spring damping must be positive");
        Self { stiffness, damping }
    }

    /// The soft entrance spring used by staggered item reveals.
    #[must_use]
    pub fn entrance() -> Self {
        Self::new(50.0, 20.0)
    }

    /// The snappy pop-in spring used by the notification tooltip.
    #[must_use]
    pub fn pop() -> Self {
        Self::new(400.0, 25.0)
    }

    /// Undamped angular frequency `√stiffness`.
    fn omega(self) -> f64 {
        self.stiffness.sqrt()
    }

    /// Damping ratio; 1 is critical.
    fn zeta(self) -> f64 {
        self.damping / (2.0 * self.omega())
    }

    /// Evaluates the step response at `t` seconds. Starts at 0, converges to
    /// 1; underdamped springs overshoot along the way.
    #[must_use]
    pub fn sample(self, t: f64) -> f64 {
        if t <= 0.0 {
            return 0.0;
        }
        let w0 = self.omega();
        let zeta = self.zeta();

        if zeta < 1.0 {
            // Underdamped: decaying oscillation around 1.
            let wd = w0 * (1.0 - zeta * zeta).sqrt();
            let envelope = exp(-zeta * w0 * t);
            let (sin_wt, cos_wt) = (wd * t).sin_cos();
            1.0 - envelope * (cos_wt + (zeta * w0 / wd) * sin_wt)
        } else if zeta == 1.0 {
            // Critically damped.
            let envelope = exp(-w0 * t);
            1.0 - envelope * (1.0 + w0 * t)
        } else {
            // Overdamped: two real decay rates.
            let s = (zeta * zeta - 1.0).sqrt();
            let r1 = -w0 * (zeta - s); // slow root
            let r2 = -w0 * (zeta + s); // fast root
            1.0 + (r2 * exp(r1 * t) - r1 * exp(r2 * t)) / (r1 - r2)
        }
    }

    /// Time in seconds after which the response stays within the settle
    /// tolerance of 1.
    #[must_use]
    pub fn settle_time(self) -> f64 {
        let w0 = self.omega();
        let zeta = self.zeta();
        // Decay rate of the dominant (slowest) envelope term.
        let rate = if zeta < 1.0 {
            zeta * w0
        } else if zeta == 1.0 {
            w0
        } else {
            w0 * (zeta - (zeta * zeta - 1.0).sqrt())
        };
        SETTLE_LOG / rate
    }

    /// Whether the response has settled by `t` seconds.
    #[must_use]
    pub fn settled(self, t: f64) -> bool {
        t >= self.settle_time()
    }
}
