#![forbid(unsafe_code)]

//! Time-based animation primitives.
//!
//! Animations are driven explicitly: the owner calls [`Animation::tick`] with
//! the elapsed frame time and reads [`Animation::value`] when rendering.
//! Nothing here allocates or schedules work on its own.

use std::time::Duration;

// ---------------------------------------------------------------------------
// Easing functions
// ---------------------------------------------------------------------------

/// Easing function signature: maps `t` in [0, 1] to output in [0, 1].
pub type EasingFn = fn(f32) -> f32;

/// Identity easing (constant velocity).
#[inline]
pub fn linear(t: f32) -> f32 {
    t.clamp(0.0, 1.0)
}

/// Quadratic ease-out (slow end).
#[inline]
pub fn ease_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t) * (1.0 - t)
}

/// Quadratic ease-in-out (slow start and end).
#[inline]
pub fn ease_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}

// ---------------------------------------------------------------------------
// Spring
// ---------------------------------------------------------------------------

/// `ln(1000)`: the spring envelope decays to 0.1% by the end of the duration.
const SETTLE_EXPONENT: f32 = 6.907_755;

/// A damped spring response fitted to a fixed duration.
///
/// `damping_ratio` below 1.0 overshoots the target and oscillates back;
/// 1.0 and above approach it without overshoot. `initial_velocity` is
/// expressed in distances per duration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spring {
    damping_ratio: f32,
    initial_velocity: f32,
}

impl Spring {
    /// Create a spring. The damping ratio is clamped to at least 0.05.
    pub fn new(damping_ratio: f32, initial_velocity: f32) -> Self {
        let damping_ratio = if damping_ratio.is_finite() {
            damping_ratio.max(0.05)
        } else {
            1.0
        };
        let initial_velocity = if initial_velocity.is_finite() {
            initial_velocity
        } else {
            0.0
        };
        Self {
            damping_ratio,
            initial_velocity,
        }
    }

    /// Damping ratio.
    pub fn damping_ratio(&self) -> f32 {
        self.damping_ratio
    }

    /// Initial velocity.
    pub fn initial_velocity(&self) -> f32 {
        self.initial_velocity
    }

    /// Displacement towards the target at normalized time `t`.
    ///
    /// Exactly 0.0 at `t <= 0` and exactly 1.0 at `t >= 1`; underdamped
    /// springs exceed 1.0 in between.
    pub fn sample(&self, t: f32) -> f32 {
        if t <= 0.0 {
            return 0.0;
        }
        if t >= 1.0 {
            return 1.0;
        }

        let zeta = self.damping_ratio;
        let v0 = self.initial_velocity;

        if zeta < 1.0 {
            let omega = SETTLE_EXPONENT / zeta;
            let decay = zeta * omega;
            let omega_d = omega * (1.0 - zeta * zeta).sqrt();
            let b = (decay - v0) / omega_d;
            let envelope = (-decay * t).exp();
            1.0 - envelope * ((omega_d * t).cos() + b * (omega_d * t).sin())
        } else {
            let omega = SETTLE_EXPONENT;
            let envelope = (-omega * t).exp();
            1.0 - envelope * (1.0 + (omega - v0) * t)
        }
    }
}

impl Default for Spring {
    /// A lightly underdamped spring with a small initial push.
    fn default() -> Self {
        Self::new(0.75, 0.15)
    }
}

// ---------------------------------------------------------------------------
// Curve
// ---------------------------------------------------------------------------

/// Timing curve applied to linear progress.
#[derive(Debug, Clone, Copy)]
pub enum Curve {
    /// A bounded easing function.
    Eased(EasingFn),
    /// A damped spring (may overshoot).
    Spring(Spring),
}

impl Curve {
    /// Map linear progress `t` in [0, 1] through the curve.
    #[inline]
    pub fn apply(&self, t: f32) -> f32 {
        match self {
            Curve::Eased(f) => f(t),
            Curve::Spring(spring) => spring.sample(t),
        }
    }
}

impl Default for Curve {
    fn default() -> Self {
        Curve::Spring(Spring::default())
    }
}

// ---------------------------------------------------------------------------
// Animation trait
// ---------------------------------------------------------------------------

/// A time-based animation.
pub trait Animation {
    /// Advance the animation by `dt`.
    fn tick(&mut self, dt: Duration);

    /// Whether the animation has reached its end.
    fn is_complete(&self) -> bool;

    /// Current output value: 0.0 at the start and 1.0 once complete.
    ///
    /// Spring curves may leave [0.0, 1.0] while running.
    fn value(&self) -> f32;

    /// Reset the animation to its initial state.
    fn reset(&mut self);

    /// Time elapsed past completion.
    ///
    /// Returns [`Duration::ZERO`] for animations that never complete.
    fn overshoot(&self) -> Duration {
        Duration::ZERO
    }
}

// ---------------------------------------------------------------------------
// Tween
// ---------------------------------------------------------------------------

/// Progression from 0.0 to 1.0 over a duration along a [`Curve`].
///
/// Tracks elapsed time as [`Duration`] internally for precise accumulation
/// (no floating-point drift) and accurate overshoot calculation.
#[derive(Debug, Clone, Copy)]
pub struct Tween {
    elapsed: Duration,
    duration: Duration,
    curve: Curve,
}

impl Tween {
    /// Create a tween with the given duration and the default spring curve.
    pub fn new(duration: Duration) -> Self {
        Self {
            elapsed: Duration::ZERO,
            duration: if duration.is_zero() {
                Duration::from_nanos(1)
            } else {
                duration
            },
            curve: Curve::default(),
        }
    }

    /// Set the timing curve (builder).
    #[must_use]
    pub fn curve(mut self, curve: Curve) -> Self {
        self.curve = curve;
        self
    }

    /// Total duration.
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Raw linear progress (before the curve), in [0.0, 1.0].
    pub fn raw_progress(&self) -> f32 {
        let t = self.elapsed.as_secs_f64() / self.duration.as_secs_f64();
        (t as f32).clamp(0.0, 1.0)
    }
}

impl Animation for Tween {
    fn tick(&mut self, dt: Duration) {
        self.elapsed = self.elapsed.saturating_add(dt);
    }

    fn is_complete(&self) -> bool {
        self.elapsed >= self.duration
    }

    fn value(&self) -> f32 {
        if self.is_complete() {
            1.0
        } else {
            self.curve.apply(self.raw_progress())
        }
    }

    fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
    }

    fn overshoot(&self) -> Duration {
        self.elapsed.saturating_sub(self.duration)
    }
}

/// Linear interpolation between `from` and `to`.
#[inline]
pub fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
