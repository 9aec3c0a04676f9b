#![forbid(unsafe_code)]

//! Return transition and its watchdog.
//!
//! When a release resolves to a reset, the published offset jumps to zero
//! and the presentation layer animates the surface back from where it was
//! released. [`ReturnTransition`] describes that animation so a renderer (or
//! the headless harness) can play it by ticking.
//!
//! # Invariants
//!
//! 1. `offset()` starts at `from` and ends exactly at `to`.
//! 2. A zero duration is complete before the first tick.
//! 3. `progress()` is clamped to [0.0, 1.0].
//!
//! # Failure Modes
//!
//! - The "finished" notification can be lost (transition skipped, element
//!   hidden, zero duration). [`ResetWatchdog`] bounds how long the state
//!   machine waits for it.

use std::fmt;
use std::time::Duration;

use web_time::Instant;

/// Easing curve mapping linear progress in [0, 1] to eased progress.
pub type EasingFn = fn(f64) -> f64;

/// No easing.
#[must_use]
pub fn linear(t: f64) -> f64 {
    t.clamp(0.0, 1.0)
}

/// Quadratic acceleration.
#[must_use]
pub fn ease_in(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    t * t
}

/// Quadratic deceleration.
#[must_use]
pub fn ease_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t) * (1.0 - t)
}

/// Quadratic acceleration then deceleration.
#[must_use]
pub fn ease_in_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}

/// Named easing curves, spelled like CSS `transition-timing-function`
/// keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Easing {
    Linear,
    EaseIn,
    EaseOut,
    #[default]
    EaseInOut,
}

impl Easing {
    /// Parse a keyword. `ease` is treated as `ease-in-out`.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "linear" => Some(Self::Linear),
            "ease-in" => Some(Self::EaseIn),
            "ease-out" => Some(Self::EaseOut),
            "ease-in-out" | "ease" => Some(Self::EaseInOut),
            _ => None,
        }
    }

    /// Canonical keyword.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::EaseIn => "ease-in",
            Self::EaseOut => "ease-out",
            Self::EaseInOut => "ease-in-out",
        }
    }

    /// The curve itself.
    #[must_use]
    pub fn function(self) -> EasingFn {
        match self {
            Self::Linear => linear,
            Self::EaseIn => ease_in,
            Self::EaseOut => ease_out,
            Self::EaseInOut => ease_in_out,
        }
    }
}

/// Animated return of a released surface to its origin.
#[derive(Clone, Copy)]
pub struct ReturnTransition {
    from: f64,
    to: f64,
    duration: Duration,
    easing: EasingFn,
    elapsed: Duration,
}

impl fmt::Debug for ReturnTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReturnTransition")
            .field("from", &self.from)
            .field("to", &self.to)
            .field("duration", &self.duration)
            .field("elapsed", &self.elapsed)
            .finish_non_exhaustive()
    }
}

impl PartialEq for ReturnTransition {
    fn eq(&self, other: &Self) -> bool {
        self.from == other.from
            && self.to == other.to
            && self.duration == other.duration
            && self.elapsed == other.elapsed
    }
}

impl ReturnTransition {
    /// Transition from `from` back to zero.
    #[must_use]
    pub fn new(from: f64, duration: Duration) -> Self {
        Self {
            from,
            to: 0.0,
            duration,
            easing: ease_in_out,
            elapsed: Duration::ZERO,
        }
    }

    /// Set the easing curve.
    #[must_use]
    pub fn easing(mut self, easing: EasingFn) -> Self {
        self.easing = easing;
        self
    }

    /// Advance by `dt`.
    pub fn tick(&mut self, dt: Duration) {
        self.elapsed = self.elapsed.saturating_add(dt).min(self.duration);
    }

    /// Linear progress in [0.0, 1.0].
    #[must_use]
    pub fn progress(&self) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (self.elapsed.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0)
    }

    /// Current translation.
    #[must_use]
    pub fn offset(&self) -> f64 {
        if self.is_complete() {
            return self.to;
        }
        let eased = (self.easing)(self.progress());
        self.from + (self.to - self.from) * eased
    }

    /// Offset the transition started from.
    #[must_use]
    pub fn start_offset(&self) -> f64 {
        self.from
    }

    /// Offset the transition ends at.
    #[must_use]
    pub fn target(&self) -> f64 {
        self.to
    }

    /// Configured duration.
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Whether the end has been reached.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.elapsed >= self.duration
    }
}

/// Upper bound on how long a reset may wait for its "finished" signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResetWatchdog {
    deadline: Instant,
}

impl ResetWatchdog {
    /// Arm at `now`, expiring after `duration + grace`.
    #[must_use]
    pub fn arm(now: Instant, duration: Duration, grace: Duration) -> Self {
        Self {
            deadline: now + duration.saturating_add(grace),
        }
    }

    /// Whether `now` is at or past the deadline.
    #[must_use]
    pub fn expired(&self, now: Instant) -> bool {
        now >= self.deadline
    }
}
