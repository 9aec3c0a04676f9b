#![forbid(unsafe_code)]

//! Configuration for a swipeable surface.
//!
//! Values arrive from three places: code (`with_*` builders), the
//! environment ([`SwipeConfig::from_env`]) and element attributes
//! ([`SwipeConfig::set_attribute`]). The state machine only ever reads the
//! result.
//!
//! Builders and the environment loader are lenient: out-of-range values are
//! clamped by [`SwipeConfig::validated`]. Attributes are strict and report a
//! [`ConfigError`] so the caller can surface the mistake.

use std::time::Duration;

use thiserror::Error;

use crate::decay::{NEARLY_AT_START, NEARLY_INVISIBLE};
use crate::direction::AllowedDirection;
use crate::transition::Easing;

/// Default commit threshold as a fraction of the surface width.
pub const DEFAULT_THRESHOLD: f64 = 0.35;
/// Smallest threshold `validated()` will keep.
pub const MIN_THRESHOLD: f64 = 0.01;
/// Largest threshold `validated()` will keep.
pub const MAX_THRESHOLD: f64 = 0.99;

const DEFAULT_RESET_DURATION_MS: u64 = 3100;
const DEFAULT_RESET_GRACE_MS: u64 = 250;
const MAX_RESET_DURATION_MS: u64 = 10_000;

const ENV_THRESHOLD: &str = "SWIPE_THRESHOLD";
const ENV_DIRECTION: &str = "SWIPE_DIRECTION";
const ENV_TOUCH_POLICY: &str = "SWIPE_TOUCH_POLICY";
const ENV_RESET_MS: &str = "SWIPE_RESET_MS";
const ENV_RESET_EASING: &str = "SWIPE_RESET_EASING";

/// Rejected configuration input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("threshold must be a finite fraction in (0, 1), got {0}")]
    InvalidThreshold(f64),

    #[error("unknown direction {0:?} (expected all, left or right)")]
    InvalidDirection(String),

    #[error("unknown touch policy {0:?} (expected capture, passive or ignore)")]
    InvalidTouchPolicy(String),

    #[error("unknown easing {0:?}")]
    InvalidEasing(String),

    #[error("attribute {name} expects a number, got {value:?}")]
    InvalidNumber { name: String, value: String },

    #[error("{name} must be finite and non-negative, got {value}")]
    InvalidEpsilon { name: &'static str, value: f64 },

    #[error("unknown attribute {0:?}")]
    UnknownAttribute(String),
}

/// How touch input interacts with drags.
///
/// Suppressing the default action of a touch press keeps the browser from
/// scrolling or selecting while the finger drags, but also swallows taps on
/// controls nested inside the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TouchPolicy {
    /// Start drags from touch and suppress the default action.
    #[default]
    Capture,
    /// Start drags from touch but leave the default action alone.
    Passive,
    /// Never start a drag from touch.
    Ignore,
}

impl TouchPolicy {
    /// Parse an attribute value.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "capture" => Some(Self::Capture),
            "passive" => Some(Self::Passive),
            "ignore" | "none" => Some(Self::Ignore),
            _ => None,
        }
    }

    /// Canonical attribute spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Capture => "capture",
            Self::Passive => "passive",
            Self::Ignore => "ignore",
        }
    }

    /// Whether a touch press may open a drag session.
    #[must_use]
    pub const fn starts_drag(self) -> bool {
        !matches!(self, Self::Ignore)
    }

    /// Whether an accepted touch press asks for default suppression.
    #[must_use]
    pub const fn suppresses_default(self) -> bool {
        matches!(self, Self::Capture)
    }
}

/// Tunables read by the swipe state machine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwipeConfig {
    /// Fraction of the captured width beyond which a release commits.
    /// Default: 0.35.
    pub threshold: f64,
    /// Directions a drag may travel. Default: all.
    pub allowed_direction: AllowedDirection,
    /// Touch handling. Default: capture.
    pub touch_policy: TouchPolicy,
    /// Opacity below which a released surface counts as gone. Default: 0.01.
    pub nearly_invisible: f64,
    /// Offset below which a released surface counts as home. Default: 0.1.
    pub nearly_at_start: f64,
    /// Length of the return transition. Zero settles immediately.
    /// Default: 3.1s.
    pub reset_duration: Duration,
    /// Curve of the return transition. Default: ease-in-out.
    pub reset_easing: Easing,
    /// Slack after `reset_duration` before the watchdog forces the settle.
    /// Default: 250ms.
    pub reset_grace: Duration,
}

impl Default for SwipeConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            allowed_direction: AllowedDirection::All,
            touch_policy: TouchPolicy::Capture,
            nearly_invisible: NEARLY_INVISIBLE,
            nearly_at_start: NEARLY_AT_START,
            reset_duration: Duration::from_millis(DEFAULT_RESET_DURATION_MS),
            reset_easing: Easing::EaseInOut,
            reset_grace: Duration::from_millis(DEFAULT_RESET_GRACE_MS),
        }
    }
}

impl SwipeConfig {
    /// Set the commit threshold.
    #[must_use]
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Set the allowed direction.
    #[must_use]
    pub fn with_direction(mut self, direction: AllowedDirection) -> Self {
        self.allowed_direction = direction;
        self
    }

    /// Set the touch policy.
    #[must_use]
    pub fn with_touch_policy(mut self, policy: TouchPolicy) -> Self {
        self.touch_policy = policy;
        self
    }

    /// Set both settle epsilons.
    #[must_use]
    pub fn with_epsilons(mut self, nearly_invisible: f64, nearly_at_start: f64) -> Self {
        self.nearly_invisible = nearly_invisible;
        self.nearly_at_start = nearly_at_start;
        self
    }

    /// Set the return transition length.
    #[must_use]
    pub fn with_reset_duration(mut self, duration: Duration) -> Self {
        self.reset_duration = duration;
        self
    }

    /// Set the return transition curve.
    #[must_use]
    pub fn with_reset_easing(mut self, easing: Easing) -> Self {
        self.reset_easing = easing;
        self
    }

    /// Set the watchdog slack.
    #[must_use]
    pub fn with_reset_grace(mut self, grace: Duration) -> Self {
        self.reset_grace = grace;
        self
    }

    /// Load config from environment variables.
    ///
    /// Reads:
    /// - `SWIPE_THRESHOLD`: commit fraction, e.g. `0.4`
    /// - `SWIPE_DIRECTION`: `all`, `left` or `right`
    /// - `SWIPE_TOUCH_POLICY`: `capture`, `passive` or `ignore`
    /// - `SWIPE_RESET_MS`: return transition length in milliseconds
    /// - `SWIPE_RESET_EASING`: CSS timing keyword
    ///
    /// Unparseable values are ignored; the result is [`validated`](Self::validated).
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Load config using a custom environment lookup (for tests).
    #[must_use]
    pub fn from_env_with<F>(get_env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(val) = get_env(ENV_THRESHOLD)
            && let Ok(threshold) = val.trim().parse::<f64>()
        {
            config.threshold = threshold;
        }

        if let Some(val) = get_env(ENV_DIRECTION)
            && let Some(direction) = AllowedDirection::parse(&val)
        {
            config.allowed_direction = direction;
        }

        if let Some(val) = get_env(ENV_TOUCH_POLICY)
            && let Some(policy) = TouchPolicy::parse(&val)
        {
            config.touch_policy = policy;
        }

        if let Some(val) = get_env(ENV_RESET_MS)
            && let Ok(ms) = val.trim().parse::<u64>()
        {
            config.reset_duration = Duration::from_millis(ms);
        }

        if let Some(val) = get_env(ENV_RESET_EASING)
            && let Some(easing) = Easing::parse(&val)
        {
            config.reset_easing = easing;
        }

        config.validated()
    }

    /// Clamp every field into its legal range.
    ///
    /// - `threshold`: NaN becomes the default, then clamped to
    ///   [`MIN_THRESHOLD`, `MAX_THRESHOLD`]
    /// - epsilons: NaN or negative becomes the default; `nearly_invisible`
    ///   is capped at 1.0
    /// - `reset_duration`: capped at 10s
    ///
    /// # Example
    ///
    /// ```
    /// use swipe_core::config::SwipeConfig;
    ///
    /// let config = SwipeConfig::default().with_threshold(3.0).validated();
    /// assert_eq!(config.threshold, 0.99);
    /// ```
    #[must_use]
    pub fn validated(mut self) -> Self {
        if self.threshold.is_nan() {
            self.threshold = DEFAULT_THRESHOLD;
        }
        self.threshold = self.threshold.clamp(MIN_THRESHOLD, MAX_THRESHOLD);

        if self.nearly_invisible.is_nan() || self.nearly_invisible < 0.0 {
            self.nearly_invisible = NEARLY_INVISIBLE;
        }
        self.nearly_invisible = self.nearly_invisible.min(1.0);

        if !self.nearly_at_start.is_finite() || self.nearly_at_start < 0.0 {
            self.nearly_at_start = NEARLY_AT_START;
        }

        self.reset_duration = self
            .reset_duration
            .min(Duration::from_millis(MAX_RESET_DURATION_MS));

        self
    }

    /// Strict check without modification.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_threshold(self.threshold)?;
        check_epsilon("nearly_invisible", self.nearly_invisible)?;
        check_epsilon("nearly_at_start", self.nearly_at_start)?;
        Ok(())
    }

    /// Apply an element attribute.
    ///
    /// Recognized names: `threshold` (also the legacy spelling `treshold`),
    /// `direction`, `touch-policy`, `reset-duration` (milliseconds) and
    /// `reset-easing`. On error the config is left untouched.
    pub fn set_attribute(&mut self, name: &str, value: &str) -> Result<(), ConfigError> {
        match name {
            "threshold" | "treshold" => {
                let threshold = parse_number(name, value)?;
                check_threshold(threshold)?;
                self.threshold = threshold;
            }
            "direction" | "allowed-direction" => {
                self.allowed_direction = value.parse()?;
            }
            "touch-policy" => {
                self.touch_policy = TouchPolicy::parse(value)
                    .ok_or_else(|| ConfigError::InvalidTouchPolicy(value.to_owned()))?;
            }
            "reset-duration" => {
                let ms = value
                    .trim()
                    .parse::<u64>()
                    .map_err(|_| ConfigError::InvalidNumber {
                        name: name.to_owned(),
                        value: value.to_owned(),
                    })?;
                self.reset_duration = Duration::from_millis(ms.min(MAX_RESET_DURATION_MS));
            }
            "reset-easing" => {
                self.reset_easing = Easing::parse(value)
                    .ok_or_else(|| ConfigError::InvalidEasing(value.to_owned()))?;
            }
            _ => return Err(ConfigError::UnknownAttribute(name.to_owned())),
        }
        Ok(())
    }
}

fn parse_number(name: &str, value: &str) -> Result<f64, ConfigError> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| ConfigError::InvalidNumber {
            name: name.to_owned(),
            value: value.to_owned(),
        })
}

fn check_threshold(threshold: f64) -> Result<(), ConfigError> {
    if threshold.is_finite() && threshold > 0.0 && threshold < 1.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidThreshold(threshold))
    }
}

fn check_epsilon(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidEpsilon { name, value })
    }
}
