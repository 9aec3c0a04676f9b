#![forbid(unsafe_code)]

//! Direction constraint applied to every move sample.
//!
//! The clamp runs live, not only at release: a drag in a disallowed
//! direction produces neither movement nor fade, and can therefore never
//! commit.

use std::fmt;
use std::str::FromStr;

use crate::config::ConfigError;

/// Which horizontal directions a drag may travel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AllowedDirection {
    /// Both directions.
    #[default]
    All,
    /// Only towards smaller coordinates.
    Left,
    /// Only towards larger coordinates.
    Right,
}

impl AllowedDirection {
    /// Parse an attribute value.
    ///
    /// Accepts `all`/`both`, `left`/`left-only`, `right`/`right-only`,
    /// ASCII case-insensitive, surrounding whitespace ignored.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.eq_ignore_ascii_case("all") || value.eq_ignore_ascii_case("both") {
            Some(Self::All)
        } else if value.eq_ignore_ascii_case("left") || value.eq_ignore_ascii_case("left-only") {
            Some(Self::Left)
        } else if value.eq_ignore_ascii_case("right") || value.eq_ignore_ascii_case("right-only")
        {
            Some(Self::Right)
        } else {
            None
        }
    }

    /// Canonical attribute spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Left => "left",
            Self::Right => "right",
        }
    }

    /// Effective displacement for a pointer that started at `start` and is
    /// now at `current`.
    #[must_use]
    pub fn constrain(self, start: f64, current: f64) -> f64 {
        match self {
            Self::All => current - start,
            Self::Left if current < start => current - start,
            Self::Right if current > start => current - start,
            Self::Left | Self::Right => 0.0,
        }
    }
}

impl fmt::Display for AllowedDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AllowedDirection {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| ConfigError::InvalidDirection(s.to_owned()))
    }
}
