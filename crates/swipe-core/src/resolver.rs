#![forbid(unsafe_code)]

//! Release and settle decisions.
//!
//! Pure functions; the tracker applies their verdicts.
//!
//! # Invariants
//!
//! 1. A commit's exit offset has the sign of the displacement and the
//!    magnitude of the captured width.
//! 2. Without a usable width there is nothing to measure the threshold
//!    against, so a release always resets.
//! 3. The boundary itself resets: only `|d| > threshold * width` commits.

/// Outcome of a release.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolution {
    /// Slide out to `exit_offset` and remove the element.
    Commit { exit_offset: f64 },
    /// Return to the origin.
    Reset,
}

/// Outcome of the post-release settle check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettleAction {
    /// Surface is effectively invisible but still attached: remove it now.
    Remove,
    /// Surface is effectively home: finish as a reset.
    Reset,
}

/// Absolute displacement a release must exceed to commit.
#[must_use]
pub fn commit_boundary(width: Option<f64>, threshold: f64) -> Option<f64> {
    match width {
        Some(w) if w.is_finite() && w > 0.0 => Some(w * threshold),
        _ => None,
    }
}

/// Decide what a release at `displacement` means.
#[must_use]
pub fn resolve(displacement: f64, width: Option<f64>, threshold: f64) -> Resolution {
    match (commit_boundary(width, threshold), width) {
        (Some(boundary), Some(w)) if displacement.abs() > boundary => Resolution::Commit {
            exit_offset: if displacement > 0.0 { w } else { -w },
        },
        _ => Resolution::Reset,
    }
}

/// Check whether a released surface has settled on its own.
///
/// Invisibility wins over proximity to the origin. An invisible surface that
/// is no longer attached needs nothing.
#[must_use]
pub fn settle_check(
    offset: f64,
    opacity: f64,
    attached: bool,
    nearly_invisible: f64,
    nearly_at_start: f64,
) -> Option<SettleAction> {
    if crate::decay::is_nearly_invisible(opacity, nearly_invisible) {
        return attached.then_some(SettleAction::Remove);
    }
    if crate::decay::is_nearly_at_start(offset, nearly_at_start) {
        return Some(SettleAction::Reset);
    }
    None
}
