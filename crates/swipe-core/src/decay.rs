#![forbid(unsafe_code)]

//! Opacity falloff for a dragged surface.
//!
//! `opacity = 1 - (|d| / width)^3`
//!
//! The cubic keeps small, accidental movements visually inert and fades
//! quickly as the displacement approaches the surface's own width. The
//! result is not clamped below: past one width it goes negative, which a
//! renderer treats as fully transparent.
//!
//! `width` is always the value captured when the drag started. Measuring it
//! again mid-drag would feed the fade's own layout effects back into it.

/// Opacity below which a surface counts as invisible.
pub const NEARLY_INVISIBLE: f64 = 0.01;

/// Absolute offset below which a surface counts as back at its origin.
pub const NEARLY_AT_START: f64 = 0.1;

/// Visibility fraction for `displacement` against a captured `width`.
///
/// A missing, zero, negative or non-finite width yields `1.0`.
#[must_use]
pub fn opacity(displacement: f64, width: Option<f64>) -> f64 {
    match width {
        Some(w) if w.is_finite() && w > 0.0 => {
            let normalized = displacement.abs() / w;
            1.0 - normalized.powi(3)
        }
        _ => 1.0,
    }
}

/// Whether `opacity` is below `epsilon`.
#[inline]
#[must_use]
pub fn is_nearly_invisible(opacity: f64, epsilon: f64) -> bool {
    opacity < epsilon
}

/// Whether `offset` is within `epsilon` of the origin.
#[inline]
#[must_use]
pub fn is_nearly_at_start(offset: f64, epsilon: f64) -> bool {
    offset.abs() < epsilon
}
