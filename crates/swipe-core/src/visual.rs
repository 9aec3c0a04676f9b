#![forbid(unsafe_code)]

//! What the presentation layer renders.

use bitflags::bitflags;

bitflags! {
    /// State classes toggled on the draggable surface.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct SurfaceClasses: u8 {
        /// A drag is in progress (grabbing cursor).
        const DRAGGING = 0b01;
        /// The return transition is playing.
        const RESETTING = 0b10;
    }
}

/// Translation, fade and state classes of the surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisualState {
    /// Horizontal translation.
    pub offset: f64,
    /// Visibility fraction; values at or below zero render transparent.
    pub opacity: f64,
    /// Dragging/resetting classes.
    pub classes: SurfaceClasses,
}

impl VisualState {
    /// Untouched surface at its origin.
    pub const REST: Self = Self {
        offset: 0.0,
        opacity: 1.0,
        classes: SurfaceClasses::empty(),
    };

    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        self.classes.contains(SurfaceClasses::DRAGGING)
    }

    #[must_use]
    pub const fn is_resetting(&self) -> bool {
        self.classes.contains(SurfaceClasses::RESETTING)
    }

    /// Opacity clamped to [0, 1] for renderers that reject out-of-range alpha.
    #[must_use]
    pub fn render_opacity(&self) -> f64 {
        self.opacity.clamp(0.0, 1.0)
    }
}

impl Default for VisualState {
    fn default() -> Self {
        Self::REST
    }
}
