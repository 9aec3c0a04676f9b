#![forbid(unsafe_code)]

//! Drag session and lifecycle phase.
//!
//! At most one [`DragSession`] exists at a time and only the tracker writes
//! to it. It is opened on an accepted press and closed (dropped, not
//! recycled) when the surface settles or is removed.

use std::fmt;

use crate::direction::AllowedDirection;
use crate::event::{PointerKind, SurfaceId};

/// Where the surface is in its drag-to-settle cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Phase {
    /// Nothing happening; the only phase that accepts a fresh press.
    #[default]
    Idle,
    /// Following the pointer.
    Dragging,
    /// Playing the return transition after a non-committing release.
    Resetting,
    /// Exit requested; the surface is on its way out.
    Committing,
}

impl Phase {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Dragging => "dragging",
            Self::Resetting => "resetting",
            Self::Committing => "committing",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bookkeeping for one grabbed surface.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    target: SurfaceId,
    pointer_id: u32,
    pointer_kind: PointerKind,
    width: Option<f64>,
    start_x: f64,
    current_x: f64,
    displacement: f64,
    exit_offset: Option<f64>,
    escalated: bool,
}

impl DragSession {
    pub(crate) fn open(
        target: SurfaceId,
        pointer_id: u32,
        pointer_kind: PointerKind,
        width: Option<f64>,
        x: f64,
    ) -> Self {
        Self {
            target,
            pointer_id,
            pointer_kind,
            width,
            start_x: x,
            current_x: x,
            displacement: 0.0,
            exit_offset: None,
            escalated: false,
        }
    }

    /// Record a new pointer position and return the constrained displacement.
    pub(crate) fn track(&mut self, x: f64, direction: AllowedDirection) -> f64 {
        self.current_x = x;
        self.displacement = direction.constrain(self.start_x, x);
        self.displacement
    }

    /// Record the commit verdict. The displacement is left as it was.
    pub(crate) fn commit(&mut self, exit_offset: f64) {
        self.exit_offset = Some(exit_offset);
    }

    /// Returns `true` the first time only.
    pub(crate) fn escalate(&mut self) -> bool {
        !std::mem::replace(&mut self.escalated, true)
    }

    /// Grabbed surface.
    #[must_use]
    pub fn target(&self) -> SurfaceId {
        self.target
    }

    /// Pointer that owns the drag.
    #[must_use]
    pub fn pointer_id(&self) -> u32 {
        self.pointer_id
    }

    #[must_use]
    pub fn pointer_kind(&self) -> PointerKind {
        self.pointer_kind
    }

    /// Width measured when the drag started.
    #[must_use]
    pub fn width(&self) -> Option<f64> {
        self.width
    }

    #[must_use]
    pub fn start_x(&self) -> f64 {
        self.start_x
    }

    #[must_use]
    pub fn current_x(&self) -> f64 {
        self.current_x
    }

    /// Latest constrained displacement.
    #[must_use]
    pub fn displacement(&self) -> f64 {
        self.displacement
    }

    /// Where a committed surface exits to; `None` while still dragging.
    #[must_use]
    pub fn exit_offset(&self) -> Option<f64> {
        self.exit_offset
    }
}
