// Forbid unsafe in production; deny (with targeted allows) in tests.
#![cfg_attr(not(test), forbid(unsafe_code))]
#![cfg_attr(test, deny(unsafe_code))]

//! Core: gesture-and-transition state machine for swipe-to-dismiss surfaces.
//!
//! # Role
//! `swipe-core` turns raw pointer samples into a translation, an opacity and
//! a verdict (reset or commit) for a single draggable surface. It renders
//! nothing: every handler returns the outputs a presentation layer applies.
//!
//! # Primary responsibilities
//! - **SwipeTracker**: drag session, phase machine, release resolution and
//!   settle fallbacks.
//! - **decay / direction / resolver**: pure functions behind the tracker.
//! - **Swipeable**: the embeddable component, including global listener
//!   lifecycle and attribute wiring.
//!
//! # How it fits in the system
//! A host (DOM bindings, a native toolkit, or `swipe-harness` in tests)
//! implements [`tracker::SurfaceHost`] and [`listeners::ListenerSink`], feeds
//! [`event::PointerEvent`]s to a [`component::Swipeable`], and renders the
//! [`tracker::SwipeOutput`]s it gets back.

pub mod component;
pub mod config;
pub mod decay;
pub mod direction;
pub mod event;
pub mod listeners;
pub mod logging;
pub mod resolver;
pub mod session;
pub mod tracker;
pub mod transition;
pub mod visual;

pub use component::Swipeable;
pub use config::{ConfigError, SwipeConfig, TouchPolicy};
pub use direction::AllowedDirection;
pub use event::{PointerButton, PointerButtons, PointerEvent, PointerKind, SurfaceId, SurfaceRole};
pub use session::{DragSession, Phase};
pub use tracker::{RemovalMode, SurfaceHost, SwipeOutput, SwipeTracker};
pub use visual::{SurfaceClasses, VisualState};

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};
