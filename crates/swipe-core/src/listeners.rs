#![forbid(unsafe_code)]

//! Window-level listener bookkeeping.
//!
//! A drag must keep tracking the pointer after it leaves the surface, so
//! move/up/cancel are observed on the window for as long as the component is
//! in the document. Those registrations are global state owned by someone
//! else; leaking one, or registering twice, outlives the component.
//!
//! # Invariants
//!
//! 1. All three listeners are added together and removed together.
//! 2. Each add is matched by exactly one remove.

use thiserror::Error;

#[cfg(feature = "tracing")]
use crate::logging::warn;
#[cfg(not(feature = "tracing"))]
use crate::warn;

/// A window-level pointer listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GlobalListener {
    PointerMove,
    PointerUp,
    PointerCancel,
}

impl GlobalListener {
    /// Every listener a swipeable surface needs.
    pub const ALL: [Self; 3] = [Self::PointerMove, Self::PointerUp, Self::PointerCancel];

    /// DOM event name.
    #[must_use]
    pub const fn event_name(self) -> &'static str {
        match self {
            Self::PointerMove => "pointermove",
            Self::PointerUp => "pointerup",
            Self::PointerCancel => "pointercancel",
        }
    }
}

/// Where global listeners get installed (the window, an event loop, ...).
pub trait ListenerSink {
    fn add_global(&mut self, listener: GlobalListener);
    fn remove_global(&mut self, listener: GlobalListener);
}

/// Misuse of the strict registry API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ListenerError {
    #[error("global pointer listeners are already attached")]
    AlreadyAttached,
    #[error("global pointer listeners are not attached")]
    NotAttached,
}

/// Tracks whether this component's global listeners are installed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListenerRegistry {
    attached: bool,
    attaches: u64,
    detaches: u64,
}

impl ListenerRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install all listeners. Fails if they are already installed.
    pub fn attach(&mut self, sink: &mut dyn ListenerSink) -> Result<(), ListenerError> {
        if self.attached {
            return Err(ListenerError::AlreadyAttached);
        }
        for listener in GlobalListener::ALL {
            sink.add_global(listener);
        }
        self.attached = true;
        self.attaches += 1;
        Ok(())
    }

    /// Remove all listeners. Fails if they are not installed.
    pub fn detach(&mut self, sink: &mut dyn ListenerSink) -> Result<(), ListenerError> {
        if !self.attached {
            return Err(ListenerError::NotAttached);
        }
        for listener in GlobalListener::ALL {
            sink.remove_global(listener);
        }
        self.attached = false;
        self.detaches += 1;
        Ok(())
    }

    /// Install unless already installed. Returns whether anything changed.
    pub fn ensure_attached(&mut self, sink: &mut dyn ListenerSink) -> bool {
        if self.attached {
            warn!("global listeners already attached, duplicate connect ignored");
            return false;
        }
        self.attach(sink).is_ok()
    }

    /// Remove if installed. Returns whether anything changed.
    pub fn ensure_detached(&mut self, sink: &mut dyn ListenerSink) -> bool {
        self.detach(sink).is_ok()
    }

    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// (attach, detach) cycles completed so far.
    #[must_use]
    pub fn counts(&self) -> (u64, u64) {
        (self.attaches, self.detaches)
    }
}
