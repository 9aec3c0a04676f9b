#![forbid(unsafe_code)]

//! The swipeable component: tracker plus listener lifecycle.
//!
//! [`Swipeable`] is what a presentation layer embeds. It forwards pointer
//! input to the [`SwipeTracker`] only while connected, owns the global
//! listener registration, and routes attribute changes into the config.
//!
//! # Invariants
//!
//! 1. Global listeners are attached once per connect and detached once per
//!    disconnect; repeated connects or disconnects are no-ops.
//! 2. A disconnected component ignores pointer input.
//! 3. Disconnecting drops any drag or reset in flight.

use web_time::Instant;

use crate::config::{ConfigError, SwipeConfig};
use crate::event::PointerEvent;
use crate::listeners::{ListenerRegistry, ListenerSink};
use crate::session::Phase;
use crate::tracker::{SurfaceHost, SwipeOutput, SwipeTracker};
use crate::visual::VisualState;

#[cfg(feature = "tracing")]
use crate::logging::debug;
#[cfg(not(feature = "tracing"))]
use crate::debug;

/// A draggable, dismissible surface.
#[derive(Debug, Default)]
pub struct Swipeable {
    tracker: SwipeTracker,
    listeners: ListenerRegistry,
}

impl Swipeable {
    #[must_use]
    pub fn new(config: SwipeConfig) -> Self {
        Self {
            tracker: SwipeTracker::new(config),
            listeners: ListenerRegistry::new(),
        }
    }

    /// The component entered the document.
    ///
    /// Returns `false` if it was already connected.
    pub fn connect(&mut self, sink: &mut dyn ListenerSink) -> bool {
        let attached = self.listeners.ensure_attached(sink);
        if attached {
            debug!("swipeable connected");
        }
        attached
    }

    /// The component left the document.
    ///
    /// Returns `false` if it was not connected.
    pub fn disconnect(&mut self, sink: &mut dyn ListenerSink) -> bool {
        let detached = self.listeners.ensure_detached(sink);
        if detached {
            debug!("swipeable disconnected");
        }
        self.tracker.abandon();
        detached
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.listeners.is_attached()
    }

    /// Feed a pointer event.
    pub fn handle(
        &mut self,
        event: &PointerEvent,
        host: &dyn SurfaceHost,
        now: Instant,
    ) -> Vec<SwipeOutput> {
        if !self.is_connected() {
            return Vec::new();
        }
        self.tracker.process(event, host, now)
    }

    /// The return transition finished.
    pub fn transition_end(&mut self) -> Vec<SwipeOutput> {
        self.tracker.on_transition_end()
    }

    /// The element was detached after a removal request.
    pub fn removal_complete(&mut self) {
        self.tracker.on_removal_complete();
    }

    /// Drive time-based fallbacks.
    pub fn tick(&mut self, now: Instant) -> Vec<SwipeOutput> {
        self.tracker.tick(now)
    }

    /// Delete action pressed.
    pub fn dismiss(&mut self, host: &dyn SurfaceHost) -> Vec<SwipeOutput> {
        self.tracker.dismiss(host)
    }

    /// Apply an element attribute to the configuration.
    pub fn set_attribute(&mut self, name: &str, value: &str) -> Result<(), ConfigError> {
        let mut config = *self.tracker.config();
        config.set_attribute(name, value)?;
        self.tracker.set_config(config);
        Ok(())
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.tracker.phase()
    }

    #[must_use]
    pub fn visual(&self) -> VisualState {
        self.tracker.visual()
    }

    #[must_use]
    pub fn tracker(&self) -> &SwipeTracker {
        &self.tracker
    }

    #[must_use]
    pub fn listeners(&self) -> &ListenerRegistry {
        &self.listeners
    }
}
