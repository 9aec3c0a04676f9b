#![forbid(unsafe_code)]

//! In-memory host: one surface, one window.

use swipe_core::listeners::{GlobalListener, ListenerSink};
use swipe_core::{SurfaceHost, SurfaceId};

/// Identity of the draggable surface inside the headless page.
pub const CONTENT: SurfaceId = SurfaceId(1);
/// Identity of the delete action nested in the surface.
pub const DELETE_ACTION: SurfaceId = SurfaceId(2);

/// Headless stand-in for the page hosting one swipeable element.
#[derive(Debug, Clone)]
pub struct HeadlessHost {
    /// Width reported for [`CONTENT`]; `None` simulates an unmeasurable node.
    pub width: Option<f64>,
    /// Whether the element is still in the document.
    pub attached: bool,
    /// Whether removal may be animated.
    pub animated_removal: bool,
    listeners: Vec<GlobalListener>,
    duplicate_adds: usize,
    unknown_removes: usize,
}

impl HeadlessHost {
    #[must_use]
    pub fn new(width: f64) -> Self {
        Self {
            width: Some(width),
            attached: true,
            animated_removal: true,
            listeners: Vec::new(),
            duplicate_adds: 0,
            unknown_removes: 0,
        }
    }

    /// Listeners currently installed on the window.
    #[must_use]
    pub fn listeners(&self) -> &[GlobalListener] {
        &self.listeners
    }

    /// Listener bookkeeping defects observed so far:
    /// (adds of an already-installed listener, removes of a missing one).
    #[must_use]
    pub fn defects(&self) -> (usize, usize) {
        (self.duplicate_adds, self.unknown_removes)
    }
}

impl SurfaceHost for HeadlessHost {
    fn surface_width(&self, surface: SurfaceId) -> Option<f64> {
        if surface == CONTENT { self.width } else { None }
    }

    fn is_attached(&self) -> bool {
        self.attached
    }

    fn supports_animated_removal(&self) -> bool {
        self.animated_removal
    }
}

impl ListenerSink for HeadlessHost {
    fn add_global(&mut self, listener: GlobalListener) {
        if self.listeners.contains(&listener) {
            tracing::error!(event = listener.event_name(), "listener added twice");
            self.duplicate_adds += 1;
            return;
        }
        self.listeners.push(listener);
    }

    fn remove_global(&mut self, listener: GlobalListener) {
        match self.listeners.iter().position(|l| *l == listener) {
            Some(pos) => {
                self.listeners.remove(pos);
            }
            None => {
                tracing::error!(event = listener.event_name(), "removing unknown listener");
                self.unknown_removes += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn measures_only_content() {
        let host = HeadlessHost::new(320.0);
        assert_eq!(host.surface_width(CONTENT), Some(320.0));
        assert_eq!(host.surface_width(DELETE_ACTION), None);
    }

    #[test]
    fn records_listener_defects() {
        let mut host = HeadlessHost::new(100.0);
        host.add_global(GlobalListener::PointerUp);
        host.add_global(GlobalListener::PointerUp);
        host.remove_global(GlobalListener::PointerMove);
        assert_eq!(host.listeners(), &[GlobalListener::PointerUp]);
        assert_eq!(host.defects(), (1, 1));
    }
}
