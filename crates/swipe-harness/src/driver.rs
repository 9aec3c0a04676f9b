#![forbid(unsafe_code)]

//! Scripted driver: feeds pointer input, plays transitions, records a trace.
//!
//! Time is virtual. Nothing happens between calls; [`Driver::advance`]
//! moves the clock and runs everything that became due, in this order:
//!
//! 1. tick the running return transition, and report its end if it finished
//!    (unless delivery is suppressed to simulate a lost signal);
//! 2. tick the component's watchdog;
//! 3. complete a pending animated removal whose exit animation elapsed.

use std::time::Duration;

use serde_json::json;
use swipe_core::transition::ReturnTransition;
use swipe_core::{
    PointerEvent, PointerKind, RemovalMode, SurfaceRole, SwipeConfig, SwipeOutput, Swipeable,
};
use web_time::Instant;

use crate::host::{CONTENT, DELETE_ACTION, HeadlessHost};

/// Length of the simulated exit animation for animated removals.
pub const EXIT_ANIMATION: Duration = Duration::from_millis(250);

/// Headless page running one swipeable element.
pub struct Driver {
    element: Swipeable,
    host: HeadlessHost,
    origin: Instant,
    elapsed: Duration,
    kind: PointerKind,
    transition: Option<ReturnTransition>,
    removal_due: Option<Duration>,
    deliver_transition_end: bool,
    prevented_defaults: usize,
    trace: Vec<String>,
}

impl std::fmt::Debug for Driver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Driver")
            .field("phase", &self.element.phase())
            .field("elapsed", &self.elapsed)
            .field("trace_len", &self.trace.len())
            .finish()
    }
}

impl Driver {
    /// Mount an element of `width` with `config`.
    #[must_use]
    pub fn new(config: SwipeConfig, width: f64) -> Self {
        Self::with_host(config, HeadlessHost::new(width))
    }

    /// Mount an element into a prepared host.
    #[must_use]
    pub fn with_host(config: SwipeConfig, mut host: HeadlessHost) -> Self {
        let mut element = Swipeable::new(config);
        element.connect(&mut host);
        Self {
            element,
            host,
            origin: Instant::now(),
            elapsed: Duration::ZERO,
            kind: PointerKind::Mouse,
            transition: None,
            removal_due: None,
            deliver_transition_end: true,
            prevented_defaults: 0,
            trace: Vec::new(),
        }
    }

    /// Use `kind` for subsequent pointer input.
    #[must_use]
    pub fn with_pointer_kind(mut self, kind: PointerKind) -> Self {
        self.kind = kind;
        self
    }

    /// Drop "transition finished" notifications, as a browser does when the
    /// element is hidden mid-transition.
    pub fn lose_transition_end(&mut self) {
        self.deliver_transition_end = false;
    }

    fn now(&self) -> Instant {
        self.origin + self.elapsed
    }

    fn feed(&mut self, event: PointerEvent) {
        let event = event.with_kind(self.kind);
        let now = self.now();
        let out = self.element.handle(&event, &self.host, now);
        self.apply(out);
    }

    /// Press the primary button on the draggable surface.
    pub fn press(&mut self, x: f64) {
        self.feed(PointerEvent::down(x, CONTENT, SurfaceRole::Content));
    }

    /// Press the primary button on the nested delete action.
    pub fn press_action(&mut self, x: f64) {
        self.feed(PointerEvent::down(x, DELETE_ACTION, SurfaceRole::Action));
    }

    /// Move with the primary button held.
    pub fn move_to(&mut self, x: f64) {
        self.feed(PointerEvent::move_to(x));
    }

    /// Release the primary button.
    pub fn release(&mut self, x: f64) {
        self.feed(PointerEvent::up(x));
    }

    /// Platform cancellation.
    pub fn cancel(&mut self, x: f64) {
        self.feed(PointerEvent::cancel(x));
    }

    /// Click the delete action.
    pub fn dismiss(&mut self) {
        let out = self.element.dismiss(&self.host);
        self.apply(out);
    }

    /// Remove the element from the page.
    pub fn unmount(&mut self) {
        self.element.disconnect(&mut self.host);
        self.host.attached = false;
        self.transition = None;
    }

    /// Advance virtual time by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        self.elapsed += dt;

        if let Some(transition) = self.transition.as_mut() {
            transition.tick(dt);
            if transition.is_complete() {
                self.transition = None;
                if self.deliver_transition_end {
                    let out = self.element.transition_end();
                    self.apply(out);
                }
            }
        }

        let now = self.now();
        let out = self.element.tick(now);
        self.apply(out);

        if let Some(due) = self.removal_due
            && self.elapsed >= due
        {
            self.complete_removal();
        }
    }

    /// Advance in `frame` steps until `total` has elapsed.
    pub fn run_for(&mut self, total: Duration, frame: Duration) {
        let mut left = total;
        while !left.is_zero() {
            let step = frame.min(left);
            self.advance(step);
            left -= step;
        }
    }

    fn apply(&mut self, outputs: Vec<SwipeOutput>) {
        for output in outputs {
            match output {
                SwipeOutput::PreventDefault => self.prevented_defaults += 1,
                SwipeOutput::Publish(visual) => {
                    // A new drag supersedes any return transition still playing.
                    if visual.is_dragging() {
                        self.transition = None;
                    }
                    self.record(json!({
                        "event": "frame",
                        "offset": visual.offset,
                        "opacity": visual.render_opacity(),
                        "dragging": visual.is_dragging(),
                        "resetting": visual.is_resetting(),
                    }));
                }
                SwipeOutput::ResetStarted(transition) => {
                    self.removal_due = None;
                    self.record(json!({
                        "event": "reset_started",
                        "from": transition.start_offset(),
                        "duration_ms": transition.duration().as_millis() as u64,
                    }));
                    self.transition = Some(transition);
                }
                SwipeOutput::Settled => {
                    self.transition = None;
                    self.record(json!({ "event": "settled" }));
                }
                SwipeOutput::RemovalRequested { exit_offset, mode } => {
                    self.record(json!({
                        "event": "removal_requested",
                        "exit_offset": exit_offset,
                        "mode": mode.as_str(),
                    }));
                    match mode {
                        RemovalMode::Immediate => self.complete_removal(),
                        RemovalMode::Animated => {
                            self.removal_due.get_or_insert(self.elapsed + EXIT_ANIMATION);
                        }
                    }
                }
            }
        }
    }

    fn complete_removal(&mut self) {
        if !self.host.attached {
            return;
        }
        self.removal_due = None;
        self.host.attached = false;
        self.element.removal_complete();
        self.element.disconnect(&mut self.host);
        tracing::info!(t_ms = self.elapsed.as_millis() as u64, "element detached");
        self.record(json!({ "event": "removed" }));
    }

    fn record(&mut self, mut line: serde_json::Value) {
        if let Some(obj) = line.as_object_mut() {
            obj.insert(
                "t_ms".into(),
                json!(self.elapsed.as_millis() as u64),
            );
        }
        self.trace.push(line.to_string());
    }

    /// Offset a renderer would currently display.
    #[must_use]
    pub fn rendered_offset(&self) -> f64 {
        match &self.transition {
            Some(transition) => transition.offset(),
            None => self.element.visual().offset,
        }
    }

    /// Recorded JSONL lines.
    #[must_use]
    pub fn trace(&self) -> &[String] {
        &self.trace
    }

    /// Recorded lines parsed back into JSON values.
    #[must_use]
    pub fn trace_values(&self) -> Vec<serde_json::Value> {
        self.trace
            .iter()
            .filter_map(|line| serde_json::from_str(line).ok())
            .collect()
    }

    /// How many inputs asked for default suppression.
    #[must_use]
    pub fn prevented_defaults(&self) -> usize {
        self.prevented_defaults
    }

    #[must_use]
    pub fn element(&self) -> &Swipeable {
        &self.element
    }

    #[must_use]
    pub fn element_mut(&mut self) -> &mut Swipeable {
        &mut self.element
    }

    #[must_use]
    pub fn host(&self) -> &HeadlessHost {
        &self.host
    }

    /// Whether the element is still in the page.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.host.attached
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS_16: Duration = Duration::from_millis(16);

    #[test]
    fn trace_lines_are_stamped() {
        let mut d = Driver::new(SwipeConfig::default(), 200.0);
        d.advance(MS_16);
        d.press(0.0);
        let values = d.trace_values();
        assert_eq!(values.len(), 1);
        assert_eq!(values[0]["event"], "frame");
        assert_eq!(values[0]["t_ms"], 16);
        assert_eq!(values[0]["dragging"], true);
    }

    #[test]
    fn rendered_offset_follows_transition() {
        let config = SwipeConfig::default().with_reset_duration(Duration::from_millis(100));
        let mut d = Driver::new(config, 200.0);
        d.press(0.0);
        d.move_to(50.0);
        assert_eq!(d.rendered_offset(), 50.0);
        d.release(50.0);
        assert_eq!(d.rendered_offset(), 50.0);
        d.advance(Duration::from_millis(50));
        assert!(d.rendered_offset() > 0.0 && d.rendered_offset() < 50.0);
        d.advance(Duration::from_millis(50));
        assert_eq!(d.rendered_offset(), 0.0);
    }

    #[test]
    fn press_during_reset_drops_return_transition() {
        let config = SwipeConfig::default().with_reset_duration(Duration::from_millis(100));
        let mut d = Driver::new(config, 200.0);
        d.press(0.0);
        d.move_to(50.0);
        d.release(50.0);
        d.advance(Duration::from_millis(50));

        d.press(10.0);
        assert_eq!(d.rendered_offset(), 0.0);
        d.move_to(30.0);
        assert_eq!(d.rendered_offset(), 20.0);

        d.run_for(Duration::from_millis(200), MS_16);
        assert_eq!(d.element().phase(), swipe_core::Phase::Dragging);
        assert_eq!(d.trace_values().iter().filter(|v| v["event"] == "settled").count(), 0);
    }

    #[test]
    fn frames_record_clamped_opacity() {
        let mut d = Driver::new(SwipeConfig::default(), 100.0);
        d.press(0.0);
        d.move_to(150.0);
        let values = d.trace_values();
        let frame = values.last().unwrap();
        assert_eq!(frame["offset"], 150.0);
        assert_eq!(frame["opacity"], 0.0);
        assert!(d.element().visual().opacity < 0.0);
    }

    #[test]
    fn run_for_covers_partial_frames() {
        let mut d = Driver::new(SwipeConfig::default(), 200.0);
        d.run_for(Duration::from_millis(40), MS_16);
        d.press(0.0);
        assert_eq!(d.trace_values()[0]["t_ms"], 40);
    }
}
