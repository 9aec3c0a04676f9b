#![forbid(unsafe_code)]

//! Swipe tracker: turns pointer samples into visual state and a verdict.
//!
//! [`SwipeTracker`] owns the single [`DragSession`] and the [`Phase`]. Every
//! handler returns the [`SwipeOutput`]s it produced; nothing is rendered
//! implicitly. Callers apply the outputs in order.
//!
//! # State Machine
//!
//! | From | Event | Guard | To |
//! |------|-------|-------|----|
//! | Idle / Resetting | down | primary, no session, content surface | Dragging |
//! | Dragging | move | same pointer | Dragging |
//! | Dragging | up / cancel | `\|d\| > threshold * width` | Committing |
//! | Dragging | up / cancel | otherwise | Resetting (or Idle if instant) |
//! | Resetting | transition end / watchdog | | Idle |
//! | Committing | move | drag displacement nearly at start | Resetting |
//! | any but Committing | dismiss | | Committing |
//!
//! # Invariants
//!
//! 1. At most one session exists; a press while one is open changes nothing.
//! 2. Leaving `Dragging` always happens through the resolver; there is no
//!    path that keeps a released session in `Dragging`.
//! 3. A reset drops the session before the phase leaves `Dragging`, and the
//!    `RESETTING` class is cleared before the phase returns to `Idle`.
//! 4. Move samples never touch a reset in progress.
//!
//! # Failure Modes
//!
//! - Release never delivered: the next move sample without the primary
//!   button held resolves the drag as if released.
//! - Transition end never delivered: [`SwipeTracker::tick`] forces the
//!   settle once `reset_duration + reset_grace` has passed.
//! - Animated removal unsupported or stalled: removal is requested
//!   immediately, or escalated to immediate by the settle check.

use web_time::Instant;

use crate::config::SwipeConfig;
use crate::decay;
use crate::event::{PointerEvent, PointerKind, PointerPhase, SurfaceId, SurfaceRole};
use crate::resolver::{self, Resolution, SettleAction};
use crate::session::{DragSession, Phase};
use crate::transition::{ResetWatchdog, ReturnTransition};
use crate::visual::{SurfaceClasses, VisualState};

#[cfg(feature = "tracing")]
use crate::logging::{debug, info, trace, warn};
#[cfg(not(feature = "tracing"))]
use crate::{debug, info, trace, warn};

/// Queries the tracker makes of the presentation layer.
pub trait SurfaceHost {
    /// Current bounding width of `surface`, if it can be measured.
    fn surface_width(&self, surface: SurfaceId) -> Option<f64>;

    /// Whether the component is still in the document.
    fn is_attached(&self) -> bool;

    /// Whether removal can be animated (view transitions or equivalent).
    fn supports_animated_removal(&self) -> bool;
}

/// How the element should be removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RemovalMode {
    /// Cross-fade/slide out, then detach.
    Animated,
    /// Detach now.
    Immediate,
}

impl RemovalMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Animated => "animated",
            Self::Immediate => "immediate",
        }
    }
}

/// Something the presentation layer must act on.
#[derive(Debug, Clone, PartialEq)]
pub enum SwipeOutput {
    /// Suppress the browser's default handling of the triggering event.
    PreventDefault,
    /// Render this state.
    Publish(VisualState),
    /// Play this return transition and report back when it ends.
    ResetStarted(ReturnTransition),
    /// The surface is idle again.
    Settled,
    /// Remove the element. `exit_offset` is absent for dismissals that did
    /// not come from a drag.
    RemovalRequested {
        exit_offset: Option<f64>,
        mode: RemovalMode,
    },
}

/// Gesture tracker and transition resolver for one swipeable surface.
pub struct SwipeTracker {
    config: SwipeConfig,
    phase: Phase,
    session: Option<DragSession>,
    visual: VisualState,
    current_x: f64,
    watchdog: Option<ResetWatchdog>,
    removed: bool,
}

impl std::fmt::Debug for SwipeTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SwipeTracker")
            .field("phase", &self.phase)
            .field("session", &self.session.is_some())
            .field("offset", &self.visual.offset)
            .field("removed", &self.removed)
            .finish()
    }
}

impl Default for SwipeTracker {
    fn default() -> Self {
        Self::new(SwipeConfig::default())
    }
}

impl SwipeTracker {
    /// Create an idle tracker.
    #[must_use]
    pub fn new(config: SwipeConfig) -> Self {
        Self {
            config,
            phase: Phase::Idle,
            session: None,
            visual: VisualState::REST,
            current_x: 0.0,
            watchdog: None,
            removed: false,
        }
    }

    /// Dispatch a pointer event to its handler.
    pub fn process(
        &mut self,
        event: &PointerEvent,
        host: &dyn SurfaceHost,
        now: Instant,
    ) -> Vec<SwipeOutput> {
        match event.phase {
            PointerPhase::Down => self.on_pointer_down(event, host, now),
            PointerPhase::Move => self.on_pointer_move(event, host, now),
            PointerPhase::Up => self.on_pointer_up(event, host, now),
            PointerPhase::Cancel => self.on_pointer_cancel(event, host, now),
        }
    }

    /// Press on the component.
    pub fn on_pointer_down(
        &mut self,
        event: &PointerEvent,
        host: &dyn SurfaceHost,
        _now: Instant,
    ) -> Vec<SwipeOutput> {
        let mut out = Vec::with_capacity(2);

        if self.removed || self.phase == Phase::Committing {
            debug!(phase = %self.phase, "press ignored: surface is leaving");
            return out;
        }
        if !event.is_primary() {
            debug!("press ignored: not the primary button");
            return out;
        }
        if self.session.is_some() {
            debug!("press ignored: drag already active");
            return out;
        }
        let Some((surface, SurfaceRole::Content)) = event.target else {
            debug!("press ignored: target is not the draggable surface");
            return out;
        };
        let touch = event.kind == PointerKind::Touch;
        if touch && !self.config.touch_policy.starts_drag() {
            debug!("press ignored: touch drags disabled");
            return out;
        }

        let width = host
            .surface_width(surface)
            .filter(|w| w.is_finite() && *w > 0.0);
        if width.is_none() {
            debug!(surface = surface.0, "surface width unavailable, fade disabled");
        }

        self.session = Some(DragSession::open(
            surface,
            event.pointer_id,
            event.kind,
            width,
            event.page_x,
        ));
        self.current_x = event.page_x;
        self.watchdog = None;
        self.phase = Phase::Dragging;
        self.visual = VisualState {
            offset: 0.0,
            opacity: 1.0,
            classes: SurfaceClasses::DRAGGING,
        };

        debug!(
            surface = surface.0,
            start_x = event.page_x,
            width = width.unwrap_or(0.0),
            kind = event.kind.as_str(),
            "drag started"
        );

        if !touch || self.config.touch_policy.suppresses_default() {
            out.push(SwipeOutput::PreventDefault);
        }
        out.push(SwipeOutput::Publish(self.visual));
        out
    }

    /// Window-level move sample.
    pub fn on_pointer_move(
        &mut self,
        event: &PointerEvent,
        host: &dyn SurfaceHost,
        now: Instant,
    ) -> Vec<SwipeOutput> {
        self.current_x = event.page_x;
        if self.removed {
            return Vec::new();
        }
        let Some(session) = self.session.as_mut() else {
            return Vec::new();
        };
        if event.pointer_id != session.pointer_id() {
            return Vec::new();
        }

        match self.phase {
            Phase::Dragging => {
                let displacement = session.track(event.page_x, self.config.allowed_direction);
                if !event.primary_held() {
                    warn!(
                        displacement,
                        "move without primary button during drag, treating as release"
                    );
                    return self.release(host, now);
                }
                self.visual = VisualState {
                    offset: displacement,
                    opacity: decay::opacity(displacement, session.width()),
                    classes: SurfaceClasses::DRAGGING,
                };
                trace!(
                    displacement,
                    opacity = self.visual.opacity,
                    "drag moved"
                );
                vec![SwipeOutput::Publish(self.visual)]
            }
            Phase::Committing => self.settle_released(host, now),
            Phase::Idle | Phase::Resetting => Vec::new(),
        }
    }

    /// Pointer released.
    pub fn on_pointer_up(
        &mut self,
        event: &PointerEvent,
        host: &dyn SurfaceHost,
        now: Instant,
    ) -> Vec<SwipeOutput> {
        self.on_release(event, host, now)
    }

    /// Pointer cancelled by the platform. Resolves exactly like a release.
    pub fn on_pointer_cancel(
        &mut self,
        event: &PointerEvent,
        host: &dyn SurfaceHost,
        now: Instant,
    ) -> Vec<SwipeOutput> {
        self.on_release(event, host, now)
    }

    /// The return transition finished playing.
    pub fn on_transition_end(&mut self) -> Vec<SwipeOutput> {
        if self.phase != Phase::Resetting {
            debug!(phase = %self.phase, "transition end ignored");
            return Vec::new();
        }
        self.finish_reset()
    }

    /// The element has been detached. Everything afterwards is ignored.
    pub fn on_removal_complete(&mut self) {
        info!("surface removed");
        self.session = None;
        self.watchdog = None;
        self.removed = true;
    }

    /// Drive the reset watchdog.
    pub fn tick(&mut self, now: Instant) -> Vec<SwipeOutput> {
        match self.watchdog {
            Some(dog) if self.phase == Phase::Resetting && dog.expired(now) => {
                warn!("return transition never reported completion, forcing settle");
                self.finish_reset()
            }
            _ => Vec::new(),
        }
    }

    /// Remove the surface without a drag (the delete action).
    pub fn dismiss(&mut self, host: &dyn SurfaceHost) -> Vec<SwipeOutput> {
        if self.removed || self.phase == Phase::Committing {
            return Vec::new();
        }
        info!(phase = %self.phase, "surface dismissed");
        self.session = None;
        self.watchdog = None;
        self.phase = Phase::Committing;
        self.visual.classes = SurfaceClasses::empty();
        vec![SwipeOutput::RemovalRequested {
            exit_offset: None,
            mode: removal_mode(host),
        }]
    }

    /// Drop any in-flight drag or reset without producing output.
    ///
    /// Used when the component leaves the document: nobody is left to
    /// render a transition, and a later reconnect must start from idle.
    /// A commit in progress is kept; its removal is still owed.
    pub fn abandon(&mut self) {
        if self.removed || self.phase == Phase::Committing {
            return;
        }
        if self.phase != Phase::Idle {
            debug!(phase = %self.phase, "abandoning interaction");
        }
        self.session = None;
        self.watchdog = None;
        self.phase = Phase::Idle;
        self.visual = VisualState::REST;
    }

    /// Current phase.
    #[inline]
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Open session, if any.
    #[must_use]
    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    /// Last published visual state.
    #[must_use]
    pub fn visual(&self) -> VisualState {
        self.visual
    }

    /// Most recent horizontal pointer coordinate seen.
    #[must_use]
    pub fn current_x(&self) -> f64 {
        self.current_x
    }

    #[inline]
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.phase == Phase::Dragging
    }

    #[inline]
    #[must_use]
    pub fn is_resetting(&self) -> bool {
        self.phase == Phase::Resetting
    }

    /// Whether the element has been detached.
    #[must_use]
    pub fn is_removed(&self) -> bool {
        self.removed
    }

    #[must_use]
    pub fn config(&self) -> &SwipeConfig {
        &self.config
    }

    /// Replace the configuration. An active drag keeps its captured width
    /// but resolves against the new threshold.
    pub fn set_config(&mut self, config: SwipeConfig) {
        self.config = config;
    }
}

// ---------------------------------------------------------------------------
// Internal transitions
// ---------------------------------------------------------------------------

impl SwipeTracker {
    fn on_release(
        &mut self,
        event: &PointerEvent,
        host: &dyn SurfaceHost,
        now: Instant,
    ) -> Vec<SwipeOutput> {
        if self.removed || self.phase != Phase::Dragging {
            return Vec::new();
        }
        match self.session.as_ref() {
            Some(session) if session.pointer_id() == event.pointer_id => {}
            _ => return Vec::new(),
        }
        self.release(host, now)
    }

    /// Resolve the open drag. Caller guarantees `Phase::Dragging`.
    fn release(&mut self, host: &dyn SurfaceHost, now: Instant) -> Vec<SwipeOutput> {
        let Some(session) = self.session.as_mut() else {
            return Vec::new();
        };
        let displacement = session.displacement();
        let width = session.width();

        match resolver::resolve(displacement, width, self.config.threshold) {
            Resolution::Commit { exit_offset } => {
                session.commit(exit_offset);
                self.phase = Phase::Committing;
                self.visual = VisualState {
                    offset: displacement,
                    opacity: decay::opacity(displacement, width),
                    classes: SurfaceClasses::empty(),
                };
                let mode = removal_mode(host);
                info!(displacement, exit_offset, mode = mode.as_str(), "drag committed");
                vec![
                    SwipeOutput::Publish(self.visual),
                    SwipeOutput::RemovalRequested {
                        exit_offset: Some(exit_offset),
                        mode,
                    },
                ]
            }
            Resolution::Reset => {
                info!(displacement, "drag reset");
                self.begin_reset(displacement, now)
            }
        }
    }

    fn begin_reset(&mut self, from: f64, now: Instant) -> Vec<SwipeOutput> {
        self.session = None;

        let duration = self.config.reset_duration;
        if duration.is_zero() {
            self.phase = Phase::Idle;
            self.watchdog = None;
            self.visual = VisualState::REST;
            return vec![SwipeOutput::Publish(self.visual), SwipeOutput::Settled];
        }

        self.phase = Phase::Resetting;
        self.watchdog = Some(ResetWatchdog::arm(now, duration, self.config.reset_grace));
        self.visual = VisualState {
            offset: 0.0,
            opacity: 1.0,
            classes: SurfaceClasses::RESETTING,
        };
        let transition =
            ReturnTransition::new(from, duration).easing(self.config.reset_easing.function());
        vec![
            SwipeOutput::Publish(self.visual),
            SwipeOutput::ResetStarted(transition),
        ]
    }

    fn finish_reset(&mut self) -> Vec<SwipeOutput> {
        self.watchdog = None;
        self.visual.classes.remove(SurfaceClasses::RESETTING);
        self.phase = Phase::Idle;
        debug!("surface settled");
        vec![SwipeOutput::Publish(self.visual), SwipeOutput::Settled]
    }

    /// Late samples after a commit: make sure the surface does not linger.
    ///
    /// Judged on where the drag left the surface, not on the exit offset the
    /// removal animates towards.
    fn settle_released(&mut self, host: &dyn SurfaceHost, now: Instant) -> Vec<SwipeOutput> {
        let Some(session) = self.session.as_ref() else {
            return Vec::new();
        };
        let displacement = session.displacement();
        let exit_offset = session.exit_offset();
        let action = resolver::settle_check(
            displacement,
            decay::opacity(displacement, session.width()),
            host.is_attached(),
            self.config.nearly_invisible,
            self.config.nearly_at_start,
        );
        match action {
            Some(SettleAction::Remove) => {
                if !self.session.as_mut().is_some_and(DragSession::escalate) {
                    return Vec::new();
                }
                warn!(displacement, "committed surface still attached, removing immediately");
                vec![SwipeOutput::RemovalRequested {
                    exit_offset,
                    mode: RemovalMode::Immediate,
                }]
            }
            Some(SettleAction::Reset) => {
                info!(displacement, "committed surface never left its origin, resetting");
                self.begin_reset(displacement, now)
            }
            None => Vec::new(),
        }
    }
}

fn removal_mode(host: &dyn SurfaceHost) -> RemovalMode {
    if host.supports_animated_removal() {
        RemovalMode::Animated
    } else {
        RemovalMode::Immediate
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TouchPolicy;
    use crate::direction::AllowedDirection;
    use crate::event::{PointerButton, PointerButtons};
    use std::time::Duration;

    const SURFACE: SurfaceId = SurfaceId(1);
    const BUTTON: SurfaceId = SurfaceId(2);
    const MS_100: Duration = Duration::from_millis(100);

    struct FakeHost {
        width: Option<f64>,
        attached: bool,
        animated: bool,
    }

    impl FakeHost {
        fn new(width: f64) -> Self {
            Self {
                width: Some(width),
                attached: true,
                animated: true,
            }
        }
    }

    impl SurfaceHost for FakeHost {
        fn surface_width(&self, surface: SurfaceId) -> Option<f64> {
            (surface == SURFACE).then_some(self.width).flatten()
        }

        fn is_attached(&self) -> bool {
            self.attached
        }

        fn supports_animated_removal(&self) -> bool {
            self.animated
        }
    }

    fn press(x: f64) -> PointerEvent {
        PointerEvent::down(x, SURFACE, SurfaceRole::Content)
    }

    fn published(out: &[SwipeOutput]) -> Option<VisualState> {
        out.iter().rev().find_map(|o| match o {
            SwipeOutput::Publish(v) => Some(*v),
            _ => None,
        })
    }

    fn removal(out: &[SwipeOutput]) -> Option<(Option<f64>, RemovalMode)> {
        out.iter().find_map(|o| match o {
            SwipeOutput::RemovalRequested { exit_offset, mode } => Some((*exit_offset, *mode)),
            _ => None,
        })
    }

    fn drag(tr: &mut SwipeTracker, host: &FakeHost, to: f64, t: Instant) -> Vec<SwipeOutput> {
        tr.process(&press(100.0), host, t);
        tr.process(&PointerEvent::move_to(100.0 + to), host, t)
    }

    // --- Press guards ---

    #[test]
    fn press_on_content_starts_drag() {
        let host = FakeHost::new(200.0);
        let mut tr = SwipeTracker::default();
        let out = tr.process(&press(40.0), &host, Instant::now());

        assert_eq!(tr.phase(), Phase::Dragging);
        assert_eq!(out[0], SwipeOutput::PreventDefault);
        let v = published(&out).unwrap();
        assert!(v.is_dragging());
        let s = tr.session().unwrap();
        assert_eq!(s.start_x(), 40.0);
        assert_eq!(s.width(), Some(200.0));
        assert_eq!(s.target(), SURFACE);
    }

    #[test]
    fn non_primary_press_is_ignored() {
        let host = FakeHost::new(200.0);
        let mut tr = SwipeTracker::default();
        let ev = press(0.0).with_button(Some(PointerButton::Secondary));
        assert!(tr.process(&ev, &host, Instant::now()).is_empty());
        assert_eq!(tr.phase(), Phase::Idle);
    }

    #[test]
    fn press_on_nested_action_is_ignored() {
        let host = FakeHost::new(200.0);
        let mut tr = SwipeTracker::default();
        let ev = PointerEvent::down(0.0, BUTTON, SurfaceRole::Action);
        assert!(tr.process(&ev, &host, Instant::now()).is_empty());
        assert!(tr.session().is_none());
    }

    #[test]
    fn second_press_does_not_disturb_session() {
        let host = FakeHost::new(200.0);
        let mut tr = SwipeTracker::default();
        let t = Instant::now();
        drag(&mut tr, &host, 30.0, t);

        let out = tr.process(&press(500.0), &host, t);
        assert!(out.is_empty());
        let s = tr.session().unwrap();
        assert_eq!(s.start_x(), 100.0);
        assert_eq!(s.target(), SURFACE);
        assert_eq!(s.displacement(), 30.0);
    }

    #[test]
    fn touch_policy_controls_default_suppression() {
        let host = FakeHost::new(200.0);
        let touch = press(0.0).with_kind(PointerKind::Touch);

        let mut capture = SwipeTracker::default();
        let out = capture.process(&touch, &host, Instant::now());
        assert!(out.contains(&SwipeOutput::PreventDefault));

        let mut passive =
            SwipeTracker::new(SwipeConfig::default().with_touch_policy(TouchPolicy::Passive));
        let out = passive.process(&touch, &host, Instant::now());
        assert!(!out.contains(&SwipeOutput::PreventDefault));
        assert!(passive.is_dragging());

        let mut ignore =
            SwipeTracker::new(SwipeConfig::default().with_touch_policy(TouchPolicy::Ignore));
        assert!(ignore.process(&touch, &host, Instant::now()).is_empty());
        assert_eq!(ignore.phase(), Phase::Idle);
    }

    // --- Moves ---

    #[test]
    fn move_publishes_offset_and_fade() {
        let host = FakeHost::new(100.0);
        let mut tr = SwipeTracker::default();
        let out = drag(&mut tr, &host, 50.0, Instant::now());
        let v = published(&out).unwrap();
        assert_eq!(v.offset, 50.0);
        assert!((v.opacity - 0.875).abs() < 1e-9);
        assert_eq!(tr.current_x(), 150.0);
    }

    #[test]
    fn move_without_session_only_records_position() {
        let host = FakeHost::new(100.0);
        let mut tr = SwipeTracker::default();
        let out = tr.process(&PointerEvent::move_to(77.0), &host, Instant::now());
        assert!(out.is_empty());
        assert_eq!(tr.current_x(), 77.0);
        assert_eq!(tr.phase(), Phase::Idle);
    }

    #[test]
    fn moves_from_other_pointers_are_ignored() {
        let host = FakeHost::new(100.0);
        let mut tr = SwipeTracker::default();
        let t = Instant::now();
        drag(&mut tr, &host, 10.0, t);
        let stray = PointerEvent::move_to(900.0).with_pointer_id(5);
        assert!(tr.process(&stray, &host, t).is_empty());
        assert_eq!(tr.session().unwrap().displacement(), 10.0);
        // Position is still recorded.
        assert_eq!(tr.current_x(), 900.0);
    }

    #[test]
    fn move_after_removal_still_records_position() {
        let host = FakeHost::new(100.0);
        let mut tr = SwipeTracker::default();
        tr.on_removal_complete();
        assert!(tr.process(&PointerEvent::move_to(42.0), &host, Instant::now()).is_empty());
        assert_eq!(tr.current_x(), 42.0);
    }

    #[test]
    fn direction_clamp_applies_live() {
        let host = FakeHost::new(200.0);
        let mut tr = SwipeTracker::new(SwipeConfig::default().with_direction(AllowedDirection::Left));
        let out = drag(&mut tr, &host, 150.0, Instant::now());
        let v = published(&out).unwrap();
        assert_eq!(v.offset, 0.0);
        assert_eq!(v.opacity, 1.0);

        let out = tr.process(&PointerEvent::up(250.0), &host, Instant::now());
        assert!(removal(&out).is_none());
        assert_eq!(tr.phase(), Phase::Resetting);
    }

    #[test]
    fn missing_width_keeps_surface_opaque_and_never_commits() {
        let host = FakeHost {
            width: None,
            attached: true,
            animated: true,
        };
        let mut tr = SwipeTracker::default();
        let t = Instant::now();
        let out = drag(&mut tr, &host, 400.0, t);
        assert_eq!(published(&out).unwrap().opacity, 1.0);
        let out = tr.process(&PointerEvent::up(500.0), &host, t);
        assert!(removal(&out).is_none());
        assert_eq!(tr.phase(), Phase::Resetting);
    }

    // --- Resolution ---

    #[test]
    fn boundary_scenarios() {
        let host = FakeHost::new(200.0);
        let t = Instant::now();

        let mut tr = SwipeTracker::default();
        drag(&mut tr, &host, 69.0, t);
        let out = tr.process(&PointerEvent::up(169.0), &host, t);
        assert_eq!(published(&out).unwrap().offset, 0.0);
        assert_eq!(tr.phase(), Phase::Resetting);

        let mut tr = SwipeTracker::default();
        drag(&mut tr, &host, 71.0, t);
        let out = tr.process(&PointerEvent::up(171.0), &host, t);
        assert_eq!(removal(&out), Some((Some(200.0), RemovalMode::Animated)));
        assert_eq!(tr.phase(), Phase::Committing);

        let mut tr = SwipeTracker::default();
        drag(&mut tr, &host, -150.0, t);
        let out = tr.process(&PointerEvent::up(-50.0), &host, t);
        assert_eq!(removal(&out), Some((Some(-200.0), RemovalMode::Animated)));
    }

    #[test]
    fn cancel_resolves_like_release() {
        let host = FakeHost::new(200.0);
        let mut tr = SwipeTracker::default();
        let t = Instant::now();
        drag(&mut tr, &host, 90.0, t);
        let out = tr.process(&PointerEvent::cancel(0.0), &host, t);
        assert_eq!(removal(&out), Some((Some(200.0), RemovalMode::Animated)));
    }

    #[test]
    fn release_uses_last_move_not_release_coordinate() {
        let host = FakeHost::new(200.0);
        let mut tr = SwipeTracker::default();
        let t = Instant::now();
        drag(&mut tr, &host, 10.0, t);
        let out = tr.process(&PointerEvent::up(900.0), &host, t);
        assert!(removal(&out).is_none());
    }

    #[test]
    fn reset_clears_session_and_publishes_rest() {
        let host = FakeHost::new(200.0);
        let mut tr = SwipeTracker::default();
        let t = Instant::now();
        drag(&mut tr, &host, 40.0, t);
        let out = tr.process(&PointerEvent::up(140.0), &host, t);

        assert!(tr.session().is_none());
        let v = published(&out).unwrap();
        assert_eq!((v.offset, v.opacity), (0.0, 1.0));
        assert!(v.is_resetting());
        let transition = out
            .iter()
            .find_map(|o| match o {
                SwipeOutput::ResetStarted(tr) => Some(*tr),
                _ => None,
            })
            .unwrap();
        assert_eq!(transition.start_offset(), 40.0);
        assert_eq!(transition.target(), 0.0);

        let out = tr.on_transition_end();
        assert!(out.contains(&SwipeOutput::Settled));
        assert_eq!(tr.phase(), Phase::Idle);
        assert!(!tr.visual().is_resetting());
    }

    #[test]
    fn unsupported_animation_removes_immediately() {
        let host = FakeHost {
            animated: false,
            ..FakeHost::new(200.0)
        };
        let mut tr = SwipeTracker::default();
        let t = Instant::now();
        drag(&mut tr, &host, 120.0, t);
        let out = tr.process(&PointerEvent::up(0.0), &host, t);
        assert_eq!(removal(&out), Some((Some(200.0), RemovalMode::Immediate)));
    }

    #[test]
    fn missed_release_is_resolved_on_next_move() {
        let host = FakeHost::new(200.0);
        let mut tr = SwipeTracker::default();
        let t = Instant::now();
        drag(&mut tr, &host, 20.0, t);
        let orphan = PointerEvent::move_to(125.0).with_buttons(PointerButtons::NONE);
        tr.process(&orphan, &host, t);
        assert_eq!(tr.phase(), Phase::Resetting);
        assert!(tr.session().is_none());
    }

    // --- Settle fallbacks ---

    #[test]
    fn zero_duration_reset_settles_immediately() {
        let host = FakeHost::new(200.0);
        let mut tr = SwipeTracker::new(SwipeConfig::default().with_reset_duration(Duration::ZERO));
        let t = Instant::now();
        drag(&mut tr, &host, 10.0, t);
        let out = tr.process(&PointerEvent::up(0.0), &host, t);
        assert_eq!(out.last(), Some(&SwipeOutput::Settled));
        assert_eq!(tr.phase(), Phase::Idle);
    }

    #[test]
    fn watchdog_forces_settle() {
        let host = FakeHost::new(200.0);
        let config = SwipeConfig::default()
            .with_reset_duration(MS_100)
            .with_reset_grace(MS_100);
        let mut tr = SwipeTracker::new(config);
        let t = Instant::now();
        drag(&mut tr, &host, 10.0, t);
        tr.process(&PointerEvent::up(0.0), &host, t);

        assert!(tr.tick(t + MS_100).is_empty());
        assert!(tr.is_resetting());
        let out = tr.tick(t + MS_100 * 2);
        assert!(out.contains(&SwipeOutput::Settled));
        assert_eq!(tr.phase(), Phase::Idle);
    }

    #[test]
    fn moves_do_not_disturb_reset() {
        let host = FakeHost::new(200.0);
        let mut tr = SwipeTracker::default();
        let t = Instant::now();
        drag(&mut tr, &host, 10.0, t);
        tr.process(&PointerEvent::up(0.0), &host, t);
        let before = tr.visual();
        assert!(tr.process(&PointerEvent::move_to(400.0), &host, t).is_empty());
        assert_eq!(tr.visual(), before);
        assert!(tr.is_resetting());
    }

    #[test]
    fn press_during_reset_starts_new_drag() {
        let host = FakeHost::new(200.0);
        let mut tr = SwipeTracker::default();
        let t = Instant::now();
        drag(&mut tr, &host, 10.0, t);
        tr.process(&PointerEvent::up(0.0), &host, t);
        tr.process(&press(300.0), &host, t);
        assert!(tr.is_dragging());
        assert!(!tr.visual().is_resetting());
        // Stale transition end must not end the new drag.
        assert!(tr.on_transition_end().is_empty());
        assert!(tr.is_dragging());
        // Nor may the old watchdog.
        assert!(tr.tick(t + Duration::from_secs(60)).is_empty());
    }

    #[test]
    fn commit_publishes_drag_position_not_exit() {
        let host = FakeHost::new(200.0);
        let mut tr = SwipeTracker::default();
        let t = Instant::now();
        drag(&mut tr, &host, 71.0, t);
        let out = tr.process(&PointerEvent::up(171.0), &host, t);

        let v = published(&out).unwrap();
        assert_eq!(v.offset, 71.0);
        assert!((v.opacity - decay::opacity(71.0, Some(200.0))).abs() < 1e-12);
        assert!(v.opacity > 0.95);
        assert_eq!(tr.session().unwrap().exit_offset(), Some(200.0));
    }

    #[test]
    fn late_move_after_visible_commit_changes_nothing() {
        let host = FakeHost::new(200.0);
        let mut tr = SwipeTracker::default();
        let t = Instant::now();
        drag(&mut tr, &host, 71.0, t);
        tr.process(&PointerEvent::up(171.0), &host, t);

        let late = PointerEvent::move_to(172.0).with_buttons(PointerButtons::NONE);
        assert!(tr.process(&late, &host, t).is_empty());
        assert!(tr.process(&PointerEvent::move_to(10.0), &host, t).is_empty());
        assert_eq!(tr.phase(), Phase::Committing);
    }

    #[test]
    fn invisible_commit_is_escalated_once() {
        let host = FakeHost::new(200.0);
        let mut tr = SwipeTracker::default();
        let t = Instant::now();
        // (199.5 / 200)^3 > 0.99, so the fade is below the invisibility epsilon.
        drag(&mut tr, &host, 199.5, t);
        tr.process(&PointerEvent::up(0.0), &host, t);

        let out = tr.process(&PointerEvent::move_to(10.0), &host, t);
        assert_eq!(removal(&out), Some((Some(200.0), RemovalMode::Immediate)));
        assert!(tr.process(&PointerEvent::move_to(11.0), &host, t).is_empty());
    }

    #[test]
    fn commit_that_never_left_origin_resets() {
        // Tiny surface: a 0.08 drag crosses the 0.07 boundary but stays
        // within the nearly-at-start epsilon.
        let host = FakeHost::new(0.2);
        let mut tr = SwipeTracker::default();
        let t = Instant::now();
        drag(&mut tr, &host, 0.08, t);
        let out = tr.process(&PointerEvent::up(0.0), &host, t);
        assert!(removal(&out).is_some());
        assert_eq!(tr.phase(), Phase::Committing);

        let out = tr.process(&PointerEvent::move_to(50.0), &host, t);
        assert!(removal(&out).is_none());
        assert!(tr.is_resetting());
        assert!(tr.session().is_none());
        let transition = out
            .iter()
            .find_map(|o| match o {
                SwipeOutput::ResetStarted(tr) => Some(*tr),
                _ => None,
            })
            .unwrap();
        assert!((transition.start_offset() - 0.08).abs() < 1e-12);
    }

    #[test]
    fn detached_commit_is_left_alone() {
        let mut host = FakeHost::new(200.0);
        let mut tr = SwipeTracker::default();
        let t = Instant::now();
        drag(&mut tr, &host, 199.5, t);
        tr.process(&PointerEvent::up(0.0), &host, t);
        host.attached = false;
        assert!(tr.process(&PointerEvent::move_to(10.0), &host, t).is_empty());
    }

    // --- Removal ---

    #[test]
    fn dismiss_requests_removal_without_offset() {
        let host = FakeHost::new(200.0);
        let mut tr = SwipeTracker::default();
        let out = tr.dismiss(&host);
        assert_eq!(removal(&out), Some((None, RemovalMode::Animated)));
        assert_eq!(tr.phase(), Phase::Committing);
        assert!(tr.dismiss(&host).is_empty());
    }

    #[test]
    fn nothing_happens_after_removal() {
        let host = FakeHost::new(200.0);
        let mut tr = SwipeTracker::default();
        let t = Instant::now();
        drag(&mut tr, &host, 150.0, t);
        tr.process(&PointerEvent::up(0.0), &host, t);
        tr.on_removal_complete();

        assert!(tr.is_removed());
        assert!(tr.session().is_none());
        assert!(tr.process(&press(0.0), &host, t).is_empty());
        assert!(tr.process(&PointerEvent::move_to(5.0), &host, t).is_empty());
        assert!(tr.dismiss(&host).is_empty());
    }

    #[test]
    fn abandon_returns_to_rest() {
        let host = FakeHost::new(200.0);
        let mut tr = SwipeTracker::default();
        let t = Instant::now();
        drag(&mut tr, &host, 50.0, t);
        tr.abandon();
        assert_eq!(tr.phase(), Phase::Idle);
        assert!(tr.session().is_none());
        assert_eq!(tr.visual(), VisualState::REST);

        drag(&mut tr, &host, 150.0, t);
        tr.process(&PointerEvent::up(0.0), &host, t);
        tr.abandon();
        assert_eq!(tr.phase(), Phase::Committing);
    }

    #[test]
    fn release_without_session_is_ignored() {
        let host = FakeHost::new(200.0);
        let mut tr = SwipeTracker::default();
        assert!(tr.process(&PointerEvent::up(0.0), &host, Instant::now()).is_empty());
        assert!(tr.process(&PointerEvent::cancel(0.0), &host, Instant::now()).is_empty());
        assert_eq!(tr.phase(), Phase::Idle);
    }
}
