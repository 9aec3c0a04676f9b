#![forbid(unsafe_code)]

//! Pointer input types consumed by the swipe state machine.
//!
//! Coordinates are page coordinates (`pageX` in DOM terms): one shared space
//! for the start and every later sample of a drag, so displacement is a plain
//! subtraction.
//!
//! # Design Notes
//!
//! - `button` identifies the button whose state *changed* (down/up events).
//! - `buttons` is the mask of buttons *held* when the sample was taken. Move
//!   samples carry it so a release that never arrived can be detected.
//! - `target` is `None` when the event did not hit any element of the
//!   component (window-level listeners see those).

use bitflags::bitflags;

/// Opaque identity of an element inside the component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceId(pub u64);

/// What part of the component an element plays.
///
/// Only [`SurfaceRole::Content`] may start a drag. An action button nested
/// inside the content reports [`SurfaceRole::Action`] even though it is
/// geometrically on top of the draggable surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceRole {
    /// The designated draggable region.
    Content,
    /// An interactive control (delete button, slot content, ...).
    Action,
    /// Anything else: wrappers, indicators, text.
    Other,
}

/// A button whose state changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerButton {
    /// Main button (left mouse, touch contact, pen tip).
    Primary,
    /// Middle mouse button / wheel.
    Auxiliary,
    /// Right mouse button / pen barrel.
    Secondary,
    /// "Back" side button.
    Back,
    /// "Forward" side button.
    Forward,
}

bitflags! {
    /// Buttons held while a sample was taken (DOM `buttons` bit layout).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct PointerButtons: u8 {
        const NONE = 0b0000_0000;
        const PRIMARY = 0b0000_0001;
        const SECONDARY = 0b0000_0010;
        const AUXILIARY = 0b0000_0100;
        const BACK = 0b0000_1000;
        const FORWARD = 0b0001_0000;
    }
}

/// Input device that produced the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PointerKind {
    #[default]
    Mouse,
    Pen,
    Touch,
}

impl PointerKind {
    /// DOM `pointerType` string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mouse => "mouse",
            Self::Pen => "pen",
            Self::Touch => "touch",
        }
    }
}

/// Lifecycle stage of a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerPhase {
    Down,
    Move,
    Up,
    Cancel,
}

/// A single pointer sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// Identity of the pointer; stable for one contact/device.
    pub pointer_id: u32,
    /// Device class.
    pub kind: PointerKind,
    /// Down, move, up or cancel.
    pub phase: PointerPhase,
    /// Button whose state changed, if any.
    pub button: Option<PointerButton>,
    /// Buttons held at sample time.
    pub buttons: PointerButtons,
    /// Horizontal page coordinate.
    pub page_x: f64,
    /// Element hit by the event, with its role.
    pub target: Option<(SurfaceId, SurfaceRole)>,
}

impl PointerEvent {
    /// Primary-button mouse press at `page_x` on `target`.
    #[must_use]
    pub const fn down(page_x: f64, target: SurfaceId, role: SurfaceRole) -> Self {
        Self {
            pointer_id: 1,
            kind: PointerKind::Mouse,
            phase: PointerPhase::Down,
            button: Some(PointerButton::Primary),
            buttons: PointerButtons::PRIMARY,
            page_x,
            target: Some((target, role)),
        }
    }

    /// Move sample with the primary button held.
    #[must_use]
    pub const fn move_to(page_x: f64) -> Self {
        Self {
            pointer_id: 1,
            kind: PointerKind::Mouse,
            phase: PointerPhase::Move,
            button: None,
            buttons: PointerButtons::PRIMARY,
            page_x,
            target: None,
        }
    }

    /// Primary-button release.
    #[must_use]
    pub const fn up(page_x: f64) -> Self {
        Self {
            pointer_id: 1,
            kind: PointerKind::Mouse,
            phase: PointerPhase::Up,
            button: Some(PointerButton::Primary),
            buttons: PointerButtons::NONE,
            page_x,
            target: None,
        }
    }

    /// Cancellation by the platform (scroll takeover, lost capture, ...).
    #[must_use]
    pub const fn cancel(page_x: f64) -> Self {
        Self {
            pointer_id: 1,
            kind: PointerKind::Mouse,
            phase: PointerPhase::Cancel,
            button: None,
            buttons: PointerButtons::NONE,
            page_x,
            target: None,
        }
    }

    /// Set the device class.
    #[must_use]
    pub const fn with_kind(mut self, kind: PointerKind) -> Self {
        self.kind = kind;
        self
    }

    /// Set the changed button.
    #[must_use]
    pub const fn with_button(mut self, button: Option<PointerButton>) -> Self {
        self.button = button;
        self
    }

    /// Set the held-buttons mask.
    #[must_use]
    pub const fn with_buttons(mut self, buttons: PointerButtons) -> Self {
        self.buttons = buttons;
        self
    }

    /// Set the pointer identity.
    #[must_use]
    pub const fn with_pointer_id(mut self, pointer_id: u32) -> Self {
        self.pointer_id = pointer_id;
        self
    }

    /// Whether the press or release involved the primary button.
    #[must_use]
    pub fn is_primary(&self) -> bool {
        self.button == Some(PointerButton::Primary)
    }

    /// Whether the primary button is still reported as held.
    #[must_use]
    pub const fn primary_held(&self) -> bool {
        self.buttons.contains(PointerButtons::PRIMARY)
    }
}
