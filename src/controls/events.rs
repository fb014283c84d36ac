//! # Controls Events Module
//!
//! Typed payloads for the raw input notifications the host delivers and for
//! the semantic events the controls component emits.
//!
//! | Emitted event | Payload |
//! |---------------|---------|
//! | `<button>down`, `<button>up` | none |
//! | `<button>touchstart`, `<button>touchend` | none |
//! | `<button>changed` | [`ButtonState`] |
//! | `<group>moved` | [`AxisMoveDetail`] |

use serde::Serialize;

use super::mapping::{AxisGroup, Button, ButtonAction};
use crate::scene::SharedModel;

/// Analog and digital state of one raw button.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ButtonState {
    /// Analog intensity, 0.0 (released) to 1.0 (fully pressed).
    pub value: f32,
    pub pressed: bool,
    pub touched: bool,
}

impl ButtonState {
    #[must_use]
    pub const fn new(value: f32, pressed: bool, touched: bool) -> Self {
        Self { value, pressed, touched }
    }
}

/// Axis values of one axis group, labelled by position within the group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct AxisMoveDetail {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub z: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub w: Option<f32>,
}

impl AxisMoveDetail {
    /// Sets the value for a positional label slot (0 = x .. 3 = w).
    ///
    /// Slots past `w` are ignored.
    pub fn set(&mut self, position: usize, value: Option<f32>) {
        match position {
            0 => self.x = value,
            1 => self.y = value,
            2 => self.z = value,
            3 => self.w = value,
            _ => {}
        }
    }
}

/// Kinds of raw notification the component listens for while a controller
/// is present (or emulated).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RawEventKind {
    ButtonChanged,
    ButtonDown,
    ButtonUp,
    TouchStart,
    TouchEnd,
    AxisMove,
    ModelLoaded,
}

impl RawEventKind {
    /// All kinds, in registration order.
    pub const ALL: [RawEventKind; 7] = [
        RawEventKind::ButtonChanged,
        RawEventKind::ButtonDown,
        RawEventKind::ButtonUp,
        RawEventKind::TouchStart,
        RawEventKind::TouchEnd,
        RawEventKind::AxisMove,
        RawEventKind::ModelLoaded,
    ];

    /// Host event name for this kind.
    #[must_use]
    pub const fn event_name(self) -> &'static str {
        match self {
            RawEventKind::ButtonChanged => "buttonchanged",
            RawEventKind::ButtonDown => "buttondown",
            RawEventKind::ButtonUp => "buttonup",
            RawEventKind::TouchStart => "touchstart",
            RawEventKind::TouchEnd => "touchend",
            RawEventKind::AxisMove => "axismove",
            RawEventKind::ModelLoaded => "model-loaded",
        }
    }
}

/// Raw notification from the tracked-pose or model loader component.
#[derive(Debug, Clone)]
pub enum RawInputEvent {
    ButtonChanged { id: usize, state: ButtonState },
    ButtonDown { id: usize },
    ButtonUp { id: usize },
    TouchStart { id: usize },
    TouchEnd { id: usize },
    AxisMoved { axis: Vec<f32>, changed: Vec<bool> },
    ModelLoaded { model: SharedModel },
}

impl RawInputEvent {
    #[must_use]
    pub fn kind(&self) -> RawEventKind {
        match self {
            RawInputEvent::ButtonChanged { .. } => RawEventKind::ButtonChanged,
            RawInputEvent::ButtonDown { .. } => RawEventKind::ButtonDown,
            RawInputEvent::ButtonUp { .. } => RawEventKind::ButtonUp,
            RawInputEvent::TouchStart { .. } => RawEventKind::TouchStart,
            RawInputEvent::TouchEnd { .. } => RawEventKind::TouchEnd,
            RawInputEvent::AxisMoved { .. } => RawEventKind::AxisMove,
            RawInputEvent::ModelLoaded { .. } => RawEventKind::ModelLoaded,
        }
    }
}

/// Semantic event emitted on the controller entity.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ControlsEvent {
    /// `<button>down`, `<button>up`, `<button>touchstart`, `<button>touchend`
    Button { button: Button, action: ButtonAction },
    /// `<button>changed`
    Changed { button: Button, state: ButtonState },
    /// `<group>moved`
    Moved { group: AxisGroup, detail: AxisMoveDetail },
}

impl ControlsEvent {
    /// Host event name, e.g. `triggerdown` or `trackpadmoved`.
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            ControlsEvent::Button { button, action } => {
                format!("{}{}", button.name(), action.suffix())
            }
            ControlsEvent::Changed { button, .. } => format!("{}changed", button.name()),
            ControlsEvent::Moved { group, .. } => format!("{}moved", group.name()),
        }
    }
}
