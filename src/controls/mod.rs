//! # Controls Module
//!
//! Vive controller input handling.
//!
//! This module handles:
//! - Detecting the controller for a hand and attaching tracking/model components
//! - Mapping raw button and axis indices to semantic names
//! - Emitting `<button>down`, `<button>changed`, `<group>moved`, ... events
//! - Highlighting pressed buttons on the loaded controller model

pub mod entity;
pub mod events;
pub mod mapping;
pub mod presence;
pub mod vive;

pub use entity::{ControllerEntity, ModelAttachment, TrackedControlsAttachment};
pub use events::{AxisMoveDetail, ButtonState, ControlsEvent, RawEventKind, RawInputEvent};
pub use mapping::{AxisGroup, Button, ButtonAction};
pub use presence::PresencePoller;
pub use vive::ViveControls;
