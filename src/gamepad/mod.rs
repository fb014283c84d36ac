//! # Gamepad Module
//!
//! Enumeration of connected gamepad-like devices.
//!
//! This module handles:
//! - Describing a connected device ([`GamepadDescriptor`])
//! - Abstracting the platform device list behind [`GamepadSource`]
//! - Selecting the Nth device whose id starts with a given prefix
//! - Publishing pose-reporting controllers ([`tracked::TrackedControlsSystem`])
//!
//! Every query is a synchronous snapshot. A platform without a gamepad API
//! reports `None`, which callers treat as "no devices".

pub mod evdev_source;
pub mod tracked;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::controls::events::ButtonState;

pub use evdev_source::EvdevGamepadSource;

/// Which hand a controller is held in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Hand {
    #[default]
    Left,
    Right,
    /// Anything that is not `left` or `right`.
    Other,
}

impl Hand {
    /// Position of this hand among devices sharing an id prefix.
    ///
    /// Runtimes enumerate the right controller first, then the left one.
    #[must_use]
    pub const fn controller_index(self) -> usize {
        match self {
            Hand::Right => 0,
            Hand::Left => 1,
            Hand::Other => 2,
        }
    }
}

impl FromStr for Hand {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "left" => Hand::Left,
            "right" => Hand::Right,
            _ => Hand::Other,
        })
    }
}

impl From<String> for Hand {
    fn from(value: String) -> Self {
        match value.parse() {
            Ok(hand) => hand,
            Err(never) => match never {},
        }
    }
}

impl From<Hand> for String {
    fn from(hand: Hand) -> Self {
        hand.to_string()
    }
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Hand::Left => "left",
            Hand::Right => "right",
            Hand::Other => "other",
        })
    }
}

/// Position and orientation reported by a tracked device.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Pose {
    pub position: [f32; 3],
    /// Orientation quaternion (x, y, z, w).
    pub orientation: [f32; 4],
}

/// Snapshot of one connected gamepad-like device.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GamepadDescriptor {
    /// Index in the platform device list.
    pub index: usize,
    /// Identifying string, matched by prefix (e.g. "OpenVR Gamepad").
    pub id: String,
    /// Hand reported by the device, if any.
    pub hand: Option<Hand>,
    /// Present only for devices with 6DoF tracking.
    pub pose: Option<Pose>,
    pub buttons: Vec<ButtonState>,
    pub axes: Vec<f32>,
}

impl GamepadDescriptor {
    /// Creates a descriptor with no pose, buttons or axes.
    #[must_use]
    pub fn new(index: usize, id: impl Into<String>) -> Self {
        Self {
            index,
            id: id.into(),
            ..Self::default()
        }
    }

    /// Attaches a pose (builder style).
    #[must_use]
    pub fn with_pose(mut self, pose: Pose) -> Self {
        self.pose = Some(pose);
        self
    }
}

/// Platform list of connected gamepads.
#[cfg_attr(test, mockall::automock)]
pub trait GamepadSource {
    /// Current device list, or `None` when the platform has no gamepad API.
    fn gamepads(&self) -> Option<Vec<GamepadDescriptor>>;

    /// Whether descriptors from this source can ever carry a pose.
    fn reports_pose(&self) -> bool {
        true
    }
}

/// Returns the current device list; an unavailable API yields an empty list.
#[must_use]
pub fn enumerate_gamepads(source: &dyn GamepadSource) -> Vec<GamepadDescriptor> {
    source.gamepads().unwrap_or_default()
}

/// Finds the `nth` (0-based) device whose id starts with `id_prefix`.
///
/// # Examples
///
/// ```
/// use vive_controls::gamepad::{find_controller, GamepadDescriptor, GamepadSource};
///
/// struct Fixed(Vec<GamepadDescriptor>);
///
/// impl GamepadSource for Fixed {
///     fn gamepads(&self) -> Option<Vec<GamepadDescriptor>> {
///         Some(self.0.clone())
///     }
/// }
///
/// let source = Fixed(vec![
///     GamepadDescriptor::new(0, "Xbox Controller"),
///     GamepadDescriptor::new(1, "OpenVR Gamepad"),
///     GamepadDescriptor::new(2, "OpenVR Gamepad"),
/// ]);
///
/// let second = find_controller(&source, "OpenVR", 1).unwrap();
/// assert_eq!(second.index, 2);
/// ```
#[must_use]
pub fn find_controller(
    source: &dyn GamepadSource,
    id_prefix: &str,
    nth: usize,
) -> Option<GamepadDescriptor> {
    enumerate_gamepads(source)
        .into_iter()
        .filter(|gamepad| gamepad.id.starts_with(id_prefix))
        .nth(nth)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source_with(ids: &[&str]) -> MockGamepadSource {
        let gamepads: Vec<_> = ids
            .iter()
            .enumerate()
            .map(|(i, id)| GamepadDescriptor::new(i, *id))
            .collect();
        let mut source = MockGamepadSource::new();
        source.expect_gamepads().returning(move || Some(gamepads.clone()));
        source
    }

    #[test]
    fn test_hand_parsing() {
        assert_eq!("left".parse::<Hand>().unwrap(), Hand::Left);
        assert_eq!("right".parse::<Hand>().unwrap(), Hand::Right);
        assert_eq!("both".parse::<Hand>().unwrap(), Hand::Other);
        assert_eq!("Left".parse::<Hand>().unwrap(), Hand::Other);
    }

    #[test]
    fn test_hand_controller_index() {
        assert_eq!(Hand::Right.controller_index(), 0);
        assert_eq!(Hand::Left.controller_index(), 1);
        assert_eq!(Hand::Other.controller_index(), 2);
    }

    #[test]
    fn test_hand_default_is_left() {
        assert_eq!(Hand::default(), Hand::Left);
    }

    #[test]
    fn test_enumerate_unavailable_api() {
        let mut source = MockGamepadSource::new();
        source.expect_gamepads().returning(|| None);
        assert!(enumerate_gamepads(&source).is_empty());
    }

    #[test]
    fn test_find_controller_by_prefix_and_position() {
        let source = source_with(&[
            "OpenVR Gamepad",
            "Xbox 360 Controller",
            "OpenVR Gamepad",
            "OpenVR Gamepad",
        ]);

        assert_eq!(find_controller(&source, "OpenVR Gamepad", 0).unwrap().index, 0);
        assert_eq!(find_controller(&source, "OpenVR Gamepad", 1).unwrap().index, 2);
        assert_eq!(find_controller(&source, "OpenVR Gamepad", 2).unwrap().index, 3);
        assert!(find_controller(&source, "OpenVR Gamepad", 3).is_none());
    }

    #[test]
    fn test_find_controller_requires_prefix_not_substring() {
        let source = source_with(&["My OpenVR Gamepad"]);
        assert!(find_controller(&source, "OpenVR", 0).is_none());
    }

    #[test]
    fn test_find_controller_no_api() {
        let mut source = MockGamepadSource::new();
        source.expect_gamepads().returning(|| None);
        assert!(find_controller(&source, "OpenVR", 0).is_none());
    }
}
