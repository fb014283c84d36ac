//! # Button and Axis Mapping Module
//!
//! Static tables translating raw gamepad indices into semantic controller
//! buttons and axis groups.
//!
//! ## Button Indices
//!
//! | Index | Button | Notes |
//! |-------|--------|-------|
//! | 0 | Trackpad | Click on the circular pad |
//! | 1 | Trigger | Analog value 0.0-1.0 |
//! | 2 | Grip | Both side grips report as one button |
//! | 3 | Menu | Application menu button |
//! | 4 | System | Usually consumed by the runtime |
//!
//! ## Axis Groups
//!
//! | Group | Raw Axes | Labels |
//! |-------|----------|--------|
//! | Trackpad | 0, 1 | x, y |
//!
//! ## Usage
//!
//! ```
//! use vive_controls::controls::mapping::{buttons_for, Button};
//!
//! assert_eq!(buttons_for(1), &[Button::Trigger]);
//! assert!(buttons_for(5).is_empty());
//! ```

use serde::Serialize;

/// Semantic controller button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Button {
    Trackpad,
    Trigger,
    Grip,
    Menu,
    System,
}

impl Button {
    /// Event name prefix, e.g. `trigger` in `triggerdown`.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Button::Trackpad => "trackpad",
            Button::Trigger => "trigger",
            Button::Grip => "grip",
            Button::Menu => "menu",
            Button::System => "system",
        }
    }
}

/// Group of raw axes reported together as one `<group>moved` event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisGroup {
    Trackpad,
}

impl AxisGroup {
    /// Event name prefix, e.g. `trackpad` in `trackpadmoved`.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            AxisGroup::Trackpad => "trackpad",
        }
    }
}

/// Transient button transition reported by the tracked-pose component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonAction {
    Down,
    Up,
    TouchStart,
    TouchEnd,
}

impl ButtonAction {
    /// Event name suffix, e.g. `down` in `triggerdown`.
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            ButtonAction::Down => "down",
            ButtonAction::Up => "up",
            ButtonAction::TouchStart => "touchstart",
            ButtonAction::TouchEnd => "touchend",
        }
    }

    /// Whether the button should be drawn highlighted after this transition.
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, ButtonAction::Down | ButtonAction::TouchStart)
    }
}

/// Raw button index to semantic button(s). An entry may hold several buttons
/// for physical controls that report as a combination.
pub const BUTTON_MAPPING: [&[Button]; 5] = [
    &[Button::Trackpad],
    &[Button::Trigger],
    &[Button::Grip],
    &[Button::Menu],
    &[Button::System],
];

/// Axis groups and the raw axis indices they cover, in label order.
pub const AXIS_MAPPING: &[(AxisGroup, &[usize])] = &[(AxisGroup::Trackpad, &[0, 1])];

/// Positional labels for the members of an axis group.
pub const AXIS_LABELS: [&str; 4] = ["x", "y", "z", "w"];

/// Looks up the semantic buttons for a raw button index.
///
/// Returns an empty slice for indices outside the table.
#[must_use]
pub fn buttons_for(index: usize) -> &'static [Button] {
    BUTTON_MAPPING.get(index).copied().unwrap_or(&[])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_table() {
        assert_eq!(buttons_for(0), &[Button::Trackpad]);
        assert_eq!(buttons_for(1), &[Button::Trigger]);
        assert_eq!(buttons_for(2), &[Button::Grip]);
        assert_eq!(buttons_for(3), &[Button::Menu]);
        assert_eq!(buttons_for(4), &[Button::System]);
    }

    #[test]
    fn test_unknown_indices_map_to_nothing() {
        for index in [5, 6, 16, usize::MAX] {
            assert!(buttons_for(index).is_empty(), "index {} should be unmapped", index);
        }
    }

    #[test]
    fn test_button_names() {
        let names: Vec<_> = BUTTON_MAPPING
            .iter()
            .flat_map(|buttons| buttons.iter().map(|b| b.name()))
            .collect();
        assert_eq!(names, ["trackpad", "trigger", "grip", "menu", "system"]);
    }

    #[test]
    fn test_action_suffixes() {
        assert_eq!(ButtonAction::Down.suffix(), "down");
        assert_eq!(ButtonAction::Up.suffix(), "up");
        assert_eq!(ButtonAction::TouchStart.suffix(), "touchstart");
        assert_eq!(ButtonAction::TouchEnd.suffix(), "touchend");
    }

    #[test]
    fn test_active_actions() {
        assert!(ButtonAction::Down.is_active());
        assert!(ButtonAction::TouchStart.is_active());
        assert!(!ButtonAction::Up.is_active());
        assert!(!ButtonAction::TouchEnd.is_active());
    }

    #[test]
    fn test_trackpad_axis_group() {
        assert_eq!(AXIS_MAPPING.len(), 1);
        let (group, axes) = AXIS_MAPPING[0];
        assert_eq!(group, AxisGroup::Trackpad);
        assert_eq!(axes, &[0, 1]);
        assert!(axes.len() <= AXIS_LABELS.len());
    }
}
