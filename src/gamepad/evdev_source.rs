//! # Evdev Gamepad Source
//!
//! Enumerates gamepad-like devices on Linux using the evdev interface.
//!
//! A device counts as a gamepad when it exposes either the standard gamepad
//! face button (`BTN_SOUTH`) or the joystick trigger button (`BTN_TRIGGER`).
//! SteamVR exposes tracked controllers to the host as joysticks, so both kinds
//! are reported. The device name becomes the descriptor id.
//!
//! evdev carries no pose data, so descriptors from this source never report a
//! pose and are skipped by [`TrackedControlsSystem`](super::tracked::TrackedControlsSystem).

use evdev::{Device, Key};
use std::path::{Path, PathBuf};
use tracing::debug;

use super::{GamepadDescriptor, GamepadSource};

/// Default directory scanned for `event*` device nodes.
const DEFAULT_INPUT_DIR: &str = "/dev/input";

/// Gamepad list backed by `/dev/input/event*` devices.
#[derive(Debug, Clone)]
pub struct EvdevGamepadSource {
    input_dir: PathBuf,
}

impl Default for EvdevGamepadSource {
    fn default() -> Self {
        Self::new()
    }
}

impl EvdevGamepadSource {
    /// Creates a source scanning `/dev/input`.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use vive_controls::gamepad::{enumerate_gamepads, EvdevGamepadSource};
    ///
    /// let source = EvdevGamepadSource::new();
    /// for gamepad in enumerate_gamepads(&source) {
    ///     println!("{}: {}", gamepad.index, gamepad.id);
    /// }
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::with_input_dir(DEFAULT_INPUT_DIR)
    }

    /// Creates a source scanning a custom directory.
    #[must_use]
    pub fn with_input_dir(input_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
        }
    }

    /// Directory this source scans.
    pub fn input_dir(&self) -> &Path {
        &self.input_dir
    }

    /// Sorted `event*` paths under the input directory, or `None` when the
    /// directory cannot be read.
    fn event_paths(&self) -> Option<Vec<PathBuf>> {
        let entries = match std::fs::read_dir(&self.input_dir) {
            Ok(entries) => entries,
            Err(e) => {
                debug!("Cannot read {}: {}", self.input_dir.display(), e);
                return None;
            }
        };

        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.file_name()
                    .map(|name| name.to_string_lossy().starts_with("event"))
                    .unwrap_or(false)
            })
            .collect();

        // Deterministic order so controller indices stay stable between polls
        paths.sort();
        Some(paths)
    }
}

/// Whether an opened device looks like a gamepad or joystick.
fn is_gamepad(device: &Device) -> bool {
    device
        .supported_keys()
        .map(|keys| keys.contains(Key::BTN_SOUTH) || keys.contains(Key::BTN_TRIGGER))
        .unwrap_or(false)
}

/// Descriptor id for a device: its name, or the vendor/product pair.
fn device_id(device: &Device) -> String {
    match device.name() {
        Some(name) => name.to_string(),
        None => {
            let id = device.input_id();
            format!("{:04x}:{:04x}", id.vendor(), id.product())
        }
    }
}

impl GamepadSource for EvdevGamepadSource {
    fn gamepads(&self) -> Option<Vec<GamepadDescriptor>> {
        let paths = self.event_paths()?;

        let gamepads = paths
            .iter()
            .filter_map(|path| match Device::open(path) {
                Ok(device) => Some(device),
                Err(e) => {
                    // Permission denied or other errors - skip device
                    debug!("Could not open {}: {}", path.display(), e);
                    None
                }
            })
            .filter(is_gamepad)
            .enumerate()
            .map(|(index, device)| GamepadDescriptor::new(index, device_id(&device)))
            .collect();

        Some(gamepads)
    }

    fn reports_pose(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_input_dir() {
        let source = EvdevGamepadSource::default();
        assert_eq!(source.input_dir(), Path::new("/dev/input"));
    }

    #[test]
    fn test_never_reports_pose() {
        assert!(!EvdevGamepadSource::new().reports_pose());
    }

    #[test]
    fn test_missing_input_dir_means_no_api() {
        let source = EvdevGamepadSource::with_input_dir("/nonexistent/input/dir");
        assert!(source.gamepads().is_none());
    }

    #[test]
    fn test_directory_without_event_nodes_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("js0"), b"").unwrap();
        std::fs::write(dir.path().join("mouse0"), b"").unwrap();

        let source = EvdevGamepadSource::with_input_dir(dir.path());
        assert_eq!(source.gamepads(), Some(vec![]));
    }

    #[test]
    fn test_unopenable_event_nodes_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        // Regular files are not evdev devices; opening them fails the ioctl
        std::fs::write(dir.path().join("event0"), b"").unwrap();

        let source = EvdevGamepadSource::with_input_dir(dir.path());
        assert_eq!(source.gamepads(), Some(vec![]));
    }

    // Integration test - only runs with real hardware
    #[test]
    #[ignore]
    fn test_enumerate_with_real_hardware() {
        let source = EvdevGamepadSource::new();
        let gamepads = source.gamepads().expect("/dev/input should exist");
        assert!(!gamepads.is_empty(), "Connect a gamepad to run this test");
        for gamepad in gamepads {
            println!("Gamepad {}: {}", gamepad.index, gamepad.id);
        }
    }
}
