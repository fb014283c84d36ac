//! # Controller Presence Module
//!
//! Detects whether the controller for a given hand is connected and keeps the
//! entity in sync with that state.
//!
//! ## Selection
//!
//! Devices whose id starts with the configured prefix are counted in platform
//! order. The right controller is the first match, the left controller the
//! second and any other hand the third.
//!
//! ## Transitions
//!
//! | Change | Side effects |
//! |--------|--------------|
//! | absent -> present | attach tracked-pose component, attach model loader (if `model`) |
//! | present -> absent | none besides listener removal |
//!
//! Input listeners are registered while the controller is present or the
//! configuration marks it as emulated, and are added or removed exactly once
//! per change of that condition.
//!
//! ## Polling
//!
//! Checks run on attach, on every gamepad connect/disconnect notification,
//! and from the per-frame tick at most once per check interval. Some
//! platforms never deliver connect/disconnect notifications, so the timer
//! path always stays active.

use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use super::entity::{ControllerEntity, ModelAttachment, TrackedControlsAttachment};
use super::events::RawEventKind;
use crate::config::{ControlsConfig, ROTATION_OFFSET_AUTO_SENTINEL};
use crate::gamepad::{find_controller, GamepadSource};

/// Controller model geometry.
pub const VIVE_CONTROLLER_MODEL_OBJ_URL: &str =
    "https://cdn.aframe.io/controllers/vive/vr_controller_vive.obj";

/// Controller model materials.
pub const VIVE_CONTROLLER_MODEL_MTL_URL: &str =
    "https://cdn.aframe.io/controllers/vive/vr_controller_vive.mtl";

/// Default fallback interval between presence checks.
pub const DEFAULT_CHECK_INTERVAL: Duration = Duration::from_millis(1000);

/// Presence state of one logical controller.
#[derive(Debug)]
pub struct PresencePoller {
    present: bool,
    listening: bool,
    ever_got_gamepad_event: bool,
    last_check: Option<Instant>,
    check_interval: Duration,
}

impl Default for PresencePoller {
    fn default() -> Self {
        Self::new(DEFAULT_CHECK_INTERVAL)
    }
}

impl PresencePoller {
    /// Creates a poller that starts out absent and not listening.
    #[must_use]
    pub fn new(check_interval: Duration) -> Self {
        Self {
            present: false,
            listening: false,
            ever_got_gamepad_event: false,
            last_check: None,
            check_interval,
        }
    }

    /// Whether a matching physical device was found by the last check.
    pub fn is_present(&self) -> bool {
        self.present
    }

    /// Whether raw input listeners are currently registered.
    pub fn is_listening(&self) -> bool {
        self.listening
    }

    /// Whether a connect/disconnect notification has ever arrived.
    pub fn ever_got_gamepad_event(&self) -> bool {
        self.ever_got_gamepad_event
    }

    /// Queries the device list and applies any presence transition.
    ///
    /// Returns the physical presence. Repeated calls without a change in the
    /// device list have no side effects.
    pub fn check_presence(
        &mut self,
        source: &dyn GamepadSource,
        entity: &mut dyn ControllerEntity,
        config: &ControlsConfig,
    ) -> bool {
        let controller_index = config.hand.controller_index();
        let found = find_controller(source, &config.id_prefix, controller_index);
        let present = found.is_some();

        debug!(
            "Presence check for {} hand ({}[{}]): {}",
            config.hand,
            config.id_prefix,
            controller_index,
            if present { "present" } else { "absent" }
        );

        if present != self.present {
            self.present = present;
            if let Some(gamepad) = found {
                info!(
                    "Controller connected: {} (device {}, {} hand)",
                    gamepad.id, gamepad.index, config.hand
                );
                inject_tracked_controls(entity, config);
            } else {
                info!("Controller disconnected ({} hand)", config.hand);
            }
        }

        self.sync_listeners(entity, config.emulated);
        present
    }

    /// Registers or removes input listeners so they are active exactly when
    /// the controller is present or emulated.
    pub fn sync_listeners(&mut self, entity: &mut dyn ControllerEntity, emulated: bool) {
        let wanted = self.present || emulated;
        if wanted == self.listening {
            return;
        }

        self.listening = wanted;
        if wanted {
            debug!("Adding input listeners (emulated: {})", emulated);
            entity.add_input_listeners(&RawEventKind::ALL);
        } else {
            debug!("Removing input listeners");
            entity.remove_input_listeners(&RawEventKind::ALL);
        }
    }

    /// Treats the controller as absent without touching listeners, so the
    /// next check re-attaches components if a device still matches.
    pub fn forget_presence(&mut self) {
        self.present = false;
    }

    /// Removes input listeners if registered, leaving presence untouched.
    pub fn stop_listening(&mut self, entity: &mut dyn ControllerEntity) {
        if self.listening {
            self.listening = false;
            entity.remove_input_listeners(&RawEventKind::ALL);
        }
    }

    /// Handles a platform gamepad connected/disconnected notification.
    pub fn on_gamepad_connection_changed(
        &mut self,
        source: &dyn GamepadSource,
        entity: &mut dyn ControllerEntity,
        config: &ControlsConfig,
    ) -> bool {
        self.ever_got_gamepad_event = true;
        self.check_presence(source, entity, config)
    }

    /// Records a check at `now` for the fallback timer.
    pub fn mark_checked(&mut self, now: Instant) {
        self.last_check = Some(now);
    }

    /// Returns true (and records the check) when the fallback timer is due.
    pub fn poll_due(&mut self, now: Instant) -> bool {
        let due = match self.last_check {
            Some(last) => now.saturating_duration_since(last) >= self.check_interval,
            None => true,
        };
        if due {
            self.last_check = Some(now);
        }
        due
    }
}

/// Attaches the tracked-pose component and, unless disabled, the model loader.
fn inject_tracked_controls(entity: &mut dyn ControllerEntity, config: &ControlsConfig) {
    if config.rotation_offset == ROTATION_OFFSET_AUTO_SENTINEL {
        warn!(
            "rotation_offset {} (auto from hand) is not supported, passing it through unchanged",
            ROTATION_OFFSET_AUTO_SENTINEL
        );
    }

    entity.attach_tracked_controls(TrackedControlsAttachment {
        id_prefix: config.id_prefix.clone(),
        controller_index: config.hand.controller_index(),
        rotation_offset: config.rotation_offset,
    });

    if !config.model {
        return;
    }

    entity.attach_model(ModelAttachment {
        obj_url: VIVE_CONTROLLER_MODEL_OBJ_URL.to_string(),
        mtl_url: VIVE_CONTROLLER_MODEL_MTL_URL.to_string(),
    });
}
