//! # Vive Controls Component
//!
//! Lifecycle-driven component that binds one Vive controller to a scene
//! entity.
//!
//! It polls for the controller through [`PresencePoller`], translates raw
//! button and axis notifications into semantic events using the tables in
//! [`mapping`](super::mapping), and reflects button state on the loaded
//! controller model:
//!
//! - pressed or touched buttons take the highlight color, released ones the
//!   base color
//! - the trigger mesh tilts with the analog trigger value, up to 15 degrees
//!
//! ## Usage
//!
//! ```no_run
//! use std::time::Instant;
//! use vive_controls::config::Config;
//! use vive_controls::controls::{ControllerEntity, ViveControls};
//! use vive_controls::gamepad::EvdevGamepadSource;
//!
//! fn run(entity: &mut dyn ControllerEntity) -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config/default.toml")?;
//!     let source = EvdevGamepadSource::new();
//!     let mut controls = ViveControls::new(
//!         config.controls.clone(),
//!         config.polling.presence_check_interval(),
//!     );
//!
//!     controls.on_attach(&source, entity, Instant::now());
//!     loop {
//!         controls.on_tick(&source, entity, Instant::now());
//!         // Route raw notifications with controls.handle_event(entity, event)
//!     }
//! }
//! ```

use std::f32::consts::PI;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use super::entity::ControllerEntity;
use super::events::{AxisMoveDetail, ButtonState, ControlsEvent, RawInputEvent};
use super::mapping::{buttons_for, Button, ButtonAction, AXIS_MAPPING};
use super::presence::PresencePoller;
use crate::config::ControlsConfig;
use crate::gamepad::GamepadSource;
use crate::scene::{Color, ControllerModel, MeshRef, Vec3};

/// Trigger tilt at full pull (15 degrees), applied as a negative X rotation.
pub const TRIGGER_MAX_ROTATION: f32 = PI / 12.0;

/// Root offset that moves the model pivot onto the tracked point.
pub const MODEL_PIVOT_OFFSET: Vec3 = Vec3::new(0.0, -0.015, 0.04);

/// Mesh names in the controller model.
pub mod mesh_names {
    pub const LEFT_GRIP: &str = "leftgrip";
    pub const RIGHT_GRIP: &str = "rightgrip";
    pub const MENU: &str = "menubutton";
    pub const SYSTEM: &str = "systembutton";
    pub const TRACKPAD: &str = "touchpad";
    pub const TRIGGER: &str = "trigger";
}

/// Button meshes found in the loaded model. Any of them may be missing.
#[derive(Debug, Clone, Default)]
pub struct ButtonMeshes {
    pub grip_left: Option<MeshRef>,
    pub grip_right: Option<MeshRef>,
    pub menu: Option<MeshRef>,
    pub system: Option<MeshRef>,
    pub trackpad: Option<MeshRef>,
    pub trigger: Option<MeshRef>,
}

impl ButtonMeshes {
    /// Looks up every button mesh by name.
    #[must_use]
    pub fn from_model(model: &ControllerModel) -> Self {
        Self {
            grip_left: model.object_by_name(mesh_names::LEFT_GRIP),
            grip_right: model.object_by_name(mesh_names::RIGHT_GRIP),
            menu: model.object_by_name(mesh_names::MENU),
            system: model.object_by_name(mesh_names::SYSTEM),
            trackpad: model.object_by_name(mesh_names::TRACKPAD),
            trigger: model.object_by_name(mesh_names::TRIGGER),
        }
    }

    /// Meshes that visualize `button`. Grip covers both grip meshes.
    pub fn meshes_for(&self, button: Button) -> Vec<&MeshRef> {
        let slots = match button {
            Button::Grip => vec![&self.grip_left, &self.grip_right],
            Button::Menu => vec![&self.menu],
            Button::System => vec![&self.system],
            Button::Trackpad => vec![&self.trackpad],
            Button::Trigger => vec![&self.trigger],
        };
        slots.into_iter().flatten().collect()
    }
}

/// Vive controller component state.
#[derive(Debug)]
pub struct ViveControls {
    config: ControlsConfig,
    poller: PresencePoller,
    button_meshes: Option<ButtonMeshes>,
    playing: bool,
}

impl ViveControls {
    /// Creates the component (host `init`). Nothing is queried until
    /// [`on_attach`](Self::on_attach).
    ///
    /// # Examples
    ///
    /// ```
    /// use std::time::Duration;
    /// use vive_controls::config::ControlsConfig;
    /// use vive_controls::controls::ViveControls;
    ///
    /// let controls = ViveControls::new(ControlsConfig::default(), Duration::from_secs(1));
    /// assert!(!controls.is_present());
    /// assert!(controls.button_meshes().is_none());
    /// ```
    #[must_use]
    pub fn new(config: ControlsConfig, check_interval: Duration) -> Self {
        Self {
            config,
            poller: PresencePoller::new(check_interval),
            button_meshes: None,
            playing: false,
        }
    }

    pub fn config(&self) -> &ControlsConfig {
        &self.config
    }

    /// Whether the physical controller is currently detected.
    pub fn is_present(&self) -> bool {
        self.poller.is_present()
    }

    /// Whether raw input notifications are being handled.
    pub fn is_listening(&self) -> bool {
        self.poller.is_listening()
    }

    /// Button meshes of the loaded model, if one has loaded.
    pub fn button_meshes(&self) -> Option<&ButtonMeshes> {
        self.button_meshes.as_ref()
    }

    // ==================== Lifecycle ====================

    /// Host `play`: checks presence immediately and starts reacting to
    /// gamepad connection notifications and ticks.
    pub fn on_attach(
        &mut self,
        source: &dyn GamepadSource,
        entity: &mut dyn ControllerEntity,
        now: Instant,
    ) {
        self.playing = true;
        self.poller.mark_checked(now);
        self.poller.check_presence(source, entity, &self.config);
    }

    /// Host `pause`: removes input listeners and ignores further ticks and
    /// connection notifications until attached again.
    pub fn on_detach(&mut self, entity: &mut dyn ControllerEntity) {
        self.playing = false;
        self.poller.stop_listening(entity);
    }

    /// Per-frame hook. Re-checks presence when the fallback interval elapsed.
    pub fn on_tick(
        &mut self,
        source: &dyn GamepadSource,
        entity: &mut dyn ControllerEntity,
        now: Instant,
    ) {
        if self.playing && self.poller.poll_due(now) {
            self.poller.check_presence(source, entity, &self.config);
        }
    }

    /// Platform notification that a gamepad was connected.
    pub fn on_gamepad_connected(
        &mut self,
        source: &dyn GamepadSource,
        entity: &mut dyn ControllerEntity,
    ) {
        if self.playing {
            self.poller.on_gamepad_connection_changed(source, entity, &self.config);
        }
    }

    /// Platform notification that a gamepad was disconnected.
    pub fn on_gamepad_disconnected(
        &mut self,
        source: &dyn GamepadSource,
        entity: &mut dyn ControllerEntity,
    ) {
        if self.playing {
            self.poller.on_gamepad_connection_changed(source, entity, &self.config);
        }
    }

    /// Host `update`: applies a new configuration.
    ///
    /// Changing `emulated` re-evaluates presence and listener registration.
    /// Changing which device is tracked (`hand`, `id_prefix`) or how it is
    /// attached (`rotation_offset`, `model`) re-attaches the tracked-pose and
    /// model components if the new selection is present.
    pub fn update(
        &mut self,
        config: ControlsConfig,
        source: &dyn GamepadSource,
        entity: &mut dyn ControllerEntity,
    ) {
        let emulated_changed = config.emulated != self.config.emulated;
        let attachment_changed = config.hand != self.config.hand
            || config.id_prefix != self.config.id_prefix
            || config.rotation_offset != self.config.rotation_offset
            || config.model != self.config.model;
        self.config = config;

        if !self.playing {
            return;
        }

        if attachment_changed {
            debug!("Controller selection changed, re-attaching");
            self.poller.forget_presence();
            self.poller.check_presence(source, entity, &self.config);
        } else if emulated_changed {
            debug!("Emulation set to {}, re-checking presence", self.config.emulated);
            self.poller.check_presence(source, entity, &self.config);
        }
    }

    // ==================== Input ====================

    /// Routes a raw notification to its handler. Ignored while not listening.
    pub fn handle_event(&mut self, entity: &mut dyn ControllerEntity, event: RawInputEvent) {
        if !self.poller.is_listening() {
            debug!("Ignoring {} while not listening", event.kind().event_name());
            return;
        }

        match event {
            RawInputEvent::ButtonChanged { id, state } => self.on_button_changed(entity, id, state),
            RawInputEvent::ButtonDown { id } => self.on_button_down(entity, id),
            RawInputEvent::ButtonUp { id } => self.on_button_up(entity, id),
            RawInputEvent::TouchStart { id } => self.on_button_touch_start(entity, id),
            RawInputEvent::TouchEnd { id } => self.on_button_touch_end(entity, id),
            RawInputEvent::AxisMoved { axis, changed } => self.on_axis_moved(entity, &axis, &changed),
            RawInputEvent::ModelLoaded { model } => {
                let borrowed = model.try_borrow_mut();
                match borrowed {
                    Ok(mut root) => self.on_model_loaded(&mut root),
                    Err(_) => debug!("Ignoring model-loaded: model is borrowed elsewhere"),
                }
            }
        }
    }

    /// Emits `<button>changed` and tilts the trigger mesh when model display
    /// is enabled.
    pub fn on_button_changed(
        &mut self,
        entity: &mut dyn ControllerEntity,
        id: usize,
        state: ButtonState,
    ) {
        let buttons = buttons_for(id);
        if buttons.is_empty() {
            debug!("Ignoring change of unmapped button {}", id);
            return;
        }

        for &button in buttons {
            if button == Button::Trigger && self.config.model {
                if let Some(trigger) = self.button_meshes.as_ref().and_then(|m| m.trigger.as_ref()) {
                    trigger.borrow_mut().rotation.x = -state.value * TRIGGER_MAX_ROTATION;
                }
            }
            entity.emit(ControlsEvent::Changed { button, state });
        }
    }

    pub fn on_button_down(&mut self, entity: &mut dyn ControllerEntity, id: usize) {
        self.on_button_event(entity, id, ButtonAction::Down);
    }

    pub fn on_button_up(&mut self, entity: &mut dyn ControllerEntity, id: usize) {
        self.on_button_event(entity, id, ButtonAction::Up);
    }

    pub fn on_button_touch_start(&mut self, entity: &mut dyn ControllerEntity, id: usize) {
        self.on_button_event(entity, id, ButtonAction::TouchStart);
    }

    pub fn on_button_touch_end(&mut self, entity: &mut dyn ControllerEntity, id: usize) {
        self.on_button_event(entity, id, ButtonAction::TouchEnd);
    }

    /// Emits `<button><action>` for every button mapped to `id` and updates
    /// the model colors.
    fn on_button_event(&mut self, entity: &mut dyn ControllerEntity, id: usize, action: ButtonAction) {
        let buttons = buttons_for(id);
        if buttons.is_empty() {
            debug!("Ignoring {} of unmapped button {}", action.suffix(), id);
            return;
        }

        for &button in buttons {
            entity.emit(ControlsEvent::Button { button, action });
            if self.config.model {
                self.update_button_model(button, action);
            }
        }
    }

    /// Emits `<group>moved` for every axis group with at least one changed
    /// member axis.
    pub fn on_axis_moved(&mut self, entity: &mut dyn ControllerEntity, axis: &[f32], changed: &[bool]) {
        for &(group, axes) in AXIS_MAPPING {
            let any_changed = axes.iter().any(|&i| changed.get(i).copied().unwrap_or(false));
            if !any_changed {
                continue;
            }

            let mut detail = AxisMoveDetail::default();
            for (position, &i) in axes.iter().enumerate() {
                detail.set(position, axis.get(i).copied());
            }
            entity.emit(ControlsEvent::Moved { group, detail });
        }
    }

    /// Caches the button meshes of a freshly loaded model and corrects its
    /// pivot. Ignored when model display is disabled.
    pub fn on_model_loaded(&mut self, model: &mut ControllerModel) {
        if !self.config.model {
            return;
        }

        let meshes = ButtonMeshes::from_model(model);
        let found = [
            &meshes.grip_left,
            &meshes.grip_right,
            &meshes.menu,
            &meshes.system,
            &meshes.trackpad,
            &meshes.trigger,
        ]
        .iter()
        .filter(|m| m.is_some())
        .count();
        info!("Controller model loaded ({} of 6 button meshes found)", found);

        self.button_meshes = Some(meshes);
        model.position = MODEL_PIVOT_OFFSET;
    }

    /// Colors the meshes of `button` for the given transition. No-op before
    /// a model has loaded or for meshes the model lacks.
    pub fn update_button_model(&self, button: Button, action: ButtonAction) {
        let Some(meshes) = &self.button_meshes else {
            return;
        };

        let color = self.color_for(action);
        for mesh in meshes.meshes_for(button) {
            mesh.borrow_mut().set_color(color);
        }
    }

    fn color_for(&self, action: ButtonAction) -> Color {
        if action.is_active() {
            self.config.button_highlight_color
        } else {
            self.config.button_color
        }
    }
}
