//! Host entity abstraction for the controls component

use serde::Serialize;

use super::events::{ControlsEvent, RawEventKind};

/// Settings for the generic tracked-pose component attached to the entity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackedControlsAttachment {
    pub id_prefix: String,
    /// Which of the devices sharing `id_prefix` to track.
    pub controller_index: usize,
    pub rotation_offset: f32,
}

/// Settings for the model loader component attached to the entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelAttachment {
    pub obj_url: String,
    pub mtl_url: String,
}

/// The scene entity the controls component is attached to.
///
/// Implemented by the host. Raw input notifications are routed back to the
/// component only for the kinds registered with
/// [`add_input_listeners`](ControllerEntity::add_input_listeners).
pub trait ControllerEntity {
    /// Emits a semantic event on the entity.
    fn emit(&mut self, event: ControlsEvent);

    /// Attaches (or reconfigures) the tracked-pose component.
    fn attach_tracked_controls(&mut self, attachment: TrackedControlsAttachment);

    /// Attaches (or reconfigures) the model loader component.
    fn attach_model(&mut self, model: ModelAttachment);

    /// Starts routing the given raw notification kinds to the component.
    fn add_input_listeners(&mut self, kinds: &[RawEventKind]);

    /// Stops routing the given raw notification kinds to the component.
    fn remove_input_listeners(&mut self, kinds: &[RawEventKind]);
}
