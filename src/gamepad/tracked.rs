//! # Tracked Controls System
//!
//! Maintains the list of connected controllers that report pose data and
//! republishes it for the rest of the host application.
//!
//! The list is rebuilt at most once per interval (10ms by default). Each
//! rebuild produces a [`TrackedControlsTick`] the host publishes on the scene
//! under [`TRACKED_CONTROLS_TICK_EVENT`].

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::trace;

use super::{enumerate_gamepads, GamepadDescriptor, GamepadSource};

/// Scene event name for a rebuilt controller list.
pub const TRACKED_CONTROLS_TICK_EVENT: &str = "tracked-controls.tick";

/// Default minimum time between list rebuilds.
pub const DEFAULT_REBUILD_INTERVAL: Duration = Duration::from_millis(10);

/// Payload published after each rebuild.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackedControlsTick {
    pub timestamp: DateTime<Utc>,
    pub controllers: Vec<GamepadDescriptor>,
}

/// Periodically rebuilt list of pose-reporting controllers.
#[derive(Debug)]
pub struct TrackedControlsSystem {
    controllers: Vec<GamepadDescriptor>,
    last_check: Option<Instant>,
    interval: Duration,
}

impl Default for TrackedControlsSystem {
    fn default() -> Self {
        Self::new(DEFAULT_REBUILD_INTERVAL)
    }
}

impl TrackedControlsSystem {
    /// Creates a system that rebuilds at most once per `interval`.
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self {
            controllers: Vec::new(),
            last_check: None,
            interval,
        }
    }

    /// Controllers found by the most recent rebuild.
    pub fn controllers(&self) -> &[GamepadDescriptor] {
        &self.controllers
    }

    /// Replaces the list with every gamepad that currently reports a pose.
    pub fn rebuild_controller_list(&mut self, source: &dyn GamepadSource) {
        self.controllers = enumerate_gamepads(source)
            .into_iter()
            .filter(|gamepad| gamepad.pose.is_some())
            .collect();
    }

    /// Per-frame hook.
    ///
    /// Rebuilds the list when the interval has elapsed since the previous
    /// rebuild and returns the payload to publish; returns `None` otherwise.
    pub fn tick(&mut self, source: &dyn GamepadSource, now: Instant) -> Option<TrackedControlsTick> {
        if let Some(last) = self.last_check {
            if now.saturating_duration_since(last) < self.interval {
                return None;
            }
        }

        self.last_check = Some(now);
        self.rebuild_controller_list(source);
        trace!("Rebuilt tracked controller list ({} controllers)", self.controllers.len());

        Some(TrackedControlsTick {
            timestamp: Utc::now(),
            controllers: self.controllers.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gamepad::{MockGamepadSource, Pose};

    fn mixed_source() -> MockGamepadSource {
        let gamepads = vec![
            GamepadDescriptor::new(0, "OpenVR Gamepad").with_pose(Pose::default()),
            GamepadDescriptor::new(1, "Xbox 360 Controller"),
            GamepadDescriptor::new(2, "OpenVR Gamepad").with_pose(Pose::default()),
        ];
        let mut source = MockGamepadSource::new();
        source.expect_gamepads().returning(move || Some(gamepads.clone()));
        source
    }

    #[test]
    fn test_rebuild_keeps_only_posed_gamepads() {
        let mut system = TrackedControlsSystem::default();
        system.rebuild_controller_list(&mixed_source());

        let indices: Vec<_> = system.controllers().iter().map(|c| c.index).collect();
        assert_eq!(indices, vec![0, 2]);
    }

    #[test]
    fn test_first_tick_rebuilds() {
        let mut system = TrackedControlsSystem::default();
        let tick = system.tick(&mixed_source(), Instant::now()).unwrap();
        assert_eq!(tick.controllers.len(), 2);
    }

    #[test]
    fn test_tick_respects_interval() {
        let mut system = TrackedControlsSystem::new(Duration::from_millis(10));
        let source = mixed_source();
        let start = Instant::now();

        assert!(system.tick(&source, start).is_some());
        assert!(system.tick(&source, start + Duration::from_millis(5)).is_none());
        assert!(system.tick(&source, start + Duration::from_millis(10)).is_some());
        assert!(system.tick(&source, start + Duration::from_millis(15)).is_none());
    }

    #[test]
    fn test_tick_without_api_publishes_empty_list() {
        let mut source = MockGamepadSource::new();
        source.expect_gamepads().returning(|| None);

        let mut system = TrackedControlsSystem::default();
        let tick = system.tick(&source, Instant::now()).unwrap();
        assert!(tick.controllers.is_empty());
        assert!(system.controllers().is_empty());
    }

    #[test]
    fn test_tick_event_name() {
        assert_eq!(TRACKED_CONTROLS_TICK_EVENT, "tracked-controls.tick");
    }
}
