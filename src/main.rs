//! # Vive Controls
//!
//! Runs the Vive controls component against the local gamepad list and logs
//! everything it does.
//!
//! Without a host scene there is nothing to render, so this binary stands in
//! for the host: it owns the tick loop, plays the role of the controller
//! entity and writes every attachment, listener change and emitted event to
//! the log.

use std::path::Path;

use anyhow::{Context, Result};
use tokio::time::{interval, Duration};
use tracing::{debug, info, trace, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use vive_controls::config::{Config, LoggingConfig, PollingConfig};
use vive_controls::controls::{
    ControllerEntity, ControlsEvent, ModelAttachment, RawEventKind, TrackedControlsAttachment,
    ViveControls,
};
use vive_controls::gamepad::tracked::{TrackedControlsSystem, TRACKED_CONTROLS_TICK_EVENT};
use vive_controls::gamepad::{EvdevGamepadSource, GamepadSource};

/// Environment variable overriding the configuration file path
const CONFIG_ENV_VAR: &str = "VIVE_CONTROLS_CONFIG";

/// Configuration file used when the environment variable is unset
const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// File name prefix for rotated log files
const LOG_FILE_NAME: &str = "vive-controls.log";

/// Host entity that logs everything the component asks of it
#[derive(Debug, Default)]
struct LoggingEntity {
    listening: bool,
}

impl ControllerEntity for LoggingEntity {
    fn emit(&mut self, event: ControlsEvent) {
        match serde_json::to_string(&event) {
            Ok(detail) => info!("Event {}: {}", event.name(), detail),
            Err(e) => warn!("Failed to serialize {}: {}", event.name(), e),
        }
    }

    fn attach_tracked_controls(&mut self, attachment: TrackedControlsAttachment) {
        info!(
            "Attached tracked controls: {}[{}] (rotation offset {})",
            attachment.id_prefix, attachment.controller_index, attachment.rotation_offset
        );
    }

    fn attach_model(&mut self, model: ModelAttachment) {
        info!("Attached controller model: obj={} mtl={}", model.obj_url, model.mtl_url);
    }

    fn add_input_listeners(&mut self, kinds: &[RawEventKind]) {
        if self.listening {
            debug!("Input listeners already registered");
        }
        self.listening = true;
        let names: Vec<_> = kinds.iter().map(|k| k.event_name()).collect();
        info!("Listening for {}", names.join(", "));
    }

    fn remove_input_listeners(&mut self, kinds: &[RawEventKind]) {
        self.listening = false;
        debug!("Stopped listening for {} event kinds", kinds.len());
    }
}

/// Loads the configuration from `VIVE_CONTROLS_CONFIG`, the default path, or
/// built-in defaults when neither exists.
fn load_config() -> Result<Config> {
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        return Config::load(&path).with_context(|| format!("Failed to load config from {}", path));
    }

    if Path::new(DEFAULT_CONFIG_PATH).exists() {
        return Config::load(DEFAULT_CONFIG_PATH)
            .with_context(|| format!("Failed to load config from {}", DEFAULT_CONFIG_PATH));
    }

    Ok(Config::default())
}

/// Tracked controller list for sources that can report poses.
///
/// A pose-less source would only ever publish an empty list, so no system is
/// built and the device list is not rescanned every frame.
fn tracked_system_for(
    source: &dyn GamepadSource,
    polling: &PollingConfig,
) -> Option<TrackedControlsSystem> {
    source
        .reports_pose()
        .then(|| TrackedControlsSystem::new(polling.tracked_controls_interval()))
}

/// Installs console logging plus optional daily-rotated file logging.
///
/// `RUST_LOG` takes precedence over the configured level. The returned guard
/// must be kept alive for file logs to be flushed.
fn init_logging(config: &LoggingConfig) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));
    let registry = tracing_subscriber::registry().with(filter).with(fmt::layer());

    match &config.log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_NAME);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            registry
                .with(fmt::layer().with_writer(writer).with_ansi(false))
                .init();
            Some(guard)
        }
        None => {
            registry.init();
            None
        }
    }
}

/// Main entry point for Vive Controls
///
/// Loads the configuration, attaches the controls component and drives it
/// from a fixed-rate tick until Ctrl+C, then detaches it.
///
/// # Errors
///
/// Returns error if the configuration file exists but cannot be loaded.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let config = load_config()?;
    let _log_guard = init_logging(&config.logging);

    info!("Vive Controls v{} starting...", env!("CARGO_PKG_VERSION"));

    let source = EvdevGamepadSource::new();
    let mut entity = LoggingEntity::default();
    let mut tracked = tracked_system_for(&source, &config.polling);
    if tracked.is_none() {
        info!("Gamepad source reports no poses, tracked controller list disabled");
    }
    let mut controls = ViveControls::new(
        config.controls.clone(),
        config.polling.presence_check_interval(),
    );

    controls.on_attach(&source, &mut entity, std::time::Instant::now());
    info!(
        "Watching for {} hand controller '{}' (present: {})",
        config.controls.hand,
        config.controls.id_prefix,
        controls.is_present()
    );

    let mut ticker = interval(Duration::from_millis(config.polling.tracked_controls_interval_ms));
    info!("Press Ctrl+C to exit");

    loop {
        tokio::select! {
            instant = ticker.tick() => {
                let now = instant.into_std();

                if let Some(tick) = tracked.as_mut().and_then(|t| t.tick(&source, now)) {
                    trace!(
                        "{}: {} tracked controllers at {}",
                        TRACKED_CONTROLS_TICK_EVENT,
                        tick.controllers.len(),
                        tick.timestamp
                    );
                }

                controls.on_tick(&source, &mut entity, now);
            }

            _ = tokio::signal::ctrl_c() => {
                info!("Received Ctrl+C, shutting down...");
                controls.on_detach(&mut entity);
                break;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_constants() {
        assert_eq!(CONFIG_ENV_VAR, "VIVE_CONTROLS_CONFIG");
        assert_eq!(DEFAULT_CONFIG_PATH, "config/default.toml");
        assert_eq!(LOG_FILE_NAME, "vive-controls.log");
    }

    #[test]
    fn test_shipped_default_config_is_valid() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join(DEFAULT_CONFIG_PATH);
        let config = Config::load(path).expect("config/default.toml should load");
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_no_tracked_system_for_evdev_source() {
        let source = EvdevGamepadSource::new();
        assert!(tracked_system_for(&source, &PollingConfig::default()).is_none());
    }

    #[test]
    fn test_tracked_system_for_posed_source() {
        struct Posed;

        impl GamepadSource for Posed {
            fn gamepads(&self) -> Option<Vec<vive_controls::gamepad::GamepadDescriptor>> {
                Some(vec![])
            }
        }

        assert!(tracked_system_for(&Posed, &PollingConfig::default()).is_some());
    }

    #[test]
    fn test_logging_entity_tracks_listeners() {
        let mut entity = LoggingEntity::default();
        entity.add_input_listeners(&RawEventKind::ALL);
        assert!(entity.listening);
        entity.remove_input_listeners(&RawEventKind::ALL);
        assert!(!entity.listening);
    }
}
