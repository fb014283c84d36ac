//! # Configuration Module
//!
//! Handles loading and validating configuration from TOML files.

use serde::de::Error;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::error::{Result, ViveControlsError};
use crate::gamepad::Hand;
use crate::scene::Color;

/// Main configuration structure
#[derive(Debug, Default, Deserialize, Clone, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub controls: ControlsConfig,
    #[serde(default)]
    pub polling: PollingConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Controls component configuration
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ControlsConfig {
    #[serde(default)]
    pub hand: Hand,

    #[serde(default = "default_id_prefix")]
    pub id_prefix: String,

    #[serde(default = "default_button_color")]
    pub button_color: Color,

    #[serde(default = "default_button_highlight_color")]
    pub button_highlight_color: Color,

    /// Load the controller model and reflect button state on it.
    #[serde(default = "default_model")]
    pub model: bool,

    /// Passed through to the tracked-pose component untouched.
    #[serde(default)]
    pub rotation_offset: f32,

    /// Register input listeners even when no physical device is detected.
    #[serde(default)]
    pub emulated: bool,
}

/// Polling intervals
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct PollingConfig {
    #[serde(default = "default_presence_check_interval_ms")]
    pub presence_check_interval_ms: u64,

    #[serde(default = "default_tracked_controls_interval_ms")]
    pub tracked_controls_interval_ms: u64,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Directory for daily-rotated log files. Console only when unset.
    #[serde(default)]
    pub log_dir: Option<String>,
}

/// Value of `rotation_offset` once meant to request an offset derived from
/// the hand. It is not interpreted.
pub const ROTATION_OFFSET_AUTO_SENTINEL: f32 = -999.0;

// Default value functions
fn default_id_prefix() -> String { "OpenVR Gamepad".to_string() }
fn default_button_color() -> Color { Color::rgb(0xFA, 0xFA, 0xFA) }
fn default_button_highlight_color() -> Color { Color::rgb(0x22, 0xD1, 0xEE) }
fn default_model() -> bool { true }

fn default_presence_check_interval_ms() -> u64 { 1000 }
fn default_tracked_controls_interval_ms() -> u64 { 10 }

fn default_log_level() -> String { "info".to_string() }

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            hand: Hand::default(),
            id_prefix: default_id_prefix(),
            button_color: default_button_color(),
            button_highlight_color: default_button_highlight_color(),
            model: default_model(),
            rotation_offset: 0.0,
            emulated: false,
        }
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            presence_check_interval_ms: default_presence_check_interval_ms(),
            tracked_controls_interval_ms: default_tracked_controls_interval_ms(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            log_dir: None,
        }
    }
}

impl PollingConfig {
    /// Fallback interval between presence checks.
    pub fn presence_check_interval(&self) -> Duration {
        Duration::from_millis(self.presence_check_interval_ms)
    }

    /// Minimum interval between tracked controller list rebuilds.
    pub fn tracked_controls_interval(&self) -> Duration {
        Duration::from_millis(self.tracked_controls_interval_ms)
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    ///
    /// * `Result<Config>` - Loaded and validated configuration
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - TOML parsing fails (including malformed colors)
    /// - Validation fails
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use vive_controls::config::Config;
    ///
    /// let config = Config::load("config/default.toml")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse and validate configuration from a TOML string
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns error if any configuration value is out of valid range
    pub fn validate(&self) -> Result<()> {
        if self.controls.id_prefix.is_empty() {
            return Err(invalid("id_prefix cannot be empty"));
        }

        if !self.controls.rotation_offset.is_finite() {
            return Err(invalid("rotation_offset must be a finite number"));
        }

        if self.polling.presence_check_interval_ms == 0
            || self.polling.presence_check_interval_ms > 60000
        {
            return Err(invalid("presence_check_interval_ms must be between 1 and 60000"));
        }

        if self.polling.tracked_controls_interval_ms == 0
            || self.polling.tracked_controls_interval_ms > 1000
        {
            return Err(invalid("tracked_controls_interval_ms must be between 1 and 1000"));
        }

        if !["trace", "debug", "info", "warn", "error"].contains(&self.logging.level.as_str()) {
            return Err(invalid("log level must be one of: trace, debug, info, warn, error"));
        }

        if matches!(&self.logging.log_dir, Some(dir) if dir.is_empty()) {
            return Err(invalid("log_dir cannot be empty when set"));
        }

        Ok(())
    }
}

fn invalid(message: &str) -> ViveControlsError {
    ViveControlsError::Config(toml::de::Error::custom(message))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_functions() {
        assert_eq!(default_id_prefix(), "OpenVR Gamepad");
        assert_eq!(default_button_color().to_string(), "#FAFAFA");
        assert_eq!(default_button_highlight_color().to_string(), "#22D1EE");
        assert!(default_model());
        assert_eq!(default_presence_check_interval_ms(), 1000);
        assert_eq!(default_tracked_controls_interval_ms(), 10);
        assert_eq!(default_log_level(), "info");
    }

    #[test]
    fn test_controls_defaults() {
        let controls = ControlsConfig::default();
        assert_eq!(controls.hand, Hand::Left);
        assert_eq!(controls.rotation_offset, 0.0);
        assert!(controls.model);
        assert!(!controls.emulated);
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_parse_full_document() {
        let toml_content = r##"
[controls]
hand = "right"
id_prefix = "OpenVR Controller"
button_color = "#000"
button_highlight_color = "#FF0000"
model = false
rotation_offset = 15.0
emulated = true

[polling]
presence_check_interval_ms = 500
tracked_controls_interval_ms = 20

[logging]
level = "debug"
log_dir = "./logs"
"##;
        let config = Config::from_toml(toml_content).unwrap();
        assert_eq!(config.controls.hand, Hand::Right);
        assert_eq!(config.controls.id_prefix, "OpenVR Controller");
        assert_eq!(config.controls.button_color, Color::rgb(0, 0, 0));
        assert_eq!(config.controls.button_highlight_color, Color::rgb(0xFF, 0, 0));
        assert!(!config.controls.model);
        assert_eq!(config.controls.rotation_offset, 15.0);
        assert!(config.controls.emulated);
        assert_eq!(config.polling.presence_check_interval(), Duration::from_millis(500));
        assert_eq!(config.polling.tracked_controls_interval(), Duration::from_millis(20));
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.log_dir.as_deref(), Some("./logs"));
    }

    #[test]
    fn test_unknown_hand_is_other() {
        let config = Config::from_toml("[controls]\nhand = \"both\"\n").unwrap();
        assert_eq!(config.controls.hand, Hand::Other);
    }

    #[test]
    fn test_invalid_color_rejected() {
        let result = Config::from_toml("[controls]\nbutton_color = \"white\"\n");
        assert!(matches!(result, Err(ViveControlsError::Config(_))));
    }

    #[test]
    fn test_rotation_offset_sentinel_passes_validation() {
        let mut config = Config::default();
        config.controls.rotation_offset = ROTATION_OFFSET_AUTO_SENTINEL;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_config_from_file() {
        use std::io::Write;
        use tempfile::NamedTempFile;

        let toml_content = r#"
[controls]
hand = "left"

[polling]

[logging]
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let result = Config::load(temp_file.path());
        assert!(result.is_ok());
    }

    #[test]
    fn test_load_missing_file() {
        let result = Config::load("/nonexistent/vive-controls.toml");
        assert!(matches!(result, Err(ViveControlsError::Io(_))));
    }

    #[test]
    fn test_empty_id_prefix() {
        let mut config = Config::default();
        config.controls.id_prefix = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_non_finite_rotation_offset() {
        let mut config = Config::default();
        config.controls.rotation_offset = f32::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_presence_interval_zero() {
        let mut config = Config::default();
        config.polling.presence_check_interval_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_presence_interval_too_high() {
        let mut config = Config::default();
        config.polling.presence_check_interval_ms = 60001;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_tracked_interval_zero() {
        let mut config = Config::default();
        config.polling.tracked_controls_interval_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_tracked_interval_too_high() {
        let mut config = Config::default();
        config.polling.tracked_controls_interval_ms = 1001;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_log_level() {
        let mut config = Config::default();
        config.logging.level = "verbose".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_valid_log_levels() {
        for level in ["trace", "debug", "info", "warn", "error"] {
            let mut config = Config::default();
            config.logging.level = level.to_string();
            assert!(config.validate().is_ok(), "Log level {} should be valid", level);
        }
    }

    #[test]
    fn test_empty_log_dir() {
        let mut config = Config::default();
        config.logging.log_dir = Some(String::new());
        assert!(config.validate().is_err());
    }
}
