//! # Error Types
//!
//! Custom error types for Vive Controls using `thiserror`.
//!
//! Only setup paths are fallible. Input handling, presence polling and model
//! updates degrade to no-ops instead of returning errors.

use thiserror::Error;

/// Main error type for Vive Controls
#[derive(Debug, Error)]
pub enum ViveControlsError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// Color strings that are not `#RGB` or `#RRGGBB`
    #[error("Invalid color '{0}': expected #RGB or #RRGGBB")]
    InvalidColor(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Vive Controls
pub type Result<T> = std::result::Result<T, ViveControlsError>;
