//! # Error Module
//!
//! Error types for the `hornet_blaster` application, built on `thiserror`.
//!
//! None of these errors is fatal: callers log them and carry on without the
//! failing resource (no link, no sprite, default configuration).

use thiserror::Error;

/// Result type alias for `hornet_blaster` operations.
pub type Result<T> = std::result::Result<T, HornetError>;

/// Main error type for the `hornet_blaster` application.
#[derive(Debug, Error)]
pub enum HornetError {
    /// No serial device matched the selection rule.
    #[error("No serial link available: {0}")]
    LinkUnavailable(String),

    /// Failed to open serial port.
    #[error("Failed to open serial port '{port_name}': {reason}")]
    PortOpen { port_name: String, reason: String },

    /// Failed to write to serial port.
    #[error("Failed to write to serial port: {0}")]
    PortWrite(String),

    /// An asset file could not be found.
    #[error("Asset not found: {0}")]
    AssetMissing(String),

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration: {0}")]
    ConfigParse(String),

    /// File I/O error.
    #[error("File I/O error: {0}")]
    FileIo(#[from] std::io::Error),
}

impl HornetError {
    /// Creates a new link unavailable error.
    #[must_use]
    pub fn link_unavailable(msg: impl Into<String>) -> Self {
        Self::LinkUnavailable(msg.into())
    }

    /// Creates a new port open error.
    #[must_use]
    pub fn port_open(port_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::PortOpen {
            port_name: port_name.into(),
            reason: reason.into(),
        }
    }

    /// Creates a new port write error.
    #[must_use]
    pub fn port_write(msg: impl Into<String>) -> Self {
        Self::PortWrite(msg.into())
    }

    /// Creates a new asset missing error.
    #[must_use]
    pub fn asset_missing(path: impl Into<String>) -> Self {
        Self::AssetMissing(path.into())
    }

    /// Creates a new invalid configuration error.
    #[must_use]
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}
