//! Error types for the settings crate.

use std::io;
use thiserror::Error;

use enclosure_panels::ConfigurationError;

/// Errors that can occur while loading, saving or validating settings.
#[derive(Error, Debug)]
pub enum SettingsError {
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// TOML deserialization error.
    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// TOML serialization error.
    #[error("TOML serialization error: {0}")]
    TomlSerError(#[from] toml::ser::Error),

    /// The file extension is neither `.toml` nor `.json`.
    #[error("Unsupported settings format: {0}")]
    UnsupportedFormat(String),

    /// The platform has no configuration directory.
    #[error("Config directory error: {0}")]
    ConfigDirectory(String),

    /// The parameters do not resolve to a buildable enclosure.
    #[error("Invalid parameters: {0}")]
    Invalid(#[from] ConfigurationError),
}

/// Result type for settings operations.
pub type Result<T> = std::result::Result<T, SettingsError>;
