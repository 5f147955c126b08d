//! Error types for the settings crate.

use pcbdrill_core::ParameterError;
use std::io;
use thiserror::Error;

/// Errors that can occur while loading or saving a configuration file.
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
    #[error("TOML write error: {0}")]
    TomlWriteError(#[from] toml::ser::Error),

    /// The file extension is neither `.json` nor `.toml`.
    #[error("Unsupported config format: {0}")]
    UnsupportedFormat(String),

    /// A configuration value is invalid.
    #[error("Invalid setting '{key}': {reason}")]
    InvalidSetting { key: String, reason: String },

    /// The milling section fails parameter validation.
    #[error(transparent)]
    Parameter(#[from] ParameterError),
}

/// Result type alias for settings operations.
pub type SettingsResult<T> = Result<T, SettingsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_setting_display() {
        let err = SettingsError::InvalidSetting {
            key: "outline.depth_mm".to_string(),
            reason: "must be positive".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid setting 'outline.depth_mm': must be positive"
        );
    }

    #[test]
    fn test_parameter_error_is_transparent() {
        let err: SettingsError = ParameterError::NotPositive {
            name: "depth_mm".to_string(),
            value: 0.0,
        }
        .into();
        assert!(err.to_string().contains("depth_mm"));
    }
}
