//! Configuration file handling for pcbdrill
//!
//! Supports JSON and TOML files. The default file lives in the platform
//! config directory as `pcbdrill/config.toml`.
//!
//! Configuration is organized into sections:
//! - Milling parameters (bit, depth, feeds, heights)
//! - Program framing (spindle spin-up dwell)
//! - Outline routing (cut depth, separate outline bit)

use crate::error::{SettingsError, SettingsResult};
use pcbdrill_core::MillingParams;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Program framing settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgramSettings {
    /// Dwell after spindle start, in seconds
    pub dwell_seconds: f64,
}

impl Default for ProgramSettings {
    fn default() -> Self {
        Self { dwell_seconds: 2.0 }
    }
}

/// Board outline routing settings
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutlineSettings {
    /// Cut depth for the outline; the drill depth is used when unset
    pub depth_mm: Option<f64>,
    /// Bit used for the outline; the drilling bit is used when unset
    pub bit_diameter_mm: Option<f64>,
}

/// Complete pcbdrill configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Milling parameters
    pub milling: MillingParams,
    /// Program framing
    pub program: ProgramSettings,
    /// Outline routing
    pub outline: OutlineSettings,
}

enum FileFormat {
    Json,
    Toml,
}

fn file_format(path: &Path) -> SettingsResult<FileFormat> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => Ok(FileFormat::Json),
        Some("toml") => Ok(FileFormat::Toml),
        _ => Err(SettingsError::UnsupportedFormat(format!(
            "{} (config file must be .json or .toml)",
            path.display()
        ))),
    }
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// `<platform config dir>/pcbdrill/config.toml`, if the platform has one
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("pcbdrill").join("config.toml"))
    }

    /// Load the default config file, or built-in defaults when it does not exist
    pub fn load_default() -> SettingsResult<Self> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load_from_file(&path),
            _ => {
                debug!("No default config file, using built-in defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = file_format(path)?;
        let content = std::fs::read_to_string(path)?;

        let config: Self = match format {
            FileFormat::Json => serde_json::from_str(&content)?,
            FileFormat::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Save config to file (JSON or TOML), creating parent directories
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match file_format(path)? {
            FileFormat::Json => serde_json::to_string_pretty(self)?,
            FileFormat::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        self.milling.validate()?;

        if !(self.program.dwell_seconds >= 0.0) {
            return Err(SettingsError::InvalidSetting {
                key: "program.dwell_seconds".to_string(),
                reason: format!("must not be negative, got {}", self.program.dwell_seconds),
            });
        }

        let optional = [
            ("outline.depth_mm", self.outline.depth_mm),
            ("outline.bit_diameter_mm", self.outline.bit_diameter_mm),
        ];
        for (key, value) in optional {
            if let Some(value) = value {
                if !(value > 0.0) {
                    return Err(SettingsError::InvalidSetting {
                        key: key.to_string(),
                        reason: format!("must be positive, got {}", value),
                    });
                }
            }
        }

        Ok(())
    }

    /// Milling parameters for the outline pass
    pub fn outline_params(&self) -> MillingParams {
        let mut params = self.milling.clone();
        if let Some(depth) = self.outline.depth_mm {
            params.depth_mm = depth;
        }
        if let Some(bit) = self.outline.bit_diameter_mm {
            params.bit_diameter_mm = bit;
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::new();
        assert_eq!(config.milling.bit_diameter_mm, 1.0);
        assert_eq!(config.milling.depth_mm, 2.0);
        assert_eq!(config.program.dwell_seconds, 2.0);
        assert!(config.outline.depth_mm.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: Config = toml::from_str("[milling]\ndepth_mm = 1.6\n").unwrap();
        assert_eq!(config.milling.depth_mm, 1.6);
        assert_eq!(config.milling.feed_rate, 100.0);
        assert_eq!(config.program, ProgramSettings::default());
    }

    #[test]
    fn test_validate_rejects_negative_dwell() {
        let mut config = Config::new();
        config.program.dwell_seconds = -1.0;
        assert!(matches!(
            config.validate(),
            Err(SettingsError::InvalidSetting { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_zero_outline_depth() {
        let mut config = Config::new();
        config.outline.depth_mm = Some(0.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_clearance_above_safe() {
        let mut config = Config::new();
        config.milling.clearance_height_mm = 10.0;
        assert!(matches!(
            config.validate(),
            Err(SettingsError::Parameter(_))
        ));
    }

    #[test]
    fn test_outline_params_override() {
        let mut config = Config::new();
        config.outline.depth_mm = Some(1.8);
        let params = config.outline_params();
        assert_eq!(params.depth_mm, 1.8);
        assert_eq!(params.bit_diameter_mm, config.milling.bit_diameter_mm);
    }

    #[test]
    fn test_default_path_name() {
        if let Some(path) = Config::default_path() {
            assert!(path.ends_with("pcbdrill/config.toml"));
        }
    }
}
