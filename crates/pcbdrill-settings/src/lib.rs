//! pcbdrill Settings Crate
//!
//! Loads, validates, and saves the milling defaults used by the converter.

pub mod config;
pub mod error;

pub use config::{Config, OutlineSettings, ProgramSettings};
pub use error::{SettingsError, SettingsResult};
