//! Unit conversion utilities
//!
//! Drill files may be written in inches or millimeters. Everything downstream
//! of the decoder works in millimeters.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Millimeters per inch
pub const MM_PER_INCH: f64 = 25.4;

/// Unit a drill file is written in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    /// Millimeters (`METRIC`, `M71`)
    Metric,
    /// Inches (`INCH`, `M72`)
    Inch,
}

impl Default for Unit {
    fn default() -> Self {
        Self::Metric
    }
}

impl Unit {
    /// Convert a value expressed in this unit to millimeters
    pub fn to_mm(self, value: f64) -> f64 {
        match self {
            Self::Metric => value,
            Self::Inch => value * MM_PER_INCH,
        }
    }

    /// Short label used in summaries
    pub fn label(self) -> &'static str {
        match self {
            Self::Metric => "mm",
            Self::Inch => "in",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Metric => write!(f, "METRIC"),
            Self::Inch => write!(f, "INCH"),
        }
    }
}

impl FromStr for Unit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "metric" | "mm" => Ok(Self::Metric),
            "inch" | "in" | "imperial" => Ok(Self::Inch),
            _ => Err(format!("Unknown unit: {}", s)),
        }
    }
}
