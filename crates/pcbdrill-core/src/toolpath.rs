//! Abstract tool moves and the milling parameters that shape them
//!
//! Generators produce [`ToolMove`] lists; the G-code emitter is the only
//! consumer and maps every variant exhaustively.

use crate::error::ParameterError;
use serde::{Deserialize, Serialize};

/// Deepest cut taken in one pass (mm). Passes are equalised below this.
pub const MAX_PASS_DEPTH_MM: f64 = 0.5;

/// Milling parameters, constant across a whole job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MillingParams {
    /// Diameter of the milling bit (mm)
    pub bit_diameter_mm: f64,
    /// Depth to drill or mill below the surface (mm, positive)
    pub depth_mm: f64,
    /// XY feed rate (mm/min)
    pub feed_rate: f64,
    /// Z plunge feed rate (mm/min)
    pub plunge_rate: f64,
    /// Spindle speed (RPM)
    pub spindle_speed: f64,
    /// Z height for rapid travel between features (mm)
    pub safe_height_mm: f64,
    /// Z height just above the workpiece (mm)
    pub clearance_height_mm: f64,
    /// Use helical arc moves instead of line segments for spiral milling
    pub use_arcs: bool,
}

impl Default for MillingParams {
    fn default() -> Self {
        Self {
            bit_diameter_mm: 1.0,
            depth_mm: 2.0,
            feed_rate: 100.0,
            plunge_rate: 50.0,
            spindle_speed: 10000.0,
            safe_height_mm: 5.0,
            clearance_height_mm: 2.0,
            use_arcs: false,
        }
    }
}

impl MillingParams {
    pub fn bit_radius_mm(&self) -> f64 {
        self.bit_diameter_mm / 2.0
    }

    /// Reject parameter sets that would produce an unsafe or meaningless program.
    pub fn validate(&self) -> Result<(), ParameterError> {
        let positive = [
            ("bit_diameter_mm", self.bit_diameter_mm),
            ("depth_mm", self.depth_mm),
            ("feed_rate", self.feed_rate),
            ("plunge_rate", self.plunge_rate),
            ("spindle_speed", self.spindle_speed),
        ];
        for (name, value) in positive {
            if !(value > 0.0) || !value.is_finite() {
                return Err(ParameterError::NotPositive {
                    name: name.to_string(),
                    value,
                });
            }
        }

        if self.clearance_height_mm > self.safe_height_mm {
            return Err(ParameterError::InvalidValue {
                name: "clearance_height_mm".to_string(),
                reason: format!(
                    "clearance height {} is above safe height {}",
                    self.clearance_height_mm, self.safe_height_mm
                ),
            });
        }

        Ok(())
    }
}

/// Z level of every cutting pass for a target depth.
///
/// `ceil(depth / MAX_PASS_DEPTH_MM)` equal steps; the last level is exactly
/// `-depth` so repeated addition never drifts off target.
pub fn depth_levels(depth_mm: f64) -> Vec<f64> {
    if !(depth_mm > 0.0) {
        return Vec::new();
    }
    let passes = (depth_mm / MAX_PASS_DEPTH_MM).ceil().max(1.0) as usize;
    (1..=passes)
        .map(|i| {
            if i == passes {
                -depth_mm
            } else {
                -(depth_mm * i as f64 / passes as f64)
            }
        })
        .collect()
}

/// One abstract machine motion. Absent axes keep their current value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ToolMove {
    /// Positioning move at rapid rate
    Rapid {
        x: Option<f64>,
        y: Option<f64>,
        z: Option<f64>,
    },
    /// Straight cutting move
    Linear {
        x: Option<f64>,
        y: Option<f64>,
        z: Option<f64>,
        feed: f64,
    },
    /// Circular (or helical, when `z` is set) cutting move.
    /// `i`/`j` locate the center relative to the start point.
    Arc {
        x: f64,
        y: f64,
        z: Option<f64>,
        i: f64,
        j: f64,
        clockwise: bool,
        feed: f64,
    },
}

impl ToolMove {
    pub fn rapid_xy(x: f64, y: f64) -> Self {
        Self::Rapid {
            x: Some(x),
            y: Some(y),
            z: None,
        }
    }

    pub fn rapid_z(z: f64) -> Self {
        Self::Rapid {
            x: None,
            y: None,
            z: Some(z),
        }
    }

    pub fn linear_xy(x: f64, y: f64, feed: f64) -> Self {
        Self::Linear {
            x: Some(x),
            y: Some(y),
            z: None,
            feed,
        }
    }

    pub fn linear_xyz(x: f64, y: f64, z: f64, feed: f64) -> Self {
        Self::Linear {
            x: Some(x),
            y: Some(y),
            z: Some(z),
            feed,
        }
    }

    pub fn linear_z(z: f64, feed: f64) -> Self {
        Self::Linear {
            x: None,
            y: None,
            z: Some(z),
            feed,
        }
    }

    /// Target Z, if this move changes it.
    pub fn z(&self) -> Option<f64> {
        match *self {
            Self::Rapid { z, .. } | Self::Linear { z, .. } | Self::Arc { z, .. } => z,
        }
    }

    /// Machine position after executing this move from `from`.
    pub fn end_position(&self, from: Position) -> Position {
        match *self {
            Self::Rapid { x, y, z } | Self::Linear { x, y, z, .. } => Position {
                x: x.unwrap_or(from.x),
                y: y.unwrap_or(from.y),
                z: z.unwrap_or(from.z),
            },
            Self::Arc { x, y, z, .. } => Position {
                x,
                y,
                z: z.unwrap_or(from.z),
            },
        }
    }
}

/// Machine position used to trace a move list.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Final position after running `moves` from `start`.
pub fn trace(start: Position, moves: &[ToolMove]) -> Position {
    moves.iter().fold(start, |pos, m| m.end_position(pos))
}

/// Moves for one hole, slot or contour, labelled for the program listing.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveGroup {
    pub label: String,
    pub moves: Vec<ToolMove>,
}

impl MoveGroup {
    pub fn new(label: impl Into<String>, moves: Vec<ToolMove>) -> Self {
        Self {
            label: label.into(),
            moves,
        }
    }
}
