//! Drill data model
//!
//! The values produced by parsing an Excellon file: the number format in
//! effect, the tool table, and the ordered list of drill operations.

use crate::error::FormatError;
use crate::geometry::Point;
use crate::units::Unit;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a coordinate token without a decimal point is aligned, named after
/// the header directive that selects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZeroSuppression {
    /// `LZ`: leading zeros are kept, so digits are left-aligned and the
    /// first `integer_digits` characters are the integer part.
    Lz,
    /// `TZ`: trailing zeros are kept, so digits are right-aligned and the
    /// last `decimal_digits` characters are the fraction.
    Tz,
}

impl fmt::Display for ZeroSuppression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lz => write!(f, "LZ"),
            Self::Tz => write!(f, "TZ"),
        }
    }
}

/// Number format of a drill file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatSpec {
    pub integer_digits: u8,
    pub decimal_digits: u8,
    pub zero_suppression: ZeroSuppression,
    pub unit: Unit,
}

impl Default for FormatSpec {
    fn default() -> Self {
        Self {
            integer_digits: 4,
            decimal_digits: 4,
            zero_suppression: ZeroSuppression::Lz,
            unit: Unit::Metric,
        }
    }
}

impl FormatSpec {
    /// Build a format, rejecting one with no digits at all.
    pub fn new(
        integer_digits: u8,
        decimal_digits: u8,
        zero_suppression: ZeroSuppression,
        unit: Unit,
    ) -> Result<Self, FormatError> {
        let spec = Self {
            integer_digits,
            decimal_digits,
            zero_suppression,
            unit,
        };
        spec.validate()?;
        Ok(spec)
    }

    pub fn validate(&self) -> Result<(), FormatError> {
        if u16::from(self.integer_digits) + u16::from(self.decimal_digits) == 0 {
            return Err(FormatError::InvalidFormatSpec {
                integer_digits: self.integer_digits,
                decimal_digits: self.decimal_digits,
            });
        }
        Ok(())
    }

    pub fn with_digits(self, integer_digits: u8, decimal_digits: u8) -> Result<Self, FormatError> {
        Self::new(integer_digits, decimal_digits, self.zero_suppression, self.unit)
    }
}

impl fmt::Display for FormatSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{} {} {}",
            self.integer_digits, self.decimal_digits, self.zero_suppression, self.unit
        )
    }
}

/// A drill tool from the tool table. Diameter is always in millimeters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tool {
    /// Normalised identifier, e.g. `T1`
    pub id: String,
    pub diameter_mm: f64,
}

/// A single drilled hole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hole {
    pub x_mm: f64,
    pub y_mm: f64,
    pub tool_id: String,
}

impl Hole {
    pub fn center(&self) -> Point {
        Point::new(self.x_mm, self.y_mm)
    }
}

/// A routed slot recognised from a positioning move followed by a linear move.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotCandidate {
    pub start: Point,
    pub end: Point,
    pub tool_id: String,
}

impl SlotCandidate {
    pub fn length(&self) -> f64 {
        self.start.distance_to(&self.end)
    }
}

/// One entry of the parsed operation list, in file order.
#[derive(Debug, Clone, PartialEq)]
pub enum DrillOperation {
    Hole(Hole),
    Slot(SlotCandidate),
}

impl DrillOperation {
    pub fn tool_id(&self) -> &str {
        match self {
            Self::Hole(hole) => &hole.tool_id,
            Self::Slot(slot) => &slot.tool_id,
        }
    }
}
