//! Error handling for pcbdrill
//!
//! Provides the error types shared by every layer of the converter:
//! - Format errors (malformed coordinate tokens and header directives)
//! - Parse errors (drill file structure problems)
//! - Geometry errors (rings that violate the contour contract)
//!
//! Format and parse errors are always fatal: a half-correct program is worse
//! than no program. Geometry degradation during routing is not an error, it is
//! reported as a [`GeometryWarning`] instead.

use std::fmt;
use thiserror::Error;

/// Coordinate and header format error type
///
/// Raised by the coordinate decoder and the header directive handling.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormatError {
    /// A coordinate token contained characters other than digits, a sign and a decimal point
    #[error("Invalid coordinate token '{token}': {reason}")]
    InvalidToken {
        /// The offending token.
        token: String,
        /// Why the token was rejected.
        reason: String,
    },

    /// A token without a decimal point cannot be placed when the format has no decimal digits
    #[error("Ambiguous coordinate '{token}': format has no decimal digits and token has no decimal point")]
    AmbiguousDecimal {
        /// The offending token.
        token: String,
    },

    /// A header directive could not be understood
    #[error("Invalid header directive '{line}': {reason}")]
    InvalidHeader {
        /// The header line.
        line: String,
        /// Why the directive was rejected.
        reason: String,
    },

    /// The digit format leaves no room for any digit
    #[error("Invalid number format {integer_digits}:{decimal_digits}")]
    InvalidFormatSpec {
        /// Integer digit count.
        integer_digits: u8,
        /// Decimal digit count.
        decimal_digits: u8,
    },
}

/// Drill file structure error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// The file produced neither holes nor slots
    #[error("no holes found")]
    NoHoles,

    /// A coordinate referenced a tool that was never defined
    #[error("Unknown tool {tool} referenced at line {line_number}")]
    UnknownTool {
        /// The tool identifier.
        tool: String,
        /// 1-based line number.
        line_number: usize,
    },

    /// A coordinate appeared before any tool was selected
    #[error("Coordinate at line {line_number} has no tool selected")]
    NoToolSelected {
        /// 1-based line number.
        line_number: usize,
    },

    /// A tool definition line was malformed
    #[error("Invalid tool definition '{line}': {reason}")]
    InvalidToolDefinition {
        /// The definition line.
        line: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A command line could not be interpreted
    #[error("Invalid command at line {line_number}: {line}")]
    InvalidCommand {
        /// 1-based line number.
        line_number: usize,
        /// The command text.
        line: String,
    },
}

/// Geometry contract error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// A ring does not have enough distinct points to enclose an area
    #[error("Degenerate contour: {0}")]
    DegenerateContour(String),
}

/// Milling parameter validation error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParameterError {
    /// A parameter must be strictly positive
    #[error("Parameter '{name}' must be positive, got {value}")]
    NotPositive {
        /// Parameter name.
        name: String,
        /// Offending value.
        value: f64,
    },

    /// A parameter value is invalid
    #[error("Invalid value for '{name}': {reason}")]
    InvalidValue {
        /// Parameter name.
        name: String,
        /// Why the value was rejected.
        reason: String,
    },
}

/// Main error type for pcbdrill
///
/// Unifies the layer-specific errors.
#[derive(Error, Debug)]
pub enum Error {
    /// Format error
    #[error(transparent)]
    Format(#[from] FormatError),

    /// Parse error
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Geometry error
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    /// Parameter error
    #[error(transparent)]
    Parameter(#[from] ParameterError),
}

impl Error {
    /// Check if this error came from decoding the drill file
    pub fn is_input_error(&self) -> bool {
        matches!(self, Error::Format(_) | Error::Parse(_))
    }
}

/// Result type alias for pcbdrill operations
pub type Result<T> = std::result::Result<T, Error>;

/// A non-fatal geometry degradation.
///
/// Produced when an offset operation returns nothing for a slot or contour.
/// The affected item falls back or is skipped and the job continues.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryWarning {
    /// What was affected, e.g. `slot 3` or `contour 2 (inner)`.
    pub subject: String,
    /// What happened and what was done about it.
    pub reason: String,
}

impl GeometryWarning {
    pub fn new(subject: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for GeometryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.subject, self.reason)
    }
}
