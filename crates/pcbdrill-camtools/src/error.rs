//! Error types for the CAM tools crate.
//!
//! Wraps the core error taxonomy and adds the failures specific to loading
//! outline layers and generating programs.

use pcbdrill_core::{Error as CoreError, FormatError, GeometryError, ParameterError, ParseError};
use thiserror::Error;

/// Errors that can occur while turning drill and outline data into G-code.
#[derive(Error, Debug)]
pub enum CamToolError {
    /// Invalid parameters were provided to a generator.
    #[error("Invalid parameters: {0}")]
    InvalidParameters(#[from] ParameterError),

    /// G-code generation failed.
    #[error("G-code generation failed: {0}")]
    GenerationFailed(String),

    /// The outline layer could not be read.
    #[error("Gerber parse error: {0}")]
    GerberParse(String),

    /// The drill file could not be read.
    #[error(transparent)]
    Drill(#[from] CoreError),
}

impl From<FormatError> for CamToolError {
    fn from(err: FormatError) -> Self {
        Self::Drill(err.into())
    }
}

impl From<ParseError> for CamToolError {
    fn from(err: ParseError) -> Self {
        Self::Drill(err.into())
    }
}

impl From<GeometryError> for CamToolError {
    fn from(err: GeometryError) -> Self {
        Self::Drill(err.into())
    }
}

impl CamToolError {
    /// Whether the error comes from malformed input rather than settings.
    pub fn is_input_error(&self) -> bool {
        match self {
            Self::Drill(err) => err.is_input_error(),
            Self::GerberParse(_) => true,
            _ => false,
        }
    }
}

/// Result type alias for CAM tool operations.
pub type CamToolResult<T> = Result<T, CamToolError>;
