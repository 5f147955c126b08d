//! # pcbdrill Core
//!
//! Core types, units, and errors for pcbdrill.
//! Provides the drill data model produced by the Excellon parser, the
//! planar geometry used by the routers, and the abstract tool moves consumed
//! by the G-code emitter.

pub mod drill;
pub mod error;
pub mod geometry;
pub mod toolpath;
pub mod units;

pub use drill::{DrillOperation, FormatSpec, Hole, SlotCandidate, Tool, ZeroSuppression};
pub use error::{
    Error, FormatError, GeometryError, GeometryWarning, ParameterError, ParseError, Result,
};
pub use geometry::{Bounds, Contour, Point};
pub use toolpath::{
    depth_levels, trace, MillingParams, MoveGroup, Position, ToolMove, MAX_PASS_DEPTH_MM,
};
pub use units::{Unit, MM_PER_INCH};
