//! # pcbdrill CAM Tools
//!
//! Turns PCB drill data into G-code for a milling machine.
//!
//! ## Pipeline
//!
//! - **Coordinate Decoder**: fixed-width Excellon coordinates to millimeters
//! - **Excellon Parser**: tool table, holes and routed slots
//! - **Hole Paths**: straight plunge or spiral milling per hole
//! - **Slot Router**: bit-compensated ring or centerline passes
//! - **Outline Router**: board outline and cutouts with bit compensation
//! - **Gerber**: closed outline contours from a Gerber layer
//! - **Emitter**: the final program text
//!
//! Polygon offsetting sits behind [`PolygonOffset`] so the routers can be
//! exercised without the geometry library.

pub mod coordinate;
pub mod drill_plan;
pub mod error;
pub mod excellon;
pub mod gcode;
pub mod gerber;
pub mod hole_path;
pub mod offset;
pub mod outline_router;
pub mod slot_router;

pub use coordinate::decode;
pub use drill_plan::{plan_drilling, DrillPlan};
pub use error::{CamToolError, CamToolResult};
pub use excellon::{parse, ExcellonFile, HoleGroup};
pub use gcode::{emit, format_move, ProgramHeader};
pub use gerber::{load_outline, OutlineGeometry};
pub use hole_path::{select_strategy, synthesize_hole, HoleStrategy};
pub use offset::{CavalierOffset, PolygonOffset};
pub use outline_router::{classify, route_outline, route_ring, ContourRole, OutlineRouting};
pub use slot_router::{route_slot, SlotMethod, SlotRouting};
