//! Board outline toolpaths
//!
//! Each closed contour is compensated for the bit: outer boundaries are cut
//! on their outside, cutouts on their inside, so the finished board keeps its
//! nominal dimensions. Contours are classified by nesting depth (even-odd).

use crate::offset::PolygonOffset;
use pcbdrill_core::{depth_levels, Contour, GeometryWarning, MillingParams, MoveGroup, ToolMove};
use std::fmt;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContourRole {
    /// Board boundary, cut on the outside
    Outer,
    /// Cutout, cut on the inside
    Inner,
}

impl fmt::Display for ContourRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Outer => write!(f, "outer"),
            Self::Inner => write!(f, "inner"),
        }
    }
}

impl ContourRole {
    /// Signed offset that puts the bit edge on the nominal line.
    pub fn offset_distance(self, tool_diameter: f64) -> f64 {
        match self {
            Self::Outer => tool_diameter / 2.0,
            Self::Inner => -tool_diameter / 2.0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct OutlineRouting {
    /// Move groups, outer contours first
    pub groups: Vec<MoveGroup>,
    pub routed: usize,
    pub skipped: usize,
    pub warnings: Vec<GeometryWarning>,
}

/// A contour nested inside an odd number of others is a cutout.
pub fn classify(contours: &[Contour]) -> Vec<ContourRole> {
    let roles: Vec<ContourRole> = contours
        .iter()
        .enumerate()
        .map(|(i, contour)| {
            let depth = contours
                .iter()
                .enumerate()
                .filter(|(j, other)| *j != i && other.contains(contour))
                .count();
            if depth % 2 == 0 {
                ContourRole::Outer
            } else {
                ContourRole::Inner
            }
        })
        .collect();

    let outers = roles.iter().filter(|r| **r == ContourRole::Outer).count();
    if outers > 1 {
        warn!(
            "{} separate outer contours found; each is cut on its outside",
            outers
        );
    }
    roles
}

/// Route every contour with a bit of `tool_diameter` down to `depth_mm`.
///
/// Contours whose offset comes back empty are skipped with a warning.
pub fn route_outline(
    contours: &[Contour],
    tool_diameter: f64,
    depth_mm: f64,
    params: &MillingParams,
    offsetter: &dyn PolygonOffset,
) -> OutlineRouting {
    let params = MillingParams {
        bit_diameter_mm: tool_diameter,
        depth_mm,
        ..params.clone()
    };
    let roles = classify(contours);
    let mut routing = OutlineRouting::default();

    for role in [ContourRole::Outer, ContourRole::Inner] {
        for (index, contour) in contours.iter().enumerate() {
            if roles[index] != role {
                continue;
            }

            let subject = format!("contour {} {}", index + 1, role);
            let distance = role.offset_distance(tool_diameter);
            let rings = offsetter.offset(contour, distance);

            if rings.is_empty() {
                let warning = GeometryWarning::new(&subject, "offset produced no ring; skipped");
                warn!("{}", warning);
                routing.warnings.push(warning);
                routing.skipped += 1;
                continue;
            }

            debug!(
                "{}: {} ring(s) at offset {:+.4}",
                subject,
                rings.len(),
                distance
            );
            let mut moves = Vec::new();
            for ring in &rings {
                moves.extend(route_ring(ring, &params));
            }
            routing.groups.push(MoveGroup::new(
                format!("{} offset {:+.4} mm", subject, distance),
                moves,
            ));
            routing.routed += 1;
        }
    }

    info!(
        "Outline: {} contours routed, {} skipped",
        routing.routed, routing.skipped
    );
    routing
}

/// Follow a closed ring once per depth level.
///
/// The first point of each pass carries the step down at plunge rate; the
/// rest of the ring is cut at feed rate and closed back on the first point.
pub fn route_ring(ring: &Contour, params: &MillingParams) -> Vec<ToolMove> {
    let start = ring.first();
    let mut moves = vec![
        ToolMove::rapid_xy(start.x, start.y),
        ToolMove::rapid_z(params.clearance_height_mm),
    ];

    for z in depth_levels(params.depth_mm) {
        moves.push(ToolMove::linear_xyz(start.x, start.y, z, params.plunge_rate));
        for p in ring.closed_points().skip(1) {
            moves.push(ToolMove::linear_xy(p.x, p.y, params.feed_rate));
        }
    }

    moves.push(ToolMove::rapid_z(params.safe_height_mm));
    moves
}
