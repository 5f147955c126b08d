//! Slot toolpaths
//!
//! A slot is as wide as the tool that was specified to cut it. When that is
//! wider than the milling bit, the slot outline (a stadium) is shrunk by the
//! bit radius and routed as a ring. Otherwise, or when the offset gives
//! nothing back, the bit runs back and forth along the centerline.

use crate::offset::PolygonOffset;
use crate::outline_router::route_ring;
use pcbdrill_core::{
    depth_levels, Contour, GeometryWarning, MillingParams, Point, SlotCandidate, ToolMove,
};
use std::f64::consts::PI;
use std::fmt;
use tracing::{debug, warn};

/// Chords per semicircular end cap.
const CAP_SEGMENTS: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotMethod {
    /// Bit-compensated outline ring
    Offset,
    /// Passes along the start-end line
    Centerline,
}

impl fmt::Display for SlotMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Offset => write!(f, "offset"),
            Self::Centerline => write!(f, "centerline"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SlotRouting {
    pub method: SlotMethod,
    pub moves: Vec<ToolMove>,
    /// Set when an offset was attempted and came back empty
    pub warning: Option<GeometryWarning>,
}

/// Route one slot cut by a tool of `tool_diameter`.
pub fn route_slot(
    slot: &SlotCandidate,
    tool_diameter: f64,
    params: &MillingParams,
    offsetter: Option<&dyn PolygonOffset>,
) -> SlotRouting {
    let width = tool_diameter;

    let offsetter = match offsetter {
        Some(o) if width > params.bit_diameter_mm => o,
        _ => {
            debug!(
                "Slot {} width {:.4} routed on centerline",
                slot.tool_id, width
            );
            return SlotRouting {
                method: SlotMethod::Centerline,
                moves: centerline_passes(slot, params),
                warning: None,
            };
        }
    };

    let ring = stadium(slot.start, slot.end, width / 2.0)
        .and_then(|outline| offsetter.offset(&outline, -params.bit_radius_mm()).into_iter().next());

    match ring {
        Some(ring) => SlotRouting {
            method: SlotMethod::Offset,
            moves: route_ring(&ring, params),
            warning: None,
        },
        None => {
            let warning = GeometryWarning::new(
                describe_slot(slot, tool_diameter),
                "offset produced no ring; routed on centerline",
            );
            warn!("{}", warning);
            SlotRouting {
                method: SlotMethod::Centerline,
                moves: centerline_passes(slot, params),
                warning: Some(warning),
            }
        }
    }
}

/// Comment label for a slot's move group.
pub fn describe_slot(slot: &SlotCandidate, tool_diameter: f64) -> String {
    format!(
        "slot {} width {:.4} mm length {:.4} mm from X{:.4} Y{:.4} to X{:.4} Y{:.4}",
        slot.tool_id,
        tool_diameter,
        slot.length(),
        slot.start.x,
        slot.start.y,
        slot.end.x,
        slot.end.y
    )
}

/// Alternating full-length passes, one per depth level.
fn centerline_passes(slot: &SlotCandidate, params: &MillingParams) -> Vec<ToolMove> {
    let mut moves = vec![
        ToolMove::rapid_xy(slot.start.x, slot.start.y),
        ToolMove::rapid_z(params.clearance_height_mm),
    ];

    let mut at_start = true;
    for z in depth_levels(params.depth_mm) {
        let (here, there) = if at_start {
            (slot.start, slot.end)
        } else {
            (slot.end, slot.start)
        };
        moves.push(ToolMove::linear_xyz(here.x, here.y, z, params.plunge_rate));
        moves.push(ToolMove::linear_xy(there.x, there.y, params.feed_rate));
        at_start = !at_start;
    }

    moves.push(ToolMove::rapid_z(params.safe_height_mm));
    moves
}

/// Counter-clockwise outline of a slot: two semicircular caps joined by
/// straight sides.
pub fn stadium(start: Point, end: Point, half_width: f64) -> Option<Contour> {
    let heading = (end.y - start.y).atan2(end.x - start.x);
    let mut points = Vec::with_capacity(2 * (CAP_SEGMENTS + 1));

    for (center, from) in [(end, heading - PI / 2.0), (start, heading + PI / 2.0)] {
        for k in 0..=CAP_SEGMENTS {
            let angle = from + PI * k as f64 / CAP_SEGMENTS as f64;
            points.push(Point::new(
                center.x + half_width * angle.cos(),
                center.y + half_width * angle.sin(),
            ));
        }
    }

    Contour::new(points).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot() -> SlotCandidate {
        SlotCandidate {
            start: Point::new(0.0, 0.0),
            end: Point::new(4.0, 0.0),
            tool_id: "T3".to_string(),
        }
    }

    #[test]
    fn test_stadium_extents() {
        let outline = stadium(Point::new(0.0, 0.0), Point::new(4.0, 0.0), 1.0).unwrap();
        assert!(!outline.is_clockwise());
        let b = outline.bounds();
        assert!((b.min_x + 1.0).abs() < 1e-9);
        assert!((b.max_x - 5.0).abs() < 1e-9);
        assert!((b.min_y + 1.0).abs() < 1e-9);
        assert!((b.max_y - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_centerline_alternates() {
        let params = MillingParams {
            depth_mm: 1.0,
            ..Default::default()
        };
        let routing = route_slot(&slot(), 0.8, &params, None);
        assert_eq!(routing.method, SlotMethod::Centerline);
        assert_eq!(
            routing.moves[2],
            ToolMove::linear_xyz(0.0, 0.0, -0.5, params.plunge_rate)
        );
        assert_eq!(routing.moves[3], ToolMove::linear_xy(4.0, 0.0, params.feed_rate));
        assert_eq!(
            routing.moves[4],
            ToolMove::linear_xyz(4.0, 0.0, -1.0, params.plunge_rate)
        );
        assert_eq!(routing.moves[5], ToolMove::linear_xy(0.0, 0.0, params.feed_rate));
        assert_eq!(routing.moves.last(), Some(&ToolMove::rapid_z(params.safe_height_mm)));
    }

    #[test]
    fn test_describe_slot() {
        assert_eq!(
            describe_slot(&slot(), 1.5),
            "slot T3 width 1.5000 mm length 4.0000 mm from X0.0000 Y0.0000 to X4.0000 Y0.0000"
        );
    }
}
