//! Hole toolpaths
//!
//! Holes no larger than the bit are plunged straight down. Larger holes are
//! spiral milled: the bit circles the hole at `hole_radius - bit_radius`,
//! stepping down one equal pass at a time, either as short line segments or
//! as one helical `G2` per pass.

use pcbdrill_core::{depth_levels, Hole, MillingParams, Point, ToolMove};
use std::f64::consts::PI;
use std::fmt;

/// Line segments per full circle in linear spiral mode.
pub const SEGMENTS_PER_CIRCLE: usize = 36;

/// How a hole is cut.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoleStrategy {
    StraightPlunge,
    SpiralMill,
}

impl fmt::Display for HoleStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StraightPlunge => write!(f, "straight drill"),
            Self::SpiralMill => write!(f, "spiral mill"),
        }
    }
}

/// Radius the bit center travels on to cut a hole of `hole_diameter`.
pub fn mill_radius(hole_diameter: f64, params: &MillingParams) -> f64 {
    hole_diameter / 2.0 - params.bit_radius_mm()
}

pub fn select_strategy(hole_diameter: f64, params: &MillingParams) -> HoleStrategy {
    if mill_radius(hole_diameter, params) <= 0.0 {
        HoleStrategy::StraightPlunge
    } else {
        HoleStrategy::SpiralMill
    }
}

/// Build the move list for one hole drilled with a tool of `tool_diameter`.
pub fn synthesize_hole(hole: &Hole, tool_diameter: f64, params: &MillingParams) -> Vec<ToolMove> {
    let center = hole.center();
    match select_strategy(tool_diameter, params) {
        HoleStrategy::StraightPlunge => straight_plunge(center, params),
        HoleStrategy::SpiralMill => {
            let radius = mill_radius(tool_diameter, params);
            if params.use_arcs {
                spiral_arcs(center, radius, params)
            } else {
                spiral_segments(center, radius, params)
            }
        }
    }
}

/// Comment label for a hole's move group.
pub fn describe_hole(hole: &Hole, tool_diameter: f64, params: &MillingParams) -> String {
    format!(
        "{} {} dia {:.4} mm at X{:.4} Y{:.4}",
        select_strategy(tool_diameter, params),
        hole.tool_id,
        tool_diameter,
        hole.x_mm,
        hole.y_mm
    )
}

fn straight_plunge(center: Point, params: &MillingParams) -> Vec<ToolMove> {
    vec![
        ToolMove::rapid_xy(center.x, center.y),
        ToolMove::rapid_z(params.clearance_height_mm),
        ToolMove::linear_z(-params.depth_mm, params.plunge_rate),
        ToolMove::rapid_z(params.safe_height_mm),
    ]
}

/// Center, clearance height, then out to the start radius at feed.
fn spiral_entry(center: Point, radius: f64, params: &MillingParams) -> Vec<ToolMove> {
    vec![
        ToolMove::rapid_xy(center.x, center.y),
        ToolMove::rapid_z(params.clearance_height_mm),
        ToolMove::linear_xy(center.x + radius, center.y, params.feed_rate),
    ]
}

fn spiral_exit(center: Point, params: &MillingParams, moves: &mut Vec<ToolMove>) {
    moves.push(ToolMove::linear_xy(center.x, center.y, params.feed_rate));
    moves.push(ToolMove::rapid_z(params.safe_height_mm));
}

fn spiral_segments(center: Point, radius: f64, params: &MillingParams) -> Vec<ToolMove> {
    let mut moves = spiral_entry(center, radius, params);
    let start_x = center.x + radius;
    let angle_step = 2.0 * PI / SEGMENTS_PER_CIRCLE as f64;

    for z in depth_levels(params.depth_mm) {
        moves.push(ToolMove::linear_xyz(start_x, center.y, z, params.plunge_rate));
        for seg in 1..=SEGMENTS_PER_CIRCLE {
            // Close on the exact start point rather than cos(2*PI)
            let (x, y) = if seg == SEGMENTS_PER_CIRCLE {
                (start_x, center.y)
            } else {
                let angle = seg as f64 * angle_step;
                (
                    center.x + radius * angle.cos(),
                    center.y + radius * angle.sin(),
                )
            };
            moves.push(ToolMove::linear_xy(x, y, params.feed_rate));
        }
    }

    spiral_exit(center, params, &mut moves);
    moves
}

fn spiral_arcs(center: Point, radius: f64, params: &MillingParams) -> Vec<ToolMove> {
    let mut moves = spiral_entry(center, radius, params);
    let start_x = center.x + radius;

    for z in depth_levels(params.depth_mm) {
        moves.push(ToolMove::Arc {
            x: start_x,
            y: center.y,
            z: Some(z),
            i: -radius,
            j: 0.0,
            clockwise: true,
            feed: params.plunge_rate,
        });
    }

    spiral_exit(center, params, &mut moves);
    moves
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hole(x: f64, y: f64) -> Hole {
        Hole {
            x_mm: x,
            y_mm: y,
            tool_id: "T1".to_string(),
        }
    }

    #[test]
    fn test_strategy_boundary() {
        let params = MillingParams::default();
        assert_eq!(select_strategy(0.8, &params), HoleStrategy::StraightPlunge);
        assert_eq!(select_strategy(1.0, &params), HoleStrategy::StraightPlunge);
        assert_eq!(select_strategy(1.01, &params), HoleStrategy::SpiralMill);
    }

    #[test]
    fn test_describe_hole() {
        let params = MillingParams::default();
        let label = describe_hole(&hole(1.0, 2.0), 3.0, &params);
        assert_eq!(label, "spiral mill T1 dia 3.0000 mm at X1.0000 Y2.0000");
    }

    #[test]
    fn test_segment_pass_shape() {
        let params = MillingParams {
            depth_mm: 0.5,
            ..Default::default()
        };
        let moves = synthesize_hole(&hole(0.0, 0.0), 3.0, &params);
        // entry (3) + one pass (1 + 36) + exit (2)
        assert_eq!(moves.len(), 3 + 37 + 2);
        assert_eq!(
            moves[3],
            ToolMove::linear_xyz(1.0, 0.0, -0.5, params.plunge_rate)
        );
        assert_eq!(moves[39], ToolMove::linear_xy(1.0, 0.0, params.feed_rate));
    }
}
