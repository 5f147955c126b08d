//! Board outline loading from a Gerber layer
//!
//! Reads the drawn strokes of an outline layer (D02 moves, D01 linear and
//! circular interpolations) and stitches them into closed [`Contour`]s.
//! Aperture widths are ignored: the stroke centerline is the board edge.

use crate::error::{CamToolError, CamToolResult};
use gerber_parser::parse;
use gerber_types::{
    Command, CoordinateNumber, DCode, FunctionCode, InterpolationMode, Operation, Unit,
};
use pcbdrill_core::{Contour, GeometryWarning, Point};
use regex::Regex;
use std::f64::consts::PI;
use std::io::BufReader;
use tracing::{debug, info, warn};

/// Endpoints closer than this are joined (mm).
pub const STITCH_TOLERANCE_MM: f64 = 1e-3;

/// Chord length target when flattening arcs (mm).
const ARC_CHORD_MM: f64 = 0.1;

/// Closed rings recovered from an outline layer.
#[derive(Debug, Clone, Default)]
pub struct OutlineGeometry {
    pub contours: Vec<Contour>,
    /// Strokes that could not be closed, dropped
    pub warnings: Vec<GeometryWarning>,
}

/// Parse Gerber text and return its closed outline contours.
///
/// # Errors
///
/// [`CamToolError::GerberParse`] if the document has no format
/// specification or yields no closed contour.
pub fn load_outline(gerber_content: &str) -> CamToolResult<OutlineGeometry> {
    let strokes = read_strokes(gerber_content)?;
    debug!("Outline layer: {} strokes", strokes.len());

    let geometry = stitch(strokes);
    if geometry.contours.is_empty() {
        return Err(CamToolError::GerberParse(
            "no closed contour in outline layer".to_string(),
        ));
    }
    info!(
        "Outline layer: {} closed contours, {} open strokes dropped",
        geometry.contours.len(),
        geometry.warnings.len()
    );
    Ok(geometry)
}

/// Keep only the first `%FS` and `%MO` block; some exporters repeat them and
/// the parser rejects a second one.
fn sanitize(gerber_content: &str) -> CamToolResult<String> {
    let mut sanitized = gerber_content.to_string();
    for pattern in [r"%FS.*?\*%", r"%MO.*?\*%"] {
        let re = Regex::new(pattern).map_err(|e| CamToolError::GerberParse(e.to_string()))?;
        let mut count = 0;
        sanitized = re
            .replace_all(&sanitized, |caps: &regex::Captures| {
                count += 1;
                if count > 1 {
                    String::new()
                } else {
                    caps[0].to_string()
                }
            })
            .to_string();
    }
    Ok(sanitized)
}

/// Connected polylines in drawing order, in millimeters.
fn read_strokes(gerber_content: &str) -> CamToolResult<Vec<Vec<Point>>> {
    let sanitized = sanitize(gerber_content)?;
    let reader = BufReader::new(sanitized.as_bytes());
    let doc = match parse(reader) {
        Ok(d) => d,
        Err((d, e)) => {
            warn!(
                "Gerber parser returned error, using partial document: {:?}",
                e
            );
            d
        }
    };

    let Some(format) = &doc.format_specification else {
        return Err(CamToolError::GerberParse(
            "missing format specification (%FS)".to_string(),
        ));
    };
    let unit_scale = match &doc.units {
        Some(Unit::Inches) => 25.4,
        Some(Unit::Millimeters) => 1.0,
        None => {
            warn!("No units in outline layer, assuming millimeters");
            1.0
        }
    };
    debug!(
        "Outline format {}.{}, scale {}",
        format.integer, format.decimal, unit_scale
    );
    // The parser has already applied the format's decimal shift.
    let to_mm = |c: &CoordinateNumber| f64::from(*c) * unit_scale;

    let mut strokes: Vec<Vec<Point>> = Vec::new();
    let mut current: Vec<Point> = Vec::new();
    let mut position = Point::default();
    let mut interpolation = InterpolationMode::Linear;

    for command in doc.commands() {
        match command {
            Command::FunctionCode(FunctionCode::DCode(DCode::Operation(op))) => match op {
                Operation::Interpolate(coord, offset) => {
                    let target = Point::new(
                        coord
                            .as_ref()
                            .and_then(|c| c.x.as_ref())
                            .map(&to_mm)
                            .unwrap_or(position.x),
                        coord
                            .as_ref()
                            .and_then(|c| c.y.as_ref())
                            .map(&to_mm)
                            .unwrap_or(position.y),
                    );
                    if current.is_empty() {
                        current.push(position);
                    }

                    match interpolation {
                        InterpolationMode::Linear => current.push(target),
                        InterpolationMode::ClockwiseCircular
                        | InterpolationMode::CounterclockwiseCircular => {
                            let i = offset
                                .as_ref()
                                .and_then(|c| c.x.as_ref())
                                .map(&to_mm)
                                .unwrap_or(0.0);
                            let j = offset
                                .as_ref()
                                .and_then(|c| c.y.as_ref())
                                .map(&to_mm)
                                .unwrap_or(0.0);
                            let center = Point::new(position.x + i, position.y + j);
                            let clockwise =
                                matches!(interpolation, InterpolationMode::ClockwiseCircular);
                            current.extend(flatten_arc(position, target, center, clockwise));
                        }
                    }
                    position = target;
                }
                Operation::Move(coord) => {
                    if current.len() > 1 {
                        strokes.push(std::mem::take(&mut current));
                    }
                    current.clear();
                    position = Point::new(
                        coord
                            .as_ref()
                            .and_then(|c| c.x.as_ref())
                            .map(&to_mm)
                            .unwrap_or(position.x),
                        coord
                            .as_ref()
                            .and_then(|c| c.y.as_ref())
                            .map(&to_mm)
                            .unwrap_or(position.y),
                    );
                }
                Operation::Flash(_) => {
                    debug!("Ignoring flash on outline layer");
                }
            },
            Command::FunctionCode(FunctionCode::GCode(gcode)) => {
                use gerber_types::GCode as GGCode;
                if let GGCode::InterpolationMode(mode) = gcode {
                    interpolation = *mode;
                }
            }
            _ => {}
        }
    }

    if current.len() > 1 {
        strokes.push(current);
    }
    Ok(strokes)
}

/// Points after `start` along the arc to `end`, ending on `end`.
/// Coincident endpoints mean a full circle.
fn flatten_arc(start: Point, end: Point, center: Point, clockwise: bool) -> Vec<Point> {
    let radius = start.distance_to(&center);
    if radius < 1e-9 {
        return vec![end];
    }

    let start_angle = (start.y - center.y).atan2(start.x - center.x);
    let end_angle = (end.y - center.y).atan2(end.x - center.x);
    let mut sweep = end_angle - start_angle;
    if clockwise {
        if sweep >= -1e-9 {
            sweep -= 2.0 * PI;
        }
    } else if sweep <= 1e-9 {
        sweep += 2.0 * PI;
    }

    let segments = ((sweep.abs() * radius / ARC_CHORD_MM).ceil() as usize).clamp(4, 360);
    let mut points: Vec<Point> = (1..segments)
        .map(|k| {
            let angle = start_angle + sweep * k as f64 / segments as f64;
            Point::new(
                center.x + radius * angle.cos(),
                center.y + radius * angle.sin(),
            )
        })
        .collect();
    points.push(end);
    points
}

/// Join strokes end to end into closed rings.
pub fn stitch(strokes: Vec<Vec<Point>>) -> OutlineGeometry {
    let mut geometry = OutlineGeometry::default();
    let mut open: Vec<Vec<Point>> = Vec::new();

    for stroke in strokes {
        if is_closed(&stroke) {
            push_ring(&mut geometry, stroke);
        } else {
            open.push(stroke);
        }
    }

    while let Some(mut chain) = open.pop() {
        loop {
            if is_closed(&chain) {
                push_ring(&mut geometry, chain);
                break;
            }
            let Some(tail) = chain.last().copied() else {
                break;
            };

            let next = open.iter().position(|s| {
                s.first().is_some_and(|p| p.approx_eq(&tail, STITCH_TOLERANCE_MM))
                    || s.last().is_some_and(|p| p.approx_eq(&tail, STITCH_TOLERANCE_MM))
            });

            match next {
                Some(index) => {
                    let mut piece = open.swap_remove(index);
                    if !piece
                        .first()
                        .is_some_and(|p| p.approx_eq(&tail, STITCH_TOLERANCE_MM))
                    {
                        piece.reverse();
                    }
                    chain.extend(piece.into_iter().skip(1));
                }
                None => {
                    let warning = GeometryWarning::new(
                        format!("open stroke of {} points", chain.len()),
                        "endpoints do not meet; dropped",
                    );
                    warn!("{}", warning);
                    geometry.warnings.push(warning);
                    break;
                }
            }
        }
    }

    geometry
}

fn is_closed(points: &[Point]) -> bool {
    match (points.first(), points.last()) {
        (Some(first), Some(last)) => {
            points.len() > 3 && first.approx_eq(last, STITCH_TOLERANCE_MM)
        }
        _ => false,
    }
}

fn push_ring(geometry: &mut OutlineGeometry, points: Vec<Point>) {
    let count = points.len();
    match Contour::new(points) {
        Ok(contour) => geometry.contours.push(contour),
        Err(e) => {
            let warning = GeometryWarning::new(format!("ring of {} points", count), e.to_string());
            warn!("{}", warning);
            geometry.warnings.push(warning);
        }
    }
}
