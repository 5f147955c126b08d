//! Polygon offsetting
//!
//! Routers only need "offset this closed ring by a signed distance", so the
//! geometry library sits behind [`PolygonOffset`]. Positive distances grow a
//! ring, negative distances shrink it; an empty result means the ring
//! vanished or the offset failed.

use cavalier_contours::polyline::{PlineSource, PlineSourceMut, PlineVertex, Polyline};
use pcbdrill_core::{Contour, Point};
use std::f64::consts::PI;
use std::panic;
use tracing::warn;

/// Chords used to replace one arc segment of an offset result.
const ARC_SEGMENTS: usize = 16;

pub trait PolygonOffset {
    /// Offset a closed ring. Positive `distance` grows it.
    fn offset(&self, ring: &Contour, distance: f64) -> Vec<Contour>;
}

/// [`PolygonOffset`] backed by `cavalier_contours`.
#[derive(Debug, Default, Clone, Copy)]
pub struct CavalierOffset;

impl PolygonOffset for CavalierOffset {
    fn offset(&self, ring: &Contour, distance: f64) -> Vec<Contour> {
        let pline = to_polyline(ring);
        let result = panic::catch_unwind(panic::AssertUnwindSafe(|| pline.parallel_offset(distance)));

        match result {
            Ok(offsets) => offsets
                .iter()
                .filter_map(|p| match Contour::new(linearize(p)) {
                    Ok(contour) => Some(contour),
                    Err(e) => {
                        warn!("Dropping offset ring: {}", e);
                        None
                    }
                })
                .collect(),
            Err(_) => {
                warn!("Panic during parallel offset of {}-point ring", ring.len());
                Vec::new()
            }
        }
    }
}

/// Closed clockwise polyline; with that orientation a positive
/// `parallel_offset` distance moves outward.
fn to_polyline(ring: &Contour) -> Polyline<f64> {
    let oriented = if ring.is_clockwise() {
        ring.clone()
    } else {
        ring.reversed()
    };

    let mut pline = Polyline::new();
    for p in oriented.points() {
        pline.add_vertex(PlineVertex::new(p.x, p.y, 0.0));
    }
    pline.set_is_closed(true);
    pline
}

/// Vertices of a closed polyline with bulge segments expanded into chords.
fn linearize(pline: &Polyline<f64>) -> Vec<Point> {
    let count = pline.vertex_count();
    let mut points = Vec::with_capacity(count);

    for i in 0..count {
        let v1 = pline.at(i);
        let v2 = pline.at((i + 1) % count);
        points.push(Point::new(v1.x, v1.y));

        if v1.bulge.abs() > 1e-9 {
            points.extend(arc_points(
                Point::new(v1.x, v1.y),
                Point::new(v2.x, v2.y),
                v1.bulge,
            ));
        }
    }

    points
}

/// Interior points of the arc from `start` to `end` with the given bulge.
fn arc_points(start: Point, end: Point, bulge: f64) -> Vec<Point> {
    let chord = start.distance_to(&end);
    if chord < 1e-9 {
        return Vec::new();
    }

    // Included angle, positive counter-clockwise
    let sweep = 4.0 * bulge.atan();
    let radius = chord / (2.0 * (sweep / 2.0).sin().abs());
    let mid = Point::new((start.x + end.x) / 2.0, (start.y + end.y) / 2.0);
    let normal = Point::new(-(end.y - start.y) / chord, (end.x - start.x) / chord);
    let sagitta_offset = radius * (sweep.abs() / 2.0).cos();
    let side = if (bulge > 0.0) == (sweep.abs() < PI) {
        1.0
    } else {
        -1.0
    };
    let center = Point::new(
        mid.x + normal.x * sagitta_offset * side,
        mid.y + normal.y * sagitta_offset * side,
    );

    let start_angle = (start.y - center.y).atan2(start.x - center.x);
    (1..ARC_SEGMENTS)
        .map(|k| {
            let angle = start_angle + sweep * k as f64 / ARC_SEGMENTS as f64;
            Point::new(
                center.x + radius * angle.cos(),
                center.y + radius * angle.sin(),
            )
        })
        .collect()
}
