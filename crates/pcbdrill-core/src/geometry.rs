//! Planar geometry primitives
//!
//! [`Contour`] makes the closed-ring contract explicit: it is constructed
//! from a point list, drops a repeated closing point, and refuses rings that
//! cannot enclose an area. Consumers never see `last == first`; iterating
//! with [`Contour::closed_points`] yields the closing point back.

use crate::error::GeometryError;
use serde::{Deserialize, Serialize};

/// Distance below which two points are treated as the same vertex (mm)
pub const POINT_EPSILON: f64 = 1e-6;

/// 2D point in millimeters
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        ((other.x - self.x).powi(2) + (other.y - self.y).powi(2)).sqrt()
    }

    pub fn approx_eq(&self, other: &Point, tolerance: f64) -> bool {
        self.distance_to(other) <= tolerance
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

/// Implicitly closed ring of points.
///
/// Deserializing goes through [`Contour::new`], so a stored ring is held to
/// the same rules as a constructed one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Point>", into = "Vec<Point>")]
pub struct Contour {
    points: Vec<Point>,
}

impl TryFrom<Vec<Point>> for Contour {
    type Error = GeometryError;

    fn try_from(points: Vec<Point>) -> Result<Self, Self::Error> {
        Self::new(points)
    }
}

impl From<Contour> for Vec<Point> {
    fn from(contour: Contour) -> Self {
        contour.points
    }
}

impl Contour {
    /// Build a contour from a ring of points.
    ///
    /// Consecutive duplicates and an explicit closing point are removed.
    /// Fails when fewer than three distinct points remain or the ring has
    /// no area.
    pub fn new(points: Vec<Point>) -> Result<Self, GeometryError> {
        let mut clean: Vec<Point> = Vec::with_capacity(points.len());
        for p in points {
            if clean
                .last()
                .is_some_and(|last| last.approx_eq(&p, POINT_EPSILON))
            {
                continue;
            }
            clean.push(p);
        }

        while clean.len() > 1 {
            let (first, last) = (clean[0], clean[clean.len() - 1]);
            if first.approx_eq(&last, POINT_EPSILON) {
                clean.pop();
            } else {
                break;
            }
        }

        if clean.len() < 3 {
            return Err(GeometryError::DegenerateContour(format!(
                "{} distinct points, need at least 3",
                clean.len()
            )));
        }

        let contour = Self { points: clean };
        if contour.area() <= POINT_EPSILON * POINT_EPSILON {
            return Err(GeometryError::DegenerateContour(
                "ring encloses no area".to_string(),
            ));
        }
        Ok(contour)
    }

    /// Axis-aligned rectangle, counter-clockwise from `(x0, y0)`.
    pub fn rectangle(x0: f64, y0: f64, x1: f64, y1: f64) -> Result<Self, GeometryError> {
        Self::new(vec![
            Point::new(x0, y0),
            Point::new(x1, y0),
            Point::new(x1, y1),
            Point::new(x0, y1),
        ])
    }

    /// Distinct vertices, without the closing point.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Point {
        self.points[0]
    }

    /// Vertices followed by the first vertex again.
    pub fn closed_points(&self) -> impl Iterator<Item = Point> + '_ {
        self.points.iter().copied().chain(std::iter::once(self.points[0]))
    }

    /// Shoelace area; positive for counter-clockwise rings.
    pub fn signed_area(&self) -> f64 {
        let n = self.points.len();
        let mut sum = 0.0;
        for i in 0..n {
            let p1 = self.points[i];
            let p2 = self.points[(i + 1) % n];
            sum += p1.x * p2.y - p2.x * p1.y;
        }
        sum / 2.0
    }

    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    pub fn is_clockwise(&self) -> bool {
        self.signed_area() < 0.0
    }

    /// Same ring traversed in the opposite direction.
    pub fn reversed(&self) -> Self {
        let mut points = self.points.clone();
        points.reverse();
        Self { points }
    }

    pub fn bounds(&self) -> Bounds {
        let mut bounds = Bounds {
            min_x: f64::INFINITY,
            min_y: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            max_y: f64::NEG_INFINITY,
        };
        for p in &self.points {
            bounds.min_x = bounds.min_x.min(p.x);
            bounds.min_y = bounds.min_y.min(p.y);
            bounds.max_x = bounds.max_x.max(p.x);
            bounds.max_y = bounds.max_y.max(p.y);
        }
        bounds
    }

    /// Even-odd ray cast. Points exactly on an edge may land either way.
    pub fn contains_point(&self, point: &Point) -> bool {
        let n = self.points.len();
        let mut inside = false;
        let mut j = n - 1;
        for i in 0..n {
            let pi = self.points[i];
            let pj = self.points[j];
            if (pi.y > point.y) != (pj.y > point.y) {
                let x_cross = (pj.x - pi.x) * (point.y - pi.y) / (pj.y - pi.y) + pi.x;
                if point.x < x_cross {
                    inside = !inside;
                }
            }
            j = i;
        }
        inside
    }

    /// Whether `other` lies inside this ring. Assumes the rings do not cross.
    pub fn contains(&self, other: &Contour) -> bool {
        other.points.iter().all(|p| self.contains_point(p))
    }
}
