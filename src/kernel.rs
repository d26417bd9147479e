//! Geometry kernel: pure, stateless primitives the pipeline is built from.
//!
//! No function here ever compares floats exactly; every ambiguous case is
//! decided against an epsilon.

use geo::{Coord, Line, Vector2DOps};
use kurbo::{self, PathEl};

use crate::error::SimulateError;
use crate::outline::Segment;

/// Absolute epsilon for quantities that are already unit-scaled
/// (normalized cross products, unit dot products).
pub const EPSILON: f64 = 1e-9;

pub trait CoordExt: Sized {
    /// z component of the cross product of two 2D vectors.
    fn cross(&self, other: Self) -> f64;
    /// Perpendicular, 90 degrees counter-clockwise.
    fn left(&self) -> Self;
    /// Perpendicular, 90 degrees clockwise.
    fn right(&self) -> Self;
    fn rotate_ccwise(&self, angle_rad: f64) -> Self;
}

impl CoordExt for Coord {
    fn cross(&self, other: Self) -> f64 {
        self.x * other.y - self.y * other.x
    }

    fn left(&self) -> Self {
        Coord {
            x: -self.y,
            y: self.x,
        }
    }

    fn right(&self) -> Self {
        Coord {
            x: self.y,
            y: -self.x,
        }
    }

    fn rotate_ccwise(&self, angle_rad: f64) -> Self {
        let sin = angle_rad.sin();
        let cos = angle_rad.cos();
        Coord {
            x: cos * self.x - sin * self.y,
            y: sin * self.x + cos * self.y,
        }
    }
}

fn to_kurbo(c: Coord) -> kurbo::Point {
    kurbo::Point::new(c.x, c.y)
}

fn from_kurbo(p: kurbo::Point) -> Coord {
    Coord { x: p.x, y: p.y }
}

/// Approximate one segment by a polyline whose maximum deviation from the
/// true curve is at most `tolerance`. The returned points exclude `start`.
///
/// A segment whose defining points all collapse onto `start` within
/// `tolerance` is unusable and reported as [`SimulateError::DegenerateInput`];
/// the caller is expected to drop it.
pub fn flatten_segment(
    start: Coord,
    segment: &Segment,
    tolerance: f64,
) -> Result<Vec<Coord>, SimulateError> {
    let collapsed = segment
        .defining_points()
        .iter()
        .all(|p| (*p - start).magnitude() <= tolerance);
    if collapsed {
        return Err(SimulateError::DegenerateInput(format!(
            "segment collapses to a point at ({:.3}, {:.3})",
            start.x, start.y
        )));
    }

    let el = match *segment {
        Segment::Line { to } => return Ok(vec![to]),
        Segment::Quad { ctrl, to } => PathEl::QuadTo(to_kurbo(ctrl), to_kurbo(to)),
        Segment::Cubic { ctrl1, ctrl2, to } => {
            PathEl::CurveTo(to_kurbo(ctrl1), to_kurbo(ctrl2), to_kurbo(to))
        }
    };

    let mut points = vec![];
    kurbo::flatten([PathEl::MoveTo(to_kurbo(start)), el], tolerance, |el| {
        if let PathEl::LineTo(p) = el {
            points.push(from_kurbo(p));
        }
    });

    // The flattener always emits the endpoint last; guard anyway.
    if points.is_empty() {
        points.push(segment.end());
    }

    Ok(points)
}

/// A proper crossing between two segments: the intersection point plus the
/// curve parameters on both.
#[derive(Debug, Clone, Copy)]
pub struct Crossing {
    pub t_a: f64,
    pub t_b: f64,
    pub at: Coord,
}

/// Intersection of two line segments, endpoint contact included, decided
/// with `eps` in coordinate units. Near-parallel pairs are rejected via the
/// normalized cross product magnitude rather than exact equality.
pub fn segment_crossing(a: &Line, b: &Line, eps: f64) -> Option<Crossing> {
    let r = a.delta();
    let s = b.delta();
    let len_a = r.magnitude();
    let len_b = s.magnitude();
    if len_a <= eps || len_b <= eps {
        return None;
    }

    let denom = r.cross(s);
    if (denom / (len_a * len_b)).abs() <= EPSILON {
        return None;
    }

    let q_p = b.start - a.start;
    let t = q_p.cross(s) / denom;
    let u = q_p.cross(r) / denom;

    let slack_a = eps / len_a;
    let slack_b = eps / len_b;
    if t < -slack_a || t > 1.0 + slack_a || u < -slack_b || u > 1.0 + slack_b {
        return None;
    }

    Some(Crossing {
        t_a: t.clamp(0.0, 1.0),
        t_b: u.clamp(0.0, 1.0),
        at: a.start + r * t.clamp(0.0, 1.0),
    })
}

/// Intersection of the infinite lines through two segments. `None` when the
/// lines are parallel within epsilon.
pub fn line_intersection(a: &Line, b: &Line) -> Option<Coord> {
    let r = a.delta();
    let s = b.delta();
    let scale = (r.magnitude() * s.magnitude()).max(1.0);

    let denom = r.cross(s);
    if denom.abs() <= EPSILON * scale {
        return None;
    }

    let q_p = b.start - a.start;
    let t = q_p.cross(s) / denom;
    Some(a.start + r * t)
}

/// Shoelace area of a ring given without a repeated closing point.
/// Positive means counter-clockwise.
pub fn signed_area(ring: &[Coord]) -> f64 {
    let n = ring.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let a = ring[i];
        let b = ring[(i + 1) % n];
        sum += a.cross(b);
    }
    sum / 2.0
}

/// Even-odd containment test against a ring without a repeated closing point.
/// A ring with no area contains nothing.
pub fn point_in_ring(p: Coord, ring: &[Coord]) -> bool {
    let n = ring.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let a = ring[i];
        let b = ring[j];
        if (a.y > p.y) != (b.y > p.y) {
            let x_cross = a.x + (p.y - a.y) * (b.x - a.x) / (b.y - a.y);
            if p.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Squared distance from a point to a segment.
pub fn point_segment_distance_sq(p: Coord, line: &Line) -> f64 {
    let d = line.delta();
    let len_sq = d.magnitude_squared();
    if len_sq <= EPSILON * EPSILON {
        return (p - line.start).magnitude_squared();
    }
    let t = ((p - line.start).dot_product(d) / len_sq).clamp(0.0, 1.0);
    let closest = line.start + d * t;
    (p - closest).magnitude_squared()
}
