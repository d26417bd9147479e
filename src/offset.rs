//! Ring offsetting: the per-contour half of the simulation.
//!
//! Rings arrive normalized with the solid on the left of travel, so a single
//! signed shift covers both boundary roles: eroding the solid moves every
//! edge left, growing it moves every edge right. The raw offset ring is in
//! general self-intersecting; the arrangement pass splits it into simple
//! loops and the classifier keeps the ones that are real offset boundary.

use geo::{Coord, Line, MultiPolygon, Vector2DOps};
use log::trace;

use crate::arrange;
use crate::assemble;
use crate::index::EdgeIndex;
use crate::kernel::{CoordExt, EPSILON, line_intersection, signed_area};

/// Longest allowed miter spike, as a multiple of the offset radius. Joins
/// past the limit are beveled and counted as degenerate.
pub const MITER_LIMIT: f64 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OffsetDirection {
    /// Shrink the solid: the cutting bit eats into the boundary.
    Erode,
    /// Expand the solid. Used by the reachability diagnostics.
    Grow,
}

impl OffsetDirection {
    /// +1 shifts edges to the left of travel (into the solid),
    /// -1 to the right.
    fn sign(self) -> f64 {
        match self {
            OffsetDirection::Erode => 1.0,
            OffsetDirection::Grow => -1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinStyle {
    /// Arcs on diverging corners. Matches the footprint of a round bit.
    Round,
    /// Straight prolongations on diverging corners, bounded by
    /// [`MITER_LIMIT`]. An exact inverse of itself on convex shapes, which
    /// is what the diagnostics pass needs.
    Miter,
}

/// The shifted ring before any intersection cleanup.
#[derive(Debug, Clone)]
pub struct RawOffset {
    pub ring: Vec<Coord>,
    pub degenerate_joins: usize,
}

/// Offset one closed ring by `radius`. Returns `None` when the result
/// collapses below 3 points.
pub fn offset_ring(
    ring: &[Coord],
    radius: f64,
    direction: OffsetDirection,
    join: JoinStyle,
    tolerance: f64,
) -> Option<RawOffset> {
    let n = ring.len();
    if n < 3 {
        return None;
    }
    if radius <= 0.0 {
        return Some(RawOffset {
            ring: ring.to_vec(),
            degenerate_joins: 0,
        });
    }

    let sign = direction.sign();
    let mut out: Vec<Coord> = vec![];
    let mut degenerate_joins = 0;

    for i in 0..n {
        let prev = ring[(i + n - 1) % n];
        let v = ring[i];
        let next = ring[(i + 1) % n];

        let (Some(d1), Some(d2)) = ((v - prev).try_normalize(), (next - v).try_normalize())
        else {
            continue;
        };
        let n1 = d1.left() * sign;
        let n2 = d2.left() * sign;

        let turn = d1.cross(d2);
        if turn.abs() <= EPSILON && d1.dot_product(d2) > 0.0 {
            // Straight through.
            out.push(v + n1 * radius);
            continue;
        }

        // A corner turning into the shift direction makes the neighbouring
        // offset edges overlap; the join is their intersection. A corner
        // turning away leaves a gap to fill.
        let converging = turn * sign > 0.0;
        if converging || join == JoinStyle::Miter {
            let shifted_in = Line::new(prev + n1 * radius, v + n1 * radius);
            let shifted_out = Line::new(v + n2 * radius, next + n2 * radius);
            match line_intersection(&shifted_in, &shifted_out) {
                Some(p) if (p - v).magnitude() <= radius * MITER_LIMIT => out.push(p),
                _ => {
                    trace!("beveling join at ({:.3}, {:.3})", v.x, v.y);
                    out.push(v + n1 * radius);
                    out.push(v + n2 * radius);
                    degenerate_joins += 1;
                }
            }
        } else {
            arc_join(&mut out, v, n1, n2, radius, -sign, tolerance);
        }
    }

    // Collapse coincident join points.
    let mut ring_out: Vec<Coord> = vec![];
    for p in out {
        if ring_out
            .last()
            .map_or(true, |q| (p - *q).magnitude() > EPSILON)
        {
            ring_out.push(p);
        }
    }
    while ring_out.len() > 1 {
        let first = ring_out[0];
        let last = *ring_out.last()?;
        if (last - first).magnitude() <= EPSILON {
            ring_out.pop();
        } else {
            break;
        }
    }

    if ring_out.len() < 3 {
        return None;
    }
    Some(RawOffset {
        ring: ring_out,
        degenerate_joins,
    })
}

/// Fill a diverging corner with a circular arc around the original vertex,
/// sampled so the chordal deviation stays within the tolerance. `rot` gives
/// the sweep direction, +1 counter-clockwise.
fn arc_join(
    out: &mut Vec<Coord>,
    center: Coord,
    n1: Coord,
    n2: Coord,
    radius: f64,
    rot: f64,
    tolerance: f64,
) {
    use std::f64::consts::TAU;

    let mut angle = n1.cross(n2).atan2(n1.dot_product(n2));
    if rot > 0.0 && angle < 0.0 {
        angle += TAU;
    }
    if rot < 0.0 && angle > 0.0 {
        angle -= TAU;
    }

    let step = 2.0 * (1.0 - tolerance / radius).clamp(-1.0, 1.0).acos();
    let steps = ((angle.abs() / step.max(EPSILON)).ceil() as usize).max(1);

    for k in 0..=steps {
        let a = angle * k as f64 / steps as f64;
        out.push(center + n1.rotate_ccwise(a) * radius);
    }
}

/// Simple loops kept from the offset of one ring.
#[derive(Debug, Default)]
pub struct RingLoops {
    pub loops: Vec<Vec<Coord>>,
    pub degenerate_joins: usize,
}

impl RingLoops {
    pub fn vanished(&self) -> bool {
        self.loops.is_empty()
    }
}

/// Offset one ring, resolve self-intersections, and keep only the loops
/// that are genuine offset boundary: same winding as the source ring and
/// everywhere at offset distance from it.
pub fn offset_ring_loops(
    ring: &[Coord],
    radius: f64,
    direction: OffsetDirection,
    join: JoinStyle,
    tolerance: f64,
) -> RingLoops {
    let Some(raw) = offset_ring(ring, radius, direction, join, tolerance) else {
        return RingLoops::default();
    };

    let loops = arrange::simple_loops(&raw.ring, tolerance);
    let source = EdgeIndex::build(ring);
    let source_ccw = signed_area(ring) > 0.0;
    let kept = arrange::classify_loops(loops, &source, source_ccw, radius, tolerance);

    RingLoops {
        loops: kept,
        degenerate_joins: raw.degenerate_joins,
    }
}

/// Offset a whole solid, boundary roles included, and reassemble the result
/// with boolean operations.
pub fn offset_solid(
    solid: &MultiPolygon,
    radius: f64,
    direction: OffsetDirection,
    join: JoinStyle,
    tolerance: f64,
) -> MultiPolygon {
    let mut outers = vec![];
    let mut holes = vec![];
    for (ring, hole) in assemble::solid_rings(solid) {
        let loops = offset_ring_loops(&ring, radius, direction, join, tolerance).loops;
        if hole {
            holes.extend(loops);
        } else {
            outers.extend(loops);
        }
    }
    assemble::assemble_solid(outers, holes)
}
