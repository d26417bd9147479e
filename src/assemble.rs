//! Assembly of kept loops into a solid, and the reachability diagnostics.
//!
//! Loop-level work upstream is per contour; this module is where the
//! contours meet again. Outer-derived loops are unioned, hole-derived loops
//! are unioned separately and subtracted, so a hole grown until it eats its
//! outer boundary resolves to nothing instead of an inside-out polygon.

use geo::{Area, BooleanOps, Coord, LineString, MultiPolygon, Polygon};

use crate::kernel::signed_area;
use crate::offset::{JoinStyle, OffsetDirection, offset_solid};

/// A counter-clockwise polygon (no interiors) from a bare ring.
pub fn polygon_from_ring(ring: &[Coord]) -> Polygon {
    let mut points: Vec<Coord> = ring.to_vec();
    if signed_area(&points) < 0.0 {
        points.reverse();
    }
    points.push(points[0]);
    Polygon::new(LineString::from(points), vec![])
}

/// Union a set of polygons into one multipolygon.
pub fn union_all(polygons: Vec<Polygon>) -> MultiPolygon {
    polygons
        .into_iter()
        .fold(MultiPolygon::new(vec![]), |acc, p| {
            acc.union(&MultiPolygon::new(vec![p]))
        })
}

/// Combine outer-derived and hole-derived loops into the final solid.
pub fn assemble_solid(outers: Vec<Vec<Coord>>, holes: Vec<Vec<Coord>>) -> MultiPolygon {
    let solid = union_all(outers.iter().map(|r| polygon_from_ring(r)).collect());
    if holes.is_empty() {
        return solid;
    }
    let carved = union_all(holes.iter().map(|r| polygon_from_ring(r)).collect());
    solid.difference(&carved)
}

/// Flatten a solid back into bare rings with their boundary role: outer
/// boundaries counter-clockwise, holes clockwise, the solid always on the
/// left of travel.
pub fn solid_rings(solid: &MultiPolygon) -> Vec<(Vec<Coord>, bool)> {
    let mut rings = vec![];
    for polygon in &solid.0 {
        rings.push((oriented_ring(polygon.exterior(), true), false));
        for interior in polygon.interiors() {
            rings.push((oriented_ring(interior, false), true));
        }
    }
    rings
}

fn oriented_ring(ls: &LineString, ccw: bool) -> Vec<Coord> {
    let mut points: Vec<Coord> = ls.0.clone();
    // LineString rings repeat the first point at the end.
    if points.len() > 1 && points.first() == points.last() {
        points.pop();
    }
    if (signed_area(&points) > 0.0) != ccw {
        points.reverse();
    }
    points
}

/// Regions of the cut the bit cannot reach: concave detail narrower than
/// the bit diameter.
///
/// Growing the solid by the radius seals every gap the bit does not fit
/// into; eroding it back restores everything else. What the round trip
/// gained over the original is exactly the sealed detail. Miter joins make
/// the round trip an identity on corners wide enough for the bit, so convex
/// shapes and open regions report nothing.
pub fn unreachable_regions(
    original: &MultiPolygon,
    radius: f64,
    tolerance: f64,
    min_area: f64,
) -> Vec<Polygon> {
    if radius <= 0.0 {
        return vec![];
    }

    let grown = offset_solid(
        original,
        radius,
        OffsetDirection::Grow,
        JoinStyle::Miter,
        tolerance,
    );
    let closed = offset_solid(
        &grown,
        radius,
        OffsetDirection::Erode,
        JoinStyle::Miter,
        tolerance,
    );

    closed
        .difference(original)
        .0
        .into_iter()
        .filter(|p| p.unsigned_area() > min_area)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring(points: &[(f64, f64)]) -> Vec<Coord> {
        points.iter().map(|&(x, y)| Coord { x, y }).collect()
    }

    #[test]
    fn assembly_carves_holes() {
        let outer = ring(&[(0.0, 0.0), (100.0, 0.0), (100.0, 100.0), (0.0, 100.0)]);
        // Hole loops arrive clockwise; orientation is normalized on entry.
        let hole = ring(&[(20.0, 20.0), (20.0, 80.0), (80.0, 80.0), (80.0, 20.0)]);

        let solid = assemble_solid(vec![outer], vec![hole]);
        assert!((solid.unsigned_area() - (10000.0 - 3600.0)).abs() < 1e-6);

        let rings = solid_rings(&solid);
        assert_eq!(rings.len(), 2);
        assert!(!rings[0].1 && rings[1].1);
        assert!(signed_area(&rings[0].0) > 0.0);
        assert!(signed_area(&rings[1].0) < 0.0);
    }

    #[test]
    fn hole_swallowing_its_outer_leaves_nothing() {
        let outer = ring(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]);
        let hole = ring(&[(-5.0, -5.0), (-5.0, 15.0), (15.0, 15.0), (15.0, -5.0)]);

        let solid = assemble_solid(vec![outer], vec![hole]);
        assert!(solid.unsigned_area() < 1e-9);
    }

    #[test]
    fn convex_shape_has_no_unreachable_regions() {
        let solid = MultiPolygon::new(vec![polygon_from_ring(&ring(&[
            (0.0, 0.0),
            (100.0, 0.0),
            (100.0, 100.0),
            (0.0, 100.0),
        ]))]);
        let lost = unreachable_regions(&solid, 10.0, 0.1, 1.0);
        assert!(lost.is_empty(), "got {lost:?}");
    }
}
