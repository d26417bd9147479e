//! Contour normalization: curves to clean polygons.
//!
//! Every contour is flattened with the session tolerance, points closer than
//! the tolerance are merged, and contours left with fewer than 3 distinct
//! points are skipped (counted, never an error). Outer/hole roles come from
//! containment parity against sibling contours, and winding is normalized so
//! the solid always lies to the left of travel: counter-clockwise outer
//! boundaries, clockwise holes.

use geo::Coord;
use log::debug;

use crate::index::EdgeIndex;
use crate::kernel::{point_in_ring, signed_area};
use crate::outline::{Contour, Outline};

#[derive(Debug, Clone)]
pub struct NormContour {
    /// Closed ring without a repeated closing point.
    pub ring: Vec<Coord>,
    pub hole: bool,
}

#[derive(Debug, Default)]
pub struct Normalized {
    pub contours: Vec<NormContour>,
    pub dropped_contours: usize,
    pub dropped_segments: usize,
}

pub fn normalize_outline(outline: &Outline, tolerance: f64) -> Normalized {
    let mut norm = Normalized::default();
    let mut rings = vec![];

    for contour in outline.contours() {
        match flatten_contour(contour, tolerance, &mut norm.dropped_segments) {
            Some(ring) => rings.push(ring),
            None => norm.dropped_contours += 1,
        }
    }

    // Outer/hole role by containment parity against the sibling contours.
    // The depths are computed before any ring is consumed, so every
    // containment test sees the full set.
    let depths: Vec<usize> = {
        let indices: Vec<_> = rings.iter().map(|r| EdgeIndex::build(r)).collect();
        (0..rings.len())
            .map(|i| {
                (0..rings.len())
                    .filter(|&j| {
                        j != i && contains_ring(&rings[j], &indices[j], &rings[i], tolerance)
                    })
                    .count()
            })
            .collect()
    };

    for (mut ring, depth) in rings.into_iter().zip(depths) {
        let hole = depth % 2 == 1;
        let ccw = signed_area(&ring) > 0.0;
        if ccw == hole {
            ring.reverse();
        }
        norm.contours.push(NormContour { ring, hole });
    }

    if norm.dropped_contours > 0 || norm.dropped_segments > 0 {
        debug!(
            "normalization dropped {} contour(s) and {} segment(s)",
            norm.dropped_contours, norm.dropped_segments
        );
    }

    norm
}

/// Flatten one contour into a deduplicated ring, or `None` when fewer than
/// 3 distinct points survive.
fn flatten_contour(
    contour: &Contour,
    tolerance: f64,
    dropped_segments: &mut usize,
) -> Option<Vec<Coord>> {
    use geo::Vector2DOps;

    let mut points = vec![contour.start()];
    let mut cursor = contour.start();

    for segment in contour.segments() {
        match crate::kernel::flatten_segment(cursor, segment, tolerance) {
            Ok(flat) => {
                cursor = *flat.last().expect("flatten returns at least the endpoint");
                points.extend(flat);
            }
            Err(err) => {
                debug!("skipping segment: {err}");
                *dropped_segments += 1;
            }
        }
    }

    // Merge consecutive points closer than the tolerance, then the implicit
    // closing edge back to the start.
    let mut ring: Vec<Coord> = vec![];
    for p in points {
        if ring
            .last()
            .map_or(true, |q| (p - *q).magnitude() > tolerance)
        {
            ring.push(p);
        }
    }
    while ring.len() > 1 {
        let first = ring[0];
        let last = *ring.last().expect("non-empty");
        if (last - first).magnitude() <= tolerance {
            ring.pop();
        } else {
            break;
        }
    }

    if ring.len() < 3 {
        return None;
    }
    Some(ring)
}

/// Whether `candidate` nests inside `outer`. Vertices sitting on the outer
/// boundary within tolerance are ambiguous and skipped; a candidate that
/// touches everywhere counts as not contained.
fn contains_ring(
    outer: &[Coord],
    outer_index: &EdgeIndex,
    candidate: &[Coord],
    tolerance: f64,
) -> bool {
    for &p in candidate {
        if outer_index.distance(p) > tolerance {
            return point_in_ring(p, outer);
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use geo::Coord;

    use super::*;
    use crate::outline::OutlinePen;

    fn rect(pen: &mut OutlinePen, x0: f64, y0: f64, x1: f64, y1: f64) -> Result<()> {
        pen.move_to(Coord { x: x0, y: y0 })?;
        pen.line_to(Coord { x: x1, y: y0 })?;
        pen.line_to(Coord { x: x1, y: y1 })?;
        pen.line_to(Coord { x: x0, y: y1 })?;
        pen.close()?;
        Ok(())
    }

    #[test]
    fn roles_and_winding() -> Result<()> {
        let mut pen = OutlinePen::new();
        rect(&mut pen, 0.0, 0.0, 100.0, 100.0)?;
        rect(&mut pen, 20.0, 20.0, 80.0, 80.0)?;
        let norm = normalize_outline(&pen.finish(), 0.1);

        assert_eq!(norm.contours.len(), 2);
        assert!(!norm.contours[0].hole);
        assert!(norm.contours[1].hole);

        // Solid to the left: outer counter-clockwise, hole clockwise.
        assert!(signed_area(&norm.contours[0].ring) > 0.0);
        assert!(signed_area(&norm.contours[1].ring) < 0.0);
        Ok(())
    }

    #[test]
    fn nesting_parity_over_three_levels() -> Result<()> {
        // A ring inside a hole is an outer boundary again. The innermost
        // contour is nested in both earlier ones, so this also exercises
        // containment against contours processed before it.
        let mut pen = OutlinePen::new();
        rect(&mut pen, 0.0, 0.0, 300.0, 300.0)?;
        rect(&mut pen, 50.0, 50.0, 250.0, 250.0)?;
        rect(&mut pen, 100.0, 100.0, 200.0, 200.0)?;
        let norm = normalize_outline(&pen.finish(), 0.1);

        let roles: Vec<bool> = norm.contours.iter().map(|c| c.hole).collect();
        assert_eq!(roles, vec![false, true, false]);
        Ok(())
    }

    #[test]
    fn winding_of_input_is_irrelevant() -> Result<()> {
        // Same rectangle drawn clockwise still normalizes to ccw outer.
        let mut pen = OutlinePen::new();
        pen.move_to(Coord { x: 0.0, y: 0.0 })?;
        pen.line_to(Coord { x: 0.0, y: 50.0 })?;
        pen.line_to(Coord { x: 50.0, y: 50.0 })?;
        pen.line_to(Coord { x: 50.0, y: 0.0 })?;
        pen.close()?;

        let norm = normalize_outline(&pen.finish(), 0.1);
        assert_eq!(norm.contours.len(), 1);
        assert!(signed_area(&norm.contours[0].ring) > 0.0);
        Ok(())
    }

    #[test]
    fn degenerate_contour_is_skipped_not_fatal() -> Result<()> {
        let mut pen = OutlinePen::new();
        rect(&mut pen, 0.0, 0.0, 100.0, 100.0)?;
        // A sliver below tolerance: every point merges into one.
        pen.move_to(Coord { x: 200.0, y: 200.0 })?;
        pen.line_to(Coord { x: 200.02, y: 200.0 })?;
        pen.line_to(Coord { x: 200.02, y: 200.02 })?;
        pen.close()?;

        let norm = normalize_outline(&pen.finish(), 0.1);
        assert_eq!(norm.contours.len(), 1);
        assert_eq!(norm.dropped_contours, 1);
        Ok(())
    }

    #[test]
    fn zero_length_segments_are_merged() -> Result<()> {
        let mut pen = OutlinePen::new();
        pen.move_to(Coord { x: 0.0, y: 0.0 })?;
        pen.line_to(Coord { x: 50.0, y: 0.0 })?;
        pen.line_to(Coord { x: 50.0, y: 0.0 })?;
        pen.line_to(Coord { x: 50.0, y: 50.0 })?;
        pen.line_to(Coord { x: 0.0, y: 50.0 })?;
        pen.close()?;

        let norm = normalize_outline(&pen.finish(), 0.1);
        assert_eq!(norm.contours.len(), 1);
        assert_eq!(norm.contours[0].ring.len(), 4);
        assert_eq!(norm.dropped_segments, 1);
        Ok(())
    }
}
