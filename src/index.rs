//! R*-tree spatial index over ring edges.
//!
//! Broad phase for the self-intersection search in the arrangement pass and
//! nearest-edge distance queries for loop classification, so neither has to
//! fall back to O(n^2) scans on dense outlines.

use geo::{Coord, Line, Vector2DOps};
use rstar::{AABB, PointDistance, RTree, RTreeObject};

use crate::kernel::point_segment_distance_sq;

/// One ring edge plus its position in the ring.
#[derive(Debug, Clone)]
pub struct IndexedEdge {
    pub index: usize,
    pub line: Line,
}

impl RTreeObject for IndexedEdge {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        let (a, b) = (self.line.start, self.line.end);
        AABB::from_corners(
            [a.x.min(b.x), a.y.min(b.y)],
            [a.x.max(b.x), a.y.max(b.y)],
        )
    }
}

impl PointDistance for IndexedEdge {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        point_segment_distance_sq(
            Coord {
                x: point[0],
                y: point[1],
            },
            &self.line,
        )
    }
}

/// Spatial index over the edges of one closed ring (given without a repeated
/// closing point; the wrap-around edge is included).
#[derive(Debug)]
pub struct EdgeIndex {
    tree: RTree<IndexedEdge>,
    len: usize,
}

impl EdgeIndex {
    pub fn build(ring: &[Coord]) -> Self {
        let n = ring.len();
        let edges: Vec<_> = (0..n)
            .map(|i| IndexedEdge {
                index: i,
                line: Line::new(ring[i], ring[(i + 1) % n]),
            })
            .collect();
        Self {
            tree: RTree::bulk_load(edges),
            len: n,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Distance from a point to the closest edge of the ring.
    pub fn distance(&self, p: Coord) -> f64 {
        self.tree
            .nearest_neighbor(&[p.x, p.y])
            .map(|edge| point_segment_distance_sq(p, &edge.line).sqrt())
            .unwrap_or(f64::INFINITY)
    }

    /// Edges whose bounding boxes come within `margin` of the given segment.
    pub fn candidates(&self, line: &Line, margin: f64) -> impl Iterator<Item = &IndexedEdge> {
        let (a, b) = (line.start, line.end);
        let envelope = AABB::from_corners(
            [a.x.min(b.x) - margin, a.y.min(b.y) - margin],
            [a.x.max(b.x) + margin, a.y.max(b.y) + margin],
        );
        self.tree.locate_in_envelope_intersecting(&envelope)
    }
}
