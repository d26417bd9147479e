//! Arrangement of a self-intersecting ring into simple loops.
//!
//! A raw offset ring crosses itself wherever the boundary features are
//! narrower than the offset distance. The crossings are found with an R-tree
//! broad phase, snapped into shared nodes, and the ring is re-walked so that
//! every revisited node pinches off one simple loop. Which loops survive is
//! a separate question answered by [`classify_loops`].

use std::collections::HashMap;

use geo::{Coord, Line, Vector2DOps};
use log::trace;

use crate::index::EdgeIndex;
use crate::kernel::{segment_crossing, signed_area};

/// Split a closed ring into simple (non-self-intersecting) loops.
///
/// Loops whose area is below `tolerance^2` are dropped as numeric debris.
pub fn simple_loops(ring: &[Coord], tolerance: f64) -> Vec<Vec<Coord>> {
    let n = ring.len();
    if n < 3 {
        return vec![];
    }

    let index = EdgeIndex::build(ring);
    let edges: Vec<Line> = (0..n)
        .map(|i| Line::new(ring[i], ring[(i + 1) % n]))
        .collect();

    // Find pairwise crossings and snap them into shared nodes. Neighbouring
    // edges meet at a ring vertex by construction, so those pairs are
    // skipped.
    let mut nodes: Vec<Coord> = vec![];
    let mut splits: Vec<Vec<(f64, usize)>> = vec![vec![]; n];
    for (i, edge) in edges.iter().enumerate() {
        for other in index.candidates(edge, tolerance) {
            let j = other.index;
            if j <= i || j == i + 1 || (i == 0 && j == n - 1) {
                continue;
            }
            if let Some(crossing) = segment_crossing(edge, &other.line, tolerance) {
                let node = intern_node(&mut nodes, crossing.at, tolerance);
                splits[i].push((crossing.t_a, node));
                splits[j].push((crossing.t_b, node));
            }
        }
    }

    if nodes.is_empty() {
        return clean_loop(ring.to_vec(), tolerance).into_iter().collect();
    }
    trace!("ring of {n} points has {} crossing node(s)", nodes.len());

    // Re-walk the ring with the crossing nodes spliced in at their curve
    // parameters.
    let mut walk: Vec<(Coord, Option<usize>)> = vec![];
    for i in 0..n {
        walk.push((ring[i], None));
        splits[i].sort_by(|a, b| a.0.total_cmp(&b.0));
        for &(_, node) in &splits[i] {
            walk.push((nodes[node], Some(node)));
        }
    }

    // Every second arrival at a node closes the loop opened by the first.
    let mut loops: Vec<Vec<Coord>> = vec![];
    let mut path: Vec<(Coord, Option<usize>)> = vec![];
    let mut open: HashMap<usize, usize> = HashMap::new();
    for (p, label) in walk {
        if let Some(node) = label {
            if let Some(&k) = open.get(&node) {
                loops.push(path[k..].iter().map(|(c, _)| *c).collect());
                path.truncate(k + 1);
                open.retain(|_, pos| *pos <= k);
                continue;
            }
            open.insert(node, path.len());
        }
        path.push((p, label));
    }
    // The walk is closed, so whatever remains is the last loop.
    loops.push(path.into_iter().map(|(c, _)| c).collect());

    loops
        .into_iter()
        .filter_map(|l| clean_loop(l, tolerance))
        .collect()
}

fn intern_node(nodes: &mut Vec<Coord>, p: Coord, tolerance: f64) -> usize {
    match nodes.iter().position(|q| (p - *q).magnitude() <= tolerance) {
        Some(i) => i,
        None => {
            nodes.push(p);
            nodes.len() - 1
        }
    }
}

/// Deduplicate consecutive points and reject loops too small to mean
/// anything at the session tolerance.
fn clean_loop(points: Vec<Coord>, tolerance: f64) -> Option<Vec<Coord>> {
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
        let last = *ring.last()?;
        if (last - first).magnitude() <= tolerance {
            ring.pop();
        } else {
            break;
        }
    }

    if ring.len() < 3 || signed_area(&ring).abs() <= tolerance * tolerance {
        return None;
    }
    Some(ring)
}

/// Keep the loops that are genuine offset boundary of `source`.
///
/// A kept loop winds the same way as its source ring and keeps the offset
/// distance everywhere; remnants of swallowed features fail one of the two.
/// The distance check samples loop vertices and edge midpoints against the
/// source edges, with slack for the flattening and snapping done upstream.
pub fn classify_loops(
    loops: Vec<Vec<Coord>>,
    source: &EdgeIndex,
    source_ccw: bool,
    radius: f64,
    tolerance: f64,
) -> Vec<Vec<Coord>> {
    let min_clearance = radius - 3.0 * tolerance;
    loops
        .into_iter()
        .filter(|l| {
            if (signed_area(l) > 0.0) != source_ccw {
                return false;
            }
            clearance(l, source) >= min_clearance
        })
        .collect()
}

fn clearance(ring: &[Coord], source: &EdgeIndex) -> f64 {
    let n = ring.len();
    let mut min = f64::INFINITY;
    for i in 0..n {
        let a = ring[i];
        let b = ring[(i + 1) % n];
        let mid = Coord {
            x: (a.x + b.x) / 2.0,
            y: (a.y + b.y) / 2.0,
        };
        min = min.min(source.distance(a)).min(source.distance(mid));
    }
    min
}
