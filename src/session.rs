//! The simulation session: pipeline orchestration, cancellation, caching.
//!
//! One simulation call is: validate, normalize, offset every contour (in
//! parallel, erosion with round joins), reassemble, then run the
//! reachability diagnostics. The pipeline is deterministic: the same outline
//! and tool produce bit-identical results regardless of thread scheduling,
//! because contour order is preserved and all reductions are ordered.

use std::collections::HashMap;
use std::hash::{DefaultHasher, Hasher};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use geo::{MultiPolygon, Polygon};
use log::{debug, info};
use rayon::prelude::*;

use crate::assemble;
use crate::error::SimulateError;
use crate::normalize::normalize_outline;
use crate::offset::{JoinStyle, OffsetDirection, offset_ring_loops};
use crate::outline::Outline;
use crate::tool::ToolProfile;

/// Everything the simulation noticed without failing.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    /// Concave detail narrower than the bit diameter, reported as polygons.
    pub unreachable: Vec<Polygon>,
    /// Input segments skipped because they collapsed to a point.
    pub dropped_segments: usize,
    /// Input contours skipped with fewer than 3 distinct points.
    pub dropped_contours: usize,
    /// Offset joins that hit the miter limit and were beveled.
    pub degenerate_joins: usize,
    /// Contours whose offset vanished entirely, bit too large.
    pub vanished_contours: usize,
}

/// The outcome of one simulation.
#[derive(Debug, Clone)]
pub struct OffsetResult {
    /// The reachable cut region.
    pub cut: MultiPolygon,
    pub diagnostics: Diagnostics,
}

/// Cooperative cancellation handle. Cloning shares the flag; cancelling
/// makes an in-flight simulation return [`SimulateError::Cancelled`] at the
/// next pipeline checkpoint.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    fn check(&self) -> Result<(), SimulateError> {
        if self.is_cancelled() {
            return Err(SimulateError::Cancelled);
        }
        Ok(())
    }
}

/// Simulate one cut without a cancellation handle.
pub fn simulate(outline: &Outline, tool: &ToolProfile) -> Result<OffsetResult, SimulateError> {
    simulate_cancellable(outline, tool, &CancelToken::new())
}

pub fn simulate_cancellable(
    outline: &Outline,
    tool: &ToolProfile,
    token: &CancelToken,
) -> Result<OffsetResult, SimulateError> {
    tool.validate()?;
    if outline.is_empty() {
        return Err(SimulateError::EmptyInput);
    }
    token.check()?;

    let norm = normalize_outline(outline, tool.tolerance);
    if norm.contours.is_empty() {
        return Err(SimulateError::EmptyInput);
    }

    let mut diagnostics = Diagnostics {
        dropped_segments: norm.dropped_segments,
        dropped_contours: norm.dropped_contours,
        ..Diagnostics::default()
    };

    let original = {
        let (outers, holes): (Vec<_>, Vec<_>) =
            norm.contours.iter().partition(|c| !c.hole);
        assemble::assemble_solid(
            outers.into_iter().map(|c| c.ring.clone()).collect(),
            holes.into_iter().map(|c| c.ring.clone()).collect(),
        )
    };

    if tool.radius == 0.0 {
        debug!("zero radius, returning the normalized outline unchanged");
        return Ok(OffsetResult {
            cut: original,
            diagnostics,
        });
    }
    token.check()?;

    // Contours are independent until reassembly. The collect preserves
    // contour order, which keeps the boolean reduction deterministic.
    let per_contour: Result<Vec<_>, SimulateError> = norm
        .contours
        .par_iter()
        .map(|contour| {
            token.check()?;
            let loops = offset_ring_loops(
                &contour.ring,
                tool.radius,
                OffsetDirection::Erode,
                JoinStyle::Round,
                tool.tolerance,
            );
            Ok((contour.hole, loops))
        })
        .collect();

    let mut outers = vec![];
    let mut holes = vec![];
    for (hole, loops) in per_contour? {
        diagnostics.degenerate_joins += loops.degenerate_joins;
        if loops.vanished() {
            diagnostics.vanished_contours += 1;
        }
        if hole {
            holes.extend(loops.loops);
        } else {
            outers.extend(loops.loops);
        }
    }

    token.check()?;
    let cut = assemble::assemble_solid(outers, holes);

    token.check()?;
    diagnostics.unreachable = assemble::unreachable_regions(
        &original,
        tool.radius,
        tool.tolerance,
        tool.min_detail_area(),
    );

    info!(
        "simulated {} contour(s): {} cut polygon(s), {} unreachable region(s)",
        norm.contours.len(),
        cut.0.len(),
        diagnostics.unreachable.len(),
    );
    Ok(OffsetResult { cut, diagnostics })
}

/// A simulation front end with a result cache, for interactive callers that
/// re-simulate the same glyph while the user pans around.
///
/// Results are cached per tool for the current outline snapshot, keyed by
/// bit-level fingerprints. Supplying a different outline drops the stale
/// entries, so an editing session never accumulates results for outlines
/// that no longer exist. Errors are never cached.
#[derive(Debug, Default)]
pub struct Simulator {
    cache: Mutex<Cache>,
}

#[derive(Debug, Default)]
struct Cache {
    outline: Option<u64>,
    results: HashMap<u64, Arc<OffsetResult>>,
}

impl Simulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn simulate(
        &self,
        outline: &Outline,
        tool: &ToolProfile,
    ) -> Result<Arc<OffsetResult>, SimulateError> {
        self.simulate_cancellable(outline, tool, &CancelToken::new())
    }

    pub fn simulate_cancellable(
        &self,
        outline: &Outline,
        tool: &ToolProfile,
        token: &CancelToken,
    ) -> Result<Arc<OffsetResult>, SimulateError> {
        let outline_fp = fingerprint_outline(outline);
        let tool_fp = fingerprint_tool(tool);

        {
            let mut cache = self.lock_cache();
            if cache.outline != Some(outline_fp) {
                debug!("new outline snapshot {outline_fp:#018x}, dropping cached results");
                cache.outline = Some(outline_fp);
                cache.results.clear();
            } else if let Some(hit) = cache.results.get(&tool_fp) {
                debug!("cache hit for tool {tool_fp:#018x}");
                return Ok(hit.clone());
            }
        }

        let result = Arc::new(simulate_cancellable(outline, tool, token)?);

        // Another caller may have moved on to a newer snapshot meanwhile.
        let mut cache = self.lock_cache();
        if cache.outline == Some(outline_fp) {
            cache.results.insert(tool_fp, result.clone());
        }
        Ok(result)
    }

    pub fn clear(&self) {
        let mut cache = self.lock_cache();
        cache.outline = None;
        cache.results.clear();
    }

    fn lock_cache(&self) -> std::sync::MutexGuard<'_, Cache> {
        self.cache.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn fingerprint_outline(outline: &Outline) -> u64 {
    let mut hasher = DefaultHasher::new();
    outline.hash_into(&mut hasher);
    hasher.finish()
}

fn fingerprint_tool(tool: &ToolProfile) -> u64 {
    let mut hasher = DefaultHasher::new();
    tool.hash_into(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use geo::Coord;

    use super::*;

    fn square_outline(side: f64) -> Outline {
        let mut pen = crate::outline::OutlinePen::new();
        pen.move_to(Coord { x: 0.0, y: 0.0 }).unwrap();
        pen.line_to(Coord { x: side, y: 0.0 }).unwrap();
        pen.line_to(Coord { x: side, y: side }).unwrap();
        pen.line_to(Coord { x: 0.0, y: side }).unwrap();
        pen.close().unwrap();
        pen.finish()
    }

    #[test]
    fn empty_outline_is_a_benign_error() {
        let err = simulate(&Outline::default(), &ToolProfile::new(10.0)).unwrap_err();
        assert_eq!(err, SimulateError::EmptyInput);
    }

    #[test]
    fn cancellation_wins_over_work() {
        let token = CancelToken::new();
        token.cancel();
        let err = simulate_cancellable(&square_outline(100.0), &ToolProfile::new(10.0), &token)
            .unwrap_err();
        assert_eq!(err, SimulateError::Cancelled);
    }

    #[test]
    fn invalid_tool_is_rejected_first() {
        let err = simulate(&square_outline(100.0), &ToolProfile::new(-1.0)).unwrap_err();
        assert!(matches!(err, SimulateError::InvalidTool { .. }));
    }

    #[test]
    fn cache_returns_the_same_result() {
        let simulator = Simulator::new();
        let outline = square_outline(100.0);
        let tool = ToolProfile::new(10.0);

        let a = simulator.simulate(&outline, &tool).unwrap();
        let b = simulator.simulate(&outline, &tool).unwrap();
        assert!(Arc::ptr_eq(&a, &b));

        simulator.clear();
        let c = simulator.simulate(&outline, &tool).unwrap();
        assert!(!Arc::ptr_eq(&a, &c));
    }

    #[test]
    fn cache_is_scoped_to_the_outline_snapshot() {
        let simulator = Simulator::new();
        let first = square_outline(100.0);
        let tool = ToolProfile::new(10.0);

        // Results for several tools on the same snapshot coexist.
        let a = simulator.simulate(&first, &tool).unwrap();
        simulator.simulate(&first, &ToolProfile::new(20.0)).unwrap();
        assert!(Arc::ptr_eq(&a, &simulator.simulate(&first, &tool).unwrap()));

        // A new snapshot evicts everything cached for the old one.
        let second = square_outline(120.0);
        simulator.simulate(&second, &tool).unwrap();
        let again = simulator.simulate(&first, &tool).unwrap();
        assert!(!Arc::ptr_eq(&a, &again));
    }
}
