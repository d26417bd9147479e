//! Simulation of the outline a round-nosed CNC router bit can actually cut.
//!
//! The input is a glyph-style outline (closed contours of line and Bezier
//! segments, font-unit coordinates). The engine flattens and cleans every
//! contour, offsets the boundary by the bit radius toward the material,
//! removes the self-intersections that appear wherever the outline is tighter
//! than the tool can follow, and reassembles the surviving loops into the
//! cuttable shape. Regions the tool can never reach (features narrower than
//! the bit diameter) are reported as diagnostics instead of silently
//! disappearing.
//!
//! The main entry point is [`simulate`]; [`Simulator`] adds result caching
//! and [`CancelToken`] allows an interactive caller to abort stale work.

pub mod arrange;
pub mod assemble;
pub mod config;
pub mod error;
pub mod index;
pub mod io;
pub mod kernel;
pub mod normalize;
pub mod offset;
pub mod outline;
pub mod session;
pub mod tool;

#[cfg(test)]
mod tests;

pub use error::SimulateError;
pub use outline::{Contour, Outline, OutlinePen, Segment};
pub use session::{CancelToken, Diagnostics, OffsetResult, Simulator, simulate};
pub use tool::ToolProfile;
