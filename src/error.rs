//! Error taxonomy for a single `simulate` call.
//!
//! None of these are fatal to the caller's process; everything is scoped to
//! the call that produced it.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimulateError {
    /// The tool configuration is unusable. Fatal to the call, no partial
    /// result is produced.
    #[error("invalid tool: radius {radius} must be >= 0 and tolerance {tolerance} must be > 0")]
    InvalidTool { radius: f64, tolerance: f64 },

    /// A single segment collapsed to a point within tolerance. Recovered
    /// locally by the normalizer (the segment is dropped and counted); this
    /// never escapes `simulate`.
    #[error("degenerate segment: {0}")]
    DegenerateInput(String),

    /// Nothing survived normalization. Benign: the caller may treat this as
    /// "nothing to preview".
    #[error("outline has no usable contours after normalization")]
    EmptyInput,

    /// The cancellation token fired between processing steps.
    #[error("simulation was cancelled")]
    Cancelled,
}
