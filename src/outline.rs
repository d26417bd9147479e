//! The input data model: points, segments, contours, outlines.
//!
//! Everything here is constructed fresh from externally supplied glyph data
//! at the start of a simulation call and is read-only afterwards.

use std::hash::{Hash, Hasher};

use anyhow::{Result, ensure};
use geo::Coord;

/// One step of a contour. The start point is implicit: it is the end of the
/// previous segment, or the contour start for the first segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Segment {
    Line { to: Coord },
    Quad { ctrl: Coord, to: Coord },
    Cubic { ctrl1: Coord, ctrl2: Coord, to: Coord },
}

impl Segment {
    pub fn end(&self) -> Coord {
        match *self {
            Segment::Line { to } => to,
            Segment::Quad { to, .. } => to,
            Segment::Cubic { to, .. } => to,
        }
    }

    /// Every point that defines the segment, endpoint included.
    pub(crate) fn defining_points(&self) -> Vec<Coord> {
        match *self {
            Segment::Line { to } => vec![to],
            Segment::Quad { ctrl, to } => vec![ctrl, to],
            Segment::Cubic { ctrl1, ctrl2, to } => vec![ctrl1, ctrl2, to],
        }
    }

    fn hash_into<H: Hasher>(&self, state: &mut H) {
        match *self {
            Segment::Line { to } => {
                0u8.hash(state);
                hash_coord(to, state);
            }
            Segment::Quad { ctrl, to } => {
                1u8.hash(state);
                hash_coord(ctrl, state);
                hash_coord(to, state);
            }
            Segment::Cubic { ctrl1, ctrl2, to } => {
                2u8.hash(state);
                hash_coord(ctrl1, state);
                hash_coord(ctrl2, state);
                hash_coord(to, state);
            }
        }
    }
}

fn hash_coord<H: Hasher>(c: Coord, state: &mut H) {
    c.x.to_bits().hash(state);
    c.y.to_bits().hash(state);
}

/// One closed loop. Closing back to the start point is implicit; the
/// normalizer inserts the closing edge when it flattens the contour.
#[derive(Debug, Clone, PartialEq)]
pub struct Contour {
    start: Coord,
    segments: Vec<Segment>,
}

impl Contour {
    pub fn new(start: Coord, segments: Vec<Segment>) -> Self {
        Self { start, segments }
    }

    pub fn start(&self) -> Coord {
        self.start
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    fn hash_into<H: Hasher>(&self, state: &mut H) {
        hash_coord(self.start, state);
        self.segments.len().hash(state);
        for segment in &self.segments {
            segment.hash_into(state);
        }
    }
}

/// One glyph shape: outer boundaries plus holes. Which contour is which is
/// decided by the normalizer via containment parity, not by input winding.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Outline {
    contours: Vec<Contour>,
}

impl Outline {
    pub fn new(contours: Vec<Contour>) -> Self {
        Self { contours }
    }

    pub fn push(&mut self, contour: Contour) {
        self.contours.push(contour);
    }

    pub fn contours(&self) -> &[Contour] {
        &self.contours
    }

    pub fn is_empty(&self) -> bool {
        self.contours.is_empty()
    }

    /// Bit-level value fingerprint, used as the cache key together with the
    /// tool profile.
    pub(crate) fn hash_into<H: Hasher>(&self, state: &mut H) {
        self.contours.len().hash(state);
        for contour in &self.contours {
            contour.hash_into(state);
        }
    }
}

/// Pen-protocol builder for outlines, mirroring the move/line/curve/close
/// command stream font editors produce when drawing a glyph.
pub struct OutlinePen {
    outline: Outline,
    current: Option<(Coord, Vec<Segment>)>,
}

impl OutlinePen {
    pub fn new() -> Self {
        Self {
            outline: Outline::default(),
            current: None,
        }
    }

    /// Start a new contour. An open contour with at least one segment is
    /// closed implicitly, as pen consumers conventionally do.
    pub fn move_to(&mut self, p: Coord) -> Result<()> {
        self.close_open();
        self.current = Some((p, vec![]));
        Ok(())
    }

    pub fn line_to(&mut self, p: Coord) -> Result<()> {
        let (_, segments) = self
            .current
            .as_mut()
            .ok_or_else(|| anyhow::anyhow!("Line To can not be the first command"))?;
        segments.push(Segment::Line { to: p });
        Ok(())
    }

    pub fn quad_to(&mut self, ctrl: Coord, to: Coord) -> Result<()> {
        let (_, segments) = self
            .current
            .as_mut()
            .ok_or_else(|| anyhow::anyhow!("Quad To can not be the first command"))?;
        segments.push(Segment::Quad { ctrl, to });
        Ok(())
    }

    pub fn curve_to(&mut self, ctrl1: Coord, ctrl2: Coord, to: Coord) -> Result<()> {
        let (_, segments) = self
            .current
            .as_mut()
            .ok_or_else(|| anyhow::anyhow!("Curve To can not be the first command"))?;
        segments.push(Segment::Cubic { ctrl1, ctrl2, to });
        Ok(())
    }

    pub fn close(&mut self) -> Result<()> {
        let (start, segments) = self
            .current
            .take()
            .ok_or_else(|| anyhow::anyhow!("Close Path without an open contour"))?;
        ensure!(!segments.is_empty(), "Can not close an empty contour");
        self.outline.push(Contour::new(start, segments));
        Ok(())
    }

    pub fn finish(mut self) -> Outline {
        self.close_open();
        self.outline
    }

    fn close_open(&mut self) {
        if let Some((start, segments)) = self.current.take() {
            if !segments.is_empty() {
                self.outline.push(Contour::new(start, segments));
            }
        }
    }
}

impl Default for OutlinePen {
    fn default() -> Self {
        Self::new()
    }
}
