mod properties;

use anyhow::Result;
use geo::{Area, Coord, MultiPolygon};

use crate::outline::{Outline, OutlinePen};

pub fn init_test_logger() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .format_timestamp(None)
        .format_target(false)
        .is_test(true)
        .try_init();
}

pub fn square(side: f64) -> Result<Outline> {
    let mut pen = OutlinePen::new();
    pen.move_to(Coord { x: 0.0, y: 0.0 })?;
    pen.line_to(Coord { x: side, y: 0.0 })?;
    pen.line_to(Coord { x: side, y: side })?;
    pen.line_to(Coord { x: 0.0, y: side })?;
    pen.close()?;
    Ok(pen.finish())
}

/// A 1000 by 1000 square with a 50-wide, 200-deep notch cut into the top
/// side. The notch floor corners are at (475, 800) and (525, 800).
pub fn notched_square() -> Result<Outline> {
    let mut pen = OutlinePen::new();
    pen.move_to(Coord { x: 0.0, y: 0.0 })?;
    pen.line_to(Coord { x: 1000.0, y: 0.0 })?;
    pen.line_to(Coord { x: 1000.0, y: 1000.0 })?;
    pen.line_to(Coord { x: 525.0, y: 1000.0 })?;
    pen.line_to(Coord { x: 525.0, y: 800.0 })?;
    pen.line_to(Coord { x: 475.0, y: 800.0 })?;
    pen.line_to(Coord { x: 475.0, y: 1000.0 })?;
    pen.line_to(Coord { x: 0.0, y: 1000.0 })?;
    pen.close()?;
    Ok(pen.finish())
}

/// Four cubics approximating a circle, the way font outlines draw one.
pub fn add_circle(pen: &mut OutlinePen, cx: f64, cy: f64, r: f64) -> Result<()> {
    const KAPPA: f64 = 0.552_284_749_8;
    let k = r * KAPPA;

    pen.move_to(Coord { x: cx + r, y: cy })?;
    pen.curve_to(
        Coord { x: cx + r, y: cy + k },
        Coord { x: cx + k, y: cy + r },
        Coord { x: cx, y: cy + r },
    )?;
    pen.curve_to(
        Coord { x: cx - k, y: cy + r },
        Coord { x: cx - r, y: cy + k },
        Coord { x: cx - r, y: cy },
    )?;
    pen.curve_to(
        Coord { x: cx - r, y: cy - k },
        Coord { x: cx - k, y: cy - r },
        Coord { x: cx, y: cy - r },
    )?;
    pen.curve_to(
        Coord { x: cx + k, y: cy - r },
        Coord { x: cx + r, y: cy - k },
        Coord { x: cx + r, y: cy },
    )?;
    pen.close()?;
    Ok(())
}

pub fn circle(cx: f64, cy: f64, r: f64) -> Result<Outline> {
    let mut pen = OutlinePen::new();
    add_circle(&mut pen, cx, cy, r)?;
    Ok(pen.finish())
}

pub fn area(mp: &MultiPolygon) -> f64 {
    mp.unsigned_area()
}
