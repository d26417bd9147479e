use anyhow::{Context, Result, bail, ensure};
use geo::Coord;
use log::warn;
use svg::{
    Parser,
    node::element::{path, tag},
    parser::Event,
};

use crate::outline::{Outline, OutlinePen};

/// Control point distance for a cubic approximating a quarter circle.
const KAPPA: f64 = 0.552_284_749_8;

pub fn read_outline(parser: Parser) -> Result<Outline> {
    let mut pen = OutlinePen::new();

    for event in parser {
        match event {

            /* Ignore some events */

            | Event::Instruction(..)
            | Event::Declaration(..)
            | Event::Text(..)
            | Event::Comment(..)
            | Event::Tag(tag::SVG, ..)
            | Event::Tag(tag::Group, ..)
            | Event::Tag(tag::Description, ..)
            | Event::Tag(tag::Title, ..) => {},

            /* Handle paths */

            Event::Tag(tag::Path, tag::Type::Empty, ref attrs) => {
                let data = attrs.get("d").context("No 'd' on a path")?;
                let data = path::Data::parse(data)?;
                add_path(&mut pen, &data)?;
            },

            /* Handle circles */

            Event::Tag(tag::Circle, tag::Type::Empty, attrs) => {
                let cx: f64 = attrs.get("cx").context("No 'cx' on circle")?.parse()?;
                let cy: f64 = attrs.get("cy").context("No 'cy' on circle")?.parse()?;
                let r: f64 = attrs.get("r").context("No 'r' on circle")?.parse()?;
                ensure!(r > 0.0, "Circle radius should be greater than 0");

                add_circle(&mut pen, Coord { x: cx, y: cy }, r)?;
            },

            /* Everything else is not supported */

            event => {
                warn!("Unsupported event {event:?}");
            }
        }
    }

    Ok(pen.finish())
}

fn pairs(params: &[f32]) -> Result<Vec<Coord>> {
    ensure!(params.len() % 2 == 0, "Expected whole coordinate pairs");
    Ok(params
        .chunks(2)
        .map(|p| Coord {
            x: p[0] as f64,
            y: p[1] as f64,
        })
        .collect())
}

fn add_path(pen: &mut OutlinePen, data: &path::Data) -> Result<()> {
    use svg::node::element::path::{Command::*, Position::*};

    let mut cursor = Coord { x: 0.0, y: 0.0 };

    for command in data.iter() {
        match command {
            &Move(Absolute, ref params) => {
                let pts = pairs(params)?;
                ensure!(!pts.is_empty(), "Move To without coordinates");
                pen.move_to(pts[0])?;
                cursor = pts[0];
                // Extra pairs after a Move are implicit Line To commands.
                for &p in &pts[1..] {
                    pen.line_to(p)?;
                    cursor = p;
                }
            },
            &Line(Absolute, ref params) => {
                for p in pairs(params)? {
                    pen.line_to(p)?;
                    cursor = p;
                }
            },
            &Line(Relative, ref params) => {
                for p in pairs(params)? {
                    cursor = cursor + p;
                    pen.line_to(cursor)?;
                }
            },
            &HorizontalLine(Absolute, ref params) => {
                for x in params.iter() {
                    cursor.x = *x as f64;
                    pen.line_to(cursor)?;
                }
            },
            &HorizontalLine(Relative, ref params) => {
                for x in params.iter() {
                    cursor.x += *x as f64;
                    pen.line_to(cursor)?;
                }
            },
            &VerticalLine(Absolute, ref params) => {
                for y in params.iter() {
                    cursor.y = *y as f64;
                    pen.line_to(cursor)?;
                }
            },
            &VerticalLine(Relative, ref params) => {
                for y in params.iter() {
                    cursor.y += *y as f64;
                    pen.line_to(cursor)?;
                }
            },
            &QuadraticCurve(Absolute, ref params) => {
                ensure!(params.len() % 4 == 0, "Expected control point and endpoint");
                for q in pairs(params)?.chunks(2) {
                    pen.quad_to(q[0], q[1])?;
                    cursor = q[1];
                }
            },
            &CubicCurve(Absolute, ref params) => {
                ensure!(params.len() % 6 == 0, "Expected two control points and endpoint");
                for c in pairs(params)?.chunks(3) {
                    pen.curve_to(c[0], c[1], c[2])?;
                    cursor = c[2];
                }
            },
            &Close => {
                pen.close()?;
            },
            command => {
                bail!("Unsupported path command {command:?}");
            },
        }
    }

    Ok(())
}

fn add_circle(pen: &mut OutlinePen, center: Coord, radius: f64) -> Result<()> {
    let (cx, cy) = (center.x, center.y);
    let (r, k) = (radius, radius * KAPPA);

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
