use geo::{LineString, Polygon};
use svg::{Document, node::element};

use crate::outline::{Contour, Outline, Segment};
use crate::session::OffsetResult;

pub struct ViewBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl ViewBox {
    pub fn new() -> Self {
        Self {
            min_x: 0.0,
            min_y: 0.0,
            max_x: 0.0,
            max_y: 0.0,
        }
    }

    pub fn include(&mut self, (x, y): (f64, f64)) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }

    pub fn add_margin(&mut self, margin: f64) {
        self.min_x -= margin;
        self.min_y -= margin;
        self.max_x += margin;
        self.max_y += margin;
    }

    pub fn get(&self) -> (f64, f64, f64, f64) {
        (self.min_x, self.min_y, self.max_x - self.min_x, self.max_y - self.min_y)
    }
}

impl Default for ViewBox {
    fn default() -> Self {
        Self::new()
    }
}

/// The input contour with its curves intact.
fn make_outline_path(contour: &Contour, view_box: &mut ViewBox) -> element::Path {
    let start = contour.start();
    let mut data = element::path::Data::new().move_to((start.x, start.y));
    view_box.include((start.x, start.y));

    for segment in contour.segments() {
        match *segment {
            Segment::Line { to } => {
                data = data.line_to((to.x, to.y));
                view_box.include((to.x, to.y));
            },
            Segment::Quad { ctrl, to } => {
                data = data.quadratic_curve_to((ctrl.x, ctrl.y, to.x, to.y));
                view_box.include((ctrl.x, ctrl.y));
                view_box.include((to.x, to.y));
            },
            Segment::Cubic { ctrl1, ctrl2, to } => {
                data = data.cubic_curve_to((ctrl1.x, ctrl1.y, ctrl2.x, ctrl2.y, to.x, to.y));
                view_box.include((ctrl1.x, ctrl1.y));
                view_box.include((ctrl2.x, ctrl2.y));
                view_box.include((to.x, to.y));
            },
        }
    }

    element::Path::new()
        .set("d", data.close())
        .set("vector-effect", "non-scaling-stroke")
}

fn ring_into_data(
    mut data: element::path::Data,
    ring: &LineString,
    view_box: &mut ViewBox,
) -> element::path::Data {
    // Closed rings repeat the first point.
    let mut points = ring.points().skip(1);

    let Some(p0) = points.next() else {
        return data;
    };
    data = data.move_to(p0.x_y());
    view_box.include(p0.x_y());

    for p in points {
        data = data.line_to(p.x_y());
        view_box.include(p.x_y());
    }

    data.close()
}

/// One polygon with its holes as sub-paths, rendered even-odd.
fn make_polygon_path(polygon: &Polygon, view_box: &mut ViewBox) -> element::Path {
    let mut data = element::path::Data::new();
    data = ring_into_data(data, polygon.exterior(), view_box);
    for interior in polygon.interiors() {
        data = ring_into_data(data, interior, view_box);
    }

    element::Path::new()
        .set("d", data)
        .set("vector-effect", "non-scaling-stroke")
}

pub fn make_svg(outline: &Outline, result: &OffsetResult) -> Document {
    let mut view_box = ViewBox::new();
    let mut doc = Document::new();

    let mut g_cut = element::Group::new()
        .set("fill", "#32954466")
        .set("stroke", "#329544FF")
        .set("stroke-width", 1)
        .set("fill-rule", "evenodd");
    for polygon in &result.cut {
        g_cut = g_cut.add(make_polygon_path(polygon, &mut view_box));
    }

    let mut g_lost = element::Group::new()
        .set("fill", "#FF000055")
        .set("stroke", "red")
        .set("stroke-width", 1)
        .set("fill-rule", "evenodd");
    for polygon in &result.diagnostics.unreachable {
        g_lost = g_lost.add(make_polygon_path(polygon, &mut view_box));
    }

    let mut g_outline = element::Group::new()
        .set("fill", "none")
        .set("stroke", "#4774AAFF")
        .set("stroke-width", 1);
    for contour in outline.contours() {
        g_outline = g_outline.add(make_outline_path(contour, &mut view_box));
    }

    doc = doc.add(g_cut).add(g_lost).add(g_outline);

    view_box.add_margin(5.0);
    doc.set("viewBox", view_box.get())
}
