//! Conversion of basic SVG shapes into anchors.
//!
//! Circles and the corners of rounded rectangles are tiled with quadrant
//! curves. Their anchors carry an arc annotation, so that they are written back
//! as arc commands.

use crate::builder::Normalize;
use quill_path::geom::arc::circle_quadrants;
use quill_path::geom::utils::fuzzy_eq_point;
use quill_path::geom::{CubicBezierSegment, EPSILON};
use quill_path::math::{point, Point, Transform, Vector};
use quill_path::{Anchor, ArcAnnotation, Handle, MirrorMode, Path, SubpathId};

use std::f64::consts::FRAC_PI_2;

// Helper appending anchors in source coordinates.
struct ShapeBuilder<'l, N> {
    path: &'l mut Path,
    normalize: &'l N,
    subpath: SubpathId,
}

impl<'l, N: Normalize> ShapeBuilder<'l, N> {
    fn begin(path: &'l mut Path, normalize: &'l N, at: Point) -> Self {
        let (subpath, _) = path.begin_subpath(normalize.normalize(at));
        ShapeBuilder {
            path,
            normalize,
            subpath,
        }
    }

    fn last_point(&self) -> Option<Point> {
        let id = self.path.subpath(self.subpath)?.last()?;
        self.path.get(id).map(|a| a.point)
    }

    fn line_to(&mut self, to: Point) {
        let to = self.normalize.normalize(to);
        if let Some(last) = self.last_point() {
            if fuzzy_eq_point(last, to, EPSILON) {
                return;
            }
        }
        self.path.append_anchor(self.subpath, Anchor::new(to));
    }

    fn curve_to(&mut self, curve: &CubicBezierSegment, arc: Option<ArcAnnotation>) {
        let n = self.normalize;
        if let Some(last) = self.path.subpath(self.subpath).and_then(|sp| sp.last()) {
            self.path.set_handle(last, Handle::To, n.normalize(curve.ctrl1));
            self.path.infer_mirror(last);
        }

        let mut anchor = Anchor::with_handles(n.normalize(curve.to), Some(n.normalize(curve.ctrl2)), None);
        anchor.arc = arc.map(|arc| ArcAnnotation {
            center: n.normalize(arc.center),
            radius: n.normalize_length(arc.radius),
            ..arc
        });
        self.path.append_anchor(self.subpath, anchor);
    }

    fn close(self) -> SubpathId {
        self.path.close_subpath(self.subpath);
        self.subpath
    }
}

fn quadrant_arc(center: Point, radius: f64, quadrant: usize) -> ArcAnnotation {
    let start_angle = quadrant as f64 * FRAC_PI_2;
    ArcAnnotation {
        center,
        radius,
        start_angle,
        end_angle: start_angle + FRAC_PI_2,
        counterclockwise: false,
    }
}

/// Add a circle as a closed subpath of four anchors, starting at angle zero and
/// turning clockwise on screen.
///
/// Returns `None` for non-positive radii.
pub fn append_circle<N: Normalize>(
    path: &mut Path,
    center: Point,
    radius: f64,
    normalize: &N,
) -> Option<SubpathId> {
    if !(radius > 0.0) {
        return None;
    }

    let quadrants = circle_quadrants(center, radius);
    let mut builder = ShapeBuilder::begin(path, normalize, quadrants[0].from);
    for (i, quadrant) in quadrants.iter().enumerate() {
        builder.curve_to(quadrant, Some(quadrant_arc(center, radius, i)));
    }

    let subpath = builder.close();
    if let Some(first) = path.subpath(subpath).and_then(|sp| sp.first()) {
        path.set_mirror(first, MirrorMode::MirrorAngleAndLength);
    }

    Some(subpath)
}

/// Add an ellipse as a closed subpath of four anchors.
///
/// Circular ellipses are added with `append_circle`.
pub fn append_ellipse<N: Normalize>(
    path: &mut Path,
    center: Point,
    radii: Vector,
    normalize: &N,
) -> Option<SubpathId> {
    if !(radii.x > 0.0 && radii.y > 0.0) {
        return None;
    }
    if (radii.x - radii.y).abs() <= EPSILON {
        return append_circle(path, center, radii.x, normalize);
    }

    let transform = Transform::scale(radii.x, radii.y).then_translate(center.to_vector());
    let quadrants = circle_quadrants(point(0.0, 0.0), 1.0);
    let mut builder = ShapeBuilder::begin(path, normalize, transform.transform_point(quadrants[0].from));
    for quadrant in &quadrants {
        builder.curve_to(&quadrant.transformed(&transform), None);
    }

    Some(builder.close())
}

/// Add a rectangle, with rounded corners if `radii` isn't null.
///
/// Radii are clamped to half the size of the rectangle. Corners are circular
/// arcs when both radii are equal.
pub fn append_rect<N: Normalize>(
    path: &mut Path,
    origin: Point,
    width: f64,
    height: f64,
    radii: Vector,
    normalize: &N,
) -> Option<SubpathId> {
    if !(width > 0.0 && height > 0.0) {
        return None;
    }

    let rx = radii.x.max(0.0).min(width * 0.5);
    let ry = radii.y.max(0.0).min(height * 0.5);
    let (x, y, w, h) = (origin.x, origin.y, width, height);

    if rx <= EPSILON || ry <= EPSILON {
        let mut builder = ShapeBuilder::begin(path, normalize, origin);
        builder.line_to(point(x + w, y));
        builder.line_to(point(x + w, y + h));
        builder.line_to(point(x, y + h));
        return Some(builder.close());
    }

    let circular = (rx - ry).abs() <= EPSILON;
    let unit = circle_quadrants(point(0.0, 0.0), 1.0);
    // Corner centers, clockwise from the top right one, with the quadrant they use.
    let corners = [
        (point(x + w - rx, y + ry), 3),
        (point(x + w - rx, y + h - ry), 0),
        (point(x + rx, y + h - ry), 1),
        (point(x + rx, y + ry), 2),
    ];
    let edges_to = [
        point(x + w - rx, y),
        point(x + w, y + h - ry),
        point(x + rx, y + h),
        point(x, y + ry),
    ];

    let mut builder = ShapeBuilder::begin(path, normalize, point(x + rx, y));
    for (&(center, quadrant), &edge_end) in corners.iter().zip(edges_to.iter()) {
        builder.line_to(edge_end);
        let transform = Transform::scale(rx, ry).then_translate(center.to_vector());
        let curve = unit[quadrant].transformed(&transform);
        let arc = if circular {
            Some(quadrant_arc(center, rx, quadrant))
        } else {
            None
        };
        builder.curve_to(&curve, arc);
    }

    Some(builder.close())
}

/// Add a polygon or a polyline.
pub fn append_polygon<N: Normalize>(
    path: &mut Path,
    points: &[Point],
    closed: bool,
    normalize: &N,
) -> Option<SubpathId> {
    let (first, rest) = points.split_first()?;
    let mut builder = ShapeBuilder::begin(path, normalize, *first);
    for p in rest {
        builder.line_to(*p);
    }

    if closed {
        Some(builder.close())
    } else {
        Some(builder.subpath)
    }
}

#[cfg(test)]
use crate::builder::Identity;
#[cfg(test)]
use quill_path::CommandKind;

#[cfg(test)]
fn kinds(path: &Path) -> String {
    path.build_commands().iter().map(|c| c.kind.letter()).collect()
}

#[test]
fn circle() {
    let mut path = Path::new();
    let sp = append_circle(&mut path, point(50.0, 50.0), 10.0, &Identity).unwrap();
    let subpath = path.subpath(sp).unwrap();
    assert_eq!(subpath.len(), 4);
    assert!(subpath.is_closed());

    let commands = path.build_commands();
    assert_eq!(kinds(&path), "MAAAAZ");
    assert_eq!(commands[0].args, vec![60.0, 50.0]);
    assert_eq!(commands[1].kind, CommandKind::Arc);
    let svg = commands[1].svg_arc.unwrap();
    assert_eq!(&svg[..5], &[10.0, 10.0, 0.0, 0.0, 1.0]);
    assert!((svg[5] - 50.0).abs() < 1e-9 && (svg[6] - 60.0).abs() < 1e-9);

    for anchor in path.subpath_anchors(sp) {
        assert_eq!(anchor.mirror, MirrorMode::MirrorAngleAndLength);
    }

    assert!(append_circle(&mut path, point(0.0, 0.0), 0.0, &Identity).is_none());
}

#[test]
fn plain_rect() {
    let mut path = Path::new();
    append_rect(&mut path, point(1.0, 2.0), 10.0, 5.0, Vector::zero(), &Identity).unwrap();
    assert_eq!(kinds(&path), "MLLLZ");
}

#[test]
fn rounded_rect() {
    let mut path = Path::new();
    let sp = append_rect(&mut path, point(0.0, 0.0), 100.0, 50.0, Vector::new(10.0, 10.0), &Identity).unwrap();
    assert_eq!(path.subpath(sp).unwrap().len(), 8);
    assert_eq!(kinds(&path), "MLALALALAZ");

    // Fully rounded sides don't leave zero-length edges behind.
    let mut path = Path::new();
    let sp = append_rect(&mut path, point(0.0, 0.0), 20.0, 20.0, Vector::new(10.0, 10.0), &Identity).unwrap();
    assert_eq!(path.subpath(sp).unwrap().len(), 4);
    assert_eq!(kinds(&path), "MAAAAZ");

    // Elliptic corners are plain curves.
    let mut path = Path::new();
    append_rect(&mut path, point(0.0, 0.0), 100.0, 50.0, Vector::new(10.0, 5.0), &Identity).unwrap();
    assert_eq!(kinds(&path), "MLCLCLCLCZ");
}

#[test]
fn ellipse() {
    let mut path = Path::new();
    let sp = append_ellipse(&mut path, point(0.0, 0.0), Vector::new(20.0, 10.0), &Identity).unwrap();
    let points: Vec<Point> = path.subpath_anchors(sp).map(|a| a.point).collect();
    assert_eq!(points.len(), 4);
    assert!(fuzzy_eq_point(points[0], point(20.0, 0.0), 1e-9));
    assert!(fuzzy_eq_point(points[1], point(0.0, 10.0), 1e-9));
    assert_eq!(kinds(&path), "MCCCCZ");
}

#[test]
fn polyline() {
    let mut path = Path::new();
    let points = [point(0.0, 0.0), point(10.0, 0.0), point(10.0, 10.0)];
    append_polygon(&mut path, &points, false, &Identity).unwrap();
    append_polygon(&mut path, &points, true, &Identity).unwrap();
    assert_eq!(kinds(&path), "MLLMLLZ");
    assert!(append_polygon(&mut path, &[], true, &Identity).is_none());
}
