//! The curves an outline is made of.

use quill_path::geom::{CubicBezierSegment, LineSegment, Segment};
use quill_path::math::{Box2D, Point, Vector};

use std::ops::Range;

/// Either a straight segment or a cubic bézier curve.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum CurveSegment {
    Line(LineSegment),
    Cubic(CubicBezierSegment),
}

impl CurveSegment {
    #[inline]
    pub fn line(from: Point, to: Point) -> Self {
        CurveSegment::Line(LineSegment { from, to })
    }

    #[inline]
    pub fn is_line(&self) -> bool {
        match self {
            CurveSegment::Line(..) => true,
            CurveSegment::Cubic(..) => false,
        }
    }

    /// Direction at the start of the segment, `None` if it is a single point.
    pub fn start_tangent(&self) -> Option<Vector> {
        match self {
            CurveSegment::Line(line) => non_zero(line.to_vector()),
            CurveSegment::Cubic(curve) => curve.tangent(0.0),
        }
    }

    /// Direction at the end of the segment, `None` if it is a single point.
    pub fn end_tangent(&self) -> Option<Vector> {
        match self {
            CurveSegment::Line(line) => non_zero(line.to_vector()),
            CurveSegment::Cubic(curve) => curve.tangent(1.0),
        }
    }

    /// Move the first endpoint, keeping the shape of a curve's first handle.
    pub fn set_from(&mut self, p: Point) {
        match self {
            CurveSegment::Line(line) => line.from = p,
            CurveSegment::Cubic(curve) => {
                curve.ctrl1 += p - curve.from;
                curve.from = p;
            }
        }
    }

    pub fn to_cubic(&self) -> CubicBezierSegment {
        match self {
            CurveSegment::Line(line) => CubicBezierSegment::from_line(line.from, line.to),
            CurveSegment::Cubic(curve) => *curve,
        }
    }
}

macro_rules! dispatch {
    ($self:ident, $s:ident => $e:expr) => {
        match $self {
            CurveSegment::Line($s) => $e,
            CurveSegment::Cubic($s) => $e,
        }
    };
}

macro_rules! dispatch_map {
    ($self:ident, $s:ident => $e:expr) => {
        match $self {
            CurveSegment::Line($s) => CurveSegment::Line($e),
            CurveSegment::Cubic($s) => CurveSegment::Cubic($e),
        }
    };
}

impl Segment for CurveSegment {
    fn from(&self) -> Point {
        dispatch!(self, s => s.from)
    }

    fn to(&self) -> Point {
        dispatch!(self, s => s.to)
    }

    fn sample(&self, t: f64) -> Point {
        dispatch!(self, s => s.sample(t))
    }

    fn derivative(&self, t: f64) -> Vector {
        dispatch!(self, s => Segment::derivative(s, t))
    }

    fn split(&self, t: f64) -> (Self, Self) {
        match self {
            CurveSegment::Line(line) => {
                let (a, b) = line.split(t);
                (CurveSegment::Line(a), CurveSegment::Line(b))
            }
            CurveSegment::Cubic(curve) => {
                let (a, b) = curve.split(t);
                (CurveSegment::Cubic(a), CurveSegment::Cubic(b))
            }
        }
    }

    fn before_split(&self, t: f64) -> Self {
        dispatch_map!(self, s => s.before_split(t))
    }

    fn after_split(&self, t: f64) -> Self {
        dispatch_map!(self, s => s.after_split(t))
    }

    fn split_range(&self, t_range: Range<f64>) -> Self {
        dispatch_map!(self, s => s.split_range(t_range))
    }

    fn flip(&self) -> Self {
        dispatch_map!(self, s => s.flip())
    }

    fn bounding_box(&self) -> Box2D {
        dispatch!(self, s => s.bounding_box())
    }

    fn approximate_length(&self, tolerance: f64) -> f64 {
        dispatch!(self, s => Segment::approximate_length(s, tolerance))
    }
}

fn non_zero(v: Vector) -> Option<Vector> {
    if v.square_length() > 1e-12 {
        Some(v)
    } else {
        None
    }
}

/// Which part of an outline a curve belongs to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum RailRole {
    /// Offset on the side of the positive normal, in the direction of the path.
    Forward,
    /// Offset on the other side, walked backwards.
    Back,
    /// Start or end cap.
    Cap,
}

/// A curve of an outline along with the part of the outline it comes from.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct OutlineCurve {
    pub segment: CurveSegment,
    pub role: RailRole,
}

impl OutlineCurve {
    #[inline]
    pub fn new(segment: CurveSegment, role: RailRole) -> Self {
        OutlineCurve { segment, role }
    }

    #[inline]
    pub fn is_rail(&self) -> bool {
        self.role != RailRole::Cap
    }
}

#[cfg(test)]
use quill_path::math::point;

#[test]
fn set_from_keeps_handle_offset() {
    let mut curve = CurveSegment::Cubic(CubicBezierSegment {
        from: point(0.0, 0.0),
        ctrl1: point(0.0, 10.0),
        ctrl2: point(10.0, 10.0),
        to: point(10.0, 0.0),
    });
    curve.set_from(point(1.0, 1.0));
    match curve {
        CurveSegment::Cubic(c) => assert_eq!(c.ctrl1, point(1.0, 11.0)),
        CurveSegment::Line(..) => panic!(),
    }

    let mut line = CurveSegment::line(point(0.0, 0.0), point(10.0, 0.0));
    line.set_from(point(5.0, 0.0));
    assert_eq!(line.from(), point(5.0, 0.0));
    assert_eq!(line.flip().to(), point(5.0, 0.0));
}

#[test]
fn degenerate_tangents() {
    let dot = CurveSegment::line(point(3.0, 3.0), point(3.0, 3.0));
    assert!(dot.start_tangent().is_none());

    let line = CurveSegment::line(point(0.0, 0.0), point(0.0, 4.0));
    assert_eq!(line.end_tangent(), Some(Vector::new(0.0, 4.0)));
}
