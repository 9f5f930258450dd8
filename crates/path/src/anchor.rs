//! Anchors: the editable knots of a path.

use crate::geom::utils::{is_opposite_collinear, symmetric_point};
use crate::geom::{ArcFlags, CubicBezierSegment, EPSILON};
use crate::math::{Point, Vector};

use std::f64::consts::PI;

/// Tolerance (sine of the angle) under which two handles are considered aligned.
pub const COLLINEAR_TOLERANCE: f64 = 1e-3;

/// How an anchor keeps its two handles symmetric.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum MirrorMode {
    /// Handles move independently.
    NoMirror,
    /// The handles point in opposite directions, their lengths are independent.
    MirrorAngle,
    /// Each handle is the point reflection of the other through the anchor.
    MirrorAngleAndLength,
}

impl Default for MirrorMode {
    fn default() -> Self {
        MirrorMode::NoMirror
    }
}

/// One of the two control handles of an anchor.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum Handle {
    /// Steers the curve arriving at the anchor.
    From,
    /// Steers the curve leaving the anchor.
    To,
}

impl Handle {
    #[inline]
    pub fn opposite(self) -> Self {
        match self {
            Handle::From => Handle::To,
            Handle::To => Handle::From,
        }
    }
}

/// Marks the segment arriving at an anchor as a circular arc.
///
/// Shape conversions (circles, rounded rectangles) attach this to the anchors
/// they produce so that the command serializer can emit arc commands instead
/// of their bézier approximation. The anchor's handles still describe the
/// approximation for the other consumers.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct ArcAnnotation {
    pub center: Point,
    pub radius: f64,
    /// In radians.
    pub start_angle: f64,
    /// In radians.
    pub end_angle: f64,
    /// Counter-clockwise on screen (y pointing down).
    pub counterclockwise: bool,
}

impl ArcAnnotation {
    /// Signed angular extent of the arc, negative when counter-clockwise.
    pub fn sweep_angle(&self) -> f64 {
        let delta = self.end_angle - self.start_angle;
        if self.counterclockwise {
            -(-delta).rem_euclid(2.0 * PI)
        } else {
            delta.rem_euclid(2.0 * PI)
        }
    }

    /// The SVG flags describing this arc.
    pub fn flags(&self) -> ArcFlags {
        ArcFlags {
            large_arc: self.sweep_angle().abs() > PI,
            sweep: !self.counterclockwise,
        }
    }
}

/// An on-curve point with up to two control handles.
///
/// Handles are stored as absolute positions. Moving the anchor translates them
/// along, and editing one of them through [`Anchor::set_handle`] re-derives the
/// other according to the anchor's [`MirrorMode`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct Anchor {
    pub point: Point,
    pub from: Option<Point>,
    pub to: Option<Point>,
    pub mirror: MirrorMode,
    /// First anchor of its subpath.
    pub start: bool,
    /// Last anchor of its subpath.
    pub end: bool,
    /// First anchor of a closed subpath, also acting as its last one.
    pub closed: bool,
    /// Position not committed yet, excluded from the geometry.
    pub is_virtual: bool,
    /// Temporarily excluded from outlines and commands.
    pub hidden: bool,
    pub arc: Option<ArcAnnotation>,
}

impl Anchor {
    pub fn new(point: Point) -> Self {
        Anchor {
            point,
            from: None,
            to: None,
            mirror: MirrorMode::NoMirror,
            start: false,
            end: false,
            closed: false,
            is_virtual: false,
            hidden: false,
            arc: None,
        }
    }

    pub fn with_handles(point: Point, from: Option<Point>, to: Option<Point>) -> Self {
        Anchor {
            from,
            to,
            ..Anchor::new(point)
        }
    }

    #[inline]
    pub fn handle(&self, handle: Handle) -> Option<Point> {
        match handle {
            Handle::From => self.from,
            Handle::To => self.to,
        }
    }

    #[inline]
    fn handle_mut(&mut self, handle: Handle) -> &mut Option<Point> {
        match handle {
            Handle::From => &mut self.from,
            Handle::To => &mut self.to,
        }
    }

    #[inline]
    pub fn has_handles(&self) -> bool {
        self.from.is_some() || self.to.is_some()
    }

    /// Whether the anchor takes part in outlines and drawing commands.
    #[inline]
    pub fn is_visible(&self) -> bool {
        !self.hidden && !self.is_virtual
    }

    /// Set a handle and re-derive the other one if the anchor is mirrored.
    pub fn set_handle(&mut self, handle: Handle, position: Point) {
        *self.handle_mut(handle) = Some(position);
        self.recompute_mirror(handle);
    }

    pub fn set_from(&mut self, position: Point) {
        self.set_handle(Handle::From, position);
    }

    pub fn set_to(&mut self, position: Point) {
        self.set_handle(Handle::To, position);
    }

    /// Remove a handle.
    ///
    /// The anchor can't be symmetric anymore so its mirror mode is reset.
    pub fn delete_handle(&mut self, handle: Handle) {
        *self.handle_mut(handle) = None;
        self.mirror = MirrorMode::NoMirror;
    }

    /// Move the anchor and its handles, returning the displacement.
    ///
    /// A translation keeps the handles symmetric, there is nothing to recompute.
    pub fn move_to(&mut self, position: Point) -> Vector {
        let delta = position - self.point;
        self.translate(delta);

        delta
    }

    pub fn translate(&mut self, delta: Vector) {
        self.point += delta;
        if let Some(from) = &mut self.from {
            *from += delta;
        }
        if let Some(to) = &mut self.to {
            *to += delta;
        }
        if let Some(arc) = &mut self.arc {
            arc.center += delta;
        }
    }

    /// Change the mirror mode and restore the constraint, the `to` handle
    /// being authoritative when both exist.
    pub fn set_mirror(&mut self, mirror: MirrorMode) {
        self.mirror = mirror;
        if self.to.is_some() {
            self.recompute_mirror(Handle::To);
        } else {
            self.recompute_mirror(Handle::From);
        }
    }

    /// Re-derive the handle opposite to `source` so that the mirror constraint holds.
    ///
    /// With `MirrorAngle`, the opposite handle keeps its length; if it doesn't
    /// exist yet it is created as the exact reflection of `source`. Does nothing
    /// with `NoMirror` or if `source` isn't set.
    pub fn recompute_mirror(&mut self, source: Handle) {
        let src = match self.handle(source) {
            Some(p) => p,
            None => return,
        };
        let center = self.point;

        let mirrored = match self.mirror {
            MirrorMode::NoMirror => return,
            MirrorMode::MirrorAngleAndLength => symmetric_point(center, src),
            MirrorMode::MirrorAngle => {
                let direction = center - src;
                let len = direction.length();
                match self.handle(source.opposite()) {
                    Some(other) if len > EPSILON => {
                        center + direction * ((other - center).length() / len)
                    }
                    _ => symmetric_point(center, src),
                }
            }
        };

        *self.handle_mut(source.opposite()) = Some(mirrored);
    }

    /// Detect the mirror mode matching the current handles.
    ///
    /// Aligned handles get `MirrorAngle`, or `MirrorAngleAndLength` if they also
    /// have the same length. The mirror mode is only changed when the handles are
    /// aligned. Returns the resulting mode.
    pub fn infer_mirror(&mut self) -> MirrorMode {
        if let (Some(from), Some(to)) = (self.from, self.to) {
            if is_opposite_collinear(from, self.point, to, COLLINEAR_TOLERANCE) {
                let lf = (from - self.point).length();
                let lt = (to - self.point).length();
                self.mirror = if (lf - lt).abs() <= COLLINEAR_TOLERANCE * lf.max(lt) {
                    MirrorMode::MirrorAngleAndLength
                } else {
                    MirrorMode::MirrorAngle
                };
            }
        }

        self.mirror
    }

    /// The curve going from this anchor to `next`.
    ///
    /// Without handles this is a straight line. With a single handle on either
    /// side the segment is a quadratic curve using it as control point, elevated
    /// to a cubic.
    pub fn curve_to(&self, next: &Anchor) -> CubicBezierSegment {
        let from = self.point;
        let to = next.point;
        match (self.to, next.from) {
            (Some(ctrl1), Some(ctrl2)) => CubicBezierSegment {
                from,
                ctrl1,
                ctrl2,
                to,
            },
            (Some(ctrl), None) | (None, Some(ctrl)) => {
                CubicBezierSegment::from_quadratic(from, ctrl, to)
            }
            (None, None) => CubicBezierSegment::from_line(from, to),
        }
    }

    /// Whether the segment from this anchor to `next` is a straight line.
    #[inline]
    pub fn is_linear_to(&self, next: &Anchor) -> bool {
        self.to.is_none() && next.from.is_none()
    }
}

#[cfg(test)]
use crate::math::point;

#[test]
fn angle_and_length_reflection_holds() {
    let mut anchor = Anchor::new(point(10.0, 10.0));
    anchor.mirror = MirrorMode::MirrorAngleAndLength;

    anchor.set_to(point(15.0, 12.0));
    assert_eq!(anchor.from, Some(point(5.0, 8.0)));

    anchor.set_from(point(0.0, 30.0));
    let to = anchor.to.unwrap();
    assert_eq!(anchor.from.unwrap(), anchor.point * 2.0 - to.to_vector());
    assert_eq!(to, point(20.0, -10.0));
}

#[test]
fn angle_only_keeps_length() {
    let mut anchor = Anchor::with_handles(point(0.0, 0.0), Some(point(-2.0, 0.0)), Some(point(5.0, 0.0)));
    anchor.mirror = MirrorMode::MirrorAngle;

    anchor.set_to(point(0.0, 10.0));
    let from = anchor.from.unwrap();
    assert!((from.x - 0.0).abs() < 1e-12);
    assert!((from.y + 2.0).abs() < 1e-12);

    // A missing opposite handle is created as the exact reflection.
    let mut anchor = Anchor::new(point(0.0, 0.0));
    anchor.mirror = MirrorMode::MirrorAngle;
    anchor.set_from(point(3.0, 4.0));
    assert_eq!(anchor.to, Some(point(-3.0, -4.0)));
}

#[test]
fn no_mirror_leaves_other_handle() {
    let mut anchor = Anchor::new(point(0.0, 0.0));
    anchor.set_to(point(1.0, 1.0));
    assert_eq!(anchor.from, None);

    anchor.set_from(point(-4.0, 0.0));
    assert_eq!(anchor.to, Some(point(1.0, 1.0)));
}

#[test]
fn moving_translates_handles() {
    for &mirror in &[MirrorMode::NoMirror, MirrorMode::MirrorAngle, MirrorMode::MirrorAngleAndLength] {
        let mut anchor = Anchor::with_handles(point(1.0, 1.0), Some(point(0.0, 1.0)), Some(point(3.0, 1.0)));
        anchor.mirror = mirror;
        let delta = anchor.move_to(point(11.0, -1.0));
        assert_eq!(delta, Vector::new(10.0, -2.0));
        assert_eq!(anchor.from, Some(point(10.0, -1.0)));
        assert_eq!(anchor.to, Some(point(13.0, -1.0)));
        assert_eq!(anchor.mirror, mirror);
    }
}

#[test]
fn deleting_a_handle_resets_mirror() {
    let mut anchor = Anchor::with_handles(point(0.0, 0.0), Some(point(-1.0, 0.0)), Some(point(1.0, 0.0)));
    anchor.mirror = MirrorMode::MirrorAngleAndLength;
    anchor.delete_handle(Handle::From);
    assert_eq!(anchor.from, None);
    assert_eq!(anchor.mirror, MirrorMode::NoMirror);

    anchor.set_to(point(2.0, 2.0));
    assert_eq!(anchor.from, None);
}

#[test]
fn mirror_inference() {
    let mut anchor = Anchor::with_handles(point(0.0, 0.0), Some(point(-1.0, 0.0)), Some(point(1.0, 0.0)));
    assert_eq!(anchor.infer_mirror(), MirrorMode::MirrorAngleAndLength);

    let mut anchor = Anchor::with_handles(point(0.0, 0.0), Some(point(-1.0, -1.0)), Some(point(3.0, 3.0)));
    assert_eq!(anchor.infer_mirror(), MirrorMode::MirrorAngle);

    let mut anchor = Anchor::with_handles(point(0.0, 0.0), Some(point(-1.0, 0.0)), Some(point(0.0, 3.0)));
    assert_eq!(anchor.infer_mirror(), MirrorMode::NoMirror);
}

#[test]
fn curve_between_anchors() {
    let a = Anchor::with_handles(point(0.0, 0.0), None, Some(point(0.0, 10.0)));
    let b = Anchor::new(point(10.0, 10.0));
    assert!(!a.is_linear_to(&b));
    let quad = a.curve_to(&b);
    assert_eq!(quad.from, point(0.0, 0.0));
    assert_eq!(quad.to, point(10.0, 10.0));
    assert!((quad.sample(0.5) - point(2.5, 7.5)).length() < 1e-9);

    let c = Anchor::new(point(20.0, 10.0));
    assert!(b.is_linear_to(&c));
    assert!(b.curve_to(&c).is_linear(1e-9));
}

#[test]
fn arc_annotation_flags() {
    let arc = ArcAnnotation {
        center: point(0.0, 0.0),
        radius: 10.0,
        start_angle: 0.0,
        end_angle: -PI / 2.0,
        counterclockwise: false,
    };
    assert!((arc.sweep_angle() - 1.5 * PI).abs() < 1e-12);
    assert_eq!(
        arc.flags(),
        ArcFlags {
            large_arc: true,
            sweep: true
        }
    );

    let ccw = ArcAnnotation {
        counterclockwise: true,
        ..arc
    };
    assert!((ccw.sweep_angle() + 0.5 * PI).abs() < 1e-12);
    assert_eq!(ccw.flags(), ArcFlags::default());
}

#[test]
fn sweep_angle_of_unbounded_angles() {
    let arc = ArcAnnotation {
        center: point(0.0, 0.0),
        radius: 10.0,
        start_angle: 0.0,
        end_angle: 4.5 * PI,
        counterclockwise: false,
    };
    assert!((arc.sweep_angle() - 0.5 * PI).abs() < 1e-9);

    let ccw = ArcAnnotation {
        counterclockwise: true,
        ..arc
    };
    assert!((ccw.sweep_angle() + 1.5 * PI).abs() < 1e-9);

    let infinite = ArcAnnotation {
        end_angle: std::f64::INFINITY,
        ..arc
    };
    assert!(infinite.sweep_angle().is_nan());
}
