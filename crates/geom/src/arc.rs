//! Elliptic arc related maths and tools.
//!
//! Arcs are approximated with cubic bézier curves: the circle going through both
//! endpoints is tiled with four quadrant curves and the quadrants covered by the
//! arc are kept, the first and last ones being trimmed at the arc's endpoints.

use crate::utils::{circle_point, fuzzy_eq_point};
use crate::{vector, CubicBezierSegment, Point, Transform, Vector, EPSILON};

use std::f64::consts::{FRAC_PI_2, PI};

/// Distance between a quarter-circle's endpoints and its control points,
/// relative to the radius.
pub const CIRCLE_QUADRANT_RATIO: f64 = 0.5522847498;

/// Maximum distance between a trimmed quadrant and the exact arc endpoint.
pub const ENDPOINT_TOLERANCE: f64 = 1.0;

/// Flag parameters for arcs as described by the SVG specification.
///
/// For most situations using the SVG arc notation, there are four different arcs
/// (two different ellipses, each with two different arc sweeps) that satisfy the
/// arc parameters. The `large_arc` and `sweep` flags indicate which one of the
/// four arcs are drawn.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct ArcFlags {
    /// Of the four candidate arc sweeps, two will represent an arc sweep of greater
    /// than or equal to 180 degrees (the "large-arc"), and two will represent an arc
    /// sweep of less than or equal to 180 degrees (the "small arc"). If `large_arc`
    /// is `true`, then one of the two larger arc sweeps will be chosen; otherwise, if
    /// `large_arc` is `false`, one of the smaller arc sweeps will be chosen.
    pub large_arc: bool,
    /// If `sweep` is `true`, then the arc will be drawn in a "positive-angle" direction
    /// (clockwise on screen). A value of `false` causes the arc to be drawn in a
    /// "negative-angle" direction.
    pub sweep: bool,
}

/// An elliptic arc described the way SVG's `A` path command does.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct SvgArc {
    pub from: Point,
    pub to: Point,
    pub radii: Vector,
    /// Rotation of the ellipse's x axis, in degrees.
    pub x_rotation: f64,
    pub flags: ArcFlags,
}

impl SvgArc {
    /// Per SVG, an arc with a null radius is rendered as a straight line.
    pub fn is_straight_line(&self) -> bool {
        self.radii.x.abs() <= EPSILON || self.radii.y.abs() <= EPSILON
    }

    /// Per SVG, an arc whose endpoints are identical is omitted.
    pub fn is_empty(&self) -> bool {
        fuzzy_eq_point(self.from, self.to, EPSILON)
    }

    /// Approximate this arc with a chain of cubic bézier curves.
    pub fn to_cubics(&self) -> Option<Vec<CubicBezierSegment>> {
        arc_to_cubics(self.from, self.radii, self.x_rotation, self.flags, self.to)
    }
}

/// The circle an arc lies on, and the portion of it the arc covers.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CircleArc {
    pub center: Point,
    pub radius: f64,
    /// Angle of the start point, in radians, between 0 and 2*PI.
    pub start_angle: f64,
    /// Signed angular extent, positive when turning clockwise on screen.
    pub sweep_angle: f64,
}

/// Find the circle going through `from` and `to` with the given radius, picking
/// one of the two candidates using the arc flags.
///
/// If the radius is too small for the chord, it is clamped to half the chord
/// length (the arc becomes a half circle), which is what SVG renderers do.
/// Returns `None` only for unsolvable input (coincident endpoints, non-finite
/// values, non-positive radius).
pub fn circle_center(from: Point, to: Point, radius: f64, flags: ArcFlags) -> Option<CircleArc> {
    let chord = to - from;
    let d = chord.length();
    if !d.is_finite() || !radius.is_finite() || d < EPSILON || radius <= 0.0 {
        return None;
    }

    let half = d * 0.5;
    let mut radius = radius;
    if radius < half {
        log::debug!("arc radius {} clamped to half chord {}", radius, half);
        radius = half;
    }

    let h = (radius * radius - half * half).max(0.0).sqrt();
    let n = vector(-chord.y, chord.x) / d;
    let sign = if flags.large_arc != flags.sweep { 1.0 } else { -1.0 };
    let center = from.lerp(to, 0.5) + n * (sign * h);

    let start_angle = normalize_angle((from - center).angle_from_x_axis().radians);
    let end_angle = normalize_angle((to - center).angle_from_x_axis().radians);

    let sweep_angle = if flags.sweep {
        let mut delta = end_angle - start_angle;
        if delta <= 0.0 {
            delta += 2.0 * PI;
        }
        delta
    } else {
        let mut delta = end_angle - start_angle;
        if delta >= 0.0 {
            delta -= 2.0 * PI;
        }
        delta
    };

    Some(CircleArc {
        center,
        radius,
        start_angle,
        sweep_angle,
    })
}

/// The four cubic curves tiling a full circle, quadrant `i` going from angle
/// `i * 90°` to `(i + 1) * 90°`.
pub fn circle_quadrants(center: Point, radius: f64) -> [CubicBezierSegment; 4] {
    let quadrant = |i: usize| {
        let a0 = i as f64 * FRAC_PI_2;
        let a1 = a0 + FRAC_PI_2;
        let from = circle_point(center, radius, a0);
        let to = circle_point(center, radius, a1);
        let k = CIRCLE_QUADRANT_RATIO * radius;

        CubicBezierSegment {
            from,
            ctrl1: from + vector(-a0.sin(), a0.cos()) * k,
            ctrl2: to - vector(-a1.sin(), a1.cos()) * k,
            to,
        }
    };

    [quadrant(0), quadrant(1), quadrant(2), quadrant(3)]
}

/// Approximate a circular arc with cubic bézier curves.
///
/// The first curve starts exactly at `from` and the last one ends exactly at `to`.
pub fn circle_arc_to_cubics(
    from: Point,
    to: Point,
    radius: f64,
    flags: ArcFlags,
) -> Option<Vec<CubicBezierSegment>> {
    let arc = circle_center(from, to, radius, flags)?;
    let quadrants = circle_quadrants(arc.center, arc.radius);

    let u0 = arc.start_angle / FRAC_PI_2;
    let u1 = u0 + arc.sweep_angle / FRAC_PI_2;
    // Pieces smaller than this (in quadrant units) are floating point noise.
    let min_extent = 1e-7;

    let mut curves = Vec::new();
    let mut push_piece = |k: i32, lo: f64, hi: f64, at_start: bool, at_end: bool, forward: bool| {
        if hi - lo < min_extent {
            return;
        }
        let q = &quadrants[k.rem_euclid(4) as usize];
        let lo_point = if forward { at_start } else { at_end };
        let hi_point = if forward { at_end } else { at_start };
        let target_lo = if forward { from } else { to };
        let target_hi = if forward { to } else { from };

        let t_lo = if lo <= min_extent {
            0.0
        } else if lo_point {
            find_t(q, target_lo, lo)
        } else {
            lo
        };
        let t_hi = if hi >= 1.0 - min_extent {
            1.0
        } else if hi_point {
            find_t(q, target_hi, hi)
        } else {
            hi
        };

        let piece = if t_lo <= 0.0 && t_hi >= 1.0 {
            *q
        } else {
            q.split_range(t_lo..t_hi)
        };

        curves.push(if forward { piece } else { piece.flip() });
    };

    if arc.sweep_angle > 0.0 {
        let first = u0.floor() as i32;
        let last = u1.ceil() as i32 - 1;
        for k in first..=last {
            let kf = k as f64;
            let lo = u0.max(kf) - kf;
            let hi = u1.min(kf + 1.0) - kf;
            push_piece(k, lo, hi, k == first, k == last, true);
        }
    } else {
        let first = u0.ceil() as i32 - 1;
        let last = u1.floor() as i32;
        let mut k = first;
        while k >= last {
            let kf = k as f64;
            let hi = u0.min(kf + 1.0) - kf;
            let lo = u1.max(kf) - kf;
            push_piece(k, lo, hi, k == first, k == last, false);
            k -= 1;
        }
    }

    if let Some(curve) = curves.first_mut() {
        curve.from = from;
    }
    if let Some(curve) = curves.last_mut() {
        curve.to = to;
    }

    Some(curves)
}

// Parameter on a quadrant curve where it passes through an arc endpoint. The
// angular fraction is a decent fallback when the lookup table search fails.
fn find_t(quadrant: &CubicBezierSegment, target: Point, fraction: f64) -> f64 {
    match quadrant.closest_t(target, ENDPOINT_TOLERANCE) {
        Some((t, _)) => t,
        None => {
            log::debug!("no quadrant sample near {:?}, using the angular fraction", target);
            fraction
        }
    }
}

/// Approximate an SVG elliptic arc with cubic bézier curves.
///
/// `x_rotation` is in degrees. The ellipse is mapped onto a circle of radius
/// `radii.x` by undoing the rotation and scaling the y axis, converted, and
/// mapped back.
///
/// Returns an empty list if the endpoints are identical, a single straight curve
/// if a radius is null, and `None` when no circle can be fitted.
pub fn arc_to_cubics(
    from: Point,
    radii: Vector,
    x_rotation: f64,
    flags: ArcFlags,
    to: Point,
) -> Option<Vec<CubicBezierSegment>> {
    if fuzzy_eq_point(from, to, EPSILON) {
        return Some(Vec::new());
    }

    let rx = radii.x.abs();
    let ry = radii.y.abs();
    if rx <= EPSILON || ry <= EPSILON {
        return Some(vec![CubicBezierSegment::from_line(from, to)]);
    }

    let circular = (rx - ry).abs() <= EPSILON && (x_rotation % 360.0).abs() <= EPSILON;
    if circular {
        return circle_arc_to_cubics(from, to, rx, flags);
    }

    let to_circle = Transform::rotation(euclid::Angle::degrees(-x_rotation)).then_scale(1.0, rx / ry);
    let to_ellipse = to_circle.inverse()?;

    let mut curves = circle_arc_to_cubics(
        to_circle.transform_point(from),
        to_circle.transform_point(to),
        rx,
        flags,
    )?;

    for curve in &mut curves {
        *curve = curve.transformed(&to_ellipse);
    }

    if let Some(curve) = curves.first_mut() {
        curve.from = from;
    }
    if let Some(curve) = curves.last_mut() {
        curve.to = to;
    }

    Some(curves)
}

/// Angle in `[0, 2*PI)`.
#[inline]
pub fn normalize_angle(angle: f64) -> f64 {
    let a = angle.rem_euclid(2.0 * PI);
    if a >= 2.0 * PI {
        0.0
    } else {
        a
    }
}

#[cfg(test)]
use crate::point;

#[cfg(test)]
fn assert_on_circle(curves: &[CubicBezierSegment], center: Point, radius: f64) {
    for curve in curves {
        for i in 0..=8 {
            let p = curve.sample(i as f64 / 8.0);
            let d = (p - center).length();
            assert!(
                (d - radius).abs() < radius * 0.003 + 1e-6,
                "{:?} is {} away from the center, expected {}",
                p,
                d,
                radius
            );
        }
    }
}

#[test]
fn endpoints_for_all_flags() {
    let from = point(10.0, 20.0);
    let to = point(60.0, 45.0);
    for &large_arc in &[false, true] {
        for &sweep in &[false, true] {
            let flags = ArcFlags { large_arc, sweep };
            let curves = arc_to_cubics(from, vector(40.0, 40.0), 0.0, flags, to).unwrap();
            assert!(!curves.is_empty());
            assert!(fuzzy_eq_point(curves[0].from, from, ENDPOINT_TOLERANCE));
            assert!(fuzzy_eq_point(curves.last().unwrap().to, to, ENDPOINT_TOLERANCE));

            // The chain is continuous.
            for pair in curves.windows(2) {
                assert!(fuzzy_eq_point(pair[0].to, pair[1].from, 1e-3));
            }

            let arc = circle_center(from, to, 40.0, flags).unwrap();
            assert_on_circle(&curves, arc.center, 40.0);
            assert_eq!(arc.sweep_angle.abs() > PI, large_arc);
            assert_eq!(arc.sweep_angle > 0.0, sweep);
        }
    }
}

#[test]
fn small_arc_stays_in_one_quadrant() {
    // 30° of a circle of radius 100 centered on the origin, inside the first quadrant.
    let r = 100.0;
    let from = circle_point(point(0.0, 0.0), r, 0.2);
    let to = circle_point(point(0.0, 0.0), r, 0.2 + PI / 6.0);
    let flags = ArcFlags {
        large_arc: false,
        sweep: true,
    };

    let curves = circle_arc_to_cubics(from, to, r, flags).unwrap();
    assert_eq!(curves.len(), 1);
    assert_on_circle(&curves, point(0.0, 0.0), r);
}

#[test]
fn half_circle_counter_clockwise() {
    let flags = ArcFlags {
        large_arc: false,
        sweep: false,
    };
    let curves = circle_arc_to_cubics(point(0.0, 0.0), point(100.0, 0.0), 50.0, flags).unwrap();
    assert_eq!(curves.len(), 2);
    assert_on_circle(&curves, point(50.0, 0.0), 50.0);
    // Counter-clockwise on screen from the left side goes through the bottom.
    assert!(curves[0].to.y > 49.0);
}

#[test]
fn radius_too_small_is_clamped() {
    let flags = ArcFlags {
        large_arc: false,
        sweep: true,
    };
    // Chord of 100.0000001 with a radius of 50: floating point noise.
    let arc = circle_center(point(0.0, 0.0), point(100.0000001, 0.0), 50.0, flags).unwrap();
    assert!((arc.radius - 50.00000005).abs() < 1e-9);
    assert!(fuzzy_eq_point(arc.center, point(50.00000005, 0.0), 1e-6));

    // Even a much too small radius degrades into a half circle.
    let curves = circle_arc_to_cubics(point(0.0, 0.0), point(100.0, 0.0), 1.0, flags).unwrap();
    assert_eq!(curves.len(), 2);
    assert_on_circle(&curves, point(50.0, 0.0), 50.0);
}

#[test]
fn degenerate_arcs() {
    let flags = ArcFlags::default();
    assert!(circle_center(point(1.0, 1.0), point(1.0, 1.0), 10.0, flags).is_none());
    assert!(circle_center(point(0.0, 0.0), point(1.0, 1.0), f64::NAN, flags).is_none());

    let empty = arc_to_cubics(point(1.0, 1.0), vector(5.0, 5.0), 0.0, flags, point(1.0, 1.0));
    assert_eq!(empty, Some(Vec::new()));

    let line = arc_to_cubics(point(0.0, 0.0), vector(0.0, 5.0), 0.0, flags, point(10.0, 0.0)).unwrap();
    assert_eq!(line.len(), 1);
    assert!(line[0].is_linear(1e-9));
}

#[test]
fn large_arc_wraps_around() {
    let flags = ArcFlags {
        large_arc: true,
        sweep: true,
    };
    let from = point(100.0, 0.0);
    let to = circle_point(point(0.0, 0.0), 100.0, -0.3);
    let curves = circle_arc_to_cubics(from, to, 100.0, flags).unwrap();
    // Almost a full turn.
    assert!(curves.len() >= 4);
    assert_on_circle(&curves, point(0.0, 0.0), 100.0);
    assert!(fuzzy_eq_point(curves.last().unwrap().to, to, 1e-9));
}

#[test]
fn rotated_ellipse() {
    let flags = ArcFlags {
        large_arc: false,
        sweep: true,
    };
    let from = point(0.0, 0.0);
    let to = point(80.0, 30.0);
    let curves = arc_to_cubics(from, vector(60.0, 30.0), 30.0, flags, to).unwrap();
    assert!(!curves.is_empty());
    assert_eq!(curves[0].from, from);
    assert_eq!(curves.last().unwrap().to, to);
    for pair in curves.windows(2) {
        assert!(fuzzy_eq_point(pair[0].to, pair[1].from, 1e-3));
    }
}
