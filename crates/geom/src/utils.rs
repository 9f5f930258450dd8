//! Small vector helpers shared by the other quill crates.

use crate::{point, vector, Point, Vector, EPSILON};

#[inline]
pub fn min_max(a: f64, b: f64) -> (f64, f64) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Rotates a vector by 90 degrees (clockwise on screen with y pointing down).
#[inline]
pub fn tangent(v: Vector) -> Vector {
    vector(-v.y, v.x)
}

/// The unit normal of a direction, or `None` if the direction has no length.
#[inline]
pub fn normal(v: Vector) -> Option<Vector> {
    let len = v.length();
    if len < EPSILON || !len.is_finite() {
        return None;
    }

    Some(tangent(v) / len)
}

/// Point reflection of `p` through `center`.
#[inline]
pub fn symmetric_point(center: Point, p: Point) -> Point {
    center + (center - p)
}

/// Reflects `p` across the line going through `a` and `b`, scaling the distance
/// between `p` and the line by `ratio`.
///
/// With a ratio of 1 this is a regular mirror image. If `a` and `b` are the same
/// point, the reflection is done through `a` instead.
pub fn symmetric_point_scaled(a: Point, b: Point, p: Point, ratio: f64) -> Point {
    let ab = b - a;
    let square_len = ab.square_length();
    let foot = if square_len < EPSILON * EPSILON {
        a
    } else {
        let t = (p - a).dot(ab) / square_len;
        a + ab * t
    };

    foot + (foot - p) * ratio
}

/// Whether `a`, `center` and `b` lie on a line with `center` between the two others.
///
/// This is what a pair of handles looks like when the curve is smooth at `center`.
pub fn is_opposite_collinear(a: Point, center: Point, b: Point, tolerance: f64) -> bool {
    let va = a - center;
    let vb = b - center;
    let la = va.length();
    let lb = vb.length();
    if la < EPSILON || lb < EPSILON {
        return false;
    }

    // Sine of the angle between the two handles, scale independent.
    let sin = va.cross(vb) / (la * lb);

    sin.abs() <= tolerance && va.dot(vb) < 0.0
}

/// Rounds a value to a number of decimals.
#[inline]
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

#[inline]
pub fn fuzzy_eq_point(a: Point, b: Point, epsilon: f64) -> bool {
    (a.x - b.x).abs() <= epsilon && (a.y - b.y).abs() <= epsilon
}

/// Sample a point on a circle at a given angle.
#[inline]
pub fn circle_point(center: Point, radius: f64, angle: f64) -> Point {
    point(
        center.x + radius * angle.cos(),
        center.y + radius * angle.sin(),
    )
}

#[test]
fn symmetric_point_scaled_example() {
    let p = symmetric_point_scaled(
        point(240.0, 160.0),
        point(320.0, 160.0),
        point(280.0, 280.0),
        2.0 / 6.0,
    );

    assert_eq!(p, point(280.0, 120.0));
}

#[test]
fn symmetric_point_through_center() {
    assert_eq!(
        symmetric_point(point(10.0, 10.0), point(15.0, 7.0)),
        point(5.0, 13.0)
    );
    // Degenerate line: fall back to a point reflection.
    assert!(fuzzy_eq_point(
        symmetric_point_scaled(point(1.0, 1.0), point(1.0, 1.0), point(3.0, 1.0), 1.0),
        point(-1.0, 1.0),
        1e-9
    ));
}

#[test]
fn opposite_collinear() {
    let c = point(0.0, 0.0);
    assert!(is_opposite_collinear(point(-1.0, 0.0), c, point(5.0, 0.0), 1e-3));
    assert!(!is_opposite_collinear(point(1.0, 0.0), c, point(5.0, 0.0), 1e-3));
    assert!(!is_opposite_collinear(point(-1.0, 1.0), c, point(5.0, 0.0), 1e-3));
    assert!(!is_opposite_collinear(c, c, point(5.0, 0.0), 1e-3));
}

#[test]
fn normal_of_zero_vector() {
    assert!(normal(vector(0.0, 0.0)).is_none());
    assert_eq!(normal(vector(2.0, 0.0)), Some(vector(0.0, 1.0)));
}

#[test]
fn rounding() {
    assert_eq!(round_to(1.23456, 2), 1.23);
    assert_eq!(round_to(-0.125, 1), -0.1);
}
