// Compute the winding of a subpath.

use crate::math::{vector, Point};
use crate::Winding;

/// Twice the signed area of the polygon formed by a sequence of points.
///
/// The polygon is implicitly closed. The area is positive when the points turn
/// clockwise on screen (y pointing down).
pub fn signed_area<Iter>(points: Iter) -> f64
where
    Iter: IntoIterator<Item = Point>,
{
    let mut points = points.into_iter();
    let first = match points.next() {
        Some(p) => p,
        None => return 0.0,
    };

    // Fan around the first point, which closes the polygon for free.
    let mut area = 0.0;
    let mut v0 = vector(0.0, 0.0);
    for p in points {
        let v1 = p - first;
        area += v0.cross(v1);
        v0 = v1;
    }

    area
}

/// Compute the winding of a polygon.
///
/// Returns `None` if the polygon has a null area (less than three points, or
/// all points aligned).
pub fn compute_winding<Iter>(points: Iter) -> Option<Winding>
where
    Iter: IntoIterator<Item = Point>,
{
    let area = signed_area(points);
    if area > 0.0 {
        Some(Winding::Positive)
    } else if area < 0.0 {
        Some(Winding::Negative)
    } else {
        None
    }
}

/// Whether a polygon turns clockwise on screen.
///
/// The result doesn't depend on which point the sequence starts with.
pub fn check_is_clockwise(points: &[Point]) -> bool {
    signed_area(points.iter().cloned()) > 0.0
}

#[cfg(test)]
use crate::math::point;

#[test]
fn polygon_winding() {
    let clockwise = [
        point(0.0, 0.0),
        point(10.0, 0.0),
        point(10.0, 10.0),
        point(0.0, 10.0),
    ];
    assert_eq!(compute_winding(clockwise.iter().cloned()), Some(Winding::Positive));
    assert!(check_is_clockwise(&clockwise));
    assert_eq!(signed_area(clockwise.iter().cloned()), 200.0);

    let counter_clockwise: Vec<_> = clockwise.iter().rev().cloned().collect();
    assert_eq!(compute_winding(counter_clockwise), Some(Winding::Negative));
}

#[test]
fn winding_is_rotation_invariant() {
    let mut points = vec![
        point(3.0, 1.0),
        point(12.0, 4.0),
        point(9.0, 11.0),
        point(5.0, 7.5),
        point(1.0, 9.0),
    ];
    let expected = check_is_clockwise(&points);
    for _ in 0..points.len() {
        points.rotate_left(1);
        assert_eq!(check_is_clockwise(&points), expected);
    }
}

#[test]
fn degenerate_winding() {
    assert_eq!(compute_winding(vec![]), None);
    assert_eq!(compute_winding(vec![point(1.0, 1.0), point(2.0, 2.0)]), None);
    assert_eq!(
        compute_winding(vec![point(0.0, 0.0), point(1.0, 1.0), point(2.0, 2.0)]),
        None
    );
}
