use crate::segment::Segment;
use crate::utils::min_max;
use crate::{point, Box2D, Point, Vector};

use std::ops::Range;

/// A linear segment.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct LineSegment {
    pub from: Point,
    pub to: Point,
}

impl LineSegment {
    /// Sample the segment at t (expecting t between 0 and 1).
    #[inline]
    pub fn sample(&self, t: f64) -> Point {
        self.from.lerp(self.to, t)
    }

    #[inline]
    pub fn from(&self) -> Point {
        self.from
    }

    #[inline]
    pub fn to(&self) -> Point {
        self.to
    }

    /// Returns an inverted version of this segment where the beginning and the end
    /// points are swapped.
    #[inline]
    pub fn flip(&self) -> Self {
        LineSegment {
            from: self.to,
            to: self.from,
        }
    }

    /// Return the sub-segment inside a given range of t.
    ///
    /// This is equivalent to splitting at the range's end points.
    pub fn split_range(&self, t_range: Range<f64>) -> Self {
        LineSegment {
            from: self.from.lerp(self.to, t_range.start),
            to: self.from.lerp(self.to, t_range.end),
        }
    }

    /// Split this curve into two sub-segments.
    #[inline]
    pub fn split(&self, t: f64) -> (Self, Self) {
        let split_point = self.sample(t);

        (
            LineSegment {
                from: self.from,
                to: split_point,
            },
            LineSegment {
                from: split_point,
                to: self.to,
            },
        )
    }

    /// Return the segment before the split point.
    #[inline]
    pub fn before_split(&self, t: f64) -> Self {
        LineSegment {
            from: self.from,
            to: self.sample(t),
        }
    }

    /// Return the segment after the split point.
    #[inline]
    pub fn after_split(&self, t: f64) -> Self {
        LineSegment {
            from: self.sample(t),
            to: self.to,
        }
    }

    /// Return the smallest rectangle containing this segment.
    #[inline]
    pub fn bounding_box(&self) -> Box2D {
        let (min_x, max_x) = min_max(self.from.x, self.to.x);
        let (min_y, max_y) = min_max(self.from.y, self.to.y);

        Box2D {
            min: point(min_x, min_y),
            max: point(max_x, max_y),
        }
    }

    /// Returns the vector between this segment's `from` and `to` points.
    #[inline]
    pub fn to_vector(&self) -> Vector {
        self.to - self.from
    }

    /// Returns the line containing this segment.
    #[inline]
    pub fn to_line(&self) -> Line {
        Line {
            point: self.from,
            vector: self.to - self.from,
        }
    }

    /// Computes the length of this segment.
    #[inline]
    pub fn length(&self) -> f64 {
        self.to_vector().length()
    }

    /// Computes the squared length of this segment.
    #[inline]
    pub fn square_length(&self) -> f64 {
        self.to_vector().square_length()
    }

    /// Translate this segment by `by`.
    #[inline]
    pub fn translate(&self, by: Vector) -> Self {
        LineSegment {
            from: self.from + by,
            to: self.to + by,
        }
    }

    /// Computes the intersection (if any) between this segment and another one.
    ///
    /// The result is provided in the form of the `t` parameter of each
    /// segment. To get the intersection point, sample one of the segments
    /// at the corresponding value.
    ///
    /// Segments touching at a shared endpoint and overlapping segments are not
    /// considered to intersect.
    pub fn intersection_t(&self, other: &Self) -> Option<(f64, f64)> {
        if self.to == other.to
            || self.from == other.from
            || self.from == other.to
            || self.to == other.from
        {
            return None;
        }

        let v1 = self.to_vector();
        let v2 = other.to_vector();

        let v1_cross_v2 = v1.cross(v2);

        if v1_cross_v2 == 0.0 {
            // The segments are parallel
            return None;
        }

        let sign_v1_cross_v2 = v1_cross_v2.signum();
        let abs_v1_cross_v2 = v1_cross_v2.abs();

        let v3 = other.from - self.from;

        // t and u should be divided by v1_cross_v2, but we postpone that to not lose precision.
        let t = v3.cross(v2) * sign_v1_cross_v2;
        let u = v3.cross(v1) * sign_v1_cross_v2;

        if t < 0.0 || t > abs_v1_cross_v2 || u < 0.0 || u > abs_v1_cross_v2 {
            return None;
        }

        Some((t / abs_v1_cross_v2, u / abs_v1_cross_v2))
    }

    #[inline]
    pub fn intersection(&self, other: &Self) -> Option<Point> {
        self.intersection_t(other).map(|(t, _)| self.sample(t))
    }

    #[inline]
    pub fn intersects(&self, other: &Self) -> bool {
        self.intersection_t(other).is_some()
    }

    /// Distance between this segment and a point.
    pub fn distance_to_point(&self, p: Point) -> f64 {
        (self.closest_point(p) - p).length()
    }

    /// Closest point on this segment to `p`.
    pub fn closest_point(&self, p: Point) -> Point {
        let v1 = self.to - self.from;
        let square_len = v1.square_length();
        if square_len == 0.0 {
            return self.from;
        }

        let t = ((p - self.from).dot(v1) / square_len).max(0.0).min(1.0);

        self.sample(t)
    }
}

impl Segment for LineSegment {
    fn from(&self) -> Point {
        self.from
    }

    fn to(&self) -> Point {
        self.to
    }

    fn sample(&self, t: f64) -> Point {
        self.sample(t)
    }

    fn derivative(&self, _t: f64) -> Vector {
        self.to_vector()
    }

    fn split(&self, t: f64) -> (Self, Self) {
        self.split(t)
    }

    fn before_split(&self, t: f64) -> Self {
        self.before_split(t)
    }

    fn after_split(&self, t: f64) -> Self {
        self.after_split(t)
    }

    fn split_range(&self, t_range: Range<f64>) -> Self {
        self.split_range(t_range)
    }

    fn flip(&self) -> Self {
        self.flip()
    }

    fn bounding_box(&self) -> Box2D {
        self.bounding_box()
    }

    fn approximate_length(&self, _tolerance: f64) -> f64 {
        self.length()
    }
}

/// An infinite line defined by a point and a vector.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct Line {
    pub point: Point,
    pub vector: Vector,
}

impl Line {
    /// Intersection of two infinite lines, `None` if they are parallel.
    pub fn intersection(&self, other: &Self) -> Option<Point> {
        let det = self.vector.cross(other.vector);
        if det.abs() <= f64::EPSILON {
            // The lines are parallel
            return None;
        }

        let t = (other.point - self.point).cross(other.vector) / det;

        Some(self.point + self.vector * t)
    }

    pub fn signed_distance_to_point(&self, p: &Point) -> f64 {
        let v = *p - self.point;
        self.vector.cross(v) / self.vector.length()
    }

    pub fn distance_to_point(&self, p: &Point) -> f64 {
        self.signed_distance_to_point(p).abs()
    }
}

#[cfg(test)]
use crate::utils::fuzzy_eq_point;

#[test]
fn intersection_rotated() {
    use std::f64::consts::PI;
    let epsilon = 0.0001;
    let count: u32 = 100;

    for i in 0..count {
        for j in 0..count {
            if i % (count / 2) == j % (count / 2) {
                // avoid the colinear case.
                continue;
            }

            let angle1 = i as f64 / (count as f64) * 2.0 * PI;
            let angle2 = j as f64 / (count as f64) * 2.0 * PI;

            let l1 = LineSegment {
                from: point(10.0 * angle1.cos(), 10.0 * angle1.sin()),
                to: point(-10.0 * angle1.cos(), -10.0 * angle1.sin()),
            };

            let l2 = LineSegment {
                from: point(10.0 * angle2.cos(), 10.0 * angle2.sin()),
                to: point(-10.0 * angle2.cos(), -10.0 * angle2.sin()),
            };

            assert!(l1.intersects(&l2));

            assert!(fuzzy_eq_point(
                l1.sample(l1.intersection_t(&l2).unwrap().0),
                point(0.0, 0.0),
                epsilon
            ));

            assert!(fuzzy_eq_point(
                l2.sample(l1.intersection_t(&l2).unwrap().1),
                point(0.0, 0.0),
                epsilon
            ));
        }
    }
}

#[test]
fn intersection_touching() {
    let l1 = LineSegment {
        from: point(0.0, 0.0),
        to: point(10.0, 10.0),
    };

    let l2 = LineSegment {
        from: point(10.0, 10.0),
        to: point(10.0, 0.0),
    };

    assert!(!l1.intersects(&l2));
    assert!(l1.intersection(&l2).is_none());
}

#[test]
fn intersection_overlap() {
    // Overlapping segments intersect along a region rather than at a point,
    // the outline builder has no use for that so they are treated as disjoint.
    let l1 = LineSegment {
        from: point(0.0, 0.0),
        to: point(10.0, 0.0),
    };

    let l2 = LineSegment {
        from: point(5.0, 0.0),
        to: point(15.0, 0.0),
    };

    assert!(!l1.intersects(&l2));
    assert!(l1.intersection(&l2).is_none());
}

#[test]
fn line_intersection() {
    let l1 = Line {
        point: point(0.0, 1.0),
        vector: Vector::new(1.0, 0.0),
    };
    let l2 = Line {
        point: point(3.0, -5.0),
        vector: Vector::new(0.0, 2.0),
    };
    assert_eq!(l1.intersection(&l2), Some(point(3.0, 1.0)));

    let l3 = Line {
        point: point(0.0, 4.0),
        vector: Vector::new(-2.0, 0.0),
    };
    assert_eq!(l1.intersection(&l3), None);
    assert_eq!(l1.distance_to_point(&point(7.0, 4.0)), 3.0);
}

#[test]
fn bounding_box() {
    let l1 = LineSegment {
        from: point(5.0, 5.0),
        to: point(1.0, 1.0),
    };
    let r1 = Box2D {
        min: point(1.0, 1.0),
        max: point(5.0, 5.0),
    };

    assert_eq!(l1.bounding_box(), r1);
}

#[test]
fn closest_point() {
    let l = LineSegment {
        from: point(0.0, 0.0),
        to: point(10.0, 0.0),
    };
    assert_eq!(l.closest_point(point(4.0, 3.0)), point(4.0, 0.0));
    assert_eq!(l.closest_point(point(-4.0, 3.0)), point(0.0, 0.0));
    assert_eq!(l.distance_to_point(point(13.0, 4.0)), 5.0);
}
