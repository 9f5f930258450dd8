use crate::segment::Segment;
use crate::{Box2D, LineSegment, Point, Vector};
use arrayvec::ArrayVec;

use std::ops::Range;

/// A 2d curve segment defined by four points: the beginning of the segment, two control
/// points and the end of the segment.
///
/// The curve is defined by equation:
/// ```∀ t ∈ [0..1],  P(t) = (1 - t)³ * from + 3 * (1 - t)² * t * ctrl1 + 3 * t² * (1 - t) * ctrl2 + t³ * to```
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct CubicBezierSegment {
    pub from: Point,
    pub ctrl1: Point,
    pub ctrl2: Point,
    pub to: Point,
}

/// Number of samples of the first lookup table built by [`CubicBezierSegment::closest_t`].
pub const LUT_INITIAL_SAMPLES: u32 = 16;

/// Upper bound on the lookup table size, the search gives up past this.
pub const LUT_MAX_SAMPLES: u32 = 1024;

impl CubicBezierSegment {
    /// A straight line expressed as a cubic curve, control points equal to the endpoints.
    pub fn from_line(from: Point, to: Point) -> Self {
        CubicBezierSegment {
            from,
            ctrl1: from,
            ctrl2: to,
            to,
        }
    }

    /// The exact cubic representation of a quadratic bézier curve.
    pub fn from_quadratic(from: Point, ctrl: Point, to: Point) -> Self {
        CubicBezierSegment {
            from,
            ctrl1: from + (ctrl - from) * (2.0 / 3.0),
            ctrl2: to + (ctrl - to) * (2.0 / 3.0),
            to,
        }
    }

    /// Sample the curve at t (expecting t between 0 and 1).
    pub fn sample(&self, t: f64) -> Point {
        let t2 = t * t;
        let t3 = t2 * t;
        let one_t = 1.0 - t;
        let one_t2 = one_t * one_t;
        let one_t3 = one_t2 * one_t;

        self.from * one_t3
            + self.ctrl1.to_vector() * 3.0 * one_t2 * t
            + self.ctrl2.to_vector() * 3.0 * one_t * t2
            + self.to.to_vector() * t3
    }

    /// Sample the curve's derivative at t (expecting t between 0 and 1).
    pub fn derivative(&self, t: f64) -> Vector {
        let t2 = t * t;
        let c0 = -3.0 * t2 + 6.0 * t - 3.0;
        let c1 = 9.0 * t2 - 12.0 * t + 3.0;
        let c2 = -9.0 * t2 + 6.0 * t;
        let c3 = 3.0 * t2;

        self.from.to_vector() * c0
            + self.ctrl1.to_vector() * c1
            + self.ctrl2.to_vector() * c2
            + self.to.to_vector() * c3
    }

    /// Direction of the curve at t, falling back to the control polygon when the
    /// derivative vanishes (coincident control points).
    pub fn tangent(&self, t: f64) -> Option<Vector> {
        let d = self.derivative(t);
        if d.square_length() > 1e-12 {
            return Some(d);
        }

        let fallback = if t < 0.5 {
            [self.ctrl2 - self.from, self.to - self.from]
        } else {
            [self.to - self.ctrl1, self.to - self.from]
        };

        fallback.iter().copied().find(|v| v.square_length() > 1e-12)
    }

    /// Return the sub-curve inside a given range of t.
    ///
    /// This is equivalent to splitting at the range's end points.
    pub fn split_range(&self, t_range: Range<f64>) -> Self {
        let (t0, t1) = (t_range.start, t_range.end);
        let from = self.sample(t0);
        let to = self.sample(t1);

        let d = |t: f64| -> Vector {
            let a = self.ctrl1 - self.from;
            let b = self.ctrl2 - self.ctrl1;
            let c = self.to - self.ctrl2;
            let one_t = 1.0 - t;
            a * (one_t * one_t) + b * (2.0 * one_t * t) + c * (t * t)
        };

        let dt = t1 - t0;
        let ctrl1 = from + d(t0) * dt;
        let ctrl2 = to - d(t1) * dt;

        CubicBezierSegment {
            from,
            ctrl1,
            ctrl2,
            to,
        }
    }

    /// Split this curve into two sub-curves.
    pub fn split(&self, t: f64) -> (CubicBezierSegment, CubicBezierSegment) {
        let ctrl1a = self.from + (self.ctrl1 - self.from) * t;
        let ctrl2a = self.ctrl1 + (self.ctrl2 - self.ctrl1) * t;
        let ctrl1aa = ctrl1a + (ctrl2a - ctrl1a) * t;
        let ctrl3a = self.ctrl2 + (self.to - self.ctrl2) * t;
        let ctrl2aa = ctrl2a + (ctrl3a - ctrl2a) * t;
        let ctrl1aaa = ctrl1aa + (ctrl2aa - ctrl1aa) * t;

        (
            CubicBezierSegment {
                from: self.from,
                ctrl1: ctrl1a,
                ctrl2: ctrl1aa,
                to: ctrl1aaa,
            },
            CubicBezierSegment {
                from: ctrl1aaa,
                ctrl1: ctrl2aa,
                ctrl2: ctrl3a,
                to: self.to,
            },
        )
    }

    /// Return the curve before the split point.
    pub fn before_split(&self, t: f64) -> CubicBezierSegment {
        self.split(t).0
    }

    /// Return the curve after the split point.
    pub fn after_split(&self, t: f64) -> CubicBezierSegment {
        self.split(t).1
    }

    #[inline]
    pub fn baseline(&self) -> LineSegment {
        LineSegment {
            from: self.from,
            to: self.to,
        }
    }

    /// Swap the beginning and the end of the segment.
    pub fn flip(&self) -> Self {
        CubicBezierSegment {
            from: self.to,
            ctrl1: self.ctrl2,
            ctrl2: self.ctrl1,
            to: self.from,
        }
    }

    /// Returns true if the curve can be approximated with a single line segment
    /// given a tolerance threshold.
    pub fn is_linear(&self, tolerance: f64) -> bool {
        let line = self.baseline().to_line();
        if line.vector.square_length() < tolerance * tolerance {
            return (self.ctrl1 - self.from).length() <= tolerance
                && (self.ctrl2 - self.from).length() <= tolerance;
        }

        line.distance_to_point(&self.ctrl1) <= tolerance
            && line.distance_to_point(&self.ctrl2) <= tolerance
    }

    /// Applies an affine transform to the control polygon, which transforms the curve.
    pub fn transformed(&self, transform: &crate::Transform) -> Self {
        CubicBezierSegment {
            from: transform.transform_point(self.from),
            ctrl1: transform.transform_point(self.ctrl1),
            ctrl2: transform.transform_point(self.ctrl2),
            to: transform.transform_point(self.to),
        }
    }

    /// Evenly spaced samples along the curve, `count + 1` points including both ends.
    pub fn flattened_points(&self, count: u32) -> Vec<Point> {
        let count = count.max(1);
        let step = 1.0 / count as f64;
        let mut points = Vec::with_capacity(count as usize + 1);
        for i in 0..count {
            points.push(self.sample(i as f64 * step));
        }
        points.push(self.to);

        points
    }

    /// Compute the length of the segment using a flattened approximation.
    pub fn approximate_length(&self, tolerance: f64) -> f64 {
        let polygon_length = (self.ctrl1 - self.from).length()
            + (self.ctrl2 - self.ctrl1).length()
            + (self.to - self.ctrl2).length();
        let count = (polygon_length / tolerance.max(1e-3)).sqrt().ceil().max(1.0).min(512.0);
        let points = self.flattened_points(count as u32);

        points.windows(2).map(|w| (w[1] - w[0]).length()).sum()
    }

    /// Find the parameter `t` at which the curve passes closest to `target`.
    ///
    /// A lookup table of evenly spaced samples is scanned for a sample within
    /// `tolerance` of the target. Without a hit the table density doubles, up to
    /// [`LUT_MAX_SAMPLES`]. The best sample is then refined locally.
    ///
    /// Returns the parameter and the remaining distance, or `None` if no sample
    /// came within `tolerance`.
    pub fn closest_t(&self, target: Point, tolerance: f64) -> Option<(f64, f64)> {
        let mut samples = LUT_INITIAL_SAMPLES;
        loop {
            let (best_t, best_dist) = self.scan_lut(target, samples);
            if best_dist <= tolerance {
                let step = 1.0 / samples as f64;
                return Some(self.refine_t(target, best_t, step));
            }

            if samples >= LUT_MAX_SAMPLES {
                return None;
            }
            samples *= 2;
        }
    }

    fn scan_lut(&self, target: Point, samples: u32) -> (f64, f64) {
        let mut best = (0.0, f64::MAX);
        for i in 0..=samples {
            let t = i as f64 / samples as f64;
            let d = (self.sample(t) - target).length();
            if d < best.1 {
                best = (t, d);
            }
        }

        best
    }

    // Shrinking-step local search around a lookup table hit.
    fn refine_t(&self, target: Point, mut t: f64, mut step: f64) -> (f64, f64) {
        let mut dist = (self.sample(t) - target).length();
        for _ in 0..48 {
            step *= 0.5;
            for candidate in [t - step, t + step] {
                let candidate = candidate.max(0.0).min(1.0);
                let d = (self.sample(candidate) - target).length();
                if d < dist {
                    dist = d;
                    t = candidate;
                }
            }
        }

        (t, dist)
    }

    /// Intersections with a line segment, found by flattening the curve.
    ///
    /// The result is a list of `(t_curve, t_segment)` pairs ordered along the curve.
    pub fn line_segment_intersections_t(
        &self,
        segment: &LineSegment,
        samples: u32,
    ) -> ArrayVec<(f64, f64), 3> {
        let mut result = ArrayVec::new();
        let points = self.flattened_points(samples);
        let step = 1.0 / (points.len() - 1) as f64;
        for (i, w) in points.windows(2).enumerate() {
            let chord = LineSegment {
                from: w[0],
                to: w[1],
            };
            if let Some((tc, ts)) = chord.intersection_t(segment) {
                if result.is_full() {
                    break;
                }
                result.push(((i as f64 + tc) * step, ts));
            }
        }

        result
    }

    /// Returns the smallest rectangle the curve is contained in.
    pub fn bounding_box(&self) -> Box2D {
        let mut min = Point::min(self.from, self.to);
        let mut max = Point::max(self.from, self.to);

        let mut include = |t: f64| {
            if t > 0.0 && t < 1.0 {
                let p = self.sample(t);
                min = Point::min(min, p);
                max = Point::max(max, p);
            }
        };

        for t in extremum_t(self.from.x, self.ctrl1.x, self.ctrl2.x, self.to.x) {
            include(t);
        }
        for t in extremum_t(self.from.y, self.ctrl1.y, self.ctrl2.y, self.to.y) {
            include(t);
        }

        Box2D { min, max }
    }
}

// Roots of the derivative of a one-dimensional cubic bézier.
fn extremum_t(p0: f64, p1: f64, p2: f64, p3: f64) -> ArrayVec<f64, 2> {
    let mut result = ArrayVec::new();

    let a = 3.0 * (-p0 + 3.0 * p1 - 3.0 * p2 + p3);
    let b = 6.0 * (p0 - 2.0 * p1 + p2);
    let c = 3.0 * (p1 - p0);

    if a.abs() < 1e-12 {
        if b.abs() > 1e-12 {
            result.push(-c / b);
        }
        return result;
    }

    let delta = b * b - 4.0 * a * c;
    if delta < 0.0 {
        return result;
    }

    let sqrt_delta = delta.sqrt();
    result.push((-b - sqrt_delta) / (2.0 * a));
    result.push((-b + sqrt_delta) / (2.0 * a));

    result
}

impl Segment for CubicBezierSegment {
    fn from(&self) -> Point {
        self.from
    }

    fn to(&self) -> Point {
        self.to
    }

    fn sample(&self, t: f64) -> Point {
        self.sample(t)
    }

    fn derivative(&self, t: f64) -> Vector {
        self.derivative(t)
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

    fn approximate_length(&self, tolerance: f64) -> f64 {
        self.approximate_length(tolerance)
    }
}

#[cfg(test)]
use crate::point;
#[cfg(test)]
use crate::utils::fuzzy_eq_point;

#[test]
fn split_and_sample() {
    let curve = CubicBezierSegment {
        from: point(0.0, 0.0),
        ctrl1: point(0.0, 100.0),
        ctrl2: point(100.0, 100.0),
        to: point(100.0, 0.0),
    };

    let (a, b) = curve.split(0.5);
    assert!(fuzzy_eq_point(a.to, curve.sample(0.5), 1e-9));
    assert!(fuzzy_eq_point(b.from, curve.sample(0.5), 1e-9));
    assert!(fuzzy_eq_point(a.sample(0.5), curve.sample(0.25), 1e-9));
    assert!(fuzzy_eq_point(b.sample(0.5), curve.sample(0.75), 1e-9));

    let mid = curve.split_range(0.25..0.75);
    assert!(fuzzy_eq_point(mid.from, curve.sample(0.25), 1e-9));
    assert!(fuzzy_eq_point(mid.to, curve.sample(0.75), 1e-9));
    assert!(fuzzy_eq_point(mid.sample(0.5), curve.sample(0.5), 1e-9));
}

#[test]
fn bounding_box_includes_extrema() {
    let curve = CubicBezierSegment {
        from: point(0.0, 0.0),
        ctrl1: point(0.0, 100.0),
        ctrl2: point(100.0, 100.0),
        to: point(100.0, 0.0),
    };

    let bb = curve.bounding_box();
    assert_eq!(bb.min, point(0.0, 0.0));
    assert!((bb.max.y - 75.0).abs() < 1e-9);
    assert_eq!(bb.max.x, 100.0);
}

#[test]
fn closest_t_finds_sampled_point() {
    let curve = CubicBezierSegment {
        from: point(0.0, 0.0),
        ctrl1: point(10.0, 40.0),
        ctrl2: point(60.0, 40.0),
        to: point(80.0, 0.0),
    };

    let target = curve.sample(0.3141);
    let (t, dist) = curve.closest_t(target, 1.0).unwrap();
    assert!((t - 0.3141).abs() < 1e-6);
    assert!(dist < 1e-6);

    assert!(curve.closest_t(point(500.0, 500.0), 1.0).is_none());
}

#[test]
fn quadratic_elevation() {
    let curve = CubicBezierSegment::from_quadratic(
        point(0.0, 0.0),
        point(50.0, 100.0),
        point(100.0, 0.0),
    );
    // A quadratic peaks at half the control point height.
    assert!(fuzzy_eq_point(curve.sample(0.5), point(50.0, 50.0), 1e-9));
}

#[test]
fn line_segment_intersections() {
    let curve = CubicBezierSegment {
        from: point(0.0, 0.0),
        ctrl1: point(0.0, 100.0),
        ctrl2: point(100.0, 100.0),
        to: point(100.0, 0.0),
    };
    let line = LineSegment {
        from: point(-10.0, 50.0),
        to: point(110.0, 50.0),
    };

    let hits = curve.line_segment_intersections_t(&line, 64);
    assert_eq!(hits.len(), 2);
    for &(t, _) in &hits {
        assert!((curve.sample(t).y - 50.0).abs() < 1.0);
    }
    assert!(hits[0].0 < hits[1].0);
}

#[test]
fn linear_detection() {
    let line = CubicBezierSegment::from_line(point(0.0, 0.0), point(10.0, 10.0));
    assert!(line.is_linear(0.01));
    assert!((line.approximate_length(0.01) - 200f64.sqrt()).abs() < 1e-6);
}
