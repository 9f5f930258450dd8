use crate::{Box2D, Point, Vector};

use std::ops::Range;

/// Common APIs to segment types.
pub trait Segment: Copy + Sized {
    /// Start of the curve.
    fn from(&self) -> Point;

    /// End of the curve.
    fn to(&self) -> Point;

    /// Sample the curve at t (expecting t between 0 and 1).
    fn sample(&self, t: f64) -> Point;

    /// Sample the derivative at t (expecting t between 0 and 1).
    fn derivative(&self, t: f64) -> Vector;

    /// Split this curve into two sub-curves.
    fn split(&self, t: f64) -> (Self, Self);

    /// Return the curve before the split point.
    fn before_split(&self, t: f64) -> Self;

    /// Return the curve after the split point.
    fn after_split(&self, t: f64) -> Self;

    /// Return the curve inside a given range of t.
    ///
    /// This is equivalent splitting at the range's end points.
    fn split_range(&self, t_range: Range<f64>) -> Self;

    /// Swap the direction of the segment.
    fn flip(&self) -> Self;

    /// Returns the smallest rectangle the curve is contained in.
    fn bounding_box(&self) -> Box2D;

    /// Compute the length of the segment using a flattened approximation.
    fn approximate_length(&self, tolerance: f64) -> f64;
}
