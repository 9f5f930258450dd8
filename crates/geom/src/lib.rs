#![deny(bare_trait_objects)]
#![deny(unconditional_recursion)]
#![allow(clippy::excessive_precision)]
#![allow(clippy::many_single_char_names)]

//! Simple 2D geometric primitives on top of euclid.
//!
//! This crate is reexported in [quill](https://docs.rs/quill/).
//!
//! # Overview.
//!
//! This crate implements the maths the quill editor needs to work with:
//!
//! - line segments and infinite lines,
//! - cubic bézier curves,
//! - circular and elliptic arcs, converted into chains of cubic bézier curves.
//!
//! All coordinates are `f64`. The y axis points downwards, as in SVG: a positive
//! angle turns clockwise on screen.
//!
//! # Arcs
//!
//! SVG arcs are described by their endpoints, radii, a rotation and two flags.
//! [`arc::arc_to_cubics`] finds the circle center matching the flags, tiles the
//! full circle with four cubic quadrants using the usual `0.5522847498` magic
//! constant and keeps the pieces that cover the requested span. Ellipses are
//! handled by scaling one axis before the conversion and scaling back afterwards.

// Reexport dependencies.
pub use arrayvec;
pub use euclid;

#[cfg(feature = "serialization")]
#[macro_use]
pub extern crate serde;

mod segment;
pub mod arc;
pub mod cubic_bezier;
mod line;
pub mod utils;

#[doc(inline)]
pub use crate::arc::{arc_to_cubics, ArcFlags, SvgArc};
#[doc(inline)]
pub use crate::cubic_bezier::CubicBezierSegment;
#[doc(inline)]
pub use crate::line::{Line, LineSegment};
#[doc(inline)]
pub use crate::segment::Segment;

/// Alias for `euclid::default::Point2D<f64>`.
pub type Point = euclid::default::Point2D<f64>;

/// Alias for `euclid::default::Vector2D<f64>`.
pub type Vector = euclid::default::Vector2D<f64>;

/// Alias for `euclid::default::Box2D<f64>`.
pub type Box2D = euclid::default::Box2D<f64>;

/// Alias for `euclid::default::Transform2D<f64>`.
pub type Transform = euclid::default::Transform2D<f64>;

/// An angle in radians.
pub type Angle = euclid::Angle<f64>;

/// Shorthand for `Vector::new(x, y)`.
#[inline]
pub fn vector(x: f64, y: f64) -> Vector {
    Vector::new(x, y)
}

/// Shorthand for `Point::new(x, y)`.
#[inline]
pub fn point(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

/// Tolerance used when comparing coordinates produced by the editor.
///
/// Coordinates are usually rounded to a couple of decimals so anything below
/// this threshold is considered equal.
pub const EPSILON: f64 = 1e-6;
