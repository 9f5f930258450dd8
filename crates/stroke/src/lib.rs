#![deny(bare_trait_objects)]
#![deny(unconditional_recursion)]

//! Outlines of stroked paths.
//!
//! This crate is reexported in [quill](https://docs.rs/quill/).
//!
//! A stroke is turned into a closed shape that can be filled: each segment of
//! the centerline is offset by the half stroke width on both sides, the two
//! rails are trimmed or joined where segments meet, and caps close the ends of
//! open subpaths.
//!
//! # Examples
//!
//! ```
//! use quill_stroke::{outline_path, outline_to_path, OutlineOptions};
//! use quill_stroke::path::{Anchor, Path, LineCap};
//! use quill_stroke::path::math::point;
//!
//! let mut path = Path::new();
//! let (subpath, _) = path.begin_subpath(point(0.0, 0.0));
//! path.append_anchor(subpath, Anchor::new(point(100.0, 0.0)));
//!
//! let options = OutlineOptions::width(5.0).with_line_cap(LineCap::Round);
//! let contours = outline_path(&path, &options);
//! assert_eq!(contours.len(), 1);
//!
//! let filled = outline_to_path(&contours);
//! assert_eq!(filled.num_subpaths(), 1);
//! ```

pub use quill_path as path;

#[cfg(feature = "serialization")]
#[macro_use]
pub extern crate serde;

mod curve;
mod offset;
mod options;
mod outline;

#[doc(inline)]
pub use crate::curve::{CurveSegment, OutlineCurve, RailRole};
#[doc(inline)]
pub use crate::offset::offset_cubic;
#[doc(inline)]
pub use crate::options::OutlineOptions;
#[doc(inline)]
pub use crate::outline::{build_outline, outline_path, outline_to_path, Contour};

use quill_path::Layer;

/// Outline of the stroke of a layer.
///
/// Empty if the layer has no enabled stroke.
pub fn outline_layer(layer: &Layer) -> Vec<Contour> {
    match layer.style.active_stroke() {
        Some(stroke) => outline_path(&layer.path, &OutlineOptions::from_stroke(stroke)),
        None => Vec::new(),
    }
}

#[cfg(test)]
use quill_path::math::point;
#[cfg(test)]
use quill_path::{Anchor, Path, Stroke, Style};

#[test]
fn layer_outline() {
    let mut path = Path::new();
    let (subpath, _) = path.begin_subpath(point(0.0, 0.0));
    path.append_anchor(subpath, Anchor::new(point(10.0, 0.0)));

    let layer = Layer::new(path.clone(), Style::filled("red"));
    assert!(outline_layer(&layer).is_empty());

    let layer = Layer::new(path, Style::stroked(Stroke::new("red", 4.0)));
    let outline = outline_to_path(&outline_layer(&layer));
    let bounds = outline.bounding_box().unwrap();
    assert!((bounds.height() - 4.0).abs() < 1e-9);
}

#[test]
fn hidden_anchors_are_ignored() {
    let mut path = Path::new();
    let (subpath, _) = path.begin_subpath(point(0.0, 0.0));
    path.append_anchor(subpath, Anchor::new(point(10.0, 0.0)));
    let preview = path.append_anchor(subpath, Anchor::new(point(10.0, 50.0))).unwrap();
    path.set_virtual(preview, true);

    let outline = outline_to_path(&outline_path(&path, &OutlineOptions::width(1.0)));
    let bounds = outline.bounding_box().unwrap();
    assert!((bounds.max.y - 1.0).abs() < 1e-9);
}
