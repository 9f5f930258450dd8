#![deny(bare_trait_objects)]

//! Editing, import and export of 2D vector paths.
//!
//! # Crates
//!
//! This meta-crate (`quill`) reexports the following sub-crates for convenience:
//!
//! * **quill_geom** - Line segments, cubic bézier curves and circular arcs.
//! * **quill_path** - Paths made of anchors with mirrored handles, and the
//!   drawing commands they produce.
//! * **quill_svg** - SVG path data parsing, shape import and SVG/CSS export.
//! * **quill_stroke** - Fillable outlines of stroked paths.
//!
//! Each `quill_<name>` crate is reexported as a `<name>` module in `quill`. For example:
//!
//! ```ignore
//! extern crate quill_stroke;
//! use quill_stroke::OutlineOptions;
//! ```
//!
//! Is equivalent to:
//!
//! ```ignore
//! extern crate quill;
//! use quill::stroke::OutlineOptions;
//! ```
//!
//! # Feature flags
//!
//! serialization using serde can be enabled on each crate using the
//! `serialization` feature flag (disabled by default).
//!
//! The `svg` feature (enabled by default) pulls in `quill_svg`.
//!
//! # Examples
//!
//! ## From path data to a filled outline
//!
//! ```
//! use quill::path::{LineCap, Stroke};
//! use quill::stroke::{outline_path, outline_to_path, OutlineOptions};
//! use quill::svg::{parse_path, to_path_data, Identity};
//!
//! // Parse some path data into anchors.
//! let path = parse_path("M10 10L90 10C90 50 50 90 10 90", &Identity).unwrap();
//! assert_eq!(path.num_anchors(), 3);
//!
//! // Turn a 4 units wide stroke of the path into a shape that can be filled.
//! let stroke = Stroke::new("black", 4.0).with_caps(LineCap::Round);
//! let outline = outline_path(&path, &OutlineOptions::from_stroke(&stroke));
//! let filled = outline_to_path(&outline);
//!
//! println!("{}", to_path_data(&filled.build_commands()));
//! ```
//!
//! ## Editing anchors
//!
//! ```
//! use quill::math::point;
//! use quill::path::{Anchor, Handle, MirrorMode, Path};
//!
//! let mut path = Path::new();
//! let (subpath, _) = path.begin_subpath(point(0.0, 0.0));
//! let anchor = path.append_anchor(subpath, Anchor::new(point(50.0, 0.0))).unwrap();
//! path.append_anchor(subpath, Anchor::new(point(100.0, 0.0)));
//!
//! // Dragging one handle of a mirrored anchor moves the other one.
//! path.set_mirror(anchor, MirrorMode::MirrorAngleAndLength);
//! path.set_handle(anchor, Handle::To, point(60.0, -10.0));
//! assert_eq!(path[anchor].from, Some(point(40.0, 10.0)));
//! ```

pub extern crate quill_stroke;
#[cfg(feature = "svg")]
pub extern crate quill_svg;

pub use quill_stroke as stroke;
#[cfg(feature = "svg")]
pub use quill_svg as svg;
pub use stroke::path;
pub use path::geom;

pub use path::math;
