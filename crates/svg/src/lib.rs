#![deny(bare_trait_objects)]

//! SVG input and output for quill paths.
//!
//! This crate is reexported in [quill](https://docs.rs/quill/).
//!
//! - [`parser`] splits path data into tokens,
//! - [`builder`] turns tokens into anchors,
//! - [`import`] extracts the shapes of an SVG document,
//! - [`export`] writes paths back as path data, SVG documents or CSS masks.
//!
//! # Examples
//!
//! ```
//! use quill_svg::{parse_path, to_path_data, Identity};
//!
//! let path = parse_path("M0 0 L10 0 L10 10 Z", &Identity).unwrap();
//! assert_eq!(to_path_data(&path.build_commands()), "M0 0L10 0L10 10Z");
//! ```

pub use quill_path as path;

pub mod builder;
pub mod export;
pub mod import;
pub mod parser;
pub mod shapes;

#[doc(inline)]
pub use crate::builder::{
    append_tokens, build_path, parse_path, BuilderOptions, Identity, Normalize, PathBuilder,
};
#[doc(inline)]
pub use crate::export::{percent_encode, to_mask_css, to_path_data, to_svg};
#[doc(inline)]
pub use crate::import::{import_svg, Document, ImportError, LinearGradient};
#[doc(inline)]
pub use crate::parser::{parse_path_data, ParseError, Token};

#[cfg(test)]
fn round_trip(d: &str) -> String {
    let path = parse_path(d, &Identity).unwrap();
    to_path_data(&path.build_commands())
}

#[test]
fn line_and_cubic_round_trip() {
    for d in &[
        "M10 10L20 20C30 30 40 40 50 50Z",
        "M10 10L20 20C30 30 40 40 10 10Z",
        "M0 0C1.5 2.5 3 4 5 6L7 8M20 20L30 30",
        "M120.41 95.9L102.59 60.1C97.4 62.68 92.04 65.87 86.68 69.63C56.62 90.7 27.67 129.47 27.67 171.84Z",
    ] {
        assert_eq!(&round_trip(d), d);
    }
}

#[test]
fn round_trip_normalizes_syntax() {
    assert_eq!(round_trip("m 10,10 10,0 v 10 h -10 z"), "M10 10L20 10L20 20L10 20Z");
}
