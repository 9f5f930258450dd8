#![deny(bare_trait_objects)]
#![deny(unconditional_recursion)]
#![allow(clippy::match_like_matches_macro)]

//! Data structures to edit vector paths made of anchors and handles.
//!
//! This crate is reexported in [quill](https://docs.rs/quill/).
//!
//! A [`Path`] owns every [`Anchor`] of an editing session and groups them into
//! subpaths. Anchors carry optional `from`/`to` control handles and a
//! [`MirrorMode`] constraint which is restored after each edit. Paths are turned
//! into [`DrawCommand`]s for rendering and export.
//!
//! # Examples
//!
//! ```
//! use quill_path::{Anchor, Handle, MirrorMode, Path};
//! use quill_path::math::point;
//!
//! let mut path = Path::new();
//! let (subpath, _) = path.begin_subpath(point(0.0, 0.0));
//! let anchor = path.append_anchor(subpath, Anchor::new(point(10.0, 10.0))).unwrap();
//!
//! path.set_mirror(anchor, MirrorMode::MirrorAngleAndLength);
//! path.set_handle(anchor, Handle::From, point(5.0, 10.0));
//! assert_eq!(path[anchor].to, Some(point(15.0, 10.0)));
//!
//! for command in path.build_commands() {
//!     println!("{} {:?}", command.kind, command.args);
//! }
//! ```

pub use quill_geom as geom;

#[cfg(feature = "serialization")]
#[macro_use]
pub extern crate serde;

pub mod anchor;
pub mod commands;
pub mod path;
pub mod style;
pub mod winding;

#[doc(inline)]
pub use crate::anchor::{Anchor, ArcAnnotation, Handle, MirrorMode};
#[doc(inline)]
pub use crate::commands::{CommandKind, DrawCommand};
pub use crate::geom::ArcFlags;
#[doc(inline)]
pub use crate::path::{Path, Subpath};
#[doc(inline)]
pub use crate::style::{Composite, Fill, Layer, LineCap, LineJoin, Stroke, Style};

use std::fmt;
use std::u32;

pub mod math {
    //! The `quill_geom` types used everywhere, reexported for convenience.

    pub use crate::geom::{point, vector, Angle, Box2D, Point, Transform, Vector};
}

/// The two possible orientations of a closed subpath.
///
/// With the y axis pointing down, `Positive` is clockwise on screen.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum Winding {
    Positive,
    Negative,
}

impl Winding {
    #[inline]
    pub fn is_clockwise(self) -> bool {
        self == Winding::Positive
    }
}

/// ID of an anchor in a path.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct AnchorId(pub u32);

impl AnchorId {
    pub const INVALID: Self = AnchorId(u32::MAX);
    pub fn to_usize(self) -> usize {
        self.0 as usize
    }
    pub fn from_usize(val: usize) -> Self {
        AnchorId(val as u32)
    }
}

impl fmt::Debug for AnchorId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// ID of a subpath in a path.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct SubpathId(pub u32);

impl SubpathId {
    pub const INVALID: Self = SubpathId(u32::MAX);
    pub fn to_usize(self) -> usize {
        self.0 as usize
    }
    pub fn from_usize(val: usize) -> Self {
        SubpathId(val as u32)
    }
}

impl fmt::Debug for SubpathId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "subpath#{}", self.0)
    }
}
