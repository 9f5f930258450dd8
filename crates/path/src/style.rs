//! Presentation attributes of a path.

use crate::commands::DrawCommand;
use crate::path::Path;

use std::fmt;
use std::str::FromStr;

/// Line cap as defined by the SVG specification.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum LineCap {
    /// The stroke for each sub-path does not extend beyond its two endpoints.
    Butt,
    /// Half circle around the endpoint.
    Round,
    /// Extends the stroke by half its thickness.
    Square,
}

impl Default for LineCap {
    fn default() -> Self {
        LineCap::Butt
    }
}

/// Line join as defined by the SVG specification.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum LineJoin {
    /// A sharp corner is to be used to join path segments.
    Miter,
    /// A round corner is to be used to join path segments.
    Round,
    /// A bevelled corner is to be used to join path segments.
    /// The bevel shape is a triangle that fills the area between the two stroked
    /// segments.
    Bevel,
}

impl Default for LineJoin {
    fn default() -> Self {
        LineJoin::Miter
    }
}

/// How a layer is composited over the layers below it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum Composite {
    SourceOver,
    /// The layer punches a hole in the layers below.
    DestinationOut,
}

impl Default for Composite {
    fn default() -> Self {
        Composite::SourceOver
    }
}

/// Error returned when parsing an unknown keyword.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownKeyword(pub String);

impl fmt::Display for UnknownKeyword {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "unknown keyword {:?}", self.0)
    }
}

impl std::error::Error for UnknownKeyword {}

macro_rules! keywords {
    ($ty:ident { $($name:literal => $variant:ident,)* }) => {
        impl $ty {
            /// The SVG attribute value.
            pub fn as_str(self) -> &'static str {
                match self {
                    $($ty::$variant => $name,)*
                }
            }
        }

        impl FromStr for $ty {
            type Err = UnknownKeyword;
            fn from_str(s: &str) -> Result<Self, UnknownKeyword> {
                match s.trim() {
                    $($name => Ok($ty::$variant),)*
                    other => Err(UnknownKeyword(other.to_string())),
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

keywords!(LineCap {
    "butt" => Butt,
    "round" => Round,
    "square" => Square,
});

keywords!(LineJoin {
    "miter" => Miter,
    "round" => Round,
    "bevel" => Bevel,
});

keywords!(Composite {
    "source-over" => SourceOver,
    "destination-out" => DestinationOut,
});

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct Fill {
    pub enabled: bool,
    pub color: String,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct Stroke {
    pub enabled: bool,
    pub color: String,
    /// Full stroke thickness, as in SVG's `stroke-width`.
    pub width: f64,
    pub start_cap: LineCap,
    pub end_cap: LineCap,
    pub join: LineJoin,
}

impl Stroke {
    pub const DEFAULT_WIDTH: f64 = 1.0;

    pub fn new(color: &str, width: f64) -> Self {
        Stroke {
            enabled: true,
            color: color.to_string(),
            width,
            start_cap: LineCap::default(),
            end_cap: LineCap::default(),
            join: LineJoin::default(),
        }
    }

    pub fn with_caps(mut self, cap: LineCap) -> Self {
        self.start_cap = cap;
        self.end_cap = cap;
        self
    }

    pub fn with_join(mut self, join: LineJoin) -> Self {
        self.join = join;
        self
    }
}

/// Fill and stroke of a layer.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct Style {
    pub fill: Option<Fill>,
    pub stroke: Option<Stroke>,
    pub composite: Composite,
}

impl Style {
    pub fn filled(color: &str) -> Self {
        Style {
            fill: Some(Fill {
                enabled: true,
                color: color.to_string(),
            }),
            stroke: None,
            composite: Composite::SourceOver,
        }
    }

    pub fn stroked(stroke: Stroke) -> Self {
        Style {
            fill: None,
            stroke: Some(stroke),
            composite: Composite::SourceOver,
        }
    }

    /// The fill, if it is enabled.
    pub fn active_fill(&self) -> Option<&Fill> {
        self.fill.as_ref().filter(|fill| fill.enabled)
    }

    /// The stroke, if it is enabled.
    pub fn active_stroke(&self) -> Option<&Stroke> {
        self.stroke.as_ref().filter(|stroke| stroke.enabled)
    }
}

/// A path and its style: the unit the outline builder and the exporters work on.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct Layer {
    pub path: Path,
    pub style: Style,
}

impl Layer {
    pub fn new(path: Path, style: Style) -> Self {
        Layer { path, style }
    }

    pub fn build_commands(&self) -> Vec<DrawCommand> {
        self.path.build_commands()
    }
}

#[test]
fn keywords_round_trip() {
    assert_eq!("round".parse::<LineCap>(), Ok(LineCap::Round));
    assert_eq!(" bevel ".parse::<LineJoin>(), Ok(LineJoin::Bevel));
    assert_eq!(
        "destination-out".parse::<Composite>(),
        Ok(Composite::DestinationOut)
    );
    assert_eq!(
        "triangle".parse::<LineCap>(),
        Err(UnknownKeyword("triangle".to_string()))
    );
    assert_eq!(LineJoin::Miter.to_string(), "miter");
}

#[test]
fn active_paint() {
    let mut style = Style::stroked(Stroke::new("#000", 2.0).with_caps(LineCap::Round));
    assert!(style.active_fill().is_none());
    assert_eq!(style.active_stroke().map(|s| s.end_cap), Some(LineCap::Round));

    style.stroke.as_mut().unwrap().enabled = false;
    assert!(style.active_stroke().is_none());
}
