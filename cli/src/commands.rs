use quill::math::Box2D;
use quill::path::{LineCap, LineJoin};
use std::str::FromStr;

/// Parameters of the `outline` subcommand.
///
/// Unset values are taken from the stroke of each layer, or from the default
/// outline options for layers without a stroke.
#[derive(Clone, Debug, Default)]
pub struct OutlineCmd {
    /// Full stroke thickness.
    pub width: Option<f64>,
    pub cap: Option<LineCap>,
    pub join: Option<LineJoin>,
    pub tolerance: Option<f64>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    Svg,
    Css,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormatParseError(pub String);

impl FromStr for ExportFormat {
    type Err = FormatParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "svg" => Ok(ExportFormat::Svg),
            "css" => Ok(ExportFormat::Css),
            other => Err(FormatParseError(other.to_string())),
        }
    }
}

/// Parameters of the `export` subcommand.
#[derive(Clone, Debug)]
pub struct ExportCmd {
    pub format: ExportFormat,
    /// Replaces the style of every layer with a plain fill.
    pub color: Option<String>,
    /// Defaults to the bounds of the document.
    pub view_box: Option<Box2D>,
}
