//! Import of SVG documents through attribute scanning.
//!
//! This is not an XML parser: elements and their `name="value"` attributes are
//! picked out with regular expressions, which is enough for the icon files the
//! editor deals with. Group inheritance, transforms and CSS stylesheets are
//! ignored.

use crate::builder::{append_tokens, Normalize};
use crate::parser::{parse_path_data, ParseError};
use crate::shapes::{append_circle, append_ellipse, append_polygon, append_rect};
use quill_path::math::{point, Box2D, Point, Vector};
use quill_path::{Fill, Layer, LineCap, LineJoin, Path, Stroke, Style};

use regex::Regex;
use std::collections::HashMap;
use thiserror::Error;

#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Invalid path data in shape {index}: {source}")]
    Path { index: usize, source: ParseError },
    #[error("No <svg> element found.")]
    MissingRoot,
    #[error("Invalid value {value:?} for attribute {name:?} of <{element}>.")]
    InvalidAttribute {
        element: String,
        name: String,
        value: String,
    },
    #[error(transparent)]
    Pattern(#[from] regex::Error),
}

pub const DEFAULT_FILL: &str = "#000000";

#[derive(Clone, Debug, PartialEq)]
pub struct GradientStop {
    /// Between 0 and 1.
    pub offset: f64,
    pub color: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LinearGradient {
    pub id: String,
    pub start: Point,
    pub end: Point,
    pub stops: Vec<GradientStop>,
}

/// The content of an imported SVG document.
#[derive(Clone, Debug, Default)]
pub struct Document {
    pub view_box: Option<Box2D>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    /// One layer per shape, in document order.
    pub layers: Vec<Layer>,
    pub gradients: Vec<LinearGradient>,
}

impl Document {
    /// The view box, or the area defined by the width and height attributes.
    pub fn bounds(&self) -> Option<Box2D> {
        if let Some(view_box) = self.view_box {
            return Some(view_box);
        }
        match (self.width, self.height) {
            (Some(w), Some(h)) => Some(Box2D {
                min: point(0.0, 0.0),
                max: point(w, h),
            }),
            _ => None,
        }
    }
}

type Attributes = HashMap<String, String>;

struct Scanner {
    element: Regex,
    attribute: Regex,
    number: Regex,
}

impl Scanner {
    fn new() -> Result<Self, regex::Error> {
        Ok(Scanner {
            element: Regex::new(r"<\s*(/?)\s*([A-Za-z][\w:.-]*)([^>]*)>")?,
            attribute: Regex::new(r#"([A-Za-z_:][\w:.-]*)\s*=\s*(?:"([^"]*)"|'([^']*)')"#)?,
            number: Regex::new(r"[-+]?(?:\d+\.?\d*|\.\d+)(?:[eE][-+]?\d+)?")?,
        })
    }

    fn attributes(&self, src: &str) -> Attributes {
        let mut attributes = Attributes::new();
        for caps in self.attribute.captures_iter(src) {
            let value = caps.get(2).or_else(|| caps.get(3)).map_or("", |m| m.as_str());
            attributes.insert(caps[1].to_string(), value.to_string());
        }

        // Inline style declarations win over presentation attributes.
        if let Some(style) = attributes.get("style").cloned() {
            for declaration in style.split(';') {
                let mut parts = declaration.splitn(2, ':');
                if let (Some(name), Some(value)) = (parts.next(), parts.next()) {
                    attributes.insert(name.trim().to_string(), value.trim().to_string());
                }
            }
        }

        attributes
    }

    fn numbers(&self, src: &str) -> Vec<f64> {
        self.number
            .find_iter(src)
            .filter_map(|m| m.as_str().parse().ok())
            .collect()
    }
}

// Typed access to the attributes of one element.
struct Element<'l> {
    name: &'l str,
    attributes: Attributes,
}

impl<'l> Element<'l> {
    fn get(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(|s| s.trim())
    }

    fn invalid(&self, name: &str, value: &str) -> ImportError {
        ImportError::InvalidAttribute {
            element: self.name.to_string(),
            name: name.to_string(),
            value: value.to_string(),
        }
    }

    fn number(&self, name: &str) -> Result<Option<f64>, ImportError> {
        let value = match self.get(name) {
            Some(value) => value,
            None => return Ok(None),
        };
        let digits = value.trim_end_matches("px").trim();
        match digits.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(Some(v)),
            _ => Err(self.invalid(name, value)),
        }
    }

    fn number_or(&self, name: &str, default: f64) -> Result<f64, ImportError> {
        Ok(self.number(name)?.unwrap_or(default))
    }

    fn keyword<T: std::str::FromStr>(&self, name: &str) -> Result<Option<T>, ImportError> {
        match self.get(name) {
            Some(value) => value
                .parse()
                .map(Some)
                .map_err(|_| self.invalid(name, value)),
            None => Ok(None),
        }
    }

    fn style(&self) -> Result<Style, ImportError> {
        let fill = match self.get("fill") {
            Some("none") => None,
            Some(color) => Some(Fill {
                enabled: true,
                color: color.to_string(),
            }),
            None => Some(Fill {
                enabled: true,
                color: DEFAULT_FILL.to_string(),
            }),
        };

        let stroke = match self.get("stroke") {
            None | Some("none") => None,
            Some(color) => {
                let cap = self.keyword::<LineCap>("stroke-linecap")?.unwrap_or_default();
                Some(Stroke {
                    enabled: true,
                    color: color.to_string(),
                    width: self.number_or("stroke-width", Stroke::DEFAULT_WIDTH)?,
                    start_cap: cap,
                    end_cap: cap,
                    join: self.keyword::<LineJoin>("stroke-linejoin")?.unwrap_or_default(),
                })
            }
        };

        Ok(Style {
            fill,
            stroke,
            composite: Default::default(),
        })
    }
}

/// Import the shapes of an SVG document.
///
/// Every `<path>`, `<rect>`, `<circle>`, `<ellipse>`, `<polygon>` and `<polyline>`
/// becomes a layer. Coordinates go through `normalize`. Shapes with a null size
/// are skipped. Any malformed path data or numeric attribute fails the whole
/// import.
pub fn import_svg<N: Normalize>(src: &str, normalize: &N) -> Result<Document, ImportError> {
    let scanner = Scanner::new()?;
    let mut document = Document::default();
    let mut found_root = false;
    let mut in_gradient = false;
    let mut shape_index = 0;

    for caps in scanner.element.captures_iter(src) {
        let closing = !caps[1].is_empty();
        let element = Element {
            name: caps.get(2).map_or("", |m| m.as_str()),
            attributes: scanner.attributes(&caps[3]),
        };

        if closing {
            if element.name == "linearGradient" {
                in_gradient = false;
            }
            continue;
        }

        match element.name {
            "svg" => {
                if found_root {
                    continue;
                }
                found_root = true;
                document.width = element.number("width")?;
                document.height = element.number("height")?;
                if let Some(value) = element.get("viewBox") {
                    let v = scanner.numbers(value);
                    if v.len() != 4 {
                        return Err(element.invalid("viewBox", value));
                    }
                    document.view_box = Some(Box2D {
                        min: point(v[0], v[1]),
                        max: point(v[0] + v[2], v[1] + v[3]),
                    });
                }
            }
            "linearGradient" => {
                document.gradients.push(LinearGradient {
                    id: element.get("id").unwrap_or("").to_string(),
                    start: point(element.number_or("x1", 0.0)?, element.number_or("y1", 0.0)?),
                    end: point(element.number_or("x2", 1.0)?, element.number_or("y2", 0.0)?),
                    stops: Vec::new(),
                });
                // Self-closing gradients have no stops.
                in_gradient = !caps[3].trim_end().ends_with('/');
            }
            "stop" if in_gradient => {
                let offset = match element.get("offset") {
                    Some(value) if value.ends_with('%') => value
                        .trim_end_matches('%')
                        .parse::<f64>()
                        .map(|v| v / 100.0)
                        .map_err(|_| element.invalid("offset", value))?,
                    Some(_) => element.number_or("offset", 0.0)?,
                    None => 0.0,
                };
                let color = element.get("stop-color").unwrap_or(DEFAULT_FILL).to_string();
                if let Some(gradient) = document.gradients.last_mut() {
                    gradient.stops.push(GradientStop {
                        offset: offset.max(0.0).min(1.0),
                        color,
                    });
                }
            }
            "path" | "rect" | "circle" | "ellipse" | "polygon" | "polyline" => {
                let index = shape_index;
                shape_index += 1;
                let mut path = Path::new();
                let added = add_shape(&scanner, &element, index, &mut path, normalize)?;
                if added {
                    document.layers.push(Layer::new(path, element.style()?));
                } else {
                    log::warn!("skipping degenerate <{}> (shape {})", element.name, index);
                }
            }
            _ => {}
        }
    }

    if !found_root {
        return Err(ImportError::MissingRoot);
    }

    Ok(document)
}

fn add_shape<N: Normalize>(
    scanner: &Scanner,
    element: &Element,
    index: usize,
    path: &mut Path,
    normalize: &N,
) -> Result<bool, ImportError> {
    let added = match element.name {
        "path" => {
            let tokens = parse_path_data(element.get("d").unwrap_or(""))
                .map_err(|source| ImportError::Path { index, source })?;
            append_tokens(path, &tokens, normalize);
            !path.is_empty()
        }
        "rect" => {
            let rx = element.number("rx")?;
            let ry = element.number("ry")?;
            // A single radius applies to both axes.
            let radii = Vector::new(
                rx.or(ry).unwrap_or(0.0),
                ry.or(rx).unwrap_or(0.0),
            );
            append_rect(
                path,
                point(element.number_or("x", 0.0)?, element.number_or("y", 0.0)?),
                element.number_or("width", 0.0)?,
                element.number_or("height", 0.0)?,
                radii,
                normalize,
            )
            .is_some()
        }
        "circle" => append_circle(
            path,
            point(element.number_or("cx", 0.0)?, element.number_or("cy", 0.0)?),
            element.number_or("r", 0.0)?,
            normalize,
        )
        .is_some(),
        "ellipse" => append_ellipse(
            path,
            point(element.number_or("cx", 0.0)?, element.number_or("cy", 0.0)?),
            Vector::new(element.number_or("rx", 0.0)?, element.number_or("ry", 0.0)?),
            normalize,
        )
        .is_some(),
        "polygon" | "polyline" => {
            let numbers = scanner.numbers(element.get("points").unwrap_or(""));
            if numbers.len() % 2 != 0 {
                log::warn!("odd number of coordinates in <{}>, dropping the last one", element.name);
            }
            let points: Vec<Point> = numbers.chunks_exact(2).map(|c| point(c[0], c[1])).collect();
            append_polygon(path, &points, element.name == "polygon", normalize).is_some()
        }
        _ => false,
    };

    Ok(added)
}

#[cfg(test)]
use crate::builder::Identity;

#[test]
fn icon() {
    let src = r##"<?xml version="1.0"?>
<svg xmlns="http://www.w3.org/2000/svg" width="24px" height="24" viewBox="0 0 24 24">
  <linearGradient id="g" x1="0" y1="0" x2="24" y2="24">
    <stop offset="0%" stop-color="#fff"/>
    <stop offset="1" stop-color='#000'/>
  </linearGradient>
  <path d="M2 2 L22 2 L12 20 Z" fill="url(#g)"/>
  <circle cx="12" cy="12" r="4" fill="none" stroke="red" stroke-width="2" stroke-linecap="round"/>
  <rect x="1" y="1" width="0" height="4"/>
  <polyline points="1,1 5,5 9,1" style="fill: none; stroke: blue"/>
</svg>"##;

    let document = import_svg(src, &Identity).unwrap();
    assert_eq!(document.width, Some(24.0));
    assert_eq!(
        document.bounds(),
        Some(Box2D {
            min: point(0.0, 0.0),
            max: point(24.0, 24.0)
        })
    );

    assert_eq!(document.gradients.len(), 1);
    let gradient = &document.gradients[0];
    assert_eq!(gradient.id, "g");
    assert_eq!(gradient.end, point(24.0, 24.0));
    assert_eq!(gradient.stops.len(), 2);
    assert_eq!(gradient.stops[1].offset, 1.0);
    assert_eq!(gradient.stops[1].color, "#000");

    // The empty rect is skipped.
    assert_eq!(document.layers.len(), 3);
    let triangle = &document.layers[0];
    assert_eq!(triangle.style.fill.as_ref().unwrap().color, "url(#g)");
    assert!(triangle.style.stroke.is_none());

    let circle = &document.layers[1];
    assert!(circle.style.fill.is_none());
    let stroke = circle.style.stroke.as_ref().unwrap();
    assert_eq!(stroke.width, 2.0);
    assert_eq!(stroke.start_cap, LineCap::Round);
    assert_eq!(circle.path.num_anchors(), 4);

    let polyline = &document.layers[2];
    assert!(polyline.style.fill.is_none());
    assert_eq!(polyline.style.stroke.as_ref().unwrap().color, "blue");
}

#[test]
fn import_errors() {
    assert!(matches!(
        import_svg("<path d=\"M0 0 L1 1\"/>", &Identity),
        Err(ImportError::MissingRoot)
    ));

    match import_svg("<svg><path d=\"M0 0\"/><path d=\"M0 0 L1\"/></svg>", &Identity) {
        Err(ImportError::Path { index, source }) => {
            assert_eq!(index, 1);
            assert_eq!(source.offset(), 7);
        }
        other => panic!("unexpected result {:?}", other),
    }

    match import_svg("<svg><circle cx=\"a\" r=\"2\"/></svg>", &Identity) {
        Err(ImportError::InvalidAttribute { element, name, value }) => {
            assert_eq!(element, "circle");
            assert_eq!(name, "cx");
            assert_eq!(value, "a");
        }
        other => panic!("unexpected result {:?}", other),
    }
}
