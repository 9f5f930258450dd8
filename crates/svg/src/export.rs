//! Serialization of drawing commands into SVG path data, SVG documents and
//! CSS masks.

use quill_path::math::Box2D;
use quill_path::{CommandKind, DrawCommand, Layer};

use std::fmt::Write;

/// Number of decimals kept when writing coordinates.
pub const DECIMALS: usize = 3;

/// Format a number with at most `DECIMALS` decimals and no trailing zeros.
pub fn format_number(value: f64) -> String {
    let mut s = format!("{:.*}", DECIMALS, value);
    if s.contains('.') {
        let trimmed = s.trim_end_matches('0').trim_end_matches('.').len();
        s.truncate(trimmed);
    }
    if s == "-0" {
        s = "0".to_string();
    }

    s
}

fn write_numbers(output: &mut String, numbers: &[f64]) {
    for (i, n) in numbers.iter().enumerate() {
        if i > 0 {
            output.push(' ');
        }
        output.push_str(&format_number(*n));
    }
}

/// Write drawing commands as SVG path data.
///
/// Arcs are written with their SVG parameters.
pub fn to_path_data(commands: &[DrawCommand]) -> String {
    let mut output = String::new();
    for cmd in commands {
        output.push(cmd.kind.letter());
        match (cmd.kind, &cmd.svg_arc) {
            (CommandKind::Arc, Some(arc)) => write_numbers(&mut output, arc),
            _ => write_numbers(&mut output, &cmd.args),
        }
    }

    output
}

fn view_box_attribute(view_box: &Box2D) -> String {
    format!(
        "{} {} {} {}",
        format_number(view_box.min.x),
        format_number(view_box.min.y),
        format_number(view_box.width()),
        format_number(view_box.height()),
    )
}

// Presentation attributes of a layer, each preceded by a space.
fn style_attributes(layer: &Layer) -> String {
    let mut output = String::new();
    let style = &layer.style;

    match style.active_fill() {
        Some(fill) => {
            let _ = write!(output, " fill=\"{}\"", escape_attribute(&fill.color));
        }
        None => output.push_str(" fill=\"none\""),
    }

    if let Some(stroke) = style.active_stroke() {
        let _ = write!(
            output,
            " stroke=\"{}\" stroke-width=\"{}\" stroke-linecap=\"{}\" stroke-linejoin=\"{}\"",
            escape_attribute(&stroke.color),
            format_number(stroke.width),
            stroke.start_cap,
            stroke.join,
        );
    }

    output
}

fn escape_attribute(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
}

/// Write a layer as a standalone SVG document.
pub fn to_svg(layer: &Layer, view_box: &Box2D) -> String {
    format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"{}\"><path d=\"{}\"{}/></svg>",
        view_box_attribute(view_box),
        to_path_data(&layer.build_commands()),
        style_attributes(layer),
    )
}

/// Percent-encode everything but the unreserved characters of RFC 3986.
pub fn percent_encode(input: &str) -> String {
    let mut output = String::with_capacity(input.len() * 3);
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                output.push(byte as char);
            }
            _ => {
                let _ = write!(output, "%{:02X}", byte);
            }
        }
    }

    output
}

/// A CSS mask rule displaying a layer.
pub fn to_mask_css(layer: &Layer, view_box: &Box2D) -> String {
    format!(
        "-webkit-mask: url('data:image/svg+xml,{}') no-repeat 50% 50%;\n-webkit-mask-size: 100% 100%;",
        percent_encode(&to_svg(layer, view_box)),
    )
}

#[cfg(test)]
use quill_path::math::point;
#[cfg(test)]
use quill_path::{Anchor, Path, Stroke, Style};

#[cfg(test)]
fn triangle() -> Layer {
    let mut path = Path::new();
    let (sp, _) = path.begin_subpath(point(0.0, 0.0));
    path.append_anchor(sp, Anchor::new(point(10.5, 0.0)));
    path.append_anchor(sp, Anchor::new(point(5.0, 8.25)));
    path.close_subpath(sp);

    Layer::new(path, Style::filled("#ff0000"))
}

#[cfg(test)]
fn view_box() -> Box2D {
    Box2D {
        min: point(0.0, 0.0),
        max: point(24.0, 24.0),
    }
}

#[test]
fn numbers() {
    assert_eq!(format_number(1.0), "1");
    assert_eq!(format_number(-0.5), "-0.5");
    assert_eq!(format_number(1.23456), "1.235");
    assert_eq!(format_number(-0.0001), "0");
    assert_eq!(format_number(120.0), "120");
}

#[test]
fn path_data() {
    assert_eq!(
        to_path_data(&triangle().build_commands()),
        "M0 0L10.5 0L5 8.25Z"
    );

    let arc = DrawCommand {
        kind: CommandKind::Arc,
        args: vec![0.0, 0.0, 5.0, 0.0, 1.0, 0.0],
        svg_arc: Some([5.0, 5.0, 0.0, 0.0, 1.0, 2.0, 3.0]),
    };
    assert_eq!(to_path_data(&[arc]), "A5 5 0 0 1 2 3");
}

#[test]
fn svg_document() {
    let mut layer = triangle();
    assert_eq!(
        to_svg(&layer, &view_box()),
        "<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"0 0 24 24\">\
         <path d=\"M0 0L10.5 0L5 8.25Z\" fill=\"#ff0000\"/></svg>"
    );

    layer.style = Style::stroked(Stroke::new("black", 2.0));
    let svg = to_svg(&layer, &view_box());
    assert!(svg.contains(" fill=\"none\" stroke=\"black\" stroke-width=\"2\" stroke-linecap=\"butt\" stroke-linejoin=\"miter\""));
}

#[test]
fn mask_css() {
    assert_eq!(percent_encode("a b<#>~"), "a%20b%3C%23%3E~");

    let css = to_mask_css(&triangle(), &view_box());
    assert!(css.starts_with("-webkit-mask: url('data:image/svg+xml,%3Csvg%20xmlns%3D%22http"));
    assert!(css.ends_with("') no-repeat 50% 50%;\n-webkit-mask-size: 100% 100%;"));
    assert!(!css[..css.len() - 40].contains('#'));
}
