//! Textual dumps of the anchors and drawing commands of a document.

use crate::CliError;
use quill::math::Point;
use quill::svg::export::format_number;
use quill::svg::Document;

use std::io::Write;

fn format_point(p: Point) -> String {
    format!("{} {}", format_number(p.x), format_number(p.y))
}

fn format_handle(handle: Option<Point>) -> String {
    match handle {
        Some(p) => format!("({})", format_point(p)),
        None => "-".to_string(),
    }
}

/// One line per subpath followed by one line per anchor.
pub fn dump_anchors(document: &Document, output: &mut dyn Write) -> Result<(), CliError> {
    for (i, layer) in document.layers.iter().enumerate() {
        writeln!(output, "layer {}", i)?;
        for id in layer.path.subpath_ids() {
            let closed = layer.path.subpath(id).map_or(false, |sp| sp.is_closed());
            let winding = match layer.path.winding(id) {
                Some(w) if w.is_clockwise() => "clockwise",
                Some(_) => "counter-clockwise",
                None => "none",
            };
            writeln!(
                output,
                "  {:?} closed: {} winding: {}",
                id, closed, winding
            )?;
            for anchor in layer.path.subpath_anchors(id) {
                writeln!(
                    output,
                    "    {} from: {} to: {} mirror: {:?}",
                    format_point(anchor.point),
                    format_handle(anchor.from),
                    format_handle(anchor.to),
                    anchor.mirror,
                )?;
            }
        }
    }

    Ok(())
}

/// One drawing command per line.
pub fn dump_commands(document: &Document, output: &mut dyn Write) -> Result<(), CliError> {
    for layer in &document.layers {
        for command in layer.build_commands() {
            let args = match &command.svg_arc {
                Some(arc) => &arc[..],
                None => &command.args[..],
            };
            let args: Vec<String> = args.iter().map(|n| format_number(*n)).collect();
            if args.is_empty() {
                writeln!(output, "{}", command.kind)?;
            } else {
                writeln!(output, "{} {}", command.kind, args.join(" "))?;
            }
        }
    }

    Ok(())
}
