//! The `export` subcommand.

use crate::commands::{ExportCmd, ExportFormat};
use crate::CliError;
use quill::math::Box2D;
use quill::path::{Layer, Style};
use quill::svg::{to_mask_css, to_svg, Document};

use std::io::Write;

fn document_bounds(document: &Document) -> Option<Box2D> {
    if let Some(bounds) = document.bounds() {
        return Some(bounds);
    }

    document
        .layers
        .iter()
        .filter_map(|layer| layer.path.bounding_box())
        .fold(None, |acc: Option<Box2D>, b| {
            Some(match acc {
                Some(acc) => acc.union(&b),
                None => b,
            })
        })
}

/// Write each layer as an SVG document or a CSS mask, one per line.
pub fn export(document: &Document, cmd: &ExportCmd, output: &mut dyn Write) -> Result<(), CliError> {
    if document.layers.is_empty() {
        return Err(CliError::Empty);
    }

    let view_box = cmd
        .view_box
        .or_else(|| document_bounds(document))
        .ok_or(CliError::Empty)?;

    for layer in &document.layers {
        let recolored;
        let layer = match &cmd.color {
            Some(color) => {
                recolored = Layer::new(layer.path.clone(), Style::filled(color));
                &recolored
            }
            None => layer,
        };

        match cmd.format {
            ExportFormat::Svg => writeln!(output, "{}", to_svg(layer, &view_box))?,
            ExportFormat::Css => writeln!(output, "{}", to_mask_css(layer, &view_box))?,
        }
    }

    Ok(())
}
