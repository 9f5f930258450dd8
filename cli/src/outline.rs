//! The `outline` subcommand: stroke to fill conversion.

use crate::commands::OutlineCmd;
use crate::CliError;
use quill::path::{Layer, Path};
use quill::stroke::{outline_path, outline_to_path, OutlineOptions};
use quill::svg::to_path_data;
use quill::svg::Document;

use std::io::Write;

/// Outline options for a layer, overridden by the command line.
pub fn layer_options(layer: &Layer, cmd: &OutlineCmd) -> OutlineOptions {
    let mut options = match layer.style.active_stroke() {
        Some(stroke) => OutlineOptions::from_stroke(stroke),
        None => OutlineOptions::DEFAULT,
    };

    if let Some(width) = cmd.width {
        options = options.with_width(width * 0.5);
    }
    if let Some(cap) = cmd.cap {
        options = options.with_line_cap(cap);
    }
    if let Some(join) = cmd.join {
        options = options.with_line_join(join);
    }
    if let Some(tolerance) = cmd.tolerance {
        options = options.with_tolerance(tolerance);
    }

    options
}

/// The filled shape of the stroke of a layer.
pub fn outline_layer(layer: &Layer, cmd: &OutlineCmd) -> Path {
    let options = layer_options(layer, cmd);
    log::debug!("outline options: {:?}", options);

    outline_to_path(&outline_path(&layer.path, &options))
}

/// Write the path data of each layer's outline on its own line.
pub fn outline(document: &Document, cmd: &OutlineCmd, output: &mut dyn Write) -> Result<(), CliError> {
    for layer in &document.layers {
        let path = outline_layer(layer, cmd);
        if path.is_empty() {
            log::warn!("layer without outline");
        }
        writeln!(output, "{}", to_path_data(&path.build_commands()))?;
    }

    Ok(())
}
