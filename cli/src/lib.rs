//! The library side of the `quill` command line tool.
//!
//! Input is either SVG path data or a whole SVG document. Each subcommand
//! writes its result to any `io::Write`.

pub mod commands;
pub mod dump;
pub mod export;
pub mod outline;

use quill::path::{Layer, Style};
use quill::svg::import::DEFAULT_FILL;
use quill::svg::{import_svg, parse_path, Document, ImportError, Normalize, ParseError};

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Invalid path data: {0}")]
    Parse(#[from] ParseError),
    #[error("Import failed: {0}")]
    Import(#[from] ImportError),
    #[error("No input. Pass path data or an input file.")]
    MissingInput,
    #[error("No subcommand given.")]
    MissingCommand,
    #[error("Invalid value {value:?} for --{name}.")]
    InvalidArgument { name: String, value: String },
    #[error("Nothing to export.")]
    Empty,
}

/// Load path data or an SVG document.
///
/// Path data becomes a single layer with the default fill.
pub fn load_document<N: Normalize>(source: &str, normalize: &N) -> Result<Document, CliError> {
    let source = source.trim();
    if source.is_empty() {
        return Err(CliError::MissingInput);
    }

    if source.starts_with('<') {
        let document = import_svg(source, normalize)?;
        log::debug!("imported {} layers", document.layers.len());
        return Ok(document);
    }

    let path = parse_path(source, normalize)?;
    let mut document = Document::default();
    document.layers.push(Layer::new(path, Style::filled(DEFAULT_FILL)));

    Ok(document)
}
