extern crate clap;
extern crate quill_cli;

use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use quill::path::{LineCap, LineJoin};
use quill::svg::BuilderOptions;
use quill_cli::commands::{ExportCmd, ExportFormat, OutlineCmd};
use quill_cli::dump::{dump_anchors, dump_commands};
use quill_cli::export::export;
use quill_cli::outline::outline;
use quill_cli::{load_document, CliError};

use std::fs::{self, File};
use std::io::{stdout, Write};
use std::process;
use std::str::FromStr;

fn normalization_args<'a, 'b>() -> Vec<Arg<'a, 'b>> {
    vec![
        Arg::with_name("SCALE")
            .long("scale")
            .help("Scales the input coordinates (1 by default)")
            .value_name("SCALE")
            .takes_value(true),
        Arg::with_name("PRECISION")
            .long("precision")
            .help("Rounds the input coordinates to this number of decimals")
            .value_name("DECIMALS")
            .takes_value(true),
    ]
}

fn main() {
    let matches = App::new("quill command-line interface")
        .version("0.1")
        .author("The quill developers")
        .about("Vector path tools")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .subcommand(SubCommand::with_name("parse")
            .about("Prints the anchors of a path")
            .args(&normalization_args())
        )
        .subcommand(SubCommand::with_name("commands")
            .about("Prints the drawing commands of a path")
            .args(&normalization_args())
        )
        .subcommand(SubCommand::with_name("outline")
            .about("Prints the path data of the outline of a stroked path")
            .arg(Arg::with_name("WIDTH")
                .short("w")
                .long("width")
                .help("Sets the stroke width")
                .value_name("WIDTH")
                .takes_value(true)
            )
            .arg(Arg::with_name("CAP")
                .long("cap")
                .help("Sets the line cap")
                .value_name("CAP")
                .possible_values(&["butt", "round", "square"])
                .takes_value(true)
            )
            .arg(Arg::with_name("JOIN")
                .long("join")
                .help("Sets the line join")
                .value_name("JOIN")
                .possible_values(&["miter", "round", "bevel"])
                .takes_value(true)
            )
            .arg(Arg::with_name("TOLERANCE")
                .short("t")
                .long("tolerance")
                .help("Sets the tolerance threshold of offset curves (0.1 by default)")
                .value_name("TOLERANCE")
                .takes_value(true)
            )
            .args(&normalization_args())
        )
        .subcommand(SubCommand::with_name("export")
            .about("Writes a path as an SVG document or a CSS mask")
            .arg(Arg::with_name("FORMAT")
                .short("f")
                .long("format")
                .help("Output format")
                .value_name("FORMAT")
                .possible_values(&["svg", "css"])
                .default_value("svg")
                .takes_value(true)
            )
            .arg(Arg::with_name("COLOR")
                .short("c")
                .long("color")
                .help("Fills every shape with this color")
                .value_name("COLOR")
                .takes_value(true)
            )
            .args(&normalization_args())
        )
        .arg(Arg::with_name("PATH")
            .value_name("PATH")
            .help("An SVG path")
            .takes_value(true)
            .required(false)
        )
        .arg(Arg::with_name("INPUT")
            .help("Sets the input file to use, path data or an SVG document")
            .short("i")
            .long("input")
            .value_name("FILE")
            .takes_value(true)
            .required(false)
        )
        .arg(Arg::with_name("OUTPUT")
            .help("Sets the output file to use")
            .value_name("FILE")
            .short("o")
            .long("output")
            .takes_value(true)
            .required(false)
        )
        .arg(Arg::with_name("VERBOSE")
            .short("v")
            .long("verbose")
            .help("Prints debug logs")
        )
        .get_matches();

    let level = if matches.is_present("VERBOSE") { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    if let Err(e) = run(&matches) {
        eprintln!("error: {}", e);
        process::exit(1);
    }
}

fn run(matches: &ArgMatches) -> Result<(), CliError> {
    let (name, sub_matches) = match matches.subcommand() {
        (name, Some(sub_matches)) => (name, sub_matches),
        _ => return Err(CliError::MissingCommand),
    };

    let mut input = matches.value_of("PATH").unwrap_or("").to_string();
    if let Some(input_file) = matches.value_of("INPUT") {
        input = fs::read_to_string(input_file)?;
    }

    let document = load_document(&input, &builder_options(sub_matches)?)?;

    let mut output: Box<dyn Write> = match matches.value_of("OUTPUT") {
        Some(output_file) => Box::new(File::create(output_file)?),
        None => Box::new(stdout()),
    };

    match name {
        "parse" => dump_anchors(&document, &mut *output),
        "commands" => dump_commands(&document, &mut *output),
        "outline" => {
            let cmd = OutlineCmd {
                width: parse_value::<f64>(sub_matches, "WIDTH", "width")?,
                cap: parse_value::<LineCap>(sub_matches, "CAP", "cap")?,
                join: parse_value::<LineJoin>(sub_matches, "JOIN", "join")?,
                tolerance: parse_value::<f64>(sub_matches, "TOLERANCE", "tolerance")?,
            };
            outline(&document, &cmd, &mut *output)
        }
        "export" => {
            let cmd = ExportCmd {
                format: parse_value::<ExportFormat>(sub_matches, "FORMAT", "format")?
                    .unwrap_or(ExportFormat::Svg),
                color: sub_matches.value_of("COLOR").map(str::to_string),
                view_box: None,
            };
            export(&document, &cmd, &mut *output)
        }
        _ => Err(CliError::MissingCommand),
    }
}

fn builder_options(matches: &ArgMatches) -> Result<BuilderOptions, CliError> {
    let mut options = BuilderOptions::DEFAULT;
    if let Some(scale) = parse_value::<f64>(matches, "SCALE", "scale")? {
        options = options.with_scale(scale);
    }
    if let Some(decimals) = parse_value::<u32>(matches, "PRECISION", "precision")? {
        options = options.with_precision(decimals);
    }

    Ok(options)
}

fn parse_value<T: FromStr>(matches: &ArgMatches, arg: &str, name: &str) -> Result<Option<T>, CliError> {
    match matches.value_of(arg) {
        Some(value) => value.parse().map(Some).map_err(|_| CliError::InvalidArgument {
            name: name.to_string(),
            value: value.to_string(),
        }),
        None => Ok(None),
    }
}
