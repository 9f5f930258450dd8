use quill::path::LineCap;
use quill::svg::{BuilderOptions, Identity};
use quill_cli::commands::{ExportCmd, ExportFormat, OutlineCmd};
use quill_cli::dump::{dump_anchors, dump_commands};
use quill_cli::export::export;
use quill_cli::outline::outline;
use quill_cli::{load_document, CliError};

fn run<F>(f: F) -> String
where
    F: FnOnce(&mut dyn std::io::Write) -> Result<(), CliError>,
{
    let mut output = Vec::new();
    f(&mut output).unwrap();
    String::from_utf8(output).unwrap()
}

const ICON: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24">
  <path d="M4 4L20 4L20 20Z" fill="#ff0000"/>
  <circle cx="12" cy="12" r="4"/>
</svg>"##;

#[test]
fn commands_of_path_data() {
    let document = load_document("m 10,10 10,0 v 10 h -10 z", &Identity).unwrap();
    let text = run(|out| dump_commands(&document, out));
    assert_eq!(text, "M 10 10\nL 20 10\nL 20 20\nL 10 20\nZ\n");
}

#[test]
fn anchors_of_path_data() {
    let document = load_document("M0 0C0 10 10 10 10 0", &Identity).unwrap();
    let text = run(|out| dump_anchors(&document, out));
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], "layer 0");
    assert!(lines[1].contains("closed: false"));
    assert!(lines[2].contains("0 0 from: - to: (0 10)"));
    assert!(lines[3].contains("10 0 from: (10 10) to: -"));
}

#[test]
fn normalized_input() {
    let options = BuilderOptions::DEFAULT.with_scale(2.0);
    let document = load_document("M1 1L2 2", &options).unwrap();
    let text = run(|out| dump_commands(&document, out));
    assert_eq!(text, "M 2 2\nL 4 4\n");
}

#[test]
fn outline_of_a_line() {
    let document = load_document("M0 0L100 0", &Identity).unwrap();
    let cmd = OutlineCmd {
        width: Some(20.0),
        ..OutlineCmd::default()
    };
    let text = run(|out| outline(&document, &cmd, out));
    assert_eq!(text, "M0 -10L0 10L100 10L100 -10Z\n");

    let cmd = OutlineCmd {
        width: Some(20.0),
        cap: Some(LineCap::Round),
        ..OutlineCmd::default()
    };
    let text = run(|out| outline(&document, &cmd, out));
    assert!(text.starts_with("M0 -10C"));
    assert!(text.contains("-10 0"));
    assert!(text.contains("110 0"));
}

#[test]
fn svg_document_export() {
    let document = load_document(ICON, &Identity).unwrap();
    assert_eq!(document.layers.len(), 2);

    let cmd = ExportCmd {
        format: ExportFormat::Svg,
        color: None,
        view_box: None,
    };
    let text = run(|out| export(&document, &cmd, out));
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("viewBox=\"0 0 24 24\""));
    assert!(lines[0].contains("d=\"M4 4L20 4L20 20Z\" fill=\"#ff0000\""));
    assert!(lines[1].contains("d=\"M16 12A4 4 0 0 1 12 16"));

    let cmd = ExportCmd {
        format: ExportFormat::Css,
        color: Some("blue".to_string()),
        view_box: None,
    };
    let text = run(|out| export(&document, &cmd, out));
    for line in text.lines().step_by(2) {
        assert!(line.starts_with("-webkit-mask: url('data:image/svg+xml,"));
        assert!(line.contains("fill%3D%22blue%22"));
    }
}

#[test]
fn errors() {
    match load_document("   ", &Identity) {
        Err(CliError::MissingInput) => {}
        other => panic!("{:?}", other.map(|_| ())),
    }
    match load_document("M 0 0 L 1", &Identity) {
        Err(CliError::Parse(..)) => {}
        other => panic!("{:?}", other.map(|_| ())),
    }
    match load_document("<svg><path d=\"M0 0 X\"/></svg>", &Identity) {
        Err(e @ CliError::Import(..)) => assert!(e.to_string().starts_with("Import failed")),
        other => panic!("{:?}", other.map(|_| ())),
    }

    assert_eq!("CSS".parse::<ExportFormat>(), Ok(ExportFormat::Css));
    assert!("png".parse::<ExportFormat>().is_err());
}
