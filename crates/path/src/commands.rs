//! Drawing commands produced from anchor sequences.
//!
//! Commands are meant to be replayed on a canvas-like API or written as SVG path
//! data. Each command carries its canvas arguments, and arc commands also carry
//! the equivalent SVG arc parameters.
//!
//! | Kind  | `args`                                       | `svg_arc`                                   |
//! |-------|----------------------------------------------|---------------------------------------------|
//! | `M`   | `x y`                                        |                                             |
//! | `L`   | `x y`                                        |                                             |
//! | `C`   | `x1 y1 x2 y2 x y`                            |                                             |
//! | `Q`   | `x1 y1 x y`                                  |                                             |
//! | `A`   | `cx cy r start_angle end_angle ccw`          | `rx ry rotation large_arc sweep x y`        |
//! | `Z`   |                                              |                                             |

use crate::anchor::Anchor;
use crate::math::Point;

use std::fmt;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum CommandKind {
    MoveTo,
    LineTo,
    CubicTo,
    QuadraticTo,
    Arc,
    Close,
}

impl CommandKind {
    /// The SVG path command letter (absolute form).
    pub fn letter(self) -> char {
        match self {
            CommandKind::MoveTo => 'M',
            CommandKind::LineTo => 'L',
            CommandKind::CubicTo => 'C',
            CommandKind::QuadraticTo => 'Q',
            CommandKind::Arc => 'A',
            CommandKind::Close => 'Z',
        }
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// A single drawing command.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct DrawCommand {
    pub kind: CommandKind,
    /// Canvas arguments.
    pub args: Vec<f64>,
    /// SVG arc parameters, only set for arcs.
    pub svg_arc: Option<[f64; 7]>,
}

impl DrawCommand {
    pub fn move_to(to: Point) -> Self {
        DrawCommand::new(CommandKind::MoveTo, vec![to.x, to.y])
    }

    pub fn line_to(to: Point) -> Self {
        DrawCommand::new(CommandKind::LineTo, vec![to.x, to.y])
    }

    pub fn quadratic_to(ctrl: Point, to: Point) -> Self {
        DrawCommand::new(CommandKind::QuadraticTo, vec![ctrl.x, ctrl.y, to.x, to.y])
    }

    pub fn cubic_to(ctrl1: Point, ctrl2: Point, to: Point) -> Self {
        DrawCommand::new(
            CommandKind::CubicTo,
            vec![ctrl1.x, ctrl1.y, ctrl2.x, ctrl2.y, to.x, to.y],
        )
    }

    pub fn close() -> Self {
        DrawCommand::new(CommandKind::Close, Vec::new())
    }

    fn new(kind: CommandKind, args: Vec<f64>) -> Self {
        DrawCommand {
            kind,
            args,
            svg_arc: None,
        }
    }

    /// The point the command ends at, if any.
    pub fn to(&self) -> Option<Point> {
        match self.kind {
            CommandKind::Close => None,
            CommandKind::Arc => self.svg_arc.map(|a| Point::new(a[5], a[6])),
            _ => {
                let n = self.args.len();
                if n < 2 {
                    return None;
                }
                Some(Point::new(self.args[n - 2], self.args[n - 1]))
            }
        }
    }
}

/// The command drawing the segment from `prev` to `anchor`.
///
/// An arc annotation on `anchor` wins. Otherwise both handles make a cubic curve,
/// a single one a quadratic curve and none a line.
pub fn segment_command(prev: &Anchor, anchor: &Anchor) -> DrawCommand {
    let to = anchor.point;

    if let Some(arc) = &anchor.arc {
        let flags = arc.flags();
        return DrawCommand {
            kind: CommandKind::Arc,
            args: vec![
                arc.center.x,
                arc.center.y,
                arc.radius,
                arc.start_angle,
                arc.end_angle,
                if arc.counterclockwise { 1.0 } else { 0.0 },
            ],
            svg_arc: Some([
                arc.radius,
                arc.radius,
                0.0,
                if flags.large_arc { 1.0 } else { 0.0 },
                if flags.sweep { 1.0 } else { 0.0 },
                to.x,
                to.y,
            ]),
        };
    }

    match (prev.to, anchor.from) {
        (Some(ctrl1), Some(ctrl2)) => DrawCommand::cubic_to(ctrl1, ctrl2, to),
        (Some(ctrl), None) | (None, Some(ctrl)) => DrawCommand::quadratic_to(ctrl, to),
        (None, None) => DrawCommand::line_to(to),
    }
}

/// Flatten the anchors of a subpath into drawing commands.
///
/// Closed subpaths end with `Z`, preceded by the closing segment when it is a
/// curve: `Z` alone would draw a straight line and lose the handles.
pub fn build_commands(anchors: &[&Anchor], closed: bool) -> Vec<DrawCommand> {
    let first = match anchors.first() {
        Some(first) => *first,
        None => return Vec::new(),
    };

    let mut commands = Vec::with_capacity(anchors.len() + 2);
    commands.push(DrawCommand::move_to(first.point));

    for pair in anchors.windows(2) {
        commands.push(segment_command(pair[0], pair[1]));
    }

    if closed {
        let last = anchors[anchors.len() - 1];
        if anchors.len() > 1 && (last.to.is_some() || first.from.is_some() || first.arc.is_some())
        {
            commands.push(segment_command(last, first));
        }
        commands.push(DrawCommand::close());
    }

    commands
}

#[cfg(test)]
use crate::anchor::ArcAnnotation;
#[cfg(test)]
use crate::math::point;

#[cfg(test)]
fn kinds(commands: &[DrawCommand]) -> String {
    commands.iter().map(|cmd| cmd.kind.letter()).collect()
}

#[test]
fn line_and_curves() {
    let a = Anchor::with_handles(point(0.0, 0.0), None, Some(point(0.0, 5.0)));
    let b = Anchor::with_handles(point(10.0, 10.0), Some(point(5.0, 10.0)), Some(point(15.0, 10.0)));
    let c = Anchor::new(point(20.0, 0.0));
    let d = Anchor::new(point(30.0, 0.0));

    let commands = build_commands(&[&a, &b, &c, &d], false);
    assert_eq!(kinds(&commands), "MCQL");
    assert_eq!(commands[1].args, vec![0.0, 5.0, 5.0, 10.0, 10.0, 10.0]);
    assert_eq!(commands[2].args, vec![15.0, 10.0, 20.0, 0.0]);
    assert_eq!(commands[3].to(), Some(point(30.0, 0.0)));
}

#[test]
fn closing_curve_is_emitted() {
    let mut a = Anchor::new(point(0.0, 0.0));
    a.from = Some(point(-5.0, 0.0));
    let b = Anchor::new(point(10.0, 0.0));
    let c = Anchor::new(point(10.0, 10.0));

    let commands = build_commands(&[&a, &b, &c], true);
    assert_eq!(kinds(&commands), "MLLQZ");
    assert_eq!(commands[3].args, vec![-5.0, 0.0, 0.0, 0.0]);

    // Straight closing segments are implied by Z.
    a.from = None;
    let commands = build_commands(&[&a, &b, &c], true);
    assert_eq!(kinds(&commands), "MLLZ");
}

#[test]
fn arc_annotation_becomes_arc_command() {
    let a = Anchor::new(point(10.0, 0.0));
    let mut b = Anchor::with_handles(point(0.0, 10.0), Some(point(5.5, 10.0)), None);
    b.arc = Some(ArcAnnotation {
        center: point(0.0, 0.0),
        radius: 10.0,
        start_angle: 0.0,
        end_angle: std::f64::consts::FRAC_PI_2,
        counterclockwise: false,
    });

    let commands = build_commands(&[&a, &b], false);
    assert_eq!(kinds(&commands), "MA");
    let arc = &commands[1];
    assert_eq!(arc.args[..3], [0.0, 0.0, 10.0]);
    assert_eq!(arc.svg_arc, Some([10.0, 10.0, 0.0, 0.0, 1.0, 0.0, 10.0]));
    assert_eq!(arc.to(), Some(point(0.0, 10.0)));
}

#[test]
fn empty_subpath() {
    assert!(build_commands(&[], true).is_empty());
    let a = Anchor::new(point(1.0, 2.0));
    assert_eq!(kinds(&build_commands(&[&a], true)), "MZ");
}
