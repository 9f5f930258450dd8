//! Builds anchor paths out of path data tokens.

use crate::parser::{parse_path_data, ParseError, Token};
use quill_path::geom::utils::{round_to, symmetric_point};
use quill_path::geom::{arc_to_cubics, ArcFlags, SvgArc};
use quill_path::math::{point, vector, Point, Vector};
use quill_path::{Anchor, AnchorId, Handle, Path, SubpathId};

/// Maps source coordinates into the editor's coordinate space.
pub trait Normalize {
    fn normalize_x(&self, x: f64) -> f64;
    fn normalize_y(&self, y: f64) -> f64;
    /// Applied after `normalize_x` and `normalize_y`.
    fn translate(&self, p: Point) -> Point;

    /// Maps a distance, such as a radius.
    fn normalize_length(&self, length: f64) -> f64 {
        length
    }

    fn normalize(&self, p: Point) -> Point {
        self.translate(point(self.normalize_x(p.x), self.normalize_y(p.y)))
    }
}

/// Keeps coordinates untouched.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Identity;

impl Normalize for Identity {
    fn normalize_x(&self, x: f64) -> f64 {
        x
    }
    fn normalize_y(&self, y: f64) -> f64 {
        y
    }
    fn translate(&self, p: Point) -> Point {
        p
    }
}

/// Scale, rounding and offset applied to every coordinate.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BuilderOptions {
    /// Default value: `BuilderOptions::DEFAULT_SCALE`.
    pub scale: f64,
    /// Number of decimals to round to, `None` to keep full precision.
    ///
    /// Default value: `None`.
    pub precision: Option<u32>,
    /// Translation applied after scaling.
    ///
    /// Default value: no translation.
    pub offset: Vector,
}

impl BuilderOptions {
    pub const DEFAULT_SCALE: f64 = 1.0;

    pub const DEFAULT: Self = BuilderOptions {
        scale: Self::DEFAULT_SCALE,
        precision: None,
        offset: Vector::new(0.0, 0.0),
    };

    #[inline]
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    #[inline]
    pub fn with_precision(mut self, decimals: u32) -> Self {
        self.precision = Some(decimals);
        self
    }

    #[inline]
    pub fn with_offset(mut self, offset: Vector) -> Self {
        self.offset = offset;
        self
    }

    fn round(&self, value: f64) -> f64 {
        match self.precision {
            Some(decimals) => round_to(value, decimals),
            None => value,
        }
    }
}

impl Default for BuilderOptions {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl Normalize for BuilderOptions {
    fn normalize_x(&self, x: f64) -> f64 {
        self.round(x * self.scale)
    }
    fn normalize_y(&self, y: f64) -> f64 {
        self.round(y * self.scale)
    }
    fn translate(&self, p: Point) -> Point {
        p + self.offset
    }
    fn normalize_length(&self, length: f64) -> f64 {
        self.round(length * self.scale)
    }
}

// The kind of curve drawn by the previous command, which smooth commands
// reflect their first control point against.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum LastCurve {
    Cubic,
    Quadratic,
    Other,
}

// Positions are tracked in source coordinates, so that relative commands
// don't accumulate the rounding of the normalization.
#[derive(Copy, Clone, Debug)]
struct BuilderState {
    current_point: Point,
    subpath_start: Point,
    subpath: Option<SubpathId>,
    prev_anchor: Option<AnchorId>,
    last_curve: LastCurve,
}

/// Feeds path data tokens into a [`Path`].
///
/// Each move-to starts a new subpath. Handles are stored on the anchors: the
/// first control point of a curve becomes the previous anchor's `to` handle and
/// the second one the new anchor's `from` handle. Quadratic curves only set
/// the new anchor's `from` handle.
pub struct PathBuilder<'l, N> {
    path: &'l mut Path,
    normalize: &'l N,
    state: BuilderState,
}

impl<'l, N: Normalize> PathBuilder<'l, N> {
    pub fn new(path: &'l mut Path, normalize: &'l N) -> Self {
        PathBuilder {
            path,
            normalize,
            state: BuilderState {
                current_point: point(0.0, 0.0),
                subpath_start: point(0.0, 0.0),
                subpath: None,
                prev_anchor: None,
                last_curve: LastCurve::Other,
            },
        }
    }

    /// The subpath currently being built.
    pub fn current_subpath(&self) -> Option<SubpathId> {
        self.state.subpath
    }

    pub fn token(&mut self, token: &Token) {
        let args = &token.args[..];
        let rel = token.is_relative();
        let base = if rel {
            self.state.current_point.to_vector()
        } else {
            vector(0.0, 0.0)
        };
        let at = |i: usize| point(args[i], args[i + 1]) + base;

        if args.len() < Token::arity(token.command).unwrap_or(0) {
            log::warn!("ignoring truncated {:?} command", token.command);
            return;
        }

        let last_curve = self.state.last_curve;
        self.state.last_curve = LastCurve::Other;

        match token.command.to_ascii_uppercase() {
            'M' => {
                // After a close, the current point is the start of the closed subpath.
                let to = at(0);
                self.begin(to);
            }
            'L' => {
                let to = at(0);
                self.line_to(to);
            }
            'H' => {
                let x = if rel { args[0] + base.x } else { args[0] };
                let to = point(x, self.state.current_point.y);
                self.line_to(to);
            }
            'V' => {
                let y = if rel { args[0] + base.y } else { args[0] };
                let to = point(self.state.current_point.x, y);
                self.line_to(to);
            }
            'C' => {
                let n = self.normalize;
                let (ctrl1, ctrl2, to) = (n.normalize(at(0)), n.normalize(at(2)), at(4));
                self.cubic_to(Some(ctrl1), ctrl2, to);
                self.state.last_curve = LastCurve::Cubic;
            }
            'S' => {
                let (ctrl2, to) = (self.normalize.normalize(at(0)), at(2));
                // Without a previous cubic the first control point is the current point.
                let ctrl1 = match last_curve {
                    LastCurve::Cubic => self.smooth_ctrl(),
                    _ => None,
                }
                .unwrap_or_else(|| self.normalize.normalize(self.state.current_point));
                self.cubic_to(Some(ctrl1), ctrl2, to);
                self.state.last_curve = LastCurve::Cubic;
            }
            'Q' => {
                let (ctrl, to) = (self.normalize.normalize(at(0)), at(2));
                self.quadratic_to(ctrl, to);
                self.state.last_curve = LastCurve::Quadratic;
            }
            'T' => {
                let to = at(0);
                let ctrl = match last_curve {
                    LastCurve::Quadratic => self.smooth_ctrl(),
                    _ => None,
                };
                // Without a previous quadratic the control point is the current point,
                // which draws a straight line.
                match ctrl {
                    Some(ctrl) => {
                        self.quadratic_to(ctrl, to);
                        self.state.last_curve = LastCurve::Quadratic;
                    }
                    None => self.line_to(to),
                }
            }
            'A' => {
                let arc = SvgArc {
                    from: self.state.current_point,
                    to: at(5),
                    radii: vector(args[0], args[1]),
                    x_rotation: args[2],
                    flags: ArcFlags {
                        large_arc: args[3] != 0.0,
                        sweep: args[4] != 0.0,
                    },
                };
                self.arc_to(&arc);
            }
            'Z' => self.close(),
            _ => {
                log::warn!("ignoring unknown command {:?}", token.command);
            }
        }
    }

    fn begin(&mut self, to: Point) -> SubpathId {
        let (subpath, anchor) = self.path.begin_subpath(self.normalize.normalize(to));
        self.state = BuilderState {
            current_point: to,
            subpath_start: to,
            subpath: Some(subpath),
            prev_anchor: Some(anchor),
            last_curve: LastCurve::Other,
        };

        subpath
    }

    // Drawing commands following a close start a new subpath at the current point.
    fn ensure_subpath(&mut self) -> SubpathId {
        match self.state.subpath {
            Some(subpath) => subpath,
            None => self.begin(self.state.current_point),
        }
    }

    // `to` is in source coordinates, `from` already normalized.
    fn push_anchor(&mut self, to: Point, from: Option<Point>) {
        let subpath = self.ensure_subpath();
        let anchor = Anchor::with_handles(self.normalize.normalize(to), from, None);
        if let Some(id) = self.path.append_anchor(subpath, anchor) {
            self.state.prev_anchor = Some(id);
        }
        self.state.current_point = to;
    }

    fn line_to(&mut self, to: Point) {
        self.push_anchor(to, None);
    }

    fn cubic_to(&mut self, ctrl1: Option<Point>, ctrl2: Point, to: Point) {
        self.ensure_subpath();
        if let (Some(ctrl1), Some(prev)) = (ctrl1, self.state.prev_anchor) {
            self.path.set_handle(prev, Handle::To, ctrl1);
            self.path.infer_mirror(prev);
        }
        self.push_anchor(to, Some(ctrl2));
    }

    fn quadratic_to(&mut self, ctrl: Point, to: Point) {
        self.push_anchor(to, Some(ctrl));
    }

    /// Reflection of the previous anchor's `from` handle through its point.
    fn smooth_ctrl(&self) -> Option<Point> {
        let prev = self.state.prev_anchor.and_then(|id| self.path.get(id));
        match prev {
            Some(Anchor {
                point,
                from: Some(from),
                ..
            }) => Some(symmetric_point(*point, *from)),
            _ => {
                log::debug!("no handle to reflect at the start of a smooth curve");
                None
            }
        }
    }

    fn arc_to(&mut self, arc: &SvgArc) {
        if arc.is_empty() {
            return;
        }
        if arc.is_straight_line() {
            self.line_to(arc.to);
            return;
        }

        let curves = match arc_to_cubics(arc.from, arc.radii, arc.x_rotation, arc.flags, arc.to) {
            Some(curves) => curves,
            None => {
                log::debug!("could not fit an arc from {:?} to {:?}", arc.from, arc.to);
                self.line_to(arc.to);
                return;
            }
        };

        for curve in &curves {
            let n = self.normalize;
            self.cubic_to(Some(n.normalize(curve.ctrl1)), n.normalize(curve.ctrl2), curve.to);
        }
        self.state.current_point = arc.to;
    }

    fn close(&mut self) {
        if let Some(subpath) = self.state.subpath.take() {
            self.path.close_subpath(subpath);
        }
        self.state.current_point = self.state.subpath_start;
        self.state.prev_anchor = None;
    }
}

/// Build a path out of tokens.
pub fn build_path<N: Normalize>(tokens: &[Token], normalize: &N) -> Path {
    let mut path = Path::new();
    append_tokens(&mut path, tokens, normalize);

    path
}

/// Add the subpaths described by tokens to an existing path.
pub fn append_tokens<N: Normalize>(path: &mut Path, tokens: &[Token], normalize: &N) {
    let mut builder = PathBuilder::new(path, normalize);
    for token in tokens {
        builder.token(token);
    }
}

/// Parse path data into a path.
///
/// Nothing is built if the path data is malformed.
pub fn parse_path<N: Normalize>(d: &str, normalize: &N) -> Result<Path, ParseError> {
    let tokens = parse_path_data(d)?;

    Ok(build_path(&tokens, normalize))
}

#[cfg(test)]
use crate::export::to_path_data;
#[cfg(test)]
use quill_path::{MirrorMode, Winding};

#[cfg(test)]
fn anchors(path: &Path) -> Vec<Anchor> {
    path.subpath_ids()
        .flat_map(|id| path.subpath_anchors(id).cloned().collect::<Vec<_>>())
        .collect()
}

#[test]
fn example_path() {
    let path = parse_path(
        "M120.41 95.9L102.59 60.1C97.4 62.68 92.04 65.87 86.68 69.63C56.62 90.7 27.67 129.47 27.67 171.84Z",
        &Identity,
    )
    .unwrap();

    assert_eq!(path.num_subpaths(), 1);
    let anchors = self::anchors(&path);
    assert_eq!(anchors.len(), 4);
    assert_eq!(anchors[1].to, Some(point(97.4, 62.68)));
    assert_eq!(anchors[2].from, Some(point(92.04, 65.87)));
    assert_eq!(anchors[0].to, None);
    assert_eq!(anchors[1].from, None);
    assert!(path.subpath(SubpathId(0)).unwrap().is_closed());
}

#[test]
fn relative_commands() {
    let path = parse_path("m10 10 l5 0 h5 v5 c0 5 -5 5 -5 5 z m1 1 l1 0", &Identity).unwrap();
    assert_eq!(path.num_subpaths(), 2);

    let first: Vec<Point> = path.subpath_anchors(SubpathId(0)).map(|a| a.point).collect();
    assert_eq!(
        first,
        vec![point(10.0, 10.0), point(15.0, 10.0), point(20.0, 10.0), point(20.0, 15.0), point(15.0, 20.0)]
    );
    let last = path.subpath_anchors(SubpathId(0)).last().unwrap();
    assert_eq!(last.from, Some(point(15.0, 20.0)));

    // After a close the current point is the start of the closed subpath.
    let second: Vec<Point> = path.subpath_anchors(SubpathId(1)).map(|a| a.point).collect();
    assert_eq!(second, vec![point(11.0, 11.0), point(12.0, 11.0)]);
}

#[test]
fn closing_anchor_on_start_is_dropped() {
    let path = parse_path("M0 0 L10 0 L10 10 C5 10 0 5 0 0 Z", &Identity).unwrap();
    let subpath = path.subpath(SubpathId(0)).unwrap();
    assert_eq!(subpath.len(), 3);
    assert_eq!(subpath.winding(), Some(Winding::Positive));

    let start = &path[subpath.first().unwrap()];
    assert_eq!(start.from, Some(point(0.0, 5.0)));
    assert!(start.closed);
    assert_eq!(path[subpath.last().unwrap()].to, Some(point(5.0, 10.0)));
}

#[test]
fn closing_line_on_start_is_dropped() {
    let path = parse_path("M0 0 L10 0 L10 10 L0 0 Z", &Identity).unwrap();
    let subpath = path.subpath(SubpathId(0)).unwrap();
    assert_eq!(subpath.len(), 3);
    assert!(subpath.is_closed());
    let d = to_path_data(&path.build_commands());
    assert_eq!(d, "M0 0L10 0L10 10Z");

    let again = parse_path(&d, &Identity).unwrap();
    assert_eq!(to_path_data(&again.build_commands()), d);
}

#[test]
fn smooth_curves() {
    let path = parse_path("M0 0 C0 10 10 10 10 0 S20 -10 20 0", &Identity).unwrap();
    let anchors = self::anchors(&path);
    assert_eq!(anchors.len(), 3);
    assert_eq!(anchors[1].from, Some(point(10.0, 10.0)));
    assert_eq!(anchors[1].to, Some(point(10.0, -10.0)));
    assert_eq!(anchors[1].mirror, MirrorMode::MirrorAngleAndLength);

    // After a line the first control point is the current point.
    let path = parse_path("M0 0 L10 0 S20 10 20 0", &Identity).unwrap();
    let anchors = self::anchors(&path);
    assert_eq!(anchors[1].to, Some(point(10.0, 0.0)));
    assert_eq!(anchors[1].mirror, MirrorMode::NoMirror);
    assert_eq!(anchors[2].from, Some(point(20.0, 10.0)));
}

#[test]
fn smooth_curves_only_reflect_matching_curves() {
    // A quadratic handle isn't reflected by a cubic smooth curve.
    let path = parse_path("M0 0 Q50 100 100 0 S150 -100 200 0", &Identity).unwrap();
    let anchors = self::anchors(&path);
    assert_eq!(anchors.len(), 3);
    assert_eq!(anchors[1].to, Some(point(100.0, 0.0)));
    assert_eq!(anchors[2].from, Some(point(150.0, -100.0)));

    // Nor is a cubic handle by a quadratic one, which then draws a line.
    let path = parse_path("M0 0 C0 50 100 50 100 0 T200 0", &Identity).unwrap();
    let anchors = self::anchors(&path);
    assert_eq!(anchors.len(), 3);
    assert_eq!(anchors[1].to, None);
    assert_eq!(anchors[2].from, None);
    assert_eq!(anchors[2].point, point(200.0, 0.0));

    // Smooth quadratics chain.
    let path = parse_path("M0 0 Q5 10 10 0 T20 0 T30 0", &Identity).unwrap();
    let anchors = self::anchors(&path);
    assert_eq!(anchors[3].from, Some(point(25.0, 10.0)));
}

#[test]
fn quadratic_curves() {
    let path = parse_path("M0 0 Q5 10 10 0 T20 0", &Identity).unwrap();
    let anchors = self::anchors(&path);
    assert_eq!(anchors.len(), 3);
    assert_eq!(anchors[0].to, None);
    assert_eq!(anchors[1].from, Some(point(5.0, 10.0)));
    assert_eq!(anchors[2].from, Some(point(15.0, -10.0)));
}

#[test]
fn arcs_become_curves() {
    let path = parse_path("M0 0 A50 50 0 0 1 100 0", &Identity).unwrap();
    let anchors = self::anchors(&path);
    assert_eq!(anchors.len(), 3);
    assert_eq!(anchors[2].point, point(100.0, 0.0));
    // The joint between the two quadrants is smooth.
    assert_eq!(anchors[1].mirror, MirrorMode::MirrorAngleAndLength);
    assert!((anchors[1].point - point(50.0, -50.0)).length() < 1e-6);

    let path = parse_path("M0 0 A0 50 0 0 1 100 0", &Identity).unwrap();
    assert_eq!(self::anchors(&path).len(), 2);
}

#[test]
fn normalization() {
    let options = BuilderOptions::DEFAULT
        .with_scale(0.5)
        .with_precision(1)
        .with_offset(vector(100.0, 0.0));
    let path = parse_path("M1 1 l3 3 l3 3", &options).unwrap();
    let points: Vec<Point> = anchors(&path).iter().map(|a| a.point).collect();
    assert_eq!(
        points,
        vec![point(100.5, 0.5), point(102.0, 2.0), point(103.5, 3.5)]
    );
}

#[test]
fn malformed_input_builds_nothing() {
    assert!(parse_path("M0 0 L10", &Identity).is_err());
}
