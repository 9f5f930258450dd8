//! Construction of the outline of a stroked anchor sequence.
//!
//! Every segment between two consecutive anchors is offset on both sides of
//! the centerline, giving a forward and a back rail. Where two segments meet,
//! the rails of each side are trimmed at their intersection, or connected with
//! a bridge shaped by the line join when they don't intersect close enough to
//! the joint. Open sequences then get a cap at each end.

use crate::curve::{CurveSegment, OutlineCurve, RailRole};
use crate::offset::offset_cubic;
use crate::options::OutlineOptions;

use quill_path::geom::arc::{circle_arc_to_cubics, CIRCLE_QUADRANT_RATIO};
use quill_path::geom::utils::{fuzzy_eq_point, normal};
use quill_path::geom::{ArcFlags, CubicBezierSegment, Line, LineSegment, Segment, EPSILON};
use quill_path::math::{Point, Vector};
use quill_path::{Anchor, Handle, LineCap, LineJoin, Path};

use arrayvec::ArrayVec;

/// A closed loop of outline curves, each curve starting where the previous
/// one ends.
pub type Contour = Vec<OutlineCurve>;

// Number of chords used to look for intersections between two curves.
const INTERSECTION_SAMPLES: u32 = 16;

// The offset rails of one segment, both walked in the direction of the path.
struct SegmentOutline {
    start: Point,
    end: Point,
    start_tangent: Vector,
    end_tangent: Vector,
    forward: Vec<CurveSegment>,
    back: Vec<CurveSegment>,
}

fn segment_outline(
    current: &Anchor,
    next: &Anchor,
    options: &OutlineOptions,
) -> Option<SegmentOutline> {
    let width = options.width;

    if current.is_linear_to(next) {
        let direction = next.point - current.point;
        let n = normal(direction)? * width;
        let tangent = direction.normalize();
        return Some(SegmentOutline {
            start: current.point,
            end: next.point,
            start_tangent: tangent,
            end_tangent: tangent,
            forward: vec![CurveSegment::line(current.point + n, next.point + n)],
            back: vec![CurveSegment::line(current.point - n, next.point - n)],
        });
    }

    let curve = current.curve_to(next);
    let start_tangent = curve.tangent(0.0)?.normalize();
    let end_tangent = curve.tangent(1.0)?.normalize();
    let forward: Vec<CurveSegment> = offset_cubic(&curve, width, options.tolerance)
        .into_iter()
        .map(CurveSegment::Cubic)
        .collect();
    let back: Vec<CurveSegment> = offset_cubic(&curve, -width, options.tolerance)
        .into_iter()
        .map(CurveSegment::Cubic)
        .collect();

    if forward.is_empty() || back.is_empty() {
        return None;
    }

    Some(SegmentOutline {
        start: current.point,
        end: next.point,
        start_tangent,
        end_tangent,
        forward,
        back,
    })
}

/// Build the outline of a sequence of anchors.
///
/// Open sequences give a single contour: start cap, forward rail, end cap and
/// the back rail walked backwards. Closed sequences give the forward rail loop
/// followed by the back rail loop walked backwards. Hidden and virtual anchors
/// must be filtered out by the caller, see [`Path::visible_anchors`].
///
/// The result is empty when no segment has a length.
pub fn build_outline(anchors: &[&Anchor], closed: bool, options: &OutlineOptions) -> Vec<Contour> {
    let mut segments = Vec::with_capacity(anchors.len());
    for pair in anchors.windows(2) {
        match segment_outline(pair[0], pair[1], options) {
            Some(segment) => segments.push(segment),
            None => log::debug!("skipping degenerate segment at {:?}", pair[0].point),
        }
    }
    if closed && anchors.len() > 1 {
        if let (Some(last), Some(first)) = (anchors.last(), anchors.first()) {
            if let Some(segment) = segment_outline(last, first, options) {
                segments.push(segment);
            }
        }
    }

    if segments.is_empty() {
        return Vec::new();
    }

    let count = segments.len();
    let joints = if closed && count > 1 { count } else { count - 1 };
    for i in 0..joints {
        let j = (i + 1) % count;
        let (a, b) = pair_mut(&mut segments, i, j);
        // Positive when the path turns towards the forward rail, which is then
        // on the inside of the turn.
        let turn = a.end_tangent.cross(b.start_tangent);
        let pivot = a.end;
        resolve_joint(&mut a.forward, &mut b.forward, pivot, turn < 0.0, options);
        resolve_joint(&mut a.back, &mut b.back, pivot, turn > 0.0, options);
    }

    if closed {
        let forward: Contour = segments
            .iter()
            .flat_map(|s| s.forward.iter())
            .map(|c| OutlineCurve::new(*c, RailRole::Forward))
            .collect();
        let back: Contour = segments
            .iter()
            .rev()
            .flat_map(|s| s.back.iter().rev())
            .map(|c| OutlineCurve::new(c.flip(), RailRole::Back))
            .collect();

        return vec![forward, back];
    }

    let mut contour = Contour::new();
    let first = &segments[0];
    let last = &segments[count - 1];

    if let (Some(back), Some(forward)) = (first.back.first(), first.forward.first()) {
        let start_cap = cap(
            options.start_cap,
            back.from(),
            forward.from(),
            first.start,
            -first.start_tangent,
            options.width,
        );
        for c in start_cap {
            contour.push(OutlineCurve::new(c, RailRole::Cap));
        }
    }
    for segment in &segments {
        for c in &segment.forward {
            contour.push(OutlineCurve::new(*c, RailRole::Forward));
        }
    }
    if let (Some(forward), Some(back)) = (last.forward.last(), last.back.last()) {
        let end_cap = cap(
            options.end_cap,
            forward.to(),
            back.to(),
            last.end,
            last.end_tangent,
            options.width,
        );
        for c in end_cap {
            contour.push(OutlineCurve::new(c, RailRole::Cap));
        }
    }
    for segment in segments.iter().rev() {
        for c in segment.back.iter().rev() {
            contour.push(OutlineCurve::new(c.flip(), RailRole::Back));
        }
    }

    vec![contour]
}

fn pair_mut<T>(items: &mut [T], i: usize, j: usize) -> (&mut T, &mut T) {
    if i < j {
        let (left, right) = items.split_at_mut(j);
        (&mut left[i], &mut right[0])
    } else {
        let (left, right) = items.split_at_mut(i);
        (&mut right[0], &mut left[j])
    }
}

// Connect the trailing rail `a` of a segment to the leading rail `b` of the
// next one, meeting around `pivot`.
fn resolve_joint(
    a: &mut Vec<CurveSegment>,
    b: &mut Vec<CurveSegment>,
    pivot: Point,
    outer: bool,
    options: &OutlineOptions,
) {
    let (start, end) = match (a.last(), b.first()) {
        (Some(last), Some(first)) => (last.to(), first.from()),
        _ => return,
    };

    if fuzzy_eq_point(start, end, EPSILON) {
        if let Some(first) = b.first_mut() {
            first.set_from(start);
        }
        return;
    }

    if let Some(((i, t), (j, u))) = rail_intersection(a, b, options.trim_search_fraction) {
        a.truncate(i + 1);
        b.drain(..j);
        if let (Some(last), Some(first)) = (a.last_mut(), b.first_mut()) {
            *last = last.before_split(t);
            *first = first.after_split(u);
            first.set_from(last.to());
        }
        return;
    }

    log::debug!("rails don't meet at {:?}, bridging", pivot);
    let bridge = match (a.last(), b.first()) {
        (Some(last), Some(first)) if outer => join_bridge(last, first, pivot, options),
        _ => vec![CurveSegment::line(start, pivot), CurveSegment::line(pivot, end)],
    };
    a.extend(bridge);
}

// Find where the end of rail `a` crosses the start of rail `b`.
//
// Rails are parametrized by piece index and only the `fraction` of each rail
// closest to the joint is searched. The crossing nearest to the end of `a` is
// returned as (piece, t) pairs.
fn rail_intersection(
    a: &[CurveSegment],
    b: &[CurveSegment],
    fraction: f64,
) -> Option<((usize, f64), (usize, f64))> {
    let fraction = fraction.max(0.0).min(1.0);
    let a_start = (1.0 - fraction) * a.len() as f64;
    let b_end = fraction * b.len() as f64;

    for (i, piece_a) in a.iter().enumerate().rev() {
        let lo = (a_start - i as f64).max(0.0);
        if lo >= 1.0 {
            break;
        }
        for (j, piece_b) in b.iter().enumerate() {
            let hi = (b_end - j as f64).min(1.0);
            if hi <= 0.0 {
                break;
            }
            if let Some((t, u)) = piece_intersection(piece_a, lo, piece_b, hi) {
                return Some(((i, t), (j, u)));
            }
        }
    }

    None
}

// Intersection of `a` restricted to `[lo, 1]` with `b` restricted to `[0, hi]`,
// preferring the one closest to the end of `a`.
fn piece_intersection(a: &CurveSegment, lo: f64, b: &CurveSegment, hi: f64) -> Option<(f64, f64)> {
    match (a, b) {
        (CurveSegment::Line(la), CurveSegment::Line(lb)) => la
            .intersection_t(lb)
            .filter(|&(t, u)| t >= lo && u <= hi),
        (CurveSegment::Line(la), CurveSegment::Cubic(cb)) => cb
            .split_range(0.0..hi)
            .line_segment_intersections_t(la, INTERSECTION_SAMPLES)
            .iter()
            .filter(|&&(_, t)| t >= lo)
            .map(|&(u, t)| (t, u * hi))
            .fold(None, closest_to_end),
        (CurveSegment::Cubic(ca), CurveSegment::Line(lb)) => ca
            .split_range(lo..1.0)
            .line_segment_intersections_t(lb, INTERSECTION_SAMPLES)
            .iter()
            .filter(|&&(_, u)| u <= hi)
            .map(|&(t, u)| (lo + t * (1.0 - lo), u))
            .fold(None, closest_to_end),
        (CurveSegment::Cubic(ca), CurveSegment::Cubic(cb)) => {
            chord_intersection(ca, lo, cb, hi)
        }
    }
}

fn closest_to_end(best: Option<(f64, f64)>, hit: (f64, f64)) -> Option<(f64, f64)> {
    match best {
        Some(b) if b.0 >= hit.0 => Some(b),
        _ => Some(hit),
    }
}

fn chord_intersection(
    a: &CubicBezierSegment,
    lo: f64,
    b: &CubicBezierSegment,
    hi: f64,
) -> Option<(f64, f64)> {
    let a_points = a.split_range(lo..1.0).flattened_points(INTERSECTION_SAMPLES);
    let b_points = b.split_range(0.0..hi).flattened_points(INTERSECTION_SAMPLES);
    let a_step = (1.0 - lo) / (a_points.len() - 1) as f64;
    let b_step = hi / (b_points.len() - 1) as f64;

    let mut best = None;
    for (i, wa) in a_points.windows(2).enumerate() {
        let chord_a = LineSegment {
            from: wa[0],
            to: wa[1],
        };
        for (j, wb) in b_points.windows(2).enumerate() {
            let chord_b = LineSegment {
                from: wb[0],
                to: wb[1],
            };
            if let Some((ta, tb)) = chord_a.intersection_t(&chord_b) {
                let hit = (lo + (i as f64 + ta) * a_step, (j as f64 + tb) * b_step);
                best = closest_to_end(best, hit);
            }
        }
    }

    best
}

// Bridge between the ends of two rails on the outer side of a turn.
fn join_bridge(
    a: &CurveSegment,
    b: &CurveSegment,
    pivot: Point,
    options: &OutlineOptions,
) -> Vec<CurveSegment> {
    let (start, end) = (a.to(), b.from());
    let bevel = vec![CurveSegment::line(start, end)];

    match options.line_join {
        LineJoin::Bevel => bevel,
        LineJoin::Round => {
            let radius = (start - pivot).length();
            let flags = ArcFlags {
                large_arc: false,
                sweep: (start - pivot).cross(end - pivot) > 0.0,
            };
            match circle_arc_to_cubics(start, end, radius, flags) {
                Some(curves) => curves.into_iter().map(CurveSegment::Cubic).collect(),
                None => bevel,
            }
        }
        LineJoin::Miter => {
            let miter = match (a.end_tangent(), b.start_tangent()) {
                (Some(ta), Some(tb)) => Line {
                    point: start,
                    vector: ta,
                }
                .intersection(&Line {
                    point: end,
                    vector: tb,
                }),
                _ => None,
            };
            match miter {
                Some(m) if (m - pivot).length() <= options.miter_limit * options.width => {
                    vec![CurveSegment::line(start, m), CurveSegment::line(m, end)]
                }
                _ => bevel,
            }
        }
    }
}

// Quarter of a circle from `a` to `b`, both at the same distance from `center`
// and perpendicular to each other.
fn quarter_arc(center: Point, a: Point, b: Point) -> CubicBezierSegment {
    CubicBezierSegment {
        from: a,
        ctrl1: a + (b - center) * CIRCLE_QUADRANT_RATIO,
        ctrl2: b + (a - center) * CIRCLE_QUADRANT_RATIO,
        to: b,
    }
}

// Cap from `from` to `to` around the end of the centerline at `center`,
// extending in `direction` (a unit vector).
fn cap(
    kind: LineCap,
    from: Point,
    to: Point,
    center: Point,
    direction: Vector,
    width: f64,
) -> ArrayVec<CurveSegment, 3> {
    let mut output = ArrayVec::new();
    match kind {
        LineCap::Butt => {
            output.push(CurveSegment::line(from, to));
        }
        LineCap::Square => {
            let extension = direction * width;
            output.push(CurveSegment::line(from, from + extension));
            output.push(CurveSegment::line(from + extension, to + extension));
            output.push(CurveSegment::line(to + extension, to));
        }
        LineCap::Round => {
            let tip = center + direction * width;
            output.push(CurveSegment::Cubic(quarter_arc(center, from, tip)));
            output.push(CurveSegment::Cubic(quarter_arc(center, tip, to)));
        }
    }

    output
}

/// Outline of every subpath of a path.
pub fn outline_path(path: &Path, options: &OutlineOptions) -> Vec<Contour> {
    let mut contours = Vec::new();
    for id in path.subpath_ids() {
        let closed = path.subpath(id).map_or(false, |sp| sp.is_closed());
        let anchors = path.visible_anchors(id);
        contours.extend(build_outline(&anchors, closed, options));
    }

    contours
}

/// Turn outline contours into a path with one closed subpath per contour, so
/// that the outline can be filled.
pub fn outline_to_path(contours: &[Contour]) -> Path {
    let mut path = Path::new();
    for contour in contours {
        let first = match contour.first() {
            Some(first) => first,
            None => continue,
        };

        let (subpath, mut last) = path.begin_subpath(first.segment.from());
        for curve in contour {
            let id = match curve.segment {
                CurveSegment::Line(line) => {
                    if fuzzy_eq_point(line.from, line.to, EPSILON) {
                        continue;
                    }
                    path.append_anchor(subpath, Anchor::new(line.to))
                }
                CurveSegment::Cubic(c) => {
                    path.set_handle(last, Handle::To, c.ctrl1);
                    path.append_anchor(subpath, Anchor::with_handles(c.to, Some(c.ctrl2), None))
                }
            };
            if let Some(id) = id {
                last = id;
            }
        }
        path.close_subpath(subpath);
    }

    path
}

#[cfg(test)]
use quill_path::math::point;

#[cfg(test)]
fn anchors(points: &[(f64, f64)]) -> Vec<Anchor> {
    points.iter().map(|&(x, y)| Anchor::new(point(x, y))).collect()
}

#[cfg(test)]
fn is_continuous(contour: &Contour) -> bool {
    let n = contour.len();
    (0..n).all(|i| {
        let next = &contour[(i + 1) % n];
        fuzzy_eq_point(contour[i].segment.to(), next.segment.from(), 1e-6)
    })
}

#[cfg(test)]
fn has_point(contour: &Contour, p: Point) -> bool {
    contour
        .iter()
        .any(|c| fuzzy_eq_point(c.segment.to(), p, 1e-6))
}

#[test]
fn straight_segment_is_a_rectangle() {
    let anchors = anchors(&[(0.0, 0.0), (100.0, 0.0)]);
    let refs: Vec<&Anchor> = anchors.iter().collect();
    let contours = build_outline(&refs, false, &OutlineOptions::width(10.0));
    assert_eq!(contours.len(), 1);

    let contour = &contours[0];
    assert_eq!(contour.len(), 4);
    assert!(contour.iter().all(|c| c.segment.is_line()));
    assert!(is_continuous(contour));

    let roles: Vec<RailRole> = contour.iter().map(|c| c.role).collect();
    assert_eq!(
        roles,
        vec![
            RailRole::Cap,
            RailRole::Forward,
            RailRole::Cap,
            RailRole::Back
        ]
    );

    assert!(fuzzy_eq_point(contour[0].segment.from(), point(0.0, -10.0), 1e-9));
    assert!(fuzzy_eq_point(contour[1].segment.from(), point(0.0, 10.0), 1e-9));
    assert!(fuzzy_eq_point(contour[1].segment.to(), point(100.0, 10.0), 1e-9));
    assert!(fuzzy_eq_point(contour[3].segment.from(), point(100.0, -10.0), 1e-9));

    let path = outline_to_path(&contours);
    let bounds = path.bounding_box().unwrap();
    assert!((bounds.width() - 100.0).abs() < 1e-9);
    assert!((bounds.height() - 20.0).abs() < 1e-9);
}

#[test]
fn caps() {
    let anchors = anchors(&[(0.0, 0.0), (100.0, 0.0)]);
    let refs: Vec<&Anchor> = anchors.iter().collect();

    let options = OutlineOptions::width(10.0).with_line_cap(LineCap::Round);
    let contour = &build_outline(&refs, false, &options)[0];
    assert_eq!(contour.len(), 6);
    assert!(is_continuous(contour));
    assert!(has_point(contour, point(-10.0, 0.0)));
    assert!(has_point(contour, point(110.0, 0.0)));
    for curve in contour.iter().filter(|c| !c.is_rail()) {
        let mid = curve.segment.sample(0.5);
        let center = if mid.x < 50.0 { point(0.0, 0.0) } else { point(100.0, 0.0) };
        assert!(((mid - center).length() - 10.0).abs() < 0.01);
    }

    let options = OutlineOptions::width(10.0).with_line_cap(LineCap::Square);
    let contour = &build_outline(&refs, false, &options)[0];
    assert_eq!(contour.len(), 8);
    assert!(is_continuous(contour));
    assert!(has_point(contour, point(-10.0, 10.0)));
    assert!(has_point(contour, point(110.0, -10.0)));
}

#[test]
fn joins() {
    let anchors = anchors(&[(0.0, 0.0), (100.0, 0.0), (100.0, 100.0)]);
    let refs: Vec<&Anchor> = anchors.iter().collect();

    // The forward rails are inside the turn and get trimmed.
    let contour = &build_outline(&refs, false, &OutlineOptions::width(10.0))[0];
    assert!(is_continuous(contour));
    assert!(has_point(contour, point(90.0, 10.0)));
    assert!(has_point(contour, point(110.0, -10.0)));

    let options = OutlineOptions::width(10.0).with_line_join(LineJoin::Bevel);
    let contour = &build_outline(&refs, false, &options)[0];
    assert!(is_continuous(contour));
    assert!(!has_point(contour, point(110.0, -10.0)));
    assert!(contour.iter().any(|c| {
        c.segment.is_line()
            && fuzzy_eq_point(c.segment.from(), point(110.0, 0.0), 1e-6)
            && fuzzy_eq_point(c.segment.to(), point(100.0, -10.0), 1e-6)
    }));

    let options = OutlineOptions::width(10.0).with_line_join(LineJoin::Round);
    let contour = &build_outline(&refs, false, &options)[0];
    assert!(is_continuous(contour));
    let arc: Vec<&OutlineCurve> = contour.iter().filter(|c| c.is_rail() && !c.segment.is_line()).collect();
    assert!(!arc.is_empty());
    for c in arc {
        let mid = c.segment.sample(0.5);
        assert!(((mid - point(100.0, 0.0)).length() - 10.0).abs() < 0.01);
    }

    // A sharp turn exceeds the miter limit and falls back to a bevel.
    let anchors = self::anchors(&[(0.0, 0.0), (100.0, 0.0), (0.0, 5.0)]);
    let refs: Vec<&Anchor> = anchors.iter().collect();
    let contour = &build_outline(&refs, false, &OutlineOptions::width(10.0))[0];
    assert!(is_continuous(contour));
    assert!(contour.iter().all(|c| c.segment.to().x < 150.0));
}

#[test]
fn line_meets_curve() {
    let mut anchors = anchors(&[(0.0, 0.0), (100.0, 0.0), (200.0, 100.0)]);
    anchors[1].to = Some(point(100.0, 50.0));
    anchors[2].from = Some(point(150.0, 100.0));
    let refs: Vec<&Anchor> = anchors.iter().collect();

    let contour = &build_outline(&refs, false, &OutlineOptions::width(10.0))[0];
    assert!(is_continuous(contour));

    // The straight forward rail is cut where it crosses the curved one.
    let line = contour[1].segment;
    assert!(line.is_line());
    assert!((line.to().y - 10.0).abs() < 1e-6);
    assert!(line.to().x > 85.0 && line.to().x < 95.0);
    assert!(!contour[2].segment.is_line());
    assert_eq!(contour[2].role, RailRole::Forward);

    // Every rail curve stays at the stroke width from the centerline.
    let centerline = refs[1].curve_to(refs[2]);
    for c in contour.iter().filter(|c| c.is_rail() && !c.segment.is_line()) {
        let p = c.segment.sample(0.5);
        let (_, distance) = centerline.closest_t(p, 12.0).unwrap();
        assert!((distance - 10.0).abs() < 0.5);
    }
}

#[test]
fn closed_outline() {
    let anchors = anchors(&[(0.0, 0.0), (100.0, 0.0), (100.0, 100.0), (0.0, 100.0)]);
    let refs: Vec<&Anchor> = anchors.iter().collect();
    let contours = build_outline(&refs, true, &OutlineOptions::width(5.0));
    assert_eq!(contours.len(), 2);

    let outer = &contours[1];
    let inner = &contours[0];
    assert!(is_continuous(outer));
    assert!(is_continuous(inner));
    assert!(outer.iter().all(|c| c.role == RailRole::Back));
    assert!(inner.iter().all(|c| c.role == RailRole::Forward));

    for &p in &[(5.0, 5.0), (95.0, 5.0), (95.0, 95.0), (5.0, 95.0)] {
        assert!(has_point(inner, point(p.0, p.1)));
    }
    for &p in &[(-5.0, -5.0), (105.0, -5.0), (105.0, 105.0), (-5.0, 105.0)] {
        assert!(has_point(outer, point(p.0, p.1)));
    }

    let path = outline_to_path(&contours);
    assert_eq!(path.num_subpaths(), 2);
    let bounds = path.bounding_box().unwrap();
    assert!((bounds.width() - 110.0).abs() < 1e-9);
}

#[test]
fn degenerate_input() {
    let options = OutlineOptions::DEFAULT;
    let single = anchors(&[(1.0, 1.0)]);
    let refs: Vec<&Anchor> = single.iter().collect();
    assert!(build_outline(&refs, false, &options).is_empty());

    let same = anchors(&[(1.0, 1.0), (1.0, 1.0)]);
    let refs: Vec<&Anchor> = same.iter().collect();
    assert!(build_outline(&refs, true, &options).is_empty());

    assert!(build_outline(&[], false, &options).is_empty());
}
