//! Approximation of the offset of a cubic bézier curve.
//!
//! Each piece is offset with the Tiller-Hanson construction: the edges of the
//! control polygon are moved along their normals and the new control points
//! are placed where consecutive moved edges intersect. Pieces whose offset
//! strays from the exact one by more than the tolerance are split in half.

use quill_path::geom::utils::normal;
use quill_path::geom::{CubicBezierSegment, Line};

const MAX_DEPTH: u32 = 6;

/// Offset a curve by `distance` along its normal.
///
/// Positive distances move towards `(-tangent.y, tangent.x)`. The result is
/// empty if the curve has no direction at all.
pub fn offset_cubic(
    curve: &CubicBezierSegment,
    distance: f64,
    tolerance: f64,
) -> Vec<CubicBezierSegment> {
    let mut output = Vec::new();
    if curve.tangent(0.0).is_none() {
        return output;
    }

    offset_recursive(curve, distance, tolerance.max(1e-4), 0, &mut output);

    // Consecutive pieces share their endpoints.
    for i in 1..output.len() {
        let p = output[i - 1].to;
        let next = &mut output[i];
        next.ctrl1 += p - next.from;
        next.from = p;
    }

    output
}

fn offset_recursive(
    curve: &CubicBezierSegment,
    distance: f64,
    tolerance: f64,
    depth: u32,
    output: &mut Vec<CubicBezierSegment>,
) {
    if let Some(piece) = offset_piece(curve, distance) {
        if depth >= MAX_DEPTH || offset_error(curve, &piece, distance) <= tolerance {
            output.push(piece);
            return;
        }
    } else if depth >= MAX_DEPTH {
        return;
    }

    let (a, b) = curve.split(0.5);
    offset_recursive(&a, distance, tolerance, depth + 1, output);
    offset_recursive(&b, distance, tolerance, depth + 1, output);
}

fn offset_piece(curve: &CubicBezierSegment, distance: f64) -> Option<CubicBezierSegment> {
    let start_tangent = curve.tangent(0.0)?;
    let end_tangent = curve.tangent(1.0)?;
    let n0 = normal(start_tangent)?;
    let n3 = normal(end_tangent)?;

    let from = curve.from + n0 * distance;
    let to = curve.to + n3 * distance;
    let mut ctrl1 = curve.ctrl1 + n0 * distance;
    let mut ctrl2 = curve.ctrl2 + n3 * distance;

    let middle = curve.ctrl2 - curve.ctrl1;
    if let Some(n1) = normal(middle) {
        let middle_line = Line {
            point: curve.ctrl1 + n1 * distance,
            vector: middle,
        };
        // Nearly parallel edges meet far away, keep the translated points then.
        let reach = 4.0 * (distance.abs() + (curve.to - curve.from).length());
        let start_line = Line {
            point: from,
            vector: start_tangent,
        };
        if let Some(p) = start_line.intersection(&middle_line) {
            if (p - ctrl1).length() < reach {
                ctrl1 = p;
            }
        }
        let end_line = Line {
            point: to,
            vector: end_tangent,
        };
        if let Some(p) = end_line.intersection(&middle_line) {
            if (p - ctrl2).length() < reach {
                ctrl2 = p;
            }
        }
    }

    Some(CubicBezierSegment {
        from,
        ctrl1,
        ctrl2,
        to,
    })
}

fn offset_error(curve: &CubicBezierSegment, piece: &CubicBezierSegment, distance: f64) -> f64 {
    let mut error: f64 = 0.0;
    for &t in &[0.25, 0.5, 0.75] {
        let n = match normal(curve.derivative(t)) {
            Some(n) => n,
            None => continue,
        };
        let expected = curve.sample(t) + n * distance;
        error = error.max((piece.sample(t) - expected).length());
    }

    error
}

#[cfg(test)]
use quill_path::math::point;

#[test]
fn offset_of_a_straight_curve() {
    let curve = CubicBezierSegment::from_line(point(0.0, 0.0), point(10.0, 0.0));
    let pieces = offset_cubic(&curve, 2.0, 0.1);
    assert_eq!(pieces.len(), 1);
    assert!((pieces[0].from - point(0.0, 2.0)).length() < 1e-9);
    assert!((pieces[0].to - point(10.0, 2.0)).length() < 1e-9);

    let pieces = offset_cubic(&curve, -2.0, 0.1);
    assert!((pieces[0].from - point(0.0, -2.0)).length() < 1e-9);
}

#[test]
fn offset_of_a_quarter_circle() {
    let k = quill_path::geom::arc::CIRCLE_QUADRANT_RATIO;
    let r = 50.0;
    let curve = CubicBezierSegment {
        from: point(r, 0.0),
        ctrl1: point(r, r * k),
        ctrl2: point(r * k, r),
        to: point(0.0, r),
    };

    // The normal of a clockwise turn points towards the center.
    for &(distance, expected_radius) in &[(10.0, 40.0), (-10.0, 60.0)] {
        let pieces = offset_cubic(&curve, distance, 0.05);
        assert!(!pieces.is_empty());
        for piece in &pieces {
            for i in 0..=8 {
                let p = piece.sample(i as f64 / 8.0);
                assert!((p.to_vector().length() - expected_radius).abs() < 0.2);
            }
        }
        assert!((pieces[0].from - point(expected_radius, 0.0)).length() < 1e-9);
        assert!((pieces[pieces.len() - 1].to - point(0.0, expected_radius)).length() < 1e-9);
    }
}

#[test]
fn offset_of_a_point() {
    let p = point(1.0, 1.0);
    let curve = CubicBezierSegment {
        from: p,
        ctrl1: p,
        ctrl2: p,
        to: p,
    };
    assert!(offset_cubic(&curve, 1.0, 0.1).is_empty());
}
