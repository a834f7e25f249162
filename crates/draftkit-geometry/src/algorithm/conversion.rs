//! Conversions between shape representations.
//!
//! Arcs, circles and ellipses are sampled at the angular step chosen by
//! [`SamplingSettings`]; the sweep sign decides the travel direction.
//! Bézier forms of conics use pieces of at most a quarter turn.

use std::f64::consts::{FRAC_PI_2, TAU};

use tracing::debug;

use draftkit_core::{GeometryConfig, GeometryError, GeometryResult, SamplingSettings};

use crate::model::{
    Arc, BSpline, BezierSegment, Circle, CubicBezier, Degree, Ellipse, ParametricCurve, Polygon, Polyline, Shape,
    Vector,
};

fn step_count(sweep: f64, radius: f64, sampling: &SamplingSettings) -> usize {
    let step = sampling.angular_step(radius).max(1e-6);
    ((sweep.abs() / step).ceil() as usize).max(1)
}

/// Samples the arc from start to end, including both.
pub fn arc_to_polyline(arc: &Arc, sampling: &SamplingSettings) -> Polyline {
    let n = step_count(arc.sweep(), arc.radius, sampling);
    (0..=n).map(|i| arc.point_at(i as f64 / n as f64)).collect()
}

/// Counter-clockwise ring starting at angle zero.
pub fn circle_to_polygon(circle: &Circle, sampling: &SamplingSettings) -> Polygon {
    let n = step_count(TAU, circle.radius, sampling).max(3);
    (0..n)
        .map(|i| circle.point_at(TAU * i as f64 / n as f64))
        .collect()
}

/// Samples the arc window of an ellipse; a full ellipse closes on its start.
pub fn ellipse_to_polyline(ellipse: &Ellipse, sampling: &SamplingSettings) -> Polyline {
    let (t0, t1) = ellipse.domain();
    let radius = ellipse.lengtha().max(ellipse.lengthb());
    let n = step_count(t1 - t0, radius, sampling);
    (0..=n)
        .map(|i| ellipse.point_at(t0 + (t1 - t0) * i as f64 / n as f64))
        .collect()
}

pub fn ellipse_to_polygon(ellipse: &Ellipse, sampling: &SamplingSettings) -> Polygon {
    let radius = ellipse.lengtha().max(ellipse.lengthb());
    let n = step_count(TAU, radius, sampling).max(3);
    (0..n)
        .map(|i| ellipse.point_at(TAU * i as f64 / n as f64))
        .collect()
}

/// Cubic approximation of a circular sweep, one segment per quarter turn at most.
fn unit_arc_segments(center: Vector, radius: f64, start: f64, sweep: f64) -> Vec<BezierSegment> {
    let n = ((sweep.abs() / FRAC_PI_2).ceil() as usize).max(1);
    let piece = sweep / n as f64;
    let k = 4.0 / 3.0 * (piece / 4.0).tan();
    (0..n)
        .map(|i| {
            let a0 = start + piece * i as f64;
            let a1 = a0 + piece;
            let p0 = center + Vector::from_angle(a0) * radius;
            let p3 = center + Vector::from_angle(a1) * radius;
            let h0 = p0 + Vector::from_angle(a0).perpendicular() * (radius * k);
            let h1 = p3 - Vector::from_angle(a1).perpendicular() * (radius * k);
            BezierSegment::new(p0, h0, h1, p3)
        })
        .collect()
}

pub fn arc_to_bezier(arc: &Arc) -> CubicBezier {
    CubicBezier::from_segments(&unit_arc_segments(arc.center, arc.radius, arc.start_angle(), arc.sweep()))
}

/// Closed four-segment curve, counter-clockwise from angle zero.
pub fn circle_to_bezier(circle: &Circle) -> CubicBezier {
    CubicBezier::from_segments(&unit_arc_segments(circle.center, circle.radius, 0.0, TAU))
}

/// Unit-circle pieces mapped through the ellipse's affine frame, which keeps
/// the approximation exact up to the circle's own error.
pub fn ellipse_to_bezier(ellipse: &Ellipse) -> CubicBezier {
    let (t0, t1) = ellipse.domain();
    let frame = ellipse.unit_circle_transform();
    let segments: Vec<BezierSegment> = unit_arc_segments(Vector::ZERO, 1.0, t0, t1 - t0)
        .into_iter()
        .map(|s| BezierSegment {
            points: s.points.map(|p| frame.apply(p)),
        })
        .collect();
    CubicBezier::from_segments(&segments)
}

/// Cubic B-spline with the same control points; interior knots are tripled.
pub fn bezier_to_bspline(bezier: &CubicBezier) -> GeometryResult<BSpline> {
    let k = bezier.segment_count();
    let mut knots = vec![0.0; 4];
    for i in 1..k {
        let u = i as f64 / k as f64;
        knots.extend([u, u, u]);
    }
    knots.extend([1.0; 4]);
    BSpline::new(Degree::Cubic, bezier.control_points().to_vec(), knots)
}

/// Bézier decomposition of a B-spline.
///
/// Every distinct knot in the domain is raised to multiplicity `degree`, which
/// leaves each span an independent Bézier piece. Quadratic pieces are degree
/// elevated.
pub fn bspline_to_bezier(spline: &BSpline) -> GeometryResult<CubicBezier> {
    let p = spline.degree().value();
    let mut refined = spline.clone();
    let (t0, t1) = refined.domain();
    let mut distinct: Vec<f64> = spline
        .knots()
        .iter()
        .copied()
        .filter(|k| *k >= t0 && *k <= t1)
        .collect();
    distinct.dedup_by(|a, b| (*a - *b).abs() <= 1e-12);
    for u in distinct {
        while refined.multiplicity(u) < p {
            refined.insert_knot(u)?;
        }
    }

    let knots = refined.knots();
    let cps = refined.control_points();
    let n = cps.len();
    let mut segments = Vec::new();
    for k in p..n {
        if knots[k + 1] <= knots[k] {
            continue;
        }
        let piece = &cps[k - p..=k];
        let segment = match spline.degree() {
            Degree::Cubic => BezierSegment::new(piece[0], piece[1], piece[2], piece[3]),
            Degree::Quadratic => {
                let (q0, q1, q2) = (piece[0], piece[1], piece[2]);
                BezierSegment::new(q0, q0 + (q1 - q0) * (2.0 / 3.0), q2 + (q1 - q2) * (2.0 / 3.0), q2)
            }
        };
        segments.push(segment);
    }
    if segments.is_empty() {
        return Err(GeometryError::degenerate("B-spline has no non-empty knot span"));
    }
    debug!(segments = segments.len(), "B-spline decomposed into Bézier segments");
    Ok(CubicBezier::from_segments(&segments))
}

/// Closed polygon for shapes that bound an area.
///
/// Polylines qualify when their ends meet within `point_merge`.
pub fn shape_to_polygon(shape: &Shape, cfg: &GeometryConfig) -> Option<Polygon> {
    match shape {
        Shape::Polygon(p) => Some(p.clone()),
        Shape::Rect(r) => Some(Polygon::from_rect(r)),
        Shape::Triangle(t) => Some(Polygon::from_triangle(t)),
        Shape::Circle(c) => Some(circle_to_polygon(c, &cfg.sampling)),
        Shape::Ellipse(e) if !e.is_arc() => Some(ellipse_to_polygon(e, &cfg.sampling)),
        Shape::Polyline(pl) => closed_chain(pl.points(), cfg),
        Shape::Bezier(b) => closed_chain(b.shape().points(), cfg),
        Shape::BSpline(b) => closed_chain(b.shape().points(), cfg),
        _ => None,
    }
}

fn closed_chain(points: &[Vector], cfg: &GeometryConfig) -> Option<Polygon> {
    match (points.first(), points.last()) {
        (Some(a), Some(b)) if points.len() >= 4 && a.approx_eq(b, cfg.tolerance.point_merge) => {
            Some(Polygon::new(points.to_vec()))
        }
        _ => None,
    }
}

/// Open polyline tracing the outline; closed shapes repeat their first point.
pub fn shape_to_polyline(shape: &Shape, cfg: &GeometryConfig) -> Polyline {
    match shape {
        Shape::Point(p) => Polyline::new(vec![*p]),
        Shape::Line(l) => Polyline::new(vec![l.front, l.back]),
        Shape::Polyline(p) => p.clone(),
        Shape::Arc(a) => arc_to_polyline(a, &cfg.sampling),
        Shape::Ellipse(e) => ellipse_to_polyline(e, &cfg.sampling),
        Shape::Bezier(b) => b.shape().clone(),
        Shape::BSpline(b) => b.shape().clone(),
        _ => shape_to_polygon(shape, cfg).map_or_else(Polyline::default, |p| p.to_closed_polyline()),
    }
}

/// Outline vertices without the repeated closing point.
pub fn shape_outline(shape: &Shape, cfg: &GeometryConfig) -> Vec<Vector> {
    match shape {
        Shape::Point(p) => vec![*p],
        Shape::Line(l) => vec![l.front, l.back],
        Shape::Polyline(p) => p.points().to_vec(),
        Shape::Polygon(p) => p.points().to_vec(),
        Shape::Rect(r) => r.corners().to_vec(),
        Shape::Triangle(t) => t.points().to_vec(),
        Shape::Circle(c) => circle_to_polygon(c, &cfg.sampling).into_points(),
        Shape::Ellipse(e) if !e.is_arc() => ellipse_to_polygon(e, &cfg.sampling).into_points(),
        _ => shape_to_polyline(shape, cfg).into_points(),
    }
}
