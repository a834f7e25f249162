//! Perpendicular foot points.

use std::f64::consts::PI;

use tracing::trace;

use draftkit_core::{GeometryConfig, EPSILON};

use super::poly::solve_polynomial;
use super::search::find_roots;
use crate::model::{Arc, Circle, Ellipse, Line, ParametricCurve, Shape, Vector};

/// Orthogonal projection of `p` on `line`.
///
/// With `infinite` unset a projection outside the segment yields `None`. A
/// zero-length line projects everything onto its single point.
pub fn foot_point(p: &Vector, line: &Line, infinite: bool) -> Option<Vector> {
    if line.is_degenerate() {
        return Some(line.front);
    }
    let t = line.project(p);
    if !infinite && !(-EPSILON..=1.0 + EPSILON).contains(&t) {
        return None;
    }
    Some(line.point_at(t))
}

fn chain_feet(p: &Vector, points: &[Vector], closed: bool) -> Vec<Vector> {
    let n = points.len();
    let edges = if closed && n >= 3 { n } else { n.saturating_sub(1) };
    (0..edges)
        .filter_map(|i| foot_point(p, &Line::new(points[i], points[(i + 1) % n]), false))
        .collect()
}

pub fn circle_feet(p: &Vector, circle: &Circle) -> Vec<Vector> {
    let d = *p - circle.center;
    if d.length() <= EPSILON {
        return Vec::new();
    }
    let u = d.normalized() * circle.radius;
    vec![circle.center + u, circle.center - u]
}

pub fn arc_feet(p: &Vector, arc: &Arc) -> Vec<Vector> {
    circle_feet(p, &arc.circle())
        .into_iter()
        .filter(|q| arc.contains_angle((*q - arc.center).angle(), 1e-12))
        .collect()
}

/// Parametric angles of the feet on an ellipse.
///
/// In the principal frame the condition `(p − x(t))·x'(t) = 0` becomes a
/// quartic in `z = tan(t / 2)`; `t = π` is checked separately.
pub fn ellipse_foot_parameters(p: &Vector, ellipse: &Ellipse) -> Vec<f64> {
    let c = ellipse.center();
    let [_, a1, _, b1] = ellipse.axis_points();
    let (a, b) = (ellipse.lengtha(), ellipse.lengthb());
    if a <= EPSILON || b <= EPSILON {
        return Vec::new();
    }
    let ua = (a1 - c) / a;
    let ub = (b1 - c) / b;
    let d = *p - c;
    let (u, v) = (d.dot(&ua), d.dot(&ub));
    let k = a * a - b * b;

    let coeffs = [-v * b, -2.0 * k - 2.0 * u * a, 0.0, 2.0 * k - 2.0 * u * a, v * b];
    let mut params: Vec<f64> = solve_polynomial(&coeffs)
        .into_iter()
        .map(|z| (2.0 * z.atan()).rem_euclid(std::f64::consts::TAU))
        .collect();
    if (v * b).abs() <= EPSILON * (a.max(b)).max(1.0) {
        params.push(PI);
    }
    params.sort_by(|x, y| x.total_cmp(y));
    params.dedup_by(|x, y| (*x - *y).abs() <= 1e-9);
    trace!(count = params.len(), "ellipse foot parameters");
    params
        .into_iter()
        .filter(|t| ellipse.window_contains(*t, 1e-12))
        .collect()
}

pub fn ellipse_feet(p: &Vector, ellipse: &Ellipse) -> Vec<Vector> {
    ellipse_foot_parameters(p, ellipse)
        .into_iter()
        .map(|t| ellipse.point_at(t))
        .collect()
}

/// Feet on a free-form curve: roots of `(c(t) − p)·c'(t)`.
pub fn curve_feet<C: ParametricCurve + ?Sized>(p: &Vector, curve: &C, cfg: &GeometryConfig) -> Vec<Vector> {
    let g = |t: f64| (curve.point_at(t) - *p).dot(&curve.derivative_at(t));
    let samples = cfg.search.coarse_samples * curve.segment_count();
    find_roots(g, curve.domain(), samples, cfg.tolerance.intersection, &cfg.search)
        .into_iter()
        .map(|t| curve.point_at(t))
        .collect()
}

/// Every perpendicular foot of `p` on `shape`, nearest first.
pub fn foot_points(p: &Vector, shape: &Shape, cfg: &GeometryConfig) -> Vec<Vector> {
    let mut feet = match shape {
        Shape::Point(_) => Vec::new(),
        Shape::Line(l) => foot_point(p, l, false).into_iter().collect(),
        Shape::Polyline(pl) => chain_feet(p, pl.points(), false),
        Shape::Polygon(pg) => chain_feet(p, pg.points(), true),
        Shape::Rect(r) => chain_feet(p, &r.corners(), true),
        Shape::Triangle(t) => chain_feet(p, t.points(), true),
        Shape::Circle(c) => circle_feet(p, c),
        Shape::Arc(a) => arc_feet(p, a),
        Shape::Ellipse(e) => ellipse_feet(p, e),
        Shape::Bezier(b) => curve_feet(p, b, cfg),
        Shape::BSpline(b) => curve_feet(p, b, cfg),
    };
    feet.sort_by(|a, b| a.distance_squared_to(p).total_cmp(&b.distance_squared_to(p)));
    feet.dedup_by(|a, b| a.approx_eq(b, cfg.tolerance.point_merge));
    feet
}
