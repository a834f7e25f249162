//! Tangent points seen from an external point.

use draftkit_core::{GeometryConfig, EPSILON};

use super::search::find_roots;
use crate::model::{Arc, Circle, Ellipse, ParametricCurve, Shape, Vector};

/// Points where the line from `p` touches `circle`.
///
/// A point inside yields nothing; a point on the circle is its own tangent point.
pub fn circle_tangency(p: &Vector, circle: &Circle) -> Vec<Vector> {
    let d = *p - circle.center;
    let dist = d.length();
    if (dist - circle.radius).abs() <= EPSILON * circle.radius.max(1.0) {
        return vec![*p];
    }
    if dist < circle.radius {
        return Vec::new();
    }
    let alpha = (circle.radius / dist).acos();
    let base = d.angle();
    vec![circle.point_at(base + alpha), circle.point_at(base - alpha)]
}

pub fn arc_tangency(p: &Vector, arc: &Arc) -> Vec<Vector> {
    circle_tangency(p, &arc.circle())
        .into_iter()
        .filter(|q| arc.contains_angle((*q - arc.center).angle(), 1e-12))
        .collect()
}

/// Tangency is affine invariant, so the ellipse is solved as the unit circle.
pub fn ellipse_tangency(p: &Vector, ellipse: &Ellipse) -> Vec<Vector> {
    let to_world = ellipse.unit_circle_transform();
    let Some(to_unit) = to_world.inverse() else {
        return Vec::new();
    };
    let local = to_unit.apply(*p);
    circle_tangency(&local, &Circle::new(Vector::ZERO, 1.0))
        .into_iter()
        .filter(|q| ellipse.window_contains(q.angle().rem_euclid(std::f64::consts::TAU), 1e-12))
        .map(|q| to_world.apply(q))
        .collect()
}

/// Roots of `(c(t) − p) × c'(t)` on a free-form curve.
pub fn curve_tangency<C: ParametricCurve + ?Sized>(p: &Vector, curve: &C, cfg: &GeometryConfig) -> Vec<Vector> {
    let g = |t: f64| (curve.point_at(t) - *p).cross(&curve.derivative_at(t));
    let samples = cfg.search.coarse_samples * curve.segment_count();
    find_roots(g, curve.domain(), samples, cfg.tolerance.intersection, &cfg.search)
        .into_iter()
        .map(|t| curve.point_at(t))
        .filter(|q| q.distance_to(p) > cfg.tolerance.point_merge)
        .collect()
}

/// Vertices of a chain whose neighbours both lie on one side of the sight line from `p`.
fn supporting_vertices(p: &Vector, points: &[Vector], closed: bool) -> Vec<Vector> {
    let n = points.len();
    if n < 2 {
        return Vec::new();
    }
    let mut out = Vec::new();
    for i in 0..n {
        let v = points[i];
        let ray = v - *p;
        if ray.length() <= EPSILON {
            continue;
        }
        let prev = if i > 0 {
            Some(points[i - 1])
        } else if closed {
            Some(points[n - 1])
        } else {
            None
        };
        let next = if i + 1 < n {
            Some(points[i + 1])
        } else if closed {
            Some(points[0])
        } else {
            None
        };
        let side = |q: Vector| ray.cross(&(q - v));
        let supported = match (prev, next) {
            (Some(a), Some(b)) => side(a) * side(b) >= 0.0,
            _ => true,
        };
        if supported {
            out.push(v);
        }
    }
    out
}

/// Tangent points on `shape` seen from `p`.
pub fn tangency_points(p: &Vector, shape: &Shape, cfg: &GeometryConfig) -> Vec<Vector> {
    match shape {
        Shape::Point(_) | Shape::Line(_) => Vec::new(),
        Shape::Polyline(pl) => supporting_vertices(p, pl.points(), false),
        Shape::Polygon(pg) => supporting_vertices(p, pg.points(), true),
        Shape::Rect(r) => supporting_vertices(p, &r.corners(), true),
        Shape::Triangle(t) => supporting_vertices(p, t.points(), true),
        Shape::Circle(c) => circle_tangency(p, c),
        Shape::Arc(a) => arc_tangency(p, a),
        Shape::Ellipse(e) => ellipse_tangency(p, e),
        Shape::Bezier(b) => curve_tangency(p, b, cfg),
        Shape::BSpline(b) => curve_tangency(p, b, cfg),
    }
}
