//! Point-to-shape distance and nearest points.
//!
//! Distances to closed shapes are measured to the boundary. Conics with a
//! closed form use it; ellipses and free-form curves go through the two-phase
//! search in [`super::search`].

use draftkit_core::{GeometryConfig, EPSILON};

use super::search::nearest_on_curve;
use crate::model::{AABBRect, Arc, Circle, Ellipse, GeometryObject, Line, Polygon, Shape, Triangle, Vector};

/// Squared distance from `p` to the segment `a`–`b`; a zero-length segment is a point.
pub fn point_segment_distance_squared(p: &Vector, a: &Vector, b: &Vector) -> f64 {
    closest_point_on_segment(p, a, b).distance_squared_to(p)
}

/// Nearest point on segment `a`–`b`.
pub fn closest_point_on_segment(p: &Vector, a: &Vector, b: &Vector) -> Vector {
    let d = *b - *a;
    let len2 = d.length_squared();
    if len2 <= EPSILON * EPSILON {
        return *a;
    }
    let t = ((*p - *a).dot(&d) / len2).clamp(0.0, 1.0);
    a.lerp(b, t)
}

/// Distance to a line, treated as its infinite carrier when `infinite` is set.
pub fn distance_to_line(p: &Vector, line: &Line, infinite: bool) -> f64 {
    if line.is_degenerate() {
        return p.distance_to(&line.front);
    }
    if infinite {
        let d = line.direction();
        ((*p - line.front).cross(&d) / d.length()).abs()
    } else {
        point_segment_distance_squared(p, &line.front, &line.back).sqrt()
    }
}

/// Nearest point on an open chain of points and the index of the edge it lies on.
pub fn closest_point_on_polyline(p: &Vector, points: &[Vector]) -> Option<(Vector, usize)> {
    match points {
        [] => None,
        [only] => Some((*only, 0)),
        _ => points
            .windows(2)
            .enumerate()
            .map(|(i, w)| (closest_point_on_segment(p, &w[0], &w[1]), i))
            .min_by(|a, b| a.0.distance_squared_to(p).total_cmp(&b.0.distance_squared_to(p))),
    }
}

/// Nearest point on the boundary of a closed ring, with the edge index.
pub fn closest_point_on_ring(p: &Vector, points: &[Vector]) -> Option<(Vector, usize)> {
    let n = points.len();
    if n < 3 {
        return closest_point_on_polyline(p, points);
    }
    (0..n)
        .map(|i| (closest_point_on_segment(p, &points[i], &points[(i + 1) % n]), i))
        .min_by(|a, b| a.0.distance_squared_to(p).total_cmp(&b.0.distance_squared_to(p)))
}

pub fn closest_point_on_circle(p: &Vector, circle: &Circle) -> Vector {
    let d = *p - circle.center;
    if d.length() <= EPSILON {
        return circle.point_at(0.0);
    }
    circle.center + d.normalized() * circle.radius
}

pub fn closest_point_on_arc(p: &Vector, arc: &Arc) -> Vector {
    let d = *p - arc.center;
    if d.length() > EPSILON && arc.contains_angle(d.angle(), 0.0) {
        return arc.center + d.normalized() * arc.radius;
    }
    let (s, e) = (arc.start(), arc.end());
    if s.distance_squared_to(p) <= e.distance_squared_to(p) {
        s
    } else {
        e
    }
}

pub fn closest_point_on_ellipse(p: &Vector, ellipse: &Ellipse, cfg: &GeometryConfig) -> Vector {
    nearest_on_curve(ellipse, p, &cfg.search).point
}

/// Nearest point on the boundary of `shape`.
pub fn closest_point(p: &Vector, shape: &Shape, cfg: &GeometryConfig) -> Vector {
    match shape {
        Shape::Point(q) => *q,
        Shape::Line(l) => closest_point_on_segment(p, &l.front, &l.back),
        Shape::Polyline(pl) => closest_point_on_polyline(p, pl.points()).map_or(*p, |(q, _)| q),
        Shape::Polygon(pg) => closest_point_on_ring(p, pg.points()).map_or(*p, |(q, _)| q),
        Shape::Rect(r) => closest_point_on_ring(p, &r.corners()).map_or(*p, |(q, _)| q),
        Shape::Triangle(t) => closest_point_on_ring(p, t.points()).map_or(*p, |(q, _)| q),
        Shape::Circle(c) => closest_point_on_circle(p, c),
        Shape::Arc(a) => closest_point_on_arc(p, a),
        Shape::Ellipse(e) => closest_point_on_ellipse(p, e, cfg),
        Shape::Bezier(b) => nearest_on_curve(b, p, &cfg.search).point,
        Shape::BSpline(b) => nearest_on_curve(b, p, &cfg.search).point,
    }
}

/// Distance from `p` to the boundary of `shape`; always non-negative.
pub fn distance(p: &Vector, shape: &Shape, cfg: &GeometryConfig) -> f64 {
    match shape {
        Shape::Line(l) => distance_to_line(p, l, false),
        Shape::Circle(c) => (p.distance_to(&c.center) - c.radius).abs(),
        Shape::Bezier(b) => nearest_on_curve(b, p, &cfg.search).distance,
        Shape::BSpline(b) => nearest_on_curve(b, p, &cfg.search).distance,
        _ => closest_point(p, shape, cfg).distance_to(p),
    }
}

pub fn distance_to_polygon(p: &Vector, polygon: &Polygon) -> f64 {
    closest_point_on_ring(p, polygon.points()).map_or(f64::INFINITY, |(q, _)| q.distance_to(p))
}

pub fn distance_to_rect(p: &Vector, rect: &AABBRect) -> f64 {
    closest_point_on_ring(p, &rect.corners()).map_or(f64::INFINITY, |(q, _)| q.distance_to(p))
}

pub fn distance_to_triangle(p: &Vector, triangle: &Triangle) -> f64 {
    closest_point_on_ring(p, triangle.points()).map_or(f64::INFINITY, |(q, _)| q.distance_to(p))
}

/// Smallest distance between two segments, zero when they cross.
pub fn segment_distance(a: &Line, b: &Line) -> f64 {
    if super::intersection::segment_segment(a, b).is_some() {
        return 0.0;
    }
    [
        point_segment_distance_squared(&a.front, &b.front, &b.back),
        point_segment_distance_squared(&a.back, &b.front, &b.back),
        point_segment_distance_squared(&b.front, &a.front, &a.back),
        point_segment_distance_squared(&b.back, &a.front, &a.back),
    ]
    .into_iter()
    .fold(f64::INFINITY, f64::min)
    .sqrt()
}

/// Distance between two shapes' outlines, sampling curved outlines.
pub fn shape_distance(a: &Shape, b: &Shape, cfg: &GeometryConfig) -> f64 {
    if a.is_empty() && !matches!(a, Shape::Point(_)) {
        return f64::INFINITY;
    }
    let outline = super::conversion::shape_outline(a, cfg);
    outline
        .iter()
        .map(|p| distance(p, b, cfg))
        .fold(f64::INFINITY, f64::min)
}
