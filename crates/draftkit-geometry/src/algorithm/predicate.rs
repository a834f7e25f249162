//! Boolean geometric tests.
//!
//! Orientation predicates compare cross products against [`EPSILON`]. A
//! zero-length segment degrades every test to a point comparison.

use draftkit_core::EPSILON;

use crate::model::{AABBRect, Arc, Circle, Ellipse, Line, Polygon, Shape, Triangle, Vector};

/// Turn direction of `a → b → c`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    CounterClockwise,
    Clockwise,
    Collinear,
}

pub fn orientation(a: &Vector, b: &Vector, c: &Vector) -> Orientation {
    let cross = (*b - *a).cross(&(*c - *b));
    let scale = (*b - *a).length() * (*c - *b).length();
    if cross.abs() <= EPSILON * scale.max(1.0) {
        Orientation::Collinear
    } else if cross > 0.0 {
        Orientation::CounterClockwise
    } else {
        Orientation::Clockwise
    }
}

/// Same or opposite direction; a degenerate line is parallel to everything.
pub fn is_parallel(a: &Line, b: &Line) -> bool {
    let (da, db) = (a.direction(), b.direction());
    let scale = da.length() * db.length();
    if scale <= EPSILON {
        return true;
    }
    da.cross(&db).abs() <= EPSILON * scale
}

/// Parallel and on the same carrier line.
pub fn is_coincide(a: &Line, b: &Line) -> bool {
    if a.is_degenerate() && b.is_degenerate() {
        return a.front.approx_eq(&b.front, EPSILON);
    }
    let (base, other) = if a.is_degenerate() { (b, a) } else { (a, b) };
    is_parallel(a, b) && is_point_on_line(&other.front, base, true) && is_point_on_line(&other.back, base, true)
}

/// Strictly to the left of the directed line.
pub fn is_on_left(p: &Vector, line: &Line) -> bool {
    let d = line.direction();
    let len = d.length();
    if len <= EPSILON {
        return false;
    }
    d.cross(&(*p - line.front)) > EPSILON * len
}

/// On the segment, or on its carrier when `infinite`.
pub fn is_point_on_line(p: &Vector, line: &Line, infinite: bool) -> bool {
    let d = line.direction();
    let len = d.length();
    if len <= EPSILON {
        return p.approx_eq(&line.front, EPSILON);
    }
    if ((*p - line.front).cross(&d) / len).abs() > EPSILON.max(len * 1e-12) {
        return false;
    }
    if infinite {
        return true;
    }
    let t = line.project(p);
    (-EPSILON..=1.0 + EPSILON).contains(&t)
}

/// Crossing-number test; boundary points count only with `coincide`.
pub fn is_inside_ring(p: &Vector, points: &[Vector], coincide: bool) -> bool {
    let n = points.len();
    if n < 3 {
        return false;
    }
    for i in 0..n {
        if is_point_on_line(p, &Line::new(points[i], points[(i + 1) % n]), false) {
            return coincide;
        }
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (a, b) = (points[i], points[j]);
        if (a.y > p.y) != (b.y > p.y) {
            let x = a.x + (p.y - a.y) * (b.x - a.x) / (b.y - a.y);
            if p.x < x {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

pub fn is_inside_polygon(p: &Vector, polygon: &Polygon, coincide: bool) -> bool {
    is_inside_ring(p, polygon.points(), coincide)
}

pub fn is_inside_rect(p: &Vector, rect: &AABBRect, coincide: bool) -> bool {
    if coincide {
        rect.contains(p)
    } else {
        p.x > rect.left() && p.x < rect.right() && p.y > rect.bottom() && p.y < rect.top()
    }
}

/// Consistent sign of the three edge cross products.
pub fn is_inside_triangle(p: &Vector, triangle: &Triangle, coincide: bool) -> bool {
    if triangle.area() <= EPSILON {
        return coincide && triangle.edges().iter().any(|e| is_point_on_line(p, e, false));
    }
    let [a, b, c] = *triangle.points();
    let s = [(b - a).cross(&(*p - a)), (c - b).cross(&(*p - b)), (a - c).cross(&(*p - c))];
    let tol = EPSILON * triangle.area().max(1.0);
    if coincide {
        s.iter().all(|v| *v >= -tol) || s.iter().all(|v| *v <= tol)
    } else {
        s.iter().all(|v| *v > tol) || s.iter().all(|v| *v < -tol)
    }
}

pub fn is_inside_circle(p: &Vector, circle: &Circle, coincide: bool) -> bool {
    let d2 = p.distance_squared_to(&circle.center);
    let r2 = circle.radius * circle.radius;
    let tol = EPSILON * r2.max(1.0);
    if (d2 - r2).abs() <= tol {
        return coincide;
    }
    d2 < r2
}

/// Inside the full ellipse, judged in its unit-circle frame. Arc windows
/// are ignored: the region is the whole ellipse.
pub fn is_inside_ellipse(p: &Vector, ellipse: &Ellipse, coincide: bool) -> bool {
    let Some(inv) = ellipse.unit_circle_transform().inverse() else {
        return false;
    };
    let q = inv.apply(*p);
    let d2 = q.length_squared();
    if (d2 - 1.0).abs() <= 1e-9 {
        return coincide;
    }
    d2 < 1.0
}

/// Inside the circular segment bounded by the arc and its chord.
pub fn is_inside_arc(p: &Vector, arc: &Arc, coincide: bool) -> bool {
    let chord = Line::new(arc.start(), arc.end());
    if coincide && is_point_on_line(p, &chord, false) {
        return true;
    }
    if !is_inside_circle(p, &arc.circle(), coincide) {
        return false;
    }
    if arc.sweep().abs() >= std::f64::consts::TAU - EPSILON {
        return true;
    }
    // The mid point decides which side of the chord the segment occupies.
    let mid_left = is_on_left(&arc.mid(), &chord);
    let p_left = is_on_left(p, &chord);
    mid_left == p_left && !is_point_on_line(p, &chord, true)
}

/// `is_inside(point, shape, coincide)`: strict interior, plus the boundary with `coincide`.
///
/// Open shapes have no interior; they report only boundary membership.
pub fn is_inside(p: &Vector, shape: &Shape, coincide: bool) -> bool {
    match shape {
        Shape::Point(q) => coincide && p.approx_eq(q, EPSILON),
        Shape::Line(l) => coincide && is_point_on_line(p, l, false),
        Shape::Polyline(pl) => coincide && pl.segments().any(|s| is_point_on_line(p, &s, false)),
        Shape::Polygon(pg) => is_inside_polygon(p, pg, coincide),
        Shape::Rect(r) => is_inside_rect(p, r, coincide),
        Shape::Triangle(t) => is_inside_triangle(p, t, coincide),
        Shape::Circle(c) => is_inside_circle(p, c, coincide),
        Shape::Ellipse(e) => is_inside_ellipse(p, e, coincide),
        Shape::Arc(a) => is_inside_arc(p, a, coincide),
        Shape::Bezier(b) => coincide && b.shape().segments().any(|s| is_point_on_line(p, &s, false)),
        Shape::BSpline(b) => coincide && b.shape().segments().any(|s| is_point_on_line(p, &s, false)),
    }
}

/// Every vertex of `inner` inside `outer` and no edges crossing.
pub fn is_polygon_inside(inner: &Polygon, outer: &Polygon, coincide: bool) -> bool {
    if inner.len() < 3 || outer.len() < 3 {
        return false;
    }
    if !inner.points().iter().all(|p| is_inside_polygon(p, outer, coincide)) {
        return false;
    }
    for a in inner.edges() {
        for b in outer.edges() {
            if let Some(q) = super::intersection::segment_segment(&a, &b) {
                let touches_end = [a.front, a.back, b.front, b.back]
                    .iter()
                    .any(|v| v.approx_eq(&q, EPSILON.sqrt()));
                if !touches_end {
                    return false;
                }
            }
        }
    }
    true
}
