//! Pairwise shape intersection.
//!
//! Straight pieces and conics are solved in closed form (quadratic or quartic),
//! ellipse pairs by sign-change bracketing polished with two-dimensional Newton
//! steps, and free-form curves through the squared-gap minimiser in
//! [`super::search`]. Shape pairs are decomposed into those primitive pieces.

use smallvec::SmallVec;
use tracing::{debug, trace};

use draftkit_core::{GeometryConfig, EPSILON};

use super::poly::{solve_polynomial, solve_quadratic};
use super::predicate::{is_inside, is_point_on_line};
use super::search::{curve_curve_meets, find_roots};
use crate::model::{Arc, Circle, Ellipse, GeometryObject, Line, ParametricCurve, Shape, Vector};

/// Zero to four intersection points of a primitive pair.
pub type Points = SmallVec<[Vector; 4]>;

/// Intersection of two segments.
///
/// Collinear segments report a point only when they touch at exactly one end;
/// an overlap has no unique intersection and yields `None`. The result is the
/// same whichever segment comes first.
pub fn segment_segment(a: &Line, b: &Line) -> Option<Vector> {
    if a.is_degenerate() {
        return is_point_on_line(&a.front, b, false).then_some(a.front);
    }
    if b.is_degenerate() {
        return is_point_on_line(&b.front, a, false).then_some(b.front);
    }
    let d1 = a.direction();
    let d2 = b.direction();
    let denom = d1.cross(&d2);
    let w = b.front - a.front;
    if denom.abs() <= EPSILON * d1.length() * d2.length() {
        return collinear_touch(a, b);
    }
    let u = w.cross(&d2) / denom;
    let v = w.cross(&d1) / denom;
    let range = -EPSILON..=1.0 + EPSILON;
    if range.contains(&u) && range.contains(&v) {
        Some((a.point_at(u) + b.point_at(v)) * 0.5)
    } else {
        None
    }
}

fn collinear_touch(a: &Line, b: &Line) -> Option<Vector> {
    if !is_point_on_line(&b.front, a, true) {
        return None;
    }
    let mut ends = [(a.front, b.front), (a.front, b.back), (a.back, b.front), (a.back, b.back)]
        .into_iter()
        .filter(|(p, q)| p.approx_eq(q, EPSILON));
    let touch = ends.next()?;
    let (t0, t1) = (a.project(&b.front), a.project(&b.back));
    let (lo, hi) = (t0.min(t1).max(0.0), t0.max(t1).min(1.0));
    if hi - lo > EPSILON {
        return None;
    }
    Some(touch.0)
}

/// Intersection of the infinite carrier lines, `None` when parallel.
pub fn line_line(a: &Line, b: &Line) -> Option<Vector> {
    let d1 = a.direction();
    let d2 = b.direction();
    let denom = d1.cross(&d2);
    if denom.abs() <= EPSILON * d1.length() * d2.length() || a.is_degenerate() || b.is_degenerate() {
        return None;
    }
    let u = (b.front - a.front).cross(&d2) / denom;
    Some(a.point_at(u))
}

fn line_parameters_on_circle(line: &Line, circle: &Circle) -> SmallVec<[f64; 4]> {
    let d = line.direction();
    let f = line.front - circle.center;
    solve_quadratic(d.dot(&d), 2.0 * d.dot(&f), f.dot(&f) - circle.radius * circle.radius)
}

/// Points where `line` meets `circle`; a tangent line yields one point.
pub fn line_circle(line: &Line, circle: &Circle, infinite: bool) -> Points {
    if line.is_degenerate() {
        let on = (line.front.distance_to(&circle.center) - circle.radius).abs() <= EPSILON;
        return if on { Points::from_slice(&[line.front]) } else { Points::new() };
    }
    line_parameters_on_circle(line, circle)
        .into_iter()
        .filter(|t| infinite || (-EPSILON..=1.0 + EPSILON).contains(t))
        .map(|t| line.point_at(t))
        .collect()
}

/// Points where two circles meet. Concentric circles have none.
pub fn circle_circle(a: &Circle, b: &Circle) -> Points {
    let delta = b.center - a.center;
    let d = delta.length();
    let tol = EPSILON * (a.radius + b.radius).max(1.0);
    if d <= EPSILON || d > a.radius + b.radius + tol || d < (a.radius - b.radius).abs() - tol {
        return Points::new();
    }
    let along = (d * d + a.radius * a.radius - b.radius * b.radius) / (2.0 * d);
    let h2 = a.radius * a.radius - along * along;
    let u = delta / d;
    let base = a.center + u * along;
    if h2 <= tol * a.radius.max(1.0) {
        return Points::from_slice(&[base]);
    }
    let offset = u.perpendicular() * h2.sqrt();
    Points::from_slice(&[base + offset, base - offset])
}

/// Points where `line` meets `ellipse`, solved in the unit-circle frame.
pub fn line_ellipse(line: &Line, ellipse: &Ellipse, infinite: bool) -> Points {
    let to_world = ellipse.unit_circle_transform();
    let Some(to_unit) = to_world.inverse() else {
        return Points::new();
    };
    let local = Line::new(to_unit.apply(line.front), to_unit.apply(line.back));
    let unit = Circle::new(Vector::ZERO, 1.0);
    line_circle(&local, &unit, infinite)
        .into_iter()
        .filter(|q| ellipse.window_contains(q.angle().rem_euclid(std::f64::consts::TAU), 1e-12))
        .map(|q| to_world.apply(q))
        .collect()
}

/// Parametric angles on `ellipse` where it meets `circle`.
///
/// In the principal frame `|x(t) − c|² = r²` is a quartic in `z = tan(t / 2)`;
/// `t = π` is tested directly.
fn circle_ellipse_parameters(circle: &Circle, ellipse: &Ellipse) -> SmallVec<[f64; 4]> {
    let c = ellipse.center();
    let [_, a1, _, b1] = ellipse.axis_points();
    let (a, b) = (ellipse.lengtha(), ellipse.lengthb());
    if a <= EPSILON || b <= EPSILON {
        return SmallVec::new();
    }
    let d = circle.center - c;
    let cx = d.dot(&((a1 - c) / a));
    let cy = d.dot(&((b1 - c) / b));
    let k = cx * cx + cy * cy - circle.radius * circle.radius;
    let coeffs = [
        a * a + 2.0 * a * cx + k,
        -4.0 * b * cy,
        -2.0 * a * a + 4.0 * b * b + 2.0 * k,
        -4.0 * b * cy,
        a * a - 2.0 * a * cx + k,
    ];
    let mut params: SmallVec<[f64; 4]> = solve_polynomial(&coeffs)
        .into_iter()
        .map(|z| (2.0 * z.atan()).rem_euclid(std::f64::consts::TAU))
        .collect();
    let at_pi = (-a - cx).powi(2) + cy * cy - circle.radius * circle.radius;
    if at_pi.abs() <= 1e-9 * circle.radius.max(1.0).powi(2) {
        params.push(std::f64::consts::PI);
    }
    params
}

pub fn circle_ellipse(circle: &Circle, ellipse: &Ellipse, cfg: &GeometryConfig) -> Points {
    let mut out = Points::new();
    for t in circle_ellipse_parameters(circle, ellipse) {
        if !ellipse.window_contains(t, 1e-12) {
            continue;
        }
        push_unique(&mut out, ellipse.point_at(t), cfg.tolerance.point_merge);
    }
    out
}

/// Ellipse pairs: sign changes of `b`'s implicit function along `a`, polished
/// by Newton steps on `a(t) − b(s) = 0`.
pub fn ellipse_ellipse(a: &Ellipse, b: &Ellipse, cfg: &GeometryConfig) -> Points {
    let mut out = Points::new();
    let Some(to_unit_b) = b.unit_circle_transform().inverse() else {
        return out;
    };
    let g = |t: f64| to_unit_b.apply(a.point_at(t)).length_squared() - 1.0;
    let samples = cfg.search.coarse_samples * a.segment_count();
    let roots = find_roots(g, a.domain(), samples, cfg.tolerance.intersection, &cfg.search);
    for t in roots {
        let s = b.parameter_of(&a.point_at(t));
        let (t, s) = polish_pair(a, b, t, s);
        if !b.window_contains(s, 1e-9) {
            continue;
        }
        let p = a.point_at(t);
        if p.distance_to(&b.point_at(s)) > cfg.tolerance.point_merge {
            debug!(t, s, "ellipse intersection Newton step diverged");
            continue;
        }
        push_unique(&mut out, p, cfg.tolerance.point_merge);
        if out.len() == 4 {
            break;
        }
    }
    out
}

fn polish_pair(a: &Ellipse, b: &Ellipse, t: f64, s: f64) -> (f64, f64) {
    use nalgebra::{Matrix2, Vector2};
    let (mut t, mut s) = (t, s);
    for _ in 0..16 {
        let r = a.point_at(t) - b.point_at(s);
        if r.length() <= 1e-14 {
            break;
        }
        let (da, db) = (a.derivative_at(t), b.derivative_at(s));
        let jac = Matrix2::new(da.x, -db.x, da.y, -db.y);
        let Some(inv) = jac.try_inverse() else {
            break;
        };
        let step = inv * Vector2::new(r.x, r.y);
        t -= step[0];
        s -= step[1];
    }
    (t, s.rem_euclid(std::f64::consts::TAU))
}

fn push_unique(out: &mut Points, p: Vector, merge: f64) {
    if !out.iter().any(|q| q.approx_eq(&p, merge)) {
        out.push(p);
    }
}

/// A primitive piece of a shape outline.
enum Piece<'a> {
    Point(Vector),
    Segment(Line),
    Circle(Circle),
    Arc(Arc),
    Ellipse(Ellipse),
    Curve(&'a dyn ParametricCurve),
}

fn ring_segments(points: &[Vector], closed: bool) -> Vec<Piece<'static>> {
    let n = points.len();
    let count = if closed && n >= 3 { n } else { n.saturating_sub(1) };
    (0..count)
        .map(|i| Piece::Segment(Line::new(points[i], points[(i + 1) % n])))
        .collect()
}

fn pieces(shape: &Shape) -> Vec<Piece<'_>> {
    match shape {
        Shape::Point(p) => vec![Piece::Point(*p)],
        Shape::Line(l) => vec![Piece::Segment(*l)],
        Shape::Polyline(pl) => ring_segments(pl.points(), false),
        Shape::Polygon(pg) => ring_segments(pg.points(), true),
        Shape::Rect(r) => ring_segments(&r.corners(), true),
        Shape::Triangle(t) => ring_segments(t.points(), true),
        Shape::Circle(c) => vec![Piece::Circle(*c)],
        Shape::Arc(a) => vec![Piece::Arc(*a)],
        Shape::Ellipse(e) => vec![Piece::Ellipse(*e)],
        Shape::Bezier(b) => vec![Piece::Curve(b)],
        Shape::BSpline(b) => vec![Piece::Curve(b)],
    }
}

fn on_piece(p: &Vector, piece: &Piece<'_>, cfg: &GeometryConfig) -> bool {
    let tol = cfg.tolerance.point_merge;
    match piece {
        Piece::Point(q) => p.approx_eq(q, tol),
        Piece::Segment(l) => super::distance::distance_to_line(p, l, false) <= tol,
        Piece::Circle(c) => (p.distance_to(&c.center) - c.radius).abs() <= tol,
        Piece::Arc(a) => super::distance::closest_point_on_arc(p, a).distance_to(p) <= tol,
        Piece::Ellipse(e) => super::distance::closest_point_on_ellipse(p, e, cfg).distance_to(p) <= tol,
        Piece::Curve(c) => super::search::nearest_on_curve(*c, p, &cfg.search).distance <= tol,
    }
}

fn arc_filter(points: Points, arc: &Arc) -> Points {
    points
        .into_iter()
        .filter(|q| arc.contains_angle((*q - arc.center).angle(), 1e-9))
        .collect()
}

/// Roots of a signed gap function along a curve, mapped to points.
fn curve_roots<G: Fn(f64) -> f64>(curve: &dyn ParametricCurve, g: G, cfg: &GeometryConfig) -> Vec<Vector> {
    let samples = cfg.search.coarse_samples * curve.segment_count();
    find_roots(g, curve.domain(), samples, cfg.tolerance.intersection, &cfg.search)
        .into_iter()
        .map(|t| curve.point_at(t))
        .collect()
}

fn curve_piece(curve: &dyn ParametricCurve, other: &Piece<'_>, cfg: &GeometryConfig) -> Vec<Vector> {
    match other {
        Piece::Point(p) => {
            if on_piece(p, &Piece::Curve(curve), cfg) {
                vec![*p]
            } else {
                Vec::new()
            }
        }
        Piece::Segment(l) => {
            if l.is_degenerate() {
                return curve_piece(curve, &Piece::Point(l.front), cfg);
            }
            let d = l.direction();
            let len = d.length();
            curve_roots(curve, |t| d.cross(&(curve.point_at(t) - l.front)) / len, cfg)
                .into_iter()
                .filter(|q| (-EPSILON..=1.0 + EPSILON).contains(&l.project(q)))
                .collect()
        }
        Piece::Circle(c) => curve_roots(curve, |t| curve.point_at(t).distance_to(&c.center) - c.radius, cfg),
        Piece::Arc(a) => curve_roots(curve, |t| curve.point_at(t).distance_to(&a.center) - a.radius, cfg)
            .into_iter()
            .filter(|q| a.contains_angle((*q - a.center).angle(), 1e-9))
            .collect(),
        Piece::Ellipse(e) => {
            let Some(to_unit) = e.unit_circle_transform().inverse() else {
                return Vec::new();
            };
            curve_roots(curve, |t| to_unit.apply(curve.point_at(t)).length_squared() - 1.0, cfg)
                .into_iter()
                .filter(|q| e.window_contains(e.parameter_of(q), 1e-9))
                .collect()
        }
        Piece::Curve(other) => {
            curve_curve_meets(curve, *other, cfg.tolerance.intersection, cfg.tolerance.point_merge, &cfg.search)
                .into_iter()
                .map(|(t, _)| curve.point_at(t))
                .collect()
        }
    }
}

fn piece_piece(a: &Piece<'_>, b: &Piece<'_>, cfg: &GeometryConfig) -> Vec<Vector> {
    use Piece as P;
    let pts: Points = match (a, b) {
        (P::Curve(c), other) | (other, P::Curve(c)) => return curve_piece(*c, other, cfg),
        (P::Point(p), other) | (other, P::Point(p)) => {
            return if on_piece(p, other, cfg) { vec![*p] } else { Vec::new() };
        }
        (P::Segment(l), P::Segment(m)) => segment_segment(l, m).into_iter().collect(),
        (P::Segment(l), P::Circle(c)) | (P::Circle(c), P::Segment(l)) => line_circle(l, c, false),
        (P::Segment(l), P::Arc(arc)) | (P::Arc(arc), P::Segment(l)) => {
            arc_filter(line_circle(l, &arc.circle(), false), arc)
        }
        (P::Segment(l), P::Ellipse(e)) | (P::Ellipse(e), P::Segment(l)) => line_ellipse(l, e, false),
        (P::Circle(c), P::Circle(d)) => circle_circle(c, d),
        (P::Circle(c), P::Arc(arc)) | (P::Arc(arc), P::Circle(c)) => arc_filter(circle_circle(c, &arc.circle()), arc),
        (P::Arc(x), P::Arc(y)) => arc_filter(arc_filter(circle_circle(&x.circle(), &y.circle()), x), y),
        (P::Circle(c), P::Ellipse(e)) | (P::Ellipse(e), P::Circle(c)) => circle_ellipse(c, e, cfg),
        (P::Arc(arc), P::Ellipse(e)) | (P::Ellipse(e), P::Arc(arc)) => {
            arc_filter(circle_ellipse(&arc.circle(), e, cfg), arc)
        }
        (P::Ellipse(x), P::Ellipse(y)) => ellipse_ellipse(x, y, cfg),
    };
    pts.into_vec()
}

/// All points where the outlines of `a` and `b` meet, deduplicated by
/// `tolerance.point_merge`.
pub fn intersection_points(a: &Shape, b: &Shape, cfg: &GeometryConfig) -> Vec<Vector> {
    let merge = cfg.tolerance.point_merge;
    if !a.bounding_rect().expanded(merge).overlaps(&b.bounding_rect()) {
        return Vec::new();
    }
    let (pa, pb) = (pieces(a), pieces(b));
    let mut out: Vec<Vector> = Vec::new();
    for x in &pa {
        for y in &pb {
            for p in piece_piece(x, y, cfg) {
                if !out.iter().any(|q| q.approx_eq(&p, merge)) {
                    out.push(p);
                }
            }
        }
    }
    trace!(a = %a.kind(), b = %b.kind(), count = out.len(), "intersection points");
    out
}

/// Whether two shapes intersect.
///
/// Bounding boxes reject first. With `inside` set, one closed shape lying
/// entirely within the other also counts.
pub fn is_intersected(a: &Shape, b: &Shape, inside: bool, cfg: &GeometryConfig) -> bool {
    let merge = cfg.tolerance.point_merge;
    if !a.bounding_rect().expanded(merge).overlaps(&b.bounding_rect()) {
        return false;
    }
    let (pa, pb) = (pieces(a), pieces(b));
    for x in &pa {
        for y in &pb {
            if !piece_piece(x, y, cfg).is_empty() {
                return true;
            }
        }
    }
    if !inside {
        return false;
    }
    let probe = |s: &Shape| super::conversion::shape_outline(s, cfg).first().copied();
    let a_in_b = b.is_closed() && probe(a).is_some_and(|p| is_inside(&p, b, true));
    let b_in_a = a.is_closed() && probe(b).is_some_and(|p| is_inside(&p, a, true));
    a_in_b || b_in_a
}

/// Whether any two non-adjacent edges of a chain cross.
pub fn is_self_intersected(points: &[Vector], closed: bool) -> bool {
    let n = points.len();
    let edges: Vec<Line> = if closed && n >= 3 {
        (0..n).map(|i| Line::new(points[i], points[(i + 1) % n])).collect()
    } else {
        points.windows(2).map(|w| Line::new(w[0], w[1])).collect()
    };
    let m = edges.len();
    for i in 0..m {
        for j in i + 2..m {
            if closed && i == 0 && j == m - 1 {
                continue;
            }
            if segment_segment(&edges[i], &edges[j]).is_some() {
                return true;
            }
        }
    }
    false
}
