//! Splitting curves at a parameter or a position, and cutting closed
//! outlines at a set of points.

use std::f64::consts::TAU;

use tracing::{debug, warn};

use draftkit_core::{GeometryConfig, EPSILON};

use super::distance::closest_point_on_polyline;
use super::search::nearest_on_curve;
use crate::model::{
    Arc, BSpline, BezierSegment, Circle, CubicBezier, Ellipse, Line, ParametricCurve, Polygon, Polyline, Vector,
};

/// De Casteljau split at global parameter `t`, strictly inside `(0, 1)`.
///
/// Both halves share the split point exactly.
pub fn split_bezier(bezier: &CubicBezier, t: f64) -> Option<(CubicBezier, CubicBezier)> {
    if !(t > 0.0 && t < 1.0) || bezier.segment_count() == 0 {
        return None;
    }
    let (index, local) = bezier.locate(t);
    let segments: Vec<BezierSegment> = bezier.segments().collect();
    let (left, right): (Vec<BezierSegment>, Vec<BezierSegment>) = if local <= EPSILON {
        (segments[..index].to_vec(), segments[index..].to_vec())
    } else if local >= 1.0 - EPSILON {
        (segments[..=index].to_vec(), segments[index + 1..].to_vec())
    } else {
        let (a, b) = segments[index].split(local);
        let mut left = segments[..index].to_vec();
        left.push(a);
        let mut right = vec![b];
        right.extend_from_slice(&segments[index + 1..]);
        (left, right)
    };
    if left.is_empty() || right.is_empty() {
        return None;
    }
    let step = bezier.step();
    Some((
        CubicBezier::from_segments(&left).with_step(step),
        CubicBezier::from_segments(&right).with_step(step),
    ))
}

/// Locates `pos` on the curve with the nearest-point search, then splits there.
pub fn split_bezier_at_point(bezier: &CubicBezier, pos: &Vector, cfg: &GeometryConfig) -> Option<(CubicBezier, CubicBezier)> {
    let hit = nearest_on_curve(bezier, pos, &cfg.search);
    split_bezier(bezier, hit.t)
}

/// Splits a B-spline at `t`, strictly inside its domain.
///
/// `t` is inserted until its multiplicity equals the degree, the control
/// points are partitioned there and both knot vectors are renormalised to
/// `[0, 1]`. Path points go to the side their arc-length position along the
/// tessellation falls on; the split point ends one side and starts the other.
pub fn split_bspline(spline: &BSpline, t: f64) -> Option<(BSpline, BSpline)> {
    let (t0, t1) = spline.domain();
    if !(t > t0 && t < t1) {
        return None;
    }
    let p = spline.degree().value();
    let mut refined = spline.clone();
    let existing = refined.multiplicity(t);
    for _ in existing..p {
        if let Err(err) = refined.insert_knot(t) {
            warn!(%err, t, "knot insertion failed during split");
            return None;
        }
    }
    let knots = refined.knots();
    let cps = refined.control_points();
    let r = knots.iter().position(|k| (k - t).abs() <= 1e-12)?;
    if r == 0 || r > cps.len() {
        return None;
    }

    let mut left_knots = knots[..r + p].to_vec();
    left_knots.push(t);
    let left_points = cps[..r].to_vec();
    let mut right_knots = vec![t];
    right_knots.extend_from_slice(&knots[r..]);
    let right_points = cps[r - 1..].to_vec();

    if left_points.len() <= p || right_points.len() <= p {
        return None;
    }
    let samples = spline.samples_per_span();
    let mut left = BSpline::from_parts(spline.degree(), left_points, left_knots, samples);
    let mut right = BSpline::from_parts(spline.degree(), right_points, right_knots, samples);

    if !spline.path_points().is_empty() {
        let split_point = spline.point_at(t);
        let (left_path, right_path) = partition_path_points(spline, &split_point);
        left = left.with_path_points(left_path);
        right = right.with_path_points(right_path);
    }
    debug!(t, left = left.control_points().len(), right = right.control_points().len(), "B-spline split");
    Some((left, right))
}

fn arc_length_position(shape: &Polyline, lengths: &[f64], p: &Vector) -> f64 {
    match closest_point_on_polyline(p, shape.points()) {
        Some((q, i)) if shape.len() > 1 => lengths[i] + q.distance_to(&shape[i]),
        _ => 0.0,
    }
}

fn partition_path_points(spline: &BSpline, split_point: &Vector) -> (Vec<Vector>, Vec<Vector>) {
    let shape = spline.shape();
    let lengths = shape.cumulative_lengths();
    let cut = arc_length_position(shape, &lengths, split_point);
    let mut left = Vec::new();
    let mut right = Vec::new();
    for p in spline.path_points() {
        let s = arc_length_position(shape, &lengths, p);
        if p.approx_eq(split_point, EPSILON) {
            continue;
        }
        if s < cut {
            left.push(*p);
        } else {
            right.push(*p);
        }
    }
    left.push(*split_point);
    right.insert(0, *split_point);
    (left, right)
}

pub fn split_bspline_at_point(spline: &BSpline, pos: &Vector, cfg: &GeometryConfig) -> Option<(BSpline, BSpline)> {
    let hit = nearest_on_curve(spline, pos, &cfg.search);
    split_bspline(spline, hit.t)
}

/// Splits at the projection of `pos`; `None` unless it falls strictly inside.
pub fn split_line(line: &Line, pos: &Vector) -> Option<(Line, Line)> {
    let t = line.project(pos);
    if line.is_degenerate() || t <= EPSILON || t >= 1.0 - EPSILON {
        return None;
    }
    let q = line.point_at(t);
    Some((Line::new(line.front, q), Line::new(q, line.back)))
}

/// Splits at the nearest point to `pos`; `None` at either end.
pub fn split_polyline(polyline: &Polyline, pos: &Vector, cfg: &GeometryConfig) -> Option<(Polyline, Polyline)> {
    let points = polyline.points();
    let (q, i) = closest_point_on_polyline(pos, points)?;
    let merge = cfg.tolerance.point_merge;
    if points.len() < 2 || q.approx_eq(&points[0], merge) || q.approx_eq(&points[points.len() - 1], merge) {
        return None;
    }
    let mut left: Polyline = points[..=i].iter().copied().collect();
    left.push(q);
    left.dedup(merge);
    let mut right = Polyline::new(vec![q]);
    right.append(&points[i + 1..].iter().copied().collect(), merge);
    Some((left, right))
}

/// Splits at the polar angle of `pos`, strictly between the ends.
pub fn split_arc(arc: &Arc, pos: &Vector) -> Option<(Arc, Arc)> {
    let d = *pos - arc.center;
    if d.length() <= EPSILON {
        return None;
    }
    let sweep = arc.sweep();
    let start = arc.start_angle();
    let rel = if sweep >= 0.0 {
        (d.angle() - start).rem_euclid(TAU)
    } else {
        -(start - d.angle()).rem_euclid(TAU)
    };
    let u = rel / sweep;
    if !(u > EPSILON && u < 1.0 - EPSILON) {
        return None;
    }
    Some((
        Arc::from_sweep(arc.center, arc.radius, start, rel),
        Arc::from_sweep(arc.center, arc.radius, start + rel, sweep - rel),
    ))
}

/// Counter-clockwise arcs between consecutive cut points on a circle.
pub fn split_circle(circle: &Circle, points: &[Vector]) -> Vec<Arc> {
    let mut angles: Vec<f64> = points.iter().map(|p| circle.angle_of(p)).collect();
    angles.sort_by(|a, b| a.total_cmp(b));
    angles.dedup_by(|a, b| (*a - *b).abs() <= 1e-12);
    match angles.len() {
        0 => Vec::new(),
        1 => vec![Arc::from_sweep(circle.center, circle.radius, angles[0], TAU)],
        n => (0..n)
            .map(|i| {
                let a0 = angles[i];
                let a1 = if i + 1 < n { angles[i + 1] } else { angles[0] + TAU };
                Arc::from_sweep(circle.center, circle.radius, a0, a1 - a0)
            })
            .collect(),
    }
}

/// Elliptic arcs between consecutive cut parameters inside the window.
pub fn split_ellipse(ellipse: &Ellipse, points: &[Vector]) -> Vec<Ellipse> {
    let (w0, w1) = ellipse.domain();
    let mut params: Vec<f64> = points
        .iter()
        .map(|p| {
            let t = ellipse.parameter_of(p);
            w0 + (t - w0).rem_euclid(TAU)
        })
        .filter(|t| *t >= w0 && *t <= w1)
        .collect();
    params.sort_by(|a, b| a.total_cmp(b));
    params.dedup_by(|a, b| (*a - *b).abs() <= 1e-12);

    let make = |a: f64, b: f64| {
        let mut e = *ellipse;
        e.set_arc(a, b);
        e
    };
    if ellipse.is_arc() {
        let mut cuts = vec![w0];
        cuts.extend(params.into_iter().filter(|t| *t > w0 + 1e-12 && *t < w1 - 1e-12));
        cuts.push(w1);
        return cuts.windows(2).map(|w| make(w[0], w[1])).collect();
    }
    match params.len() {
        0 => Vec::new(),
        1 => vec![make(params[0], params[0] + TAU)],
        n => (0..n)
            .map(|i| {
                let a = params[i];
                let b = if i + 1 < n { params[i + 1] } else { params[0] + TAU };
                make(a, b)
            })
            .collect(),
    }
}

/// Cuts a polygon boundary into open chains at the given points.
///
/// Points are snapped onto their nearest edge. Fewer than one point on the
/// boundary leaves nothing to cut.
pub fn split_polygon(polygon: &Polygon, points: &[Vector], cfg: &GeometryConfig) -> Vec<Polyline> {
    let merge = cfg.tolerance.point_merge;
    let ring = polygon.points();
    let n = ring.len();
    if n < 3 {
        return Vec::new();
    }
    // (edge index, parameter along edge, point)
    let mut cuts: Vec<(usize, f64, Vector)> = Vec::new();
    for p in points {
        let best = (0..n)
            .map(|i| {
                let e = Line::new(ring[i], ring[(i + 1) % n]);
                let t = e.project(p).clamp(0.0, 1.0);
                (i, t, e.point_at(t))
            })
            .min_by(|a, b| a.2.distance_squared_to(p).total_cmp(&b.2.distance_squared_to(p)));
        if let Some((i, t, q)) = best {
            if q.distance_to(p) <= merge * 10.0 && !cuts.iter().any(|c| c.2.approx_eq(&q, merge)) {
                cuts.push((i, t, q));
            }
        }
    }
    if cuts.is_empty() {
        return Vec::new();
    }
    cuts.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.total_cmp(&b.1)));

    // Walk the ring once starting at the first cut.
    let mut walk: Vec<(Vector, bool)> = Vec::with_capacity(n + cuts.len());
    let mut c = 0;
    for i in 0..n {
        walk.push((ring[i], false));
        while c < cuts.len() && cuts[c].0 == i {
            walk.push((cuts[c].2, true));
            c += 1;
        }
    }
    let start = walk.iter().position(|(_, cut)| *cut).unwrap_or(0);
    walk.rotate_left(start);

    let mut chains = Vec::new();
    let mut current = Polyline::new(vec![walk[0].0]);
    for &(p, cut) in walk.iter().skip(1) {
        current.push(p);
        if cut {
            current.dedup(merge);
            chains.push(std::mem::replace(&mut current, Polyline::new(vec![p])));
        }
    }
    current.push(walk[0].0);
    current.dedup(merge);
    chains.push(current);
    chains.retain(|c| c.len() >= 2);
    chains
}
