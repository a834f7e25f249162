//! Parallel offsets.
//!
//! Sign conventions: polylines, lines and Bézier curves offset to the left of
//! their direction for positive distances; closed shapes grow for positive
//! distances and shrink for negative ones; arcs move away from their center.
//!
//! The bisector offset moves each vertex along its angle bisector by
//! `distance / cos(half angle)` and then repairs edges whose direction
//! reversed. The robust variants quantise to the fixed-point grid and hand the
//! work to `cavalier_contours`.

use cavalier_contours::polyline::{BooleanOp as PlineBooleanOp, PlineSource, Polyline as Pline};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, trace, warn};

use draftkit_core::{GeometryConfig, GeometryError, GeometryResult, EPSILON};

use super::boolean::Regions;
use super::conversion::{bspline_to_bezier, shape_to_polygon};
use super::fixed_point::{bulge_arc, circle_pline, from_pline, orient_pline, simplify, to_pline};
use super::intersection::line_line;
use super::search::{curve_curve_meets, nearest_on_curve};
use crate::model::{
    AABBRect, Arc, BezierSegment, Circle, CubicBezier, GeometryObject, Line, ParametricCurve, Polygon, Polyline,
    Shape, Vector,
};

/// Corner treatment for the robust polygon offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum JoinType {
    #[default]
    Round,
    /// Sharp corners; very sharp ones fall back to [`JoinType::Square`].
    Miter,
    Square,
}

/// End treatment for the robust polyline offset. Interior joints are round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EndType {
    #[default]
    Round,
    Butt,
}

/// Largest corner turn still mitered; the miter is then at most twice the distance.
const MITER_LIMIT_SWEEP: f64 = 2.0 * std::f64::consts::FRAC_PI_3;

fn left_normal(d: &Vector) -> Vector {
    d.perpendicular().normalized()
}

/// Bisector offset of a chain to the left by `d`, with the source direction of each output edge.
fn bisector_offset(points: &[Vector], closed: bool, d: f64) -> (Vec<Vector>, Vec<Vector>) {
    let n = points.len();
    let mut verts = Vec::with_capacity(n);
    for i in 0..n {
        let p = points[i];
        let incoming = if i > 0 {
            Some(p - points[i - 1])
        } else if closed {
            Some(p - points[n - 1])
        } else {
            None
        };
        let outgoing = if i + 1 < n {
            Some(points[i + 1] - p)
        } else if closed {
            Some(points[0] - p)
        } else {
            None
        };
        let v = match (incoming, outgoing) {
            (Some(a), Some(b)) => {
                let (na, nb) = (left_normal(&a), left_normal(&b));
                let sum = na + nb;
                if sum.length() < 1e-9 {
                    p + na * d
                } else {
                    let bis = sum.normalized();
                    p + bis * (d / bis.dot(&na).max(1e-3))
                }
            }
            (Some(a), None) | (None, Some(a)) => p + left_normal(&a) * d,
            (None, None) => p,
        };
        verts.push(v);
    }
    let edges = if closed { n } else { n.saturating_sub(1) };
    let dirs = (0..edges).map(|i| points[(i + 1) % n] - points[i]).collect();
    (verts, dirs)
}

fn reversed_edges(verts: &[Vector], dirs: &[Vector]) -> Vec<bool> {
    let len = verts.len();
    (0..dirs.len())
        .map(|i| (verts[(i + 1) % len] - verts[i]).dot(&dirs[i]) < 0.0)
        .collect()
}

fn meet_or_midpoint(a: &Line, b: &Line, fallback: (Vector, Vector)) -> Vector {
    line_line(a, b).unwrap_or_else(|| fallback.0.midpoint(&fallback.1))
}

/// Removes reversed offset edges.
///
/// A single reversed edge is replaced by the meeting point of its two
/// neighbours. Two consecutive reversed edges are replaced by the meeting
/// point of the edges before and after the pair.
fn repair_reversed(verts: &mut Vec<Vector>, dirs: &mut Vec<Vector>, closed: bool, distance: f64) -> GeometryResult<()> {
    let budget = verts.len();
    for pass in 0..budget {
        let reversed = reversed_edges(verts, dirs);
        let m = reversed.len();
        let count = reversed.iter().filter(|r| **r).count();
        if count == 0 {
            trace!(pass, "offset repair converged");
            return Ok(());
        }
        if closed && (count == m || m <= 3) {
            return Err(GeometryError::OffsetCollapse {
                distance,
                extent: AABBRect::from_points(verts.iter().copied()).width(),
            });
        }
        let Some(i) = reversed.iter().position(|r| *r) else {
            return Ok(());
        };

        if closed {
            // Rotate so the edge before the reversed one is edge 0.
            let shift = (i + m - 1) % m;
            verts.rotate_left(shift);
            dirs.rotate_left(shift);
            let double = reversed[(i + 1) % m] && m >= 5;
            let next = if double { 3 } else { 2 };
            let edge = |k: usize| Line::new(verts[k], verts[(k + 1) % m]);
            let x = meet_or_midpoint(&edge(0), &edge(next), (verts[1], verts[next]));
            if double {
                debug!(edge = i, "offset repair: double reversed edge");
                verts.splice(1..4, [x]);
                dirs.drain(1..3);
            } else {
                debug!(edge = i, "offset repair: single reversed edge");
                verts.splice(1..3, [x]);
                dirs.remove(1);
            }
        } else if i == 0 || i + 1 == m {
            // End edges have no outer neighbour; fold the inner vertex away.
            if verts.len() <= 2 {
                return Err(GeometryError::OffsetCollapse { distance, extent: 0.0 });
            }
            let (vertex, dir) = if i == 0 { (1, 0) } else { (m - 1, m - 1) };
            verts.remove(vertex);
            dirs.remove(dir);
        } else {
            let double = i + 2 < m && reversed[i + 1];
            let next = if double { i + 2 } else { i + 1 };
            let x = meet_or_midpoint(
                &Line::new(verts[i - 1], verts[i]),
                &Line::new(verts[next], verts[next + 1]),
                (verts[i], verts[next]),
            );
            verts.splice(i..=next, [x]);
            dirs.drain(i..next);
        }
    }
    warn!(distance, "offset repair budget exhausted");
    Ok(())
}

/// Bisector offset of an open polyline to its left.
pub fn offset_polyline(polyline: &Polyline, distance: f64) -> GeometryResult<Polyline> {
    let mut clean = polyline.clone();
    clean.dedup(EPSILON);
    if clean.len() < 2 {
        return Err(GeometryError::degenerate("polyline needs two distinct vertices"));
    }
    let (mut verts, mut dirs) = bisector_offset(clean.points(), false, distance);
    repair_reversed(&mut verts, &mut dirs, false, distance)?;
    Ok(Polyline::new(verts))
}

/// Bisector offset of a polygon; positive grows it. The input orientation is kept.
pub fn offset_polygon(polygon: &Polygon, distance: f64) -> GeometryResult<Polygon> {
    let mut ring = polygon.clone();
    ring.dedup(EPSILON);
    if ring.len() < 3 || ring.area() <= EPSILON {
        return Err(GeometryError::degenerate("polygon bounds no area"));
    }
    let was_cw = ring.is_cw();
    ring.reorient_ccw();
    // Outward is the right-hand side of a counter-clockwise ring.
    let (mut verts, mut dirs) = bisector_offset(ring.points(), true, -distance);
    repair_reversed(&mut verts, &mut dirs, true, distance)?;
    let mut out = Polygon::new(verts);
    if out.len() < 3 || out.signed_area() <= 0.0 {
        warn!(distance, "polygon offset inverted");
        return Err(GeometryError::OffsetCollapse {
            distance,
            extent: polygon.bounding_rect().width().min(polygon.bounding_rect().height()),
        });
    }
    if was_cw {
        out.reorient_cw();
    }
    Ok(out)
}

/// Ring vertices of an offset result with its bulge corners turned into `join`.
fn joined_ring(pline: &Pline<f64>, join: JoinType, cfg: &GeometryConfig) -> Vec<Vector> {
    if join == JoinType::Round {
        return from_pline(pline, &cfg.sampling, &cfg.fixed_point);
    }
    let n = pline.vertex_count();
    let mut out = Vec::with_capacity(n * 2);
    for i in 0..n {
        let v = pline.at(i);
        let a = Vector::new(v.x, v.y);
        out.push(a);
        if v.bulge.abs() <= 1e-12 {
            continue;
        }
        let w = pline.at((i + 1) % n);
        let b = Vector::new(w.x, w.y);
        let (center, sweep) = bulge_arc(&a, &b, v.bulge);
        let radius = center.distance_to(&a);
        let sign = sweep.signum();
        let ta = (a - center).perpendicular().normalized() * sign;
        let tb = (b - center).perpendicular().normalized() * sign;
        let miter = if join == JoinType::Miter && sweep.abs() <= MITER_LIMIT_SWEEP {
            line_line(&Line::new(a, a + ta), &Line::new(b, b + tb))
        } else {
            None
        };
        match miter {
            Some(x) => out.push(x),
            None => {
                let reach = radius * (sweep.abs() / 4.0).tan();
                out.push(a + ta * reach);
                out.push(b - tb * reach);
            }
        }
    }
    simplify(&out, true, cfg.fixed_point.simplify_tolerance)
}

/// Offset through the fixed-point grid and `cavalier_contours`.
///
/// Shrinking may split the polygon into several; growing a concave polygon
/// may enclose holes.
pub fn offset_polygon_robust(polygon: &Polygon, distance: f64, join: JoinType, cfg: &GeometryConfig) -> GeometryResult<Regions> {
    if polygon.len() < 3 || polygon.area() <= cfg.tolerance.epsilon {
        return Err(GeometryError::degenerate("polygon bounds no area"));
    }
    let mut pline = to_pline(polygon.points(), true, &cfg.fixed_point);
    // Clockwise input: a positive offset lies to the left, which is outside.
    orient_pline(&mut pline, false);
    let Ok(results) = panic::catch_unwind(AssertUnwindSafe(|| pline.parallel_offset(distance))) else {
        warn!(distance, "panic during parallel offset");
        return Err(GeometryError::Clipping {
            reason: "parallel offset panicked".to_string(),
        });
    };
    if results.is_empty() {
        let bounds = polygon.bounding_rect();
        warn!(distance, "robust polygon offset vanished");
        return Err(GeometryError::OffsetCollapse {
            distance,
            extent: bounds.width().min(bounds.height()),
        });
    }
    let mut regions = Regions::default();
    for result in &results {
        let same_orientation = result.area() < 0.0;
        let mut ring = Polygon::new(joined_ring(result, join, cfg));
        if ring.len() < 3 {
            continue;
        }
        if same_orientation {
            ring.reorient_ccw();
            regions.polygons.push(ring);
        } else {
            ring.reorient_cw();
            regions.holes.push(ring);
        }
    }
    debug!(
        distance,
        ?join,
        polygons = regions.polygons.len(),
        holes = regions.holes.len(),
        "robust polygon offset"
    );
    Ok(regions)
}

fn segment_band(a: &Vector, b: &Vector, half_width: f64, cfg: &GeometryConfig) -> Pline<f64> {
    let n = left_normal(&(*b - *a)) * half_width;
    let mut band = to_pline(&[*a + n, *a - n, *b - n, *b + n], true, &cfg.fixed_point);
    orient_pline(&mut band, true);
    band
}

/// Folds the pieces into one outline, tracking the holes the union encloses.
fn union_pieces(pieces: Vec<Pline<f64>>) -> GeometryResult<(Pline<f64>, Vec<Pline<f64>>)> {
    let mut pieces = pieces.into_iter();
    let Some(mut outer) = pieces.next() else {
        return Err(GeometryError::degenerate("nothing to offset"));
    };
    let mut holes: Vec<Pline<f64>> = Vec::new();
    for piece in pieces {
        let merged = outer.boolean(&piece, PlineBooleanOp::Or);
        let mut pos: Vec<Pline<f64>> = merged.pos_plines.into_iter().map(|r| r.pline).collect();
        if pos.len() > 1 {
            warn!(pieces = pos.len(), "polyline offset union split; keeping the largest piece");
            pos.sort_by(|a, b| b.area().abs().total_cmp(&a.area().abs()));
        }
        let Some(next) = pos.into_iter().next() else {
            return Err(GeometryError::Clipping {
                reason: "band union produced no outline".to_string(),
            });
        };
        outer = next;
        let mut remaining = Vec::with_capacity(holes.len());
        for hole in &holes {
            let cut = hole.boolean(&piece, PlineBooleanOp::Not);
            remaining.extend(cut.pos_plines.into_iter().map(|r| r.pline));
        }
        remaining.extend(merged.neg_plines.into_iter().map(|r| r.pline));
        holes = remaining;
    }

    Ok((outer, holes))
}

/// Area swept by a disc of radius `|distance|` along the polyline.
///
/// Built as the union of one band per segment and one disc per joint, plus
/// discs at both ends for [`EndType::Round`].
pub fn offset_polyline_robust(polyline: &Polyline, distance: f64, end: EndType, cfg: &GeometryConfig) -> GeometryResult<Regions> {
    let half = distance.abs();
    if half <= cfg.tolerance.epsilon {
        return Err(GeometryError::degenerate("zero offset width"));
    }
    let mut clean = polyline.clone();
    clean.dedup(cfg.tolerance.point_merge);
    let pts = clean.points();
    if pts.len() < 2 {
        return Err(GeometryError::degenerate("polyline needs two distinct vertices"));
    }

    let mut pieces: Vec<Pline<f64>> = Vec::new();
    for (k, w) in pts.windows(2).enumerate() {
        if k > 0 || end == EndType::Round {
            pieces.push(circle_pline(&w[0], half, &cfg.fixed_point));
        }
        pieces.push(segment_band(&w[0], &w[1], half, cfg));
    }
    if end == EndType::Round {
        if let Some(last) = pts.last() {
            pieces.push(circle_pline(last, half, &cfg.fixed_point));
        }
    }

    let Ok(unioned) = panic::catch_unwind(AssertUnwindSafe(|| union_pieces(pieces))) else {
        warn!(half, "panic during band union");
        return Err(GeometryError::Clipping {
            reason: "band union panicked".to_string(),
        });
    };
    let (outer, holes) = unioned?;

    let mut regions = Regions::default();
    let mut ring = Polygon::new(from_pline(&outer, &cfg.sampling, &cfg.fixed_point));
    ring.reorient_ccw();
    regions.polygons.push(ring);
    for hole in &holes {
        let mut ring = Polygon::new(from_pline(hole, &cfg.sampling, &cfg.fixed_point));
        if ring.len() >= 3 {
            ring.reorient_cw();
            regions.holes.push(ring);
        }
    }
    debug!(segments = pts.len() - 1, holes = regions.holes.len(), ?end, "robust polyline offset");
    Ok(regions)
}

pub fn offset_circle(circle: &Circle, distance: f64) -> GeometryResult<Circle> {
    let radius = circle.radius + distance;
    if radius <= 0.0 {
        warn!(distance, radius = circle.radius, "circle offset collapses");
        return Err(GeometryError::OffsetCollapse {
            distance,
            extent: circle.radius,
        });
    }
    Ok(Circle::new(circle.center, radius))
}

/// Moves every edge outward by `distance`; fails once either side would vanish.
pub fn offset_rect(rect: &AABBRect, distance: f64) -> GeometryResult<AABBRect> {
    let extent = rect.width().min(rect.height());
    if extent + 2.0 * distance <= 0.0 {
        warn!(distance, extent, "rect offset collapses");
        return Err(GeometryError::OffsetCollapse { distance, extent });
    }
    Ok(AABBRect::new(
        rect.left() - distance,
        rect.bottom() - distance,
        rect.right() + distance,
        rect.top() + distance,
    ))
}

pub fn offset_arc(arc: &Arc, distance: f64) -> GeometryResult<Arc> {
    let radius = arc.radius + distance;
    if radius <= 0.0 {
        return Err(GeometryError::OffsetCollapse {
            distance,
            extent: arc.radius,
        });
    }
    Ok(Arc::from_sweep(arc.center, radius, arc.start_angle(), arc.sweep()))
}

fn segment_normal(seg: &BezierSegment, t: f64) -> Vector {
    let mut d = seg.derivative_at(t);
    if d.length() <= EPSILON {
        d = seg.point_at((t + 1e-4).min(1.0)) - seg.point_at((t - 1e-4).max(0.0));
    }
    if d.length() <= EPSILON {
        d = seg.end() - seg.start();
    }
    left_normal(&d)
}

/// Offset end points with handles keeping their tangent directions, scaled by
/// the chord ratio.
fn candidate_offset(seg: &BezierSegment, d: f64) -> BezierSegment {
    let [p0, p1, p2, p3] = seg.points;
    let q0 = p0 + segment_normal(seg, 0.0) * d;
    let q3 = p3 + segment_normal(seg, 1.0) * d;
    let chord = (p3 - p0).length();
    let ratio = if chord <= EPSILON { 1.0 } else { (q3 - q0).length() / chord };
    BezierSegment::new(q0, q0 + (p1 - p0) * ratio, q3 + (p2 - p3) * ratio, q3)
}

/// Largest distance from the true offset to the candidate over the probes.
fn probe_error(seg: &BezierSegment, candidate: &BezierSegment, d: f64, cfg: &GeometryConfig) -> f64 {
    let probes = cfg.offset.probe_count.max(1);
    (0..probes)
        .into_par_iter()
        .map(|k| {
            let t = (k + 1) as f64 / (probes + 1) as f64;
            let target = seg.point_at(t) + segment_normal(seg, t) * d;
            nearest_on_curve(candidate, &target, &cfg.search).distance
        })
        .reduce(|| 0.0, f64::max)
}

fn offset_segment(seg: &BezierSegment, d: f64, depth: usize, cfg: &GeometryConfig, out: &mut Vec<BezierSegment>) {
    let candidate = candidate_offset(seg, d);
    let error = probe_error(seg, &candidate, d, cfg);
    if error <= cfg.offset.bezier_tolerance || depth >= cfg.offset.max_subdivision_depth {
        if error > cfg.offset.bezier_tolerance {
            debug!(depth, error, "Bézier offset hit subdivision limit");
        }
        out.push(candidate);
        return;
    }
    let (left, right) = seg.split(0.5);
    offset_segment(&left, d, depth + 1, cfg, out);
    offset_segment(&right, d, depth + 1, cfg, out);
}

/// Joins the offsets of two consecutive source segments: overlapping ends are
/// trimmed at their meeting point, gaps are bridged with a straight segment.
fn join_offsets(prev: &mut Vec<BezierSegment>, next: &mut Vec<BezierSegment>, cfg: &GeometryConfig) {
    let (Some(a), Some(b)) = (prev.last().copied(), next.first().copied()) else {
        return;
    };
    if a.end().approx_eq(&b.start(), cfg.tolerance.point_merge) {
        return;
    }
    let meets = curve_curve_meets(&a, &b, cfg.tolerance.intersection, cfg.tolerance.point_merge, &cfg.search);
    let cut = meets
        .into_iter()
        .filter(|(ta, tb)| *ta > EPSILON && *tb < 1.0 - EPSILON)
        .max_by(|x, y| x.0.total_cmp(&y.0));
    match cut {
        Some((ta, tb)) => {
            trace!(ta, tb, "trimming overlapping offset segments");
            if let Some(last) = prev.last_mut() {
                *last = a.split(ta).0;
            }
            if let Some(first) = next.first_mut() {
                *first = b.split(tb).1;
            }
        }
        None => prev.push(BezierSegment::line(a.end(), b.start())),
    }
}

/// Cuts out the loops an offset closes on itself, such as the swallowtail
/// left where the distance exceeds the radius of curvature.
///
/// Pieces are tagged with their source segment; only pieces from the same or
/// neighbouring source segments are tested against each other. For each piece
/// the farthest later piece it crosses is joined to it at the crossing and
/// everything in between is dropped.
fn remove_loops(pieces: &mut Vec<(usize, BezierSegment)>, cfg: &GeometryConfig) {
    let join_slack = cfg.tolerance.intersection.sqrt().max(cfg.tolerance.point_merge);
    let mut i = 0;
    while i < pieces.len() {
        let (src, a) = pieces[i];
        let window = pieces[i + 1..].iter().take_while(|(s, _)| *s <= src + 1).count();
        let hull = a.hull_rect();
        let mut cut = None;
        for j in (i + 1..=i + window).rev() {
            let (tail_src, b) = pieces[j];
            if !hull.overlaps(&b.hull_rect()) {
                continue;
            }
            let adjacent = j == i + 1;
            let hit = curve_curve_meets(&a, &b, cfg.tolerance.intersection, cfg.tolerance.point_merge, &cfg.search)
                .into_iter()
                .filter(|(ta, _)| !(adjacent && a.point_at(*ta).distance_to(&a.end()) <= join_slack))
                .min_by(|x, y| x.0.total_cmp(&y.0));
            if let Some((ta, tb)) = hit {
                cut = Some((j, tail_src, ta, tb, b));
                break;
            }
        }
        if let Some((j, tail_src, ta, tb, b)) = cut {
            trace!(from = i, to = j, ta, tb, "cutting offset loop");
            let joined = [(src, a.split(ta).0), (tail_src, b.split(tb).1)];
            pieces.splice(i..=j, joined);
        }
        i += 1;
    }
}

/// Offsets a Bézier curve to its left by `distance`.
///
/// Each segment is subdivided until the probed error drops under
/// `offset.bezier_tolerance`, then loops the offset closes on itself are cut
/// out. Probes run on the rayon pool, a dedicated one
/// when `offset.worker_threads` is set.
pub fn offset_bezier(bezier: &CubicBezier, distance: f64, cfg: &GeometryConfig) -> GeometryResult<CubicBezier> {
    if bezier.segment_count() == 0 {
        return Err(GeometryError::degenerate("Bézier curve has no segments"));
    }
    if distance.abs() <= EPSILON {
        return Ok(bezier.clone());
    }
    let work = || {
        let mut groups: Vec<Vec<BezierSegment>> = bezier
            .segments()
            .map(|seg| {
                let mut out = Vec::new();
                offset_segment(&seg, distance, 0, cfg, &mut out);
                out
            })
            .collect();
        for i in 1..groups.len() {
            let (head, tail) = groups.split_at_mut(i);
            if let (Some(prev), Some(next)) = (head.last_mut(), tail.first_mut()) {
                join_offsets(prev, next, cfg);
            }
        }
        let mut pieces: Vec<(usize, BezierSegment)> = groups
            .into_iter()
            .enumerate()
            .flat_map(|(src, group)| group.into_iter().map(move |seg| (src, seg)))
            .collect();
        remove_loops(&mut pieces, cfg);
        pieces.into_iter().map(|(_, seg)| seg).collect::<Vec<_>>()
    };
    let segments = if cfg.offset.worker_threads > 0 {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(cfg.offset.worker_threads)
            .build()
            .map_err(|e| GeometryError::Other {
                message: format!("failed to build offset thread pool: {e}"),
            })?;
        pool.install(work)
    } else {
        work()
    };
    debug!(source = bezier.segment_count(), offset = segments.len(), distance, "Bézier offset");
    Ok(CubicBezier::from_segments(&segments).with_step(bezier.step()))
}

/// Offsets any shape; closed shapes grow for positive distances.
pub fn offset_shape(shape: &Shape, distance: f64, cfg: &GeometryConfig) -> GeometryResult<Vec<Shape>> {
    let shapes = match shape {
        Shape::Point(_) => return Err(GeometryError::degenerate("a point has no offset")),
        Shape::Line(l) => vec![Shape::Line(l.shifted(distance))],
        Shape::Polyline(p) => vec![Shape::Polyline(offset_polyline(p, distance)?)],
        Shape::Polygon(p) => vec![Shape::Polygon(offset_polygon(p, distance)?)],
        Shape::Triangle(t) => vec![Shape::Polygon(offset_polygon(&Polygon::from_triangle(t), distance)?)],
        Shape::Rect(r) => vec![Shape::Rect(offset_rect(r, distance)?)],
        Shape::Circle(c) => vec![Shape::Circle(offset_circle(c, distance)?)],
        Shape::Arc(a) => vec![Shape::Arc(offset_arc(a, distance)?)],
        Shape::Bezier(b) => vec![Shape::Bezier(offset_bezier(b, distance, cfg)?)],
        Shape::BSpline(b) => vec![Shape::Bezier(offset_bezier(&bspline_to_bezier(b)?, distance, cfg)?)],
        Shape::Ellipse(e) => {
            let polygon = shape_to_polygon(shape, cfg)
                .ok_or_else(|| GeometryError::degenerate("elliptic arc offset needs a closed ellipse"))?;
            trace!(a = e.lengtha(), b = e.lengthb(), "ellipse offset through its polygon");
            let regions = offset_polygon_robust(&polygon, distance, JoinType::Round, cfg)?;
            regions.polygons.into_iter().map(Shape::Polygon).collect()
        }
    };
    Ok(shapes)
}
