//! Fixed-point quantisation ahead of polygon clipping.
//!
//! Coordinates are snapped to a signed 64-bit integer grid (`scale` units per
//! model unit) before they reach `cavalier_contours`. Clipping then runs on
//! grid-exact values, which keeps nearly coincident input vertices from
//! producing sliver output. Results come back as model-unit rings with bulge
//! arcs tessellated and near-duplicate or collinear vertices removed.

use cavalier_contours::polyline::{PlineSource, PlineSourceMut, PlineVertex, Polyline as Pline};
use tracing::{trace, warn};

use draftkit_core::{FixedPointSettings, SamplingSettings};

use crate::model::Vector;

/// A point on the integer grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FixedPoint {
    pub x: i64,
    pub y: i64,
}

/// Rounds onto the grid; values beyond the `i64` range saturate.
pub fn to_fixed(p: &Vector, scale: f64) -> FixedPoint {
    let (x, y) = (p.x * scale, p.y * scale);
    if x.abs() >= i64::MAX as f64 || y.abs() >= i64::MAX as f64 {
        warn!(x = p.x, y = p.y, scale, "coordinate saturates the fixed-point grid");
    }
    FixedPoint {
        x: x.round() as i64,
        y: y.round() as i64,
    }
}

pub fn from_fixed(p: FixedPoint, scale: f64) -> Vector {
    Vector::new(p.x as f64 / scale, p.y as f64 / scale)
}

/// Snaps `p` to the nearest grid point, in model units.
pub fn quantize(p: &Vector, scale: f64) -> Vector {
    from_fixed(to_fixed(p, scale), scale)
}

/// Builds a straight-edged pline from grid-snapped vertices.
///
/// Consecutive vertices on the same grid point collapse, and so does a
/// closing vertex equal to the first one.
pub fn to_pline(points: &[Vector], closed: bool, settings: &FixedPointSettings) -> Pline<f64> {
    let mut grid: Vec<FixedPoint> = Vec::with_capacity(points.len());
    for p in points {
        let q = to_fixed(p, settings.scale);
        if grid.last() != Some(&q) {
            grid.push(q);
        }
    }
    if closed {
        while grid.len() > 1 && grid.first() == grid.last() {
            grid.pop();
        }
    }
    let mut pline = Pline::new();
    pline.set_is_closed(closed);
    for q in grid {
        let v = from_fixed(q, settings.scale);
        pline.add_vertex(PlineVertex::new(v.x, v.y, 0.0));
    }
    pline
}

/// Closed pline of a full circle as two half-circle bulge arcs.
pub fn circle_pline(center: &Vector, radius: f64, settings: &FixedPointSettings) -> Pline<f64> {
    let a = quantize(&Vector::new(center.x + radius, center.y), settings.scale);
    let b = quantize(&Vector::new(center.x - radius, center.y), settings.scale);
    let mut pline = Pline::new();
    pline.set_is_closed(true);
    pline.add_vertex(PlineVertex::new(a.x, a.y, 1.0));
    pline.add_vertex(PlineVertex::new(b.x, b.y, 1.0));
    pline
}

/// Center and signed sweep of the bulge arc from `a` to `b`.
pub(crate) fn bulge_arc(a: &Vector, b: &Vector, bulge: f64) -> (Vector, f64) {
    let chord = *b - *a;
    let mid = a.midpoint(b);
    let center = mid + chord.perpendicular() * ((1.0 - bulge * bulge) / (4.0 * bulge));
    (center, 4.0 * bulge.atan())
}

/// Vertices of a pline in model units, bulge arcs sampled at the angular
/// step of `sampling`. A closed pline does not repeat its first vertex.
pub fn from_pline(pline: &Pline<f64>, sampling: &SamplingSettings, settings: &FixedPointSettings) -> Vec<Vector> {
    let n = pline.vertex_count();
    let mut out = Vec::with_capacity(n);
    for i in 0..n {
        let v = pline.at(i);
        let a = Vector::new(v.x, v.y);
        out.push(a);
        let last_open = !pline.is_closed() && i + 1 == n;
        if last_open || v.bulge.abs() <= 1e-12 {
            continue;
        }
        let w = pline.at((i + 1) % n);
        let b = Vector::new(w.x, w.y);
        let (center, sweep) = bulge_arc(&a, &b, v.bulge);
        let radius = center.distance_to(&a);
        let step = sampling.angular_step(radius).max(1e-6);
        let count = ((sweep.abs() / step).ceil() as usize).max(1);
        let start = (a - center).angle();
        for k in 1..count {
            let angle = start + sweep * k as f64 / count as f64;
            out.push(center + Vector::from_angle(angle) * radius);
        }
    }
    let closed = pline.is_closed();
    let simplified = simplify(&out, closed, settings.simplify_tolerance);
    trace!(input = n, output = simplified.len(), "pline converted");
    simplified
}

/// Drops vertices closer than `tolerance` to their predecessor and vertices
/// deviating less than `tolerance` from the line through their neighbours.
pub fn simplify(points: &[Vector], closed: bool, tolerance: f64) -> Vec<Vector> {
    let mut out: Vec<Vector> = Vec::with_capacity(points.len());
    for p in points {
        if out.last().is_some_and(|q| q.approx_eq(p, tolerance)) {
            continue;
        }
        out.push(*p);
    }
    if closed {
        while out.len() > 1 && out[0].approx_eq(&out[out.len() - 1], tolerance) {
            out.pop();
        }
    }

    let mut changed = true;
    while changed && out.len() > 2 {
        changed = false;
        let n = out.len();
        let (first, last) = if closed { (0, n) } else { (1, n - 1) };
        for i in first..last {
            let prev = out[(i + n - 1) % n];
            let next = out[(i + 1) % n];
            let chord = next - prev;
            let len = chord.length();
            let deviation = if len <= tolerance {
                out[i].distance_to(&prev)
            } else {
                chord.cross(&(out[i] - prev)).abs() / len
            };
            let between = (out[i] - prev).dot(&chord) >= 0.0 && (out[i] - next).dot(&-chord) >= 0.0;
            if deviation <= tolerance && between {
                out.remove(i);
                changed = true;
                break;
            }
        }
    }
    out
}

/// Signed area of a closed pline, counter-clockwise positive.
pub fn pline_area(pline: &Pline<f64>) -> f64 {
    pline.area()
}

/// Reverses the travel direction when the orientation differs from `ccw`.
pub(crate) fn orient_pline(pline: &mut Pline<f64>, ccw: bool) {
    if (pline.area() > 0.0) != ccw {
        pline.invert_direction_mut();
    }
}
