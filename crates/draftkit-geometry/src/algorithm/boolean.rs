//! Boolean combination of closed shapes.
//!
//! Polygon pairs are clipped by `cavalier_contours` on grid-snapped input.
//! Two circles go the same way, carried as exact bulge arcs. Pairs involving
//! an ellipse, and polygon/circle pairs, are combined analytically: both
//! boundaries are cut at their intersection points, every piece is classified
//! against the other shape, and the selected pieces are stitched into rings.

use cavalier_contours::polyline::{BooleanOp as PlineBooleanOp, PlineSource, Polyline as Pline};
use serde::{Deserialize, Serialize};
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, warn};

use draftkit_core::{GeometryConfig, GeometryError, GeometryResult};

use super::conversion::{arc_to_polyline, circle_to_polygon, ellipse_to_polygon, ellipse_to_polyline, shape_to_polygon};
use super::fixed_point::{circle_pline, from_pline, simplify, to_pline};
use super::intersection::intersection_points;
use super::predicate::is_inside;
use super::split::{split_circle, split_ellipse, split_polygon};
use crate::model::{Circle, Ellipse, GeometryObject, Polygon, Polyline, Shape, Vector};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BooleanOp {
    Union,
    Intersection,
    /// First operand minus the second.
    Difference,
    Xor,
}

impl BooleanOp {
    fn pline_op(self) -> PlineBooleanOp {
        match self {
            Self::Union => PlineBooleanOp::Or,
            Self::Intersection => PlineBooleanOp::And,
            Self::Difference => PlineBooleanOp::Not,
            Self::Xor => PlineBooleanOp::Xor,
        }
    }
}

impl std::fmt::Display for BooleanOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Union => write!(f, "union"),
            Self::Intersection => write!(f, "intersection"),
            Self::Difference => write!(f, "difference"),
            Self::Xor => write!(f, "xor"),
        }
    }
}

/// Result of a boolean operation or robust offset.
///
/// Outer rings are counter-clockwise, holes clockwise.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Regions {
    pub polygons: Vec<Polygon>,
    pub holes: Vec<Polygon>,
}

impl Regions {
    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    /// Enclosed area: outer rings minus holes.
    pub fn area(&self) -> f64 {
        let outer: f64 = self.polygons.iter().map(Polygon::area).sum();
        let holes: f64 = self.holes.iter().map(Polygon::area).sum();
        outer - holes
    }

    pub fn extend(&mut self, other: Regions) {
        self.polygons.extend(other.polygons);
        self.holes.extend(other.holes);
    }

    /// Files a ring by orientation: counter-clockwise rings are outer rings.
    fn push_ring(&mut self, points: Vec<Vector>) {
        if points.len() < 3 {
            return;
        }
        let mut ring = Polygon::new(points);
        if ring.area() <= f64::EPSILON {
            return;
        }
        if ring.is_cw() {
            self.holes.push(ring);
        } else {
            ring.reorient_ccw();
            self.polygons.push(ring);
        }
    }
}

/// Runs the clipper and converts both result sets back to rings.
pub(crate) fn pline_boolean(a: &Pline<f64>, b: &Pline<f64>, op: BooleanOp, cfg: &GeometryConfig) -> GeometryResult<Regions> {
    let Ok(result) = panic::catch_unwind(AssertUnwindSafe(|| a.boolean(b, op.pline_op()))) else {
        warn!(%op, "panic during pline boolean");
        return Err(GeometryError::Clipping {
            reason: format!("{op} clipping panicked"),
        });
    };
    let mut regions = Regions::default();
    for pos in &result.pos_plines {
        let mut ring = Polygon::new(from_pline(&pos.pline, &cfg.sampling, &cfg.fixed_point));
        if ring.len() >= 3 {
            ring.reorient_ccw();
            regions.polygons.push(ring);
        }
    }
    for neg in &result.neg_plines {
        let mut ring = Polygon::new(from_pline(&neg.pline, &cfg.sampling, &cfg.fixed_point));
        if ring.len() >= 3 {
            ring.reorient_cw();
            regions.holes.push(ring);
        }
    }
    debug!(
        %op,
        polygons = regions.polygons.len(),
        holes = regions.holes.len(),
        "pline boolean finished"
    );
    Ok(regions)
}

/// Boolean of two simple polygons on the fixed-point grid.
pub fn polygon_boolean(a: &Polygon, b: &Polygon, op: BooleanOp, cfg: &GeometryConfig) -> GeometryResult<Regions> {
    for p in [a, b] {
        if p.len() < 3 || p.area() <= cfg.tolerance.epsilon {
            return Err(GeometryError::degenerate("boolean operand bounds no area"));
        }
    }
    let pa = to_pline(a.points(), true, &cfg.fixed_point);
    let pb = to_pline(b.points(), true, &cfg.fixed_point);
    pline_boolean(&pa, &pb, op, cfg)
}

/// Boundary of a closed shape for the analytic path.
enum Boundary {
    Ring(Polygon),
    Circle(Circle),
    Ellipse(Ellipse),
}

impl Boundary {
    fn of(shape: &Shape) -> Option<Self> {
        let ring = |mut p: Polygon| {
            p.reorient_ccw();
            Boundary::Ring(p)
        };
        match shape {
            Shape::Polygon(p) => Some(ring(p.clone())),
            Shape::Rect(r) => Some(ring(Polygon::from_rect(r))),
            Shape::Triangle(t) => Some(ring(Polygon::from_triangle(t))),
            Shape::Circle(c) => Some(Boundary::Circle(*c)),
            Shape::Ellipse(e) if !e.is_arc() => Some(Boundary::Ellipse(*e)),
            _ => None,
        }
    }

    /// Counter-clockwise chains between consecutive cut points. Without cuts
    /// the whole boundary comes back as one closed chain.
    fn pieces(&self, cuts: &[Vector], cfg: &GeometryConfig) -> Vec<Vec<Vector>> {
        let closed = |mut pts: Vec<Vector>| {
            if let Some(first) = pts.first().copied() {
                pts.push(first);
            }
            vec![pts]
        };
        match self {
            Boundary::Ring(p) => {
                let chains = split_polygon(p, cuts, cfg);
                if chains.is_empty() {
                    closed(p.points().to_vec())
                } else {
                    chains.into_iter().map(Polyline::into_points).collect()
                }
            }
            Boundary::Circle(c) => {
                let arcs = split_circle(c, cuts);
                if arcs.is_empty() {
                    closed(circle_to_polygon(c, &cfg.sampling).into_points())
                } else {
                    arcs.iter()
                        .map(|a| arc_to_polyline(a, &cfg.sampling).into_points())
                        .collect()
                }
            }
            Boundary::Ellipse(e) => {
                let arcs = split_ellipse(e, cuts);
                if arcs.is_empty() {
                    closed(ellipse_to_polygon(e, &cfg.sampling).into_points())
                } else {
                    arcs.iter()
                        .map(|a| ellipse_to_polyline(a, &cfg.sampling).into_points())
                        .collect()
                }
            }
        }
    }
}

/// Point halfway along a chain.
fn chain_midpoint(chain: &[Vector]) -> Option<Vector> {
    let pl = Polyline::new(chain.to_vec());
    pl.point_at_length(pl.length() / 2.0)
}

/// Joins chains end to start into closed loops. Chains that never close are dropped.
fn stitch(mut chains: Vec<Vec<Vector>>, tolerance: f64) -> Vec<Vec<Vector>> {
    let mut loops = Vec::new();
    while let Some(mut current) = chains.pop() {
        loop {
            let (Some(first), Some(last)) = (current.first().copied(), current.last().copied()) else {
                break;
            };
            if current.len() > 2 && first.approx_eq(&last, tolerance) {
                current.pop();
                loops.push(current);
                break;
            }
            let next = chains
                .iter()
                .position(|c| c.first().is_some_and(|p| p.approx_eq(&last, tolerance)));
            match next {
                Some(i) => {
                    let chain = chains.swap_remove(i);
                    current.extend_from_slice(&chain[1..]);
                }
                None => {
                    warn!(points = current.len(), "boolean boundary chain left open");
                    break;
                }
            }
        }
    }
    loops
}

/// Cut, classify and stitch for one of union, intersection or difference.
fn assemble(
    a: (&Shape, &Boundary),
    b: (&Shape, &Boundary),
    cuts: &[Vector],
    op: BooleanOp,
    cfg: &GeometryConfig,
) -> Regions {
    let inside_of = |chain: &[Vector], other: &Shape| chain_midpoint(chain).is_some_and(|m| is_inside(&m, other, false));

    let mut selected = Vec::new();
    for chain in a.1.pieces(cuts, cfg) {
        let inside = inside_of(&chain, b.0);
        let keep = match op {
            BooleanOp::Union | BooleanOp::Difference => !inside,
            BooleanOp::Intersection => inside,
            BooleanOp::Xor => false,
        };
        if keep {
            selected.push(chain);
        }
    }
    for mut chain in b.1.pieces(cuts, cfg) {
        let inside = inside_of(&chain, a.0);
        match op {
            BooleanOp::Union if !inside => selected.push(chain),
            BooleanOp::Intersection if inside => selected.push(chain),
            BooleanOp::Difference if inside => {
                chain.reverse();
                selected.push(chain);
            }
            _ => {}
        }
    }

    let tolerance = cfg.tolerance.point_merge * 100.0;
    let mut regions = Regions::default();
    for ring in stitch(selected, tolerance) {
        regions.push_ring(simplify(&ring, true, cfg.fixed_point.simplify_tolerance));
    }
    regions
}

fn analytic_boolean(a: &Shape, ba: &Boundary, b: &Shape, bb: &Boundary, op: BooleanOp, cfg: &GeometryConfig) -> Regions {
    let cuts = intersection_points(a, b, cfg);
    debug!(%op, cuts = cuts.len(), "analytic boolean");
    match op {
        BooleanOp::Xor => {
            let mut regions = assemble((a, ba), (b, bb), &cuts, BooleanOp::Difference, cfg);
            regions.extend(assemble((b, bb), (a, ba), &cuts, BooleanOp::Difference, cfg));
            regions
        }
        _ => assemble((a, ba), (b, bb), &cuts, op, cfg),
    }
}

/// `op` applied to two closed shapes.
///
/// Open shapes bound no area and are rejected.
pub fn shape_boolean(a: &Shape, b: &Shape, op: BooleanOp, cfg: &GeometryConfig) -> GeometryResult<Regions> {
    if let (Shape::Circle(ca), Shape::Circle(cb)) = (a, b) {
        if ca.radius <= 0.0 || cb.radius <= 0.0 {
            return Err(GeometryError::degenerate("circle with non-positive radius"));
        }
        let pa = circle_pline(&ca.center, ca.radius, &cfg.fixed_point);
        let pb = circle_pline(&cb.center, cb.radius, &cfg.fixed_point);
        return pline_boolean(&pa, &pb, op, cfg);
    }

    let conic = |s: &Shape| matches!(s, Shape::Circle(_) | Shape::Ellipse(_));
    if conic(a) || conic(b) {
        if let (Some(ba), Some(bb)) = (Boundary::of(a), Boundary::of(b)) {
            if a.is_empty() || b.is_empty() {
                return Err(GeometryError::degenerate("boolean operand bounds no area"));
            }
            return Ok(analytic_boolean(a, &ba, b, &bb, op, cfg));
        }
    }

    let (Some(pa), Some(pb)) = (shape_to_polygon(a, cfg), shape_to_polygon(b, cfg)) else {
        warn!(a = %a.kind(), b = %b.kind(), "boolean on a shape without area");
        return Err(GeometryError::degenerate(format!(
            "{} and {} do not both bound an area",
            a.kind(),
            b.kind()
        )));
    };
    polygon_boolean(&pa, &pb, op, cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AABBRect;
    use std::f64::consts::PI;

    fn square(x: f64, y: f64, size: f64) -> Polygon {
        Polygon::from_coords(&[x, y, x + size, y, x + size, y + size, x, y + size])
    }

    #[test]
    fn test_overlapping_squares() {
        let cfg = GeometryConfig::default();
        let (a, b) = (square(0.0, 0.0, 4.0), square(2.0, 2.0, 4.0));
        let union = polygon_boolean(&a, &b, BooleanOp::Union, &cfg).unwrap();
        assert_eq!(union.polygons.len(), 1);
        assert!((union.area() - 28.0).abs() < 1e-6);
        let inter = polygon_boolean(&a, &b, BooleanOp::Intersection, &cfg).unwrap();
        assert!((inter.area() - 4.0).abs() < 1e-6);
        let diff = polygon_boolean(&a, &b, BooleanOp::Difference, &cfg).unwrap();
        assert!((diff.area() - 12.0).abs() < 1e-6);
    }

    #[test]
    fn test_difference_leaves_hole() {
        let cfg = GeometryConfig::default();
        let outer = Shape::Rect(AABBRect::new(0.0, 0.0, 10.0, 10.0));
        let inner = Shape::Circle(Circle::from_coords(5.0, 5.0, 2.0));
        let regions = shape_boolean(&outer, &inner, BooleanOp::Difference, &cfg).unwrap();
        assert_eq!(regions.polygons.len(), 1);
        assert_eq!(regions.holes.len(), 1);
        assert!((regions.area() - (100.0 - PI * 4.0)).abs() < 0.05);
    }

    #[test]
    fn test_circle_union_keeps_arcs() {
        let cfg = GeometryConfig::default();
        let a = Shape::Circle(Circle::from_coords(0.0, 0.0, 5.0));
        let b = Shape::Circle(Circle::from_coords(8.0, 0.0, 5.0));
        let inter = shape_boolean(&a, &b, BooleanOp::Intersection, &cfg).unwrap();
        // Lens of two radius 5 circles 8 apart.
        let half = (4.0f64 / 5.0).acos();
        let lens = 2.0 * (25.0 * half - 4.0 * 3.0);
        assert!((inter.area() - lens).abs() < 0.01);
    }

    #[test]
    fn test_open_shape_rejected() {
        let cfg = GeometryConfig::default();
        let line = Shape::Line(crate::model::Line::from_coords(0.0, 0.0, 1.0, 1.0));
        let rect = Shape::Rect(AABBRect::new(0.0, 0.0, 2.0, 2.0));
        assert!(shape_boolean(&line, &rect, BooleanOp::Union, &cfg).is_err());
    }
}
