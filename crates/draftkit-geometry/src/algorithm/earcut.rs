//! Polygon triangulation.
//!
//! Two triangulators are provided. [`ear_cut_to_indexs`] and
//! [`ear_cut_with_holes`] delegate to `earcutr` and handle holes. The ring
//! clipper behind [`ear_cut_to_triangles`] walks a doubly linked index ring
//! and reports a non-simple polygon instead of guessing when a pass over the
//! ring finds no ear.

use tracing::{debug, warn};

use draftkit_core::{GeometryError, GeometryResult, EPSILON};

use super::intersection::is_self_intersected;
use super::predicate::is_inside_triangle;
use crate::model::{MarkedPoint, Polygon, Triangle, Vector};

fn flatten(points: &[Vector], coords: &mut Vec<f64>) {
    coords.reserve(points.len() * 2);
    for p in points {
        coords.push(p.x);
        coords.push(p.y);
    }
}

/// Triangle index triples into the polygon's vertex order.
#[doc(alias = "ear_cut_to_indices")]
pub fn ear_cut_to_indexs(polygon: &Polygon) -> Vec<usize> {
    if polygon.len() < 3 {
        return Vec::new();
    }
    let mut coords = Vec::new();
    flatten(polygon.points(), &mut coords);
    match earcutr::earcut(&coords, &[], 2) {
        Ok(indices) => indices,
        Err(err) => {
            warn!(?err, vertices = polygon.len(), "earcut rejected polygon");
            Vec::new()
        }
    }
}

/// Triangulates an outer ring with holes.
pub fn ear_cut_with_holes(outer: &Polygon, holes: &[Polygon]) -> Vec<Triangle> {
    if outer.len() < 3 {
        return Vec::new();
    }
    let mut vertices: Vec<Vector> = outer.points().to_vec();
    let mut hole_starts = Vec::with_capacity(holes.len());
    for hole in holes.iter().filter(|h| h.len() >= 3) {
        hole_starts.push(vertices.len());
        vertices.extend_from_slice(hole.points());
    }
    let mut coords = Vec::new();
    flatten(&vertices, &mut coords);
    let indices = match earcutr::earcut(&coords, &hole_starts, 2) {
        Ok(indices) => indices,
        Err(err) => {
            warn!(?err, holes = hole_starts.len(), "earcut rejected polygon with holes");
            return Vec::new();
        }
    };
    indices
        .chunks_exact(3)
        .map(|t| Triangle::new(vertices[t[0]], vertices[t[1]], vertices[t[2]]))
        .collect()
}

/// Index ring with O(1) unlinking.
struct Ring {
    prev: Vec<usize>,
    next: Vec<usize>,
    len: usize,
    head: usize,
}

impl Ring {
    fn new(len: usize) -> Self {
        Self {
            prev: (0..len).map(|i| (i + len - 1) % len).collect(),
            next: (0..len).map(|i| (i + 1) % len).collect(),
            len,
            head: 0,
        }
    }

    fn unlink(&mut self, i: usize) {
        let (p, n) = (self.prev[i], self.next[i]);
        self.next[p] = n;
        self.prev[n] = p;
        self.len -= 1;
        if self.head == i {
            self.head = n;
        }
    }

    fn indices(&self) -> Vec<usize> {
        let mut out = Vec::with_capacity(self.len);
        let mut i = self.head;
        for _ in 0..self.len {
            out.push(i);
            i = self.next[i];
        }
        out
    }
}

/// Cross product of the turn at `b`, with a collinearity tolerance relative
/// to the two edge lengths so the test reads the same at any scale.
fn turn(a: &Vector, b: &Vector, c: &Vector) -> (f64, f64) {
    let (ab, bc) = (*b - *a, *c - *b);
    (ab.cross(&bc), EPSILON * ab.length() * bc.length())
}

/// Inside or on the boundary of the counter-clockwise triangle `abc`.
fn in_triangle(q: &Vector, a: &Vector, b: &Vector, c: &Vector) -> bool {
    [(a, b), (b, c), (c, a)].iter().all(|(u, v)| {
        let (e, w) = (**v - **u, *q - **u);
        e.cross(&w) >= -EPSILON * e.length() * w.length()
    })
}

fn is_ear(points: &[Vector], ring: &Ring, i: usize) -> bool {
    let (p, n) = (ring.prev[i], ring.next[i]);
    let (a, b, c) = (points[p], points[i], points[n]);
    let (cross, tol) = turn(&a, &b, &c);
    if cross <= tol {
        return false;
    }
    let merge = EPSILON * (b - a).length().max((c - b).length());
    ring.indices().into_iter().all(|j| {
        if j == p || j == i || j == n {
            return true;
        }
        let q = points[j];
        if q.approx_eq(&a, merge) || q.approx_eq(&b, merge) || q.approx_eq(&c, merge) {
            return true;
        }
        !in_triangle(&q, &a, &b, &c)
    })
}

/// Index triples from the ring clipper, referring to the polygon's vertex order.
fn clip_ears(polygon: &Polygon) -> GeometryResult<Vec<[usize; 3]>> {
    let points = polygon.points();
    let n = points.len();
    if n < 3 {
        return Err(GeometryError::degenerate("polygon needs at least three vertices"));
    }
    if is_self_intersected(points, true) {
        warn!(vertices = n, "ring crosses itself");
        return Err(GeometryError::NonSimplePolygon { remaining: n });
    }
    // Clip in counter-clockwise order; indices still refer to the input.
    let order: Vec<usize> = if polygon.signed_area() < 0.0 {
        (0..n).rev().collect()
    } else {
        (0..n).collect()
    };
    let ccw: Vec<Vector> = order.iter().map(|&i| points[i]).collect();

    let mut ring = Ring::new(n);
    let mut out = Vec::with_capacity(n - 2);
    let mut passes = 0usize;
    while ring.len > 3 {
        passes += 1;
        let candidates = ring.indices();
        let ear = candidates.iter().copied().find(|&i| is_ear(&ccw, &ring, i));
        match ear {
            Some(i) => {
                out.push([order[ring.prev[i]], order[i], order[ring.next[i]]]);
                ring.unlink(i);
            }
            None => {
                // A vertex on a straight run is no ear but also bounds no area.
                let flat = candidates.iter().copied().find(|&i| {
                    let (a, b, c) = (ccw[ring.prev[i]], ccw[i], ccw[ring.next[i]]);
                    let (cross, tol) = turn(&a, &b, &c);
                    cross.abs() <= tol && (b - a).dot(&(c - b)) >= 0.0
                });
                match flat {
                    Some(i) => ring.unlink(i),
                    None => {
                        warn!(remaining = ring.len, passes, "ear clipping stalled");
                        return Err(GeometryError::NonSimplePolygon { remaining: ring.len });
                    }
                }
            }
        }
    }
    let last = ring.indices();
    let (a, b, c) = (ccw[last[0]], ccw[last[1]], ccw[last[2]]);
    let (cross, tol) = turn(&a, &b, &c);
    if cross > tol {
        out.push([order[last[0]], order[last[1]], order[last[2]]]);
    } else if cross < -tol {
        warn!(passes, "last triangle turns clockwise");
        return Err(GeometryError::NonSimplePolygon { remaining: 3 });
    }
    if out.is_empty() {
        warn!(vertices = n, "ring bounds no area");
        return Err(GeometryError::NonSimplePolygon { remaining: ring.len });
    }
    debug!(vertices = n, triangles = out.len(), passes, "ear clipping finished");
    Ok(out)
}

/// Triangulates a simple polygon with the ring clipper.
///
/// Fails with [`GeometryError::NonSimplePolygon`] when the ring crosses
/// itself, a full pass clips nothing or no triangle bounds any area.
pub fn ear_cut_to_triangles(polygon: &Polygon) -> GeometryResult<Vec<Triangle>> {
    let points = polygon.points();
    Ok(clip_ears(polygon)?
        .into_iter()
        .map(|[a, b, c]| Triangle::new(points[a], points[b], points[c]))
        .collect())
}

/// Ear-clipped triangles as marked points.
///
/// `value` is the source vertex index and `active` is set when the edge to
/// the next corner of the triangle is an edge of the polygon.
pub fn ear_cut_to_marked_points(polygon: &Polygon) -> GeometryResult<Vec<[MarkedPoint; 3]>> {
    let points = polygon.points();
    let n = points.len();
    let boundary = |a: usize, b: usize| (a + 1) % n == b || (b + 1) % n == a;
    Ok(clip_ears(polygon)?
        .into_iter()
        .map(|idx| {
            let corner = |k: usize| {
                let mut mp = MarkedPoint::new(points[idx[k]], idx[k]);
                mp.active = boundary(idx[k], idx[(k + 1) % 3]);
                mp
            };
            [corner(0), corner(1), corner(2)]
        })
        .collect())
}

/// Merges triangles into maximal polygons across shared edges.
///
/// A triangle joins a group when one of its edges matches a boundary edge of
/// the group and its apex is neither a group vertex already nor enclosed by a
/// triangle of the group.
pub fn merge_ear_cut_triangles(triangles: &[Triangle], tolerance: f64) -> Vec<Polygon> {
    let mut used = vec![false; triangles.len()];
    let mut merged = Vec::new();
    for start in 0..triangles.len() {
        if used[start] || triangles[start].area() <= EPSILON {
            used[start] = true;
            continue;
        }
        used[start] = true;
        let mut seed = triangles[start];
        if seed.is_cw() {
            let [a, b, c] = *seed.points();
            seed = Triangle::new(a, c, b);
        }
        let mut ring: Vec<Vector> = seed.points().to_vec();
        let mut members = vec![seed];

        let mut grew = true;
        while grew {
            grew = false;
            for (k, tri) in triangles.iter().enumerate() {
                if used[k] {
                    continue;
                }
                if let Some((slot, apex)) = absorb_slot(&ring, tri, tolerance) {
                    let enclosed = members.iter().any(|m| is_inside_triangle(&apex, m, false));
                    let duplicate = ring.iter().any(|v| v.approx_eq(&apex, tolerance));
                    if enclosed || duplicate {
                        continue;
                    }
                    ring.insert(slot + 1, apex);
                    members.push(*tri);
                    used[k] = true;
                    grew = true;
                }
            }
        }
        merged.push(Polygon::new(ring));
    }
    debug!(triangles = triangles.len(), polygons = merged.len(), "triangles merged");
    merged
}

/// Ring edge index shared with `tri` and the apex opposite that edge.
fn absorb_slot(ring: &[Vector], tri: &Triangle, tolerance: f64) -> Option<(usize, Vector)> {
    let n = ring.len();
    let pts = tri.points();
    for i in 0..n {
        let (a, b) = (ring[i], ring[(i + 1) % n]);
        for j in 0..3 {
            let (c, d) = (pts[j], pts[(j + 1) % 3]);
            let matches = (a.approx_eq(&d, tolerance) && b.approx_eq(&c, tolerance))
                || (a.approx_eq(&c, tolerance) && b.approx_eq(&d, tolerance));
            if matches {
                return Some((i, pts[(j + 2) % 3]));
            }
        }
    }
    None
}
