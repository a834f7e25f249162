use serde::{Deserialize, Serialize};
use std::ops::Index;

use super::{AABBRect, GeometryObject, Line, Polyline, Transform, Triangle, Vector};

/// Closed ring of points.
///
/// The last point connects back to the first implicitly; a duplicated closing
/// point is dropped on construction. Orientation is derived from the signed
/// area on every call and never stored.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Polygon {
    points: Vec<Vector>,
}

impl Polygon {
    pub fn new(mut points: Vec<Vector>) -> Self {
        while points.len() > 1 && points[0] == points[points.len() - 1] {
            points.pop();
        }
        Self { points }
    }

    pub fn from_coords(coords: &[f64]) -> Self {
        Self::new(Polyline::from_coords(coords).into_points())
    }

    pub fn from_polyline(polyline: &Polyline) -> Self {
        Self::new(polyline.points().to_vec())
    }

    pub fn from_rect(rect: &AABBRect) -> Self {
        Self::new(rect.corners().to_vec())
    }

    pub fn from_triangle(triangle: &Triangle) -> Self {
        Self::new(triangle.points().to_vec())
    }

    pub fn points(&self) -> &[Vector] {
        &self.points
    }

    pub fn into_points(self) -> Vec<Vector> {
        self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Index of the vertex after `index`, wrapping around.
    pub fn next_index(&self, index: usize) -> usize {
        (index + 1) % self.points.len()
    }

    /// Index of the vertex before `index`, wrapping around.
    pub fn prev_index(&self, index: usize) -> usize {
        (index + self.points.len() - 1) % self.points.len()
    }

    /// Edges including the closing edge.
    pub fn edges(&self) -> impl Iterator<Item = Line> + '_ {
        let n = self.points.len();
        (0..if n < 2 { 0 } else { n }).map(move |i| Line::new(self.points[i], self.points[(i + 1) % n]))
    }

    /// Shoelace area, positive for counter-clockwise rings.
    pub fn signed_area(&self) -> f64 {
        let n = self.points.len();
        if n < 3 {
            return 0.0;
        }
        (0..n)
            .map(|i| self.points[i].cross(&self.points[(i + 1) % n]))
            .sum::<f64>()
            * 0.5
    }

    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    pub fn is_cw(&self) -> bool {
        self.signed_area() < 0.0
    }

    /// Reverses the ring if needed so it runs counter-clockwise.
    pub fn reorient_ccw(&mut self) {
        if self.is_cw() {
            self.points.reverse();
        }
    }

    /// Reverses the ring if needed so it runs clockwise.
    pub fn reorient_cw(&mut self) {
        if !self.is_cw() {
            self.points.reverse();
        }
    }

    pub fn reverse(&mut self) {
        self.points.reverse();
    }

    /// Area centroid, falling back to the vertex average for degenerate rings.
    pub fn centroid(&self) -> Vector {
        let n = self.points.len();
        if n == 0 {
            return Vector::ZERO;
        }
        let a = self.signed_area();
        if a.abs() <= f64::EPSILON {
            let sum = self.points.iter().fold(Vector::ZERO, |acc, p| acc + *p);
            return sum / n as f64;
        }
        let mut c = Vector::ZERO;
        for i in 0..n {
            let p = self.points[i];
            let q = self.points[(i + 1) % n];
            c += (p + q) * p.cross(&q);
        }
        c / (6.0 * a)
    }

    pub fn is_convex(&self) -> bool {
        let n = self.points.len();
        if n < 3 {
            return false;
        }
        let mut sign = 0.0_f64;
        for i in 0..n {
            let a = self.points[i];
            let b = self.points[(i + 1) % n];
            let c = self.points[(i + 2) % n];
            let cross = (b - a).cross(&(c - b));
            if cross.abs() <= f64::EPSILON {
                continue;
            }
            if sign == 0.0 {
                sign = cross.signum();
            } else if sign != cross.signum() {
                return false;
            }
        }
        sign != 0.0
    }

    /// Open copy of the ring that repeats the first point at the end.
    pub fn to_closed_polyline(&self) -> Polyline {
        let mut points = self.points.clone();
        if let Some(first) = points.first().copied() {
            points.push(first);
        }
        Polyline::new(points)
    }

    pub fn dedup(&mut self, tolerance: f64) {
        self.points.dedup_by(|b, a| a.approx_eq(b, tolerance));
        while self.points.len() > 1
            && self.points[0].approx_eq(&self.points[self.points.len() - 1], tolerance)
        {
            self.points.pop();
        }
    }
}

impl Index<usize> for Polygon {
    type Output = Vector;

    fn index(&self, index: usize) -> &Vector {
        &self.points[index]
    }
}

impl FromIterator<Vector> for Polygon {
    fn from_iter<I: IntoIterator<Item = Vector>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl GeometryObject for Polygon {
    fn transform(&mut self, t: &Transform) {
        for p in &mut self.points {
            *p = t.apply(*p);
        }
    }

    fn bounding_rect(&self) -> AABBRect {
        AABBRect::from_points(self.points.iter().copied())
    }

    /// Perimeter including the closing edge.
    fn length(&self) -> f64 {
        self.edges().map(|e| e.length()).sum()
    }

    fn is_empty(&self) -> bool {
        self.points.len() < 3
    }
}
