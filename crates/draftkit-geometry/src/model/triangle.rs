use serde::{Deserialize, Serialize};

use super::{AABBRect, GeometryObject, Line, Transform, Vector};

/// Exactly three points.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Triangle {
    points: [Vector; 3],
}

impl Triangle {
    pub fn new(a: Vector, b: Vector, c: Vector) -> Self {
        Self { points: [a, b, c] }
    }

    pub fn points(&self) -> &[Vector; 3] {
        &self.points
    }

    pub fn signed_area(&self) -> f64 {
        let [a, b, c] = self.points;
        0.5 * (b - a).cross(&(c - a))
    }

    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    pub fn is_cw(&self) -> bool {
        self.signed_area() < 0.0
    }

    pub fn edges(&self) -> [Line; 3] {
        let [a, b, c] = self.points;
        [Line::new(a, b), Line::new(b, c), Line::new(c, a)]
    }

    pub fn centroid(&self) -> Vector {
        let [a, b, c] = self.points;
        (a + b + c) / 3.0
    }

    /// Edge indices `(ours, theirs)` of the first edge both triangles share, in either direction.
    pub fn shared_edge(&self, other: &Triangle, tolerance: f64) -> Option<(usize, usize)> {
        for i in 0..3 {
            let (a, b) = (self.points[i], self.points[(i + 1) % 3]);
            for j in 0..3 {
                let (c, d) = (other.points[j], other.points[(j + 1) % 3]);
                if (a.approx_eq(&d, tolerance) && b.approx_eq(&c, tolerance))
                    || (a.approx_eq(&c, tolerance) && b.approx_eq(&d, tolerance))
                {
                    return Some((i, j));
                }
            }
        }
        None
    }
}

impl GeometryObject for Triangle {
    fn transform(&mut self, t: &Transform) {
        for p in &mut self.points {
            *p = t.apply(*p);
        }
    }

    fn bounding_rect(&self) -> AABBRect {
        AABBRect::from_points(self.points)
    }

    fn length(&self) -> f64 {
        self.edges().iter().map(|e| e.length()).sum()
    }

    fn is_empty(&self) -> bool {
        self.area() <= f64::EPSILON
    }
}
