use serde::{Deserialize, Serialize};

use draftkit_core::EPSILON;

use super::{AABBRect, GeometryObject, ParametricCurve, Transform, Vector};

/// Straight segment from `front` to `back`.
///
/// Whether a query treats it as the infinite carrier line is decided per call.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Line {
    pub front: Vector,
    pub back: Vector,
}

impl Line {
    pub fn new(front: Vector, back: Vector) -> Self {
        Self { front, back }
    }

    pub fn from_coords(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self::new(Vector::new(x0, y0), Vector::new(x1, y1))
    }

    /// Vector from `front` to `back`.
    pub fn direction(&self) -> Vector {
        self.back - self.front
    }

    pub fn midpoint(&self) -> Vector {
        self.front.midpoint(&self.back)
    }

    pub fn point_at(&self, t: f64) -> Vector {
        self.front.lerp(&self.back, t)
    }

    /// Segment with zero length, which degrades to a point in every query.
    pub fn is_degenerate(&self) -> bool {
        self.direction().length_squared() <= EPSILON * EPSILON
    }

    /// Parameter of the orthogonal projection of `p` on the carrier line.
    pub fn project(&self, p: &Vector) -> f64 {
        let d = self.direction();
        let len2 = d.length_squared();
        if len2 <= EPSILON * EPSILON {
            return 0.0;
        }
        (*p - self.front).dot(&d) / len2
    }

    pub fn reversed(&self) -> Line {
        Line::new(self.back, self.front)
    }

    /// Parallel copy shifted `distance` to the left of the direction.
    pub fn shifted(&self, distance: f64) -> Line {
        let n = self.direction().perpendicular().normalized() * distance;
        Line::new(self.front + n, self.back + n)
    }
}

impl ParametricCurve for Line {
    fn point_at(&self, t: f64) -> Vector {
        Line::point_at(self, t)
    }

    fn derivative_at(&self, _t: f64) -> Vector {
        self.direction()
    }

    fn domain(&self) -> (f64, f64) {
        (0.0, 1.0)
    }
}

impl GeometryObject for Line {
    fn transform(&mut self, t: &Transform) {
        self.front = t.apply(self.front);
        self.back = t.apply(self.back);
    }

    fn bounding_rect(&self) -> AABBRect {
        AABBRect::from_points([self.front, self.back])
    }

    fn length(&self) -> f64 {
        self.direction().length()
    }

    fn is_empty(&self) -> bool {
        self.is_degenerate()
    }
}
