use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

use super::{AABBRect, GeometryObject, ParametricCurve, Transform, Vector};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Circle {
    pub center: Vector,
    pub radius: f64,
}

impl Circle {
    pub fn new(center: Vector, radius: f64) -> Self {
        Self {
            center,
            radius: radius.abs(),
        }
    }

    pub fn from_coords(x: f64, y: f64, radius: f64) -> Self {
        Self::new(Vector::new(x, y), radius)
    }

    /// Circumscribed circle of three points, `None` when they are collinear.
    pub fn from_three_points(a: Vector, b: Vector, c: Vector) -> Option<Self> {
        let d = 2.0 * (a.x * (b.y - c.y) + b.x * (c.y - a.y) + c.x * (a.y - b.y));
        if d.abs() <= f64::EPSILON * (a.length_squared() + b.length_squared() + c.length_squared()).max(1.0) {
            return None;
        }
        let (a2, b2, c2) = (a.length_squared(), b.length_squared(), c.length_squared());
        let center = Vector::new(
            (a2 * (b.y - c.y) + b2 * (c.y - a.y) + c2 * (a.y - b.y)) / d,
            (a2 * (c.x - b.x) + b2 * (a.x - c.x) + c2 * (b.x - a.x)) / d,
        );
        Some(Self::new(center, center.distance_to(&a)))
    }

    pub fn area(&self) -> f64 {
        std::f64::consts::PI * self.radius * self.radius
    }

    pub fn point_at(&self, angle: f64) -> Vector {
        self.center + Vector::from_angle(angle) * self.radius
    }

    /// Polar angle of `p` around the center, normalised to `[0, TAU)`.
    pub fn angle_of(&self, p: &Vector) -> f64 {
        (*p - self.center).angle().rem_euclid(TAU)
    }
}

/// Parameterised by polar angle.
impl ParametricCurve for Circle {
    fn point_at(&self, t: f64) -> Vector {
        Circle::point_at(self, t)
    }

    fn derivative_at(&self, t: f64) -> Vector {
        Vector::from_angle(t).perpendicular() * self.radius
    }

    fn domain(&self) -> (f64, f64) {
        (0.0, TAU)
    }

    fn segment_count(&self) -> usize {
        4
    }
}

impl GeometryObject for Circle {
    /// Non-uniform transforms keep the circle round using the mean scale.
    fn transform(&mut self, t: &Transform) {
        self.center = t.apply(self.center);
        self.radius *= t.uniform_scale();
    }

    fn bounding_rect(&self) -> AABBRect {
        AABBRect::new(
            self.center.x - self.radius,
            self.center.y - self.radius,
            self.center.x + self.radius,
            self.center.y + self.radius,
        )
    }

    fn length(&self) -> f64 {
        TAU * self.radius
    }

    fn is_empty(&self) -> bool {
        self.radius <= 0.0
    }
}
