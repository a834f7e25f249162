use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

use super::{AABBRect, Circle, GeometryObject, ParametricCurve, Transform, Vector};

/// Circular arc through three control points.
///
/// `control[0]` is the start, `control[2]` the end and `control[1]` any point
/// strictly between them; the middle point fixes the travel direction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arc {
    pub center: Vector,
    pub radius: f64,
    control: [Vector; 3],
}

impl Arc {
    /// Arc through `start`, `mid` and `end`; `None` when the points are collinear.
    pub fn from_three_points(start: Vector, mid: Vector, end: Vector) -> Option<Self> {
        let circle = Circle::from_three_points(start, mid, end)?;
        Some(Self {
            center: circle.center,
            radius: circle.radius,
            control: [start, mid, end],
        })
    }

    /// Arc on a circle from `start_angle` to `end_angle`, travelling counter-clockwise when `ccw`.
    pub fn from_center(center: Vector, radius: f64, start_angle: f64, end_angle: f64, ccw: bool) -> Self {
        let mut sweep = if ccw {
            (end_angle - start_angle).rem_euclid(TAU)
        } else {
            -(start_angle - end_angle).rem_euclid(TAU)
        };
        if sweep == 0.0 {
            sweep = if ccw { TAU } else { -TAU };
        }
        Self::from_sweep(center, radius, start_angle, sweep)
    }

    /// Arc starting at `start_angle` sweeping `sweep` radians (negative is clockwise).
    pub fn from_sweep(center: Vector, radius: f64, start_angle: f64, sweep: f64) -> Self {
        let radius = radius.abs();
        let at = |a: f64| center + Vector::from_angle(a) * radius;
        Self {
            center,
            radius,
            control: [
                at(start_angle),
                at(start_angle + sweep * 0.5),
                at(start_angle + sweep),
            ],
        }
    }

    pub fn control_points(&self) -> &[Vector; 3] {
        &self.control
    }

    pub fn start(&self) -> Vector {
        self.control[0]
    }

    pub fn mid(&self) -> Vector {
        self.control[1]
    }

    pub fn end(&self) -> Vector {
        self.control[2]
    }

    pub fn start_angle(&self) -> f64 {
        (self.control[0] - self.center).angle().rem_euclid(TAU)
    }

    pub fn end_angle(&self) -> f64 {
        (self.control[2] - self.center).angle().rem_euclid(TAU)
    }

    /// Signed sweep from start to end, positive counter-clockwise.
    ///
    /// Coincident start and end points describe a full counter-clockwise turn.
    pub fn sweep(&self) -> f64 {
        if self.control[0].approx_eq(&self.control[2], 1e-9 * self.radius.max(1.0)) {
            return if self.control[1].approx_eq(&self.control[0], 1e-9 * self.radius.max(1.0)) {
                0.0
            } else {
                TAU
            };
        }
        let start = self.start_angle();
        let ccw_to_end = (self.end_angle() - start).rem_euclid(TAU);
        let ccw_to_mid = ((self.control[1] - self.center).angle() - start).rem_euclid(TAU);
        if ccw_to_mid <= ccw_to_end {
            ccw_to_end
        } else {
            ccw_to_end - TAU
        }
    }

    pub fn is_cw(&self) -> bool {
        self.sweep() < 0.0
    }

    /// The arc as a counter-clockwise window `[angle0, angle1]`, with `angle1 >= angle0`.
    pub fn ccw_window(&self) -> (f64, f64) {
        let sweep = self.sweep();
        if sweep >= 0.0 {
            let a0 = self.start_angle();
            (a0, a0 + sweep)
        } else {
            let a0 = self.end_angle();
            (a0, a0 - sweep)
        }
    }

    /// True when the polar angle `angle` lies on the arc, within `tolerance` radians.
    pub fn contains_angle(&self, angle: f64, tolerance: f64) -> bool {
        let (a0, a1) = self.ccw_window();
        let rel = (angle - a0).rem_euclid(TAU);
        rel <= a1 - a0 + tolerance || rel >= TAU - tolerance
    }

    /// Point at normalised parameter `u` in `[0, 1]` from start to end.
    pub fn point_at(&self, u: f64) -> Vector {
        self.center + Vector::from_angle(self.start_angle() + self.sweep() * u) * self.radius
    }

    pub fn circle(&self) -> Circle {
        Circle::new(self.center, self.radius)
    }

    pub fn reversed(&self) -> Arc {
        Arc {
            center: self.center,
            radius: self.radius,
            control: [self.control[2], self.control[1], self.control[0]],
        }
    }
}

impl ParametricCurve for Arc {
    fn point_at(&self, u: f64) -> Vector {
        Arc::point_at(self, u)
    }

    fn derivative_at(&self, u: f64) -> Vector {
        let sweep = self.sweep();
        Vector::from_angle(self.start_angle() + sweep * u).perpendicular() * (self.radius * sweep)
    }

    fn domain(&self) -> (f64, f64) {
        (0.0, 1.0)
    }

    fn segment_count(&self) -> usize {
        ((self.sweep().abs() / std::f64::consts::FRAC_PI_2).ceil() as usize).max(1)
    }
}

impl GeometryObject for Arc {
    fn transform(&mut self, t: &Transform) {
        let control = self.control.map(|p| t.apply(p));
        match Circle::from_three_points(control[0], control[1], control[2]) {
            Some(circle) => {
                self.center = circle.center;
                self.radius = circle.radius;
            }
            None => {
                self.center = t.apply(self.center);
                self.radius *= t.uniform_scale();
            }
        }
        self.control = control;
    }

    fn bounding_rect(&self) -> AABBRect {
        let mut points = vec![self.start(), self.end()];
        for k in 0..4 {
            let a = k as f64 * std::f64::consts::FRAC_PI_2;
            if self.contains_angle(a, 0.0) {
                points.push(self.center + Vector::from_angle(a) * self.radius);
            }
        }
        AABBRect::from_points(points)
    }

    fn length(&self) -> f64 {
        self.radius * self.sweep().abs()
    }

    fn is_empty(&self) -> bool {
        self.radius <= 0.0 || self.sweep() == 0.0
    }
}
