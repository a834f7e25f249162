use nalgebra::Matrix2;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

use super::{AABBRect, GeometryObject, ParametricCurve, Transform, Vector};

/// Ellipse described by its principal axis end points.
///
/// `a0`/`a1` are the ends of the first semi-axis pair and `b0`/`b1` the ends
/// of the second, with `b1` a quarter turn counter-clockwise from `a1`. The
/// parametric form is `c + cos(t)·(a1 − c) + sin(t)·(b1 − c)`.
///
/// The arc window `[angle0, angle1]` is in parametric angle and always sweeps
/// counter-clockwise; a full ellipse has the window `[0, TAU]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ellipse {
    a0: Vector,
    a1: Vector,
    b0: Vector,
    b1: Vector,
    angle0: f64,
    angle1: f64,
    is_arc: bool,
}

impl Ellipse {
    /// Full ellipse with semi-axes `a` and `b`, the `a` axis rotated by `rotation` radians.
    pub fn new(center: Vector, a: f64, b: f64, rotation: f64) -> Self {
        let u = Vector::from_angle(rotation);
        let v = u.perpendicular();
        let (a, b) = (a.abs(), b.abs());
        Self {
            a0: center - u * a,
            a1: center + u * a,
            b0: center - v * b,
            b1: center + v * b,
            angle0: 0.0,
            angle1: TAU,
            is_arc: false,
        }
    }

    /// Rebuilds from axis end points; the `b` pair is reordered to keep the frame right-handed.
    pub fn from_axis_points(a0: Vector, a1: Vector, b0: Vector, b1: Vector) -> Self {
        let center = a0.midpoint(&a1);
        let (b0, b1) = if (a1 - center).cross(&(b1 - center)) < 0.0 {
            (b1, b0)
        } else {
            (b0, b1)
        };
        Self {
            a0,
            a1,
            b0,
            b1,
            angle0: 0.0,
            angle1: TAU,
            is_arc: false,
        }
    }

    /// Elliptic arc from parametric angle `angle0` counter-clockwise to `angle1`.
    pub fn new_arc(center: Vector, a: f64, b: f64, rotation: f64, angle0: f64, angle1: f64) -> Self {
        let mut ellipse = Self::new(center, a, b, rotation);
        ellipse.set_arc(angle0, angle1);
        ellipse
    }

    pub fn axis_points(&self) -> [Vector; 4] {
        [self.a0, self.a1, self.b0, self.b1]
    }

    pub fn center(&self) -> Vector {
        self.a0.midpoint(&self.a1)
    }

    /// Length of the `a` semi-axis.
    pub fn lengtha(&self) -> f64 {
        self.a1.distance_to(&self.center())
    }

    /// Length of the `b` semi-axis.
    pub fn lengthb(&self) -> f64 {
        self.b1.distance_to(&self.center())
    }

    /// Rotation of the `a` axis in radians.
    pub fn angle(&self) -> f64 {
        (self.a1 - self.center()).angle()
    }

    pub fn is_arc(&self) -> bool {
        self.is_arc
    }

    pub fn arc_angle0(&self) -> f64 {
        self.angle0
    }

    pub fn arc_angle1(&self) -> f64 {
        self.angle1
    }

    /// Restricts to the counter-clockwise window from `angle0` to `angle1`.
    pub fn set_arc(&mut self, angle0: f64, angle1: f64) {
        let start = angle0.rem_euclid(TAU);
        let mut sweep = (angle1 - angle0).rem_euclid(TAU);
        if sweep == 0.0 {
            sweep = TAU;
        }
        self.angle0 = start;
        self.angle1 = start + sweep;
        self.is_arc = sweep < TAU;
    }

    pub fn clear_arc(&mut self) {
        self.angle0 = 0.0;
        self.angle1 = TAU;
        self.is_arc = false;
    }

    /// True when the parametric angle lies inside the arc window.
    pub fn window_contains(&self, t: f64, tolerance: f64) -> bool {
        if !self.is_arc {
            return true;
        }
        let rel = (t - self.angle0).rem_euclid(TAU);
        rel <= self.angle1 - self.angle0 + tolerance || rel >= TAU - tolerance
    }

    pub fn arc_start(&self) -> Vector {
        self.point_at(self.angle0)
    }

    pub fn arc_end(&self) -> Vector {
        self.point_at(self.angle1)
    }

    /// Affine map taking the unit circle onto this ellipse.
    pub fn unit_circle_transform(&self) -> Transform {
        let c = self.center();
        let u = self.a1 - c;
        let v = self.b1 - c;
        Transform::from_rows([u.x, v.x, c.x], [u.y, v.y, c.y])
    }

    /// Parametric angle of the point on the ellipse radially closest in the unit-circle frame.
    pub fn parameter_of(&self, p: &Vector) -> f64 {
        match self.unit_circle_transform().inverse() {
            Some(inv) => inv.apply(*p).angle().rem_euclid(TAU),
            None => 0.0,
        }
    }

    pub fn area(&self) -> f64 {
        std::f64::consts::PI * self.lengtha() * self.lengthb()
    }

    fn extreme_parameters(&self) -> [f64; 4] {
        let c = self.center();
        let u = self.a1 - c;
        let v = self.b1 - c;
        let tx = (v.x).atan2(u.x);
        let ty = (v.y).atan2(u.y);
        [tx, tx + std::f64::consts::PI, ty, ty + std::f64::consts::PI]
    }
}

impl ParametricCurve for Ellipse {
    fn point_at(&self, t: f64) -> Vector {
        let c = self.center();
        let (sin, cos) = t.sin_cos();
        c + (self.a1 - c) * cos + (self.b1 - c) * sin
    }

    fn derivative_at(&self, t: f64) -> Vector {
        let c = self.center();
        let (sin, cos) = t.sin_cos();
        (self.b1 - c) * cos - (self.a1 - c) * sin
    }

    fn domain(&self) -> (f64, f64) {
        (self.angle0, self.angle1)
    }

    fn segment_count(&self) -> usize {
        (((self.angle1 - self.angle0) / std::f64::consts::FRAC_PI_2).ceil() as usize).max(1)
    }
}

impl GeometryObject for Ellipse {
    /// Maps the conjugate diameters and re-derives principal axes with an SVD,
    /// so shear and non-uniform scale are represented exactly.
    fn transform(&mut self, t: &Transform) {
        let window = self
            .is_arc
            .then(|| (t.apply(self.arc_start()), t.apply(self.arc_end())));

        let c = self.center();
        let u = t.apply_vector(self.a1 - c);
        let v = t.apply_vector(self.b1 - c);
        let center = t.apply(c);
        let m = Matrix2::new(u.x, v.x, u.y, v.y);
        let svd = m.svd(true, false);
        let (axis_a, axis_b) = match svd.u {
            Some(basis) => {
                let s = svd.singular_values;
                let col0 = Vector::new(basis[(0, 0)], basis[(1, 0)]) * s[0];
                let col1 = Vector::new(basis[(0, 1)], basis[(1, 1)]) * s[1];
                (col0, col1)
            }
            None => (u, v),
        };
        let axis_b = if axis_a.cross(&axis_b) < 0.0 { -axis_b } else { axis_b };

        self.a0 = center - axis_a;
        self.a1 = center + axis_a;
        self.b0 = center - axis_b;
        self.b1 = center + axis_b;

        if let Some((start, end)) = window {
            let (t0, t1) = (self.parameter_of(&start), self.parameter_of(&end));
            if t.is_reflection() {
                self.set_arc(t1, t0);
            } else {
                self.set_arc(t0, t1);
            }
        }
    }

    fn bounding_rect(&self) -> AABBRect {
        let mut points = Vec::with_capacity(6);
        if self.is_arc {
            points.push(self.arc_start());
            points.push(self.arc_end());
        }
        for t in self.extreme_parameters() {
            if self.window_contains(t, 0.0) {
                points.push(self.point_at(t));
            }
        }
        AABBRect::from_points(points)
    }

    /// Arc length by composite Simpson integration of the speed.
    fn length(&self) -> f64 {
        const STEPS: usize = 512;
        let (t0, t1) = self.domain();
        let h = (t1 - t0) / STEPS as f64;
        let speed = |t: f64| self.derivative_at(t).length();
        let mut sum = speed(t0) + speed(t1);
        for i in 1..STEPS {
            let w = if i % 2 == 1 { 4.0 } else { 2.0 };
            sum += w * speed(t0 + h * i as f64);
        }
        sum * h / 3.0
    }

    fn is_empty(&self) -> bool {
        self.lengtha() <= 0.0 || self.lengthb() <= 0.0
    }
}
