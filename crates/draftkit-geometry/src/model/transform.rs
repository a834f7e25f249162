use nalgebra::{Matrix2, Matrix3, Vector3};
use serde::{Deserialize, Serialize};

use super::Vector;

/// 2D affine transform.
///
/// Stored as a homogeneous 3x3 matrix whose last row is always `[0, 0, 1]`,
/// so only the upper 2x3 block carries information.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    matrix: Matrix3<f64>,
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    pub fn identity() -> Self {
        Self {
            matrix: Matrix3::identity(),
        }
    }

    /// Builds a transform from the two rows `[a, b, c]` and `[d, e, f]`:
    /// `x' = a*x + b*y + c`, `y' = d*x + e*y + f`.
    pub fn from_rows(row0: [f64; 3], row1: [f64; 3]) -> Self {
        Self {
            matrix: Matrix3::new(
                row0[0], row0[1], row0[2], row1[0], row1[1], row1[2], 0.0, 0.0, 1.0,
            ),
        }
    }

    pub fn translation(dx: f64, dy: f64) -> Self {
        Self::from_rows([1.0, 0.0, dx], [0.0, 1.0, dy])
    }

    /// Counter-clockwise rotation by `radians` around `center`.
    pub fn rotation(center: Vector, radians: f64) -> Self {
        let (sin, cos) = radians.sin_cos();
        Self::translation(-center.x, -center.y)
            .then(&Self::from_rows([cos, -sin, 0.0], [sin, cos, 0.0]))
            .then(&Self::translation(center.x, center.y))
    }

    /// Uniform scaling by `factor` with `center` held fixed.
    pub fn scaling(center: Vector, factor: f64) -> Self {
        Self::scaling_xy(center, factor, factor)
    }

    pub fn scaling_xy(center: Vector, sx: f64, sy: f64) -> Self {
        Self::translation(-center.x, -center.y)
            .then(&Self::from_rows([sx, 0.0, 0.0], [0.0, sy, 0.0]))
            .then(&Self::translation(center.x, center.y))
    }

    /// Mirror across the line through `a` and `b`.
    pub fn mirror(a: Vector, b: Vector) -> Self {
        let angle = (b - a).angle();
        Self::rotation(a, -angle)
            .then(&Self::scaling_xy(a, 1.0, -1.0))
            .then(&Self::rotation(a, angle))
    }

    /// Returns the transform that applies `self` first and `next` second.
    pub fn then(&self, next: &Transform) -> Transform {
        Transform {
            matrix: next.matrix * self.matrix,
        }
    }

    pub fn apply(&self, p: Vector) -> Vector {
        let v = self.matrix * Vector3::new(p.x, p.y, 1.0);
        Vector::new(v.x, v.y)
    }

    /// Applies the linear part only, for directions and displacements.
    pub fn apply_vector(&self, v: Vector) -> Vector {
        let m = self.linear();
        let r = m * nalgebra::Vector2::new(v.x, v.y);
        Vector::new(r.x, r.y)
    }

    pub fn linear(&self) -> Matrix2<f64> {
        self.matrix.fixed_view::<2, 2>(0, 0).into_owned()
    }

    pub fn determinant(&self) -> f64 {
        self.linear().determinant()
    }

    pub fn is_reflection(&self) -> bool {
        self.determinant() < 0.0
    }

    /// Average length scale of the linear part.
    pub fn uniform_scale(&self) -> f64 {
        self.determinant().abs().sqrt()
    }

    pub fn inverse(&self) -> Option<Transform> {
        self.matrix
            .try_inverse()
            .map(|matrix| Transform { matrix })
    }

    pub fn matrix(&self) -> &Matrix3<f64> {
        &self.matrix
    }
}
