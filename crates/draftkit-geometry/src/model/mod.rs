mod arc;
mod bezier;
mod bspline;
mod circle;
mod ellipse;
mod line;
mod marked_point;
mod polygon;
mod polyline;
mod rect;
mod shape;
mod transform;
mod triangle;
mod vector;

pub use arc::Arc;
pub use bezier::{BezierSegment, CubicBezier};
pub use bspline::{BSpline, Degree};
pub use circle::Circle;
pub use ellipse::Ellipse;
pub use line::Line;
pub use marked_point::MarkedPoint;
pub use polygon::Polygon;
pub use polyline::Polyline;
pub use rect::AABBRect;
pub use shape::{Shape, ShapeKind};
pub use transform::Transform;
pub use triangle::Triangle;
pub use vector::{Point, Vector};

/// Operations every shape variant supports.
pub trait GeometryObject {
    /// Applies an affine transform in place, dropping any cached tessellation.
    fn transform(&mut self, t: &Transform);
    fn bounding_rect(&self) -> AABBRect;
    /// Perimeter for closed shapes, arc length for open ones.
    fn length(&self) -> f64;
    fn is_empty(&self) -> bool;

    fn translate(&mut self, dx: f64, dy: f64) {
        self.transform(&Transform::translation(dx, dy));
    }

    fn rotate(&mut self, center: Vector, radians: f64) {
        self.transform(&Transform::rotation(center, radians));
    }

    fn scale(&mut self, center: Vector, factor: f64) {
        self.transform(&Transform::scaling(center, factor));
    }
}

/// A curve evaluated over a parameter interval.
pub trait ParametricCurve {
    fn point_at(&self, t: f64) -> Vector;
    /// First derivative with respect to the curve parameter.
    fn derivative_at(&self, t: f64) -> Vector;
    fn domain(&self) -> (f64, f64);

    /// Number of polynomial pieces, used to size coarse sampling.
    fn segment_count(&self) -> usize {
        1
    }
}

impl GeometryObject for Vector {
    fn transform(&mut self, t: &Transform) {
        *self = t.apply(*self);
    }

    fn bounding_rect(&self) -> AABBRect {
        AABBRect::from_corners(*self, *self)
    }

    fn length(&self) -> f64 {
        0.0
    }

    fn is_empty(&self) -> bool {
        false
    }
}
