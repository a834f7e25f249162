use serde::{Deserialize, Serialize};

use super::{GeometryObject, Line, Transform, Vector};

/// Axis-aligned bounding rectangle.
///
/// `min` is always the lower-left corner; corners are derived, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AABBRect {
    min: Vector,
    max: Vector,
}

impl AABBRect {
    /// Creates a rectangle from two opposite corners in any order.
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self {
            min: Vector::new(x0.min(x1), y0.min(y1)),
            max: Vector::new(x0.max(x1), y0.max(y1)),
        }
    }

    pub fn from_corners(a: Vector, b: Vector) -> Self {
        Self::new(a.x, a.y, b.x, b.y)
    }

    /// Smallest rectangle containing every point; zero-sized at the origin for no points.
    pub fn from_points<I: IntoIterator<Item = Vector>>(points: I) -> Self {
        let mut iter = points.into_iter();
        let Some(first) = iter.next() else {
            return Self::default();
        };
        let (min, max) = iter.fold((first, first), |(min, max), p| {
            (
                Vector::new(min.x.min(p.x), min.y.min(p.y)),
                Vector::new(max.x.max(p.x), max.y.max(p.y)),
            )
        });
        Self { min, max }
    }

    pub fn min(&self) -> Vector {
        self.min
    }

    pub fn max(&self) -> Vector {
        self.max
    }

    pub fn left(&self) -> f64 {
        self.min.x
    }

    pub fn right(&self) -> f64 {
        self.max.x
    }

    pub fn bottom(&self) -> f64 {
        self.min.y
    }

    pub fn top(&self) -> f64 {
        self.max.y
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Vector {
        self.min.midpoint(&self.max)
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// The four corners, counter-clockwise from `min`.
    pub fn corners(&self) -> [Vector; 4] {
        [
            self.min,
            Vector::new(self.max.x, self.min.y),
            self.max,
            Vector::new(self.min.x, self.max.y),
        ]
    }

    /// The four edges, counter-clockwise from the bottom edge.
    pub fn edges(&self) -> [Line; 4] {
        let c = self.corners();
        [
            Line::new(c[0], c[1]),
            Line::new(c[1], c[2]),
            Line::new(c[2], c[3]),
            Line::new(c[3], c[0]),
        ]
    }

    /// Closed containment test; boundary points count.
    pub fn contains(&self, p: &Vector) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    pub fn overlaps(&self, other: &AABBRect) -> bool {
        self.min.x <= other.max.x
            && other.min.x <= self.max.x
            && self.min.y <= other.max.y
            && other.min.y <= self.max.y
    }

    pub fn contains_rect(&self, other: &AABBRect) -> bool {
        self.contains(&other.min) && self.contains(&other.max)
    }

    pub fn union(&self, other: &AABBRect) -> AABBRect {
        AABBRect::from_points([self.min, self.max, other.min, other.max])
    }

    /// Grows every side by `margin`; a negative margin shrinks without inverting checks.
    pub fn expanded(&self, margin: f64) -> AABBRect {
        AABBRect::new(
            self.min.x - margin,
            self.min.y - margin,
            self.max.x + margin,
            self.max.y + margin,
        )
    }
}

impl GeometryObject for AABBRect {
    /// Transforms the corners and keeps their bounding box, so rotations grow the rect.
    fn transform(&mut self, t: &Transform) {
        *self = AABBRect::from_points(self.corners().map(|c| t.apply(c)));
    }

    fn bounding_rect(&self) -> AABBRect {
        *self
    }

    fn length(&self) -> f64 {
        2.0 * (self.width() + self.height())
    }

    fn is_empty(&self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }
}
