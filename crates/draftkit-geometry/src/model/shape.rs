use serde::{Deserialize, Serialize};
use std::fmt;

use super::{
    AABBRect, Arc, BSpline, Circle, CubicBezier, Ellipse, GeometryObject, Line, Polygon, Polyline, Transform,
    Triangle, Vector,
};

/// Closed set of primitives the kernel works on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Point(Vector),
    Line(Line),
    Polyline(Polyline),
    Polygon(Polygon),
    Rect(AABBRect),
    Triangle(Triangle),
    Circle(Circle),
    Ellipse(Ellipse),
    Bezier(CubicBezier),
    BSpline(BSpline),
    Arc(Arc),
}

/// Discriminant of [`Shape`] without payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    Point,
    Line,
    Polyline,
    Polygon,
    Rect,
    Triangle,
    Circle,
    Ellipse,
    Bezier,
    BSpline,
    Arc,
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ShapeKind::Point => "point",
            ShapeKind::Line => "line",
            ShapeKind::Polyline => "polyline",
            ShapeKind::Polygon => "polygon",
            ShapeKind::Rect => "rect",
            ShapeKind::Triangle => "triangle",
            ShapeKind::Circle => "circle",
            ShapeKind::Ellipse => "ellipse",
            ShapeKind::Bezier => "bezier",
            ShapeKind::BSpline => "bspline",
            ShapeKind::Arc => "arc",
        };
        f.write_str(name)
    }
}

impl Shape {
    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Point(_) => ShapeKind::Point,
            Shape::Line(_) => ShapeKind::Line,
            Shape::Polyline(_) => ShapeKind::Polyline,
            Shape::Polygon(_) => ShapeKind::Polygon,
            Shape::Rect(_) => ShapeKind::Rect,
            Shape::Triangle(_) => ShapeKind::Triangle,
            Shape::Circle(_) => ShapeKind::Circle,
            Shape::Ellipse(_) => ShapeKind::Ellipse,
            Shape::Bezier(_) => ShapeKind::Bezier,
            Shape::BSpline(_) => ShapeKind::BSpline,
            Shape::Arc(_) => ShapeKind::Arc,
        }
    }

    /// True for shapes that bound an area.
    pub fn is_closed(&self) -> bool {
        match self {
            Shape::Polygon(_) | Shape::Rect(_) | Shape::Triangle(_) | Shape::Circle(_) => true,
            Shape::Ellipse(e) => !e.is_arc(),
            _ => false,
        }
    }
}

impl GeometryObject for Shape {
    fn transform(&mut self, t: &Transform) {
        match self {
            Shape::Point(s) => s.transform(t),
            Shape::Line(s) => s.transform(t),
            Shape::Polyline(s) => s.transform(t),
            Shape::Polygon(s) => s.transform(t),
            Shape::Rect(s) => s.transform(t),
            Shape::Triangle(s) => s.transform(t),
            Shape::Circle(s) => s.transform(t),
            Shape::Ellipse(s) => s.transform(t),
            Shape::Bezier(s) => s.transform(t),
            Shape::BSpline(s) => s.transform(t),
            Shape::Arc(s) => s.transform(t),
        }
    }

    fn bounding_rect(&self) -> AABBRect {
        match self {
            Shape::Point(s) => s.bounding_rect(),
            Shape::Line(s) => s.bounding_rect(),
            Shape::Polyline(s) => s.bounding_rect(),
            Shape::Polygon(s) => s.bounding_rect(),
            Shape::Rect(s) => s.bounding_rect(),
            Shape::Triangle(s) => s.bounding_rect(),
            Shape::Circle(s) => s.bounding_rect(),
            Shape::Ellipse(s) => s.bounding_rect(),
            Shape::Bezier(s) => s.bounding_rect(),
            Shape::BSpline(s) => s.bounding_rect(),
            Shape::Arc(s) => s.bounding_rect(),
        }
    }

    fn length(&self) -> f64 {
        match self {
            Shape::Point(s) => s.length(),
            Shape::Line(s) => s.length(),
            Shape::Polyline(s) => s.length(),
            Shape::Polygon(s) => s.length(),
            Shape::Rect(s) => s.length(),
            Shape::Triangle(s) => s.length(),
            Shape::Circle(s) => s.length(),
            Shape::Ellipse(s) => s.length(),
            Shape::Bezier(s) => s.length(),
            Shape::BSpline(s) => s.length(),
            Shape::Arc(s) => s.length(),
        }
    }

    fn is_empty(&self) -> bool {
        match self {
            Shape::Point(s) => s.is_empty(),
            Shape::Line(s) => s.is_empty(),
            Shape::Polyline(s) => s.is_empty(),
            Shape::Polygon(s) => s.is_empty(),
            Shape::Rect(s) => s.is_empty(),
            Shape::Triangle(s) => s.is_empty(),
            Shape::Circle(s) => s.is_empty(),
            Shape::Ellipse(s) => s.is_empty(),
            Shape::Bezier(s) => s.is_empty(),
            Shape::BSpline(s) => s.is_empty(),
            Shape::Arc(s) => s.is_empty(),
        }
    }
}

macro_rules! impl_from_variant {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Shape {
                fn from(value: $ty) -> Self {
                    Shape::$variant(value)
                }
            }
        )*
    };
}

impl_from_variant! {
    Vector => Point,
    Line => Line,
    Polyline => Polyline,
    Polygon => Polygon,
    AABBRect => Rect,
    Triangle => Triangle,
    Circle => Circle,
    Ellipse => Ellipse,
    CubicBezier => Bezier,
    BSpline => BSpline,
    Arc => Arc,
}
