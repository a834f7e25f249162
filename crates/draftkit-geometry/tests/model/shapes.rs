use draftkit_geometry::model::{AABBRect, Arc, Circle, Ellipse, Line, Polygon, Polyline, Shape, ShapeKind, Triangle};
use draftkit_geometry::{GeometryObject, Vector};
use std::f64::consts::PI;

#[test]
fn test_vector_distance() {
    let a = Vector::new(0.0, 0.0);
    let b = Vector::new(3.0, 4.0);
    assert_eq!(a.distance_to(&b), 5.0);
}

#[test]
fn test_rect_normalizes_corners() {
    let rect = AABBRect::new(10.0, 8.0, 2.0, 1.0);
    assert_eq!(rect.min(), Vector::new(2.0, 1.0));
    assert_eq!(rect.max(), Vector::new(10.0, 8.0));
    assert_eq!(rect.area(), 56.0);
    assert_eq!(rect.length(), 30.0);
}

#[test]
fn test_polygon_drops_closing_duplicate() {
    let square = Polygon::from_coords(&[0.0, 0.0, 4.0, 0.0, 4.0, 4.0, 0.0, 4.0, 0.0, 0.0]);
    assert_eq!(square.len(), 4);
    assert_eq!(square.area(), 16.0);
    assert_eq!(square.length(), 16.0);
    assert!(!square.is_cw());
}

#[test]
fn test_polygon_reorient() {
    let mut square = Polygon::from_coords(&[0.0, 0.0, 0.0, 4.0, 4.0, 4.0, 4.0, 0.0]);
    assert!(square.is_cw());
    square.reorient_ccw();
    assert!(square.signed_area() > 0.0);
}

#[test]
fn test_polyline_length_and_bounds() {
    let polyline = Polyline::from_coords(&[0.0, 0.0, 3.0, 0.0, 3.0, 4.0]);
    assert_eq!(polyline.length(), 7.0);
    let bbox = polyline.bounding_rect();
    assert_eq!(bbox.width(), 3.0);
    assert_eq!(bbox.height(), 4.0);
}

#[test]
fn test_triangle_area_and_orientation() {
    let tri = Triangle::new(Vector::new(0.0, 0.0), Vector::new(0.0, 3.0), Vector::new(4.0, 0.0));
    assert_eq!(tri.area(), 6.0);
    assert!(tri.is_cw());
}

#[test]
fn test_circle_bounds() {
    let circle = Circle::from_coords(1.0, 2.0, 3.0);
    let bbox = circle.bounding_rect();
    assert_eq!(bbox.left(), -2.0);
    assert_eq!(bbox.top(), 5.0);
    assert!((circle.length() - 6.0 * PI).abs() < 1e-12);
}

#[test]
fn test_ellipse_bounding_box() {
    let ellipse = Ellipse::new(Vector::new(10.0, 10.0), 5.0, 3.0, 0.0);
    let bbox = ellipse.bounding_rect();
    assert!((bbox.left() - 5.0).abs() < 1e-9);
    assert!((bbox.bottom() - 7.0).abs() < 1e-9);
    assert!((bbox.right() - 15.0).abs() < 1e-9);
    assert!((bbox.top() - 13.0).abs() < 1e-9);
}

#[test]
fn test_ellipse_length_matches_circle() {
    let ellipse = Ellipse::new(Vector::ZERO, 2.0, 2.0, 0.3);
    assert!((ellipse.length() - 4.0 * PI).abs() < 1e-6);
}

#[test]
fn test_arc_from_three_points() {
    let arc = Arc::from_three_points(Vector::new(1.0, 0.0), Vector::new(0.0, 1.0), Vector::new(-1.0, 0.0)).unwrap();
    assert!(arc.center.approx_eq(&Vector::ZERO, 1e-12));
    assert!((arc.radius - 1.0).abs() < 1e-12);
    assert!(!arc.is_cw());
    assert!((arc.length() - PI).abs() < 1e-9);
}

#[test]
fn test_arc_from_collinear_points_is_none() {
    assert!(Arc::from_three_points(Vector::new(0.0, 0.0), Vector::new(1.0, 0.0), Vector::new(2.0, 0.0)).is_none());
}

#[test]
fn test_arc_bounds_include_extreme() {
    let arc = Arc::from_center(Vector::ZERO, 2.0, 0.0, PI, true);
    let bbox = arc.bounding_rect();
    assert!((bbox.top() - 2.0).abs() < 1e-12);
    assert!(bbox.bottom().abs() < 1e-12);
}

#[test]
fn test_shape_kind_and_closure() {
    let shapes: Vec<Shape> = vec![
        Line::from_coords(0.0, 0.0, 1.0, 1.0).into(),
        Circle::from_coords(0.0, 0.0, 1.0).into(),
        AABBRect::new(0.0, 0.0, 1.0, 1.0).into(),
        Vector::new(1.0, 1.0).into(),
    ];
    let kinds: Vec<ShapeKind> = shapes.iter().map(Shape::kind).collect();
    assert_eq!(kinds, vec![ShapeKind::Line, ShapeKind::Circle, ShapeKind::Rect, ShapeKind::Point]);
    let closed: Vec<bool> = shapes.iter().map(Shape::is_closed).collect();
    assert_eq!(closed, vec![false, true, true, false]);
    assert_eq!(ShapeKind::BSpline.to_string(), "bspline");
}

#[test]
fn test_degenerate_shapes_are_empty() {
    assert!(Circle::from_coords(0.0, 0.0, 0.0).is_empty());
    assert!(Polygon::from_coords(&[0.0, 0.0, 1.0, 1.0]).is_empty());
    assert!(!Line::from_coords(0.0, 0.0, 1.0, 0.0).is_empty());
}
