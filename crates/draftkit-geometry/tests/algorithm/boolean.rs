use draftkit_core::GeometryConfig;
use draftkit_geometry::algorithm::{polygon_boolean, shape_boolean, BooleanOp};
use draftkit_geometry::model::{AABBRect, Circle, Ellipse, Polygon, Shape};
use draftkit_geometry::Vector;
use std::f64::consts::PI;

fn square(x: f64, y: f64, size: f64) -> Polygon {
    Polygon::from_coords(&[x, y, x + size, y, x + size, y + size, x, y + size])
}

#[test]
fn test_disjoint_union_keeps_both() {
    let cfg = GeometryConfig::default();
    let regions = polygon_boolean(&square(0.0, 0.0, 4.0), &square(10.0, 0.0, 4.0), BooleanOp::Union, &cfg).unwrap();
    assert_eq!(regions.polygons.len(), 2);
    assert!((regions.area() - 32.0).abs() < 1e-6);
}

#[test]
fn test_disjoint_intersection_is_empty() {
    let cfg = GeometryConfig::default();
    let regions =
        polygon_boolean(&square(0.0, 0.0, 4.0), &square(10.0, 0.0, 4.0), BooleanOp::Intersection, &cfg).unwrap();
    assert!(regions.is_empty());
}

#[test]
fn test_xor_of_overlapping_squares() {
    let cfg = GeometryConfig::default();
    let regions = polygon_boolean(&square(0.0, 0.0, 4.0), &square(2.0, 2.0, 4.0), BooleanOp::Xor, &cfg).unwrap();
    assert!((regions.area() - 24.0).abs() < 1e-6);
}

#[test]
fn test_outer_rings_ccw_holes_cw() {
    let cfg = GeometryConfig::default();
    let regions = polygon_boolean(&square(0.0, 0.0, 10.0), &square(3.0, 3.0, 4.0), BooleanOp::Difference, &cfg).unwrap();
    assert_eq!(regions.polygons.len(), 1);
    assert_eq!(regions.holes.len(), 1);
    assert!(!regions.polygons[0].is_cw());
    assert!(regions.holes[0].is_cw());
    assert!((regions.area() - 84.0).abs() < 1e-6);
}

#[test]
fn test_rect_and_circle_intersection() {
    let cfg = GeometryConfig::default();
    let rect = Shape::Rect(AABBRect::new(0.0, 0.0, 10.0, 10.0));
    let circle = Shape::Circle(Circle::from_coords(10.0, 5.0, 2.0));
    let regions = shape_boolean(&rect, &circle, BooleanOp::Intersection, &cfg).unwrap();
    assert_eq!(regions.polygons.len(), 1);
    assert!((regions.area() - 2.0 * PI).abs() < 0.05);
}

#[test]
fn test_rect_and_ellipse_intersection() {
    let cfg = GeometryConfig::default();
    let rect = Shape::Rect(AABBRect::new(0.0, -5.0, 10.0, 5.0));
    let ellipse = Shape::Ellipse(Ellipse::new(Vector::ZERO, 4.0, 2.0, 0.0));
    let regions = shape_boolean(&rect, &ellipse, BooleanOp::Intersection, &cfg).unwrap();
    assert_eq!(regions.polygons.len(), 1);
    assert!((regions.area() - 4.0 * PI).abs() < 0.05);
}

#[test]
fn test_circle_union_area() {
    let cfg = GeometryConfig::default();
    let a = Shape::Circle(Circle::from_coords(0.0, 0.0, 5.0));
    let b = Shape::Circle(Circle::from_coords(8.0, 0.0, 5.0));
    let union = shape_boolean(&a, &b, BooleanOp::Union, &cfg).unwrap();
    let half = (4.0f64 / 5.0).acos();
    let lens = 2.0 * (25.0 * half - 12.0);
    assert_eq!(union.polygons.len(), 1);
    assert!((union.area() - (50.0 * PI - lens)).abs() < 0.05);
}

#[test]
fn test_degenerate_operand_rejected() {
    let cfg = GeometryConfig::default();
    let flat = Polygon::from_coords(&[0.0, 0.0, 1.0, 0.0, 2.0, 0.0]);
    assert!(polygon_boolean(&flat, &square(0.0, 0.0, 1.0), BooleanOp::Union, &cfg).is_err());
}

#[test]
fn test_boolean_op_display() {
    assert_eq!(BooleanOp::Difference.to_string(), "difference");
}
