use draftkit_core::GeometryConfig;
use draftkit_geometry::algorithm::intersection::{circle_circle, line_circle, line_ellipse};
use draftkit_geometry::algorithm::{intersection_points, is_intersected, is_self_intersected, segment_segment};
use draftkit_geometry::model::{AABBRect, Circle, Ellipse, Line, Polygon, Polyline, Shape};
use draftkit_geometry::Vector;

fn has_point(points: &[Vector], x: f64, y: f64) -> bool {
    points.iter().any(|p| p.approx_eq(&Vector::new(x, y), 1e-6))
}

#[test]
fn test_crossing_segments() {
    let a = Line::from_coords(0.0, 0.0, 10.0, 0.0);
    let b = Line::from_coords(5.0, -5.0, 5.0, 5.0);
    let p = segment_segment(&a, &b).unwrap();
    assert!(p.approx_eq(&Vector::new(5.0, 0.0), 1e-12));
}

#[test]
fn test_disjoint_segments() {
    let a = Line::from_coords(0.0, 0.0, 1.0, 0.0);
    let b = Line::from_coords(2.0, -1.0, 2.0, 1.0);
    assert!(segment_segment(&a, &b).is_none());
}

#[test]
fn test_collinear_touching_end_points() {
    let a = Line::from_coords(0.0, 0.0, 1.0, 0.0);
    let b = Line::from_coords(1.0, 0.0, 3.0, 0.0);
    let p = segment_segment(&a, &b).unwrap();
    assert_eq!(p, Vector::new(1.0, 0.0));
}

#[test]
fn test_two_circles() {
    let a = Circle::from_coords(0.0, 0.0, 5.0);
    let b = Circle::from_coords(8.0, 0.0, 5.0);
    let points = circle_circle(&a, &b);
    assert_eq!(points.len(), 2);
    assert!(has_point(&points, 4.0, 3.0));
    assert!(has_point(&points, 4.0, -3.0));
}

#[test]
fn test_separate_and_nested_circles_miss() {
    let a = Circle::from_coords(0.0, 0.0, 1.0);
    assert!(circle_circle(&a, &Circle::from_coords(5.0, 0.0, 1.0)).is_empty());
    assert!(circle_circle(&a, &Circle::from_coords(0.0, 0.0, 3.0)).is_empty());
}

#[test]
fn test_line_through_circle() {
    let line = Line::from_coords(-10.0, 0.0, 10.0, 0.0);
    let points = line_circle(&line, &Circle::from_coords(0.0, 0.0, 2.0), false);
    assert_eq!(points.len(), 2);
    assert!(has_point(&points, -2.0, 0.0));
    assert!(has_point(&points, 2.0, 0.0));

    let short = Line::from_coords(0.0, 0.0, 1.0, 0.0);
    assert!(line_circle(&short, &Circle::from_coords(0.0, 0.0, 2.0), false).is_empty());
    assert_eq!(line_circle(&short, &Circle::from_coords(0.0, 0.0, 2.0), true).len(), 2);
}

#[test]
fn test_line_through_rotated_ellipse() {
    let ellipse = Ellipse::new(Vector::ZERO, 4.0, 2.0, std::f64::consts::FRAC_PI_2);
    let line = Line::from_coords(-10.0, 0.0, 10.0, 0.0);
    let points = line_ellipse(&line, &ellipse, false);
    assert_eq!(points.len(), 2);
    assert!(has_point(&points, 2.0, 0.0));
    assert!(has_point(&points, -2.0, 0.0));
}

#[test]
fn test_shape_pair_dispatch() {
    let cfg = GeometryConfig::default();
    let rect = Shape::Rect(AABBRect::new(0.0, 0.0, 4.0, 4.0));
    let circle = Shape::Circle(Circle::from_coords(4.0, 2.0, 1.0));
    let points = intersection_points(&rect, &circle, &cfg);
    assert_eq!(points.len(), 2);
    assert!(has_point(&points, 4.0, 1.0));
    assert!(has_point(&points, 4.0, 3.0));
}

#[test]
fn test_intersection_points_are_deduplicated() {
    let cfg = GeometryConfig::default();
    // The diagonal passes through the shared vertex of two edges.
    let square = Shape::Polygon(Polygon::from_coords(&[0.0, 0.0, 2.0, 0.0, 2.0, 2.0, 0.0, 2.0]));
    let diagonal = Shape::Line(Line::from_coords(-1.0, -1.0, 1.0, 1.0));
    let points = intersection_points(&square, &diagonal, &cfg);
    assert_eq!(points.len(), 1);
    assert!(has_point(&points, 0.0, 0.0));
}

#[test]
fn test_containment_counts_when_requested() {
    let cfg = GeometryConfig::default();
    let outer = Shape::Circle(Circle::from_coords(0.0, 0.0, 10.0));
    let inner = Shape::Rect(AABBRect::new(-1.0, -1.0, 1.0, 1.0));
    assert!(!is_intersected(&outer, &inner, false, &cfg));
    assert!(is_intersected(&outer, &inner, true, &cfg));
}

#[test]
fn test_polyline_self_intersection() {
    let zigzag = Polyline::from_coords(&[0.0, 0.0, 2.0, 2.0, 2.0, 0.0, 0.0, 2.0]);
    assert!(is_self_intersected(zigzag.points(), false));
    let hook = Polyline::from_coords(&[0.0, 0.0, 2.0, 0.0, 2.0, 2.0, 1.0, 2.0]);
    assert!(!is_self_intersected(hook.points(), false));
}
