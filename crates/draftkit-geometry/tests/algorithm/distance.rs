use draftkit_core::GeometryConfig;
use draftkit_geometry::algorithm::{
    closest_point, distance, distance_to_line, foot_points, nearest_on_curve, shape_distance, tangency_points,
};
use draftkit_geometry::model::{AABBRect, Arc, Circle, CubicBezier, Ellipse, Line, Polygon, Shape};
use draftkit_geometry::Vector;

#[test]
fn test_point_to_segment_distance() {
    let cfg = GeometryConfig::default();
    let line = Shape::Line(Line::from_coords(0.0, 0.0, 10.0, 0.0));
    assert!((distance(&Vector::new(3.0, 5.0), &line, &cfg) - 5.0).abs() < 1e-12);
    assert!((distance(&Vector::new(13.0, 4.0), &line, &cfg) - 5.0).abs() < 1e-12);
}

#[test]
fn test_distance_to_closed_shape_is_to_boundary() {
    let cfg = GeometryConfig::default();
    let rect = Shape::Rect(AABBRect::new(0.0, 0.0, 10.0, 10.0));
    assert!((distance(&Vector::new(5.0, 3.0), &rect, &cfg) - 3.0).abs() < 1e-12);
    let circle = Shape::Circle(Circle::from_coords(0.0, 0.0, 4.0));
    assert!((distance(&Vector::new(1.0, 0.0), &circle, &cfg) - 3.0).abs() < 1e-12);
}

#[test]
fn test_distance_to_ellipse_on_axis() {
    let cfg = GeometryConfig::default();
    let ellipse = Shape::Ellipse(Ellipse::new(Vector::ZERO, 5.0, 2.0, 0.0));
    let d = distance(&Vector::new(0.0, 6.0), &ellipse, &cfg);
    assert!((d - 4.0).abs() < 1e-6, "distance was {d}");
    let q = closest_point(&Vector::new(9.0, 0.0), &ellipse, &cfg);
    assert!(q.approx_eq(&Vector::new(5.0, 0.0), 1e-5));
}

#[test]
fn test_nearest_on_bezier() {
    let cfg = GeometryConfig::default();
    let bezier = CubicBezier::new(vec![
        Vector::new(0.0, 0.0),
        Vector::new(1.0, 2.0),
        Vector::new(3.0, 2.0),
        Vector::new(4.0, 0.0),
    ])
    .unwrap();
    let hit = nearest_on_curve(&bezier, &Vector::new(2.0, 5.0), &cfg.search);
    assert!((hit.t - 0.5).abs() < 1e-6);
    assert!((hit.distance - 3.5).abs() < 1e-9);
}

#[test]
fn test_infinite_line_flag() {
    let line = Line::from_coords(0.0, 0.0, 1.0, 1.0);
    let p = Vector::new(4.0, 0.0);
    let infinite = distance_to_line(&p, &line, true);
    assert!((infinite - 8.0_f64.sqrt()).abs() < 1e-12);
    assert!(distance_to_line(&p, &line, false) > infinite);
}

#[test]
fn test_shape_to_shape_distance() {
    let cfg = GeometryConfig::default();
    let a = Shape::Polygon(Polygon::from_coords(&[0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 1.0]));
    let b = Shape::Line(Line::from_coords(4.0, -5.0, 4.0, 5.0));
    assert!((shape_distance(&a, &b, &cfg) - 3.0).abs() < 1e-12);
}

#[test]
fn test_feet_on_circle() {
    let cfg = GeometryConfig::default();
    let circle = Shape::Circle(Circle::from_coords(0.0, 0.0, 2.0));
    let feet = foot_points(&Vector::new(5.0, 0.0), &circle, &cfg);
    assert_eq!(feet.len(), 2);
    assert!(feet[0].approx_eq(&Vector::new(2.0, 0.0), 1e-12));
    assert!(feet[1].approx_eq(&Vector::new(-2.0, 0.0), 1e-12));
}

#[test]
fn test_foot_outside_arc_window_dropped() {
    let cfg = GeometryConfig::default();
    let arc = Shape::Arc(Arc::from_center(Vector::ZERO, 2.0, 0.0, std::f64::consts::FRAC_PI_2, true));
    let feet = foot_points(&Vector::new(5.0, 0.0), &arc, &cfg);
    assert_eq!(feet.len(), 1);
    assert!(feet[0].approx_eq(&Vector::new(2.0, 0.0), 1e-12));
}

#[test]
fn test_tangents_to_circle() {
    let cfg = GeometryConfig::default();
    let circle = Shape::Circle(Circle::from_coords(0.0, 0.0, 3.0));
    let points = tangency_points(&Vector::new(5.0, 0.0), &circle, &cfg);
    assert_eq!(points.len(), 2);
    assert!(points.iter().any(|p| p.approx_eq(&Vector::new(1.8, 2.4), 1e-9)));
    assert!(points.iter().any(|p| p.approx_eq(&Vector::new(1.8, -2.4), 1e-9)));
    assert!(tangency_points(&Vector::new(1.0, 0.0), &circle, &cfg).is_empty());
}

#[test]
fn test_tangents_to_ellipse() {
    let cfg = GeometryConfig::default();
    let ellipse = Shape::Ellipse(Ellipse::new(Vector::ZERO, 2.0, 1.0, 0.0));
    let points = tangency_points(&Vector::new(4.0, 0.0), &ellipse, &cfg);
    assert_eq!(points.len(), 2);
    // Tangent points from (4, 0) satisfy x = a² / 4.
    for p in &points {
        assert!((p.x - 1.0).abs() < 1e-9);
        assert!((p.y.abs() - 0.75_f64.sqrt()).abs() < 1e-9);
    }
}
