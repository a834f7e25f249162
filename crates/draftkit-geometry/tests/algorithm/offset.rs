use draftkit_core::{GeometryConfig, GeometryError};
use draftkit_geometry::algorithm::offset::offset_arc;
use draftkit_geometry::algorithm::{
    nearest_on_curve, offset_bezier, offset_circle, offset_polygon, offset_polygon_robust, offset_polyline_robust,
    offset_rect, offset_shape, EndType, JoinType,
};
use draftkit_geometry::model::{AABBRect, Arc, Circle, CubicBezier, Line, Polygon, Polyline, Shape, Triangle};
use draftkit_geometry::{ParametricCurve, Vector};
use std::f64::consts::PI;

#[test]
fn test_rect_inset_and_collapse() {
    let cfg = GeometryConfig::default();
    let rect = Shape::Rect(AABBRect::new(0.0, 0.0, 10.0, 10.0));
    let shapes = offset_shape(&rect, -2.0, &cfg).unwrap();
    assert_eq!(shapes, vec![Shape::Rect(AABBRect::new(2.0, 2.0, 8.0, 8.0))]);
    let err = offset_shape(&rect, -6.0, &cfg).unwrap_err();
    assert!(matches!(err, GeometryError::OffsetCollapse { .. }));
    assert!(offset_rect(&AABBRect::new(0.0, 0.0, 10.0, 4.0), -2.0).is_err());
}

#[test]
fn test_circle_and_arc_offsets() {
    let circle = Circle::from_coords(1.0, 1.0, 3.0);
    assert_eq!(offset_circle(&circle, 2.0).unwrap().radius, 5.0);
    assert!(offset_circle(&circle, -3.0).is_err());

    let arc = Arc::from_center(Vector::ZERO, 2.0, 0.0, PI / 2.0, true);
    let grown = offset_arc(&arc, 1.0).unwrap();
    assert!((grown.radius - 3.0).abs() < 1e-12);
    assert!(grown.start().approx_eq(&Vector::new(3.0, 0.0), 1e-12));
    assert!(grown.end().approx_eq(&Vector::new(0.0, 3.0), 1e-12));
}

#[test]
fn test_line_shifts_left() {
    let cfg = GeometryConfig::default();
    let line = Shape::Line(Line::from_coords(0.0, 0.0, 4.0, 0.0));
    let shapes = offset_shape(&line, 1.5, &cfg).unwrap();
    let Shape::Line(shifted) = &shapes[0] else {
        panic!("expected a line");
    };
    assert!(shifted.front.approx_eq(&Vector::new(0.0, 1.5), 1e-12));
    assert!(shifted.back.approx_eq(&Vector::new(4.0, 1.5), 1e-12));
}

#[test]
fn test_point_has_no_offset() {
    let cfg = GeometryConfig::default();
    assert!(offset_shape(&Shape::Point(Vector::ZERO), 1.0, &cfg).is_err());
}

#[test]
fn test_triangle_offset_keeps_orientation() {
    let cfg = GeometryConfig::default();
    let tri = Triangle::new(Vector::new(0.0, 0.0), Vector::new(0.0, 6.0), Vector::new(6.0, 0.0));
    let shapes = offset_shape(&Shape::Triangle(tri), -0.5, &cfg).unwrap();
    let Shape::Polygon(inset) = &shapes[0] else {
        panic!("expected a polygon");
    };
    assert_eq!(inset.len(), 3);
    assert!(inset.is_cw());
    assert!(inset.area() < tri.area());
}

#[test]
fn test_bisector_offset_of_clockwise_square() {
    let square = Polygon::from_coords(&[0.0, 0.0, 0.0, 4.0, 4.0, 4.0, 4.0, 0.0]);
    let grown = offset_polygon(&square, 1.0).unwrap();
    assert!(grown.is_cw());
    assert!((grown.area() - 36.0).abs() < 1e-9);
}

#[test]
fn test_robust_inset_splits_dumbbell() {
    let cfg = GeometryConfig::default();
    let dumbbell = Polygon::from_coords(&[
        0.0, 0.0, 4.0, 0.0, 4.0, 1.5, 6.0, 1.5, 6.0, 0.0, 10.0, 0.0, 10.0, 4.0, 6.0, 4.0, 6.0, 2.5, 4.0, 2.5, 4.0,
        4.0, 0.0, 4.0,
    ]);
    let regions = offset_polygon_robust(&dumbbell, -1.0, JoinType::Round, &cfg).unwrap();
    assert_eq!(regions.polygons.len(), 2);
    assert!(regions.holes.is_empty());
    for piece in &regions.polygons {
        assert!(!piece.is_cw());
        assert!(piece.area() > 4.0 - 1e-6 && piece.area() < 4.5);
    }
}

#[test]
fn test_robust_polyline_offset_ends() {
    let cfg = GeometryConfig::default();
    let line = Polyline::from_coords(&[0.0, 0.0, 10.0, 0.0]);
    let butt = offset_polyline_robust(&line, 1.0, EndType::Butt, &cfg).unwrap();
    assert_eq!(butt.polygons.len(), 1);
    assert!((butt.area() - 20.0).abs() < 1e-6);
    let round = offset_polyline_robust(&line, 1.0, EndType::Round, &cfg).unwrap();
    assert!((round.area() - (20.0 + PI)).abs() < 1e-2);
    assert!(offset_polyline_robust(&line, 0.0, EndType::Butt, &cfg).is_err());
}

#[test]
fn test_bezier_offset_stays_at_distance() {
    let cfg = GeometryConfig::default();
    let arch = CubicBezier::new(vec![
        Vector::new(0.0, 0.0),
        Vector::new(0.0, 4.0),
        Vector::new(4.0, 4.0),
        Vector::new(4.0, 0.0),
    ])
    .unwrap();
    let offset = offset_bezier(&arch, 1.0, &cfg).unwrap();
    assert!(offset.front().approx_eq(&Vector::new(-1.0, 0.0), 1e-9));
    assert!(offset.back().approx_eq(&Vector::new(5.0, 0.0), 1e-9));
    for i in 0..=20 {
        let p = offset.point_at(i as f64 / 20.0);
        let d = nearest_on_curve(&arch, &p, &cfg.search).distance;
        assert!((d - 1.0).abs() < 0.05, "sample {i} is {d} from the source curve");
    }
}
