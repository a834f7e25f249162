use draftkit_geometry::model::{Arc, BSpline, Circle, CubicBezier, Degree, Ellipse, Line, Polygon, Shape};
use draftkit_geometry::{GeometryObject, Vector};

fn roundtrip(shape: &Shape) -> Shape {
    let json = serde_json::to_string(shape).unwrap();
    serde_json::from_str(&json).unwrap()
}

#[test]
fn test_shape_json_roundtrip() {
    let shapes = vec![
        Shape::Point(Vector::new(0.5, -1.25)),
        Shape::Line(Line::from_coords(0.0, 0.0, 1.0, 2.0)),
        Shape::Polygon(Polygon::from_coords(&[0.0, 0.0, 4.0, 0.0, 4.0, 4.0])),
        Shape::Circle(Circle::from_coords(1.0, 1.0, 2.5)),
    ];
    for shape in &shapes {
        assert_eq!(&roundtrip(shape), shape);
    }
}

#[test]
fn test_curved_shape_json_roundtrip() {
    let arc = Arc::from_center(Vector::ZERO, 2.0, 0.0, 1.0, false);
    let Shape::Arc(restored) = roundtrip(&Shape::Arc(arc)) else {
        panic!("expected an arc");
    };
    for (a, b) in arc.control_points().iter().zip(restored.control_points()) {
        assert!(a.approx_eq(b, 1e-12));
    }
    assert!(restored.is_cw());

    let ellipse = Ellipse::new_arc(Vector::new(1.0, 1.0), 3.0, 1.0, 0.4, 0.5, 2.0);
    let Shape::Ellipse(restored) = roundtrip(&Shape::Ellipse(ellipse)) else {
        panic!("expected an ellipse");
    };
    assert!(restored.is_arc());
    assert!((restored.arc_angle1() - 2.0).abs() < 1e-12);
    for (a, b) in ellipse.axis_points().iter().zip(restored.axis_points().iter()) {
        assert!(a.approx_eq(b, 1e-12));
    }
}

#[test]
fn test_bezier_cache_rebuilt_after_deserialize() {
    let bezier = CubicBezier::new(vec![
        Vector::new(0.0, 0.0),
        Vector::new(0.0, 2.0),
        Vector::new(2.0, 2.0),
        Vector::new(2.0, 0.0),
    ])
    .unwrap();
    let length = bezier.length();
    let restored = roundtrip(&Shape::Bezier(bezier));
    let Shape::Bezier(restored) = restored else {
        panic!("expected a Bézier curve");
    };
    assert!((restored.length() - length).abs() < 1e-12);
}

#[test]
fn test_bspline_degree_serialized_lowercase() {
    let spline = BSpline::uniform(
        Degree::Quadratic,
        vec![Vector::new(0.0, 0.0), Vector::new(1.0, 1.0), Vector::new(2.0, 0.0)],
    )
    .unwrap();
    let json = serde_json::to_string(&spline).unwrap();
    assert!(json.contains("\"quadratic\""));
    let restored: BSpline = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, spline);
}
