use draftkit_core::GeometryConfig;
use draftkit_geometry::algorithm::split::{split_ellipse, split_line, split_polyline};
use draftkit_geometry::algorithm::{split_bezier, split_bezier_at_point, split_bspline, split_bspline_at_point};
use draftkit_geometry::model::{BSpline, CubicBezier, Degree, Ellipse, Line, Polyline};
use draftkit_geometry::{GeometryObject, ParametricCurve, Vector};

fn arch() -> CubicBezier {
    CubicBezier::new(vec![
        Vector::new(0.0, 0.0),
        Vector::new(0.0, 4.0),
        Vector::new(4.0, 4.0),
        Vector::new(4.0, 0.0),
    ])
    .unwrap()
}

#[test]
fn test_bezier_split_matches_de_casteljau() {
    let (left, right) = split_bezier(&arch(), 0.5).unwrap();
    let expected_left = [
        Vector::new(0.0, 0.0),
        Vector::new(0.0, 2.0),
        Vector::new(1.0, 3.0),
        Vector::new(2.0, 3.0),
    ];
    let expected_right = [
        Vector::new(2.0, 3.0),
        Vector::new(3.0, 3.0),
        Vector::new(4.0, 2.0),
        Vector::new(4.0, 0.0),
    ];
    for (got, want) in left.control_points().iter().zip(expected_left.iter()) {
        assert!(got.approx_eq(want, 1e-12), "{got:?} != {want:?}");
    }
    for (got, want) in right.control_points().iter().zip(expected_right.iter()) {
        assert!(got.approx_eq(want, 1e-12), "{got:?} != {want:?}");
    }
    assert_eq!(left.back(), right.front());
}

#[test]
fn test_bezier_split_rejects_end_parameters() {
    assert!(split_bezier(&arch(), 0.0).is_none());
    assert!(split_bezier(&arch(), 1.0).is_none());
}

#[test]
fn test_multi_segment_split_on_joint() {
    let mut bezier = arch();
    bezier.append_segment(Vector::new(4.0, -4.0), Vector::new(8.0, -4.0), Vector::new(8.0, 0.0));
    let (left, right) = split_bezier(&bezier, 0.5).unwrap();
    assert_eq!(left.segment_count(), 1);
    assert_eq!(right.segment_count(), 1);
    assert_eq!(left.back(), Vector::new(4.0, 0.0));
}

#[test]
fn test_bezier_split_at_point() {
    let cfg = GeometryConfig::default();
    let (left, right) = split_bezier_at_point(&arch(), &Vector::new(2.0, 3.5), &cfg).unwrap();
    assert!(left.back().approx_eq(&Vector::new(2.0, 3.0), 1e-6));
    assert!((left.length() - right.length()).abs() < 1e-3);
}

#[test]
fn test_bspline_split_preserves_curve() {
    let cps = vec![
        Vector::new(0.0, 0.0),
        Vector::new(1.0, 3.0),
        Vector::new(3.0, 3.0),
        Vector::new(5.0, 0.0),
        Vector::new(7.0, 2.0),
    ];
    let spline = BSpline::uniform(Degree::Cubic, cps).unwrap();
    let t = 0.3;
    let split_at = spline.point_at(t);
    let (left, right) = split_bspline(&spline, t).unwrap();
    assert!(left.front().approx_eq(&spline.front(), 1e-9));
    assert!(left.back().approx_eq(&split_at, 1e-9));
    assert!(right.front().approx_eq(&split_at, 1e-9));
    assert!(right.back().approx_eq(&spline.back(), 1e-9));
    assert_eq!(left.domain(), (0.0, 1.0));
    assert_eq!(right.domain(), (0.0, 1.0));
    // A point inside the left half maps back onto the original curve.
    let probe = left.point_at(0.5);
    assert!(probe.approx_eq(&spline.point_at(0.15), 1e-9));
}

#[test]
fn test_bspline_split_at_point() {
    let cfg = GeometryConfig::default();
    let cps = vec![
        Vector::new(0.0, 0.0),
        Vector::new(2.0, 4.0),
        Vector::new(4.0, 4.0),
        Vector::new(6.0, 0.0),
    ];
    let spline = BSpline::uniform(Degree::Cubic, cps).unwrap();
    let target = spline.point_at(0.4);
    let (left, right) = split_bspline_at_point(&spline, &target, &cfg).unwrap();
    assert!(left.back().approx_eq(&target, 1e-6));
    assert!(right.front().approx_eq(&target, 1e-6));
    assert!(split_bspline(&spline, 1.0).is_none());
}

#[test]
fn test_split_line_inside_only() {
    let line = Line::from_coords(0.0, 0.0, 10.0, 0.0);
    let (a, b) = split_line(&line, &Vector::new(4.0, 3.0)).unwrap();
    assert_eq!(a.back, Vector::new(4.0, 0.0));
    assert_eq!(b.front, Vector::new(4.0, 0.0));
    assert!(split_line(&line, &Vector::new(-1.0, 0.0)).is_none());
}

#[test]
fn test_split_polyline_keeps_vertices() {
    let cfg = GeometryConfig::default();
    let polyline = Polyline::from_coords(&[0.0, 0.0, 4.0, 0.0, 4.0, 4.0]);
    let (a, b) = split_polyline(&polyline, &Vector::new(5.0, 2.0), &cfg).unwrap();
    assert_eq!(a.points(), &[Vector::new(0.0, 0.0), Vector::new(4.0, 0.0), Vector::new(4.0, 2.0)]);
    assert_eq!(b.points(), &[Vector::new(4.0, 2.0), Vector::new(4.0, 4.0)]);
    assert!(split_polyline(&polyline, &Vector::new(-1.0, -1.0), &cfg).is_none());
}

#[test]
fn test_split_full_ellipse_into_arcs() {
    let ellipse = Ellipse::new(Vector::ZERO, 4.0, 2.0, 0.0);
    let cuts = [Vector::new(4.0, 0.0), Vector::new(-4.0, 0.0)];
    let arcs = split_ellipse(&ellipse, &cuts);
    assert_eq!(arcs.len(), 2);
    assert!(arcs.iter().all(|e| e.is_arc()));
    let total: f64 = arcs.iter().map(|e| e.length()).sum();
    assert!((total - ellipse.length()).abs() < 1e-6);
}
