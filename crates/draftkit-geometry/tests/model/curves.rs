use draftkit_core::GeometryError;
use draftkit_geometry::model::{BSpline, BezierSegment, CubicBezier, Degree};
use draftkit_geometry::{GeometryObject, ParametricCurve, Vector};

fn sample_bezier() -> CubicBezier {
    CubicBezier::new(vec![
        Vector::new(0.0, 0.0),
        Vector::new(1.0, 2.0),
        Vector::new(3.0, 2.0),
        Vector::new(4.0, 0.0),
    ])
    .unwrap()
}

#[test]
fn test_bezier_rejects_bad_point_count() {
    let err = CubicBezier::new(vec![Vector::ZERO; 5]).unwrap_err();
    assert!(matches!(err, GeometryError::InvalidControlPoints { count: 5, .. }));
}

#[test]
fn test_bezier_end_points_and_midpoint() {
    let bezier = sample_bezier();
    assert_eq!(bezier.point_at(0.0), Vector::new(0.0, 0.0));
    assert_eq!(bezier.point_at(1.0), Vector::new(4.0, 0.0));
    let mid = bezier.point_at(0.5);
    assert!(mid.approx_eq(&Vector::new(2.0, 1.5), 1e-12));
}

#[test]
fn test_bezier_global_parameter_spreads_over_segments() {
    let mut bezier = CubicBezier::from_segment(BezierSegment::line(Vector::new(0.0, 0.0), Vector::new(3.0, 0.0)));
    bezier.append_segment(Vector::new(4.0, 0.0), Vector::new(5.0, 0.0), Vector::new(6.0, 0.0));
    assert_eq!(bezier.segment_count(), 2);
    assert_eq!(bezier.locate(0.75), (1, 0.5));
    assert!(bezier.point_at(0.5).approx_eq(&Vector::new(3.0, 0.0), 1e-12));
    assert!((bezier.global_parameter(1, 0.5) - 0.75).abs() < 1e-12);
}

#[test]
fn test_bezier_tessellation_refreshes_after_edit() {
    let mut bezier = sample_bezier();
    let before = bezier.length();
    bezier.set_control_point(3, Vector::new(8.0, 0.0));
    assert!(bezier.length() > before);
    let end = bezier.shape().back().unwrap();
    assert!(end.approx_eq(&Vector::new(8.0, 0.0), 1e-12));
}

#[test]
fn test_bspline_knot_vector_length_checked() {
    let err = BSpline::new(Degree::Cubic, vec![Vector::ZERO; 4], vec![0.0; 5]).unwrap_err();
    assert!(matches!(err, GeometryError::InvalidKnotVector { expected: 8, actual: 5 }));
}

#[test]
fn test_bspline_uniform_clamped_end_points() {
    let cps = vec![
        Vector::new(0.0, 0.0),
        Vector::new(1.0, 3.0),
        Vector::new(3.0, 3.0),
        Vector::new(5.0, 0.0),
        Vector::new(7.0, 1.0),
    ];
    let spline = BSpline::uniform(Degree::Cubic, cps).unwrap();
    assert_eq!(spline.knots().len(), 9);
    assert!(spline.front().approx_eq(&Vector::new(0.0, 0.0), 1e-12));
    assert!(spline.back().approx_eq(&Vector::new(7.0, 1.0), 1e-12));
}

#[test]
fn test_bspline_knots_normalized() {
    let cps = vec![Vector::new(0.0, 0.0), Vector::new(1.0, 1.0), Vector::new(2.0, 0.0)];
    let spline = BSpline::new(Degree::Quadratic, cps, vec![2.0, 2.0, 2.0, 6.0, 6.0, 6.0]).unwrap();
    assert_eq!(spline.domain(), (0.0, 1.0));
}

#[test]
fn test_bspline_knot_insertion_keeps_shape() {
    let cps = vec![
        Vector::new(0.0, 0.0),
        Vector::new(1.0, 3.0),
        Vector::new(3.0, 3.0),
        Vector::new(5.0, 0.0),
    ];
    let spline = BSpline::uniform(Degree::Cubic, cps).unwrap();
    let mut refined = spline.clone();
    refined.insert_knot(0.3).unwrap();
    assert_eq!(refined.control_points().len(), 5);
    for i in 0..=10 {
        let t = i as f64 / 10.0;
        assert!(spline.point_at(t).approx_eq(&refined.point_at(t), 1e-9));
    }
    assert!(matches!(
        refined.insert_knot(1.5),
        Err(GeometryError::ParameterOutOfRange { .. })
    ));
}

#[test]
fn test_bspline_interpolation_passes_fit_points() {
    let fit = vec![
        Vector::new(0.0, 0.0),
        Vector::new(2.0, 2.0),
        Vector::new(4.0, 1.0),
        Vector::new(6.0, 3.0),
        Vector::new(8.0, 0.0),
    ];
    let spline = BSpline::interpolate(Degree::Cubic, fit.clone()).unwrap();
    assert_eq!(spline.path_points(), fit.as_slice());
    let chords: Vec<f64> = fit.windows(2).map(|w| w[0].distance_to(&w[1])).collect();
    let total: f64 = chords.iter().sum();
    let mut u = 0.0;
    for (k, q) in fit.iter().enumerate() {
        if k > 0 {
            u += chords[k - 1] / total;
        }
        assert!(spline.point_at(u.min(1.0)).approx_eq(q, 1e-6), "fit point {q:?} missed");
    }
    assert!(spline.front().approx_eq(&fit[0], 1e-9));
    assert!(spline.back().approx_eq(&fit[4], 1e-9));
}
