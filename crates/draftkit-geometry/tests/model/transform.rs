use draftkit_geometry::model::{AABBRect, Arc, Circle, Ellipse, Polygon, Shape, Transform};
use draftkit_geometry::{GeometryObject, Vector};
use std::f64::consts::{FRAC_PI_2, PI};

#[test]
fn test_rotation_about_center() {
    let t = Transform::rotation(Vector::new(1.0, 1.0), FRAC_PI_2);
    let p = t.apply(Vector::new(2.0, 1.0));
    assert!(p.approx_eq(&Vector::new(1.0, 2.0), 1e-12));
}

#[test]
fn test_transform_composition_order() {
    let t = Transform::translation(1.0, 0.0).then(&Transform::scaling(Vector::ZERO, 2.0));
    assert!(t.apply(Vector::new(1.0, 1.0)).approx_eq(&Vector::new(4.0, 2.0), 1e-12));
    let inv = t.inverse().unwrap();
    assert!(inv.apply(Vector::new(4.0, 2.0)).approx_eq(&Vector::new(1.0, 1.0), 1e-12));
}

#[test]
fn test_mirror_is_reflection() {
    let t = Transform::mirror(Vector::ZERO, Vector::new(1.0, 1.0));
    assert!(t.is_reflection());
    assert!(t.apply(Vector::new(2.0, 0.0)).approx_eq(&Vector::new(0.0, 2.0), 1e-12));
}

#[test]
fn test_translate_polygon() {
    let mut square = Polygon::from_coords(&[0.0, 0.0, 2.0, 0.0, 2.0, 2.0, 0.0, 2.0]);
    square.translate(3.0, -1.0);
    assert_eq!(square[0], Vector::new(3.0, -1.0));
    assert_eq!(square.area(), 4.0);
}

#[test]
fn test_rect_rotation_grows_bounds() {
    let mut rect = AABBRect::new(-1.0, -1.0, 1.0, 1.0);
    rect.rotate(Vector::ZERO, PI / 4.0);
    let half = 2.0_f64.sqrt();
    assert!((rect.right() - half).abs() < 1e-12);
    assert!((rect.bottom() + half).abs() < 1e-12);
}

#[test]
fn test_circle_scales_radius() {
    let mut circle = Circle::from_coords(1.0, 0.0, 2.0);
    circle.scale(Vector::ZERO, 3.0);
    assert!(circle.center.approx_eq(&Vector::new(3.0, 0.0), 1e-12));
    assert!((circle.radius - 6.0).abs() < 1e-12);
}

#[test]
fn test_ellipse_non_uniform_scale() {
    let mut ellipse = Ellipse::new(Vector::ZERO, 2.0, 1.0, 0.0);
    ellipse.transform(&Transform::scaling_xy(Vector::ZERO, 1.0, 3.0));
    let (a, b) = (ellipse.lengtha(), ellipse.lengthb());
    let (major, minor) = if a >= b { (a, b) } else { (b, a) };
    assert!((major - 3.0).abs() < 1e-9);
    assert!((minor - 2.0).abs() < 1e-9);
}

#[test]
fn test_mirrored_arc_reverses_direction() {
    let mut arc = Arc::from_center(Vector::ZERO, 1.0, 0.0, FRAC_PI_2, true);
    assert!(!arc.is_cw());
    arc.transform(&Transform::mirror(Vector::ZERO, Vector::new(1.0, 0.0)));
    assert!(arc.is_cw());
    assert!(arc.end().approx_eq(&Vector::new(0.0, -1.0), 1e-12));
}

#[test]
fn test_shape_transform_dispatch() {
    let mut shape = Shape::Circle(Circle::from_coords(0.0, 0.0, 1.0));
    shape.translate(5.0, 5.0);
    let bbox = shape.bounding_rect();
    assert!(bbox.center().approx_eq(&Vector::new(5.0, 5.0), 1e-12));
}
