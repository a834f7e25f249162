use draftkit_core::GeometryConfig;
use draftkit_geometry::algorithm::{distance, ear_cut_to_triangles, offset_polygon, segment_segment, split_bezier};
use draftkit_geometry::model::{CubicBezier, Line, Polygon, Shape};
use draftkit_geometry::{ParametricCurve, Vector};
use proptest::prelude::*;
use std::f64::consts::TAU;

fn point() -> impl Strategy<Value = Vector> {
    (-100.0..100.0f64, -100.0..100.0f64).prop_map(|(x, y)| Vector::new(x, y))
}

/// Star-shaped ring around the origin: one vertex per angular sector.
fn star_polygon() -> impl Strategy<Value = Polygon> {
    (3usize..12).prop_flat_map(|n| {
        prop::collection::vec((0.0..0.8f64, 1.0..10.0f64), n).prop_map(move |v| {
            let sector = TAU / v.len() as f64;
            v.iter()
                .enumerate()
                .map(|(i, (jitter, r))| Vector::from_angle(sector * (i as f64 + jitter)) * *r)
                .collect::<Polygon>()
        })
    })
}

/// Vertices on a circle in angular order, which is always convex.
fn convex_polygon() -> impl Strategy<Value = Polygon> {
    (3usize..10, 5.0..50.0f64).prop_flat_map(|(n, r)| {
        prop::collection::vec(0.0..0.6f64, n).prop_map(move |jitters| {
            let sector = TAU / jitters.len() as f64;
            jitters
                .iter()
                .enumerate()
                .map(|(i, j)| Vector::from_angle(sector * (i as f64 + j)) * r)
                .collect::<Polygon>()
        })
    })
}

proptest! {
    /// Segment intersection does not depend on argument order.
    #[test]
    fn segment_intersection_is_symmetric(a in point(), b in point(), c in point(), d in point()) {
        let s = Line::new(a, b);
        let t = Line::new(c, d);
        match (segment_segment(&s, &t), segment_segment(&t, &s)) {
            (Some(p), Some(q)) => prop_assert!(p.approx_eq(&q, 1e-9), "{:?} vs {:?}", p, q),
            (None, None) => {}
            (x, y) => prop_assert!(false, "asymmetric result {:?} vs {:?}", x, y),
        }
    }

    /// Both halves of a split meet at the curve point of the split parameter.
    #[test]
    fn bezier_split_is_continuous(
        p0 in point(), p1 in point(), p2 in point(), p3 in point(), t in 0.05..0.95f64,
    ) {
        let bezier = CubicBezier::new(vec![p0, p1, p2, p3]).unwrap();
        let (left, right) = split_bezier(&bezier, t).unwrap();
        prop_assert_eq!(left.back(), right.front());
        prop_assert!(left.back().approx_eq(&bezier.point_at(t), 1e-9));
        prop_assert_eq!(left.front(), p0);
        prop_assert_eq!(right.back(), p3);
    }

    /// Triangles from ear clipping cover exactly the polygon area.
    #[test]
    fn ear_cut_preserves_area(polygon in star_polygon()) {
        let triangles = ear_cut_to_triangles(&polygon).unwrap();
        let area: f64 = triangles.iter().map(|t| t.area()).sum();
        prop_assert!((area - polygon.area()).abs() <= 1e-9 * polygon.area().max(1.0));
    }

    /// Ear clipping is scale invariant, from sub-millimetre to kilometre rings.
    #[test]
    fn ear_cut_preserves_area_at_any_scale(polygon in star_polygon(), exponent in -5.0..4.0f64) {
        let scale = 10f64.powf(exponent);
        let scaled: Polygon = polygon.points().iter().map(|p| *p * scale).collect();
        let triangles = ear_cut_to_triangles(&scaled).unwrap();
        let area: f64 = triangles.iter().map(|t| t.area()).sum();
        prop_assert!((area - scaled.area()).abs() <= 1e-9 * scaled.area());
    }

    /// Boundary distance is non-negative and 1-Lipschitz in the query point.
    #[test]
    fn boundary_distance_is_lipschitz(polygon in star_polygon(), p in point(), q in point()) {
        let cfg = GeometryConfig::default();
        let shape = Shape::Polygon(polygon);
        let dp = distance(&p, &shape, &cfg);
        let dq = distance(&q, &shape, &cfg);
        prop_assert!(dp >= 0.0 && dq >= 0.0);
        prop_assert!((dp - dq).abs() <= p.distance_to(&q) + 1e-9);
    }

    /// Growing a convex polygon and shrinking it back restores its area.
    #[test]
    fn convex_offset_round_trip(polygon in convex_polygon(), d in 0.1..5.0f64) {
        let grown = offset_polygon(&polygon, d).unwrap();
        prop_assert!(grown.area() > polygon.area());
        let restored = offset_polygon(&grown, -d).unwrap();
        prop_assert!((restored.area() - polygon.area()).abs() <= 1e-6 * polygon.area());
    }
}
