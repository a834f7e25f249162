use draftkit_core::GeometryError;
use draftkit_geometry::algorithm::{
    ear_cut_to_indexs, ear_cut_to_marked_points, ear_cut_to_triangles, ear_cut_with_holes, merge_ear_cut_triangles,
};
use draftkit_geometry::model::Polygon;

fn square() -> Polygon {
    Polygon::from_coords(&[0.0, 0.0, 4.0, 0.0, 4.0, 4.0, 0.0, 4.0])
}

#[test]
fn test_square_ear_cut() {
    let triangles = ear_cut_to_triangles(&square()).unwrap();
    assert_eq!(triangles.len(), 2);
    let area: f64 = triangles.iter().map(|t| t.area()).sum();
    assert!((area - 16.0).abs() < 1e-12);
}

#[test]
fn test_earcutr_indices() {
    let indices = ear_cut_to_indexs(&square());
    assert_eq!(indices.len(), 6);
    assert!(indices.iter().all(|&i| i < 4));
}

#[test]
fn test_ear_cut_with_hole() {
    let outer = Polygon::from_coords(&[0.0, 0.0, 10.0, 0.0, 10.0, 10.0, 0.0, 10.0]);
    let hole = Polygon::from_coords(&[4.0, 4.0, 4.0, 6.0, 6.0, 6.0, 6.0, 4.0]);
    let triangles = ear_cut_with_holes(&outer, &[hole]);
    let area: f64 = triangles.iter().map(|t| t.area()).sum();
    assert!((area - 96.0).abs() < 1e-9);
}

#[test]
fn test_collinear_vertices_are_skipped() {
    // Extra vertex in the middle of the bottom edge.
    let polygon = Polygon::from_coords(&[0.0, 0.0, 2.0, 0.0, 4.0, 0.0, 4.0, 4.0, 0.0, 4.0]);
    let triangles = ear_cut_to_triangles(&polygon).unwrap();
    let area: f64 = triangles.iter().map(|t| t.area()).sum();
    assert!((area - 16.0).abs() < 1e-12);
    assert!(triangles.iter().all(|t| t.area() > 0.0));
}

#[test]
fn test_too_few_vertices() {
    let err = ear_cut_to_triangles(&Polygon::from_coords(&[0.0, 0.0, 1.0, 1.0])).unwrap_err();
    assert!(matches!(err, GeometryError::DegenerateInput { .. }));
    assert!(ear_cut_to_indexs(&Polygon::from_coords(&[0.0, 0.0, 1.0, 1.0])).is_empty());
}

#[test]
fn test_comb_polygon_triangulates() {
    let comb = Polygon::from_coords(&[
        0.0, 0.0, 7.0, 0.0, 7.0, 3.0, 6.0, 3.0, 6.0, 1.0, 5.0, 1.0, 5.0, 3.0, 4.0, 3.0, 4.0, 1.0, 3.0, 1.0, 3.0,
        3.0, 2.0, 3.0, 2.0, 1.0, 1.0, 1.0, 1.0, 3.0, 0.0, 3.0,
    ]);
    let triangles = ear_cut_to_triangles(&comb).unwrap();
    let area: f64 = triangles.iter().map(|t| t.area()).sum();
    assert!((area - comb.area()).abs() < 1e-9);

    let marked = ear_cut_to_marked_points(&comb).unwrap();
    assert_eq!(marked.len(), triangles.len());
    let boundary_edges: usize = marked.iter().map(|tri| tri.iter().filter(|m| m.active).count()).sum();
    assert!(boundary_edges > 0 && boundary_edges <= comb.len());

    let merged = merge_ear_cut_triangles(&triangles, 1e-9);
    let merged_area: f64 = merged.iter().map(|p| p.area()).sum();
    assert!((merged_area - comb.area()).abs() < 1e-9);
}

#[test]
fn test_small_scale_comb_triangulates() {
    let coords: Vec<f64> = [
        0.0, 0.0, 5.0, 0.0, 5.0, 3.0, 4.0, 3.0, 4.0, 1.0, 3.0, 1.0, 3.0, 3.0, 2.0, 3.0, 2.0, 1.0, 1.0, 1.0, 1.0, 3.0,
        0.0, 3.0,
    ]
    .iter()
    .map(|v| v * 1e-6)
    .collect();
    let comb = Polygon::from_coords(&coords);
    let triangles = ear_cut_to_triangles(&comb).unwrap();
    assert_eq!(triangles.len(), comb.len() - 2);
    let area: f64 = triangles.iter().map(|t| t.area()).sum();
    assert!((area - comb.area()).abs() <= 1e-9 * comb.area());
}

#[test]
fn test_touching_ring_is_rejected() {
    // Two squares sharing the corner (2, 2).
    let pinched = Polygon::from_coords(&[0.0, 0.0, 2.0, 0.0, 2.0, 2.0, 4.0, 2.0, 4.0, 4.0, 2.0, 4.0, 2.0, 2.0, 0.0, 2.0]);
    let err = ear_cut_to_triangles(&pinched).unwrap_err();
    assert!(matches!(err, GeometryError::NonSimplePolygon { .. }));
}
