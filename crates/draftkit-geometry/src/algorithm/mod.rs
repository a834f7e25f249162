//! Geometric algorithms over the shape model.
//!
//! Families build on each other bottom up: predicates and the numerical
//! search first, then metrics, conversion and splitting, then intersection,
//! tangency, triangulation, offsetting and boolean combination.

pub mod boolean;
pub mod conversion;
pub mod distance;
pub mod earcut;
pub mod fixed_point;
pub mod foot;
pub mod intersection;
pub mod offset;
pub mod poly;
pub mod predicate;
pub mod search;
pub mod split;
pub mod tangency;

pub use boolean::{polygon_boolean, shape_boolean, BooleanOp, Regions};
pub use conversion::{shape_outline, shape_to_polygon, shape_to_polyline};
pub use distance::{closest_point, distance, distance_to_line, shape_distance};
pub use earcut::{
    ear_cut_to_indexs, ear_cut_to_marked_points, ear_cut_to_triangles, ear_cut_with_holes, merge_ear_cut_triangles,
};
pub use foot::{foot_point, foot_points};
pub use intersection::{intersection_points, is_intersected, is_self_intersected, segment_segment};
pub use offset::{
    offset_bezier, offset_circle, offset_polygon, offset_polygon_robust, offset_polyline, offset_polyline_robust,
    offset_rect, offset_shape, EndType, JoinType,
};
pub use predicate::{is_coincide, is_inside, is_on_left, is_parallel, orientation, Orientation};
pub use search::{minimize, nearest_on_curve, CurveHit, Minimum};
pub use split::{split_bezier, split_bezier_at_point, split_bspline, split_bspline_at_point};
pub use tangency::tangency_points;
