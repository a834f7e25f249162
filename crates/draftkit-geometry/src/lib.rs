//! # DraftKit Geometry
//!
//! 2D shape model and computational geometry kernel used by the DraftKit
//! drawing tools.
//!
//! ## Core Components
//!
//! ### Shape Model
//! - **Primitives**: Vectors, lines, polylines, polygons, rectangles, triangles
//! - **Conics**: Circles, arcs and ellipses with optional arc windows
//! - **Free-form curves**: Piecewise cubic Bézier curves and quadratic or
//!   cubic B-splines with lazily cached tessellation
//! - **Shape**: A closed sum type over every variant
//!
//! ### Algorithms
//! - **Predicates**: Inside, parallel, coincide and on-left tests
//! - **Metrics**: Distance, closest point and perpendicular feet
//! - **Curve math**: Conversion between representations and splitting
//! - **Intersection**: Closed form for lines and conics, numerical for curves
//! - **Tangency**: Tangent points seen from an external point
//! - **Triangulation**: Ear clipping and triangle merging
//! - **Offset**: Bisector and fixed-point robust offsets, Bézier offsets
//! - **Boolean**: Union, intersection, difference and xor of closed shapes
//!
//! ## Architecture
//!
//! ```text
//! model (Shape, GeometryObject, ParametricCurve)
//!   └── algorithm
//!         ├── predicate, search, poly
//!         ├── distance, foot, conversion, split
//!         ├── intersection, tangency
//!         └── earcut, offset, boolean (fixed_point)
//! ```
//!
//! Every algorithm is a pure function over shapes and a
//! [`GeometryConfig`](draftkit_core::GeometryConfig).
//!
//! ## Usage
//!
//! ```rust
//! use draftkit_core::GeometryConfig;
//! use draftkit_geometry::algorithm::{distance, intersection_points};
//! use draftkit_geometry::model::{Circle, Line, Shape, Vector};
//!
//! let cfg = GeometryConfig::default();
//! let line = Shape::Line(Line::from_coords(0.0, 5.0, 10.0, 5.0));
//! assert!((distance(&Vector::ZERO, &line, &cfg) - 5.0).abs() < 1e-12);
//!
//! let a = Shape::Circle(Circle::from_coords(0.0, 0.0, 5.0));
//! let b = Shape::Circle(Circle::from_coords(8.0, 0.0, 5.0));
//! assert_eq!(intersection_points(&a, &b, &cfg).len(), 2);
//! ```

pub mod algorithm;
pub mod model;

pub use model::{GeometryObject, ParametricCurve, Shape, Vector};
