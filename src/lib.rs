//! # DraftKit
//!
//! A 2D CAD geometry kernel: a closed set of shape variants and the
//! predicates, metrics, curve math, intersection, triangulation, offset and
//! boolean algorithms a drawing application needs on top of them.
//!
//! ## Architecture
//!
//! DraftKit is organized as a workspace with multiple crates:
//!
//! 1. **draftkit-core** - Error types, tolerances and configuration
//! 2. **draftkit-geometry** - Shape model and algorithm families
//! 3. **draftkit** - Facade re-exporting both, plus logging setup
//!
//! ## Features
//!
//! - **Shapes**: Lines, polylines, polygons, rectangles, triangles, circles,
//!   arcs, ellipses, cubic Bézier curves and B-splines
//! - **Configurable tolerances**: One immutable [`GeometryConfig`] value,
//!   loadable from JSON or TOML
//! - **Deterministic numerics**: Bounded staged searches, no random restarts
//! - **Robust clipping**: Fixed-point quantised offsets and booleans

pub use draftkit_core::{
    ConfigError, Error, FixedPointSettings, GeometryConfig, GeometryError, GeometryResult, OffsetSettings, Result,
    SamplingMode, SamplingSettings, SearchSettings, ToleranceSettings, EPSILON,
};
pub use draftkit_geometry::algorithm;
pub use draftkit_geometry::model;
pub use draftkit_geometry::model::{
    AABBRect, Arc, BSpline, BezierSegment, Circle, CubicBezier, Degree, Ellipse, GeometryObject, Line, MarkedPoint,
    ParametricCurve, Point, Polygon, Polyline, Shape, ShapeKind, Transform, Triangle, Vector,
};

/// Initialize the tracing subscriber.
///
/// Honors `RUST_LOG`, defaulting to `info`. Calling it again once a
/// subscriber is installed is a no-op.
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_line_number(true);

    if tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .is_err()
    {
        tracing::debug!("tracing subscriber already installed");
    }

    Ok(())
}
