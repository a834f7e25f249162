use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use draftkit_core::{GeometryError, GeometryResult, SamplingSettings};

use super::{AABBRect, GeometryObject, ParametricCurve, Polyline, Transform, Vector};

/// Binomial coefficients of the cubic Bernstein basis.
const BINOMIAL: [f64; 4] = [1.0, 3.0, 3.0, 1.0];

/// One cubic segment: start, two handles, end.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BezierSegment {
    pub points: [Vector; 4],
}

impl BezierSegment {
    pub fn new(p0: Vector, p1: Vector, p2: Vector, p3: Vector) -> Self {
        Self {
            points: [p0, p1, p2, p3],
        }
    }

    /// Straight segment with handles at the thirds.
    pub fn line(a: Vector, b: Vector) -> Self {
        Self::new(a, a.lerp(&b, 1.0 / 3.0), a.lerp(&b, 2.0 / 3.0), b)
    }

    pub fn start(&self) -> Vector {
        self.points[0]
    }

    pub fn end(&self) -> Vector {
        self.points[3]
    }

    pub fn second_derivative_at(&self, t: f64) -> Vector {
        let [p0, p1, p2, p3] = self.points;
        ((p2 - p1 * 2.0 + p0) * (1.0 - t) + (p3 - p2 * 2.0 + p1) * t) * 6.0
    }

    /// De Casteljau subdivision; both halves share the point at `t` exactly.
    pub fn split(&self, t: f64) -> (BezierSegment, BezierSegment) {
        let [p0, p1, p2, p3] = self.points;
        let p01 = p0.lerp(&p1, t);
        let p12 = p1.lerp(&p2, t);
        let p23 = p2.lerp(&p3, t);
        let p012 = p01.lerp(&p12, t);
        let p123 = p12.lerp(&p23, t);
        let mid = p012.lerp(&p123, t);
        (
            BezierSegment::new(p0, p01, p012, mid),
            BezierSegment::new(mid, p123, p23, p3),
        )
    }

    pub fn reversed(&self) -> BezierSegment {
        let [p0, p1, p2, p3] = self.points;
        BezierSegment::new(p3, p2, p1, p0)
    }

    /// Bounding box of the control polygon, which contains the curve.
    pub fn hull_rect(&self) -> AABBRect {
        AABBRect::from_points(self.points)
    }
}

impl ParametricCurve for BezierSegment {
    fn point_at(&self, t: f64) -> Vector {
        let s = 1.0 - t;
        let weights = [s * s * s, s * s * t, s * t * t, t * t * t];
        self.points
            .iter()
            .zip(weights.iter().zip(BINOMIAL.iter()))
            .fold(Vector::ZERO, |acc, (p, (w, c))| acc + *p * (w * c))
    }

    fn derivative_at(&self, t: f64) -> Vector {
        let [p0, p1, p2, p3] = self.points;
        let s = 1.0 - t;
        ((p1 - p0) * (s * s) + (p2 - p1) * (2.0 * s * t) + (p3 - p2) * (t * t)) * 3.0
    }

    fn domain(&self) -> (f64, f64) {
        (0.0, 1.0)
    }
}

/// Piecewise cubic Bézier curve.
///
/// Control points come in groups of four sharing end points, so a curve of
/// `k` segments has `3k + 1` points. The global parameter `t` in `[0, 1]`
/// spreads evenly across segments. The tessellated polyline is cached and
/// dropped by every mutating method.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CubicBezier {
    control_points: Vec<Vector>,
    step: f64,
    #[serde(skip)]
    cached_shape: OnceLock<Polyline>,
}

impl PartialEq for CubicBezier {
    fn eq(&self, other: &Self) -> bool {
        self.control_points == other.control_points && self.step == other.step
    }
}

impl CubicBezier {
    pub fn new(control_points: Vec<Vector>) -> GeometryResult<Self> {
        let count = control_points.len();
        if count < 4 || (count - 1) % 3 != 0 {
            return Err(GeometryError::InvalidControlPoints {
                count,
                reason: "cubic Bézier needs 3k + 1 control points with k >= 1".to_string(),
            });
        }
        Ok(Self {
            control_points,
            step: SamplingSettings::default().bezier_step,
            cached_shape: OnceLock::new(),
        })
    }

    pub fn from_segment(segment: BezierSegment) -> Self {
        Self::from_segments(&[segment])
    }

    /// Joins segments end to start; each segment's start replaces the previous end.
    pub fn from_segments(segments: &[BezierSegment]) -> Self {
        let mut control_points = Vec::with_capacity(segments.len() * 3 + 1);
        for (i, seg) in segments.iter().enumerate() {
            if i == 0 {
                control_points.push(seg.points[0]);
            }
            control_points.extend_from_slice(&seg.points[1..]);
        }
        Self {
            control_points,
            step: SamplingSettings::default().bezier_step,
            cached_shape: OnceLock::new(),
        }
    }

    /// Sets the local parameter step used for tessellation.
    pub fn with_step(mut self, step: f64) -> Self {
        self.step = step.clamp(1e-4, 1.0);
        self.invalidate();
        self
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn control_points(&self) -> &[Vector] {
        &self.control_points
    }

    pub fn set_control_point(&mut self, index: usize, p: Vector) {
        if let Some(slot) = self.control_points.get_mut(index) {
            *slot = p;
            self.invalidate();
        }
    }

    /// Appends a segment starting at the current end point.
    pub fn append_segment(&mut self, handle0: Vector, handle1: Vector, end: Vector) {
        self.control_points.extend([handle0, handle1, end]);
        self.invalidate();
    }

    pub fn segment_count(&self) -> usize {
        (self.control_points.len().saturating_sub(1)) / 3
    }

    pub fn segment(&self, index: usize) -> BezierSegment {
        let base = index * 3;
        let p = &self.control_points;
        BezierSegment::new(p[base], p[base + 1], p[base + 2], p[base + 3])
    }

    pub fn segments(&self) -> impl Iterator<Item = BezierSegment> + '_ {
        (0..self.segment_count()).map(move |i| self.segment(i))
    }

    /// Maps global `t` to a segment index and local parameter.
    pub fn locate(&self, t: f64) -> (usize, f64) {
        let n = self.segment_count();
        let scaled = t.clamp(0.0, 1.0) * n as f64;
        let index = (scaled.floor() as usize).min(n.saturating_sub(1));
        (index, scaled - index as f64)
    }

    pub fn global_parameter(&self, segment: usize, local: f64) -> f64 {
        (segment as f64 + local) / self.segment_count().max(1) as f64
    }

    pub fn front(&self) -> Vector {
        self.control_points[0]
    }

    pub fn back(&self) -> Vector {
        self.control_points[self.control_points.len() - 1]
    }

    pub fn reversed(&self) -> CubicBezier {
        let mut control_points = self.control_points.clone();
        control_points.reverse();
        Self {
            control_points,
            step: self.step,
            cached_shape: OnceLock::new(),
        }
    }

    /// Drops the cached tessellation.
    pub fn invalidate(&mut self) {
        self.cached_shape.take();
    }

    /// Tessellated approximation, computed on first use.
    pub fn shape(&self) -> &Polyline {
        self.cached_shape.get_or_init(|| {
            let per_segment = (1.0 / self.step).ceil().max(1.0) as usize;
            let mut points = Vec::with_capacity(self.segment_count() * per_segment + 1);
            for (i, seg) in self.segments().enumerate() {
                let first = if i == 0 { 0 } else { 1 };
                for k in first..=per_segment {
                    points.push(seg.point_at(k as f64 / per_segment as f64));
                }
            }
            Polyline::new(points)
        })
    }

    /// Global parameter of the `index`-th tessellation vertex.
    pub fn shape_parameter(&self, index: usize) -> f64 {
        let per_segment = (1.0 / self.step).ceil().max(1.0) as usize;
        (index as f64 / (per_segment * self.segment_count().max(1)) as f64).min(1.0)
    }
}

impl ParametricCurve for CubicBezier {
    fn point_at(&self, t: f64) -> Vector {
        let (i, local) = self.locate(t);
        self.segment(i).point_at(local)
    }

    /// Derivative with respect to the global parameter.
    fn derivative_at(&self, t: f64) -> Vector {
        let (i, local) = self.locate(t);
        self.segment(i).derivative_at(local) * self.segment_count() as f64
    }

    fn domain(&self) -> (f64, f64) {
        (0.0, 1.0)
    }

    fn segment_count(&self) -> usize {
        CubicBezier::segment_count(self)
    }
}

impl GeometryObject for CubicBezier {
    fn transform(&mut self, t: &Transform) {
        for p in &mut self.control_points {
            *p = t.apply(*p);
        }
        self.invalidate();
    }

    fn bounding_rect(&self) -> AABBRect {
        self.shape().bounding_rect()
    }

    fn length(&self) -> f64 {
        self.shape().length()
    }

    fn is_empty(&self) -> bool {
        self.control_points.len() < 4
    }
}
