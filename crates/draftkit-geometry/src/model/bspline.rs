use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use draftkit_core::{GeometryError, GeometryResult, SamplingSettings};

use super::{AABBRect, GeometryObject, ParametricCurve, Polyline, Transform, Vector};

/// Polynomial degree of a B-spline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Degree {
    Quadratic,
    Cubic,
}

impl Degree {
    pub fn value(self) -> usize {
        match self {
            Degree::Quadratic => 2,
            Degree::Cubic => 3,
        }
    }
}

/// Non-rational B-spline curve of degree two or three.
///
/// Invariants: `knots.len() == control_points.len() + degree + 1`, knots are
/// non-decreasing and normalised to `[0, 1]`. Optional path (fit) points are
/// kept as plain coordinates. The tessellated polyline is cached and dropped by
/// every mutating method.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BSpline {
    degree: Degree,
    control_points: Vec<Vector>,
    knots: Vec<f64>,
    path_points: Vec<Vector>,
    samples_per_span: usize,
    #[serde(skip)]
    cached_shape: OnceLock<Polyline>,
}

impl PartialEq for BSpline {
    fn eq(&self, other: &Self) -> bool {
        self.degree == other.degree
            && self.control_points == other.control_points
            && self.knots == other.knots
            && self.path_points == other.path_points
    }
}

impl BSpline {
    /// Validates the knot vector and normalises it to `[0, 1]`.
    pub fn new(degree: Degree, control_points: Vec<Vector>, knots: Vec<f64>) -> GeometryResult<Self> {
        let p = degree.value();
        if control_points.len() <= p {
            return Err(GeometryError::InvalidControlPoints {
                count: control_points.len(),
                reason: format!("degree {} needs at least {} control points", p, p + 1),
            });
        }
        let expected = control_points.len() + p + 1;
        if knots.len() != expected {
            return Err(GeometryError::InvalidKnotVector {
                expected,
                actual: knots.len(),
            });
        }
        if knots.windows(2).any(|w| w[1] < w[0]) || knots.iter().any(|k| !k.is_finite()) {
            return Err(GeometryError::degenerate("knot vector must be finite and non-decreasing"));
        }
        if knots[expected - 1] - knots[0] <= 0.0 {
            return Err(GeometryError::degenerate("knot vector spans no parameter range"));
        }
        let mut spline = Self {
            degree,
            control_points,
            knots,
            path_points: Vec::new(),
            samples_per_span: SamplingSettings::default().bspline_samples_per_span,
            cached_shape: OnceLock::new(),
        };
        spline.normalize_knots();
        Ok(spline)
    }

    /// Clamped spline with uniformly spaced interior knots.
    pub fn uniform(degree: Degree, control_points: Vec<Vector>) -> GeometryResult<Self> {
        let p = degree.value();
        let n = control_points.len();
        if n <= p {
            return Err(GeometryError::InvalidControlPoints {
                count: n,
                reason: format!("degree {} needs at least {} control points", p, p + 1),
            });
        }
        let interior = n - p - 1;
        let mut knots = vec![0.0; p + 1];
        knots.extend((1..=interior).map(|i| i as f64 / (interior + 1) as f64));
        knots.extend(std::iter::repeat(1.0).take(p + 1));
        Self::new(degree, control_points, knots)
    }

    /// Global interpolation through `fit_points` with chord-length parameters
    /// and averaged knots. The fit points are kept as path points.
    pub fn interpolate(degree: Degree, fit_points: Vec<Vector>) -> GeometryResult<Self> {
        let p = degree.value();
        let n = fit_points.len();
        if n <= p {
            return Err(GeometryError::InvalidControlPoints {
                count: n,
                reason: format!("degree {} interpolation needs at least {} points", p, p + 1),
            });
        }
        let chords: Vec<f64> = fit_points.windows(2).map(|w| w[0].distance_to(&w[1])).collect();
        let total: f64 = chords.iter().sum();
        if total <= 0.0 {
            return Err(GeometryError::degenerate("fit points are coincident"));
        }
        let mut params = Vec::with_capacity(n);
        let mut acc = 0.0;
        params.push(0.0);
        for c in &chords {
            acc += c;
            params.push(acc / total);
        }
        params[n - 1] = 1.0;

        let mut knots = vec![0.0; p + 1];
        for j in 1..n - p {
            knots.push(params[j..j + p].iter().sum::<f64>() / p as f64);
        }
        knots.extend(std::iter::repeat(1.0).take(p + 1));

        let mut basis = DMatrix::<f64>::zeros(n, n);
        for (row, &u) in params.iter().enumerate() {
            let span = find_span(&knots, p, n, u);
            let values = basis_functions(&knots, p, span, u);
            for (k, v) in values.iter().enumerate() {
                basis[(row, span - p + k)] = *v;
            }
        }
        let lu = basis.lu();
        let xs = DVector::from_iterator(n, fit_points.iter().map(|q| q.x));
        let ys = DVector::from_iterator(n, fit_points.iter().map(|q| q.y));
        let (Some(cx), Some(cy)) = (lu.solve(&xs), lu.solve(&ys)) else {
            return Err(GeometryError::degenerate("interpolation system is singular"));
        };
        let control_points = cx.iter().zip(cy.iter()).map(|(x, y)| Vector::new(*x, *y)).collect();
        let mut spline = Self::new(degree, control_points, knots)?;
        spline.path_points = fit_points;
        Ok(spline)
    }

    pub fn with_samples_per_span(mut self, samples: usize) -> Self {
        self.samples_per_span = samples.max(1);
        self.invalidate();
        self
    }

    pub fn with_path_points(mut self, path_points: Vec<Vector>) -> Self {
        self.path_points = path_points;
        self
    }

    pub fn degree(&self) -> Degree {
        self.degree
    }

    pub fn control_points(&self) -> &[Vector] {
        &self.control_points
    }

    pub fn knots(&self) -> &[f64] {
        &self.knots
    }

    pub fn path_points(&self) -> &[Vector] {
        &self.path_points
    }

    pub fn set_control_point(&mut self, index: usize, p: Vector) {
        if let Some(slot) = self.control_points.get_mut(index) {
            *slot = p;
            self.invalidate();
        }
    }

    /// Rescales the knot vector to run from 0 to 1.
    pub fn normalize_knots(&mut self) {
        let (Some(&first), Some(&last)) = (self.knots.first(), self.knots.last()) else {
            return;
        };
        let range = last - first;
        if range <= 0.0 {
            return;
        }
        for k in &mut self.knots {
            *k = ((*k - first) / range).clamp(0.0, 1.0);
        }
        self.invalidate();
    }

    /// Index `k` with `knots[k] <= t < knots[k + 1]` inside the valid domain.
    pub fn span(&self, t: f64) -> usize {
        find_span(&self.knots, self.degree.value(), self.control_points.len(), t)
    }

    /// Number of times `t` already appears in the knot vector.
    pub fn multiplicity(&self, t: f64) -> usize {
        self.knots.iter().filter(|k| (**k - t).abs() <= 1e-12).count()
    }

    /// Boehm insertion of one knot; the curve shape is unchanged.
    pub fn insert_knot(&mut self, t: f64) -> GeometryResult<()> {
        let (t0, t1) = self.domain();
        if !(t0..=t1).contains(&t) {
            return Err(GeometryError::ParameterOutOfRange { value: t });
        }
        let p = self.degree.value();
        let k = self.span(t);
        let old = &self.control_points;
        let mut points = Vec::with_capacity(old.len() + 1);
        for i in 0..=old.len() {
            let q = if i + p <= k {
                old[i]
            } else if i > k {
                old[i - 1]
            } else {
                let denom = self.knots[i + p] - self.knots[i];
                let a = if denom > 0.0 { (t - self.knots[i]) / denom } else { 0.0 };
                old[i - 1] * (1.0 - a) + old[i] * a
            };
            points.push(q);
        }
        self.knots.insert(k + 1, t);
        self.control_points = points;
        self.invalidate();
        Ok(())
    }

    /// Non-empty knot spans inside the domain.
    pub fn spans(&self) -> Vec<(f64, f64)> {
        let p = self.degree.value();
        let n = self.control_points.len();
        (p..n)
            .map(|i| (self.knots[i], self.knots[i + 1]))
            .filter(|(a, b)| b > a)
            .collect()
    }

    pub fn front(&self) -> Vector {
        self.point_at(self.domain().0)
    }

    pub fn back(&self) -> Vector {
        self.point_at(self.domain().1)
    }

    /// Drops the cached tessellation.
    pub fn invalidate(&mut self) {
        self.cached_shape.take();
    }

    /// Tessellated approximation, computed on first use.
    pub fn shape(&self) -> &Polyline {
        self.cached_shape.get_or_init(|| {
            let mut points = Vec::new();
            for (i, (a, b)) in self.spans().into_iter().enumerate() {
                let first = if i == 0 { 0 } else { 1 };
                for k in first..=self.samples_per_span {
                    let t = a + (b - a) * k as f64 / self.samples_per_span as f64;
                    points.push(self.point_at(t));
                }
            }
            Polyline::new(points)
        })
    }

    /// Parameter of the `index`-th tessellation vertex.
    pub fn shape_parameter(&self, index: usize) -> f64 {
        let spans = self.spans();
        if spans.is_empty() {
            return 0.0;
        }
        let per = self.samples_per_span;
        let span_index = (index / per).min(spans.len() - 1);
        let local = index - span_index * per;
        let (a, b) = spans[span_index];
        a + (b - a) * (local.min(per) as f64 / per as f64)
    }

    pub(crate) fn from_parts(degree: Degree, control_points: Vec<Vector>, knots: Vec<f64>, samples_per_span: usize) -> Self {
        let mut spline = Self {
            degree,
            control_points,
            knots,
            path_points: Vec::new(),
            samples_per_span,
            cached_shape: OnceLock::new(),
        };
        spline.normalize_knots();
        spline
    }

    pub(crate) fn samples_per_span(&self) -> usize {
        self.samples_per_span
    }
}

/// Span index for `t`, clamped into `[p, n - 1]`.
fn find_span(knots: &[f64], p: usize, n: usize, t: f64) -> usize {
    if t >= knots[n] {
        let mut k = n - 1;
        while k > p && knots[k] >= knots[n] {
            k -= 1;
        }
        return k;
    }
    if t <= knots[p] {
        let mut k = p;
        while k + 1 < n && knots[k + 1] <= knots[p] {
            k += 1;
        }
        return k;
    }
    let upper = knots[..=n].partition_point(|&k| k <= t);
    (upper - 1).clamp(p, n - 1)
}

/// The `p + 1` non-zero basis values on span `k` (Cox-de Boor, triangular form).
fn basis_functions(knots: &[f64], p: usize, k: usize, t: f64) -> Vec<f64> {
    let mut values = vec![0.0; p + 1];
    let mut left = vec![0.0; p + 1];
    let mut right = vec![0.0; p + 1];
    values[0] = 1.0;
    for j in 1..=p {
        left[j] = t - knots[k + 1 - j];
        right[j] = knots[k + j] - t;
        let mut saved = 0.0;
        for r in 0..j {
            let denom = right[r + 1] + left[j - r];
            let temp = if denom != 0.0 { values[r] / denom } else { 0.0 };
            values[r] = saved + right[r + 1] * temp;
            saved = left[j - r] * temp;
        }
        values[j] = saved;
    }
    values
}

/// De Boor evaluation of an arbitrary-degree spline.
fn de_boor(points: &[Vector], knots: &[f64], p: usize, t: f64) -> Vector {
    let n = points.len();
    let k = find_span(knots, p, n, t);
    let mut d: Vec<Vector> = (0..=p).map(|j| points[j + k - p]).collect();
    for r in 1..=p {
        for j in (r..=p).rev() {
            let i = j + k - p;
            let denom = knots[i + p + 1 - r] - knots[i];
            let alpha = if denom > 0.0 { (t - knots[i]) / denom } else { 0.0 };
            d[j] = d[j - 1] * (1.0 - alpha) + d[j] * alpha;
        }
    }
    d[p]
}

impl ParametricCurve for BSpline {
    fn point_at(&self, t: f64) -> Vector {
        let (t0, t1) = self.domain();
        de_boor(&self.control_points, &self.knots, self.degree.value(), t.clamp(t0, t1))
    }

    fn derivative_at(&self, t: f64) -> Vector {
        let p = self.degree.value();
        let (t0, t1) = self.domain();
        let derived: Vec<Vector> = self
            .control_points
            .windows(2)
            .enumerate()
            .map(|(i, w)| {
                let denom = self.knots[i + p + 1] - self.knots[i + 1];
                if denom > 0.0 {
                    (w[1] - w[0]) * (p as f64 / denom)
                } else {
                    Vector::ZERO
                }
            })
            .collect();
        de_boor(&derived, &self.knots[1..self.knots.len() - 1], p - 1, t.clamp(t0, t1))
    }

    fn domain(&self) -> (f64, f64) {
        let p = self.degree.value();
        (self.knots[p], self.knots[self.control_points.len()])
    }

    fn segment_count(&self) -> usize {
        self.spans().len().max(1)
    }
}

impl GeometryObject for BSpline {
    fn transform(&mut self, t: &Transform) {
        for p in &mut self.control_points {
            *p = t.apply(*p);
        }
        for p in &mut self.path_points {
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
        self.control_points.len() <= self.degree.value()
    }
}
