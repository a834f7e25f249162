use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

use super::{AABBRect, GeometryObject, Line, Transform, Vector};

/// Ordered, open sequence of points.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Polyline {
    points: Vec<Vector>,
}

impl Polyline {
    pub fn new(points: Vec<Vector>) -> Self {
        Self { points }
    }

    /// Builds from interleaved `x, y` coordinates; a trailing odd value is ignored.
    pub fn from_coords(coords: &[f64]) -> Self {
        Self::new(
            coords
                .chunks_exact(2)
                .map(|c| Vector::new(c[0], c[1]))
                .collect(),
        )
    }

    pub fn points(&self) -> &[Vector] {
        &self.points
    }

    pub fn into_points(self) -> Vec<Vector> {
        self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn front(&self) -> Option<Vector> {
        self.points.first().copied()
    }

    pub fn back(&self) -> Option<Vector> {
        self.points.last().copied()
    }

    pub fn push(&mut self, p: Vector) {
        self.points.push(p);
    }

    pub fn insert(&mut self, index: usize, p: Vector) {
        self.points.insert(index, p);
    }

    pub fn remove(&mut self, index: usize) -> Vector {
        self.points.remove(index)
    }

    pub fn pop(&mut self) -> Option<Vector> {
        self.points.pop()
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// Appends another polyline, dropping its first point when it repeats our last one.
    pub fn append(&mut self, other: &Polyline, merge_tolerance: f64) {
        let skip = match (self.back(), other.front()) {
            (Some(a), Some(b)) if a.approx_eq(&b, merge_tolerance) => 1,
            _ => 0,
        };
        self.points.extend(other.points.iter().skip(skip).copied());
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Vector> {
        self.points.iter()
    }

    /// Consecutive segments.
    pub fn segments(&self) -> impl Iterator<Item = Line> + '_ {
        self.points.windows(2).map(|w| Line::new(w[0], w[1]))
    }

    pub fn reverse(&mut self) {
        self.points.reverse();
    }

    pub fn reversed(&self) -> Polyline {
        let mut points = self.points.clone();
        points.reverse();
        Polyline::new(points)
    }

    /// Removes consecutive duplicates closer than `tolerance`.
    pub fn dedup(&mut self, tolerance: f64) {
        self.points.dedup_by(|b, a| a.approx_eq(b, tolerance));
    }

    /// Removes interior points lying on the segment joining their neighbours.
    pub fn simplify(&mut self, tolerance: f64) {
        self.dedup(tolerance);
        if self.points.len() < 3 {
            return;
        }
        let mut kept = vec![self.points[0]];
        for i in 1..self.points.len() - 1 {
            let prev = kept[kept.len() - 1];
            let cur = self.points[i];
            let next = self.points[i + 1];
            let d = next - prev;
            let len = d.length();
            let off_line = if len <= tolerance {
                cur.distance_to(&prev)
            } else {
                (cur - prev).cross(&d).abs() / len
            };
            let backtracks = (cur - prev).dot(&(next - cur)) < 0.0;
            if off_line > tolerance || backtracks {
                kept.push(cur);
            }
        }
        kept.push(self.points[self.points.len() - 1]);
        self.points = kept;
    }

    /// Cumulative arc length at every vertex, starting at zero.
    pub fn cumulative_lengths(&self) -> Vec<f64> {
        let mut acc = 0.0;
        let mut out = Vec::with_capacity(self.points.len());
        for (i, p) in self.points.iter().enumerate() {
            if i > 0 {
                acc += p.distance_to(&self.points[i - 1]);
            }
            out.push(acc);
        }
        out
    }

    /// Point at arc length `s`, clamped to the ends.
    pub fn point_at_length(&self, s: f64) -> Option<Vector> {
        let lengths = self.cumulative_lengths();
        let total = *lengths.last()?;
        let s = s.clamp(0.0, total);
        let idx = lengths.partition_point(|&l| l < s);
        if idx == 0 {
            return self.front();
        }
        let (l0, l1) = (lengths[idx - 1], lengths[idx]);
        let t = if l1 > l0 { (s - l0) / (l1 - l0) } else { 0.0 };
        Some(self.points[idx - 1].lerp(&self.points[idx], t))
    }
}

impl Index<usize> for Polyline {
    type Output = Vector;

    fn index(&self, index: usize) -> &Vector {
        &self.points[index]
    }
}

impl IndexMut<usize> for Polyline {
    fn index_mut(&mut self, index: usize) -> &mut Vector {
        &mut self.points[index]
    }
}

impl FromIterator<Vector> for Polyline {
    fn from_iter<I: IntoIterator<Item = Vector>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Polyline {
    type Item = &'a Vector;
    type IntoIter = std::slice::Iter<'a, Vector>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

impl GeometryObject for Polyline {
    fn transform(&mut self, t: &Transform) {
        for p in &mut self.points {
            *p = t.apply(*p);
        }
    }

    fn bounding_rect(&self) -> AABBRect {
        AABBRect::from_points(self.points.iter().copied())
    }

    fn length(&self) -> f64 {
        self.segments().map(|s| s.length()).sum()
    }

    fn is_empty(&self) -> bool {
        self.points.len() < 2
    }
}
