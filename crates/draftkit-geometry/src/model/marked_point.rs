use serde::{Deserialize, Serialize};

use super::Vector;

/// A vertex emitted by triangulation.
///
/// `original` is set when the point is a vertex of the input polygon, `active`
/// when the edge leaving it inside its triangle lies on the input boundary,
/// and `value` carries the index of the source vertex.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarkedPoint {
    pub point: Vector,
    pub original: bool,
    pub active: bool,
    pub value: usize,
}

impl MarkedPoint {
    pub fn new(point: Vector, value: usize) -> Self {
        Self {
            point,
            original: true,
            active: false,
            value,
        }
    }
}

impl From<MarkedPoint> for Vector {
    fn from(mp: MarkedPoint) -> Self {
        mp.point
    }
}
