use geo::Rect;
use rstar::{RTreeObject, AABB};

/// A bounding box in an R-tree, associated with a circle by index.
#[derive(Debug, Clone)]
pub(super) struct CircleBounds {
    idx: usize, // Index of the corresponding circle
    bbox: Rect<f64>,
}

impl CircleBounds {
    pub(super) fn new(idx: usize, bbox: Rect<f64>) -> Self {
        Self { idx, bbox }
    }

    /// Get the index of the corresponding circle.
    pub(super) fn idx(&self) -> usize { self.idx }
}

impl RTreeObject for CircleBounds {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(self.bbox.min().into(), self.bbox.max().into())
    }
}

/// Envelope of a rectangle, for querying the tree.
#[inline]
pub(super) fn envelope(rect: &Rect<f64>) -> AABB<[f64; 2]> {
    AABB::from_corners(rect.min().into(), rect.max().into())
}
