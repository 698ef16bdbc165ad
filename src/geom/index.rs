use geo::Rect;
use rstar::RTree;

use crate::geom::{bbox::{CircleBounds, envelope}, Circle};

/// R-tree over the bounding boxes of a circle collection, for shortlisting overlap candidates.
#[derive(Debug, Clone)]
pub(crate) struct CircleIndex {
    rtree: RTree<CircleBounds>,
    bounds: Vec<Rect<f64>>,
}

impl CircleIndex {
    /// Bulk-load the index; entries refer to positions in `circles`.
    pub(crate) fn new(circles: &[Circle]) -> Self {
        let bounds = circles.iter().map(Circle::bounds).collect::<Vec<_>>();
        let rtree = RTree::bulk_load(
            bounds.iter().enumerate()
                .map(|(idx, &bbox)| CircleBounds::new(idx, bbox))
                .collect(),
        );

        Self { rtree, bounds }
    }

    #[cfg(test)]
    #[inline] pub(crate) fn len(&self) -> usize { self.bounds.len() }

    /// Positions of all circles whose bounding box intersects `rect`.
    pub(crate) fn query(&self, rect: &Rect<f64>) -> impl Iterator<Item = usize> + '_ {
        self.rtree.locate_in_envelope_intersecting(&envelope(rect))
            .map(CircleBounds::idx)
    }

    /// Positions of all other circles whose bounding box intersects that of circle `idx`.
    pub(crate) fn neighbours(&self, idx: usize) -> Vec<usize> {
        let mut neighbours = self.query(&self.bounds[idx])
            .filter(|&other| other != idx)
            .collect::<Vec<_>>();
        neighbours.sort_unstable();
        neighbours
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::CircleId;
    use geo::Coord;

    fn circles(centers: &[(f64, f64)]) -> Vec<Circle> {
        centers.iter().enumerate()
            .map(|(i, &(x, y))| Circle::new(CircleId(i as u64), Coord { x, y }, 1.0, 16))
            .collect()
    }

    #[test]
    fn neighbours_exclude_self_and_distant_circles() {
        let index = CircleIndex::new(&circles(&[(0.0, 0.0), (1.5, 0.0), (10.0, 0.0)]));
        assert_eq!(index.len(), 3);
        assert_eq!(index.neighbours(0), vec![1]);
        assert_eq!(index.neighbours(1), vec![0]);
        assert!(index.neighbours(2).is_empty());
    }

    #[test]
    fn duplicate_circles_are_neighbours() {
        let index = CircleIndex::new(&circles(&[(2.0, 2.0), (2.0, 2.0)]));
        assert_eq!(index.neighbours(0), vec![1]);
        assert_eq!(index.neighbours(1), vec![0]);
    }

    #[test]
    fn query_by_rect() {
        let index = CircleIndex::new(&circles(&[(0.0, 0.0), (5.0, 5.0)]));
        let rect = Rect::new(Coord { x: 4.5, y: 4.5 }, Coord { x: 6.0, y: 6.0 });
        assert_eq!(index.query(&rect).collect::<Vec<_>>(), vec![1]);
    }
}
