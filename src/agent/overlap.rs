use geo::{Area, BooleanOps, MultiPolygon};

use crate::geom::{clean, union_all, BoundingBox, Circle, CircleIndex, Region};

/// Area shared by two or more circles of one agent.
#[derive(Clone, Debug)]
pub struct SelfOverlap {
    pub geometry: MultiPolygon<f64>,
    /// Overlap area over the area of the union of all circles, in `[0, 1]`.
    pub fraction: f64,
}

/// How the circles of one agent sit against the region.
#[derive(Clone, Debug)]
pub struct RegionOverlap {
    /// `region ∩ union(circles)`.
    pub covered: MultiPolygon<f64>,
    /// `union(circles) − region`.
    pub overflow: MultiPolygon<f64>,
    /// Covered area over region area, in `[0, 1]`.
    pub covered_fraction: f64,
    /// Overflow area over bounding-box area, in `[0, 1]`.
    pub overflow_fraction: f64,
}

/// Both analytics for one agent.
#[derive(Clone, Debug)]
pub struct Intersections {
    pub self_overlap: SelfOverlap,
    pub region: RegionOverlap,
}

#[inline]
fn empty() -> MultiPolygon<f64> { MultiPolygon::new(Vec::new()) }

#[inline]
fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 { (numerator / denominator).clamp(0.0, 1.0) } else { 0.0 }
}

/// Union of the polygons of `circles`.
pub fn circle_union(circles: &[Circle]) -> MultiPolygon<f64> {
    union_all(circles.iter().map(Circle::to_multi))
}

/// Pairwise overlap of `circles`, shortlisted through a bounding-box R-tree.
pub fn self_overlap(circles: &[Circle]) -> SelfOverlap {
    if circles.len() < 2 {
        return SelfOverlap { geometry: empty(), fraction: 0.0 }
    }

    let index = CircleIndex::new(circles);
    let overlaps = (0..circles.len())
        .filter_map(|i| {
            let neighbours = index.neighbours(i);
            if neighbours.is_empty() { return None }

            let others = union_all(neighbours.iter().map(|&j| circles[j].to_multi()));
            let overlap = clean(circles[i].to_multi().intersection(&others));
            (!overlap.0.is_empty()).then_some(overlap)
        })
        .collect::<Vec<_>>();

    let geometry = clean(union_all(overlaps));
    let fraction = ratio(geometry.unsigned_area(), circle_union(circles).unsigned_area());
    SelfOverlap { geometry, fraction }
}

/// Coverage of `region` by `circles`, and the overflow outside of it.
pub fn region_overlap(region: &Region, circles: &[Circle], bounding_box: &BoundingBox) -> RegionOverlap {
    if circles.is_empty() {
        return RegionOverlap { covered: empty(), overflow: empty(), covered_fraction: 0.0, overflow_fraction: 0.0 }
    }

    let union = circle_union(circles);
    let covered = clean(region.shape().intersection(&union));
    let overflow = clean(union.difference(region.shape()));

    RegionOverlap {
        covered_fraction: ratio(covered.unsigned_area(), region.area()),
        overflow_fraction: ratio(overflow.unsigned_area(), bounding_box.area()),
        covered,
        overflow,
    }
}

/// The part of `region` not covered by `circles`.
pub fn uncovered(region: &Region, circles: &[Circle]) -> MultiPolygon<f64> {
    if circles.is_empty() { return region.shape().clone() }

    let remainder = region.shape().difference(&circle_union(circles));
    clean(remainder.intersection(region.shape()))
}

/// Area of circle `idx` not covered by any of its R-tree neighbours for which `keep` holds.
pub(crate) fn exclusive_area(circles: &[Circle], index: &CircleIndex, idx: usize, keep: impl Fn(usize) -> bool) -> f64 {
    let circle = circles[idx].to_multi();
    let others = index.neighbours(idx).into_iter()
        .filter(|&j| keep(j))
        .map(|j| circles[j].to_multi())
        .collect::<Vec<_>>();
    if others.is_empty() { return circle.unsigned_area() }

    clean(circle.difference(&union_all(others))).unsigned_area()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::CircleId;
    use approx::assert_relative_eq;
    use geo::Coord;

    fn circles(centers: &[(f64, f64)], radius: f64) -> Vec<Circle> {
        centers.iter().enumerate()
            .map(|(i, &(x, y))| Circle::new(CircleId(i as u64), Coord { x, y }, radius, 64))
            .collect()
    }

    fn square() -> Region {
        Region::rectangle(Coord { x: 0.0, y: 0.0 }, Coord { x: 4.0, y: 4.0 }).unwrap()
    }

    fn frame() -> BoundingBox {
        BoundingBox::new(Coord { x: -1.0, y: -1.0 }, Coord { x: 5.0, y: 5.0 }).unwrap()
    }

    #[test]
    fn empty_circle_set_has_zero_fractions() {
        let overlap = self_overlap(&[]);
        assert_eq!(overlap.fraction, 0.0);
        assert!(overlap.geometry.0.is_empty());

        let region = region_overlap(&square(), &[], &frame());
        assert_eq!(region.covered_fraction, 0.0);
        assert_eq!(region.overflow_fraction, 0.0);
        assert_relative_eq!(uncovered(&square(), &[]).unsigned_area(), 16.0, epsilon = 1e-9);
    }

    #[test]
    fn disjoint_circles_do_not_overlap() {
        let overlap = self_overlap(&circles(&[(1.0, 1.0), (3.0, 3.0)], 0.5));
        assert_eq!(overlap.fraction, 0.0);
    }

    #[test]
    fn identical_circles_overlap_completely() {
        let overlap = self_overlap(&circles(&[(2.0, 2.0), (2.0, 2.0)], 0.5));
        assert_relative_eq!(overlap.fraction, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn partial_overlap_is_between_zero_and_one() {
        let overlap = self_overlap(&circles(&[(2.0, 2.0), (2.5, 2.0)], 0.5));
        assert!(overlap.fraction > 0.0 && overlap.fraction < 1.0);
    }

    #[test]
    fn circle_inside_region_covers_without_overflow() {
        let circles = circles(&[(2.0, 2.0)], 1.0);
        let overlap = region_overlap(&square(), &circles, &frame());
        assert_relative_eq!(overlap.covered_fraction, circles[0].area() / 16.0, epsilon = 1e-9);
        assert_eq!(overlap.overflow_fraction, 0.0);
    }

    #[test]
    fn circle_on_corner_overflows_by_three_quarters() {
        let circles = circles(&[(0.0, 0.0)], 1.0);
        let overlap = region_overlap(&square(), &circles, &frame());
        assert_relative_eq!(overlap.overflow.unsigned_area(), 0.75 * circles[0].area(), epsilon = 1e-6);
        assert_relative_eq!(overlap.overflow_fraction, 0.75 * circles[0].area() / 36.0, epsilon = 1e-6);
    }

    #[test]
    fn exclusive_area_ignores_filtered_neighbours() {
        let circles = circles(&[(2.0, 2.0), (2.0, 2.0)], 0.5);
        let index = CircleIndex::new(&circles);
        assert!(exclusive_area(&circles, &index, 0, |_| true) < 1e-9);
        assert_relative_eq!(exclusive_area(&circles, &index, 0, |_| false), circles[0].area(), epsilon = 1e-12);
    }
}
