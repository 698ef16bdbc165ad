use geo::{Area, BooleanOps, BoundingRect, Contains, Coord, InteriorPoint, MultiPolygon, Point};
use rand::Rng;

/// Polygons at or below this area are treated as degenerate boolean-op artifacts.
pub(crate) const AREA_EPSILON: f64 = 1e-12;

/// Rejection-sampling attempts before falling back to an interior point.
const MAX_SAMPLES: usize = 10_000;

/// Union of many shapes, merged pairwise in a balanced tree so that intermediate results stay
/// small. Returns an empty MultiPolygon for an empty input.
pub fn union_all(shapes: impl IntoIterator<Item = MultiPolygon<f64>>) -> MultiPolygon<f64> {
    let mut layer = shapes.into_iter().collect::<Vec<_>>();

    while layer.len() > 1 {
        let mut next = Vec::with_capacity(layer.len().div_ceil(2));
        let mut shapes = layer.into_iter();
        while let Some(a) = shapes.next() {
            next.push(match shapes.next() {
                Some(b) => a.union(&b),
                None => a,
            });
        }
        layer = next;
    }

    layer.pop().unwrap_or_else(|| MultiPolygon::new(Vec::new()))
}

/// Normalize the output of a boolean operation.
///
/// Members without area (collapsed slivers, tangent contacts) are dropped, and the remainder is
/// passed through a self-union, which resolves the minor self-intersections floating-point set
/// operations can leave behind.
pub fn clean(shape: MultiPolygon<f64>) -> MultiPolygon<f64> {
    let polygonal = MultiPolygon::new(
        shape.0.into_iter()
            .filter(|polygon| polygon.unsigned_area() > AREA_EPSILON)
            .collect(),
    );
    if polygonal.0.is_empty() { return polygonal }

    let normalized = polygonal.union(&MultiPolygon::new(Vec::new()));
    MultiPolygon::new(
        normalized.0.into_iter()
            .filter(|polygon| polygon.unsigned_area() > AREA_EPSILON)
            .collect(),
    )
}

/// Connected polygonal components of `shape` that enclose area.
pub fn components(shape: &MultiPolygon<f64>) -> Vec<MultiPolygon<f64>> {
    shape.0.iter()
        .filter(|polygon| polygon.unsigned_area() > AREA_EPSILON)
        .map(|polygon| MultiPolygon::new(vec![polygon.clone()]))
        .collect()
}

/// A uniformly distributed point strictly inside `shape`, by rejection sampling over its bounds.
/// Falls back to a guaranteed interior point for very thin shapes; `None` only for empty shapes.
pub fn random_point_in<R: Rng + ?Sized>(shape: &MultiPolygon<f64>, rng: &mut R) -> Option<Coord<f64>> {
    let rect = shape.bounding_rect()?;

    for _ in 0..MAX_SAMPLES {
        let coord = Coord {
            x: rng.random_range(rect.min().x..=rect.max().x),
            y: rng.random_range(rect.min().y..=rect.max().y),
        };
        if shape.contains(&Point::from(coord)) { return Some(coord) }
    }

    shape.interior_point().map(|point| point.0)
}

/// `count` independent random points inside `shape` (fewer only if `shape` is empty).
pub fn random_points_in<R: Rng + ?Sized>(shape: &MultiPolygon<f64>, count: usize, rng: &mut R) -> Vec<Coord<f64>> {
    (0..count).map_while(|_| random_point_in(shape, rng)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use geo::Rect;
    use rand::{SeedableRng, rngs::StdRng};

    fn square(x: f64, y: f64, side: f64) -> MultiPolygon<f64> {
        Rect::new(Coord { x, y }, Coord { x: x + side, y: y + side }).to_polygon().into()
    }

    #[test]
    fn union_of_nothing_is_empty() {
        assert!(union_all(Vec::new()).0.is_empty());
    }

    #[test]
    fn union_merges_overlapping_and_keeps_disjoint() {
        let union = union_all(vec![
            square(0.0, 0.0, 2.0),
            square(1.0, 0.0, 2.0),
            square(10.0, 10.0, 1.0),
        ]);
        assert_relative_eq!(union.unsigned_area(), 6.0 + 1.0, epsilon = 1e-9);
        assert_eq!(components(&union).len(), 2);
    }

    #[test]
    fn clean_drops_zero_area_members() {
        let touching = square(0.0, 0.0, 1.0).intersection(&square(1.0, 0.0, 1.0));
        assert!(clean(touching).0.is_empty());
    }

    #[test]
    fn random_points_fall_inside() {
        let mut rng = StdRng::seed_from_u64(7);
        let shape = union_all(vec![square(0.0, 0.0, 1.0), square(5.0, 5.0, 1.0)]);
        let points = random_points_in(&shape, 50, &mut rng);
        assert_eq!(points.len(), 50);
        assert!(points.iter().all(|&c| shape.contains(&Point::from(c))));
    }

    #[test]
    fn random_point_in_empty_shape_is_none() {
        let mut rng = StdRng::seed_from_u64(7);
        assert!(random_point_in(&MultiPolygon::new(Vec::new()), &mut rng).is_none());
    }
}
