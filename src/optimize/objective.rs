use geo::{Area, BooleanOps, Coord, MultiPolygon};

use crate::geom::{circle_polygon, union_all, Region};

/// Exponent of the soft inverse.
const SOFTNESS: i32 = 3;

/// Smooth stand-in for `1 / r`: `1 / (1 + r³)^(1/3)`.
///
/// Decreasing in `r ≥ 0`, exactly 1 at `r = 0` and finite everywhere.
#[inline]
pub fn soft_inverse(r: f64) -> f64 {
    1.0 / (1.0 + r.powi(SOFTNESS)).cbrt()
}

/// Coverage objective over a flattened center vector `[x0, y0, x1, y1, ...]`: the soft inverse of
/// the area of `target` covered by circles of a fixed radius at those centers.
#[derive(Clone, Copy, Debug)]
pub struct CoverageObjective<'a> {
    target: &'a MultiPolygon<f64>,
    radius: f64,
    segments: usize,
}

impl<'a> CoverageObjective<'a> {
    pub fn new(target: &'a MultiPolygon<f64>, radius: f64, segments: usize) -> Self {
        Self { target, radius, segments }
    }

    /// Objective over the whole of `region`.
    pub fn for_region(region: &'a Region, radius: f64, segments: usize) -> Self {
        Self::new(region.shape(), radius, segments)
    }

    /// Area of the target covered by circles at `x`. Non-finite coordinates cover nothing.
    pub fn covered_area(&self, x: &[f64]) -> f64 {
        if x.iter().any(|v| !v.is_finite()) { return 0.0 }

        let circles = unflatten(x).into_iter()
            .map(|center| MultiPolygon::new(vec![circle_polygon(center, self.radius, self.segments)]));
        let area = self.target.intersection(&union_all(circles)).unsigned_area();
        if area.is_finite() { area } else { 0.0 }
    }

    #[inline]
    pub fn value(&self, x: &[f64]) -> f64 {
        soft_inverse(self.covered_area(x))
    }
}

/// Flatten centers into `[x0, y0, x1, y1, ...]`.
pub fn flatten(centers: &[Coord<f64>]) -> Vec<f64> {
    centers.iter().flat_map(|c| [c.x, c.y]).collect()
}

/// Inverse of [`flatten`]. A trailing odd coordinate is ignored.
pub fn unflatten(x: &[f64]) -> Vec<Coord<f64>> {
    x.chunks_exact(2).map(|pair| Coord { x: pair[0], y: pair[1] }).collect()
}
