use geo::{Area, BoundingRect, Coord, CoordsIter, MultiPolygon, Polygon, Rect};

use crate::error::{PackingError, Result};
use crate::geom::clean;

/// The admissible coordinate frame of a run: an axis-aligned rectangle given by its four corners.
///
/// Shared by every agent. Used to clip Voronoi cells, to bound the repair minimizer and to
/// normalize overflow.
#[derive(Clone, Debug, PartialEq)]
pub struct BoundingBox {
    bottom_left: Coord<f64>,
    bottom_right: Coord<f64>,
    top_right: Coord<f64>,
    top_left: Coord<f64>,
    rect: Rect<f64>,
}

impl BoundingBox {
    /// Build from the four corners (bottom-left, bottom-right, top-right, top-left).
    /// The frame is the axis-aligned extent of the corners and must have positive area.
    pub fn from_corners(
        bottom_left: Coord<f64>,
        bottom_right: Coord<f64>,
        top_right: Coord<f64>,
        top_left: Coord<f64>,
    ) -> Result<Self> {
        let corners = [bottom_left, bottom_right, top_right, top_left];
        if corners.iter().any(|c| !c.x.is_finite() || !c.y.is_finite()) {
            return Err(PackingError::InvalidGeometry("bounding box corners must be finite".into()));
        }

        let min = Coord {
            x: corners.iter().map(|c| c.x).fold(f64::INFINITY, f64::min),
            y: corners.iter().map(|c| c.y).fold(f64::INFINITY, f64::min),
        };
        let max = Coord {
            x: corners.iter().map(|c| c.x).fold(f64::NEG_INFINITY, f64::max),
            y: corners.iter().map(|c| c.y).fold(f64::NEG_INFINITY, f64::max),
        };
        let rect = Rect::new(min, max);
        if rect.width() <= 0.0 || rect.height() <= 0.0 {
            return Err(PackingError::InvalidGeometry(format!(
                "bounding box must have positive area, got {}x{}", rect.width(), rect.height()
            )));
        }

        Ok(Self { bottom_left, bottom_right, top_right, top_left, rect })
    }

    /// Build from the minimum and maximum corners.
    pub fn new(min: Coord<f64>, max: Coord<f64>) -> Result<Self> {
        Self::from_corners(min, Coord { x: max.x, y: min.y }, max, Coord { x: min.x, y: max.y })
    }

    /// The bounds of `region` grown by `margin` on every side.
    pub fn around(region: &Region, margin: f64) -> Result<Self> {
        let bounds = region.bounds();
        Self::new(
            Coord { x: bounds.min().x - margin, y: bounds.min().y - margin },
            Coord { x: bounds.max().x + margin, y: bounds.max().y + margin },
        )
    }

    /// Corners in order bottom-left, bottom-right, top-right, top-left.
    #[inline]
    pub fn corners(&self) -> [Coord<f64>; 4] {
        [self.bottom_left, self.bottom_right, self.top_right, self.top_left]
    }

    #[inline] pub fn rect(&self) -> Rect<f64> { self.rect }

    #[inline] pub fn polygon(&self) -> Polygon<f64> { self.rect.to_polygon() }

    #[inline] pub fn area(&self) -> f64 { self.rect.width() * self.rect.height() }

    /// Per-coordinate `(lower, upper)` bounds for a flattened `[x0, y0, x1, y1, ...]` vector.
    pub fn coordinate_bounds(&self, num_points: usize) -> Vec<(f64, f64)> {
        let (min, max) = (self.rect.min(), self.rect.max());
        (0..num_points)
            .flat_map(|_| [(min.x, max.x), (min.y, max.y)])
            .collect()
    }
}

/// The polygon to be covered. Immutable for a run and shared read-only by every agent.
#[derive(Clone, Debug)]
pub struct Region {
    shape: MultiPolygon<f64>,
    area: f64,
    bounds: Rect<f64>,
}

impl Region {
    /// Normalize `shape` and check that it encloses positive area with finite coordinates.
    pub fn new(shape: impl Into<MultiPolygon<f64>>) -> Result<Self> {
        let shape: MultiPolygon<f64> = shape.into();
        if shape.coords_iter().any(|c| !c.x.is_finite() || !c.y.is_finite()) {
            return Err(PackingError::InvalidGeometry("region coordinates must be finite".into()));
        }

        let shape = clean(shape);
        let area = shape.unsigned_area();
        let bounds = shape.bounding_rect()
            .ok_or_else(|| PackingError::InvalidGeometry("region is empty".into()))?;
        if area <= 0.0 {
            return Err(PackingError::InvalidGeometry("region must have positive area".into()));
        }

        Ok(Self { shape, area, bounds })
    }

    /// Axis-aligned rectangle between `min` and `max`.
    pub fn rectangle(min: Coord<f64>, max: Coord<f64>) -> Result<Self> {
        Self::new(Rect::new(min, max).to_polygon())
    }

    #[inline] pub fn shape(&self) -> &MultiPolygon<f64> { &self.shape }

    #[inline] pub fn area(&self) -> f64 { self.area }

    #[inline] pub fn bounds(&self) -> Rect<f64> { self.bounds }
}
