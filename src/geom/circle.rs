use std::{f64::consts::TAU, fmt};

use geo::{Area, Coord, LineString, MultiPolygon, Polygon, Rect};
use serde::{Deserialize, Serialize};

/// Identifies a circle within one agent.
///
/// Ids are handed out by the owning agent and never reused, so two circles with equal centers are
/// still distinct members. A relocated circle receives a fresh id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CircleId(pub u64);

impl fmt::Display for CircleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CircleId({})", self.0)
    }
}

/// A disk with a fixed radius, approximated by a regular polygon for boolean geometry.
#[derive(Clone, Debug)]
pub struct Circle {
    id: CircleId,
    center: Coord<f64>,
    radius: f64,
    polygon: Polygon<f64>,
}

impl Circle {
    /// Build a circle as a regular `segments`-gon inscribed in the true disk.
    pub fn new(id: CircleId, center: Coord<f64>, radius: f64, segments: usize) -> Self {
        Self { id, center, radius, polygon: circle_polygon(center, radius, segments) }
    }

    #[inline] pub fn id(&self) -> CircleId { self.id }

    #[inline] pub fn center(&self) -> Coord<f64> { self.center }

    #[inline] pub fn radius(&self) -> f64 { self.radius }

    /// The polygonal approximation used for all set operations.
    #[inline] pub fn polygon(&self) -> &Polygon<f64> { &self.polygon }

    /// Area of the polygonal approximation (slightly below `π r²`).
    #[inline] pub fn area(&self) -> f64 { self.polygon.unsigned_area() }

    /// Axis-aligned bounds of the disk.
    pub fn bounds(&self) -> Rect<f64> {
        Rect::new(
            Coord { x: self.center.x - self.radius, y: self.center.y - self.radius },
            Coord { x: self.center.x + self.radius, y: self.center.y + self.radius },
        )
    }

    /// The polygon as a single-member MultiPolygon, the operand type of every boolean op.
    #[inline]
    pub fn to_multi(&self) -> MultiPolygon<f64> {
        MultiPolygon::new(vec![self.polygon.clone()])
    }
}

/// Regular polygon with `segments` vertices on the circle of `radius` around `center`.
/// At least three vertices are always produced.
pub fn circle_polygon(center: Coord<f64>, radius: f64, segments: usize) -> Polygon<f64> {
    let segments = segments.max(3);
    let ring = (0..segments)
        .map(|k| {
            let theta = TAU * k as f64 / segments as f64;
            Coord { x: center.x + radius * theta.cos(), y: center.y + radius * theta.sin() }
        })
        .collect::<Vec<_>>();

    Polygon::new(LineString::new(ring), vec![])
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    #[test]
    fn polygon_area_approaches_disk_area() {
        let circle = Circle::new(CircleId(0), Coord { x: 1.0, y: -2.0 }, 0.5, 100);
        assert!(circle.area() < PI * 0.25);
        assert_relative_eq!(circle.area(), PI * 0.25, max_relative = 1e-2);
    }

    #[test]
    fn polygon_is_closed_with_requested_vertices() {
        let polygon = circle_polygon(Coord { x: 0.0, y: 0.0 }, 1.0, 12);
        // 12 vertices plus the closing coordinate.
        assert_eq!(polygon.exterior().0.len(), 13);
        assert_eq!(polygon.exterior().0.first(), polygon.exterior().0.last());
    }

    #[test]
    fn degenerate_segment_count_is_raised_to_triangle() {
        let polygon = circle_polygon(Coord { x: 0.0, y: 0.0 }, 1.0, 1);
        assert_eq!(polygon.exterior().0.len(), 4);
    }

    #[test]
    fn bounds_enclose_polygon() {
        let circle = Circle::new(CircleId(3), Coord { x: 2.0, y: 3.0 }, 1.5, 32);
        let bounds = circle.bounds();
        for coord in circle.polygon().exterior().coords() {
            assert!(coord.x >= bounds.min().x - 1e-12 && coord.x <= bounds.max().x + 1e-12);
            assert!(coord.y >= bounds.min().y - 1e-12 && coord.y <= bounds.max().y + 1e-12);
        }
    }

    #[test]
    fn display_id() {
        assert_eq!(CircleId(42).to_string(), "CircleId(42)");
    }
}
