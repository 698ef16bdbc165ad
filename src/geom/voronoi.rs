use std::collections::HashMap;

use geo::{Coord, LineString, Polygon};
use spade::{DelaunayTriangulation, Point2, Triangulation, handles::FixedVertexHandle};

use crate::geom::BoundingBox;

/// Bounded Voronoi tessellation of `centers`, clipped to `frame`.
///
/// Returns one cell per center, in input order. With zero or one center the whole frame is a single
/// cell, so an empty center set still yields that one cell. Two centers split the frame along
/// their perpendicular bisector. Repeated centers share the cell of their first occurrence, and
/// later copies receive an empty polygon.
pub fn tessellate(centers: &[Coord<f64>], frame: &BoundingBox) -> Vec<Polygon<f64>> {
    let ring = frame.polygon().exterior().0[..4].to_vec();
    if centers.len() <= 1 {
        return vec![frame.polygon()];
    }

    // Map every distinct site to the position of its first occurrence.
    let mut first = HashMap::<(u64, u64), usize>::with_capacity(centers.len());
    let owners = centers.iter().enumerate()
        .map(|(i, c)| *first.entry((c.x.to_bits(), c.y.to_bits())).or_insert(i))
        .collect::<Vec<_>>();
    let sites = owners.iter().enumerate()
        .filter(|&(i, &owner)| i == owner)
        .map(|(i, _)| i)
        .collect::<Vec<_>>();

    let neighbours = delaunay_neighbours(centers, &sites)
        .unwrap_or_else(|| sites.iter().map(|&i| sites.iter().copied().filter(|&j| j != i).collect()).collect());

    let mut cells = vec![empty_polygon(); centers.len()];
    for (site, others) in sites.iter().zip(neighbours) {
        let cell = others.iter().fold(ring.clone(), |cell, &other| {
            clip_half_plane(&cell, centers[*site], centers[other])
        });
        if cell.len() >= 3 {
            cells[*site] = Polygon::new(LineString::new(cell), vec![]);
        }
    }

    cells
}

/// Delaunay neighbours of each site, as positions into `centers`.
/// `None` if the triangulation rejects a coordinate.
fn delaunay_neighbours(centers: &[Coord<f64>], sites: &[usize]) -> Option<Vec<Vec<usize>>> {
    let mut triangulation = DelaunayTriangulation::<Point2<f64>>::new();
    let mut handles = HashMap::<FixedVertexHandle, usize>::with_capacity(sites.len());
    let mut fixed = Vec::with_capacity(sites.len());
    for &site in sites {
        let handle = triangulation.insert(Point2::new(centers[site].x, centers[site].y)).ok()?;
        handles.insert(handle, site);
        fixed.push(handle);
    }

    Some(fixed.into_iter()
        .map(|handle| {
            let vertex = triangulation.vertex(handle);
            let mut others = vertex.out_edges()
                .filter_map(|edge| handles.get(&edge.to().fix()).copied())
                .collect::<Vec<_>>();
            others.sort_unstable();
            others.dedup();
            others
        })
        .collect())
}

/// Sutherland–Hodgman clip of an open ring to the half-plane of points at least as close to `site`
/// as to `other`.
fn clip_half_plane(ring: &[Coord<f64>], site: Coord<f64>, other: Coord<f64>) -> Vec<Coord<f64>> {
    if ring.is_empty() { return Vec::new() }

    let normal = other - site;
    let midpoint = (site + other) / 2.0;
    let side = |p: Coord<f64>| (p.x - midpoint.x) * normal.x + (p.y - midpoint.y) * normal.y;

    let mut clipped = Vec::with_capacity(ring.len() + 1);
    for (i, &current) in ring.iter().enumerate() {
        let previous = ring[(i + ring.len() - 1) % ring.len()];
        let (s_cur, s_prev) = (side(current), side(previous));

        if s_cur <= 0.0 {
            if s_prev > 0.0 {
                clipped.push(crossing(previous, current, s_prev, s_cur));
            }
            clipped.push(current);
        } else if s_prev <= 0.0 {
            clipped.push(crossing(previous, current, s_prev, s_cur));
        }
    }

    clipped
}

#[inline]
fn crossing(a: Coord<f64>, b: Coord<f64>, s_a: f64, s_b: f64) -> Coord<f64> {
    let t = s_a / (s_a - s_b);
    a + (b - a) * t
}

#[inline]
fn empty_polygon() -> Polygon<f64> {
    Polygon::new(LineString::new(Vec::new()), vec![])
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use geo::{Area, Contains, Point};

    fn frame() -> BoundingBox {
        BoundingBox::new(Coord { x: -2.0, y: -2.0 }, Coord { x: 2.0, y: 2.0 }).unwrap()
    }

    #[test]
    fn zero_and_one_center() {
        let cells = tessellate(&[], &frame());
        assert_eq!(cells.len(), 1);
        assert_relative_eq!(cells[0].unsigned_area(), 16.0);

        let cells = tessellate(&[Coord { x: 0.5, y: 0.5 }], &frame());
        assert_eq!(cells.len(), 1);
        assert_relative_eq!(cells[0].unsigned_area(), 16.0);
    }

    #[test]
    fn two_centers_are_split_by_bisector() {
        let centers = [Coord { x: -1.0, y: 0.0 }, Coord { x: 1.0, y: 1.0 }];
        let cells = tessellate(&centers, &frame());
        assert_eq!(cells.len(), 2);
        for (cell, center) in cells.iter().zip(centers) {
            assert!(cell.contains(&Point::from(center)));
        }
        assert_relative_eq!(cells.iter().map(|c| c.unsigned_area()).sum::<f64>(), 16.0, epsilon = 1e-9);
    }

    #[test]
    fn cells_partition_the_frame() {
        let centers = [
            Coord { x: -1.0, y: -1.0 },
            Coord { x: 1.2, y: -0.7 },
            Coord { x: 0.1, y: 1.3 },
            Coord { x: 0.0, y: 0.0 },
            Coord { x: -1.5, y: 1.5 },
        ];
        let cells = tessellate(&centers, &frame());
        assert_relative_eq!(cells.iter().map(|c| c.unsigned_area()).sum::<f64>(), 16.0, epsilon = 1e-9);
        for (cell, center) in cells.iter().zip(centers) {
            assert!(cell.contains(&Point::from(center)));
        }
    }

    #[test]
    fn collinear_centers_form_strips() {
        let centers = [Coord { x: -1.0, y: 0.0 }, Coord { x: 0.0, y: 0.0 }, Coord { x: 1.0, y: 0.0 }];
        let cells = tessellate(&centers, &frame());
        assert_relative_eq!(cells[0].unsigned_area(), 1.5 * 4.0, epsilon = 1e-9);
        assert_relative_eq!(cells[1].unsigned_area(), 1.0 * 4.0, epsilon = 1e-9);
        assert_relative_eq!(cells[2].unsigned_area(), 1.5 * 4.0, epsilon = 1e-9);
    }

    #[test]
    fn repeated_centers_get_empty_cells() {
        let centers = [
            Coord { x: -1.0, y: 0.0 },
            Coord { x: 1.0, y: 0.0 },
            Coord { x: 1.0, y: 0.0 },
            Coord { x: 0.0, y: 1.0 },
        ];
        let cells = tessellate(&centers, &frame());
        assert_eq!(cells.len(), 4);
        assert_eq!(cells[2].unsigned_area(), 0.0);
        assert_relative_eq!(cells.iter().map(|c| c.unsigned_area()).sum::<f64>(), 16.0, epsilon = 1e-9);
    }
}
