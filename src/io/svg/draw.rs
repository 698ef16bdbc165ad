use std::io::Write;

use anyhow::{anyhow, Result};
use geo::{Coord, CoordsIter, LineString, MultiPolygon, Polygon};

use crate::{agent::Agent, geom::Region};

use super::{color, SvgWriter};

/// Rendering options for an agent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SvgOptions {
    /// Width of the image in pixels; the height follows the aspect ratio of the bounding box.
    pub width: f64,
    /// Blank border in pixels.
    pub margin: f64,
    /// Fill covered area, overflow and self-overlap. Otherwise only circle outlines are drawn.
    pub fill: bool,
    /// Underlay the Voronoi cells of the agent's cached centers.
    pub voronoi: bool,
}

impl Default for SvgOptions {
    fn default() -> Self {
        Self { width: 600.0, margin: 10.0, fill: true, voronoi: false }
    }
}

/// Frame coordinates -> SVG coordinates (Y down).
pub(crate) type Projection = dyn Fn(&Coord<f64>) -> (f64, f64);

/// Draw `agent` against `region` into `writer`.
pub(crate) fn draw_agent<W: Write>(writer: &mut SvgWriter<W>, agent: &Agent, region: &Region, options: &SvgOptions) -> Result<()> {
    let bounds = agent.bounding_box().rect();
    if !(options.width > 2.0 * options.margin) {
        return Err(anyhow!("[io::svg] width {} leaves no room inside margin {}", options.width, options.margin));
    }

    let margin = options.margin;
    let scale = (options.width - 2.0 * margin) / bounds.width();
    let height = bounds.height() * scale + 2.0 * margin;

    let project = move |coord: &Coord<f64>| -> (f64, f64) {
        let x = margin + (coord.x - bounds.min().x) * scale;
        let y = margin + (bounds.max().y - coord.y) * scale;
        (x, y)
    };

    writer.write_header(options.width, height, margin, scale, &bounds)?;
    writer.write_styles()?;

    let frame = MultiPolygon::new(vec![agent.bounding_box().polygon()]);
    draw_fill(writer, &frame, color::FRAME, 0.25, &project)?;

    if options.voronoi {
        for (i, cell) in agent.voronoi_cells().iter().enumerate() {
            if cell.exterior().0.is_empty() { continue }
            writeln!(writer, r#"<path class="cell" style="fill:{}" d="{}"/>"#, color::cell_color(i), polygon_to_path(cell, &project))?;
        }
    }

    if options.fill {
        let intersections = agent.intersections(region);
        draw_fill(writer, &intersections.region.overflow, color::OVERFLOW, 1.0, &project)?;
        draw_fill(writer, &intersections.region.covered, color::COVERED, 1.0, &project)?;
        draw_fill(writer, &intersections.self_overlap.geometry, color::SELF_OVERLAP, 1.0, &project)?;
    } else {
        for circle in agent.circles() {
            writeln!(writer, r#"<path class="circle" d="{}"/>"#, polygon_to_path(circle.polygon(), &project))?;
        }
    }

    writeln!(writer, r#"<path class="region" fill-rule="evenodd" d="{}"/>"#, multipolygon_to_path(region.shape(), &project))?;

    for circle in agent.circles() {
        let (cx, cy) = project(&circle.center());
        writeln!(writer, r#"<circle class="center" cx="{cx:.3}" cy="{cy:.3}" r="1.5"/>"#)?;
    }

    writer.write_footer()?;
    writer.flush()?;
    Ok(())
}

fn draw_fill(writer: &mut impl Write, shape: &MultiPolygon<f64>, fill: &str, opacity: f64, project: &Projection) -> Result<()> {
    if shape.0.is_empty() { return Ok(()) }
    writeln!(
        writer,
        r#"<path fill-rule="evenodd" style="fill:{fill};fill-opacity:{opacity};stroke:none" d="{}"/>"#,
        multipolygon_to_path(shape, project),
    )?;
    Ok(())
}

/// Build a compact SVG path string for a MultiPolygon (exteriors + holes).
fn multipolygon_to_path(shape: &MultiPolygon<f64>, project: &Projection) -> String {
    shape.0.iter().map(|polygon| polygon_to_path(polygon, project)).collect()
}

fn polygon_to_path(polygon: &Polygon<f64>, project: &Projection) -> String {
    let mut out = ring_to_path(polygon.exterior(), project);
    for interior in polygon.interiors() {
        out.push_str(&ring_to_path(interior, project));
    }
    out
}

/// Build an SVG subpath "M x,y L x,y ... Z" for a ring.
fn ring_to_path(ring: &LineString<f64>, project: &Projection) -> String {
    let mut out = String::new();

    let mut coords = ring.coords_iter().map(|coord| project(&coord));
    if let Some((x, y)) = coords.next() {
        out.push_str(&format!(" M{x:.3},{y:.3}"));
        for (x, y) in coords {
            out.push_str(&format!(" L{x:.3},{y:.3}"));
        }
        out.push('Z');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ring_path_is_projected_and_closed() {
        let ring = LineString::from(vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 0.0)]);
        let project = |c: &Coord<f64>| (c.x * 10.0, 10.0 - c.y * 10.0);
        assert_eq!(
            ring_to_path(&ring, &project),
            " M0.000,10.000 L10.000,10.000 L10.000,0.000 L0.000,10.000Z",
        );
    }

    #[test]
    fn empty_ring_has_no_path() {
        let project = |c: &Coord<f64>| (c.x, c.y);
        assert!(ring_to_path(&LineString::new(vec![]), &project).is_empty());
    }
}
