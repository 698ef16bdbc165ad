use std::{fs, path::Path};

use anyhow::{anyhow, bail, Context, Result};
use geo::{Coord, LineString, MultiPolygon, Polygon};
use serde_json::{json, Value};

use crate::{agent::Agent, geom::{union_all, Region}};

/// Read the region to pack from a GeoJSON file.
pub fn read_region_geojson(path: &Path) -> Result<Region> {
    let bytes = fs::read(path)
        .with_context(|| format!("[io::geojson] Failed to read {}", path.display()))?;
    region_from_geojson_bytes(&bytes)
        .with_context(|| format!("[io::geojson] Invalid region in {}", path.display()))
}

/// Parse a region from GeoJSON bytes.
///
/// Accepts a bare Polygon or MultiPolygon geometry, a Feature or a FeatureCollection. All polygonal
/// geometries found are unioned; other geometry types are ignored.
pub fn region_from_geojson_bytes(bytes: &[u8]) -> Result<Region> {
    let value: Value = serde_json::from_slice(bytes).context("[io::geojson] Failed to parse GeoJSON bytes")?;

    let mut shapes = Vec::new();
    collect_polygons(&value, &mut shapes)?;
    if shapes.is_empty() { bail!("[io::geojson] No Polygon or MultiPolygon geometry found") }

    Ok(Region::new(union_all(shapes))?)
}

fn collect_polygons(value: &Value, shapes: &mut Vec<MultiPolygon<f64>>) -> Result<()> {
    match value["type"].as_str() {
        Some("FeatureCollection") => {
            for feature in value["features"].as_array().into_iter().flatten() {
                collect_polygons(feature, shapes)?;
            }
        }
        Some("Feature") => collect_polygons(&value["geometry"], shapes)?,
        Some("GeometryCollection") => {
            for geometry in value["geometries"].as_array().into_iter().flatten() {
                collect_polygons(geometry, shapes)?;
            }
        }
        Some("Polygon") => {
            let rings = value["coordinates"].as_array()
                .ok_or_else(|| anyhow!("Invalid Polygon: coordinates must be an array"))?;
            shapes.push(MultiPolygon::new(vec![parse_polygon(rings)?]));
        }
        Some("MultiPolygon") => {
            let polygons = value["coordinates"].as_array()
                .ok_or_else(|| anyhow!("Invalid MultiPolygon: coordinates must be an array"))?;
            shapes.push(MultiPolygon::new(
                polygons.iter()
                    .map(|rings| rings.as_array()
                        .ok_or_else(|| anyhow!("Invalid MultiPolygon: polygon must be an array"))
                        .and_then(|rings| parse_polygon(rings)))
                    .collect::<Result<Vec<_>>>()?,
            ));
        }
        _ => {}
    }
    Ok(())
}

/// Parse GeoJSON polygon coordinates `[exterior, hole, hole, ...]`.
fn parse_polygon(rings: &[Value]) -> Result<Polygon<f64>> {
    let mut rings = rings.iter().map(|ring| {
        ring.as_array()
            .ok_or_else(|| anyhow!("Invalid Polygon: ring must be an array"))
            .and_then(|coords| parse_ring(coords))
    });

    let exterior = rings.next().ok_or_else(|| anyhow!("Invalid Polygon: missing exterior ring"))??;
    let interiors = rings.collect::<Result<Vec<_>>>()?;
    Ok(Polygon::new(exterior, interiors))
}

/// Parse a ring `[[x, y], [x, y], ...]`; the ring is closed if it is not already.
fn parse_ring(coords: &[Value]) -> Result<LineString<f64>> {
    let mut points = coords.iter()
        .map(|pair| {
            let x = pair[0].as_f64().ok_or_else(|| anyhow!("Invalid coordinate: x must be a number"))?;
            let y = pair[1].as_f64().ok_or_else(|| anyhow!("Invalid coordinate: y must be a number"))?;
            Ok(Coord { x, y })
        })
        .collect::<Result<Vec<_>>>()?;

    if points.len() < 3 { bail!("Invalid ring: expected at least 3 positions, got {}", points.len()) }
    if points.first() != points.last() {
        points.push(points[0]);
    }

    Ok(LineString(points))
}

/// An agent as a FeatureCollection: one Polygon feature per circle with its center and radius.
pub fn agent_to_geojson(agent: &Agent) -> Value {
    let features = agent.circles().iter().map(|circle| {
        let ring = circle.polygon().exterior().coords()
            .map(|c| vec![c.x, c.y])
            .collect::<Vec<_>>();
        json!({
            "type": "Feature",
            "geometry": {
                "type": "Polygon",
                "coordinates": [ring],
            },
            "properties": {
                "id": circle.id().0,
                "center": [circle.center().x, circle.center().y],
                "radius": circle.radius(),
            },
        })
    }).collect::<Vec<_>>();

    json!({
        "type": "FeatureCollection",
        "features": features,
        "properties": {
            "fitness": agent.is_scored().then_some(agent.fitness()),
            "length": agent.circles().len(),
        },
    })
}

/// Write an agent's circles as GeoJSON.
pub fn write_agent_geojson(agent: &Agent, path: &Path) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(&agent_to_geojson(agent))
        .context("[io::geojson] Failed to serialize GeoJSON")?;
    fs::write(path, bytes).with_context(|| format!("[io::geojson] Failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::BoundingBox;
    use approx::assert_relative_eq;

    #[test]
    fn reads_bare_polygon() {
        let region = region_from_geojson_bytes(br#"{
            "type": "Polygon",
            "coordinates": [[[0, 0], [4, 0], [4, 4], [0, 4], [0, 0]]]
        }"#).unwrap();
        assert_relative_eq!(region.area(), 16.0, epsilon = 1e-9);
    }

    #[test]
    fn reads_feature_collection_with_hole_and_closes_rings() {
        let region = region_from_geojson_bytes(br#"{
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "properties": {}, "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[0, 0], [4, 0], [4, 4], [0, 4]], [[1, 1], [2, 1], [2, 2], [1, 2]]]
                }},
                {"type": "Feature", "properties": {}, "geometry": {"type": "Point", "coordinates": [9, 9]}},
                {"type": "Feature", "properties": {}, "geometry": {
                    "type": "MultiPolygon",
                    "coordinates": [[[[10, 10], [11, 10], [11, 11], [10, 11], [10, 10]]]]
                }}
            ]
        }"#).unwrap();
        assert_relative_eq!(region.area(), 16.0 - 1.0 + 1.0, epsilon = 1e-9);
    }

    #[test]
    fn rejects_files_without_polygons() {
        assert!(region_from_geojson_bytes(br#"{"type": "Point", "coordinates": [0, 0]}"#).is_err());
        assert!(region_from_geojson_bytes(b"not json").is_err());
    }

    #[test]
    fn agent_features_carry_centers() {
        let frame = BoundingBox::new(Coord { x: 0.0, y: 0.0 }, Coord { x: 4.0, y: 4.0 }).unwrap();
        let agent = Agent::from_centers(frame, 0.5, 16, [Coord { x: 1.0, y: 2.0 }]);
        let value = agent_to_geojson(&agent);
        assert_eq!(value["features"].as_array().unwrap().len(), 1);
        assert_eq!(value["features"][0]["properties"]["center"], json!([1.0, 2.0]));
        assert_eq!(value["properties"]["fitness"], Value::Null);
    }
}
