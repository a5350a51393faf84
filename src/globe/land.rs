use serde_json::Value;
use std::path::Path;
use thiserror::Error;

use crate::orbit::GeoPoint;

#[derive(Debug, Error)]
pub enum LandError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported GeoJSON: {0}")]
    Format(String),
}

/// Coastline/border outlines drawn under the graticule.
#[derive(Debug, Clone, Default)]
pub struct LandOverlay {
    pub lines: Vec<Vec<GeoPoint>>,
}

impl LandOverlay {
    pub fn from_file(path: &Path) -> Result<Self, LandError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_geojson(&json)
    }

    /// Accepts a FeatureCollection, a Feature or a bare geometry. Polygon rings
    /// are kept as closed outlines.
    pub fn from_geojson(json: &str) -> Result<Self, LandError> {
        let root: Value = serde_json::from_str(json)?;
        let mut lines = Vec::new();

        match root["type"].as_str() {
            Some("FeatureCollection") => {
                let features = root["features"]
                    .as_array()
                    .ok_or_else(|| LandError::Format("no features".into()))?;
                for feature in features {
                    collect_geometry(&feature["geometry"], &mut lines);
                }
            }
            Some("Feature") => collect_geometry(&root["geometry"], &mut lines),
            Some(_) => collect_geometry(&root, &mut lines),
            None => return Err(LandError::Format("missing type".into())),
        }

        Ok(Self { lines })
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

fn collect_geometry(geometry: &Value, out: &mut Vec<Vec<GeoPoint>>) {
    let coords = &geometry["coordinates"];
    match geometry["type"].as_str() {
        Some("LineString") => out.extend(extract_line(coords)),
        Some("MultiLineString") | Some("Polygon") => {
            out.extend(coords.as_array().into_iter().flatten().filter_map(extract_line))
        }
        Some("MultiPolygon") => out.extend(
            coords
                .as_array()
                .into_iter()
                .flatten()
                .filter_map(Value::as_array)
                .flatten()
                .filter_map(extract_line),
        ),
        Some("GeometryCollection") => {
            for g in geometry["geometries"].as_array().into_iter().flatten() {
                collect_geometry(g, out);
            }
        }
        _ => {}
    }
}

fn extract_line(arr: &Value) -> Option<Vec<GeoPoint>> {
    let points: Vec<GeoPoint> = arr
        .as_array()?
        .iter()
        .filter_map(|p| {
            let a = p.as_array()?;
            Some(GeoPoint {
                lon_deg: a.first()?.as_f64()?,
                lat_deg: a.get(1)?.as_f64()?,
            })
        })
        .collect();
    if points.len() < 2 {
        None
    } else {
        Some(points)
    }
}
