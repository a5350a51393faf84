use std::fmt::Write;

use super::land::LandOverlay;
use super::projection::{Orthographic, ScreenPoint};
use super::scene::Scene;
use crate::orbit::GeoPoint;

const OCEAN_FILL: &str = "#0f172a";
const LIMB_STROKE: &str = "#38bdf8";
const LAND_STROKE: &str = "#475569";
const GRATICULE_STROKE: &str = "#334155";
const ORBIT_STROKE: &str = "#f59e0b";

const GRATICULE_STEP_DEG: f64 = 10.0;
const GRATICULE_SAMPLE_DEG: f64 = 2.5;

pub fn render(projection: &Orthographic, scene: &Scene, land: &LandOverlay) -> String {
    let (cx, cy) = projection.translate();
    let mut svg = String::new();

    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = scene.width,
        h = scene.height
    );
    let _ = write!(
        svg,
        r#"<circle class="sphere" cx="{cx:.1}" cy="{cy:.1}" r="{r:.1}" fill="{OCEAN_FILL}" stroke="{LIMB_STROKE}" stroke-width="0.5"/>"#,
        r = projection.scale()
    );

    if !land.is_empty() {
        let d = path_data(land.lines.iter().flat_map(|l| projection.project_line(l)));
        let _ = write!(
            svg,
            r#"<path class="land" d="{d}" fill="none" stroke="{LAND_STROKE}" stroke-width="0.5"/>"#
        );
    }

    let d = path_data(graticule().iter().flat_map(|l| projection.project_line(l)));
    let _ = write!(
        svg,
        r#"<path class="graticule" d="{d}" fill="none" stroke="{GRATICULE_STROKE}" stroke-width="0.5"/>"#
    );

    if !scene.orbit_path.is_empty() {
        let d = path_data(projection.project_line(&scene.orbit_path));
        let _ = write!(
            svg,
            r#"<path class="orbit" d="{d}" fill="none" stroke="{ORBIT_STROKE}" stroke-width="1.5" stroke-opacity="0.8" stroke-dasharray="4 4"/>"#
        );
    }

    if let Some(marker) = &scene.satellite {
        if let Some(p) = projection.project_visible(marker.position) {
            let _ = write!(
                svg,
                r#"<g class="satellite" transform="translate({:.1}, {:.1})"><circle r="8" fill="rgba(245, 158, 11, 0.3)"/><circle r="3" fill="{ORBIT_STROKE}"/></g>"#,
                p.x, p.y
            );
        }
    }

    svg.push_str("</svg>");
    svg
}

fn path_data(runs: impl IntoIterator<Item = Vec<ScreenPoint>>) -> String {
    let mut d = String::new();
    for run in runs {
        for (i, p) in run.iter().enumerate() {
            let cmd = if i == 0 { 'M' } else { 'L' };
            let _ = write!(d, "{}{:.1},{:.1}", cmd, p.x, p.y);
        }
    }
    d
}

/// Meridians and parallels every ten degrees.
fn graticule() -> Vec<Vec<GeoPoint>> {
    let mut lines = Vec::new();
    let steps = |from: f64, to: f64, step: f64| {
        let n = ((to - from) / step).round() as usize;
        (0..=n).map(move |i| from + i as f64 * step)
    };

    for lon in steps(-180.0, 170.0, GRATICULE_STEP_DEG) {
        lines.push(
            steps(-90.0, 90.0, GRATICULE_SAMPLE_DEG)
                .map(|lat| GeoPoint { lon_deg: lon, lat_deg: lat })
                .collect(),
        );
    }
    for lat in steps(-80.0, 80.0, GRATICULE_STEP_DEG) {
        lines.push(
            steps(-180.0, 180.0, GRATICULE_SAMPLE_DEG)
                .map(|lon| GeoPoint { lon_deg: lon, lat_deg: lat })
                .collect(),
        );
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::globe::scene::SatelliteMarker;
    use crate::globe::ViewMode;
    use chrono::Utc;

    fn scene(marker: Option<GeoPoint>, orbit_path: Vec<GeoPoint>) -> Scene {
        Scene {
            width: 440.0,
            height: 440.0,
            rotation: [0.0; 3],
            scale: 200.0,
            mode: ViewMode::Idle,
            satellite: marker.map(|position| SatelliteMarker {
                name: "TEST".into(),
                position,
                height_km: 400.0,
                visible: true,
            }),
            orbit_path,
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn empty_scene_has_sphere_and_graticule_only() {
        let projection = Orthographic::new([0.0; 3], 440.0, 440.0);
        let svg = render(&projection, &scene(None, Vec::new()), &LandOverlay::default());

        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains(r#"class="sphere" cx="220.0" cy="220.0" r="200.0""#));
        assert!(svg.contains(r#"class="graticule""#));
        assert!(!svg.contains(r#"class="orbit""#));
        assert!(!svg.contains(r#"class="satellite""#));
        assert!(!svg.contains(r#"class="land""#));
    }

    #[test]
    fn visible_marker_and_orbit_are_drawn() {
        let projection = Orthographic::new([0.0; 3], 440.0, 440.0);
        let path = vec![
            GeoPoint { lon_deg: -10.0, lat_deg: 0.0 },
            GeoPoint { lon_deg: 10.0, lat_deg: 0.0 },
        ];
        let svg = render(
            &projection,
            &scene(Some(GeoPoint { lon_deg: 0.0, lat_deg: 0.0 }), path),
            &LandOverlay::default(),
        );

        assert!(svg.contains(r#"transform="translate(220.0, 220.0)""#));
        assert!(svg.contains(r#"stroke-dasharray="4 4""#));
    }

    #[test]
    fn marker_behind_globe_is_hidden() {
        let projection = Orthographic::new([0.0; 3], 440.0, 440.0);
        let svg = render(
            &projection,
            &scene(Some(GeoPoint { lon_deg: 180.0, lat_deg: 0.0 }), Vec::new()),
            &LandOverlay::default(),
        );
        assert!(!svg.contains(r#"class="satellite""#));
    }

    #[test]
    fn graticule_line_counts() {
        let lines = graticule();
        assert_eq!(lines.len(), 36 + 17);
        assert_eq!(lines[0].len(), 73);
    }
}
