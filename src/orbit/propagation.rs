use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use sgp4::{Constants, Elements};
use utoipa::ToSchema;

use super::parsing::parse_tle_lines;
use crate::catalog::TleData;
use crate::orbit::OrbitError;

// WGS-84
const WGS84_A_KM: f64 = 6378.137;
const WGS84_E2: f64 = 0.00669437999014;
const GEODETIC_ITERATIONS: usize = 20;

/// A sub-satellite point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct GeoPoint {
    pub lon_deg: f64,
    pub lat_deg: f64,
}

/// Geodetic position and inertial velocity at one instant.
#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
pub struct SatelliteState {
    pub timestamp: DateTime<Utc>,
    pub position: GeoPoint,
    pub height_km: f64,
    pub velocity_teme_km_s: [f64; 3],
}

impl SatelliteState {
    pub fn speed_km_s(&self) -> f64 {
        let [x, y, z] = self.velocity_teme_km_s;
        (x * x + y * y + z * z).sqrt()
    }
}

/// Parsed element set ready for SGP4 propagation.
pub struct Propagator {
    elements: Elements,
    constants: Constants,
}

impl Propagator {
    pub fn from_tle(tle: &TleData) -> Result<Self, OrbitError> {
        Self::from_lines(Some(tle.name.clone()), &tle.line1, &tle.line2)
    }

    pub fn from_text(tle: &str) -> Result<Self, OrbitError> {
        let (name, line1, line2) = parse_tle_lines(tle)?;
        Self::from_lines(name, &line1, &line2)
    }

    fn from_lines(name: Option<String>, line1: &str, line2: &str) -> Result<Self, OrbitError> {
        let elements = Elements::from_tle(name, line1.as_bytes(), line2.as_bytes())?;
        let constants = Constants::from_elements(&elements)?;
        Ok(Self {
            elements,
            constants,
        })
    }

    pub fn elements(&self) -> &Elements {
        &self.elements
    }

    pub fn state_at(&self, timestamp: DateTime<Utc>) -> Result<SatelliteState, OrbitError> {
        let minutes = self
            .elements
            .datetime_to_minutes_since_epoch(&timestamp.naive_utc())
            .map_err(|e| OrbitError::Propagation(e.to_string()))?;

        let prediction = self
            .constants
            .propagate(minutes)
            .map_err(|e| OrbitError::Propagation(e.to_string()))?;

        let sidereal = sgp4::iau_epoch_to_sidereal_time(sgp4::julian_years_since_j2000(
            &timestamp.naive_utc(),
        ));

        let ecef = teme_to_ecef_position(prediction.position, sidereal);
        let (position, height_km) = ecef_to_geodetic(ecef);

        Ok(SatelliteState {
            timestamp,
            position,
            height_km,
            velocity_teme_km_s: prediction.velocity,
        })
    }

    pub fn position_at(&self, timestamp: DateTime<Utc>) -> Result<GeoPoint, OrbitError> {
        self.state_at(timestamp).map(|s| s.position)
    }

    /// Sub-satellite points from `now - past` to `now + future`, every `step`.
    ///
    /// Samples that fail to propagate are left out of the track.
    pub fn ground_track(
        &self,
        now: DateTime<Utc>,
        past: Duration,
        future: Duration,
        step: Duration,
    ) -> Vec<GeoPoint> {
        let mut points = Vec::new();
        if step <= Duration::zero() {
            return points;
        }

        let end = now + future;
        let mut cursor = now - past;
        while cursor <= end {
            match self.position_at(cursor) {
                Ok(p) => points.push(p),
                Err(e) => log::debug!("skipping track sample at {}: {}", cursor, e),
            }
            cursor += step;
        }
        points
    }
}

pub fn teme_to_ecef_position(pos_teme: [f64; 3], gmst: f64) -> [f64; 3] {
    let cos_gmst = gmst.cos();
    let sin_gmst = gmst.sin();
    [
        pos_teme[0] * cos_gmst + pos_teme[1] * sin_gmst,
        -pos_teme[0] * sin_gmst + pos_teme[1] * cos_gmst,
        pos_teme[2],
    ]
}

/// Iterative ECEF to geodetic conversion on the WGS-84 ellipsoid.
pub fn ecef_to_geodetic(ecef: [f64; 3]) -> (GeoPoint, f64) {
    let [x, y, z] = ecef;
    let r = (x * x + y * y).sqrt();
    let lon = y.atan2(x);

    let mut lat = z.atan2(r);
    let mut c = 1.0;
    for _ in 0..GEODETIC_ITERATIONS {
        let sin_lat = lat.sin();
        c = 1.0 / (1.0 - WGS84_E2 * sin_lat * sin_lat).sqrt();
        lat = (z + WGS84_A_KM * c * WGS84_E2 * sin_lat).atan2(r);
    }
    let height = r / lat.cos() - WGS84_A_KM * c;

    (
        GeoPoint {
            lon_deg: wrap_longitude(lon.to_degrees()),
            lat_deg: lat.to_degrees(),
        },
        height,
    )
}

pub fn wrap_longitude(lon_deg: f64) -> f64 {
    let wrapped = (lon_deg + 180.0).rem_euclid(360.0) - 180.0;
    if wrapped == -180.0 && lon_deg > 0.0 {
        180.0
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{iss_epoch, iss_tle, ISS_LINE1, ISS_LINE2};
    use approx::assert_relative_eq;

    #[test]
    fn iss_state_near_epoch_is_plausible() {
        let propagator = Propagator::from_tle(&iss_tle()).unwrap();
        let state = propagator.state_at(iss_epoch()).unwrap();

        assert!((380.0..460.0).contains(&state.height_km), "{}", state.height_km);
        assert!((7.5..7.8).contains(&state.speed_km_s()), "{}", state.speed_km_s());
        assert!(state.position.lat_deg.abs() <= 52.0);
        assert!((-180.0..=180.0).contains(&state.position.lon_deg));
    }

    #[test]
    fn text_and_structured_input_agree() {
        let from_text =
            Propagator::from_text(&format!("ISS (ZARYA)\n{ISS_LINE1}\n{ISS_LINE2}")).unwrap();
        let from_tle = Propagator::from_tle(&iss_tle()).unwrap();

        let a = from_text.position_at(iss_epoch()).unwrap();
        let b = from_tle.position_at(iss_epoch()).unwrap();
        assert_relative_eq!(a.lon_deg, b.lon_deg);
        assert_relative_eq!(a.lat_deg, b.lat_deg);
    }

    #[test]
    fn corrupted_line_is_rejected() {
        let mut tle = iss_tle();
        tle.line2 = tle.line2.replace("51.6461", "5x.6461");
        assert!(Propagator::from_tle(&tle).is_err());
    }

    #[test]
    fn ground_track_covers_window() {
        let propagator = Propagator::from_tle(&iss_tle()).unwrap();
        let track = propagator.ground_track(
            iss_epoch(),
            Duration::minutes(30),
            Duration::minutes(90),
            Duration::minutes(2),
        );
        assert_eq!(track.len(), 61);

        let now = propagator.position_at(iss_epoch()).unwrap();
        assert_relative_eq!(track[15].lon_deg, now.lon_deg, epsilon = 1e-9);
        assert_relative_eq!(track[15].lat_deg, now.lat_deg, epsilon = 1e-9);
    }

    #[test]
    fn geodetic_conversion_on_axes() {
        let (p, h) = ecef_to_geodetic([WGS84_A_KM + 400.0, 0.0, 0.0]);
        assert_relative_eq!(p.lon_deg, 0.0);
        assert_relative_eq!(p.lat_deg, 0.0, epsilon = 1e-9);
        assert_relative_eq!(h, 400.0, epsilon = 1e-6);

        let (p, _) = ecef_to_geodetic([0.0, 7000.0, 0.0]);
        assert_relative_eq!(p.lon_deg, 90.0);
    }

    #[test]
    fn longitudes_wrap_into_range() {
        assert_relative_eq!(wrap_longitude(190.0), -170.0);
        assert_relative_eq!(wrap_longitude(-190.0), 170.0);
        assert_relative_eq!(wrap_longitude(180.0), 180.0);
        assert_relative_eq!(wrap_longitude(-180.0), -180.0);
    }
}
