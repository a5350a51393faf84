use chrono::{DateTime, Utc};
use serde::Serialize;
use std::f64::consts::PI;
use utoipa::ToSchema;

use super::propagation::Propagator;
use crate::orbit::OrbitError;

const MINUTES_PER_DAY: f64 = 1440.0;

/// Scalar orbit summary shown in the info panel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct OrbitalData {
    pub altitude_km: f64,
    pub velocity_km_s: f64,
    pub period_min: f64,
    pub inclination_deg: f64,
}

impl Propagator {
    pub fn orbital_data(&self, timestamp: DateTime<Utc>) -> Result<OrbitalData, OrbitError> {
        let state = self.state_at(timestamp)?;
        let elements = self.elements();

        Ok(OrbitalData {
            altitude_km: state.height_km,
            velocity_km_s: state.speed_km_s(),
            period_min: 2.0 * PI / brouwer_mean_motion(elements)?,
            inclination_deg: elements.inclination,
        })
    }
}

/// Brouwer mean motion in rad/min, recovered by the library from the Kozai mean motion.
fn brouwer_mean_motion(elements: &sgp4::Elements) -> Result<f64, OrbitError> {
    let orbit = sgp4::Orbit::from_kozai_elements(
        &sgp4::WGS72,
        elements.inclination.to_radians(),
        elements.right_ascension.to_radians(),
        elements.eccentricity,
        elements.argument_of_perigee.to_radians(),
        elements.mean_anomaly.to_radians(),
        elements.mean_motion * 2.0 * PI / MINUTES_PER_DAY,
    )?;
    Ok(orbit.mean_motion)
}
