//! Orthographic globe projection.
//!
//! Rotation follows the usual `[lambda, phi, gamma]` convention in degrees:
//! a longitude shift, then a tilt about the y axis, then a roll about the
//! x axis. Rotating by `[-lon, -lat, 0]` brings `(lon, lat)` to the centre
//! of the disc.

use serde::Serialize;
use std::f64::consts::PI;
use utoipa::ToSchema;

use crate::orbit::GeoPoint;

/// Largest angular gap between consecutive points of a projected line.
const MAX_SEGMENT_DEG: f64 = 2.0;
/// Fraction of the viewport taken by the disc radius, as `min(w, h) / FIT_DIVISOR`.
const FIT_DIVISOR: f64 = 2.2;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Orthographic {
    rotation: [f64; 3],
    scale: f64,
    translate: (f64, f64),
}

impl Orthographic {
    pub fn new(rotation: [f64; 3], width: f64, height: f64) -> Self {
        let mut projection = Self {
            rotation: [0.0; 3],
            scale: 1.0,
            translate: (0.0, 0.0),
        };
        projection.set_rotation(rotation);
        projection.fit(width, height);
        projection
    }

    pub fn fit(&mut self, width: f64, height: f64) {
        self.scale = width.min(height) / FIT_DIVISOR;
        self.translate = (width / 2.0, height / 2.0);
    }

    /// Angles are reduced modulo 360 (keeping their sign).
    pub fn set_rotation(&mut self, rotation: [f64; 3]) {
        self.rotation = rotation.map(|a| a % 360.0);
    }

    pub fn rotation(&self) -> [f64; 3] {
        self.rotation
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn translate(&self) -> (f64, f64) {
        self.translate
    }

    /// Rotated spherical coordinates in radians.
    fn rotate(&self, lon_deg: f64, lat_deg: f64) -> (f64, f64) {
        let [d_lambda, d_phi, d_gamma] = self.rotation.map(f64::to_radians);

        let mut lambda = lon_deg.to_radians() + d_lambda;
        if lambda > PI {
            lambda -= 2.0 * PI;
        } else if lambda < -PI {
            lambda += 2.0 * PI;
        }
        let phi = lat_deg.to_radians();

        let (sin_dp, cos_dp) = d_phi.sin_cos();
        let (sin_dg, cos_dg) = d_gamma.sin_cos();
        let cos_phi = phi.cos();
        let x = lambda.cos() * cos_phi;
        let y = lambda.sin() * cos_phi;
        let z = phi.sin();
        let k = z * cos_dp + x * sin_dp;

        (
            (y * cos_dg - k * sin_dg).atan2(x * cos_dp - z * sin_dp),
            (k * cos_dg + y * sin_dg).clamp(-1.0, 1.0).asin(),
        )
    }

    /// Screen position, regardless of which hemisphere the point is on.
    pub fn project(&self, lon_deg: f64, lat_deg: f64) -> ScreenPoint {
        let (lambda, phi) = self.rotate(lon_deg, lat_deg);
        ScreenPoint {
            x: self.translate.0 + self.scale * phi.cos() * lambda.sin(),
            y: self.translate.1 - self.scale * phi.sin(),
        }
    }

    /// True when the point lies on the hemisphere facing the viewer.
    pub fn is_visible(&self, lon_deg: f64, lat_deg: f64) -> bool {
        let (lambda, phi) = self.rotate(lon_deg, lat_deg);
        lambda.cos() * phi.cos() > 0.0
    }

    pub fn project_visible(&self, point: GeoPoint) -> Option<ScreenPoint> {
        self.is_visible(point.lon_deg, point.lat_deg)
            .then(|| self.project(point.lon_deg, point.lat_deg))
    }

    /// Projects a polyline whose edges are great-circle arcs.
    ///
    /// Edges are densified so no step exceeds two degrees, and the result is
    /// split into separate runs wherever the line passes behind the globe.
    pub fn project_line(&self, points: &[GeoPoint]) -> Vec<Vec<ScreenPoint>> {
        let mut runs = Vec::new();
        let mut current = Vec::new();

        let mut emit = |p: GeoPoint, current: &mut Vec<ScreenPoint>| match self.project_visible(p) {
            Some(sp) => current.push(sp),
            None => {
                if current.len() > 1 {
                    runs.push(std::mem::take(current));
                } else {
                    current.clear();
                }
            }
        };

        for (i, &p) in points.iter().enumerate() {
            if i > 0 {
                for q in densify(points[i - 1], p) {
                    emit(q, &mut current);
                }
            }
            emit(p, &mut current);
        }
        if current.len() > 1 {
            runs.push(current);
        }
        runs
    }
}

fn to_unit(p: GeoPoint) -> [f64; 3] {
    let (lon, lat) = (p.lon_deg.to_radians(), p.lat_deg.to_radians());
    [lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin()]
}

fn from_unit(v: [f64; 3]) -> GeoPoint {
    GeoPoint {
        lon_deg: v[1].atan2(v[0]).to_degrees(),
        lat_deg: v[2].clamp(-1.0, 1.0).asin().to_degrees(),
    }
}

/// Angular distance in degrees.
pub fn angular_distance(a: GeoPoint, b: GeoPoint) -> f64 {
    let (va, vb) = (to_unit(a), to_unit(b));
    let dot = va[0] * vb[0] + va[1] * vb[1] + va[2] * vb[2];
    dot.clamp(-1.0, 1.0).acos().to_degrees()
}

/// Intermediate points strictly between `a` and `b` along the great circle.
fn densify(a: GeoPoint, b: GeoPoint) -> Vec<GeoPoint> {
    let d = angular_distance(a, b);
    let steps = (d / MAX_SEGMENT_DEG).ceil() as usize;
    if steps < 2 {
        return Vec::new();
    }

    let omega = d.to_radians();
    let sin_omega = omega.sin();
    if sin_omega.abs() < 1e-12 {
        return Vec::new();
    }
    let (va, vb) = (to_unit(a), to_unit(b));

    (1..steps)
        .map(|i| {
            let t = i as f64 / steps as f64;
            let wa = ((1.0 - t) * omega).sin() / sin_omega;
            let wb = (t * omega).sin() / sin_omega;
            from_unit([
                wa * va[0] + wb * vb[0],
                wa * va[1] + wb * vb[1],
                wa * va[2] + wb * vb[2],
            ])
        })
        .collect()
}
