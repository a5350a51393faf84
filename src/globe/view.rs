use serde::Serialize;
use std::time::Duration;
use tokio::time::Instant;
use utoipa::ToSchema;

use super::projection::Orthographic;
use crate::config::GlobeConfig;
use crate::orbit::GeoPoint;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema, strum_macros::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ViewMode {
    Idle,
    Dragging,
    Transition,
}

#[derive(Debug, Clone)]
enum Motion {
    Idle {
        start: [f64; 3],
        since: Instant,
    },
    Dragging,
    Transition {
        from: [f64; 3],
        to: [f64; 3],
        since: Instant,
        duration: Duration,
    },
}

/// Camera state of the globe: idle spin, user drag, or a fly-to transition.
#[derive(Debug, Clone)]
pub struct GlobeView {
    projection: Orthographic,
    motion: Motion,
    idle_speed_deg_per_ms: f64,
    drag_sensitivity: f64,
    transition: Duration,
}

impl GlobeView {
    pub fn new(config: &GlobeConfig, now: Instant) -> Self {
        Self {
            projection: Orthographic::new(config.idle_start, config.width, config.height),
            motion: Motion::Idle {
                start: config.idle_start,
                since: now,
            },
            idle_speed_deg_per_ms: config.idle_speed_deg_per_ms,
            drag_sensitivity: config.drag_sensitivity,
            transition: config.transition,
        }
    }

    pub fn projection(&self) -> &Orthographic {
        &self.projection
    }

    pub fn rotation(&self) -> [f64; 3] {
        self.projection.rotation()
    }

    pub fn mode(&self) -> ViewMode {
        match self.motion {
            Motion::Idle { .. } => ViewMode::Idle,
            Motion::Dragging => ViewMode::Dragging,
            Motion::Transition { .. } => ViewMode::Transition,
        }
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.projection.fit(width, height);
    }

    /// Spins the globe eastwards from `start`.
    pub fn start_idle(&mut self, start: [f64; 3], now: Instant) {
        self.projection.set_rotation(start);
        self.motion = Motion::Idle {
            start: self.projection.rotation(),
            since: now,
        };
    }

    /// Idle spin from wherever the globe currently points.
    pub fn resume_idle(&mut self, now: Instant) {
        self.start_idle(self.projection.rotation(), now);
    }

    /// Animates towards the rotation that centres `target`.
    pub fn fly_to(&mut self, target: GeoPoint, now: Instant) {
        self.motion = Motion::Transition {
            from: self.projection.rotation(),
            to: [-target.lon_deg, -target.lat_deg, 0.0],
            since: now,
            duration: self.transition,
        };
    }

    pub fn drag_start(&mut self) {
        self.motion = Motion::Dragging;
    }

    /// Rotates by a pointer delta in pixels. Starts a drag if none is active.
    pub fn drag_by(&mut self, dx: f64, dy: f64) {
        if !matches!(self.motion, Motion::Dragging) {
            self.drag_start();
        }
        let k = self.drag_sensitivity / self.projection.scale();
        let [lambda, phi, gamma] = self.projection.rotation();
        self.projection
            .set_rotation([lambda + dx * k, phi - dy * k, gamma]);
    }

    pub fn drag_end(&mut self, now: Instant) {
        if matches!(self.motion, Motion::Dragging) {
            self.resume_idle(now);
        }
    }

    /// Advances the animation to `now`.
    pub fn tick(&mut self, now: Instant) {
        match self.motion {
            Motion::Idle { start, since } => {
                let elapsed_ms = now.saturating_duration_since(since).as_secs_f64() * 1000.0;
                self.projection.set_rotation([
                    start[0] + elapsed_ms * self.idle_speed_deg_per_ms,
                    start[1],
                    start[2],
                ]);
            }
            Motion::Dragging => {}
            Motion::Transition {
                from,
                to,
                since,
                duration,
            } => {
                let elapsed = now.saturating_duration_since(since);
                let t = if duration.is_zero() {
                    1.0
                } else {
                    (elapsed.as_secs_f64() / duration.as_secs_f64()).min(1.0)
                };
                let eased = ease_cubic_in_out(t);
                self.projection.set_rotation([
                    from[0] + (to[0] - from[0]) * eased,
                    from[1] + (to[1] - from[1]) * eased,
                    from[2] + (to[2] - from[2]) * eased,
                ]);
                if t >= 1.0 {
                    self.resume_idle(now);
                }
            }
        }
    }
}

fn ease_cubic_in_out(t: f64) -> f64 {
    let t = t * 2.0;
    if t <= 1.0 {
        t * t * t / 2.0
    } else {
        let t = t - 2.0;
        (t * t * t + 2.0) / 2.0
    }
}
