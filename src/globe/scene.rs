use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex as StdMutex};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use utoipa::ToSchema;

use super::land::LandOverlay;
use super::svg;
use super::view::{GlobeView, ViewMode};
use crate::catalog::TleData;
use crate::config::GlobeConfig;
use crate::orbit::{Clock, GeoPoint, Propagator};

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SatelliteMarker {
    pub name: String,
    pub position: GeoPoint,
    pub height_km: f64,
    pub visible: bool,
}

/// What the globe currently shows.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Scene {
    pub width: f64,
    pub height: f64,
    pub rotation: [f64; 3],
    pub scale: f64,
    pub mode: ViewMode,
    pub satellite: Option<SatelliteMarker>,
    pub orbit_path: Vec<GeoPoint>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DragPhase {
    Start,
    Move,
    End,
}

struct Shared {
    view: GlobeView,
    scene: Scene,
}

impl Shared {
    fn sync_view(&mut self) {
        let projection = self.view.projection();
        self.scene.rotation = projection.rotation();
        self.scene.scale = projection.scale();
        self.scene.mode = self.view.mode();
        if let Some(marker) = self.scene.satellite.as_mut() {
            marker.visible = projection.is_visible(marker.position.lon_deg, marker.position.lat_deg);
        }
    }
}

struct Target {
    name: String,
    propagator: Propagator,
}

enum Aim {
    /// Idle spin from the configured start rotation.
    Home,
    /// Idle spin from the current rotation.
    Current,
    Satellite(Target),
}

struct WorkerHandle {
    stop_tx: oneshot::Sender<()>,
    join: JoinHandle<()>,
}

/// The rotating globe and its frame timer.
///
/// One worker task drives the animation; [`Globe::retarget`] stops it and
/// starts a new one for the next satellite (or for idle spinning).
pub struct Globe {
    config: GlobeConfig,
    land: Arc<LandOverlay>,
    clock: Clock,
    shared: Arc<StdMutex<Shared>>,
    worker: Option<WorkerHandle>,
}

impl Globe {
    pub fn new(config: GlobeConfig, land: LandOverlay, clock: Clock) -> Self {
        let view = GlobeView::new(&config, Instant::now());
        let scene = Scene {
            width: config.width,
            height: config.height,
            rotation: view.rotation(),
            scale: view.projection().scale(),
            mode: view.mode(),
            satellite: None,
            orbit_path: Vec::new(),
            updated_at: clock(),
        };

        Self {
            config,
            land: Arc::new(land),
            clock,
            shared: Arc::new(StdMutex::new(Shared { view, scene })),
            worker: None,
        }
    }

    #[cfg(test)]
    pub fn is_running(&self) -> bool {
        self.worker.is_some()
    }

    pub fn scene(&self) -> Scene {
        self.shared.lock().unwrap().scene.clone()
    }

    pub fn render_svg(&self) -> String {
        let locked = self.shared.lock().unwrap();
        svg::render(locked.view.projection(), &locked.scene, &self.land)
    }

    pub fn drag(&self, phase: DragPhase, dx: f64, dy: f64) {
        let mut locked = self.shared.lock().unwrap();
        match phase {
            DragPhase::Start => locked.view.drag_start(),
            DragPhase::Move => locked.view.drag_by(dx, dy),
            DragPhase::End => locked.view.drag_end(Instant::now()),
        }
        locked.sync_view();
    }

    pub fn resize(&self, width: f64, height: f64) {
        let mut locked = self.shared.lock().unwrap();
        locked.view.resize(width, height);
        locked.scene.width = width;
        locked.scene.height = height;
        locked.sync_view();
    }

    pub async fn stop(&mut self) {
        if let Some(worker) = self.worker.take() {
            let _ = worker.stop_tx.send(());
            let _ = worker.join.await;
        }
    }

    /// Points the globe at a new satellite, or back to idle spinning with `None`.
    pub async fn retarget(&mut self, tle: Option<TleData>) {
        self.stop().await;

        let aim = match tle {
            None => Aim::Home,
            Some(tle) => match Propagator::from_tle(&tle) {
                Ok(propagator) => Aim::Satellite(Target {
                    name: tle.name,
                    propagator,
                }),
                Err(e) => {
                    log::warn!("cannot visualize {}: {}", tle.name, e);
                    Aim::Current
                }
            },
        };

        let now = Instant::now();
        let target = {
            let mut locked = self.shared.lock().unwrap();
            locked.scene.satellite = None;
            locked.scene.orbit_path.clear();
            let target = match aim {
                Aim::Home => {
                    locked.view.start_idle(self.config.idle_start, now);
                    None
                }
                Aim::Current => {
                    locked.view.resume_idle(now);
                    None
                }
                Aim::Satellite(t) => {
                    match t.propagator.position_at((self.clock)()) {
                        Ok(position) => locked.view.fly_to(position, now),
                        Err(e) => {
                            log::warn!("no current position for {}: {}", t.name, e);
                            locked.view.resume_idle(now);
                        }
                    }
                    log::info!("globe tracking {}", t.name);
                    Some(t)
                }
            };
            locked.sync_view();
            target
        };

        self.spawn_worker(target);
    }

    fn spawn_worker(&mut self, target: Option<Target>) {
        let (stop_tx, stop_rx) = oneshot::channel();
        let join = tokio::spawn(run_frame_loop(
            self.shared.clone(),
            self.config.clone(),
            self.clock.clone(),
            target,
            stop_rx,
        ));
        self.worker = Some(WorkerHandle { stop_tx, join });
    }
}

async fn run_frame_loop(
    shared: Arc<StdMutex<Shared>>,
    config: GlobeConfig,
    clock: Clock,
    target: Option<Target>,
    mut stop_rx: oneshot::Receiver<()>,
) {
    let mut interval = tokio::time::interval(config.frame_interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let past = ChronoDuration::minutes(config.track_past_min.into());
    let future = ChronoDuration::minutes(config.track_future_min.into());
    let step = ChronoDuration::minutes(config.track_step_min.into());

    loop {
        let should_stop = tokio::select! {
            _ = interval.tick() => false,
            _ = &mut stop_rx => true,
        };
        if should_stop {
            return;
        }

        let now_utc = clock();
        let frame = target.as_ref().map(|t| {
            let marker = t.propagator.state_at(now_utc).ok().map(|state| SatelliteMarker {
                name: t.name.clone(),
                position: state.position,
                height_km: state.height_km,
                visible: false,
            });
            let track = t.propagator.ground_track(now_utc, past, future, step);
            (marker, track)
        });

        let mut locked = shared.lock().unwrap();
        locked.view.tick(Instant::now());
        if let Some((marker, track)) = frame {
            locked.scene.satellite = marker;
            locked.scene.orbit_path = track;
        }
        locked.scene.updated_at = now_utc;
        locked.sync_view();
    }
}

impl Drop for Globe {
    fn drop(&mut self) {
        if let Some(worker) = self.worker.take() {
            let _ = worker.stop_tx.send(());
        }
    }
}
