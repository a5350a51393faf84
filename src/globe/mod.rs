mod land;
mod projection;
mod scene;
mod svg;
mod view;

pub use land::LandOverlay;
pub use scene::{DragPhase, Globe, SatelliteMarker, Scene};
pub use view::ViewMode;
