mod clock;
mod error;
mod orbital_data;
mod parsing;
mod propagation;

pub use clock::{system_clock, Clock};
pub use error::OrbitError;
pub use orbital_data::OrbitalData;
pub use propagation::{GeoPoint, Propagator};
