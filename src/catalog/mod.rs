mod client;
mod debounce;
mod error;
mod types;

pub use client::{is_searchable, CatalogClient};
pub use debounce::SearchDebouncer;
pub use error::CatalogError;
pub use types::{Satellite, TleData};
