pub mod ai;
pub mod error;
pub mod globe;
pub mod search;
pub mod selection;
