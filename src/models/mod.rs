//! Data models shared by the table trackers.

mod params;
mod sort;

pub use params::*;
pub use sort::*;
