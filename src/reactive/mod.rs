//! Observed-state containers used by the trackers.

mod debounce;
mod watched;

pub use debounce::*;
pub use watched::*;
