//! Table trackers: self-contained state units composed by [`crate::TableState`].
//!
//! Trackers never call out on their own. Mutators report the effect the
//! owner has to run (usually a fetch patch), which keeps every side effect in
//! one place and in a fixed order.

mod coverage;
mod filters;
mod pagination;
mod sorting;

pub use coverage::*;
pub use filters::*;
pub use pagination::*;
pub use sorting::*;
