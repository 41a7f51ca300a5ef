//! Tablestate-rs: state management for paginated, sortable, filterable tables.
//!
//! The crate tracks which pages of a table have already been fetched, so
//! that navigating back to them does not hit the network again, and keeps
//! that bookkeeping right when the page size changes. Sorting and a debounced
//! search filter are wired on top, each resetting the table and fetching the
//! first page when they change.
//!
//! Fetching itself is left to a [`TableResource`] supplied by the caller.
//!
//! # Example
//!
//! ```no_run
//! use tablestate_rs::{FetchParams, FnResource, TableStateBuilder};
//!
//! let resource = FnResource::new(|params: &FetchParams| println!("{params:?}"), || {});
//! let mut table = TableStateBuilder::new()
//!     .total(120)
//!     .selection("venue-1")
//!     .build(resource)
//!     .unwrap();
//!
//! table.load();
//! table.next_page().unwrap();
//! table.set_limit(10).unwrap();
//! ```

pub mod config;
pub mod error;
pub mod models;
pub mod reactive;
pub mod replay;
pub mod resource;
pub mod table;
pub mod trackers;

// Re-exports for convenience
pub use config::{Args, Config, DEFAULT_PAGE_SIZE, DEFAULT_SEARCH_DEBOUNCE_MS};
pub use error::{Feature, TableError, TableResult};
pub use models::{FetchParams, FetchParamsPatch, SelectionId, SortDirection, SortDirective};
pub use reactive::{Debouncer, Watched};
pub use replay::{load_events, parse_events, read_events, JsonLinesResource, Session, SessionEvent};
pub use resource::{FnResource, TableResource};
pub use table::{TableState, TableStateBuilder};
pub use trackers::{FilterTracker, PageCoverage, PaginationTracker, SortTracker};
