//! Table configuration.

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{TableError, TableResult};
use crate::models::SelectionId;
use crate::trackers::check_page_count;

/// Default number of rows per page.
pub const DEFAULT_PAGE_SIZE: u32 = 25;

/// Default delay before a typed search term is applied, in milliseconds.
pub const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 500;

/// Command-line arguments for the session replay tool.
#[derive(Parser, Debug, Clone)]
#[command(name = "tablestate-rs")]
#[command(about = "Replays a table session and prints the fetches it issues")]
#[command(version)]
pub struct Args {
    /// Session script (JSON lines). Reads stdin when omitted.
    #[arg(long, short = 'f')]
    pub script: Option<PathBuf>,

    /// Total number of items in the table.
    #[arg(long, default_value_t = 0)]
    pub total: u64,

    /// Initial page size.
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    pub page_size: u32,

    /// Search debounce delay in milliseconds.
    #[arg(long, default_value_t = DEFAULT_SEARCH_DEBOUNCE_MS)]
    pub debounce_ms: u64,

    /// Initially selected context (venue, tenant).
    #[arg(long)]
    pub selection: Option<String>,

    /// Disable pagination.
    #[arg(long)]
    pub no_pagination: bool,

    /// Disable sorting.
    #[arg(long)]
    pub no_sorting: bool,

    /// Disable search filters.
    #[arg(long)]
    pub no_filters: bool,

    /// Sleep for real on `wait` events instead of advancing a virtual clock.
    #[arg(long)]
    pub realtime: bool,

    /// Enable debug logging.
    #[arg(long, short = 'd')]
    pub debug: bool,

    /// Enable silent mode (errors only).
    #[arg(long, short = 's')]
    pub silent: bool,
}

/// Table configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Total number of items in the table.
    pub total: u64,
    /// Initial page size. Must be non-zero.
    pub page_size: u32,
    /// Delay before a search term is applied.
    pub search_debounce: Duration,
    /// Context required before any fetch goes out.
    pub selection_id: Option<SelectionId>,
    pub has_pagination: bool,
    pub has_sorting: bool,
    pub has_filters: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            total: 0,
            page_size: DEFAULT_PAGE_SIZE,
            search_debounce: Duration::from_millis(DEFAULT_SEARCH_DEBOUNCE_MS),
            selection_id: None,
            has_pagination: true,
            has_sorting: true,
            has_filters: true,
        }
    }
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        Self {
            total: args.total,
            page_size: args.page_size,
            search_debounce: Duration::from_millis(args.debounce_ms),
            selection_id: args.selection.map(SelectionId::from),
            has_pagination: !args.no_pagination,
            has_sorting: !args.no_sorting,
            has_filters: !args.no_filters,
        }
    }
}

impl Config {
    /// Checks the preconditions the trackers rely on.
    pub fn validate(&self) -> TableResult<()> {
        if self.page_size == 0 {
            return Err(TableError::InvalidPageSize);
        }
        if self.has_pagination {
            check_page_count(self.total, self.page_size)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_args() {
        let args = Args::parse_from([
            "tablestate-rs",
            "--total",
            "120",
            "--page-size",
            "10",
            "--selection",
            "venue-9",
            "--no-sorting",
        ]);
        let config = Config::from(args);
        assert_eq!(config.total, 120);
        assert_eq!(config.page_size, 10);
        assert_eq!(config.search_debounce, Duration::from_millis(500));
        assert_eq!(config.selection_id, Some(SelectionId::from("venue-9")));
        assert!(config.has_pagination);
        assert!(!config.has_sorting);
        assert!(config.has_filters);
    }

    #[test]
    fn test_zero_page_size_is_invalid() {
        let config = Config {
            page_size: 0,
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(TableError::InvalidPageSize)));
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_oversized_total_is_invalid() {
        let args = Args::parse_from([
            "tablestate-rs",
            "--total",
            "1000000000000",
            "--page-size",
            "1",
        ]);
        let config = Config::from(args);
        assert!(matches!(
            config.validate(),
            Err(TableError::TooManyPages { .. })
        ));

        let config = Config {
            has_pagination: false,
            ..config
        };
        assert!(config.validate().is_ok());
    }
}
