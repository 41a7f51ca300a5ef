//! Page, page size, and fetch coverage bookkeeping.

use tracing::{debug, trace};

use super::coverage::{check_page_count, PageCoverage};
use crate::error::{TableError, TableResult};
use crate::models::FetchParamsPatch;
use crate::reactive::Watched;

/// Tracks the current page and page size and decides which pages need a fetch.
///
/// Relies on the external resource caching what it has fetched: a page whose
/// coverage is full is served from that cache and never requested again until
/// the coverage is rebuilt.
#[derive(Debug, Clone)]
pub struct PaginationTracker {
    page: Watched<i64>,
    limit: Watched<u32>,
    previous_limit: u32,
    total: Watched<u64>,
    coverage: PageCoverage,
}

impl PaginationTracker {
    pub fn new(total: u64, limit: u32) -> TableResult<Self> {
        if limit == 0 {
            return Err(TableError::InvalidPageSize);
        }
        check_page_count(total, limit)?;
        Ok(Self {
            page: Watched::new(1),
            limit: Watched::new(limit),
            previous_limit: limit,
            total: Watched::new(total),
            coverage: PageCoverage::new(total, limit),
        })
    }

    /// Finishes the first evaluation. Later changes run their effects.
    pub fn mount(&mut self) {
        self.page.mount();
        self.limit.mount();
        self.total.mount();
    }

    pub fn page(&self) -> i64 {
        *self.page.get()
    }

    pub fn limit(&self) -> u32 {
        *self.limit.get()
    }

    /// The page size in effect before the most recent page-size change.
    pub fn previous_limit(&self) -> u32 {
        self.previous_limit
    }

    pub fn total(&self) -> u64 {
        *self.total.get()
    }

    pub fn coverage(&self) -> &PageCoverage {
        &self.coverage
    }

    /// Moves to `page`. Returns the fetch to issue when the page is not cached.
    ///
    /// Pages are not bounded: callers that need a floor or ceiling clamp before
    /// calling. Pages outside the coverage array are always fetched.
    pub fn set_page(&mut self, page: i64) -> Option<FetchParamsPatch> {
        if !self.page.set(page) {
            return None;
        }
        if self.coverage.is_fetched(page) {
            trace!(page, "page already fetched");
            return None;
        }
        self.coverage.mark_fetched(page);
        Some(FetchParamsPatch::page(page, self.limit()))
    }

    pub fn next_page(&mut self) -> Option<FetchParamsPatch> {
        self.set_page(self.page().saturating_add(1))
    }

    pub fn previous_page(&mut self) -> Option<FetchParamsPatch> {
        self.set_page(self.page().saturating_sub(1))
    }

    /// Changes the page size.
    ///
    /// Coverage is carried over to the new page boundaries, the page goes back
    /// to 1 and the first page is always fetched again.
    pub fn set_limit(&mut self, limit: u32) -> TableResult<Option<FetchParamsPatch>> {
        if limit == 0 {
            return Err(TableError::InvalidPageSize);
        }
        if limit == self.limit() {
            return Ok(None);
        }
        check_page_count(self.total(), limit)?;
        self.limit.set(limit);

        self.coverage = self
            .coverage
            .redistribute(self.previous_limit, limit, self.total());
        self.previous_limit = limit;
        self.page.set(1);
        self.coverage.mark_fetched(1);

        debug!(limit, "page size changed");
        Ok(Some(FetchParamsPatch::page(1, limit)))
    }

    /// Updates the item count. A change rebuilds the coverage from scratch.
    pub fn set_total(&mut self, total: u64) -> TableResult<bool> {
        if total == self.total() {
            return Ok(false);
        }
        check_page_count(total, self.limit())?;
        if self.total.set(total) {
            self.reset_coverage();
        }
        Ok(true)
    }

    /// Forgets everything fetched so far except the first page.
    pub fn reset_coverage(&mut self) {
        self.coverage = PageCoverage::new(self.total(), self.limit());
        debug!(
            total = self.total(),
            limit = self.limit(),
            pages = self.coverage.len(),
            "page coverage rebuilt"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trackers::MAX_TRACKED_PAGES;

    fn mounted(total: u64, limit: u32) -> PaginationTracker {
        let mut tracker = PaginationTracker::new(total, limit).unwrap();
        tracker.mount();
        tracker
    }

    #[test]
    fn test_defaults() {
        let tracker = mounted(0, 25);
        assert_eq!(tracker.page(), 1);
        assert_eq!(tracker.limit(), 25);
        assert_eq!(tracker.previous_limit(), 25);
        assert_eq!(tracker.coverage().as_slice(), &[1.0]);
    }

    #[test]
    fn test_zero_page_size_is_rejected() {
        assert!(matches!(
            PaginationTracker::new(10, 0),
            Err(TableError::InvalidPageSize)
        ));
        let mut tracker = mounted(10, 5);
        assert!(matches!(
            tracker.set_limit(0),
            Err(TableError::InvalidPageSize)
        ));
        assert_eq!(tracker.limit(), 5);
    }

    #[test]
    fn test_next_fetches_once_per_page() {
        let mut tracker = mounted(100, 25);
        assert_eq!(tracker.next_page(), Some(FetchParamsPatch::page(2, 25)));
        assert_eq!(tracker.previous_page(), None);
        assert_eq!(tracker.next_page(), None);
        assert_eq!(tracker.page(), 2);
    }

    #[test]
    fn test_same_page_is_not_a_change() {
        let mut tracker = mounted(100, 25);
        tracker.coverage = PageCoverage::from(vec![0.0; 4]);
        assert_eq!(tracker.set_page(1), None);
    }

    #[test]
    fn test_changes_before_mount_do_not_fetch() {
        let mut tracker = PaginationTracker::new(100, 25).unwrap();
        assert_eq!(tracker.set_page(3), None);
        assert_eq!(tracker.page(), 3);
    }

    #[test]
    fn test_limit_change_keeps_previous_limit() {
        let mut tracker = mounted(100, 25);
        tracker.set_limit(10).unwrap();
        assert_eq!(tracker.previous_limit(), 10);
        assert_eq!(tracker.set_limit(10).unwrap(), None);
    }

    #[test]
    fn test_total_change_rebuilds_coverage() {
        let mut tracker = mounted(50, 25);
        tracker.next_page();
        assert_eq!(tracker.coverage().fetched_pages(), 2);

        assert!(tracker.set_total(120).unwrap());
        assert_eq!(tracker.coverage().as_slice(), &[1.0, 0.0, 0.0, 0.0, 0.0]);
        assert!(!tracker.set_total(120).unwrap());
    }

    #[test]
    fn test_page_steps_saturate_at_integer_bounds() {
        let mut tracker = mounted(100, 25);
        assert!(tracker.set_page(i64::MAX).is_some());
        assert_eq!(tracker.next_page(), None);
        assert_eq!(tracker.page(), i64::MAX);

        assert!(tracker.set_page(i64::MIN).is_some());
        assert_eq!(tracker.previous_page(), None);
        assert_eq!(tracker.page(), i64::MIN);
    }

    #[test]
    fn test_untrackable_page_counts_are_rejected() {
        let total = MAX_TRACKED_PAGES + 1;
        assert!(matches!(
            PaginationTracker::new(total, 1),
            Err(TableError::TooManyPages { .. })
        ));

        let mut tracker = mounted(100, 25);
        assert!(matches!(
            tracker.set_total(1_000_000_000_000),
            Err(TableError::TooManyPages { .. })
        ));
        assert_eq!(tracker.total(), 100);

        tracker.set_total(MAX_TRACKED_PAGES * 2).unwrap();
        assert!(matches!(
            tracker.set_limit(1),
            Err(TableError::TooManyPages { .. })
        ));
        assert_eq!(tracker.limit(), 25);
        assert_eq!(tracker.coverage().len() as u64, MAX_TRACKED_PAGES * 2 / 25);
    }
}
