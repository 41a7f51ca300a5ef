//! Per-page fetch coverage.

use tracing::debug;

use crate::error::{TableError, TableResult};

/// Coverage value of a fully fetched page.
pub const FULL: f64 = 1.0;

/// Tolerance used when accumulating fractional coverage.
const EPSILON: f64 = 1e-9;

/// Largest number of pages a coverage array is allowed to hold.
pub const MAX_TRACKED_PAGES: u64 = 1_000_000;

/// Rejects `total`/`limit` combinations whose coverage array would exceed
/// [`MAX_TRACKED_PAGES`].
pub fn check_page_count(total: u64, limit: u32) -> TableResult<()> {
    let pages = total.div_ceil(u64::from(limit.max(1)));
    if pages > MAX_TRACKED_PAGES {
        return Err(TableError::TooManyPages {
            pages,
            max: MAX_TRACKED_PAGES,
        });
    }
    Ok(())
}

/// Number of coverage entries for `total` items at `limit` items per page.
///
/// There is always at least one entry: the first page exists even when the
/// table is empty. `limit` must be non-zero.
pub fn page_count(total: u64, limit: u32) -> usize {
    debug_assert!(limit > 0, "page size must be non-zero");
    let pages = total.div_ceil(u64::from(limit.max(1))).max(1);
    usize::try_from(pages).unwrap_or(usize::MAX)
}

/// Fraction of each page that has already been fetched.
///
/// `1` means the page is cached and must not be fetched again, `0` means
/// nothing is known. Fractions only appear after a page-size change, when
/// items fetched under the old size cover part of a new page.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PageCoverage {
    pages: Vec<f64>,
}

impl PageCoverage {
    /// Builds coverage for a fresh load: every page unknown except the first,
    /// which the initial load always fetches.
    pub fn new(total: u64, limit: u32) -> Self {
        let mut coverage = Self::zeroed(total, limit);
        coverage.pages[0] = FULL;
        coverage
    }

    fn zeroed(total: u64, limit: u32) -> Self {
        Self {
            pages: vec![0.0; page_count(total, limit)],
        }
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.pages
    }

    /// Maps a 1-based page to its entry, if the page is inside the table.
    fn index(&self, page: i64) -> Option<usize> {
        let index = usize::try_from(page.checked_sub(1)?).ok()?;
        (index < self.pages.len()).then_some(index)
    }

    /// Returns the coverage of a 1-based page.
    pub fn get(&self, page: i64) -> Option<f64> {
        self.index(page).map(|i| self.pages[i])
    }

    /// Returns whether a 1-based page is fully fetched.
    pub fn is_fetched(&self, page: i64) -> bool {
        self.get(page).is_some_and(|value| value >= FULL)
    }

    /// Marks a 1-based page as fully fetched. Returns false for pages outside
    /// the table, which are not tracked.
    pub fn mark_fetched(&mut self, page: i64) -> bool {
        match self.index(page) {
            Some(i) => {
                self.pages[i] = FULL;
                true
            }
            None => false,
        }
    }

    /// Number of fully fetched pages.
    pub fn fetched_pages(&self) -> usize {
        self.pages.iter().filter(|&&value| value >= FULL).count()
    }

    /// Recomputes coverage for a new page size.
    ///
    /// Every fully fetched page under `old_limit` spans `old_limit / new_limit`
    /// pages of the new size, starting at `i * ratio`. That span is credited to
    /// the new pages it overlaps, capped at one page each. Partially fetched
    /// pages carry no credit and credit past the last new page is dropped.
    ///
    /// Credit follows the actual item offsets: a span that starts mid-page
    /// tops up that page before moving on, and a page is only full once every
    /// one of its items came from some fully fetched old page.
    pub fn redistribute(&self, old_limit: u32, new_limit: u32, total: u64) -> Self {
        let mut next = Self::zeroed(total, new_limit);
        let ratio = f64::from(old_limit) / f64::from(new_limit.max(1));

        for (i, _) in self.pages.iter().enumerate().filter(|&(_, &v)| v >= FULL) {
            let start = i as f64 * ratio;
            let end = (i + 1) as f64 * ratio;

            for j in (start.floor() as usize)..(end.ceil() as usize) {
                let overlap = end.min((j + 1) as f64) - start.max(j as f64);
                if overlap <= EPSILON {
                    continue;
                }
                let Some(slot) = next.pages.get_mut(j) else {
                    break;
                };
                let value = (*slot + overlap).min(FULL);
                *slot = if FULL - value <= EPSILON { FULL } else { value };
            }
        }

        debug!(
            old_limit,
            new_limit,
            pages = next.len(),
            fetched = next.fetched_pages(),
            "page coverage redistributed"
        );
        next
    }
}

impl From<Vec<f64>> for PageCoverage {
    fn from(pages: Vec<f64>) -> Self {
        Self {
            pages: pages.into_iter().map(|v| v.clamp(0.0, FULL)).collect(),
        }
    }
}
