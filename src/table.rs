//! Table state orchestration: pagination, sorting and filters over one resource.

use std::time::Duration;
use tokio::time::{self, Instant};
use tracing::{debug, trace};

use crate::config::Config;
use crate::error::{Feature, TableError, TableResult};
use crate::models::{FetchParams, FetchParamsPatch, SelectionId, SortDirective};
use crate::reactive::Watched;
use crate::resource::TableResource;
use crate::trackers::{FilterTracker, PageCoverage, PaginationTracker, SortTracker};

/// State of one paginated, sortable, filterable table.
///
/// Owns the canonical fetch parameters and the enabled trackers, and runs
/// their effects against the external resource in a fixed order: resource
/// reset, page reset, fetch. All mutation goes through `&mut self`, so effects
/// never interleave.
pub struct TableState<R> {
    resource: R,
    params: FetchParams,
    selection: Watched<Option<SelectionId>>,
    pagination: Option<PaginationTracker>,
    sorting: Option<SortTracker>,
    filters: Option<FilterTracker>,
}

impl<R: TableResource> TableState<R> {
    /// Builds and mounts the table. No fetch is issued: the first page is
    /// expected to come from the caller's initial load (see [`Self::load`]).
    pub fn new(config: Config, resource: R) -> TableResult<Self> {
        config.validate()?;

        let pagination = if config.has_pagination {
            Some(PaginationTracker::new(config.total, config.page_size)?)
        } else {
            None
        };
        let sorting = config.has_sorting.then(SortTracker::new);
        let filters = config
            .has_filters
            .then(|| FilterTracker::new(config.search_debounce));

        let mut state = Self {
            resource,
            params: FetchParams::new(config.page_size, config.selection_id.clone()),
            selection: Watched::new(config.selection_id),
            pagination,
            sorting,
            filters,
        };
        state.mount();
        Ok(state)
    }

    fn mount(&mut self) {
        if let Some(pagination) = &mut self.pagination {
            pagination.mount();
        }
        if let Some(sorting) = &mut self.sorting {
            sorting.mount();
        }
        if let Some(filters) = &mut self.filters {
            filters.mount();
        }
        self.selection.mount();
        debug!(
            pagination = self.pagination.is_some(),
            sorting = self.sorting.is_some(),
            filters = self.filters.is_some(),
            "table state mounted"
        );
    }

    /// Cancels pending timers and hands the resource back.
    pub fn unmount(mut self) -> R {
        if let Some(filters) = &mut self.filters {
            filters.cancel();
        }
        debug!("table state unmounted");
        self.resource
    }

    pub fn resource(&self) -> &R {
        &self.resource
    }

    pub fn resource_mut(&mut self) -> &mut R {
        &mut self.resource
    }

    /// The canonical parameters the next fetch is built from.
    pub fn fetch_params(&self) -> &FetchParams {
        &self.params
    }

    pub fn selection_id(&self) -> Option<&SelectionId> {
        self.selection.get().as_ref()
    }

    /// Merges `patch` into the fetch parameters and fetches, provided a
    /// selection is present. Without one only the merge happens.
    pub fn fetch(&mut self, patch: FetchParamsPatch) {
        self.params.merge(patch);
        if self.selection.get().is_some() {
            debug!(page = self.params.page, limit = self.params.limit, "fetching table rows");
            self.resource.fetch(&self.params);
        } else {
            trace!("no selection yet, fetch deferred");
        }
    }

    /// Issues the initial load with the current parameters.
    pub fn load(&mut self) {
        self.fetch(FetchParamsPatch::default());
    }

    /// Switches the selected context.
    ///
    /// The cached resource state is cleared and the page goes back to 1. No
    /// fetch is issued here unless the first page is not cached.
    pub fn set_selection_id(&mut self, selection_id: Option<SelectionId>) {
        if !self.selection.set(selection_id.clone()) {
            return;
        }
        debug!(selection = ?selection_id, "selection changed");
        self.params.selection_id = selection_id;
        self.resource.reset();
        self.reset_page();
    }

    fn pagination_mut(&mut self) -> TableResult<&mut PaginationTracker> {
        self.pagination
            .as_mut()
            .ok_or(TableError::Disabled(Feature::Pagination))
    }

    fn run_page_fetch(&mut self, patch: Option<FetchParamsPatch>) {
        if let Some(patch) = patch {
            self.fetch(patch);
        }
    }

    /// Current page, if pagination is enabled.
    pub fn page(&self) -> Option<i64> {
        self.pagination.as_ref().map(PaginationTracker::page)
    }

    /// Current page size, if pagination is enabled.
    pub fn limit(&self) -> Option<u32> {
        self.pagination.as_ref().map(PaginationTracker::limit)
    }

    pub fn total(&self) -> Option<u64> {
        self.pagination.as_ref().map(PaginationTracker::total)
    }

    pub fn coverage(&self) -> Option<&PageCoverage> {
        self.pagination.as_ref().map(PaginationTracker::coverage)
    }

    pub fn set_page(&mut self, page: i64) -> TableResult<()> {
        let patch = self.pagination_mut()?.set_page(page);
        self.run_page_fetch(patch);
        Ok(())
    }

    /// Goes to the next page. There is no upper bound.
    pub fn next_page(&mut self) -> TableResult<()> {
        let patch = self.pagination_mut()?.next_page();
        self.run_page_fetch(patch);
        Ok(())
    }

    /// Goes to the previous page. There is no lower bound: page 1 steps to 0.
    pub fn previous_page(&mut self) -> TableResult<()> {
        let patch = self.pagination_mut()?.previous_page();
        self.run_page_fetch(patch);
        Ok(())
    }

    pub fn set_limit(&mut self, limit: u32) -> TableResult<()> {
        let patch = self.pagination_mut()?.set_limit(limit)?;
        self.run_page_fetch(patch);
        Ok(())
    }

    pub fn set_total(&mut self, total: u64) -> TableResult<()> {
        self.pagination_mut()?.set_total(total)?;
        Ok(())
    }

    fn reset_page(&mut self) {
        if let Some(pagination) = &mut self.pagination {
            let patch = pagination.set_page(1);
            self.run_page_fetch(patch);
        }
    }

    /// Clears the external cache and the coverage that mirrors it.
    fn reset_table(&mut self) {
        self.resource.reset();
        if let Some(pagination) = &mut self.pagination {
            pagination.reset_coverage();
        }
    }

    /// Current sort, if sorting is enabled.
    pub fn sort(&self) -> Option<&[SortDirective]> {
        self.sorting.as_ref().map(SortTracker::sort)
    }

    pub fn set_sort(&mut self, sort: Vec<SortDirective>) -> TableResult<()> {
        let sorting = self
            .sorting
            .as_mut()
            .ok_or(TableError::Disabled(Feature::Sorting))?;
        if let Some(sort) = sorting.set_sort(sort) {
            debug!(directives = sort.len(), "sort changed");
            self.reset_table();
            self.reset_page();
            self.fetch(FetchParamsPatch::sorted(sort));
        }
        Ok(())
    }

    fn filters_mut(&mut self) -> TableResult<&mut FilterTracker> {
        self.filters
            .as_mut()
            .ok_or(TableError::Disabled(Feature::Filters))
    }

    /// The search term as typed, if filters are enabled.
    pub fn search_term(&self) -> Option<&str> {
        self.filters.as_ref().map(FilterTracker::search_term)
    }

    /// The search term the rows are currently filtered by.
    pub fn applied_search_term(&self) -> Option<&str> {
        self.filters.as_ref().map(FilterTracker::applied_term)
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) -> TableResult<()> {
        self.set_search_term_at(term, Instant::now())
    }

    /// Like [`Self::set_search_term`] with an explicit clock reading.
    pub fn set_search_term_at(&mut self, term: impl Into<String>, now: Instant) -> TableResult<()> {
        self.filters_mut()?.set_search_term(term, now);
        Ok(())
    }

    pub fn reset_filters(&mut self) -> TableResult<()> {
        self.reset_filters_at(Instant::now())
    }

    pub fn reset_filters_at(&mut self, now: Instant) -> TableResult<()> {
        self.filters_mut()?.reset(now);
        Ok(())
    }

    /// When the next timer is due, if one is pending.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.filters.as_ref().and_then(FilterTracker::deadline)
    }

    /// Runs the effects of timers due at `now`. Returns true if any ran.
    pub fn poll_timers(&mut self, now: Instant) -> bool {
        let Some(term) = self.filters.as_mut().and_then(|f| f.poll(now)) else {
            return false;
        };
        debug!(term = %term, "search term applied");
        self.reset_table();
        self.reset_page();
        self.fetch(FetchParamsPatch::searched(term));
        true
    }

    /// Sleeps on the tokio timer until no timer is pending, running effects as
    /// they come due.
    pub async fn wait_for_timers(&mut self) {
        while let Some(deadline) = self.next_deadline() {
            time::sleep_until(deadline).await;
            self.poll_timers(deadline.max(Instant::now()));
        }
    }
}

/// Builder for creating a table state.
pub struct TableStateBuilder {
    config: Config,
}

impl TableStateBuilder {
    /// Creates a new builder with default configuration.
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn total(mut self, total: u64) -> Self {
        self.config.total = total;
        self
    }

    pub fn page_size(mut self, page_size: u32) -> Self {
        self.config.page_size = page_size;
        self
    }

    pub fn search_debounce(mut self, delay: Duration) -> Self {
        self.config.search_debounce = delay;
        self
    }

    pub fn selection(mut self, selection_id: impl Into<SelectionId>) -> Self {
        self.config.selection_id = Some(selection_id.into());
        self
    }

    pub fn pagination(mut self, enabled: bool) -> Self {
        self.config.has_pagination = enabled;
        self
    }

    pub fn sorting(mut self, enabled: bool) -> Self {
        self.config.has_sorting = enabled;
        self
    }

    pub fn filters(mut self, enabled: bool) -> Self {
        self.config.has_filters = enabled;
        self
    }

    /// Builds and mounts the table state.
    pub fn build<R: TableResource>(self, resource: R) -> TableResult<TableState<R>> {
        TableState::new(self.config, resource)
    }
}

impl Default for TableStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
