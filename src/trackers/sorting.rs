//! Table sorting.

use crate::models::SortDirective;
use crate::reactive::Watched;

/// Holds the ordered sort directives of a table.
#[derive(Debug, Clone, Default)]
pub struct SortTracker {
    sort: Watched<Vec<SortDirective>>,
}

impl SortTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mount(&mut self) {
        self.sort.mount();
    }

    pub fn sort(&self) -> &[SortDirective] {
        self.sort.get()
    }

    /// Replaces the sort. Returns it when the sort effect has to run.
    pub fn set_sort(&mut self, sort: Vec<SortDirective>) -> Option<Vec<SortDirective>> {
        self.sort.set(sort.clone()).then_some(sort)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_changes_after_mount_fire() {
        let mut tracker = SortTracker::new();
        assert_eq!(tracker.set_sort(vec![SortDirective::asc("name")]), None);

        tracker.mount();
        assert_eq!(tracker.set_sort(vec![SortDirective::asc("name")]), None);
        let sort = vec![SortDirective::desc("name"), SortDirective::asc("city")];
        assert_eq!(tracker.set_sort(sort.clone()), Some(sort));
        assert_eq!(tracker.sort().len(), 2);
    }
}
