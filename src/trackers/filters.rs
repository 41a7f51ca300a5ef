//! Search term filtering.

use std::time::Duration;
use tokio::time::Instant;

use crate::reactive::{Debouncer, Watched};

/// Holds the search term and debounces it before it is applied.
#[derive(Debug, Clone)]
pub struct FilterTracker {
    debouncer: Debouncer<String>,
    applied: Watched<String>,
}

impl FilterTracker {
    pub fn new(delay: Duration) -> Self {
        Self {
            debouncer: Debouncer::new(String::new(), delay),
            applied: Watched::default(),
        }
    }

    pub fn mount(&mut self) {
        self.applied.mount();
    }

    /// The term as typed.
    pub fn search_term(&self) -> &str {
        self.debouncer.input()
    }

    /// The term the table is currently filtered by.
    pub fn applied_term(&self) -> &str {
        self.applied.get()
    }

    pub fn set_search_term(&mut self, term: impl Into<String>, now: Instant) {
        self.debouncer.push(term.into(), now);
    }

    /// Clears the term. The clear is debounced like any other edit.
    pub fn reset(&mut self, now: Instant) {
        self.set_search_term(String::new(), now);
    }

    /// When the debounce timer is due.
    pub fn deadline(&self) -> Option<Instant> {
        self.debouncer.deadline()
    }

    /// Applies the debounced term once due. Returns it if the applied term
    /// changed and the filter effect has to run.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        let term = self.debouncer.poll(now)?;
        self.applied.set(term.clone()).then_some(term)
    }

    /// Drops a pending edit without applying it.
    pub fn cancel(&mut self) {
        self.debouncer.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(500);

    #[test]
    fn test_term_applies_after_delay() {
        let start = Instant::now();
        let mut filters = FilterTracker::new(DELAY);
        filters.mount();

        filters.set_search_term("pizza", start);
        assert_eq!(filters.search_term(), "pizza");
        assert_eq!(filters.applied_term(), "");
        assert_eq!(filters.poll(start + Duration::from_millis(499)), None);
        assert_eq!(filters.poll(start + DELAY), Some("pizza".to_string()));
        assert_eq!(filters.applied_term(), "pizza");
    }

    #[test]
    fn test_edit_reverted_within_delay_is_not_a_change() {
        let start = Instant::now();
        let mut filters = FilterTracker::new(DELAY);
        filters.mount();

        filters.set_search_term("p", start);
        filters.reset(start + Duration::from_millis(100));
        assert_eq!(filters.poll(start + Duration::from_millis(600)), None);
        assert!(filters.deadline().is_none());
    }
}
