//! Fetch parameter models.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::sort::SortDirective;
use crate::config::DEFAULT_PAGE_SIZE;

/// Identifier of the context a table is scoped to (a venue, tenant, account).
///
/// Fetches are held back until one is present.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectionId(String);

impl SelectionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SelectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SelectionId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for SelectionId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// The canonical parameters handed to the external fetch function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchParams {
    /// Requested page, 1-based.
    pub page: i64,
    /// Page size.
    pub limit: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<Vec<SortDirective>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_term: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selection_id: Option<SelectionId>,
}

impl FetchParams {
    pub fn new(limit: u32, selection_id: Option<SelectionId>) -> Self {
        Self {
            page: 1,
            limit,
            sort: None,
            search_term: None,
            selection_id,
        }
    }

    /// Replaces the keys present in `patch`, keeping every other key.
    pub fn merge(&mut self, patch: FetchParamsPatch) {
        if let Some(page) = patch.page {
            self.page = page;
        }
        if let Some(limit) = patch.limit {
            self.limit = limit;
        }
        if let Some(sort) = patch.sort {
            self.sort = Some(sort);
        }
        if let Some(search_term) = patch.search_term {
            self.search_term = Some(search_term);
        }
        if let Some(selection_id) = patch.selection_id {
            self.selection_id = Some(selection_id);
        }
    }
}

impl Default for FetchParams {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE, None)
    }
}

/// A partial update of [`FetchParams`]. Absent keys are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchParamsPatch {
    pub page: Option<i64>,
    pub limit: Option<u32>,
    pub sort: Option<Vec<SortDirective>>,
    pub search_term: Option<String>,
    pub selection_id: Option<SelectionId>,
}

impl FetchParamsPatch {
    /// Patch for a page request at the given page size.
    pub fn page(page: i64, limit: u32) -> Self {
        Self {
            page: Some(page),
            limit: Some(limit),
            ..Self::default()
        }
    }

    /// Patch for the first page under a new sort.
    pub fn sorted(sort: Vec<SortDirective>) -> Self {
        Self {
            page: Some(1),
            sort: Some(sort),
            ..Self::default()
        }
    }

    /// Patch for the first page under a new search term.
    pub fn searched(search_term: impl Into<String>) -> Self {
        Self {
            page: Some(1),
            search_term: Some(search_term.into()),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_keeps_unspecified_keys() {
        let mut params = FetchParams::new(25, Some(SelectionId::from("venue-1")));
        params.merge(FetchParamsPatch::searched("tacos"));
        params.merge(FetchParamsPatch::page(3, 10));

        assert_eq!(params.page, 3);
        assert_eq!(params.limit, 10);
        assert_eq!(params.search_term.as_deref(), Some("tacos"));
        assert_eq!(params.selection_id, Some(SelectionId::from("venue-1")));
        assert!(params.sort.is_none());
    }

    #[test]
    fn test_serializes_camel_case_without_absent_keys() {
        let mut params = FetchParams::new(25, Some(SelectionId::from("v")));
        params.merge(FetchParamsPatch::searched("x"));
        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"page": 1, "limit": 25, "searchTerm": "x", "selectionId": "v"})
        );
    }
}
