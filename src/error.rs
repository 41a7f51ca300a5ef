//! Table state error types.

use std::fmt;

use thiserror::Error;

/// Optional table features that can be switched off per table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    Pagination,
    Sorting,
    Filters,
}

impl Feature {
    /// Returns the string representation of the feature.
    pub fn as_str(&self) -> &'static str {
        match self {
            Feature::Pagination => "pagination",
            Feature::Sorting => "sorting",
            Feature::Filters => "filters",
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised at the boundary of the table state.
#[derive(Debug, Error)]
pub enum TableError {
    /// A page size of zero was supplied.
    #[error("page size must be greater than zero")]
    InvalidPageSize,

    /// The table has more pages than the coverage array may track.
    #[error("{pages} pages exceed the limit of {max} tracked pages")]
    TooManyPages { pages: u64, max: u64 },

    /// A mutator was called for a feature the table was built without.
    #[error("{0} is disabled for this table")]
    Disabled(Feature),

    /// The session script could not be read.
    #[error("failed to read session script: {0}")]
    Io(#[from] std::io::Error),

    /// A session script line did not parse as an event.
    #[error("invalid session event on line {line}: {source}")]
    InvalidEvent {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Result type alias for table state operations.
pub type TableResult<T> = Result<T, TableError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_message_names_feature() {
        let err = TableError::Disabled(Feature::Sorting);
        assert_eq!(err.to_string(), "sorting is disabled for this table");
    }
}
