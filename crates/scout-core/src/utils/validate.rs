//! Search request validation.
//!
//! Rejects malformed requests before any backend is contacted.

use crate::error::{ScoutError, ScoutResult};
use crate::types::{SearchOptions, MAX_LIMIT};

/// Longest accepted query, in characters
pub const MAX_QUERY_LEN: usize = 200;

/// Validate a free-text search query
pub fn validate_query(query: &str) -> ScoutResult<()> {
    if query.trim().is_empty() {
        return Err(ScoutError::validation("query", "Search query cannot be empty"));
    }

    if query.chars().count() > MAX_QUERY_LEN {
        return Err(ScoutError::validation(
            "query",
            format!("Search query is too long (max {} characters)", MAX_QUERY_LEN),
        ));
    }

    Ok(())
}

/// Validate paging options
pub fn validate_options(options: &SearchOptions) -> ScoutResult<()> {
    if options.limit < 1 || options.limit > MAX_LIMIT {
        return Err(ScoutError::validation(
            "limit",
            format!("Limit must be a number between 1 and {}", MAX_LIMIT),
        ));
    }

    Ok(())
}
