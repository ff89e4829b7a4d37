//! Utility functions for scout operations.

pub mod validate;

pub use validate::{validate_options, validate_query, MAX_QUERY_LEN};
