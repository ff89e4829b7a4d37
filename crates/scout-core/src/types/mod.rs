//! Core data types for scout searches.
//!
//! This module provides the fundamental types used throughout the workspace:
//! - The canonical package record and its nested metadata
//! - Search request options and result envelopes
//! - Service mode and registry provenance

pub mod mode;
pub mod package;
pub mod search;

// Re-export all public types
pub use mode::{RegistryInfo, ServiceMode};
pub use package::{Author, Downloads, Maintainer, PackageRecord, Score, ScoreDetail, UNKNOWN_VERSION};
pub use search::{DecoratedResult, SearchOptions, SearchResult, SortBy, DEFAULT_LIMIT, MAX_LIMIT};
