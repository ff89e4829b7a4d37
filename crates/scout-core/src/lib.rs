//! # scout-core
//!
//! Core types and utilities shared across all scout crates.
//!
//! This crate provides:
//! - The canonical `PackageRecord` produced by every search backend
//! - `SearchOptions` / `SearchResult` and the `ServiceMode` provenance types
//! - `ScoutError` enum for unified error handling
//! - Input validation helpers for search requests
//!
//! ## Architecture
//!
//! The crate is organized into modules:
//! - `types`: Core data types (PackageRecord, SearchResult, etc.)
//! - `error`: Error types and result aliases
//! - `utils`: Validation helpers

pub mod error;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use error::{ScoutError, ScoutResult};
pub use types::{
    Author, DecoratedResult, Downloads, Maintainer, PackageRecord, RegistryInfo, Score,
    ScoreDetail, SearchOptions, SearchResult, ServiceMode, SortBy,
};
