//! npm package search for scout
//!
//! This crate resolves a free-text query into canonical package records using
//! one of two backends, chosen once when the service is built:
//!
//! - **CLI mode** runs the local `npm search --json` command and so inherits
//!   whatever registry and auth the user's npm configuration points at.
//! - **API mode** calls a registry's `/-/v1/search` endpoint directly.
//!
//! [`SearchExecutor`] wraps either backend with validation and a bounded,
//! fixed-delay retry loop and packages the outcome as a tool payload.

pub mod api;
pub mod cli;
pub mod client;
pub mod executor;
pub mod normalize;
pub mod service;

// Re-export main types
pub use cli::CliBackend;
pub use client::RegistryClient;
pub use executor::{ContentBlock, RetryPolicy, RetryState, SearchExecutor, ToolOutput};
pub use service::{resolve_mode, search_url, BackendSettings, ResolvedMode, SearchBackend, SearchService};
