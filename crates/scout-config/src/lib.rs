//! Configuration loading for scout
//!
//! This crate handles parsing of `scout.toml` files and layers them with
//! environment variables and command-line flags into one resolved
//! [`ScoutConfig`].

pub mod file;
pub mod layering;

// Re-export main types
pub use file::{HttpSection, NpmSection, RetrySection, ScoutToml};
pub use layering::{ConfigLoader, ConfigSource, ScoutConfig, DEFAULT_REGISTRY, REGISTRY_ENV};

use scout_core::error::ScoutError;

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ScoutError>;
