//! Error types and result aliases for scout operations.
//!
//! Provides a unified error type that covers every failure a search can hit,
//! from configuration loading down to a single backend round trip.

use std::time::Duration;
use thiserror::Error;

/// Unified error type for all scout operations
#[derive(Error, Debug)]
pub enum ScoutError {
    // Config errors
    #[error("Failed to parse {path}: {message}")]
    TomlParse { path: String, message: String },

    #[error("Configuration field '{field}' is invalid: {reason}")]
    ConfigValidation { field: String, reason: String },

    // Request errors
    #[error("{reason}")]
    Validation { field: String, reason: String },

    // CLI backend errors
    #[error("Failed to run '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("npm search error: {stderr}")]
    Subprocess { stderr: String },

    // API backend errors
    #[error("Registry API request failed: {status} {reason}")]
    HttpStatus { status: u16, reason: String },

    #[error("Network error: {message}")]
    Network {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Invalid registry response: {message}")]
    InvalidResponse { message: String },

    #[error("Search attempt timed out after {}ms", .elapsed.as_millis())]
    Timeout { elapsed: Duration },

    // Executor errors
    #[error("{source} (after {attempts} attempts)")]
    RetryExhausted {
        attempts: u32,
        #[source]
        source: Box<ScoutError>,
    },

    // IO errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for scout operations
pub type ScoutResult<T> = Result<T, ScoutError>;

impl ScoutError {
    /// Create a network error from any error type
    pub fn network<E>(message: String, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Network {
            message,
            source: Some(Box::new(source)),
        }
    }

    /// Create an IO error from std::io::Error
    pub fn io(message: String, source: std::io::Error) -> Self {
        Self::Io { message, source }
    }

    /// Create a request validation error
    pub fn validation(field: &str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    /// Check if this error is transient, i.e. a retry could plausibly succeed
    pub fn is_recoverable(&self) -> bool {
        match self {
            ScoutError::Network { .. } | ScoutError::Timeout { .. } | ScoutError::Io { .. } => {
                true
            },
            ScoutError::HttpStatus { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    /// Get a user-friendly suggestion for fixing this error
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            ScoutError::Spawn { .. } => {
                Some("Make sure npm is installed and on PATH, or set SCOUT_NPM_PROGRAM")
            },
            ScoutError::Subprocess { .. } => Some("Run 'npm search' manually to inspect its output"),
            ScoutError::HttpStatus { .. } => {
                Some("Check that the registry URL points at an npm-compatible registry")
            },
            ScoutError::Network { .. } => Some("Check your internet connection and try again"),
            ScoutError::Timeout { .. } => Some("Raise attempt_timeout_ms in your scout config"),
            ScoutError::RetryExhausted { source, .. } => source.suggestion(),
            ScoutError::ConfigValidation { .. } | ScoutError::TomlParse { .. } => {
                Some("Fix the value in your scout.toml or the matching environment variable")
            },
            _ => None,
        }
    }
}
