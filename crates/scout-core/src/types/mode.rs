//! Service mode and registry provenance.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which backend a search service dispatches to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceMode {
    /// Local package-manager command, inherits the user's npm configuration
    Cli,
    /// Direct registry HTTP search API
    Api,
}

impl fmt::Display for ServiceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceMode::Cli => f.write_str("cli"),
            ServiceMode::Api => f.write_str("api"),
        }
    }
}

/// Where search results come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryInfo {
    /// Whatever registry the local npm configuration points at
    LocalConfiguration,
    /// Resolved registry search endpoint
    Endpoint(String),
}

impl RegistryInfo {
    /// Mode this provenance belongs to
    pub fn mode(&self) -> ServiceMode {
        match self {
            RegistryInfo::LocalConfiguration => ServiceMode::Cli,
            RegistryInfo::Endpoint(_) => ServiceMode::Api,
        }
    }
}

impl fmt::Display for RegistryInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryInfo::LocalConfiguration => f.write_str("CLI mode - uses npm configuration"),
            RegistryInfo::Endpoint(url) => write!(f, "API mode - {}", url),
        }
    }
}

impl Serialize for RegistryInfo {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
