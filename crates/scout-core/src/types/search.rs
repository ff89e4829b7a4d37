//! Search request options and result envelopes.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize, Serializer};

use super::{PackageRecord, RegistryInfo, ServiceMode};

/// Page size used when the caller does not ask for one
pub const DEFAULT_LIMIT: u32 = 20;
/// Largest page size a caller may request
pub const MAX_LIMIT: u32 = 100;

/// Requested result ordering
///
/// Only the registry API orders results, and it always uses its own relevance
/// ranking; the value is accepted and carried for callers that set it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    #[default]
    Relevance,
    Popularity,
    Quality,
    Maintenance,
}

/// Options for a single search page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchOptions {
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default)]
    pub offset: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<SortBy>,
}

fn default_limit() -> u32 {
    DEFAULT_LIMIT
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: 0,
            sort_by: None,
        }
    }
}

impl SearchOptions {
    /// Options with a custom page size
    pub fn with_limit(limit: u32) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }

    /// Page size as a slice length
    pub fn limit_len(&self) -> usize {
        self.limit as usize
    }
}

/// One page of search results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub packages: Vec<PackageRecord>,
    pub total: u64,
    #[serde(serialize_with = "serialize_iso_millis")]
    pub time: DateTime<Utc>,
}

impl SearchResult {
    /// Build a result stamped with the current time
    pub fn new(packages: Vec<PackageRecord>, total: u64) -> Self {
        Self {
            packages,
            total,
            time: Utc::now(),
        }
    }

    /// Build a result whose total is the number of packages it carries
    pub fn counted(packages: Vec<PackageRecord>) -> Self {
        let total = packages.len() as u64;
        Self::new(packages, total)
    }
}

/// A search result annotated with the mode and registry that produced it
#[derive(Debug, Clone, Serialize)]
pub struct DecoratedResult {
    #[serde(flatten)]
    pub result: SearchResult,
    pub mode: ServiceMode,
    pub registry: RegistryInfo,
}

impl DecoratedResult {
    /// Pretty-printed JSON text block
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

fn serialize_iso_millis<S: Serializer>(time: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&time.to_rfc3339_opts(SecondsFormat::Millis, true))
}
