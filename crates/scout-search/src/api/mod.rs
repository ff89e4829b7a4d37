//! Wire types for registry search responses and `npm search --json` output
//!
//! These mirror what registries and the npm CLI actually emit, which is looser
//! than the canonical record: most fields may be missing or `null`, and a few
//! come in more than one shape.

use scout_core::types::Score;
use serde::{Deserialize, Serialize};

/// Response envelope of `GET /-/v1/search`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ApiSearchResponse {
    /// Matched packages; absent is treated as empty
    ///
    /// Kept raw so each entry is decoded into [`ApiSearchObject`] on its own
    /// and a malformed entry costs only itself.
    #[serde(default)]
    pub objects: Option<Vec<serde_json::Value>>,
    /// Total number of matches known to the registry
    #[serde(default)]
    pub total: Option<u64>,
}

/// One entry of a registry search response
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ApiSearchObject {
    #[serde(default)]
    pub package: Option<ApiPackage>,
    #[serde(default)]
    pub downloads: Option<ApiDownloads>,
    #[serde(default)]
    pub score: Option<Score>,
}

/// Package document nested in a search entry
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ApiPackage {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub keywords: Option<RawKeywords>,
    #[serde(default)]
    pub author: Option<RawAuthor>,
    #[serde(default)]
    pub maintainers: Option<Vec<RawMaintainer>>,
    #[serde(default)]
    pub license: Option<RawLicense>,
    /// Publish time of this version
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub links: Option<Links>,
}

/// Download counters attached to a search entry
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ApiDownloads {
    #[serde(default)]
    pub weekly: Option<u64>,
    #[serde(default)]
    pub monthly: Option<u64>,
}

/// Link block used by both the registry and the npm CLI
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Links {
    #[serde(default)]
    pub npm: Option<String>,
    #[serde(default)]
    pub homepage: Option<String>,
    #[serde(default)]
    pub repository: Option<String>,
    #[serde(default)]
    pub bugs: Option<String>,
}

/// One element of the JSON array printed by `npm search --json`
///
/// Older npm versions print `homepage`/`repository` at the top level, newer
/// ones nest them under `links`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CliSearchRecord {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub keywords: Option<RawKeywords>,
    #[serde(default)]
    pub author: Option<RawAuthor>,
    #[serde(default)]
    pub maintainers: Option<Vec<RawMaintainer>>,
    #[serde(default)]
    pub homepage: Option<String>,
    #[serde(default)]
    pub repository: Option<RawRepository>,
    #[serde(default)]
    pub license: Option<RawLicense>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub links: Option<Links>,
}

/// Keywords as a list, or occasionally a single comma-separated string
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum RawKeywords {
    List(Vec<String>),
    Single(String),
}

/// Author as a bare string or a person object
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum RawAuthor {
    Name(String),
    Person {
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        username: Option<String>,
        #[serde(default)]
        email: Option<String>,
    },
}

/// Maintainer entry; the registry identifies maintainers by `username`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawMaintainer {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Repository as a URL string or a `{type, url}` object
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum RawRepository {
    Url(String),
    Detailed {
        #[serde(default, rename = "type")]
        repo_type: Option<String>,
        #[serde(default)]
        url: Option<String>,
    },
}

/// License as an SPDX string or a legacy `{type}` object
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum RawLicense {
    Spdx(String),
    Legacy {
        #[serde(default, rename = "type")]
        license_type: Option<String>,
    },
}
