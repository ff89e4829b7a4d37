//! CLI mode: search through the local `npm search` command
//!
//! Running npm itself means the user's registry, proxy and auth settings all
//! apply without scout knowing about them.

use std::process::Stdio;

use async_trait::async_trait;
use scout_core::error::{ScoutError, ScoutResult};
use scout_core::types::{RegistryInfo, SearchOptions, SearchResult};
use tokio::process::Command;
use tracing::{error, info, warn};

use crate::service::SearchBackend;

pub mod parse;
pub mod warnings;

/// Search backend that shells out to a package-manager binary
#[derive(Debug, Clone)]
pub struct CliBackend {
    /// Binary to run, usually `npm`
    program: String,
}

impl CliBackend {
    /// Create a backend that runs `program search`
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Binary this backend runs
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments for one search; the query is passed after `--` so it is never read as a flag
    fn search_args(query: &str) -> [&str; 4] {
        ["search", "--json", "--", query]
    }

    /// Run one search
    pub async fn search(&self, query: &str, options: &SearchOptions) -> ScoutResult<SearchResult> {
        info!("Searching npm packages with CLI: {}", query);

        let output = Command::new(&self.program)
            .args(Self::search_args(query))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                error!("Failed to run {}: {}", self.program, e);
                ScoutError::Spawn {
                    program: self.program.clone(),
                    source: e,
                }
            })?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        if let Err(err) = warnings::check_stderr(&stderr) {
            error!("Error searching npm packages with CLI: {}: {}", query, err);
            return Err(err);
        }
        if !stderr.trim().is_empty() {
            warn!("Ignoring npm warnings: {}", stderr.trim());
        }

        if !output.status.success() {
            warn!("{} exited with {}, parsing its output anyway", self.program, output.status);
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let packages = parse::parse_search_output(&stdout, options.limit_len());

        info!("Found {} packages for query: {}", packages.len(), query);

        Ok(SearchResult::counted(packages))
    }
}

#[async_trait]
impl SearchBackend for CliBackend {
    fn registry_info(&self) -> RegistryInfo {
        RegistryInfo::LocalConfiguration
    }

    async fn search(&self, query: &str, options: &SearchOptions) -> ScoutResult<SearchResult> {
        CliBackend::search(self, query, options).await
    }
}
