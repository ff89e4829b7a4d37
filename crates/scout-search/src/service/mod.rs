//! Mode resolution and the search service facade
//!
//! The backend is picked exactly once, when the service is built. Afterwards
//! the service only forwards calls to it, so concurrent searches share nothing
//! but read-only configuration.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use scout_config::{ScoutConfig, DEFAULT_REGISTRY, REGISTRY_ENV};
use scout_core::error::ScoutResult;
use scout_core::types::{RegistryInfo, SearchOptions, SearchResult, ServiceMode};
use tracing::info;

use crate::cli::CliBackend;
use crate::client::RegistryClient;

/// Path of the registry search endpoint, relative to the registry origin
pub const SEARCH_PATH: &str = "/-/v1/search";

/// A way of answering search queries
#[async_trait]
pub trait SearchBackend: Send + Sync + fmt::Debug {
    /// Provenance of this backend's results; must not perform I/O
    fn registry_info(&self) -> RegistryInfo;

    /// Mode this backend implements
    fn mode(&self) -> ServiceMode {
        self.registry_info().mode()
    }

    /// Run one search
    async fn search(&self, query: &str, options: &SearchOptions) -> ScoutResult<SearchResult>;
}

/// Outcome of the mode policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedMode {
    Cli,
    Api { search_url: String },
}

/// Settings the backends need besides the registry origin
#[derive(Debug, Clone)]
pub struct BackendSettings {
    pub npm_program: String,
    pub user_agent: String,
}

impl Default for BackendSettings {
    fn default() -> Self {
        let defaults = ScoutConfig::default();
        Self {
            npm_program: defaults.npm_program,
            user_agent: defaults.user_agent,
        }
    }
}

impl From<&ScoutConfig> for BackendSettings {
    fn from(config: &ScoutConfig) -> Self {
        Self {
            npm_program: config.npm_program.clone(),
            user_agent: config.user_agent.clone(),
        }
    }
}

/// Decide between CLI and API mode
///
/// Any registry origin, explicit or from the environment, selects API mode.
/// Blank values count as absent.
pub fn resolve_mode(explicit: Option<&str>, env_default: Option<&str>) -> ResolvedMode {
    let explicit = explicit.map(str::trim).filter(|s| !s.is_empty());
    let env_default = env_default.map(str::trim).filter(|s| !s.is_empty());

    if explicit.is_none() && env_default.is_none() {
        return ResolvedMode::Cli;
    }

    let origin = explicit.or(env_default).unwrap_or(DEFAULT_REGISTRY);
    ResolvedMode::Api {
        search_url: search_url(origin),
    }
}

/// Search endpoint for a registry origin
pub fn search_url(origin: &str) -> String {
    let origin = origin.strip_suffix('/').unwrap_or(origin);
    format!("{}{}", origin, SEARCH_PATH)
}

/// Search facade bound to one backend for its whole lifetime
#[derive(Debug, Clone)]
pub struct SearchService {
    backend: Arc<dyn SearchBackend>,
}

impl SearchService {
    /// Build a service, taking the default registry from `NPM_REGISTRY_URL`
    pub fn new(explicit_registry: Option<&str>, settings: &BackendSettings) -> ScoutResult<Self> {
        let env_default = std::env::var(REGISTRY_ENV).ok();
        Self::with_default_registry(explicit_registry, env_default.as_deref(), settings)
    }

    /// Build a service from a resolved configuration
    pub fn from_config(config: &ScoutConfig) -> ScoutResult<Self> {
        Self::with_default_registry(
            config.explicit_registry.as_deref(),
            config.default_registry.as_deref(),
            &BackendSettings::from(config),
        )
    }

    /// Build a service with an explicit default registry instead of reading the environment
    pub fn with_default_registry(
        explicit_registry: Option<&str>,
        default_registry: Option<&str>,
        settings: &BackendSettings,
    ) -> ScoutResult<Self> {
        let service = match resolve_mode(explicit_registry, default_registry) {
            ResolvedMode::Api { search_url } => {
                info!("Using API mode with registry: {}", search_url);
                Self::from_backend(RegistryClient::with_user_agent(&search_url, &settings.user_agent)?)
            }
            ResolvedMode::Cli => {
                info!("Using CLI mode ({} search) - inherits user npm config", settings.npm_program);
                Self::from_backend(CliBackend::new(settings.npm_program.clone()))
            }
        };

        Ok(service)
    }

    /// Wrap an already-built backend
    pub fn from_backend(backend: impl SearchBackend + 'static) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    /// Run one search on the selected backend; errors are passed through
    pub async fn search(&self, query: &str, options: &SearchOptions) -> ScoutResult<SearchResult> {
        self.backend.search(query, options).await
    }

    /// Selected mode
    pub fn mode(&self) -> ServiceMode {
        self.backend.mode()
    }

    /// Provenance of results
    pub fn registry_info(&self) -> RegistryInfo {
        self.backend.registry_info()
    }
}
