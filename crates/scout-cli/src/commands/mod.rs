//! Command implementations and dispatch logic.
//!
//! Each command is an async function that takes a [`CommandContext`] and
//! returns the process exit code.

use std::process::ExitCode;

use camino::Utf8PathBuf;
use scout_config::{ConfigLoader, ScoutConfig};
use scout_core::error::ScoutResult;
use scout_core::types::SearchOptions;
use scout_search::{RetryPolicy, SearchExecutor, SearchService};
use tracing::info;

pub mod info;
pub mod search;
pub mod serve;


use crate::{output::OutputHandler, Commands};

/// Shared context for all commands
pub struct CommandContext {
    pub config: ScoutConfig,
    pub output: OutputHandler,
}

impl CommandContext {
    /// Resolve configuration from files, the environment and flags
    pub async fn load(config_file: Option<Utf8PathBuf>, registry: Option<String>) -> ScoutResult<Self> {
        let config = ConfigLoader::new()
            .with_file(config_file)
            .with_registry_flag(registry)
            .load()
            .await?;

        Ok(Self::with_config(config))
    }

    pub fn with_config(config: ScoutConfig) -> Self {
        Self {
            config,
            output: OutputHandler::new(),
        }
    }
}

/// Dispatch a command to its handler
pub async fn dispatch_command(command: Commands, ctx: &CommandContext) -> ScoutResult<ExitCode> {
    match command {
        Commands::Search {
            query,
            limit,
            offset,
            sort_by,
        } => {
            let options = SearchOptions {
                limit,
                offset,
                sort_by: sort_by.map(Into::into),
            };
            search::execute(&query, &options, ctx).await
        }
        Commands::Info => info::execute(ctx).await,
        Commands::Serve => serve::execute(ctx).await,
    }
}

/// Build the retrying executor for a resolved configuration and log its provenance
pub fn build_executor(config: &ScoutConfig) -> ScoutResult<SearchExecutor> {
    let service = SearchService::from_config(config)?;

    info!("Search mode: {}", service.mode());
    info!("Registry info: {}", service.registry_info());

    Ok(SearchExecutor::with_policy(service, RetryPolicy::from(config)))
}
