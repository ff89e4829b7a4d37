//! One-shot search command.

use std::process::ExitCode;

use scout_config::ScoutConfig;
use scout_core::error::ScoutResult;
use scout_core::types::SearchOptions;
use scout_search::ToolOutput;
use tracing::info;

use super::{build_executor, CommandContext};

/// Run a search and print the resulting text block to stdout
///
/// Exits with failure when the executor hands back an error payload.
pub async fn execute(query: &str, options: &SearchOptions, ctx: &CommandContext) -> ScoutResult<ExitCode> {
    let output = run(query, options, &ctx.config).await?;

    ctx.output.raw(&output.text_content());

    Ok(if output.is_error {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

/// Search with the configured backend and retry policy
pub async fn run(query: &str, options: &SearchOptions, config: &ScoutConfig) -> ScoutResult<ToolOutput> {
    info!("Searching for: {}", query);

    let executor = build_executor(config)?;
    Ok(executor.execute(query, options).await)
}
