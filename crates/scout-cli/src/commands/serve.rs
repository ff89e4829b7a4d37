//! Stdio tool server command.

use std::process::ExitCode;

use scout_core::error::{ScoutError, ScoutResult};
use tracing::info;

use super::{build_executor, CommandContext};
use crate::server::ToolServer;

pub async fn execute(ctx: &CommandContext) -> ScoutResult<ExitCode> {
    let executor = build_executor(&ctx.config)?;

    info!("Starting npm search tool server on stdio");
    ToolServer::new(executor)
        .run_stdio()
        .await
        .map_err(|e| ScoutError::io("Tool server I/O failed".to_string(), e))?;
    info!("Tool server input closed, shutting down");

    Ok(ExitCode::SUCCESS)
}
