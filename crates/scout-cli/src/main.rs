//! # scout-cli
//!
//! npm package search from the terminal or as a stdio tool server.
//!
//! This is the entry point for the `scout` binary. It parses arguments, sets up
//! logging on stderr (stdout carries search output and protocol traffic), and
//! dispatches to the command handlers.

use std::process::ExitCode;

use anyhow::Context;
use camino::Utf8PathBuf;
use clap::{Parser, Subcommand, ValueEnum};
use scout_config::DEFAULT_REGISTRY;
use scout_core::error::ScoutError;
use scout_core::types::{SortBy, DEFAULT_LIMIT};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod commands;
mod output;
mod server;

use commands::CommandContext;
use output::errors::ErrorFormatter;

/// Search npm packages through the local npm CLI or a registry API
#[derive(Parser)]
#[command(name = "scout", version, about = "npm package search")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Extra configuration file layered over ~/.scout/config.toml
    #[arg(long, global = true, env = "SCOUT_CONFIG", value_name = "FILE")]
    pub config: Option<Utf8PathBuf>,

    /// Query a registry API directly; without a URL the public registry is used
    #[arg(
        long,
        global = true,
        num_args = 0..=1,
        default_missing_value = DEFAULT_REGISTRY,
        value_name = "URL"
    )]
    pub registry: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search for packages
    Search {
        query: String,
        /// Page size (1-100)
        #[arg(short, long, default_value_t = DEFAULT_LIMIT)]
        limit: u32,
        /// Results to skip
        #[arg(long, default_value_t = 0)]
        offset: u32,
        /// Requested ordering
        #[arg(long, value_enum)]
        sort_by: Option<SortArg>,
    },
    /// Show which search mode and registry would be used
    Info,
    /// Serve the search tool over stdio (JSON-RPC)
    Serve,
}

/// Command-line spelling of [`SortBy`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortArg {
    Relevance,
    Popularity,
    Quality,
    Maintenance,
}

impl From<SortArg> for SortBy {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Relevance => SortBy::Relevance,
            SortArg::Popularity => SortBy::Popularity,
            SortArg::Quality => SortBy::Quality,
            SortArg::Maintenance => SortBy::Maintenance,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    setup_logging(cli.verbose);
    setup_panic_handler();

    info!("Starting scout v{}", env!("CARGO_PKG_VERSION"));

    match run_cli(cli) {
        Ok(code) => code,
        Err(err) => {
            report_error(&err);
            ExitCode::FAILURE
        }
    }
}

fn run_cli(cli: Cli) -> anyhow::Result<ExitCode> {
    // Create Tokio runtime for async operations
    let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;

    rt.block_on(async {
        let ctx = CommandContext::load(cli.config, cli.registry).await?;
        let code = commands::dispatch_command(cli.command, &ctx).await?;
        Ok::<_, anyhow::Error>(code)
    })
}

fn report_error(err: &anyhow::Error) {
    let formatter = ErrorFormatter::new();
    match err.downcast_ref::<ScoutError>() {
        Some(scout_err) => eprintln!("{}", formatter.format_error(scout_err)),
        None => eprintln!("{}", formatter.format_simple(&format!("{:#}", err))),
    }
}

fn setup_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "scout={level},scout_core={level},scout_config={level},scout_search={level}"
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn setup_panic_handler() {
    std::panic::set_hook(Box::new(|panic_info| {
        error!("scout encountered an unexpected error: {}", panic_info);
        eprintln!("scout crashed! This is a bug.");
        eprintln!("Please report this at: https://github.com/scout-pkg/scout/issues");
        eprintln!("Error: {}", panic_info);
    }));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_search_defaults() {
        let cli = Cli::try_parse_from(["scout", "search", "react"]).unwrap();
        assert!(cli.registry.is_none());
        match cli.command {
            Commands::Search {
                query,
                limit,
                offset,
                sort_by,
            } => {
                assert_eq!(query, "react");
                assert_eq!(limit, 20);
                assert_eq!(offset, 0);
                assert_eq!(sort_by, None);
            }
            _ => panic!("Expected search command"),
        }
    }

    #[test]
    fn test_bare_registry_flag_uses_public_registry() {
        let cli = Cli::try_parse_from(["scout", "search", "react", "--registry"]).unwrap();
        assert_eq!(cli.registry.as_deref(), Some(DEFAULT_REGISTRY));

        let cli = Cli::try_parse_from([
            "scout",
            "info",
            "--registry",
            "https://registry.npmmirror.com",
        ])
        .unwrap();
        assert_eq!(cli.registry.as_deref(), Some("https://registry.npmmirror.com"));
    }

    #[test]
    fn test_sort_by_values() {
        let cli = Cli::try_parse_from(["scout", "search", "x", "--sort-by", "popularity"]).unwrap();
        match cli.command {
            Commands::Search { sort_by, .. } => {
                assert_eq!(sort_by.map(SortBy::from), Some(SortBy::Popularity));
            }
            _ => panic!("Expected search command"),
        }

        assert!(Cli::try_parse_from(["scout", "search", "x", "--sort-by", "newest"]).is_err());
    }
}
