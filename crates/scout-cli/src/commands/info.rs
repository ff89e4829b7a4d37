//! Show the resolved search mode and configuration.

use std::process::ExitCode;

use scout_config::ScoutConfig;
use scout_core::error::ScoutResult;
use scout_core::types::{RegistryInfo, ServiceMode};
use scout_search::{BackendSettings, SearchService};

use super::CommandContext;

/// Everything `scout info` prints
#[derive(Debug, Clone, PartialEq)]
pub struct InfoReport {
    pub mode: ServiceMode,
    pub registry: RegistryInfo,
    /// Configured registry origin before mode selection
    pub origin: String,
    pub source: String,
    pub backend: String,
    pub retry: String,
}

impl InfoReport {
    /// Describe a configuration without running any search
    pub fn collect(config: &ScoutConfig) -> ScoutResult<Self> {
        let service = SearchService::from_config(config)?;
        let settings = BackendSettings::from(config);

        let backend = match service.mode() {
            ServiceMode::Cli => format!("{} search --json", settings.npm_program),
            ServiceMode::Api => format!("HTTP ({})", settings.user_agent),
        };

        let timeout = config
            .attempt_timeout
            .map(|t| format!(", {}ms per attempt", t.as_millis()))
            .unwrap_or_default();

        Ok(Self {
            mode: service.mode(),
            registry: service.registry_info(),
            origin: config
                .effective_registry()
                .unwrap_or("none (npm decides)")
                .to_string(),
            source: config
                .registry_source
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_else(|| "npm configuration".to_string()),
            backend,
            retry: format!(
                "{} attempts, {}ms apart{}",
                config.max_attempts,
                config.retry_delay.as_millis(),
                timeout
            ),
        })
    }
}

pub async fn execute(ctx: &CommandContext) -> ScoutResult<ExitCode> {
    let report = InfoReport::collect(&ctx.config)?;

    ctx.output.heading(&format!(
        "scout v{} (built {})",
        env!("CARGO_PKG_VERSION"),
        env!("BUILD_DATE")
    ));
    ctx.output.field("mode", &report.mode.to_string());
    ctx.output.field("registry", &report.registry.to_string());
    ctx.output.field("origin", &report.origin);
    ctx.output.field("source", &report.source);
    ctx.output.field("backend", &report.backend);
    ctx.output.field("retry", &report.retry);

    Ok(ExitCode::SUCCESS)
}
