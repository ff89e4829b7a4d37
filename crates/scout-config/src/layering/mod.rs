//! Configuration layering, fallback logic, and environment overrides

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use camino::Utf8PathBuf;
use scout_core::error::ScoutError;
use tracing::debug;

use crate::file::{self, ScoutToml};
use crate::ConfigResult;

/// Public npm registry origin
pub const DEFAULT_REGISTRY: &str = "https://registry.npmjs.org";

/// Environment variable holding the default registry origin
pub const REGISTRY_ENV: &str = "NPM_REGISTRY_URL";

const PROGRAM_ENV: &str = "SCOUT_NPM_PROGRAM";
const MAX_ATTEMPTS_ENV: &str = "SCOUT_MAX_ATTEMPTS";
const RETRY_DELAY_ENV: &str = "SCOUT_RETRY_DELAY_MS";
const ATTEMPT_TIMEOUT_ENV: &str = "SCOUT_ATTEMPT_TIMEOUT_MS";

const ENV_KEYS: [&str; 5] = [
    REGISTRY_ENV,
    PROGRAM_ENV,
    MAX_ATTEMPTS_ENV,
    RETRY_DELAY_ENV,
    ATTEMPT_TIMEOUT_ENV,
];

const DEFAULT_MAX_ATTEMPTS: u32 = 3;
const DEFAULT_RETRY_DELAY_MS: u64 = 1000;

#[cfg(windows)]
const DEFAULT_NPM_PROGRAM: &str = "npm.cmd";
#[cfg(not(windows))]
const DEFAULT_NPM_PROGRAM: &str = "npm";

/// Fully resolved configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ScoutConfig {
    /// Registry origin given explicitly on the command line
    pub explicit_registry: Option<String>,
    /// Registry origin from the environment or a config file
    pub default_registry: Option<String>,
    /// Where the effective registry origin came from, if any
    pub registry_source: Option<ConfigSource>,
    /// Package-manager binary for CLI mode
    pub npm_program: String,
    /// Total search attempts, including the first
    pub max_attempts: u32,
    /// Fixed pause between attempts
    pub retry_delay: Duration,
    /// Optional bound on each attempt
    pub attempt_timeout: Option<Duration>,
    /// User agent for registry requests
    pub user_agent: String,
}

/// Configuration source tracking
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    /// Global config file
    Global(Utf8PathBuf),
    /// Config file passed with --config
    File(Utf8PathBuf),
    /// Environment variable
    Environment(String),
    /// CLI flag
    CommandLine,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::Global(path) => write!(f, "global config ({})", path),
            ConfigSource::File(path) => write!(f, "config file ({})", path),
            ConfigSource::Environment(key) => write!(f, "environment ({})", key),
            ConfigSource::CommandLine => f.write_str("command line"),
        }
    }
}

/// Main configuration loading interface
#[derive(Debug, Default)]
pub struct ConfigLoader {
    /// Config file named on the command line
    explicit_file: Option<Utf8PathBuf>,
    /// Whether to look for ~/.scout/config.toml
    use_global: bool,
    /// Environment overrides
    env_overrides: HashMap<String, String>,
    /// Registry origin from the command line
    registry_flag: Option<String>,
}

impl ScoutConfig {
    /// The registry origin that should drive mode selection, if any
    pub fn effective_registry(&self) -> Option<&str> {
        self.explicit_registry
            .as_deref()
            .or(self.default_registry.as_deref())
    }
}

impl Default for ScoutConfig {
    fn default() -> Self {
        Self {
            explicit_registry: None,
            default_registry: None,
            registry_source: None,
            npm_program: DEFAULT_NPM_PROGRAM.to_string(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_delay: Duration::from_millis(DEFAULT_RETRY_DELAY_MS),
            attempt_timeout: None,
            user_agent: concat!("scout/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ConfigLoader {
    /// Create a loader that reads the global file and the process environment
    pub fn new() -> Self {
        let env_overrides = ENV_KEYS
            .iter()
            .filter_map(|key| std::env::var(key).ok().map(|value| (key.to_string(), value)))
            .collect();

        Self {
            explicit_file: None,
            use_global: true,
            env_overrides,
            registry_flag: None,
        }
    }

    /// Create a loader that ignores the global file and the process environment
    pub fn isolated() -> Self {
        Self::default()
    }

    /// Read an additional config file on top of the global one
    pub fn with_file(mut self, path: Option<Utf8PathBuf>) -> Self {
        self.explicit_file = path;
        self
    }

    /// Replace the captured environment
    pub fn with_env(mut self, env: HashMap<String, String>) -> Self {
        self.env_overrides = env;
        self
    }

    /// Registry origin given on the command line
    pub fn with_registry_flag(mut self, registry: Option<String>) -> Self {
        self.registry_flag = registry;
        self
    }

    /// Location of the global configuration file
    pub fn global_config_path() -> ConfigResult<Utf8PathBuf> {
        let home_dir = dirs::home_dir().ok_or_else(|| ScoutError::ConfigValidation {
            field: "home_dir".to_string(),
            reason: "Could not determine home directory".to_string(),
        })?;

        let home_dir = Utf8PathBuf::try_from(home_dir).map_err(|e| ScoutError::ConfigValidation {
            field: "home_dir".to_string(),
            reason: format!("Invalid home directory path: {}", e),
        })?;

        Ok(home_dir.join(".scout").join("config.toml"))
    }

    /// Load every layer and resolve defaults
    pub async fn load(&self) -> ConfigResult<ScoutConfig> {
        let mut merged = ScoutToml::default();
        let mut file_registry_source = None;

        if self.use_global {
            if let Ok(path) = Self::global_config_path() {
                if path.exists() {
                    debug!("Loading global config from {}", path);
                    let global = file::load_from_file(&path).await?;
                    if global.registry.is_some() {
                        file_registry_source = Some(ConfigSource::Global(path));
                    }
                    merged = merged.merge(global);
                }
            }
        }

        if let Some(path) = &self.explicit_file {
            debug!("Loading config from {}", path);
            let explicit = file::load_from_file(path).await?;
            if explicit.registry.is_some() {
                file_registry_source = Some(ConfigSource::File(path.clone()));
            }
            merged = merged.merge(explicit);
        }

        Self::resolve(merged, file_registry_source, &self.env_overrides, self.registry_flag.as_deref())
    }

    /// Apply environment and flag overrides to merged file layers, then validate
    pub fn resolve(
        merged: ScoutToml,
        file_registry_source: Option<ConfigSource>,
        env_overrides: &HashMap<String, String>,
        registry_flag: Option<&str>,
    ) -> ConfigResult<ScoutConfig> {
        let mut config = ScoutConfig::default();

        let mut default_registry = non_blank(merged.registry.as_deref());
        let mut registry_source = default_registry.as_ref().and(file_registry_source);

        if let Some(program) = non_blank(merged.npm.program.as_deref()) {
            config.npm_program = program;
        }
        if let Some(max_attempts) = merged.retry.max_attempts {
            config.max_attempts = max_attempts;
        }
        if let Some(delay_ms) = merged.retry.delay_ms {
            config.retry_delay = Duration::from_millis(delay_ms);
        }
        config.attempt_timeout = merged.retry.attempt_timeout_ms.map(Duration::from_millis);
        if let Some(user_agent) = non_blank(merged.http.user_agent.as_deref()) {
            config.user_agent = user_agent;
        }

        // Environment variable overrides
        for (key, value) in env_overrides {
            match key.as_str() {
                REGISTRY_ENV => {
                    if let Some(registry) = non_blank(Some(value)) {
                        default_registry = Some(registry);
                        registry_source = Some(ConfigSource::Environment(key.clone()));
                    }
                }
                PROGRAM_ENV => {
                    if let Some(program) = non_blank(Some(value)) {
                        config.npm_program = program;
                    }
                }
                MAX_ATTEMPTS_ENV => {
                    config.max_attempts = parse_env(key, value)?;
                }
                RETRY_DELAY_ENV => {
                    config.retry_delay = Duration::from_millis(parse_env(key, value)?);
                }
                ATTEMPT_TIMEOUT_ENV => {
                    config.attempt_timeout = Some(Duration::from_millis(parse_env(key, value)?));
                }
                _ => {
                    // Unknown environment variable, ignore
                }
            }
        }

        // CLI flag overrides (highest priority)
        let explicit_registry = non_blank(registry_flag);
        if explicit_registry.is_some() {
            registry_source = Some(ConfigSource::CommandLine);
        }

        config.explicit_registry = explicit_registry;
        config.default_registry = default_registry;
        config.registry_source = registry_source;

        validate_config(&config)?;
        Ok(config)
    }
}

/// Check resolved values for consistency
pub fn validate_config(config: &ScoutConfig) -> ConfigResult<()> {
    if config.max_attempts == 0 {
        return Err(ScoutError::ConfigValidation {
            field: "retry.max_attempts".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }

    if config.npm_program.trim().is_empty() {
        return Err(ScoutError::ConfigValidation {
            field: "npm.program".to_string(),
            reason: "must not be empty".to_string(),
        });
    }

    if let Some(timeout) = config.attempt_timeout {
        if timeout.is_zero() {
            return Err(ScoutError::ConfigValidation {
                field: "retry.attempt_timeout_ms".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
    }

    for (field, registry) in [
        ("registry", config.default_registry.as_deref()),
        ("--registry", config.explicit_registry.as_deref()),
    ] {
        if let Some(registry) = registry {
            validate_registry_url(field, registry)?;
        }
    }

    Ok(())
}

fn validate_registry_url(field: &str, registry: &str) -> ConfigResult<()> {
    let parsed = url::Url::parse(registry).map_err(|e| ScoutError::ConfigValidation {
        field: field.to_string(),
        reason: format!("'{}' is not a valid URL: {}", registry, e),
    })?;

    match parsed.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(ScoutError::ConfigValidation {
            field: field.to_string(),
            reason: format!("unsupported scheme '{}', expected http or https", scheme),
        }),
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> ConfigResult<T>
where
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ScoutError::ConfigValidation {
        field: key.to_string(),
        reason: format!("Invalid value '{}' in {}: {}", value, key, e),
    })
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
