//! scout.toml parsing
//!
//! Every field is optional at this layer so that several files can be stacked
//! on top of each other before defaults are filled in.

use camino::Utf8Path;
use scout_core::error::ScoutError;
use serde::{Deserialize, Serialize};

use crate::ConfigResult;

/// Contents of a single scout.toml file
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ScoutToml {
    /// Default registry origin; selects API mode when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registry: Option<String>,
    #[serde(default)]
    pub npm: NpmSection,
    #[serde(default)]
    pub retry: RetrySection,
    #[serde(default)]
    pub http: HttpSection,
}

/// `[npm]` section
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct NpmSection {
    /// Package-manager binary invoked in CLI mode
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub program: Option<String>,
}

/// `[retry]` section
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct RetrySection {
    /// Total attempts, including the first one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_attempts: Option<u32>,
    /// Fixed delay between attempts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay_ms: Option<u64>,
    /// Upper bound on a single attempt; unbounded when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attempt_timeout_ms: Option<u64>,
}

/// `[http]` section
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct HttpSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

impl ScoutToml {
    /// Layer `other` on top of `self`; fields set in `other` win
    pub fn merge(self, other: ScoutToml) -> ScoutToml {
        ScoutToml {
            registry: other.registry.or(self.registry),
            npm: NpmSection {
                program: other.npm.program.or(self.npm.program),
            },
            retry: RetrySection {
                max_attempts: other.retry.max_attempts.or(self.retry.max_attempts),
                delay_ms: other.retry.delay_ms.or(self.retry.delay_ms),
                attempt_timeout_ms: other
                    .retry
                    .attempt_timeout_ms
                    .or(self.retry.attempt_timeout_ms),
            },
            http: HttpSection {
                user_agent: other.http.user_agent.or(self.http.user_agent),
            },
        }
    }
}

/// Parse scout.toml content; `origin` names the source in error messages
pub fn parse_scout_toml(content: &str, origin: &str) -> ConfigResult<ScoutToml> {
    toml::from_str(content).map_err(|e| ScoutError::TomlParse {
        path: origin.to_string(),
        message: e.message().to_string(),
    })
}

/// Load and parse a scout.toml file
pub async fn load_from_file(path: &Utf8Path) -> ConfigResult<ScoutToml> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| ScoutError::io(format!("Failed to read {}", path), e))?;

    parse_scout_toml(&content, path.as_str())
}
