//! Retrying search execution
//!
//! [`SearchExecutor`] is the only retry boundary in the crate and the only
//! place where a failed search is turned into a non-throwing payload.
//! Attempts run strictly one after another; the pause between them is an
//! async sleep, so other in-flight searches keep running.
//!
//! Progress through the attempts is modelled by [`RetryState`]:
//!
//! ```text
//! Attempting(n) --ok--> Success
//! Attempting(n) --err, n+1 < max--> Attempting(n+1)
//! Attempting(n) --err, n+1 = max--> Failed
//! ```

use std::time::Duration;

use scout_config::ScoutConfig;
use scout_core::error::{ScoutError, ScoutResult};
use scout_core::types::{DecoratedResult, SearchOptions, SearchResult};
use scout_core::utils::{validate_options, validate_query};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::service::SearchService;

/// Retry policy: fixed delay, no backoff, no jitter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,
    /// Pause between attempts
    pub delay: Duration,
    /// Optional bound on a single attempt
    pub attempt_timeout: Option<Duration>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_millis(1000),
            attempt_timeout: None,
        }
    }
}

impl From<&ScoutConfig> for RetryPolicy {
    fn from(config: &ScoutConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            delay: config.retry_delay,
            attempt_timeout: config.attempt_timeout,
        }
    }
}

/// Where an execution stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryState {
    /// About to make an attempt; the value counts failed attempts so far
    Attempting(u32),
    Success,
    Failed,
}

impl RetryState {
    /// State before the first attempt
    pub fn initial() -> Self {
        RetryState::Attempting(0)
    }

    /// Transition after a successful attempt
    pub fn on_success(self) -> Self {
        match self {
            RetryState::Attempting(_) => RetryState::Success,
            terminal => terminal,
        }
    }

    /// Transition after a failed attempt
    pub fn on_failure(self, policy: &RetryPolicy) -> Self {
        match self {
            RetryState::Attempting(failed) => {
                let failed = failed + 1;
                if failed >= policy.max_attempts {
                    RetryState::Failed
                } else {
                    RetryState::Attempting(failed)
                }
            }
            terminal => terminal,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, RetryState::Attempting(_))
    }
}

/// One block of tool output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentBlock {
    Text { text: String },
}

/// Payload handed back to the transport layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolOutput {
    pub content: Vec<ContentBlock>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,
}

impl ToolOutput {
    /// Successful text payload
    pub fn text(text: String) -> Self {
        Self {
            content: vec![ContentBlock::Text { text }],
            is_error: false,
        }
    }

    /// Error payload
    pub fn error(message: String) -> Self {
        Self {
            content: vec![ContentBlock::Text { text: message }],
            is_error: true,
        }
    }

    /// Concatenated text of all blocks
    pub fn text_content(&self) -> String {
        self.content
            .iter()
            .map(|block| match block {
                ContentBlock::Text { text } => text.as_str(),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Runs searches with validation and bounded retries
#[derive(Debug, Clone)]
pub struct SearchExecutor {
    service: SearchService,
    policy: RetryPolicy,
}

impl SearchExecutor {
    /// Create an executor with the default policy
    pub fn new(service: SearchService) -> Self {
        Self::with_policy(service, RetryPolicy::default())
    }

    /// Create an executor with a custom policy
    pub fn with_policy(service: SearchService, policy: RetryPolicy) -> Self {
        Self { service, policy }
    }

    pub fn service(&self) -> &SearchService {
        &self.service
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Run a search and package the outcome as a tool payload; never fails
    pub async fn execute(&self, query: &str, options: &SearchOptions) -> ToolOutput {
        match self.run(query, options).await {
            Ok(decorated) => match decorated.to_json_pretty() {
                Ok(text) => ToolOutput::text(text),
                Err(e) => ToolOutput::error(format!("Error: failed to serialize search result: {}", e)),
            },
            Err(err) => ToolOutput::error(format!("Error: {}", err)),
        }
    }

    /// Run a search with retries and decorate the result with its provenance
    ///
    /// Validation failures are returned immediately without any attempt.
    /// Once every attempt has failed the last error is wrapped in
    /// [`ScoutError::RetryExhausted`].
    pub async fn run(&self, query: &str, options: &SearchOptions) -> ScoutResult<DecoratedResult> {
        if let Err(err) = validate_query(query).and_then(|_| validate_options(options)) {
            error!("Rejected search request: {}", err);
            return Err(err);
        }

        let max_attempts = self.policy.max_attempts;
        let mut state = RetryState::initial();
        let mut attempt = 1;

        loop {
            info!("Executing search (attempt {}/{}): {}", attempt, max_attempts, query);

            match self.attempt(query, options).await {
                Ok(result) => {
                    info!(state = ?state.on_success(), "Search completed successfully for query: {}", query);
                    return Ok(DecoratedResult {
                        result,
                        mode: self.service.mode(),
                        registry: self.service.registry_info(),
                    });
                }
                Err(err) => {
                    error!(
                        recoverable = err.is_recoverable(),
                        "Search attempt {}/{} failed: {}", attempt, max_attempts, err
                    );

                    state = state.on_failure(&self.policy);
                    let RetryState::Attempting(failed) = state else {
                        error!(state = ?state, "Max retry attempts reached for query: {}", query);
                        return Err(ScoutError::RetryExhausted {
                            attempts: attempt,
                            source: Box::new(err),
                        });
                    };

                    attempt = failed + 1;
                    info!("Retrying search in {}ms...", self.policy.delay.as_millis());
                    tokio::time::sleep(self.policy.delay).await;
                }
            }
        }
    }

    async fn attempt(&self, query: &str, options: &SearchOptions) -> ScoutResult<SearchResult> {
        match self.policy.attempt_timeout {
            Some(limit) => tokio::time::timeout(limit, self.service.search(query, options))
                .await
                .map_err(|_| ScoutError::Timeout { elapsed: limit })?,
            None => self.service.search(query, options).await,
        }
    }
}

#[cfg(test)]
mod tests;
