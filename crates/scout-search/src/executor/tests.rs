//! Unit tests for the retrying executor

use super::*;

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use scout_core::types::{PackageRecord, RegistryInfo, ServiceMode};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::service::{BackendSettings, SearchBackend};

/// Fails a fixed number of times, then returns one package named after the query
#[derive(Debug)]
struct FlakyBackend {
    failures: u32,
    calls: Arc<AtomicU32>,
}

#[async_trait]
impl SearchBackend for FlakyBackend {
    fn registry_info(&self) -> RegistryInfo {
        RegistryInfo::LocalConfiguration
    }

    async fn search(&self, query: &str, _options: &SearchOptions) -> ScoutResult<SearchResult> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if call <= self.failures {
            return Err(ScoutError::Subprocess {
                stderr: format!("failure {}", call),
            });
        }
        Ok(SearchResult::counted(vec![PackageRecord::new(
            query.to_string(),
            "1.0.0".to_string(),
        )]))
    }
}

/// Never answers within any reasonable timeout
#[derive(Debug)]
struct StalledBackend;

#[async_trait]
impl SearchBackend for StalledBackend {
    fn registry_info(&self) -> RegistryInfo {
        RegistryInfo::LocalConfiguration
    }

    async fn search(&self, _query: &str, _options: &SearchOptions) -> ScoutResult<SearchResult> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(SearchResult::counted(Vec::new()))
    }
}

fn flaky(failures: u32) -> (SearchService, Arc<AtomicU32>) {
    let calls = Arc::new(AtomicU32::new(0));
    let backend = FlakyBackend {
        failures,
        calls: Arc::clone(&calls),
    };
    (SearchService::from_backend(backend), calls)
}

fn fast_policy() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 3,
        delay: Duration::from_millis(10),
        attempt_timeout: None,
    }
}

#[test]
fn test_default_policy() {
    let policy = RetryPolicy::default();
    assert_eq!(policy.max_attempts, 3);
    assert_eq!(policy.delay, Duration::from_millis(1000));
    assert_eq!(policy.attempt_timeout, None);
}

#[test]
fn test_policy_from_config() {
    let config = ScoutConfig {
        max_attempts: 5,
        retry_delay: Duration::from_millis(20),
        attempt_timeout: Some(Duration::from_secs(4)),
        ..ScoutConfig::default()
    };

    let policy = RetryPolicy::from(&config);
    assert_eq!(policy.max_attempts, 5);
    assert_eq!(policy.delay, Duration::from_millis(20));
    assert_eq!(policy.attempt_timeout, Some(Duration::from_secs(4)));
}

#[test]
fn test_state_machine_transitions() {
    let policy = RetryPolicy::default();

    let state = RetryState::initial();
    assert_eq!(state, RetryState::Attempting(0));
    assert_eq!(state.on_success(), RetryState::Success);

    let state = state.on_failure(&policy);
    assert_eq!(state, RetryState::Attempting(1));
    let state = state.on_failure(&policy);
    assert_eq!(state, RetryState::Attempting(2));
    let state = state.on_failure(&policy);
    assert_eq!(state, RetryState::Failed);
    assert!(state.is_terminal());

    // Terminal states stay put
    assert_eq!(state.on_failure(&policy), RetryState::Failed);
    assert_eq!(state.on_success(), RetryState::Failed);
    assert_eq!(RetryState::Success.on_failure(&policy), RetryState::Success);
}

#[test]
fn test_single_attempt_policy() {
    let policy = RetryPolicy {
        max_attempts: 1,
        ..RetryPolicy::default()
    };
    assert_eq!(RetryState::initial().on_failure(&policy), RetryState::Failed);
}

#[test]
fn test_tool_output_serialization() {
    let ok = serde_json::to_value(ToolOutput::text("hi".to_string())).unwrap();
    assert_eq!(ok, serde_json::json!({"content": [{"type": "text", "text": "hi"}]}));

    let err = serde_json::to_value(ToolOutput::error("Error: x".to_string())).unwrap();
    assert_eq!(
        err,
        serde_json::json!({"content": [{"type": "text", "text": "Error: x"}], "isError": true})
    );
}

#[tokio::test]
async fn test_first_attempt_success() {
    let (service, calls) = flaky(0);
    let executor = SearchExecutor::with_policy(service, fast_policy());

    let decorated = executor.run("react", &SearchOptions::default()).await.unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(decorated.mode, ServiceMode::Cli);
    assert_eq!(decorated.registry, RegistryInfo::LocalConfiguration);
    assert_eq!(decorated.result.packages[0].name, "react");
}

#[tokio::test]
async fn test_recovers_on_last_attempt() {
    let (service, calls) = flaky(2);
    let executor = SearchExecutor::with_policy(service, fast_policy());

    let output = executor.execute("react", &SearchOptions::default()).await;
    assert!(!output.is_error);
    assert_eq!(calls.load(Ordering::SeqCst), 3);

    let json: serde_json::Value = serde_json::from_str(&output.text_content()).unwrap();
    assert_eq!(json["mode"], "cli");
    assert_eq!(json["registry"], "CLI mode - uses npm configuration");
    assert_eq!(json["total"], 1);
    assert_eq!(json["packages"][0]["name"], "react");
}

#[tokio::test]
async fn test_exhaustion_reports_last_error_and_attempts() {
    let (service, calls) = flaky(u32::MAX);
    let executor = SearchExecutor::with_policy(service, fast_policy());

    let output = executor.execute("react", &SearchOptions::default()).await;
    assert!(output.is_error);
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert_eq!(
        output.text_content(),
        "Error: npm search error: failure 3 (after 3 attempts)"
    );
}

#[tokio::test]
async fn test_http_500_is_retried_three_times() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/-/v1/search"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&mock_server)
        .await;

    let service = SearchService::with_default_registry(
        Some(&mock_server.uri()),
        None,
        &BackendSettings::default(),
    )
    .unwrap();
    let executor = SearchExecutor::with_policy(service, fast_policy());

    let output = executor.execute("react", &SearchOptions::default()).await;
    assert!(output.is_error);
    assert!(output.text_content().contains("after 3 attempts"));
    assert!(output.text_content().contains("500 Internal Server Error"));
}

#[tokio::test]
async fn test_api_success_is_decorated() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/-/v1/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "objects": [{"package": {"name": "vue", "version": "3.0.0"}}],
            "total": 1
        })))
        .mount(&mock_server)
        .await;

    let service = SearchService::with_default_registry(
        Some(&mock_server.uri()),
        None,
        &BackendSettings::default(),
    )
    .unwrap();
    let executor = SearchExecutor::with_policy(service, fast_policy());

    let output = executor.execute("vue", &SearchOptions::default()).await;
    assert!(!output.is_error);

    let json: serde_json::Value = serde_json::from_str(&output.text_content()).unwrap();
    assert_eq!(json["mode"], "api");
    assert_eq!(
        json["registry"],
        format!("API mode - {}/-/v1/search", mock_server.uri())
    );
}

#[tokio::test]
async fn test_validation_failure_makes_no_attempt() {
    let (service, calls) = flaky(0);
    let executor = SearchExecutor::with_policy(service, fast_policy());

    let output = executor.execute("   ", &SearchOptions::default()).await;
    assert!(output.is_error);
    assert_eq!(output.text_content(), "Error: Search query cannot be empty");

    let output = executor.execute("react", &SearchOptions::with_limit(101)).await;
    assert!(output.is_error);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_attempt_timeout() {
    let policy = RetryPolicy {
        max_attempts: 2,
        delay: Duration::from_millis(1),
        attempt_timeout: Some(Duration::from_millis(20)),
    };
    let executor = SearchExecutor::with_policy(SearchService::from_backend(StalledBackend), policy);

    let err = executor.run("react", &SearchOptions::default()).await.unwrap_err();
    match err {
        ScoutError::RetryExhausted { attempts, source } => {
            assert_eq!(attempts, 2);
            assert!(matches!(*source, ScoutError::Timeout { .. }));
        }
        other => panic!("Expected RetryExhausted error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_retry_delay_does_not_block_other_searches() {
    let slow_policy = RetryPolicy {
        max_attempts: 3,
        delay: Duration::from_millis(500),
        attempt_timeout: None,
    };
    let (failing, _) = flaky(u32::MAX);
    let failing = SearchExecutor::with_policy(failing, slow_policy);
    let background = tokio::spawn(async move {
        failing.execute("always-fails", &SearchOptions::default()).await
    });

    // Let the failing search enter its retry delay
    tokio::time::sleep(Duration::from_millis(20)).await;

    let (healthy, _) = flaky(0);
    let healthy = SearchExecutor::with_policy(healthy, fast_policy());
    let output = tokio::time::timeout(
        Duration::from_millis(250),
        healthy.execute("react", &SearchOptions::default()),
    )
    .await
    .expect("healthy search should not wait for the other search's retry delay");
    assert!(!output.is_error);

    assert!(background.await.unwrap().is_error);
}

#[tokio::test]
async fn test_repeated_searches_are_idempotent() {
    let (service, _) = flaky(0);
    let executor = SearchExecutor::new(service);

    let first = executor.run("react", &SearchOptions::default()).await.unwrap();
    let second = executor.run("react", &SearchOptions::default()).await.unwrap();

    assert_eq!(first.result.packages, second.result.packages);
    assert_eq!(first.result.total, second.result.total);
}
