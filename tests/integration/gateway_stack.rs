//! Retry decorator over a scripted backend, and the executor on top of it.

use super::test_utils::valid_replies;
use whodunit::error::ApiError;
use whodunit::gateway::{CompletionGateway, RetryConfig, RetryingGateway, ScriptedGateway};
use whodunit::pipeline::{NullObserver, PipelineConfig, PipelineExecutor};

fn quick_retries(max_retry_attempts: usize) -> RetryConfig {
    RetryConfig {
        max_retry_attempts,
        retry_delay_ms: 1,
    }
}

fn stack(scripted: ScriptedGateway, retries: usize) -> RetryingGateway<ScriptedGateway> {
    RetryingGateway::new(scripted, quick_retries(retries))
}

#[tokio::test]
async fn test_transient_error_then_success() {
    let scripted = ScriptedGateway::new();
    scripted.push_error(ApiError::GenerationUnavailable("connection reset".into()));
    scripted.push_response(r#"{"ok": true}"#);
    let gateway = stack(scripted, 2);

    let first = gateway.complete("persona", "prompt").await.unwrap();
    assert_eq!(first, r#"{"ok": true}"#);
    assert_eq!(gateway.inner().call_count(), 2);
}

#[tokio::test]
async fn test_auth_failure_is_not_retried() {
    let scripted = ScriptedGateway::new();
    scripted.push_error(ApiError::ProviderAuthFailed("invalid key".into()));
    scripted.push_response("{}");
    let gateway = stack(scripted, 3);

    let err = gateway.complete("persona", "prompt").await.unwrap_err();
    assert!(matches!(err, ApiError::ProviderAuthFailed(_)));
    assert_eq!(gateway.inner().call_count(), 1);

    // The next call reaches the backend again.
    assert_eq!(gateway.complete("persona", "prompt").await.unwrap(), "{}");
    assert_eq!(gateway.inner().call_count(), 2);
}

#[tokio::test]
async fn test_retries_are_bounded() {
    let scripted = ScriptedGateway::new();
    for _ in 0..5 {
        scripted.push_error(ApiError::ProviderRateLimit("429".into()));
    }
    let gateway = stack(scripted, 2);

    let err = gateway.complete("persona", "prompt").await.unwrap_err();
    assert!(matches!(err, ApiError::ProviderRateLimit(_)));
    assert_eq!(gateway.inner().call_count(), 3);
    assert_eq!(gateway.inner().remaining(), 2);
}

#[tokio::test]
async fn test_boxed_stack_is_a_gateway() {
    let scripted = ScriptedGateway::with_responses(["{}"]);
    let boxed: Box<dyn CompletionGateway> = Box::new(stack(scripted, 0));
    assert_eq!(boxed.gateway_name(), "scripted");
    assert_eq!(boxed.complete("a", "b").await.unwrap(), "{}");
}

#[tokio::test]
async fn test_second_run_asks_the_backend_again() {
    let scripted = ScriptedGateway::with_responses(valid_replies());
    for reply in valid_replies() {
        scripted.push_response(reply);
    }
    let executor = PipelineExecutor::new(stack(scripted, 0), PipelineConfig::default());

    let first = executor.run(&mut NullObserver).await.unwrap();
    let second = executor.run(&mut NullObserver).await.unwrap();
    assert!(first.is_done());
    assert!(second.is_done());
    assert_eq!(executor.gateway().inner().call_count(), 10);
    assert_eq!(executor.gateway().inner().remaining(), 0);
}
