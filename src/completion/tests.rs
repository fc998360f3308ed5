use std::time::Duration;

use super::*;

#[test]
fn test_from_config_disabled_returns_none() {
    let config = CompletionConfig::default();
    assert!(GenaiCompletionClient::from_config(&config).is_none());
}

#[test]
fn test_from_config_enabled_uses_model_and_timeout() {
    let config = CompletionConfig {
        model: "gpt-4o".to_string(),
        timeout: Duration::from_secs(7),
        semantic_references: true,
        enabled: true,
    };

    let client = GenaiCompletionClient::from_config(&config).expect("enabled");
    assert_eq!(client.model(), "gpt-4o");
    assert_eq!(client.timeout(), Duration::from_secs(7));

    let other = client.with_model("gpt-3.5-turbo");
    assert_eq!(other.model(), "gpt-3.5-turbo");
    assert_eq!(other.timeout(), Duration::from_secs(7));
}

#[test]
fn test_request_constructor() {
    let req = CompletionRequest::new("sys", String::from("user"));
    assert_eq!(req.system, "sys");
    assert_eq!(req.user, "user");
}

#[tokio::test]
async fn test_mock_records_requests() {
    let client = MockCompletionClient::fixed("{\"ok\": true}");

    let reply = client
        .complete(&CompletionRequest::new("a", "b"))
        .await
        .unwrap();
    assert_eq!(reply, "{\"ok\": true}");

    client
        .complete(&CompletionRequest::new("c", "d"))
        .await
        .unwrap();

    assert_eq!(client.call_count(), 2);
    assert_eq!(client.requests().len(), 2);
    assert_eq!(client.last_request().unwrap().user, "d");
}

#[tokio::test]
async fn test_mock_failing() {
    let client = MockCompletionClient::failing().with_model("down");
    let err = client
        .complete(&CompletionRequest::new("a", "b"))
        .await
        .unwrap_err();

    assert!(matches!(err, CompletionError::Provider(_)));
    assert_eq!(client.model(), "down");
    assert_eq!(client.call_count(), 1);
}

#[test]
fn test_error_display() {
    let err = CompletionError::Timeout {
        elapsed: Duration::from_secs(3),
    };
    assert!(err.to_string().contains("timed out"));
    assert_eq!(
        CompletionError::EmptyResponse.to_string(),
        "provider returned no text content"
    );
}
