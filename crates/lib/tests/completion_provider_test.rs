//! Provider wire-format tests against a mock completion endpoint.

use rfpnav::providers::completion::{
    gemini::GeminiProvider, openai::OpenAiProvider, ChatMessage, CompletionProvider,
    SamplingConfig, QUERY_MAX_TOKENS,
};
use rfpnav::NavigatorError;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::test]
async fn openai_provider_sends_sampling_params_and_trims_the_reply() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_partial_json(json!({
            "model": "gpt-4o-mini",
            "max_tokens": 300,
            "stream": false,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": "  The budget is $1M.  "}}]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let provider = OpenAiProvider::new(
        format!("{}/v1/chat/completions", mock_server.uri()),
        Some("test-key".to_string()),
        TIMEOUT,
    )
    .unwrap();

    let sampling = SamplingConfig::default().with_max_tokens(QUERY_MAX_TOKENS);
    let result = provider
        .complete("system", &[], "What is the budget?", &sampling)
        .await
        .unwrap();

    assert_eq!(result, "The budget is $1M.");
}

#[tokio::test]
async fn openai_provider_folds_context_between_system_and_user() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_partial_json(json!({
            "messages": [
                {"role": "system", "content": "sys"},
                {"role": "user", "content": "earlier question"},
                {"role": "assistant", "content": "earlier answer"},
                {"role": "user", "content": "now"},
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": "ok"}}]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let provider = OpenAiProvider::new(
        format!("{}/v1/chat/completions", mock_server.uri()),
        None,
        TIMEOUT,
    )
    .unwrap();
    let context = vec![
        ChatMessage::user("earlier question"),
        ChatMessage::assistant("earlier answer"),
    ];
    let result = provider
        .complete("sys", &context, "now", &SamplingConfig::default())
        .await
        .unwrap();
    assert_eq!(result, "ok");
}

#[tokio::test]
async fn openai_provider_surfaces_api_errors_without_retrying() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_string("rate limit exceeded"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let provider = OpenAiProvider::new(mock_server.uri(), None, TIMEOUT).unwrap();
    let err = provider
        .complete("sys", &[], "q", &SamplingConfig::default())
        .await
        .unwrap_err();

    match err {
        NavigatorError::CompletionApi(msg) => assert!(msg.contains("rate limit")),
        other => panic!("expected CompletionApi, got {other:?}"),
    }
}

#[tokio::test]
async fn openai_provider_reports_malformed_responses() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&mock_server)
        .await;

    let provider = OpenAiProvider::new(mock_server.uri(), None, TIMEOUT).unwrap();
    let err = provider
        .complete("sys", &[], "q", &SamplingConfig::default())
        .await
        .unwrap_err();
    assert!(matches!(err, NavigatorError::CompletionDeserialization(_)));
}

#[tokio::test]
async fn openai_provider_reports_transport_failures() {
    // Nothing is listening on this port.
    let provider = OpenAiProvider::new(
        "http://127.0.0.1:9".to_string(),
        None,
        Duration::from_millis(500),
    )
    .unwrap();
    let err = provider
        .complete("sys", &[], "q", &SamplingConfig::default())
        .await
        .unwrap_err();
    assert!(matches!(err, NavigatorError::CompletionRequest(_)));
}

#[tokio::test]
async fn gemini_provider_maps_roles_and_reads_candidates() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini:generateContent"))
        .and(query_param("key", "gemini-key"))
        .and(body_partial_json(json!({
            "systemInstruction": {"parts": [{"text": "sys"}]},
            "contents": [
                {"role": "user", "parts": [{"text": "earlier"}]},
                {"role": "model", "parts": [{"text": "reply"}]},
                {"role": "user", "parts": [{"text": "now"}]},
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{"content": {"parts": [{"text": "from gemini"}]}}]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let provider = GeminiProvider::new(
        format!("{}/v1beta/models/gemini:generateContent", mock_server.uri()),
        "gemini-key".to_string(),
        TIMEOUT,
    )
    .unwrap();

    let context = vec![ChatMessage::user("earlier"), ChatMessage::assistant("reply")];
    let result = provider
        .complete("sys", &context, "now", &SamplingConfig::default())
        .await
        .unwrap();
    assert_eq!(result, "from gemini");
}
