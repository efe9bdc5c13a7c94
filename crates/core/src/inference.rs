//! Chat-completion client.
//!
//! [`ChatCompletion`] is the seam between the request handlers and the hosted model. The
//! production implementation, [`GroqClient`], speaks the OpenAI-compatible
//! `/chat/completions` protocol that Groq exposes. No retries are attempted; failures are
//! classified into [`InferenceError`] variants so callers can tell transient from permanent
//! problems.

use crate::config::InferenceConfig;
use crate::prompt::{ChatMessage, CompletionRequest};
use crate::{CoreError, CoreResult, InferenceError, InferenceResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::Instrument;

/// Sends a prompt to a hosted model and returns the reply text.
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> InferenceResult<String>;

    /// Model identifier used for requests.
    fn model(&self) -> &str;

    /// Whether credentials are present. An unconfigured client fails every call.
    fn is_configured(&self) -> bool;
}

/// Client for Groq's OpenAI-compatible chat-completion API.
#[derive(Clone, Debug)]
pub struct GroqClient {
    client: reqwest::Client,
    config: InferenceConfig,
}

#[derive(Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct ApiResponse {
    choices: Vec<ApiChoice>,
}

#[derive(Deserialize)]
struct ApiChoice {
    message: ApiMessage,
}

#[derive(Deserialize)]
struct ApiMessage {
    content: Option<String>,
}

impl GroqClient {
    /// Build the client. The timeout from `config` applies to every request.
    pub fn new(config: InferenceConfig) -> CoreResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| CoreError::InvalidConfig(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.base_url())
    }

    fn classify(&self, err: reqwest::Error) -> InferenceError {
        if err.is_timeout() {
            InferenceError::Timeout(self.config.timeout().as_secs())
        } else if err.is_decode() {
            InferenceError::MalformedResponse(err.to_string())
        } else {
            InferenceError::Transport(err)
        }
    }

    async fn send(&self, api_key: &str, request: &CompletionRequest) -> InferenceResult<String> {
        let body = ApiRequest {
            model: self.config.model(),
            messages: &request.messages,
            temperature: request.sampling.temperature,
            max_tokens: request.sampling.max_tokens,
        };

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(match status.as_u16() {
                code @ (401 | 403) => InferenceError::Unauthorized(code),
                429 => InferenceError::RateLimited,
                code => InferenceError::Upstream { status: code, body },
            });
        }

        let parsed: ApiResponse = response.json().await.map_err(|e| self.classify(e))?;

        parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| InferenceError::MalformedResponse("response contained no choices".into()))?
            .message
            .content
            .ok_or_else(|| {
                InferenceError::MalformedResponse("first choice has no message content".into())
            })
    }
}

#[async_trait]
impl ChatCompletion for GroqClient {
    async fn complete(&self, request: &CompletionRequest) -> InferenceResult<String> {
        let api_key = self
            .config
            .api_key()
            .ok_or(InferenceError::NotConfigured)?;

        let request_id = uuid::Uuid::new_v4();
        let span = tracing::info_span!("inference", %request_id, model = %self.config.model());

        async move {
            let started = Instant::now();
            let result = self.send(api_key, request).await;
            let elapsed_ms = started.elapsed().as_millis() as u64;

            match &result {
                Ok(reply) => {
                    tracing::info!(elapsed_ms, reply_chars = reply.len(), "inference completed")
                }
                Err(e) => tracing::warn!(
                    elapsed_ms,
                    transient = e.is_transient(),
                    "inference failed: {}",
                    e
                ),
            }

            result
        }
        .instrument(span)
        .await
    }

    fn model(&self) -> &str {
        self.config.model()
    }

    fn is_configured(&self) -> bool {
        self.config.api_key().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::build_chat_prompt;
    use axum::{
        extract::State,
        http::{HeaderMap, StatusCode},
        response::IntoResponse,
        routing::post,
        Json, Router,
    };
    use hai_types::NonEmptyText;
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    type Captured = Arc<Mutex<Option<(HeaderMap, Value)>>>;

    async fn spawn_upstream(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}/openai/v1")
    }

    fn client_for(base_url: String, api_key: Option<&str>, timeout_secs: u64) -> GroqClient {
        let config = InferenceConfig::new(
            api_key.map(str::to_string),
            base_url,
            "llama3-8b-8192".into(),
            Duration::from_secs(timeout_secs),
        )
        .unwrap();
        GroqClient::new(config).unwrap()
    }

    fn fever_request() -> CompletionRequest {
        build_chat_prompt(&NonEmptyText::new("What is fever?").unwrap())
    }

    async fn upstream_with_status(status: StatusCode, body: &'static str) -> String {
        spawn_upstream(Router::new().route(
            "/openai/v1/chat/completions",
            post(move || async move { (status, body).into_response() }),
        ))
        .await
    }

    #[tokio::test]
    async fn test_complete_returns_first_choice_and_sends_expected_body() {
        let captured: Captured = Arc::default();
        let router = Router::new()
            .route(
                "/openai/v1/chat/completions",
                post(
                    |State(captured): State<Captured>, headers: HeaderMap, Json(body): Json<Value>| async move {
                        *captured.lock().unwrap() = Some((headers, body));
                        Json(json!({
                            "choices": [
                                {"message": {"role": "assistant", "content": "Fever is a raised temperature."}},
                                {"message": {"role": "assistant", "content": "ignored"}}
                            ]
                        }))
                    },
                ),
            )
            .with_state(captured.clone());
        let client = client_for(spawn_upstream(router).await, Some("gsk_test"), 5);

        let reply = client.complete(&fever_request()).await.unwrap();
        assert_eq!(reply, "Fever is a raised temperature.");

        let (headers, body) = captured.lock().unwrap().take().expect("request captured");
        assert_eq!(
            headers.get("authorization").unwrap().to_str().unwrap(),
            "Bearer gsk_test"
        );
        assert_eq!(body["model"], json!("llama3-8b-8192"));
        assert_eq!(body["max_tokens"], json!(400));
        assert!((body["temperature"].as_f64().unwrap() - 0.2).abs() < 1e-6);
        assert_eq!(body["messages"][0]["role"], json!("system"));
        assert_eq!(body["messages"][1], json!({"role": "user", "content": "What is fever?"}));
    }

    #[tokio::test]
    async fn test_missing_api_key_fails_without_network() {
        // Nothing listens on this port; the call must fail before connecting.
        let client = client_for("http://127.0.0.1:9".into(), None, 5);
        assert!(!client.is_configured());

        let err = client.complete(&fever_request()).await.expect_err("not configured");
        assert!(matches!(err, InferenceError::NotConfigured));
    }

    #[tokio::test]
    async fn test_status_codes_are_classified() {
        let base = upstream_with_status(StatusCode::UNAUTHORIZED, "invalid api key").await;
        let err = client_for(base, Some("bad"), 5)
            .complete(&fever_request())
            .await
            .expect_err("401");
        assert!(matches!(err, InferenceError::Unauthorized(401)));

        let base = upstream_with_status(StatusCode::TOO_MANY_REQUESTS, "slow down").await;
        let err = client_for(base, Some("k"), 5)
            .complete(&fever_request())
            .await
            .expect_err("429");
        assert!(matches!(err, InferenceError::RateLimited));
        assert!(err.is_transient());

        let base = upstream_with_status(StatusCode::INTERNAL_SERVER_ERROR, "boom").await;
        let err = client_for(base, Some("k"), 5)
            .complete(&fever_request())
            .await
            .expect_err("500");
        assert!(
            matches!(&err, InferenceError::Upstream { status: 500, body } if body == "boom")
        );
    }

    #[tokio::test]
    async fn test_malformed_bodies_are_reported() {
        let base = upstream_with_status(StatusCode::OK, "not json").await;
        let err = client_for(base, Some("k"), 5)
            .complete(&fever_request())
            .await
            .expect_err("bad body");
        assert!(matches!(err, InferenceError::MalformedResponse(_)));

        let base = upstream_with_status(StatusCode::OK, r#"{"choices": []}"#).await;
        let err = client_for(base, Some("k"), 5)
            .complete(&fever_request())
            .await
            .expect_err("no choices");
        assert!(matches!(err, InferenceError::MalformedResponse(msg) if msg.contains("no choices")));
    }

    #[tokio::test]
    async fn test_slow_upstream_times_out() {
        let router = Router::new().route(
            "/openai/v1/chat/completions",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Json(json!({"choices": [{"message": {"content": "late"}}]}))
            }),
        );
        let client = client_for(spawn_upstream(router).await, Some("k"), 1);

        let err = client.complete(&fever_request()).await.expect_err("timeout");
        assert!(matches!(err, InferenceError::Timeout(1)));
    }
}
