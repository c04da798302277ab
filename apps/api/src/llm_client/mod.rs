/// LLM Client — the single point of entry for all generation-service calls in Mumblr.
///
/// ARCHITECTURAL RULE: No other module may call the chat completions API directly.
/// Everything goes through the `TextGenerator` trait, implemented here by `LlmClient`.
///
/// Upstream failures are never retried here. The service is metered, so a failed
/// call is surfaced to the client, which decides whether to try again.
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::config::Config;

pub mod prompts;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Timed out after {secs}s waiting for the generation service")]
    Timeout { secs: u64 },

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// Anything that can turn a system + user prompt pair into generated text.
///
/// Carried in `AppState` as `Arc<dyn TextGenerator>`.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, system: &str, user: &str) -> Result<String, LlmError>;

    /// Model identifier, for logs and the health route.
    fn model(&self) -> &str;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<i64>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub choices: Vec<Choice>,
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl ChatResponse {
    /// Extracts the text of the first choice, if it has any.
    pub fn text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .filter(|t| !t.trim().is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct OpenAiError {
    error: OpenAiErrorBody,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorBody {
    message: String,
}

/// Client for an OpenAI-compatible chat completions endpoint.
/// Sampling settings come from `Config` and are fixed for the life of the process.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    endpoint: String,
    model: String,
    temperature: f32,
    seed: Option<i64>,
    max_tokens: u32,
    timeout: Duration,
}

impl LlmClient {
    pub fn new(config: &Config) -> Result<Self> {
        Self::with_timeout(config, Duration::from_secs(config.upstream_timeout_secs))
    }

    pub fn with_timeout(config: &Config, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            api_key: config.openai_api_key.clone(),
            endpoint: format!("{}/chat/completions", config.openai_base_url),
            model: config.model.clone(),
            temperature: config.temperature,
            seed: config.seed,
            max_tokens: config.max_tokens,
            timeout,
        })
    }

    fn request_body<'a>(&'a self, system: &'a str, user: &'a str) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            seed: self.seed,
        }
    }

    fn map_transport_error(&self, err: reqwest::Error) -> LlmError {
        if err.is_timeout() {
            LlmError::Timeout {
                secs: self.timeout.as_secs(),
            }
        } else {
            LlmError::Http(err)
        }
    }

    /// Makes one call to the chat completions API, returning the full response object.
    pub async fn call(&self, system: &str, user: &str) -> Result<ChatResponse, LlmError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&self.request_body(system, user))
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<OpenAiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        if let Some(usage) = &chat_response.usage {
            debug!(
                "LLM call succeeded: prompt_tokens={}, completion_tokens={}",
                usage.prompt_tokens, usage.completion_tokens
            );
        }

        Ok(chat_response)
    }
}

#[async_trait]
impl TextGenerator for LlmClient {
    async fn generate(&self, system: &str, user: &str) -> Result<String, LlmError> {
        let response = self.call(system, user).await?;
        response
            .text()
            .map(str::to_string)
            .ok_or(LlmError::EmptyContent)
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::post, Json, Router};
    use serde_json::{json, Value};
    use std::collections::HashMap;

    fn test_config(base_url: &str, seed: Option<&str>) -> Config {
        let mut vars = HashMap::from([
            ("OPENAI_API_KEY".to_string(), "sk-test".to_string()),
            ("OPENAI_BASE_URL".to_string(), base_url.to_string()),
        ]);
        if let Some(seed) = seed {
            vars.insert("MUMBLR_SEED".to_string(), seed.to_string());
        }
        Config::from_vars(|key| vars.get(key).cloned()).unwrap()
    }

    /// Serves `router` on an ephemeral local port and returns its base URL.
    async fn spawn_fake_upstream(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}/v1")
    }

    #[test]
    fn test_request_body_omits_seed_when_unset() {
        let client = LlmClient::new(&test_config("http://localhost", None)).unwrap();
        let body = serde_json::to_value(client.request_body("sys", "usr")).unwrap();
        assert!(body.get("seed").is_none());
        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "usr");
    }

    #[test]
    fn test_request_body_includes_seed() {
        let client = LlmClient::new(&test_config("http://localhost", Some("7"))).unwrap();
        let body = serde_json::to_value(client.request_body("sys", "usr")).unwrap();
        assert_eq!(body["seed"], 7);
    }

    #[test]
    fn test_response_text_ignores_blank_content() {
        let response: ChatResponse =
            serde_json::from_value(json!({"choices": [{"message": {"content": "  \n"}}]}))
                .unwrap();
        assert!(response.text().is_none());

        let response: ChatResponse =
            serde_json::from_value(json!({"choices": []})).unwrap();
        assert!(response.text().is_none());
    }

    #[tokio::test]
    async fn test_generate_returns_first_choice() {
        let router = Router::new().route(
            "/v1/chat/completions",
            post(|Json(body): Json<Value>| async move {
                assert_eq!(body["messages"][0]["content"], "system text");
                Json(json!({
                    "choices": [{"message": {"role": "assistant", "content": "1. hello"}}],
                    "usage": {"prompt_tokens": 10, "completion_tokens": 3}
                }))
            }),
        );
        let base_url = spawn_fake_upstream(router).await;
        let client = LlmClient::new(&test_config(&base_url, None)).unwrap();

        let text = client.generate("system text", "user text").await.unwrap();
        assert_eq!(text, "1. hello");
    }

    #[tokio::test]
    async fn test_api_error_message_is_parsed() {
        let router = Router::new().route(
            "/v1/chat/completions",
            post(|| async {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({"error": {"message": "Incorrect API key provided"}})),
                )
            }),
        );
        let base_url = spawn_fake_upstream(router).await;
        let client = LlmClient::new(&test_config(&base_url, None)).unwrap();

        match client.generate("s", "u").await {
            Err(LlmError::Api { status, message }) => {
                assert_eq!(status, 401);
                assert_eq!(message, "Incorrect API key provided");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_slow_upstream_times_out() {
        let router = Router::new().route(
            "/v1/chat/completions",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Json(json!({"choices": []}))
            }),
        );
        let base_url = spawn_fake_upstream(router).await;
        let client =
            LlmClient::with_timeout(&test_config(&base_url, None), Duration::from_millis(200))
                .unwrap();

        let err = client.generate("s", "u").await.unwrap_err();
        assert!(matches!(err, LlmError::Timeout { .. }), "got {err:?}");
    }
}
