//! Media Client — the single point of entry for all OpenAI video generation calls.
//!
//! No other module may call the OpenAI API directly. Handlers hold an
//! `Arc<dyn VideoGenerator>` so the backend can be swapped in tests.
//!
//! There is no retry: a failed call surfaces to the client as a 500.
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

pub mod prompts;

/// The video model every generation request targets.
pub const MODEL: &str = "sora-1.0-2025-04-14";
pub const DEFAULT_RESOLUTION: &str = "1080p";
pub const DEFAULT_DURATION_SECS: u64 = 5;

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

/// Parameters of a single video generation call.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoRequest {
    pub prompt: String,
    pub resolution: String,
    /// Forwarded as given by the caller, number or string.
    pub duration: Value,
}

#[async_trait]
pub trait VideoGenerator: Send + Sync {
    /// Submits the request and returns the raw API response body.
    async fn generate(&self, request: &VideoRequest) -> Result<Value, MediaError>;
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    video_output: VideoOutput<'a>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct VideoOutput<'a> {
    resolution: &'a str,
    duration: &'a Value,
}

#[derive(Debug, Deserialize)]
struct OpenAiError {
    error: OpenAiErrorBody,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorBody {
    message: String,
}

/// OpenAI-backed video generator (chat completions endpoint with `video_output`).
#[derive(Clone)]
pub struct OpenAiVideoClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OpenAiVideoClient {
    pub fn new(api_key: String, base_url: String) -> anyhow::Result<Self> {
        Ok(Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .build()?,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl VideoGenerator for OpenAiVideoClient {
    async fn generate(&self, request: &VideoRequest) -> Result<Value, MediaError> {
        let body = ChatCompletionRequest {
            model: MODEL,
            messages: vec![ChatMessage {
                role: "user",
                content: &request.prompt,
            }],
            video_output: VideoOutput {
                resolution: &request.resolution,
                duration: &request.duration,
            },
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MediaError::Api {
                status: status.as_u16(),
                message: api_error_message(body),
            });
        }

        let value: Value = response.json().await?;
        debug!(model = MODEL, "Video generation call accepted");
        Ok(value)
    }
}

/// Prefers the `error.message` of an OpenAI error body, falling back to the raw text.
fn api_error_message(body: String) -> String {
    serde_json::from_str::<OpenAiError>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body)
}
