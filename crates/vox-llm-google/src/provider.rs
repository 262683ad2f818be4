//! Gemini provider over the `streamGenerateContent` SSE endpoint.

use async_trait::async_trait;
use futures::StreamExt as _;
use tracing::debug;
use vox_llm::provider::{ProviderError, ProviderResult, TextDeltaStream, TextProvider};
use vox_llm::sse::{parse_sse_data, sse_data_lines};

use crate::stream_handler::chunk_deltas;
use crate::types::{ErrorEnvelope, GenerateRequest, StreamChunk};

/// Default public API endpoint.
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Configuration for [`GoogleProvider`].
#[derive(Clone, Debug)]
pub struct GoogleConfig {
    /// API key sent as `x-goog-api-key`.
    pub api_key: String,
    /// Model ID.
    pub model: String,
    /// API base URL (overridable for tests).
    pub base_url: String,
    /// Hard cap on generated tokens.
    pub max_output_tokens: u32,
    /// Sampling temperature.
    pub temperature: f64,
}

impl GoogleConfig {
    /// Config with production defaults for the given key and model.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: DEFAULT_BASE_URL.into(),
            max_output_tokens: 256,
            temperature: 0.7,
        }
    }
}

/// Gemini streaming text provider.
///
/// One instance is shared process-wide; it holds no mutable state.
pub struct GoogleProvider {
    http: reqwest::Client,
    config: GoogleConfig,
}

impl GoogleProvider {
    /// Create a provider from a config.
    pub fn new(config: GoogleConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:streamGenerateContent?alt=sse",
            self.config.base_url, self.config.model
        )
    }
}

#[async_trait]
impl TextProvider for GoogleProvider {
    fn name(&self) -> &str {
        "google"
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    async fn stream_text(&self, prompt: &str) -> ProviderResult<TextDeltaStream> {
        let body = GenerateRequest::single_turn(
            prompt,
            self.config.max_output_tokens,
            self.config.temperature,
        );

        debug!(model = %self.config.model, "starting Gemini stream request");
        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorEnvelope>(&text)
                .map(|envelope| envelope.error.message)
                .unwrap_or(text);
            if status == reqwest::StatusCode::UNAUTHORIZED
                || status == reqwest::StatusCode::FORBIDDEN
            {
                return Err(ProviderError::Auth { message });
            }
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let mut lines = Box::pin(sse_data_lines(Box::pin(response.bytes_stream())));
        let deltas = async_stream::stream! {
            while let Some(data) = lines.next().await {
                let Some(chunk) = parse_sse_data::<StreamChunk>(&data, "google") else {
                    continue;
                };
                match chunk_deltas(&chunk) {
                    Ok(texts) => {
                        for text in texts {
                            yield Ok(text);
                        }
                    }
                    Err(e) => {
                        yield Err(e);
                        return;
                    }
                }
            }
        };

        Ok(Box::pin(deltas))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
