//! Wire types for the Gemini `streamGenerateContent` API.

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Request
// ─────────────────────────────────────────────────────────────────────────────

/// Top-level generation request body.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    /// Conversation contents; the relay always sends a single user turn.
    pub contents: Vec<RequestContent>,
    /// Sampling configuration.
    pub generation_config: GenerationConfig,
}

/// One conversation turn.
#[derive(Clone, Debug, Serialize)]
pub struct RequestContent {
    /// Turn role (`"user"`).
    pub role: String,
    /// Content parts.
    pub parts: Vec<RequestPart>,
}

/// A text part of a request turn.
#[derive(Clone, Debug, Serialize)]
pub struct RequestPart {
    /// Text content.
    pub text: String,
}

/// Sampling configuration for a request.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    /// Hard cap on generated tokens.
    pub max_output_tokens: u32,
    /// Sampling temperature.
    pub temperature: f64,
}

impl GenerateRequest {
    /// Build the single-turn request the relay sends.
    pub fn single_turn(prompt: &str, max_output_tokens: u32, temperature: f64) -> Self {
        Self {
            contents: vec![RequestContent {
                role: "user".into(),
                parts: vec![RequestPart {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                max_output_tokens,
                temperature,
            },
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Response
// ─────────────────────────────────────────────────────────────────────────────

/// One SSE data payload from the streaming endpoint.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamChunk {
    /// Candidate completions (the relay reads the first).
    pub candidates: Option<Vec<Candidate>>,
    /// Present when the prompt itself was rejected.
    pub prompt_feedback: Option<PromptFeedback>,
    /// Inline API error, delivered mid-stream.
    pub error: Option<ApiErrorBody>,
}

/// A candidate completion fragment.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// Content carried by this fragment, if any.
    pub content: Option<CandidateContent>,
    /// Finish reason (`"STOP"`, `"MAX_TOKENS"`, `"SAFETY"`, ...), set on
    /// the final fragment.
    pub finish_reason: Option<String>,
}

/// Content block of a candidate fragment.
#[derive(Clone, Debug, Deserialize)]
pub struct CandidateContent {
    /// Content parts.
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

/// A part of a candidate's content. Non-text parts deserialize with
/// `text: None` and are ignored.
#[derive(Clone, Debug, Deserialize)]
pub struct ResponsePart {
    /// Text delta, if this is a text part.
    pub text: Option<String>,
}

/// Prompt-level rejection info.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    /// Why the prompt was blocked, when it was.
    pub block_reason: Option<String>,
}

/// Error object as delivered inline in a stream chunk or inside the
/// non-2xx [`ErrorEnvelope`].
#[derive(Clone, Debug, Deserialize)]
pub struct ApiErrorBody {
    /// Numeric status code.
    pub code: u16,
    /// Human-readable message.
    pub message: String,
}

/// Body of a non-2xx response: `{"error": {...}}`.
#[derive(Clone, Debug, Deserialize)]
pub struct ErrorEnvelope {
    /// The wrapped error.
    pub error: ApiErrorBody,
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_camel_case() {
        let req = GenerateRequest::single_turn("hello", 256, 0.7);
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(json["generationConfig"]["maxOutputTokens"], 256);
        assert_eq!(json["generationConfig"]["temperature"], 0.7);
    }

    #[test]
    fn chunk_with_text_part_deserializes() {
        let raw = r#"{"candidates":[{"content":{"parts":[{"text":"Four"}],"role":"model"}}]}"#;
        let chunk: StreamChunk = serde_json::from_str(raw).unwrap();
        let candidate = &chunk.candidates.unwrap()[0];
        assert_eq!(
            candidate.content.as_ref().unwrap().parts[0].text.as_deref(),
            Some("Four")
        );
        assert!(candidate.finish_reason.is_none());
    }

    #[test]
    fn chunk_with_finish_reason_deserializes() {
        let raw = r#"{"candidates":[{"finishReason":"STOP"}]}"#;
        let chunk: StreamChunk = serde_json::from_str(raw).unwrap();
        assert_eq!(
            chunk.candidates.unwrap()[0].finish_reason.as_deref(),
            Some("STOP")
        );
    }

    #[test]
    fn inline_error_deserializes() {
        let raw = r#"{"error":{"code":429,"message":"Resource exhausted"}}"#;
        let chunk: StreamChunk = serde_json::from_str(raw).unwrap();
        let error = chunk.error.unwrap();
        assert_eq!(error.code, 429);
        assert_eq!(error.message, "Resource exhausted");
    }

    #[test]
    fn error_envelope_deserializes() {
        let raw = r#"{"error":{"code":400,"message":"API key not valid","status":"INVALID_ARGUMENT"}}"#;
        let envelope: ErrorEnvelope = serde_json::from_str(raw).unwrap();
        assert_eq!(envelope.error.code, 400);
    }

    #[test]
    fn non_text_parts_tolerated() {
        let raw = r#"{"candidates":[{"content":{"parts":[{"inlineData":{"mimeType":"x"}}]}}]}"#;
        let chunk: StreamChunk = serde_json::from_str(raw).unwrap();
        let candidate = &chunk.candidates.unwrap()[0];
        assert!(candidate.content.as_ref().unwrap().parts[0].text.is_none());
    }
}
