//! Inbound request parsing and validation.

use serde::Deserialize;
use thiserror::Error;

/// Errors produced while parsing an inbound frame.
#[derive(Debug, Error)]
pub enum RequestError {
    /// The frame was not valid JSON or lacked required fields.
    #[error("invalid request: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The `transcript` field was present but empty or whitespace-only.
    #[error("invalid request: transcript is empty")]
    EmptyTranscript,
}

/// One inbound message: a speech transcript plus an optional language tag.
///
/// Lives only for the duration of handling a single frame.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct TranscriptRequest {
    /// User utterance to answer. Required, non-empty.
    pub transcript: String,
    /// Language/locale tag selecting the system instruction.
    #[serde(default)]
    pub lang: Option<String>,
}

impl TranscriptRequest {
    /// Parse and validate a raw text frame.
    ///
    /// Rejects malformed JSON, a missing `transcript` field, and a
    /// transcript that is empty after trimming.
    pub fn parse(raw: &str) -> Result<Self, RequestError> {
        let request: Self = serde_json::from_str(raw)?;
        if request.transcript.trim().is_empty() {
            return Err(RequestError::EmptyTranscript);
        }
        Ok(request)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
