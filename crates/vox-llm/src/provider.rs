//! # Provider Trait
//!
//! Core abstraction for generation backends. A provider accepts one fully
//! resolved prompt string and returns a boxed [`Stream`] of text deltas,
//! letting the relay forward output incrementally regardless of the
//! underlying API format.

use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;

/// Result type alias for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Boxed stream of text deltas returned by [`TextProvider::stream_text`].
///
/// Lazy, finite, and non-restartable: the stream ends after the upstream
/// response completes or yields its first error.
pub type TextDeltaStream = Pin<Box<dyn Stream<Item = Result<String, ProviderError>> + Send>>;

/// Errors that can occur during provider operations.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// SSE stream parsing failed.
    #[error("SSE parse error: {message}")]
    SseParse {
        /// Error description.
        message: String,
    },

    /// Authentication failed (missing or invalid API key).
    #[error("Auth error: {message}")]
    Auth {
        /// Error description.
        message: String,
    },

    /// Provider returned an API error.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error description.
        message: String,
    },

    /// Provider-specific error.
    #[error("{message}")]
    Other {
        /// Error description.
        message: String,
    },
}

impl ProviderError {
    /// Error category string for log fields.
    pub fn category(&self) -> &str {
        match self {
            Self::Http(_) => "network",
            Self::Json(_) | Self::SseParse { .. } => "parse",
            Self::Auth { .. } => "auth",
            Self::Api { .. } => "api",
            Self::Other { .. } => "unknown",
        }
    }
}

/// Core generation provider trait.
///
/// Implementors must be `Send + Sync`; one handle is shared process-wide
/// across all connections and never mutated after startup.
#[async_trait]
pub trait TextProvider: Send + Sync {
    /// Provider identifier (e.g., `"google"`).
    fn name(&self) -> &str;

    /// Current model ID (e.g., `"gemini-2.5-flash"`).
    fn model(&self) -> &str;

    /// Stream a response for the given prompt.
    ///
    /// May fail before the stream starts (returned `Err`) or mid-stream
    /// (an `Err` item); the caller must treat either as terminal for the
    /// request.
    async fn stream_text(&self, prompt: &str) -> ProviderResult<TextDeltaStream>;
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_display() {
        let err = ProviderError::Api {
            status: 429,
            message: "quota exceeded".into(),
        };
        assert_eq!(err.to_string(), "API error (429): quota exceeded");
        assert_eq!(err.category(), "api");
    }

    #[test]
    fn sse_parse_error_display() {
        let err = ProviderError::SseParse {
            message: "unexpected EOF".into(),
        };
        assert_eq!(err.to_string(), "SSE parse error: unexpected EOF");
        assert_eq!(err.category(), "parse");
    }

    #[test]
    fn auth_error_category() {
        let err = ProviderError::Auth {
            message: "missing API key".into(),
        };
        assert_eq!(err.category(), "auth");
    }

    #[test]
    fn json_error_category_is_parse() {
        let json_err = serde_json::from_str::<serde_json::Value>("{bad").unwrap_err();
        let err: ProviderError = json_err.into();
        assert_eq!(err.category(), "parse");
    }

    #[test]
    fn other_error_passes_message_through() {
        let err = ProviderError::Other {
            message: "backend on fire".into(),
        };
        assert_eq!(err.to_string(), "backend on fire");
        assert_eq!(err.category(), "unknown");
    }

    #[test]
    fn provider_trait_is_object_safe() {
        fn assert_object_safe(_: &dyn TextProvider) {}
        let _ = assert_object_safe;
    }

    #[test]
    fn provider_trait_send_sync() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn TextProvider>();
    }
}
