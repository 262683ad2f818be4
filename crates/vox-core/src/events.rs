//! Outbound relay events.
//!
//! Every inbound request produces zero or more `chunk` events followed by
//! exactly one terminal event (`done` or `error`). Events are transient —
//! serialized straight onto the WebSocket, never persisted.

use serde::{Deserialize, Serialize};

/// Events emitted to the client while relaying a generated response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RelayEvent {
    /// Incremental model output.
    Chunk {
        /// Text fragment received from the provider.
        text: String,
        /// Cumulative text so far, including this fragment.
        #[serde(rename = "fullText")]
        full_text: String,
    },

    /// Generation completed normally.
    Done {
        /// Final cumulative text.
        #[serde(rename = "fullText")]
        full_text: String,
    },

    /// The request failed. Terminal; no `done` follows.
    Error {
        /// Human-readable failure description.
        message: String,
    },
}

impl RelayEvent {
    /// Whether this event ends the request (`done` or `error`).
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done { .. } | Self::Error { .. })
    }

    /// Build an `error` event from anything displayable.
    pub fn error(message: impl std::fmt::Display) -> Self {
        Self::Error {
            message: message.to_string(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
