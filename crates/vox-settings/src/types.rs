//! Settings type definitions.
//!
//! All types use `#[serde(rename_all = "camelCase")]` for the JSON file
//! format and `#[serde(default)]` so partial files are valid — missing
//! fields get their compiled default.

use serde::{Deserialize, Serialize};

/// Root settings type for the relay server.
///
/// Loaded from `~/.vox/settings.json` with defaults applied for missing
/// fields; environment variables can override specific values.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RelaySettings {
    /// HTTP/WebSocket server settings.
    pub server: ServerSettings,
    /// Generation API settings.
    pub api: ApiSettings,
    /// Auth subsystem settings.
    pub auth: AuthSettings,
}

/// Server network and runtime settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerSettings {
    /// Bind address.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    /// Maximum concurrent WebSocket connections.
    pub max_connections: usize,
    /// Interval between server-initiated pings, in seconds.
    pub heartbeat_interval_secs: u64,
    /// Disconnect a client silent for longer than this, in seconds.
    pub heartbeat_timeout_secs: u64,
    /// Maximum inbound WebSocket message size in bytes.
    pub max_message_size: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 3000,
            max_connections: 50,
            heartbeat_interval_secs: 30,
            heartbeat_timeout_secs: 90,
            max_message_size: 64 * 1024,
        }
    }
}

/// Generation API settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApiSettings {
    /// Model ID.
    pub model: String,
    /// API base URL.
    pub base_url: String,
    /// API key. Usually supplied via `GEMINI_API_KEY` rather than the
    /// settings file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Hard cap on generated tokens per response.
    pub max_output_tokens: u32,
    /// Sampling temperature.
    pub temperature: f64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            model: "gemini-2.5-flash".into(),
            base_url: "https://generativelanguage.googleapis.com".into(),
            api_key: None,
            max_output_tokens: 256,
            temperature: 0.7,
        }
    }
}

/// Auth subsystem settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AuthSettings {
    /// Path to the SQLite user database (relative paths resolve against
    /// `~/.vox`).
    pub db_path: String,
    /// HS256 signing secret. Usually supplied via `VOX_JWT_SECRET`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jwt_secret: Option<String>,
    /// Issued-token lifetime in seconds.
    pub token_ttl_secs: u64,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            db_path: "users.db".into(),
            jwt_secret: None,
            token_ttl_secs: 86_400,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
