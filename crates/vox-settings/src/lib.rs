//! # vox-settings
//!
//! Layered configuration for the relay server.
//!
//! Settings are loaded from three layers (in priority order):
//! 1. **Compiled defaults** — [`RelaySettings::default()`]
//! 2. **User file** — `~/.vox/settings.json` (deep-merged over defaults)
//! 3. **Environment variables** — `VOX_*` / `GEMINI_API_KEY` overrides
//!    (highest priority)

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{deep_merge, load_settings, load_settings_from_path, settings_path};
pub use types::{ApiSettings, AuthSettings, RelaySettings, ServerSettings};

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_are_valid() {
        let settings = RelaySettings::default();
        assert_eq!(settings.server.port, 3000);
        assert_eq!(settings.api.model, "gemini-2.5-flash");
        assert!(settings.api.api_key.is_none());
        assert_eq!(settings.auth.token_ttl_secs, 86_400);
    }

    #[test]
    fn deep_merge_re_exported() {
        let merged = deep_merge(
            serde_json::json!({"x": 1}),
            serde_json::json!({"y": 2}),
        );
        assert_eq!(merged["x"], 1);
        assert_eq!(merged["y"], 2);
    }
}
