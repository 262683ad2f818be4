//! # vox-llm-google
//!
//! Google/Gemini generation provider.
//!
//! Implements the [`TextProvider`](vox_llm::provider::TextProvider) trait
//! over the `streamGenerateContent` SSE endpoint:
//! - Request/response wire types ([`types`])
//! - Per-chunk delta extraction with inline error and safety-block
//!   handling ([`stream_handler`])
//! - The provider itself, API-key authenticated ([`provider`])

#![deny(unsafe_code)]

pub mod provider;
pub mod stream_handler;
pub mod types;

pub use provider::{GoogleConfig, GoogleProvider};
