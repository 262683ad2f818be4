//! # vox-llm
//!
//! Generation provider abstraction and shared streaming plumbing.
//!
//! A [`TextProvider`](provider::TextProvider) turns one prompt string into
//! a lazy, finite stream of text deltas. The [`sse`] module holds the SSE
//! line parser shared by HTTP-based provider implementations.

#![deny(unsafe_code)]

pub mod provider;
pub mod sse;

pub use provider::{ProviderError, ProviderResult, TextDeltaStream, TextProvider};
