//! # vox-core
//!
//! Shared vocabulary for the Vox relay:
//!
//! - **Wire types**: [`TranscriptRequest`] (inbound) and [`RelayEvent`]
//!   (outbound), validated at the connection boundary
//! - **Prompt builder**: the server-side instruction table and the fixed
//!   prompt template ([`prompt`])
//!
//! Nothing here is persisted; all types are scoped to a single connection
//! or a single in-flight request.

#![deny(unsafe_code)]

pub mod events;
pub mod prompt;
pub mod request;

pub use events::RelayEvent;
pub use prompt::{build_prompt, select_instruction};
pub use request::{RequestError, TranscriptRequest};
