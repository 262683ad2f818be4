//! # vox-auth
//!
//! Account authentication for the relay's HTTP surface.
//!
//! Plain request/response REST under `/api/auth` — independent of the
//! WebSocket relay beyond sharing a process:
//! - [`store`]: SQLite-backed user store (salted password hashes)
//! - [`token`]: HS256 JWT issuance and verification
//! - [`routes`]: axum `register`/`login` handlers

#![deny(unsafe_code)]

pub mod errors;
pub mod routes;
pub mod store;
pub mod token;

pub use errors::AuthError;
pub use routes::{AuthState, router};
pub use store::{ConnectionPool, UserStore, open_in_memory, open_pool, run_migrations};
pub use token::{Claims, issue_token, verify_token};
