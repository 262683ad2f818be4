//! # vox-server
//!
//! The relay server: an Axum HTTP server exposing
//!
//! - `GET /health` — liveness probe with uptime and connection count
//! - `GET /ws/chat` — the WebSocket relay endpoint
//! - `POST /api/auth/{register,login}` — account endpoints from [`vox_auth`]
//!
//! Each WebSocket connection is served by [`ws::session::run_ws_session`],
//! which parses transcript requests, streams provider output back as
//! `chunk` events, and keeps the connection open across requests.

#![deny(unsafe_code)]

pub mod config;
pub mod health;
pub mod server;
pub mod shutdown;
pub mod ws;

pub use config::ServerConfig;
pub use server::{AppState, RelayServer};
pub use shutdown::ShutdownCoordinator;
