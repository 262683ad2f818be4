//! WebSocket relay: connection state, registry, and session lifecycle.

pub mod connection;
pub mod registry;
pub mod relay;
pub mod session;

pub use connection::ClientConnection;
pub use registry::ConnectionRegistry;
