//! Registry of live WebSocket connections.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use super::connection::ClientConnection;

/// Tracks every live connection by ID.
///
/// Used for the health endpoint's connection count and for the
/// max-connections admission check on upgrade.
#[derive(Default)]
pub struct ConnectionRegistry {
    connections: RwLock<HashMap<String, Arc<ClientConnection>>>,
}

impl ConnectionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a connection.
    pub fn add(&self, connection: Arc<ClientConnection>) {
        let count = {
            let mut map = self.connections.write();
            let _ = map.insert(connection.id.clone(), connection);
            map.len()
        };
        debug!(connections = count, "connection registered");
    }

    /// Remove a connection by ID.
    pub fn remove(&self, id: &str) -> Option<Arc<ClientConnection>> {
        self.connections.write().remove(id)
    }

    /// Number of live connections.
    pub fn count(&self) -> usize {
        self.connections.read().len()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
