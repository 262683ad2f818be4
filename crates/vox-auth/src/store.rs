//! SQLite-backed user store.
//!
//! Passwords are stored as base64 `SHA-256(salt || password)` with a
//! per-user random salt. The store is cheap to clone; clones share the
//! underlying connection pool.

use std::path::Path;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{Connection, OptionalExtension, params};
use sha2::{Digest, Sha256};

use crate::errors::AuthError;

/// Pooled SQLite connections.
pub type ConnectionPool = r2d2::Pool<SqliteConnectionManager>;

/// Open (or create) the user database at `path` and build a pool.
pub fn open_pool(path: &Path) -> Result<ConnectionPool, AuthError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let manager = SqliteConnectionManager::file(path);
    Ok(r2d2::Pool::builder().max_size(4).build(manager)?)
}

/// In-memory pool for tests. Capped at one connection so every checkout
/// sees the same database.
pub fn open_in_memory() -> Result<ConnectionPool, AuthError> {
    let manager = SqliteConnectionManager::memory();
    Ok(r2d2::Pool::builder().max_size(1).build(manager)?)
}

/// Create the schema if it does not exist.
pub fn run_migrations(conn: &Connection) -> Result<(), AuthError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS users (
            id            TEXT PRIMARY KEY,
            username      TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            salt          TEXT NOT NULL,
            created_at    TEXT NOT NULL
        );",
    )?;
    Ok(())
}

/// A registered account row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserRecord {
    /// Stable account ID.
    pub id: String,
    /// Unique username.
    pub username: String,
}

/// User store over a shared connection pool.
#[derive(Clone)]
pub struct UserStore {
    pool: ConnectionPool,
}

impl UserStore {
    /// Wrap an already-migrated pool.
    pub fn new(pool: ConnectionPool) -> Self {
        Self { pool }
    }

    /// Create a new account.
    ///
    /// Returns [`AuthError::UserExists`] if the username is taken.
    pub fn create_user(&self, username: &str, password: &str) -> Result<UserRecord, AuthError> {
        let conn = self.pool.get()?;

        let id = uuid::Uuid::now_v7().to_string();
        let salt = generate_salt();
        let hash = hash_password(password, &salt);
        let created_at = chrono::Utc::now().to_rfc3339();

        let inserted = conn.execute(
            "INSERT OR IGNORE INTO users (id, username, password_hash, salt, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![id, username, hash, salt, created_at],
        )?;
        if inserted == 0 {
            return Err(AuthError::UserExists);
        }

        Ok(UserRecord {
            id,
            username: username.to_string(),
        })
    }

    /// Check a username/password pair.
    ///
    /// Returns [`AuthError::InvalidCredentials`] for both unknown users and
    /// wrong passwords, so responses do not reveal which one failed.
    pub fn verify_user(&self, username: &str, password: &str) -> Result<UserRecord, AuthError> {
        let conn = self.pool.get()?;

        let row: Option<(String, String, String)> = conn
            .query_row(
                "SELECT id, password_hash, salt FROM users WHERE username = ?1",
                params![username],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .optional()?;

        let Some((id, stored_hash, salt)) = row else {
            return Err(AuthError::InvalidCredentials);
        };

        if hash_password(password, &salt) != stored_hash {
            return Err(AuthError::InvalidCredentials);
        }

        Ok(UserRecord {
            id,
            username: username.to_string(),
        })
    }

    /// Number of registered accounts.
    pub fn user_count(&self) -> Result<u64, AuthError> {
        let conn = self.pool.get()?;
        let count: u64 = conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
        Ok(count)
    }
}

/// Random 16-byte salt, base64-encoded.
fn generate_salt() -> String {
    let bytes: [u8; 16] = rand::random();
    BASE64.encode(bytes)
}

/// `base64(SHA-256(salt || password))`.
fn hash_password(password: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    BASE64.encode(hasher.finalize())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
