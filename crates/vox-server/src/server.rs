//! `RelayServer` — Axum HTTP + WebSocket server.

use std::sync::Arc;
use std::time::Instant;

use axum::Router;
use axum::extract::{State, WebSocketUpgrade};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::warn;
use vox_auth::AuthState;
use vox_llm::provider::TextProvider;

use crate::config::ServerConfig;
use crate::health::{self, HealthResponse};
use crate::shutdown::ShutdownCoordinator;
use crate::ws::registry::ConnectionRegistry;
use crate::ws::session::run_ws_session;

/// Shared state accessible from Axum handlers.
#[derive(Clone)]
pub struct AppState {
    /// Generation backend, shared across all connections.
    pub provider: Arc<dyn TextProvider>,
    /// Live connection registry.
    pub registry: Arc<ConnectionRegistry>,
    /// Shutdown coordinator.
    pub shutdown: Arc<ShutdownCoordinator>,
    /// When the server started.
    pub start_time: Instant,
    /// Server configuration.
    pub config: ServerConfig,
}

/// The relay server.
pub struct RelayServer {
    config: ServerConfig,
    provider: Arc<dyn TextProvider>,
    registry: Arc<ConnectionRegistry>,
    shutdown: Arc<ShutdownCoordinator>,
    start_time: Instant,
}

impl RelayServer {
    /// Create a new server.
    pub fn new(config: ServerConfig, provider: Arc<dyn TextProvider>) -> Self {
        Self {
            config,
            provider,
            registry: Arc::new(ConnectionRegistry::new()),
            shutdown: Arc::new(ShutdownCoordinator::new()),
            start_time: Instant::now(),
        }
    }

    /// Build the Axum router with all routes.
    pub fn router(&self, auth: AuthState) -> Router {
        let state = AppState {
            provider: self.provider.clone(),
            registry: self.registry.clone(),
            shutdown: self.shutdown.clone(),
            start_time: self.start_time,
            config: self.config.clone(),
        };

        Router::new()
            .route("/health", get(health_handler))
            .route("/ws/chat", get(ws_handler))
            .with_state(state)
            .nest("/api/auth", vox_auth::router(auth))
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http())
    }

    /// Bind the configured address and serve in a background task.
    ///
    /// Returns the bound address and the server's join handle. The task
    /// exits after the shutdown coordinator is cancelled.
    pub async fn listen(
        &self,
        auth: AuthState,
    ) -> std::io::Result<(std::net::SocketAddr, tokio::task::JoinHandle<()>)> {
        let app = self.router(auth);
        let listener =
            tokio::net::TcpListener::bind((self.config.host.as_str(), self.config.port)).await?;
        let addr = listener.local_addr()?;

        let token = self.shutdown.token();
        let handle = tokio::spawn(async move {
            let serve = axum::serve(listener, app)
                .with_graceful_shutdown(async move { token.cancelled().await });
            if let Err(err) = serve.await {
                tracing::error!(error = %err, "server error");
            }
        });

        Ok((addr, handle))
    }

    /// Get the connection registry.
    pub fn registry(&self) -> &Arc<ConnectionRegistry> {
        &self.registry
    }

    /// Get the shutdown coordinator.
    pub fn shutdown(&self) -> &Arc<ShutdownCoordinator> {
        &self.shutdown
    }

    /// Get the server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}

/// GET /health
async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let resp = health::health_check(
        state.start_time,
        state.registry.count(),
        state.provider.model(),
    );
    Json(resp)
}

/// GET /ws/chat — WebSocket upgrade.
async fn ws_handler(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    if state.registry.count() >= state.config.max_connections {
        warn!(
            max = state.config.max_connections,
            "refusing connection, server at capacity"
        );
        return StatusCode::SERVICE_UNAVAILABLE.into_response();
    }

    let conn_id = format!("conn_{}", uuid::Uuid::now_v7().simple());
    ws.max_message_size(state.config.max_message_size)
        .on_upgrade(move |socket| {
            run_ws_session(
                socket,
                conn_id,
                state.provider,
                state.registry,
                state.config,
            )
        })
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;
    use vox_llm::provider::{ProviderError, ProviderResult, TextDeltaStream};

    struct NullProvider;

    #[async_trait]
    impl TextProvider for NullProvider {
        fn name(&self) -> &str {
            "null"
        }

        fn model(&self) -> &str {
            "null-model"
        }

        async fn stream_text(&self, _prompt: &str) -> ProviderResult<TextDeltaStream> {
            Err(ProviderError::Other {
                message: "not wired".into(),
            })
        }
    }

    fn make_auth_state() -> AuthState {
        let pool = vox_auth::open_in_memory().unwrap();
        vox_auth::run_migrations(&pool.get().unwrap()).unwrap();
        AuthState {
            store: vox_auth::UserStore::new(pool),
            jwt_secret: "test-secret".into(),
            token_ttl_secs: 3600,
        }
    }

    fn make_app() -> Router {
        let server = RelayServer::new(ServerConfig::default(), Arc::new(NullProvider));
        server.router(make_auth_state())
    }

    #[tokio::test]
    async fn health_endpoint_reports_ok() {
        let app = make_app();
        let req = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();

        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let body = axum::body::to_bytes(resp.into_body(), 10_000).await.unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(parsed["status"], "ok");
        assert_eq!(parsed["connections"], 0);
        assert_eq!(parsed["model"], "null-model");
        assert!(parsed["uptime_secs"].is_number());
    }

    #[tokio::test]
    async fn ws_route_rejects_plain_get() {
        let app = make_app();
        let req = Request::builder()
            .uri("/ws/chat")
            .body(Body::empty())
            .unwrap();

        // No upgrade headers, so the extractor rejects the request.
        let resp = app.oneshot(req).await.unwrap();
        assert!(resp.status().is_client_error());
    }

    #[tokio::test]
    async fn auth_routes_are_mounted() {
        let app = make_app();
        let req = Request::builder()
            .method("POST")
            .uri("/api/auth/register")
            .header("content-type", "application/json")
            .body(Body::from(
                r#"{"username":"ada","password":"longenough"}"#,
            ))
            .unwrap();

        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn unknown_route_returns_404() {
        let app = make_app();
        let req = Request::builder()
            .uri("/nonexistent")
            .body(Body::empty())
            .unwrap();

        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn shutdown_coordinator_accessible() {
        let server = RelayServer::new(ServerConfig::default(), Arc::new(NullProvider));
        assert!(!server.shutdown().is_shutting_down());
        server.shutdown().shutdown();
        assert!(server.shutdown().is_shutting_down());
    }

    #[test]
    fn registry_starts_empty() {
        let server = RelayServer::new(ServerConfig::default(), Arc::new(NullProvider));
        assert_eq!(server.registry().count(), 0);
    }

    #[tokio::test]
    async fn listen_binds_and_shuts_down() {
        let config = ServerConfig {
            host: "127.0.0.1".into(),
            port: 0,
            ..ServerConfig::default()
        };
        let server = RelayServer::new(config, Arc::new(NullProvider));
        let (addr, handle) = server.listen(make_auth_state()).await.unwrap();
        assert_ne!(addr.port(), 0);

        server.shutdown().shutdown();
        tokio::time::timeout(std::time::Duration::from_secs(5), handle)
            .await
            .expect("shutdown timed out")
            .expect("join error");
    }
}
