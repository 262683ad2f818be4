//! Axum routes for `/api/auth`.

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::post;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::AuthError;
use crate::store::UserStore;

/// Shared state for the auth routes.
#[derive(Clone)]
pub struct AuthState {
    /// User store.
    pub store: UserStore,
    /// HS256 signing secret.
    pub jwt_secret: String,
    /// Issued-token lifetime in seconds.
    pub token_ttl_secs: u64,
}

/// Build the auth router. Mount under `/api/auth`.
pub fn router(state: AuthState) -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .with_state(state)
}

/// Request body for both endpoints.
#[derive(Debug, Deserialize)]
struct CredentialsBody {
    username: String,
    password: String,
}

/// Success body for both endpoints.
#[derive(Debug, Serialize)]
struct TokenResponse {
    token: String,
    username: String,
}

impl CredentialsBody {
    fn validate(&self) -> Result<(), AuthError> {
        if self.username.trim().is_empty() {
            return Err(AuthError::InvalidInput("username is required".into()));
        }
        if self.password.len() < 8 {
            return Err(AuthError::InvalidInput(
                "password must be at least 8 characters".into(),
            ));
        }
        Ok(())
    }
}

/// POST /register
async fn register(
    State(state): State<AuthState>,
    Json(body): Json<CredentialsBody>,
) -> Result<(StatusCode, Json<TokenResponse>), AuthError> {
    body.validate()?;
    let user = state.store.create_user(&body.username, &body.password)?;
    let token = crate::token::issue_token(&user.username, &state.jwt_secret, state.token_ttl_secs)?;
    info!(username = %user.username, "account created");
    Ok((
        StatusCode::CREATED,
        Json(TokenResponse {
            token,
            username: user.username,
        }),
    ))
}

/// POST /login
async fn login(
    State(state): State<AuthState>,
    Json(body): Json<CredentialsBody>,
) -> Result<Json<TokenResponse>, AuthError> {
    let user = state.store.verify_user(&body.username, &body.password)?;
    let token = crate::token::issue_token(&user.username, &state.jwt_secret, state.token_ttl_secs)?;
    Ok(Json(TokenResponse {
        token,
        username: user.username,
    }))
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::UserExists => StatusCode::CONFLICT,
            Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::Database(_) | Self::Pool(_) | Self::Io(_) | Self::Token(_) => {
                warn!(error = %self, "auth request failed internally");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        // Internal detail stays in the log; the client gets the display text
        // only for client-caused failures.
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            "internal error".to_string()
        } else {
            self.to_string()
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
