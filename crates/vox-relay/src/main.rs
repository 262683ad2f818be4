//! # vox-relay
//!
//! Relay server binary — wires settings, the Gemini provider, the auth
//! store, and the WebSocket server together.

#![deny(unsafe_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing_subscriber::EnvFilter;
use vox_llm::provider::TextProvider;
use vox_llm_google::{GoogleConfig, GoogleProvider};
use vox_server::{RelayServer, ServerConfig};
use vox_settings::RelaySettings;

/// Vox relay server.
#[derive(Parser, Debug)]
#[command(name = "vox-relay", about = "WebSocket relay for streamed Gemini responses")]
struct Cli {
    /// Host to bind (overrides settings if specified).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind (overrides settings if specified).
    #[arg(long)]
    port: Option<u16>,

    /// Model ID (overrides settings if specified).
    #[arg(long)]
    model: Option<String>,

    /// Path to the user database (overrides settings if specified).
    #[arg(long)]
    db_path: Option<PathBuf>,

    /// Path to the settings file (defaults to `~/.vox/settings.json`).
    #[arg(long)]
    settings: Option<PathBuf>,
}

/// Resolve the user database path; relative paths land under `base`.
fn resolve_db_path(base: &Path, raw: &str) -> PathBuf {
    let path = PathBuf::from(raw);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}

/// Directory that holds the settings file and default database (`~/.vox`).
fn vox_dir() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home).join(".vox")
}

fn build_provider(settings: &RelaySettings) -> Result<GoogleProvider> {
    let Some(api_key) = settings.api.api_key.clone() else {
        bail!("no API key configured (set GEMINI_API_KEY, or api.apiKey in settings.json)");
    };
    let config = GoogleConfig {
        api_key,
        model: settings.api.model.clone(),
        base_url: settings.api.base_url.clone(),
        max_output_tokens: settings.api.max_output_tokens,
        temperature: settings.api.temperature,
    };
    Ok(GoogleProvider::new(config))
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings_path = args.settings.unwrap_or_else(vox_settings::settings_path);
    let mut settings = vox_settings::load_settings_from_path(&settings_path)
        .with_context(|| format!("failed to load settings from {}", settings_path.display()))?;

    // CLI flags win over settings and env.
    if let Some(host) = args.host {
        settings.server.host = host;
    }
    if let Some(port) = args.port {
        settings.server.port = port;
    }
    if let Some(model) = args.model {
        settings.api.model = model;
    }
    if let Some(db_path) = args.db_path {
        settings.auth.db_path = db_path.to_string_lossy().into_owned();
    }

    let provider = Arc::new(build_provider(&settings)?);

    // Auth store
    let db_path = resolve_db_path(&vox_dir(), &settings.auth.db_path);
    let pool = vox_auth::open_pool(&db_path)
        .with_context(|| format!("failed to open user database at {}", db_path.display()))?;
    {
        let conn = pool.get().context("failed to get a database connection")?;
        vox_auth::run_migrations(&conn).context("failed to run auth migrations")?;
    }
    let store = vox_auth::UserStore::new(pool);

    let jwt_secret = match settings.auth.jwt_secret.clone() {
        Some(secret) => secret,
        None => {
            tracing::warn!(
                "no JWT secret configured (VOX_JWT_SECRET) — using an ephemeral secret, \
                 issued tokens will not survive a restart"
            );
            uuid::Uuid::now_v7().to_string()
        }
    };
    let auth = vox_auth::AuthState {
        store,
        jwt_secret,
        token_ttl_secs: settings.auth.token_ttl_secs,
    };

    let config = ServerConfig::from(&settings);
    let server = RelayServer::new(config, provider.clone() as Arc<dyn TextProvider>);

    let (addr, handle) = server.listen(auth).await.context("failed to bind server")?;
    tracing::info!(
        model = provider.model(),
        "vox-relay listening on http://{addr} (ws://{addr}/ws/chat)"
    );

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for ctrl-c")?;

    tracing::info!("shutting down...");
    server.shutdown().drain(vec![handle], None).await;
    tracing::info!("shutdown complete");
    Ok(())
}
