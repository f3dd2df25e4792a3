mod config;

use std::sync::Arc;
use std::time::Duration;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use scribe_api::{AppState, AppStateInner, MemorySessionStore, purge_expired_sessions};
use scribe_db::Database;

use crate::config::Config;

const SESSION_PURGE_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "scribe=debug,scribe_api=debug,scribe_db=debug,tower_http=debug".into()),
        )
        .init();

    let config = Config::from_env()?;
    if config.uses_default_secret() {
        warn!("SCRIBE_SECRET_KEY is unset or the development default; session cookies can be forged");
    }

    // Storage unavailable at startup is fatal.
    let db = Database::open(&config.db_path)?;

    let sessions = MemorySessionStore::new();
    tokio::spawn(purge_expired_sessions(sessions.clone(), SESSION_PURGE_INTERVAL));

    let state = AppState::new(
        AppStateInner {
            db: Arc::new(db),
            hasher: config.password_scheme.hasher(),
            sessions,
            session_ttl: config.session_ttl,
            service_name: config.service_name.clone(),
            secure_cookies: config.secure_cookies,
        },
        &config.secret_key,
    );

    let app = scribe_api::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr = config.addr()?;
    info!(
        "Scribe server listening on {} (passwords: {})",
        addr, config.password_scheme
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
