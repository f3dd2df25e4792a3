pub mod auth;
pub mod comments;
pub mod error;
pub mod meta;
pub mod middleware;
pub mod posts;
pub mod session;
pub mod state;

use axum::{
    Router,
    middleware::from_fn,
    routing::{get, post},
};
use tower_sessions::{Expiry, SessionManagerLayer, cookie::SameSite};

pub use error::ApiError;
pub use session::{MemorySessionStore, SessionData, purge_expired_sessions};
pub use state::{AppState, AppStateInner};

/// Builds the full route table. Gated routes pass through
/// `require_session` before their body is read.
pub fn router(state: AppState) -> Router {
    let gate = from_fn(middleware::require_session);

    let sessions = SessionManagerLayer::new(state.sessions.clone())
        .with_name(session::SESSION_COOKIE)
        .with_path("/")
        .with_http_only(true)
        .with_same_site(SameSite::Lax)
        .with_secure(state.secure_cookies)
        .with_expiry(Expiry::OnInactivity(state.session_ttl))
        .with_signed(state.cookie_key().clone());

    Router::new()
        .route("/", get(meta::index))
        .route("/health", get(meta::health))
        .route("/api/register", post(auth::register))
        .route("/api/login", post(auth::login))
        .route("/api/logout", post(auth::logout))
        .route("/api/user", get(auth::current_user))
        .route("/api/stats", get(meta::stats))
        .route(
            "/api/posts",
            get(posts::list_posts).merge(post(posts::create_post).route_layer(gate.clone())),
        )
        .route(
            "/api/posts/{post_id}/comments",
            get(comments::list_comments).merge(post(comments::add_comment).route_layer(gate)),
        )
        .fallback(meta::not_found)
        .layer(sessions)
        .with_state(state)
}
