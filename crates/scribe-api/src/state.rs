use std::sync::Arc;

use sha2::{Digest, Sha512};
use tower_sessions::cookie::Key;
use tracing::error;

use scribe_crypto::CredentialHasher;
use scribe_db::Database;

use crate::error::ApiError;
use crate::session::MemorySessionStore;

/// Shared application state for all route handlers.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
    cookie_key: Key,
}

pub struct AppStateInner {
    pub db: Arc<Database>,
    pub hasher: Arc<dyn CredentialHasher>,
    pub sessions: MemorySessionStore,
    /// Sessions expire after this long without a request.
    pub session_ttl: time::Duration,
    pub service_name: String,
    pub secure_cookies: bool,
}

impl AppState {
    /// The signing key is derived from `secret` so any secret length works.
    pub fn new(inner: AppStateInner, secret: &str) -> Self {
        let digest = Sha512::digest(secret.as_bytes());
        Self {
            inner: Arc::new(inner),
            cookie_key: Key::from(digest.as_slice()),
        }
    }

    pub fn cookie_key(&self) -> &Key {
        &self.cookie_key
    }

    /// Runs blocking storage (and hashing) work off the async runtime.
    pub(crate) async fn blocking<F, T, E>(&self, f: F) -> Result<T, ApiError>
    where
        F: FnOnce(&Database, &dyn CredentialHasher) -> Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: Into<ApiError> + Send + 'static,
    {
        let db = Arc::clone(&self.inner.db);
        let hasher = Arc::clone(&self.inner.hasher);
        tokio::task::spawn_blocking(move || f(&db, hasher.as_ref()))
            .await
            .map_err(|e| {
                error!("spawn_blocking join error: {}", e);
                ApiError::Internal
            })?
            .map_err(Into::into)
    }
}

impl std::ops::Deref for AppState {
    type Target = AppStateInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}
