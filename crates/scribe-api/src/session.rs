use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tokio::sync::Mutex;
use tower_sessions::{
    Session,
    session::{Id, Record},
    session_store::{self, ExpiredDeletion, SessionStore},
};
use tracing::{debug, warn};

use crate::error::ApiError;

/// Name of the cookie carrying the signed session id.
pub const SESSION_COOKIE: &str = "scribe_session";

/// Session key under which the authenticated user is kept.
const SESSION_USER_KEY: &str = "user";

/// What the server remembers about an authenticated client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionData {
    pub user_id: i64,
    pub username: String,
}

/// Process-local session records. Expired records are unreadable at once
/// and dropped for good by `delete_expired`.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore(Arc<Mutex<HashMap<Id, Record>>>);

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.0.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

fn is_active(record: &Record) -> bool {
    record.expiry_date > OffsetDateTime::now_utc()
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn create(&self, record: &mut Record) -> session_store::Result<()> {
        let mut records = self.0.lock().await;
        while records.contains_key(&record.id) {
            record.id = Id::default();
        }
        records.insert(record.id, record.clone());
        Ok(())
    }

    async fn save(&self, record: &Record) -> session_store::Result<()> {
        self.0.lock().await.insert(record.id, record.clone());
        Ok(())
    }

    async fn load(&self, session_id: &Id) -> session_store::Result<Option<Record>> {
        Ok(self
            .0
            .lock()
            .await
            .get(session_id)
            .filter(|r| is_active(r))
            .cloned())
    }

    async fn delete(&self, session_id: &Id) -> session_store::Result<()> {
        self.0.lock().await.remove(session_id);
        Ok(())
    }
}

#[async_trait]
impl ExpiredDeletion for MemorySessionStore {
    async fn delete_expired(&self) -> session_store::Result<()> {
        let mut records = self.0.lock().await;
        let before = records.len();
        records.retain(|_, r| is_active(r));
        let removed = before - records.len();
        if removed > 0 {
            debug!("Purged {} expired sessions", removed);
        }
        Ok(())
    }
}

/// Drops expired sessions every `period` until the process exits.
pub async fn purge_expired_sessions(store: MemorySessionStore, period: std::time::Duration) {
    let mut ticker = tokio::time::interval(period);
    loop {
        ticker.tick().await;
        if let Err(e) = store.delete_expired().await {
            warn!("session purge failed: {}", e);
        }
    }
}

/// The authenticated user for this request, if any.
pub async fn current_session(session: &Session) -> Result<Option<SessionData>, ApiError> {
    Ok(session.get::<SessionData>(SESSION_USER_KEY).await?)
}

/// Replaces whatever session the client had with a fresh id holding `data`.
pub async fn start_session(session: &Session, data: SessionData) -> Result<(), ApiError> {
    session.cycle_id().await?;
    session.insert(SESSION_USER_KEY, data).await?;
    Ok(())
}

/// Deletes the stored record and expires the cookie. A client with no
/// session is left as it was.
pub async fn end_session(session: &Session) -> Result<(), ApiError> {
    session.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Duration;

    fn record(expires_in: Duration) -> Record {
        Record {
            id: Id::default(),
            data: HashMap::new(),
            expiry_date: OffsetDateTime::now_utc() + expires_in,
        }
    }

    #[tokio::test]
    async fn create_then_load() {
        let store = MemorySessionStore::new();
        let mut rec = record(Duration::hours(1));
        store.create(&mut rec).await.unwrap();

        let loaded = store.load(&rec.id).await.unwrap().unwrap();
        assert_eq!(loaded.id, rec.id);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn delete_removes_record() {
        let store = MemorySessionStore::new();
        let mut rec = record(Duration::hours(1));
        store.create(&mut rec).await.unwrap();

        store.delete(&rec.id).await.unwrap();
        assert!(store.load(&rec.id).await.unwrap().is_none());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn expired_record_is_not_loaded() {
        let store = MemorySessionStore::new();
        let mut rec = record(Duration::seconds(-1));
        store.create(&mut rec).await.unwrap();

        assert!(store.load(&rec.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_expired_keeps_live_records() {
        let store = MemorySessionStore::new();
        let mut live = record(Duration::hours(1));
        store.create(&mut live).await.unwrap();
        for _ in 0..10 {
            let mut stale = record(Duration::seconds(-1));
            store.create(&mut stale).await.unwrap();
        }
        assert_eq!(store.len().await, 11);

        store.delete_expired().await.unwrap();

        assert_eq!(store.len().await, 1);
        assert!(store.load(&live.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn unknown_id_is_anonymous() {
        let store = MemorySessionStore::new();
        assert!(store.load(&Id::default()).await.unwrap().is_none());
        store.delete(&Id::default()).await.unwrap();
    }
}
