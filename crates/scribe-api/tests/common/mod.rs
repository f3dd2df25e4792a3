#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::Value;
use time::Duration;
use tower::ServiceExt;

use scribe_api::{AppState, AppStateInner, MemorySessionStore};
use scribe_crypto::{Argon2Hasher, CredentialHasher, Sha256Hasher};
use scribe_db::Database;

pub const SECRET: &str = "test-secret";

pub struct TestApp {
    pub router: Router,
    pub db: Arc<Database>,
    pub sessions: MemorySessionStore,
}

pub struct TestResponse {
    pub status: StatusCode,
    /// `name=value` part of the Set-Cookie header, if one was sent.
    pub cookie: Option<String>,
    pub body: Value,
}

impl TestApp {
    /// Fast unsalted hashing keeps most tests quick.
    pub fn new() -> Self {
        Self::build(Arc::new(Sha256Hasher), Duration::hours(1))
    }

    pub fn with_argon2() -> Self {
        Self::build(Arc::new(Argon2Hasher), Duration::hours(1))
    }

    pub fn with_session_ttl(ttl: Duration) -> Self {
        Self::build(Arc::new(Sha256Hasher), ttl)
    }

    fn build(hasher: Arc<dyn CredentialHasher>, session_ttl: Duration) -> Self {
        let db = Arc::new(Database::open_in_memory().unwrap());
        let sessions = MemorySessionStore::new();
        let state = AppState::new(
            AppStateInner {
                db: db.clone(),
                hasher,
                sessions: sessions.clone(),
                session_ttl,
                service_name: "scribe-test".into(),
                secure_cookies: false,
            },
            SECRET,
        );
        Self {
            router: scribe_api::router(state),
            db,
            sessions,
        }
    }

    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        cookie: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let req = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.send(req).await
    }

    pub async fn send(&self, req: Request<Body>) -> TestResponse {
        let resp = self.router.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let cookie = resp
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .map(str::to_string);
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        TestResponse {
            status,
            cookie,
            body,
        }
    }

    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> TestResponse {
        self.request("GET", uri, cookie, None).await
    }

    pub async fn post(&self, uri: &str, cookie: Option<&str>, body: Value) -> TestResponse {
        self.request("POST", uri, cookie, Some(body)).await
    }

    /// Registers a user and returns the session cookie.
    pub async fn register(&self, username: &str, email: &str, password: &str) -> String {
        let resp = self
            .post(
                "/api/register",
                None,
                serde_json::json!({ "username": username, "email": email, "password": password }),
            )
            .await;
        assert_eq!(resp.status, StatusCode::OK, "register failed: {}", resp.body);
        resp.cookie.expect("register sets a session cookie")
    }
}
