use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use scribe_crypto::PasswordScheme;

/// Session-signing secret used when none is configured. Never fit for
/// production.
pub const DEFAULT_SECRET: &str = "dev-secret-key-change-in-production";

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
    pub secret_key: String,
    pub password_scheme: PasswordScheme,
    pub service_name: String,
    pub secure_cookies: bool,
    pub session_ttl: time::Duration,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let var = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());

        let port: u16 = var("SCRIBE_PORT", "5000")
            .parse()
            .context("SCRIBE_PORT must be a port number")?;
        let password_scheme: PasswordScheme = var("SCRIBE_PASSWORD_SCHEME", "argon2")
            .parse()
            .context("SCRIBE_PASSWORD_SCHEME must be argon2 or sha256")?;
        let secure_cookies = matches!(
            var("SCRIBE_COOKIE_SECURE", "false").to_ascii_lowercase().as_str(),
            "1" | "true" | "yes"
        );

        let ttl_minutes: i64 = var("SCRIBE_SESSION_TTL_MINUTES", "1440")
            .parse()
            .context("SCRIBE_SESSION_TTL_MINUTES must be a number of minutes")?;
        if ttl_minutes <= 0 {
            anyhow::bail!("SCRIBE_SESSION_TTL_MINUTES must be positive");
        }

        Ok(Self {
            host: var("SCRIBE_HOST", "0.0.0.0"),
            port,
            db_path: var("SCRIBE_DB_PATH", "app.db").into(),
            secret_key: var("SCRIBE_SECRET_KEY", DEFAULT_SECRET),
            password_scheme,
            service_name: var("SCRIBE_SERVICE_NAME", "scribe-backend"),
            secure_cookies,
            session_ttl: time::Duration::minutes(ttl_minutes),
        })
    }

    pub fn addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }

    pub fn uses_default_secret(&self) -> bool {
        self.secret_key.is_empty() || self.secret_key == DEFAULT_SECRET
    }
}
