use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use sha2::{Digest, Sha256};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("password hashing failed: {0}")]
    Hash(String),
    #[error("unknown password scheme: {0}")]
    UnknownScheme(String),
}

/// One-way transform of a plaintext password into a stored digest.
///
/// `verify` never errors: a digest it cannot parse simply does not match.
pub trait CredentialHasher: Send + Sync {
    fn hash(&self, plaintext: &str) -> Result<String, PasswordError>;
    fn verify(&self, plaintext: &str, digest: &str) -> bool;
}

/// Argon2id with a random per-password salt, stored as a PHC string.
#[derive(Debug, Default, Clone, Copy)]
pub struct Argon2Hasher;

impl CredentialHasher for Argon2Hasher {
    fn hash(&self, plaintext: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| PasswordError::Hash(e.to_string()))
    }

    fn verify(&self, plaintext: &str, digest: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(digest) else {
            return false;
        };
        Argon2::default()
            .verify_password(plaintext.as_bytes(), &parsed)
            .is_ok()
    }
}

/// Unsalted SHA-256, hex encoded. Deterministic: equal inputs give equal digests.
#[derive(Debug, Default, Clone, Copy)]
pub struct Sha256Hasher;

impl CredentialHasher for Sha256Hasher {
    fn hash(&self, plaintext: &str) -> Result<String, PasswordError> {
        Ok(hex::encode(Sha256::digest(plaintext.as_bytes())))
    }

    fn verify(&self, plaintext: &str, digest: &str) -> bool {
        hex::encode(Sha256::digest(plaintext.as_bytes())) == digest
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum PasswordScheme {
    #[default]
    Argon2,
    Sha256,
}

impl PasswordScheme {
    pub fn hasher(self) -> Arc<dyn CredentialHasher> {
        match self {
            Self::Argon2 => Arc::new(Argon2Hasher),
            Self::Sha256 => Arc::new(Sha256Hasher),
        }
    }
}

impl FromStr for PasswordScheme {
    type Err = PasswordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "argon2" | "argon2id" => Ok(Self::Argon2),
            "sha256" => Ok(Self::Sha256),
            other => Err(PasswordError::UnknownScheme(other.to_string())),
        }
    }
}

impl fmt::Display for PasswordScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Argon2 => f.write_str("argon2"),
            Self::Sha256 => f.write_str("sha256"),
        }
    }
}
