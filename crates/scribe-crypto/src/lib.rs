/// Scribe Crypto Library
///
/// Password hashing behind a single `hash` / `verify` boundary.
/// Argon2id is the default; the unsalted SHA-256 scheme exists only to read
/// digests written by earlier deployments.
pub mod password;

pub use password::{Argon2Hasher, CredentialHasher, PasswordError, PasswordScheme, Sha256Hasher};
