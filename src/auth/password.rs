/// Password Hashing and Verification
///
/// bcrypt with a configurable work factor. Strength rules live in the
/// validators; this module only refuses inputs bcrypt cannot hash faithfully.

use bcrypt::{hash, verify};
use std::fmt;

/// bcrypt ignores everything past 72 bytes
const MAX_PASSWORD_BYTES: usize = 72;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HashError {
    Empty,
    TooLong(usize),
    Bcrypt(String),
}

impl fmt::Display for HashError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HashError::Empty => write!(f, "password is empty"),
            HashError::TooLong(len) => write!(
                f,
                "password is {} bytes, bcrypt accepts at most {}",
                len, MAX_PASSWORD_BYTES
            ),
            HashError::Bcrypt(msg) => write!(f, "password hashing failed: {}", msg),
        }
    }
}

impl std::error::Error for HashError {}

#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    /// Hash a password using bcrypt
    ///
    /// # Errors
    /// Returns error if:
    /// - Password is empty
    /// - Password exceeds 72 bytes
    /// - Bcrypt hashing fails
    pub fn hash(&self, password: &str) -> Result<String, HashError> {
        if password.is_empty() {
            return Err(HashError::Empty);
        }
        if password.len() > MAX_PASSWORD_BYTES {
            return Err(HashError::TooLong(password.len()));
        }

        hash(password, self.cost).map_err(|e| HashError::Bcrypt(e.to_string()))
    }

    /// Verify a password against its hash. A malformed hash never matches.
    pub fn verify(&self, password: &str, hash: &str) -> bool {
        match verify(password, hash) {
            Ok(matches) => matches,
            Err(e) => {
                tracing::warn!("Password verification failed on stored hash: {}", e);
                false
            }
        }
    }

    /// [`hash`](Self::hash) on the blocking thread pool
    pub async fn hash_blocking(self, password: String) -> Result<String, HashError> {
        tokio::task::spawn_blocking(move || self.hash(&password))
            .await
            .map_err(|e| HashError::Bcrypt(e.to_string()))?
    }

    /// [`verify`](Self::verify) on the blocking thread pool
    pub async fn verify_blocking(self, password: String, hash: String) -> bool {
        tokio::task::spawn_blocking(move || self.verify(&password, &hash))
            .await
            .unwrap_or(false)
    }
}
