/// JWT Token Generation and Validation
///
/// Access and refresh tokens are HS256 JWTs signed with two independent
/// secrets, so a leaked key of one kind cannot mint tokens of the other.
/// Nothing is stored server-side; a token is valid until its `exp`.

use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{de::DeserializeOwned, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::auth::claims::{Claims, RefreshClaims};
use crate::configuration::JwtSettings;
use crate::models::Role;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    InvalidSignature,
    Expired,
    Malformed,
    Signing(String),
}

impl fmt::Display for TokenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenError::InvalidSignature => write!(f, "token signature is invalid"),
            TokenError::Expired => write!(f, "token has expired"),
            TokenError::Malformed => write!(f, "token is malformed"),
            TokenError::Signing(msg) => write!(f, "token signing failed: {}", msg),
        }
    }
}

impl std::error::Error for TokenError {}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::InvalidSignature => TokenError::InvalidSignature,
            ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Malformed,
        }
    }
}

/// Verify signature, issuer and expiry of `token` and decode its claims
///
/// # Errors
/// - `InvalidSignature` if `key` did not sign the token
/// - `Expired` if the current time is past `exp` (no leeway)
/// - `Malformed` if the token cannot be parsed or lacks required claims
pub fn validate_token<C: DeserializeOwned>(
    token: &str,
    key: &DecodingKey,
    issuer: &str,
) -> Result<C, TokenError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;
    validation.set_issuer(&[issuer]);

    decode::<C>(token, key, &validation)
        .map(|data| data.claims)
        .map_err(|e| {
            tracing::debug!("JWT validation error: {}", e);
            TokenError::from(e)
        })
}

fn sign<C: Serialize>(claims: &C, key: &EncodingKey) -> Result<String, TokenError> {
    encode(&Header::new(Algorithm::HS256), claims, key)
        .map_err(|e| TokenError::Signing(e.to_string()))
}

/// Issues and validates both token kinds. Pure computation over the
/// configured keys; safe to share between workers.
#[derive(Clone)]
pub struct TokenService {
    access_encoding: EncodingKey,
    access_decoding: DecodingKey,
    refresh_encoding: EncodingKey,
    refresh_decoding: DecodingKey,
    issuer: String,
    access_token_expiry: i64,
    refresh_token_expiry: i64,
}

impl TokenService {
    pub fn new(config: &JwtSettings) -> Self {
        Self {
            access_encoding: EncodingKey::from_secret(config.access_token_secret.as_bytes()),
            access_decoding: DecodingKey::from_secret(config.access_token_secret.as_bytes()),
            refresh_encoding: EncodingKey::from_secret(config.refresh_token_secret.as_bytes()),
            refresh_decoding: DecodingKey::from_secret(config.refresh_token_secret.as_bytes()),
            issuer: config.issuer.clone(),
            access_token_expiry: config.access_token_expiry,
            refresh_token_expiry: config.refresh_token_expiry,
        }
    }

    /// Access token lifetime in seconds
    pub fn access_token_expiry(&self) -> i64 {
        self.access_token_expiry
    }

    /// Refresh token lifetime in seconds
    pub fn refresh_token_expiry(&self) -> i64 {
        self.refresh_token_expiry
    }

    pub fn issue_access_token(&self, user_id: Uuid, role: Role) -> Result<String, TokenError> {
        self.issue_access_token_at(user_id, role, Utc::now())
    }

    /// Same as [`issue_access_token`](Self::issue_access_token) with a fixed
    /// clock; identical inputs produce identical tokens.
    pub fn issue_access_token_at(
        &self,
        user_id: Uuid,
        role: Role,
        now: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let claims = Claims::new(user_id, role, now, self.access_token_expiry, self.issuer.clone());
        sign(&claims, &self.access_encoding)
    }

    pub fn issue_refresh_token(&self, user_id: Uuid) -> Result<String, TokenError> {
        self.issue_refresh_token_at(user_id, Utc::now())
    }

    pub fn issue_refresh_token_at(&self, user_id: Uuid, now: DateTime<Utc>) -> Result<String, TokenError> {
        let claims = RefreshClaims::new(user_id, now, self.refresh_token_expiry, self.issuer.clone());
        sign(&claims, &self.refresh_encoding)
    }

    pub fn validate_access_token(&self, token: &str) -> Result<Claims, TokenError> {
        validate_token(token, &self.access_decoding, &self.issuer)
    }

    pub fn validate_refresh_token(&self, token: &str) -> Result<RefreshClaims, TokenError> {
        validate_token(token, &self.refresh_decoding, &self.issuer)
    }
}
