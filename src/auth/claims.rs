/// JWT Claims structures
///
/// Access tokens carry the caller's identity and role. Refresh tokens carry
/// only the identity; the role is looked up again whenever a refresh token
/// is exchanged for a new access token.

use actix_web::{dev::Payload, FromRequest, HttpMessage, HttpRequest};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::future::{ready, Ready};
use uuid::Uuid;

use crate::error::{AppError, AuthError};
use crate::models::Role;

/// Claims of an access token
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject (user ID as UUID string)
    pub user_id: String,
    pub role: Role,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    pub iss: String,
}

impl Claims {
    pub fn new(
        user_id: Uuid,
        role: Role,
        issued_at: DateTime<Utc>,
        expiry_seconds: i64,
        issuer: String,
    ) -> Self {
        let now = issued_at.timestamp();
        Self {
            user_id: user_id.to_string(),
            role,
            iat: now,
            exp: now + expiry_seconds,
            iss: issuer,
        }
    }

    /// Extract user ID from claims
    ///
    /// # Errors
    /// Returns an authentication error if the subject is not a UUID
    pub fn user_id(&self) -> Result<Uuid, AppError> {
        Uuid::parse_str(&self.user_id).map_err(|_| AppError::Auth(AuthError::TokenInvalid))
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Claims of a refresh token
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct RefreshClaims {
    pub user_id: String,
    pub iat: i64,
    pub exp: i64,
    pub iss: String,
}

impl RefreshClaims {
    pub fn new(user_id: Uuid, issued_at: DateTime<Utc>, expiry_seconds: i64, issuer: String) -> Self {
        let now = issued_at.timestamp();
        Self {
            user_id: user_id.to_string(),
            iat: now,
            exp: now + expiry_seconds,
            iss: issuer,
        }
    }
}

/// Claims inserted by the authentication middleware.
/// A handler reached without them answers 401.
impl FromRequest for Claims {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<Claims>()
                .cloned()
                .ok_or(AppError::Auth(AuthError::MissingToken)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_claims_creation() {
        let user_id = Uuid::new_v4();
        let now = Utc::now();
        let claims = Claims::new(user_id, Role::Admin, now, 900, "test".to_string());

        assert_eq!(claims.user_id, user_id.to_string());
        assert_eq!(claims.exp - claims.iat, 900);
        assert_eq!(claims.iss, "test");
        assert!(claims.is_admin());
    }

    #[test]
    fn test_user_id_extraction() {
        let user_id = Uuid::new_v4();
        let claims = Claims::new(user_id, Role::User, Utc::now(), 900, "test".to_string());

        assert_eq!(claims.user_id().unwrap(), user_id);
    }

    #[test]
    fn test_invalid_user_id() {
        let mut claims = Claims::new(Uuid::new_v4(), Role::User, Utc::now(), 900, "test".to_string());
        claims.user_id = "invalid-uuid".to_string();

        assert!(claims.user_id().is_err());
    }

    #[test]
    fn test_refresh_claims_have_no_role() {
        let claims = RefreshClaims::new(Uuid::new_v4(), Utc::now(), 604800, "test".to_string());
        let json = serde_json::to_value(&claims).unwrap();

        assert!(json.get("role").is_none());
        assert!(json.get("user_id").is_some());
    }

    #[actix_web::test]
    async fn test_extractor_requires_claims() {
        let req = TestRequest::default().to_http_request();
        let result = Claims::extract(&req).await;
        assert!(matches!(result, Err(AppError::Auth(AuthError::MissingToken))));

        let claims = Claims::new(Uuid::new_v4(), Role::User, Utc::now(), 900, "test".to_string());
        req.extensions_mut().insert(claims.clone());
        assert_eq!(Claims::extract(&req).await.unwrap(), claims);
    }
}
