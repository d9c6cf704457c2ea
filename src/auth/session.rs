/// Login and token refresh
///
/// Both the explicit `/refresh` endpoint and the authentication middleware
/// mint access tokens through [`SessionService::refresh_access_token`].

use actix_web::cookie::Cookie;
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::cookies::{self, ACCESS_COOKIE_NAME, REFRESH_COOKIE_NAME};
use crate::auth::{Claims, PasswordHasher, TokenService};
use crate::error::{AppError, AuthError};
use crate::models::{LoginRequest, User};
use crate::store::UserRepository;
use crate::validators::{normalize_email, Validator};

#[derive(Debug)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Hashed once at startup; verified against on the unknown-email login path
const DUMMY_PASSWORD: &str = "storefront-dummy-password";

#[derive(Clone)]
pub struct SessionService {
    users: Arc<dyn UserRepository>,
    tokens: Arc<TokenService>,
    hasher: PasswordHasher,
    dummy_hash: Arc<str>,
    validator: Validator,
    secure_cookies: bool,
}

impl SessionService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        tokens: Arc<TokenService>,
        hasher: PasswordHasher,
        validator: Validator,
        secure_cookies: bool,
    ) -> Self {
        let dummy_hash = match hasher.hash(DUMMY_PASSWORD) {
            Ok(hash) => hash,
            Err(e) => {
                tracing::error!("Failed to prepare dummy password hash: {}", e);
                String::new()
            }
        };

        Self {
            users,
            tokens,
            hasher,
            dummy_hash: dummy_hash.into(),
            validator,
            secure_cookies,
        }
    }

    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    /// Verify credentials and issue a token pair.
    ///
    /// An unknown email and a wrong password fail identically.
    pub async fn login(&self, request: &LoginRequest) -> Result<(User, TokenPair), AppError> {
        self.validator.validate_login(request)?;
        let email = normalize_email(&request.email);

        let user = match self.users.find_by_email(&email).await? {
            Some(user) => user,
            None => {
                tracing::info!("Login attempt for unknown email");
                self.hasher
                    .verify_blocking(request.password.clone(), self.dummy_hash.to_string())
                    .await;
                return Err(AuthError::InvalidCredentials.into());
            }
        };

        let matches = self
            .hasher
            .verify_blocking(request.password.clone(), user.password_hash.clone())
            .await;
        if !matches {
            tracing::info!(user_id = %user.id, "Login attempt with wrong password");
            return Err(AuthError::InvalidCredentials.into());
        }

        let pair = TokenPair {
            access_token: self.tokens.issue_access_token(user.id, user.role)?,
            refresh_token: self.tokens.issue_refresh_token(user.id)?,
        };

        tracing::info!(user_id = %user.id, "User logged in");
        Ok((user, pair))
    }

    /// Exchange a refresh token for a new access token.
    ///
    /// The role is read from the current user record, so role changes take
    /// effect at the next refresh and deleted users cannot refresh at all.
    pub async fn refresh_access_token(&self, refresh_token: &str) -> Result<(String, Claims), AppError> {
        let refresh = self.tokens.validate_refresh_token(refresh_token)?;
        let user_id =
            Uuid::parse_str(&refresh.user_id).map_err(|_| AppError::Auth(AuthError::TokenInvalid))?;

        let user = self.users.find_by_id(user_id).await?.ok_or_else(|| {
            tracing::info!(user_id = %user_id, "Refresh token for a user that no longer exists");
            AppError::Auth(AuthError::TokenInvalid)
        })?;

        let token = self.tokens.issue_access_token(user.id, user.role)?;
        let claims = self.tokens.validate_access_token(&token)?;

        tracing::debug!(user_id = %user.id, "Access token refreshed");
        Ok((token, claims))
    }

    pub fn access_cookie(&self, token: String) -> Cookie<'static> {
        cookies::access_cookie(token, self.tokens.access_token_expiry(), self.secure_cookies)
    }

    pub fn refresh_cookie(&self, token: String) -> Cookie<'static> {
        cookies::refresh_cookie(token, self.tokens.refresh_token_expiry(), self.secure_cookies)
    }

    /// Cookies that clear both tokens on the client
    pub fn removal_cookies(&self) -> [Cookie<'static>; 2] {
        [
            cookies::removal_cookie(ACCESS_COOKIE_NAME, self.secure_cookies),
            cookies::removal_cookie(REFRESH_COOKIE_NAME, self.secure_cookies),
        ]
    }
}
