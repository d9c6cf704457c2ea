/// Authentication Routes
///
/// Registration, cookie login/logout, explicit token refresh and the
/// current user.

use actix_web::{web, HttpMessage, HttpRequest, HttpResponse};

use crate::auth::cookies::REFRESH_COOKIE_NAME;
use crate::auth::{Claims, SessionService};
use crate::error::{AppError, AuthError, ErrorContext};
use crate::models::{LoginRequest, RegisterUser};
use crate::response::ApiResponse;
use crate::services::UserService;

/// POST /api/v1/register
///
/// # Errors
/// - 400: Validation errors (every failing field is listed)
/// - 409: Email already registered
pub async fn register(
    body: web::Json<RegisterUser>,
    users: web::Data<UserService>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("user_registration");

    let user = users.register(body.into_inner()).await.map_err(|e| {
        context.log_error(&e);
        e
    })?;

    tracing::info!(
        request_id = %context.request_id,
        user_id = %user.id,
        "User registered successfully"
    );

    Ok(HttpResponse::Created().json(ApiResponse::success("User created successfully", user)))
}

/// POST /api/v1/login
///
/// Sets the `access_token` and `refresh_token` cookies.
///
/// # Errors
/// - 400: Malformed email or missing password
/// - 401: Invalid credentials (email not found or wrong password)
///
/// # Security Notes
/// - Uses same error message for "not found" and "wrong password"
pub async fn login(
    body: web::Json<LoginRequest>,
    session: web::Data<SessionService>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("user_login");

    let (user, tokens) = session.login(&body).await.map_err(|e| {
        context.log_error(&e);
        e
    })?;

    tracing::info!(
        request_id = %context.request_id,
        user_id = %user.id,
        "User logged in successfully"
    );

    Ok(HttpResponse::Ok()
        .cookie(session.access_cookie(tokens.access_token))
        .cookie(session.refresh_cookie(tokens.refresh_token))
        .json(ApiResponse::success("Logged in successfully", user)))
}

/// POST /api/v1/logout
///
/// Tokens are stateless; logging out only clears the cookies.
pub async fn logout(session: web::Data<SessionService>) -> HttpResponse {
    let mut response = HttpResponse::Ok();
    for cookie in session.removal_cookies() {
        response.cookie(cookie);
    }
    response.json(ApiResponse::message("Logged out successfully"))
}

/// POST /api/v1/refresh
///
/// Issues a new access token cookie from the `refresh_token` cookie.
///
/// # Errors
/// - 401: Refresh cookie missing, invalid or expired, or its user is gone
pub async fn refresh(
    req: HttpRequest,
    session: web::Data<SessionService>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("token_refresh");

    let refresh_token = req
        .cookie(REFRESH_COOKIE_NAME)
        .ok_or(AppError::Auth(AuthError::MissingToken))?;

    let (token, claims) = session
        .refresh_access_token(refresh_token.value())
        .await
        .map_err(|e| {
            context.log_error(&e);
            e
        })?;

    tracing::info!(
        request_id = %context.request_id,
        user_id = %claims.user_id,
        "Access token refreshed"
    );

    Ok(HttpResponse::Ok()
        .cookie(session.access_cookie(token))
        .json(ApiResponse::message("Access token refreshed successfully")))
}

/// GET /api/v1/me
pub async fn me(claims: Claims, users: web::Data<UserService>) -> Result<HttpResponse, AppError> {
    let user = users.current(&claims).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("User retrieved successfully", user)))
}
