use actix_web::{web, HttpResponse};

use crate::auth::Claims;
use crate::error::{AppError, ErrorContext};
use crate::models::UpdateUser;
use crate::pagination::Pagination;
use crate::response::ApiResponse;
use crate::services::UserService;

/// GET /api/v1/users (admin only)
pub async fn list_users(
    pagination: Pagination,
    users: web::Data<UserService>,
) -> Result<HttpResponse, AppError> {
    let page = users.list(&pagination).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("Users retrieved successfully", page)))
}

/// GET /api/v1/users/{id}
pub async fn get_user(
    path: web::Path<String>,
    claims: Claims,
    users: web::Data<UserService>,
) -> Result<HttpResponse, AppError> {
    let user = users.get(&claims, &path).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("User retrieved successfully", user)))
}

/// PUT /api/v1/users/{id}
///
/// Partial update; only supplied fields change.
///
/// # Errors
/// - 400: Invalid id, invalid field or empty body
/// - 403: Updating another user, or changing a role without being admin
/// - 404: No such user
/// - 409: Email already in use
pub async fn update_user(
    path: web::Path<String>,
    body: web::Json<UpdateUser>,
    claims: Claims,
    users: web::Data<UserService>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("user_update").with_user_id(claims.user_id.clone());

    let user = users.update(&claims, &path, &body).await.map_err(|e| {
        context.log_error(&e);
        e
    })?;

    Ok(HttpResponse::Ok().json(ApiResponse::success("User updated successfully", user)))
}

/// DELETE /api/v1/users/{id}
pub async fn delete_user(
    path: web::Path<String>,
    claims: Claims,
    users: web::Data<UserService>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("user_delete").with_user_id(claims.user_id.clone());

    users.delete(&claims, &path).await.map_err(|e| {
        context.log_error(&e);
        e
    })?;

    Ok(HttpResponse::Ok().json(ApiResponse::message("User deleted successfully")))
}
