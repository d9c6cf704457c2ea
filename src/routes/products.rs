use actix_web::{web, HttpResponse};

use crate::auth::Claims;
use crate::error::{AppError, ErrorContext};
use crate::models::{NewProduct, ProductChanges};
use crate::pagination::Pagination;
use crate::response::ApiResponse;
use crate::services::ProductService;

/// POST /api/v1/products
pub async fn create_product(
    body: web::Json<NewProduct>,
    claims: Claims,
    products: web::Data<ProductService>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("product_create").with_user_id(claims.user_id);

    let product = products.create(body.into_inner()).await.map_err(|e| {
        context.log_error(&e);
        e
    })?;

    Ok(HttpResponse::Created().json(ApiResponse::success("Product created successfully", product)))
}

/// GET /api/v1/products?limit=&page=&sort=
pub async fn list_products(
    pagination: Pagination,
    products: web::Data<ProductService>,
) -> Result<HttpResponse, AppError> {
    let page = products.list(&pagination).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("Products retrieved successfully", page)))
}

/// GET /api/v1/products/{id}
pub async fn get_product(
    path: web::Path<String>,
    products: web::Data<ProductService>,
) -> Result<HttpResponse, AppError> {
    let product = products.get(&path).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("Product retrieved successfully", product)))
}

/// PUT /api/v1/products/{id}
pub async fn update_product(
    path: web::Path<String>,
    body: web::Json<ProductChanges>,
    claims: Claims,
    products: web::Data<ProductService>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("product_update").with_user_id(claims.user_id);

    let product = products.update(&path, &body).await.map_err(|e| {
        context.log_error(&e);
        e
    })?;

    Ok(HttpResponse::Ok().json(ApiResponse::success("Product updated successfully", product)))
}

/// DELETE /api/v1/products/{id}
pub async fn delete_product(
    path: web::Path<String>,
    claims: Claims,
    products: web::Data<ProductService>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("product_delete").with_user_id(claims.user_id);

    products.delete(&path).await.map_err(|e| {
        context.log_error(&e);
        e
    })?;

    Ok(HttpResponse::Ok().json(ApiResponse::message("Product deleted successfully")))
}
