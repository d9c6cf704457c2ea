use chrono::Utc;
use std::sync::Arc;

use crate::error::AppError;
use crate::models::{NewProduct, Product, ProductChanges};
use crate::pagination::{PaginatedResponse, Pagination};
use crate::store::Repository;
use crate::validators::Validator;

const PRODUCT_NOT_FOUND: &str = "Product not found";

#[derive(Clone)]
pub struct ProductService {
    products: Arc<dyn Repository<Product>>,
    validator: Validator,
}

impl ProductService {
    pub fn new(products: Arc<dyn Repository<Product>>, validator: Validator) -> Self {
        Self { products, validator }
    }

    pub async fn create(&self, input: NewProduct) -> Result<Product, AppError> {
        self.validator.validate_new_product(&input)?;

        let product = input.into_product(Utc::now());
        self.products.insert(&product).await?;

        tracing::info!(product_id = %product.id, "Product created");
        Ok(product)
    }

    pub async fn get(&self, raw_id: &str) -> Result<Product, AppError> {
        let id = self.validator.parse_id(raw_id, "product")?;
        self.products
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(PRODUCT_NOT_FOUND.to_string()))
    }

    pub async fn update(&self, raw_id: &str, input: &ProductChanges) -> Result<Product, AppError> {
        let id = self.validator.parse_id(raw_id, "product")?;
        let changes = self.validator.validate_product_update(input)?;

        let product = self
            .products
            .update_fields(id, &changes)
            .await?
            .ok_or_else(|| AppError::NotFound(PRODUCT_NOT_FOUND.to_string()))?;

        tracing::info!(product_id = %id, "Product updated");
        Ok(product)
    }

    pub async fn delete(&self, raw_id: &str) -> Result<(), AppError> {
        let id = self.validator.parse_id(raw_id, "product")?;
        if !self.products.delete(id).await? {
            return Err(AppError::NotFound(PRODUCT_NOT_FOUND.to_string()));
        }

        tracing::info!(product_id = %id, "Product deleted");
        Ok(())
    }

    pub async fn list(&self, pagination: &Pagination) -> Result<PaginatedResponse<Product>, AppError> {
        let (products, total) = self
            .products
            .list(pagination.limit(), pagination.offset(), pagination.sort())
            .await?;
        Ok(pagination.build_response(products, total))
    }
}
