use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use uuid::Uuid;

use crate::store::Document;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    pub in_stock: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// POST /products body
#[derive(Debug, Deserialize)]
pub struct NewProduct {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Option<f64>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub in_stock: bool,
}

impl NewProduct {
    pub fn into_product(self, now: DateTime<Utc>) -> Product {
        Product {
            id: Uuid::new_v4(),
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            price: self.price.unwrap_or_default(),
            category: self.category.trim().to_string(),
            in_stock: self.in_stock,
            created_at: now,
            updated_at: now,
        }
    }
}

/// PUT /products/{id} body and partial update
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub category: Option<String>,
    pub in_stock: Option<bool>,
}

impl ProductChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.category.is_none()
            && self.in_stock.is_none()
    }
}

impl Document for Product {
    type Changes = ProductChanges;

    const SORTABLE_FIELDS: &'static [&'static str] =
        &["created_at", "updated_at", "name", "price", "category", "in_stock"];

    fn id(&self) -> Uuid {
        self.id
    }

    fn apply(&mut self, changes: &ProductChanges, now: DateTime<Utc>) {
        if let Some(name) = &changes.name {
            self.name = name.clone();
        }
        if let Some(description) = &changes.description {
            self.description = description.clone();
        }
        if let Some(price) = changes.price {
            self.price = price;
        }
        if let Some(category) = &changes.category {
            self.category = category.clone();
        }
        if let Some(in_stock) = changes.in_stock {
            self.in_stock = in_stock;
        }
        self.updated_at = now;
    }

    fn compare_field(&self, other: &Self, field: &str) -> Ordering {
        match field {
            "updated_at" => self.updated_at.cmp(&other.updated_at),
            "name" => self.name.cmp(&other.name),
            "price" => self.price.partial_cmp(&other.price).unwrap_or(Ordering::Equal),
            "category" => self.category.cmp(&other.category),
            "in_stock" => self.in_stock.cmp(&other.in_stock),
            _ => self.created_at.cmp(&other.created_at),
        }
    }
}
