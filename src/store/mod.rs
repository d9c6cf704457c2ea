/// Document storage
///
/// Services only see the [`Repository`] traits. Each operation is atomic on a
/// single document; nothing spans several calls.

mod memory;
mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::cmp::Ordering;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::DatabaseError;
use crate::models::{Product, User};
use crate::pagination::SortSpec;

pub use memory::{InMemoryRepository, InMemoryUserRepository};
pub use postgres::{PgProductRepository, PgUserRepository};

/// A stored record the generic stores can order and patch
pub trait Document: Clone + Send + Sync + 'static {
    type Changes: Send + Sync;

    /// Fields a list request may sort by; anything else uses the default sort
    const SORTABLE_FIELDS: &'static [&'static str];

    fn id(&self) -> Uuid;
    fn apply(&mut self, changes: &Self::Changes, now: DateTime<Utc>);
    fn compare_field(&self, other: &Self, field: &str) -> Ordering;

    /// Value that must be unique across the collection, if any
    fn unique_key(&self) -> Option<&str> {
        None
    }
}

#[async_trait]
pub trait Repository<D: Document>: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<D>, DatabaseError>;

    async fn insert(&self, document: &D) -> Result<(), DatabaseError>;

    /// Returns the updated document, or `None` when `id` does not exist
    async fn update_fields(&self, id: Uuid, changes: &D::Changes) -> Result<Option<D>, DatabaseError>;

    /// Returns `false` when `id` does not exist
    async fn delete(&self, id: Uuid) -> Result<bool, DatabaseError>;

    /// One page of documents plus the total count
    async fn list(&self, limit: u64, offset: u64, sort: &SortSpec) -> Result<(Vec<D>, u64), DatabaseError>;
}

#[async_trait]
pub trait UserRepository: Repository<User> {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError>;
}

/// The two collections the application serves
#[derive(Clone)]
pub struct Stores {
    pub users: Arc<dyn UserRepository>,
    pub products: Arc<dyn Repository<Product>>,
}

impl Stores {
    pub fn in_memory() -> Self {
        Self {
            users: Arc::new(InMemoryUserRepository::new()),
            products: Arc::new(InMemoryRepository::<Product>::new()),
        }
    }

    pub fn postgres(pool: PgPool) -> Self {
        Self {
            users: Arc::new(PgUserRepository::new(pool.clone())),
            products: Arc::new(PgProductRepository::new(pool)),
        }
    }
}
