use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Document, Repository, UserRepository};
use crate::error::DatabaseError;
use crate::models::User;
use crate::pagination::{SortDirection, SortSpec};

/// Process-local store. Used by the test suite and by
/// `database.in_memory = true` for local runs without Postgres.
pub struct InMemoryRepository<D: Document> {
    documents: RwLock<HashMap<Uuid, D>>,
}

pub type InMemoryUserRepository = InMemoryRepository<User>;

impl<D: Document> InMemoryRepository<D> {
    pub fn new() -> Self {
        Self {
            documents: RwLock::new(HashMap::new()),
        }
    }
}

impl<D: Document> Default for InMemoryRepository<D> {
    fn default() -> Self {
        Self::new()
    }
}

fn key_taken<D: Document>(documents: &HashMap<Uuid, D>, key: &str, except: Uuid) -> bool {
    documents
        .values()
        .any(|doc| doc.id() != except && doc.unique_key() == Some(key))
}

#[async_trait]
impl<D: Document> Repository<D> for InMemoryRepository<D> {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<D>, DatabaseError> {
        Ok(self.documents.read().await.get(&id).cloned())
    }

    async fn insert(&self, document: &D) -> Result<(), DatabaseError> {
        let mut documents = self.documents.write().await;
        if documents.contains_key(&document.id()) {
            return Err(DatabaseError::UniqueConstraintViolation(document.id().to_string()));
        }
        if let Some(key) = document.unique_key() {
            if key_taken(&documents, key, document.id()) {
                return Err(DatabaseError::UniqueConstraintViolation(key.to_string()));
            }
        }
        documents.insert(document.id(), document.clone());
        Ok(())
    }

    async fn update_fields(&self, id: Uuid, changes: &D::Changes) -> Result<Option<D>, DatabaseError> {
        let mut documents = self.documents.write().await;
        let mut updated = match documents.get(&id) {
            Some(document) => document.clone(),
            None => return Ok(None),
        };
        updated.apply(changes, Utc::now());

        if let Some(key) = updated.unique_key() {
            if key_taken(&documents, key, id) {
                return Err(DatabaseError::UniqueConstraintViolation(key.to_string()));
            }
        }

        documents.insert(id, updated.clone());
        Ok(Some(updated))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DatabaseError> {
        Ok(self.documents.write().await.remove(&id).is_some())
    }

    async fn list(&self, limit: u64, offset: u64, sort: &SortSpec) -> Result<(Vec<D>, u64), DatabaseError> {
        let sort = sort.restrict(D::SORTABLE_FIELDS);
        let mut all: Vec<D> = self.documents.read().await.values().cloned().collect();
        let total = all.len() as u64;

        all.sort_by(|a, b| {
            let ordering = a.compare_field(b, &sort.field).then_with(|| a.id().cmp(&b.id()));
            match sort.direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });

        let page = all
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect();
        Ok((page, total))
    }
}

#[async_trait]
impl UserRepository for InMemoryRepository<User> {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        Ok(self
            .documents
            .read()
            .await
            .values()
            .find(|user| user.email == email)
            .cloned())
    }
}
