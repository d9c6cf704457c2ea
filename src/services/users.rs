use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use super::conflict_or_database;
use crate::auth::{authorize_owner_or_admin, Claims, PasswordHasher};
use crate::error::AppError;
use crate::models::{RegisterUser, Role, UpdateUser, User};
use crate::pagination::{PaginatedResponse, Pagination};
use crate::store::UserRepository;
use crate::validators::{normalize_email, Validator};

const DUPLICATE_EMAIL: &str = "Email already in use";
const USER_NOT_FOUND: &str = "User not found";

#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserRepository>,
    hasher: PasswordHasher,
    validator: Validator,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>, hasher: PasswordHasher, validator: Validator) -> Self {
        Self {
            users,
            hasher,
            validator,
        }
    }

    /// Self-registration; the new account always gets the `user` role
    pub async fn register(&self, input: RegisterUser) -> Result<User, AppError> {
        self.validator.validate_registration(&input)?;

        let password_hash = self.hasher.hash_blocking(input.password).await?;
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            name: input.name.trim().to_string(),
            email: normalize_email(&input.email),
            password_hash,
            age: input.age.unwrap_or_default(),
            role: Role::User,
            created_at: now,
            updated_at: now,
        };

        self.users
            .insert(&user)
            .await
            .map_err(|e| conflict_or_database(e, DUPLICATE_EMAIL))?;

        tracing::info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    /// The caller's own record
    pub async fn current(&self, claims: &Claims) -> Result<User, AppError> {
        self.users
            .find_by_id(claims.user_id()?)
            .await?
            .ok_or_else(|| AppError::NotFound(USER_NOT_FOUND.to_string()))
    }

    pub async fn get(&self, claims: &Claims, raw_id: &str) -> Result<User, AppError> {
        let id = self.validator.parse_id(raw_id, "user")?;
        authorize_owner_or_admin(claims, id)?;

        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(USER_NOT_FOUND.to_string()))
    }

    /// Partial update. Only admins may change a role.
    pub async fn update(&self, claims: &Claims, raw_id: &str, input: &UpdateUser) -> Result<User, AppError> {
        let id = self.validator.parse_id(raw_id, "user")?;
        authorize_owner_or_admin(claims, id)?;

        let changes = self.validator.validate_user_update(input)?;
        if changes.role.is_some() && !claims.is_admin() {
            return Err(AppError::Forbidden("Only admins can change roles".to_string()));
        }

        let user = self
            .users
            .update_fields(id, &changes)
            .await
            .map_err(|e| conflict_or_database(e, DUPLICATE_EMAIL))?
            .ok_or_else(|| AppError::NotFound(USER_NOT_FOUND.to_string()))?;

        tracing::info!(user_id = %id, updated_by = %claims.user_id, "User updated");
        Ok(user)
    }

    pub async fn delete(&self, claims: &Claims, raw_id: &str) -> Result<(), AppError> {
        let id = self.validator.parse_id(raw_id, "user")?;
        authorize_owner_or_admin(claims, id)?;

        if !self.users.delete(id).await? {
            return Err(AppError::NotFound(USER_NOT_FOUND.to_string()));
        }

        tracing::info!(user_id = %id, deleted_by = %claims.user_id, "User deleted");
        Ok(())
    }

    pub async fn list(&self, pagination: &Pagination) -> Result<PaginatedResponse<User>, AppError> {
        let (users, total) = self
            .users
            .list(pagination.limit(), pagination.offset(), pagination.sort())
            .await?;
        Ok(pagination.build_response(users, total))
    }
}
