use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::ValidationError;
use crate::store::Document;

/// Authorization role carried in access tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub const NAMES: &'static [&'static str] = &["admin", "user"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "user" => Ok(Role::User),
            _ => Err(ValidationError::NotOneOf("role".to_string(), Role::NAMES)),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub age: i32,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial update; `None` leaves the stored value untouched
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub age: Option<i32>,
    pub role: Option<Role>,
}

impl UserChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.age.is_none() && self.role.is_none()
    }
}

impl Document for User {
    type Changes = UserChanges;

    const SORTABLE_FIELDS: &'static [&'static str] =
        &["created_at", "updated_at", "name", "email", "age", "role"];

    fn id(&self) -> Uuid {
        self.id
    }

    fn apply(&mut self, changes: &UserChanges, now: DateTime<Utc>) {
        if let Some(name) = &changes.name {
            self.name = name.clone();
        }
        if let Some(email) = &changes.email {
            self.email = email.clone();
        }
        if let Some(age) = changes.age {
            self.age = age;
        }
        if let Some(role) = changes.role {
            self.role = role;
        }
        self.updated_at = now;
    }

    fn compare_field(&self, other: &Self, field: &str) -> Ordering {
        match field {
            "updated_at" => self.updated_at.cmp(&other.updated_at),
            "name" => self.name.cmp(&other.name),
            "email" => self.email.cmp(&other.email),
            "age" => self.age.cmp(&other.age),
            "role" => self.role.as_str().cmp(other.role.as_str()),
            _ => self.created_at.cmp(&other.created_at),
        }
    }

    fn unique_key(&self) -> Option<&str> {
        Some(&self.email)
    }
}

/// POST /register body
#[derive(Debug, Deserialize)]
pub struct RegisterUser {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    pub age: Option<i32>,
}

/// PUT /users/{id} body
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUser {
    pub name: Option<String>,
    pub email: Option<String>,
    pub age: Option<i32>,
    pub role: Option<String>,
}

/// POST /login body
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}
