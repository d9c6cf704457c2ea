/// Input validators
///
/// Each request type has one entry point on [`Validator`]. All rules for the
/// request run, and the caller receives every failing field at once.
/// Values are checked after trimming; emails are compared lowercase.

use lazy_static::lazy_static;
use regex::Regex;
use uuid::Uuid;

use crate::error::{AppError, ValidationError};
use crate::models::{LoginRequest, NewProduct, ProductChanges, RegisterUser, Role, UpdateUser, UserChanges};

const MAX_EMAIL_LENGTH: usize = 254; // RFC 5321
const MAX_EMAIL_LOCAL_LENGTH: usize = 64;
const MIN_USER_NAME_LENGTH: usize = 2;
const MAX_USER_NAME_LENGTH: usize = 50;
const MIN_PRODUCT_NAME_LENGTH: usize = 2;
const MAX_PRODUCT_NAME_LENGTH: usize = 100;
const MAX_DESCRIPTION_LENGTH: usize = 500;
const MAX_CATEGORY_LENGTH: usize = 50;
const DEFAULT_MIN_PASSWORD_LENGTH: usize = 6;
const MAX_PASSWORD_BYTES: usize = 72; // bcrypt input limit
const MIN_AGE: i32 = 0;
const MAX_AGE: i32 = 120;

lazy_static! {
    // RFC 5322 simplified email regex (practical validation)
    static ref EMAIL_REGEX: Regex = Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$"
    ).unwrap();
}

/// Trimmed, lowercase form under which emails are stored and looked up
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Collects failures across all rules of one request
#[derive(Default)]
struct Checks {
    errors: Vec<ValidationError>,
}

impl Checks {
    fn check(&mut self, result: Result<(), ValidationError>) {
        if let Err(e) = result {
            self.errors.push(e);
        }
    }

    fn finish(self) -> Result<(), AppError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::validation(self.errors))
        }
    }
}

fn text(field: &str, value: &str, min: usize, max: usize) -> Result<(), ValidationError> {
    let trimmed = value.trim();
    let length = trimmed.chars().count();

    if trimmed.is_empty() {
        return Err(ValidationError::EmptyField(field.to_string()));
    }
    if length < min {
        return Err(ValidationError::TooShort(field.to_string(), min));
    }
    if length > max {
        return Err(ValidationError::TooLong(field.to_string(), max));
    }
    // Null bytes and other control characters
    if trimmed.chars().any(|c| c.is_control()) {
        return Err(ValidationError::InvalidFormat(field.to_string()));
    }
    Ok(())
}

fn email(value: &str) -> Result<(), ValidationError> {
    let trimmed = value.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::EmptyField("email".to_string()));
    }
    if trimmed.len() > MAX_EMAIL_LENGTH {
        return Err(ValidationError::TooLong("email".to_string(), MAX_EMAIL_LENGTH));
    }
    if !EMAIL_REGEX.is_match(trimmed) {
        return Err(ValidationError::InvalidFormat("email".to_string()));
    }
    match trimmed.find('@') {
        Some(at) if at <= MAX_EMAIL_LOCAL_LENGTH => Ok(()),
        _ => Err(ValidationError::InvalidFormat("email".to_string())),
    }
}

fn password(value: &str, min: usize) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::EmptyField("password".to_string()));
    }
    if value.chars().count() < min {
        return Err(ValidationError::TooShort("password".to_string(), min));
    }
    if value.len() > MAX_PASSWORD_BYTES {
        return Err(ValidationError::TooLong("password".to_string(), MAX_PASSWORD_BYTES));
    }
    Ok(())
}

fn age(value: i32) -> Result<(), ValidationError> {
    if (MIN_AGE..=MAX_AGE).contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::OutOfRange(
            "age".to_string(),
            i64::from(MIN_AGE),
            i64::from(MAX_AGE),
        ))
    }
}

fn price(value: Option<f64>) -> Result<(), ValidationError> {
    match value {
        None => Err(ValidationError::EmptyField("price".to_string())),
        Some(p) if !p.is_finite() => Err(ValidationError::InvalidFormat("price".to_string())),
        Some(p) if p < 0.0 => Err(ValidationError::Negative("price".to_string())),
        Some(_) => Ok(()),
    }
}

/// Stateless request validator, built once at startup and shared by the
/// services
#[derive(Debug, Clone, Copy)]
pub struct Validator {
    min_password_length: usize,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_PASSWORD_LENGTH)
    }
}

impl Validator {
    pub fn new(min_password_length: usize) -> Self {
        Self { min_password_length }
    }

    pub fn validate_registration(&self, input: &RegisterUser) -> Result<(), AppError> {
        let mut checks = Checks::default();
        checks.check(text("name", &input.name, MIN_USER_NAME_LENGTH, MAX_USER_NAME_LENGTH));
        checks.check(email(&input.email));
        checks.check(password(&input.password, self.min_password_length));
        if let Some(value) = input.age {
            checks.check(age(value));
        }
        checks.finish()
    }

    /// Shape-only checks; credentials are verified by the session service
    pub fn validate_login(&self, input: &LoginRequest) -> Result<(), AppError> {
        let mut checks = Checks::default();
        checks.check(email(&input.email));
        if input.password.is_empty() {
            checks.check(Err(ValidationError::EmptyField("password".to_string())));
        }
        checks.finish()
    }

    /// Validate only the supplied fields and turn them into store changes
    pub fn validate_user_update(&self, input: &UpdateUser) -> Result<UserChanges, AppError> {
        let mut checks = Checks::default();
        if let Some(name) = &input.name {
            checks.check(text("name", name, MIN_USER_NAME_LENGTH, MAX_USER_NAME_LENGTH));
        }
        if let Some(value) = &input.email {
            checks.check(email(value));
        }
        if let Some(value) = input.age {
            checks.check(age(value));
        }
        let role = match input.role.as_deref().map(|r| r.trim().parse::<Role>()) {
            Some(Ok(role)) => Some(role),
            Some(Err(e)) => {
                checks.check(Err(e));
                None
            }
            None => None,
        };
        checks.finish()?;

        let changes = UserChanges {
            name: input.name.as_deref().map(|n| n.trim().to_string()),
            email: input.email.as_deref().map(normalize_email),
            age: input.age,
            role,
        };
        if changes.is_empty() {
            return Err(AppError::BadRequest("No fields to update".to_string()));
        }
        Ok(changes)
    }

    pub fn validate_new_product(&self, input: &NewProduct) -> Result<(), AppError> {
        let mut checks = Checks::default();
        checks.check(text("name", &input.name, MIN_PRODUCT_NAME_LENGTH, MAX_PRODUCT_NAME_LENGTH));
        checks.check(text("description", &input.description, 1, MAX_DESCRIPTION_LENGTH));
        checks.check(price(input.price));
        checks.check(text("category", &input.category, 1, MAX_CATEGORY_LENGTH));
        checks.finish()
    }

    /// Validate only the supplied fields and return them trimmed
    pub fn validate_product_update(&self, input: &ProductChanges) -> Result<ProductChanges, AppError> {
        let mut checks = Checks::default();
        if let Some(name) = &input.name {
            checks.check(text("name", name, MIN_PRODUCT_NAME_LENGTH, MAX_PRODUCT_NAME_LENGTH));
        }
        if let Some(description) = &input.description {
            checks.check(text("description", description, 1, MAX_DESCRIPTION_LENGTH));
        }
        if input.price.is_some() {
            checks.check(price(input.price));
        }
        if let Some(category) = &input.category {
            checks.check(text("category", category, 1, MAX_CATEGORY_LENGTH));
        }
        checks.finish()?;

        if input.is_empty() {
            return Err(AppError::BadRequest("No fields to update".to_string()));
        }
        Ok(ProductChanges {
            name: input.name.as_deref().map(|s| s.trim().to_string()),
            description: input.description.as_deref().map(|s| s.trim().to_string()),
            price: input.price,
            category: input.category.as_deref().map(|s| s.trim().to_string()),
            in_stock: input.in_stock,
        })
    }

    /// Parse a path id; anything but a UUID is a bad request
    pub fn parse_id(&self, raw: &str, resource: &str) -> Result<Uuid, AppError> {
        Uuid::parse_str(raw.trim()).map_err(|_| AppError::BadRequest(format!("Invalid {} ID", resource)))
    }
}
