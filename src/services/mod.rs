/// Business logic between the HTTP handlers and the stores
///
/// Store errors are translated into [`AppError`] here and nowhere else.

mod products;
mod users;

pub use products::ProductService;
pub use users::UserService;

use crate::error::{AppError, DatabaseError};

/// Unique violations become 409 with `message`; everything else stays a
/// database error
fn conflict_or_database(err: DatabaseError, message: &str) -> AppError {
    match err {
        DatabaseError::UniqueConstraintViolation(detail) => {
            tracing::debug!("Unique constraint violated: {}", detail);
            AppError::Conflict(message.to_string())
        }
        other => AppError::Database(other),
    }
}
