/// Authentication module
///
/// Handles JWT token generation/validation, password hashing,
/// session cookies and role checks.

mod authorize;
mod claims;
pub mod cookies;
mod jwt;
mod password;
mod session;

pub use authorize::{authorize, authorize_owner_or_admin};
pub use claims::{Claims, RefreshClaims};
pub use jwt::{validate_token, TokenError, TokenService};
pub use password::{HashError, PasswordHasher};
pub use session::{SessionService, TokenPair};
