/// Middleware module
///
/// Cookie authentication and role authorization gates.

mod authenticate;
mod authorize;

pub use authenticate::Authenticate;
pub use authorize::Authorize;
