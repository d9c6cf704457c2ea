mod auth;
mod health_check;
mod products;
mod users;

pub use auth::{login, logout, me, refresh, register};
pub use health_check::health_check;
pub use products::{create_product, delete_product, get_product, list_products, update_product};
pub use users::{delete_user, get_user, list_users, update_user};
