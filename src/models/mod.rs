/// Stored documents and the request bodies that create or change them.

mod product;
mod user;

pub use product::{NewProduct, Product, ProductChanges};
pub use user::{LoginRequest, RegisterUser, Role, UpdateUser, User, UserChanges};
