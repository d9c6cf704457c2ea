use actix_web::dev::Server;
use actix_web::middleware::{Logger, NormalizePath};
use actix_web::{error, web, App, HttpServer};
use std::net::TcpListener;
use std::sync::Arc;

use crate::auth::{PasswordHasher, SessionService, TokenService};
use crate::configuration::JwtSettings;
use crate::error::AppError;
use crate::logger::LoggerMiddleware;
use crate::middleware::{Authenticate, Authorize};
use crate::routes::{
    create_product, delete_product, delete_user, get_product, get_user, health_check, list_products,
    list_users, login, logout, me, refresh, register, update_product, update_user,
};
use crate::services::{ProductService, UserService};
use crate::store::Stores;
use crate::validators::Validator;

/// Malformed JSON bodies answer with the regular error envelope
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        tracing::debug!("Rejected request body: {}", err);
        error::Error::from(AppError::BadRequest(format!("Invalid request body: {}", err)))
    })
}

pub fn run(
    listener: TcpListener,
    stores: Stores,
    jwt_config: JwtSettings,
    password_hash_cost: u32,
) -> Result<Server, std::io::Error> {
    let tokens = Arc::new(TokenService::new(&jwt_config));
    let hasher = PasswordHasher::new(password_hash_cost);
    let validator = Validator::default();

    let session = SessionService::new(
        stores.users.clone(),
        tokens,
        hasher,
        validator,
        jwt_config.secure_cookies,
    );
    let session_data = web::Data::new(session.clone());
    let users_data = web::Data::new(UserService::new(stores.users, hasher, validator));
    let products_data = web::Data::new(ProductService::new(stores.products, validator));

    let server = HttpServer::new(move || {
        App::new()
            // Global middleware
            .wrap(NormalizePath::trim())
            .wrap(Logger::default()) // Standard logging
            .wrap(LoggerMiddleware) // Custom logging

            // Shared state
            .app_data(json_config())
            .app_data(session_data.clone())
            .app_data(users_data.clone())
            .app_data(products_data.clone())

            .route("/health_check", web::get().to(health_check))
            .service(
                web::scope("/api/v1")
                    // Public routes
                    .route("/register", web::post().to(register))
                    .route("/login", web::post().to(login))
                    .route("/logout", web::post().to(logout))
                    .route("/refresh", web::post().to(refresh))

                    // Protected routes
                    .service(
                        web::resource("/me")
                            .wrap(Authenticate::new(session.clone()))
                            .route(web::get().to(me)),
                    )
                    .service(
                        web::scope("/users")
                            .wrap(Authenticate::new(session.clone()))
                            .service(
                                web::resource("")
                                    .wrap(Authorize::admin())
                                    .route(web::get().to(list_users)),
                            )
                            .service(
                                web::resource("/{id}")
                                    .route(web::get().to(get_user))
                                    .route(web::put().to(update_user))
                                    .route(web::delete().to(delete_user)),
                            ),
                    )
                    .service(
                        web::scope("/products")
                            .wrap(Authenticate::new(session.clone()))
                            .service(
                                web::resource("")
                                    .route(web::post().to(create_product))
                                    .route(web::get().to(list_products)),
                            )
                            .service(
                                web::resource("/{id}")
                                    .route(web::get().to(get_product))
                                    .route(web::put().to(update_product))
                                    .route(web::delete().to(delete_product)),
                            ),
                    ),
            )
    })
    .listen(listener)?
    .run();

    Ok(server)
}
