use sqlx::postgres::PgPoolOptions;
use std::net::TcpListener;
use storefront::configuration::get_configuration;
use storefront::startup::run;
use storefront::store::Stores;
use storefront::telemetry::init_telemetry;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    init_telemetry();

    tracing::info!("Starting application");

    let configuration = match get_configuration() {
        Ok(config) => {
            tracing::info!("Configuration loaded successfully");
            config
        }
        Err(e) => {
            tracing::error!("Failed to read configuration: {}", e);
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "Configuration error",
            ));
        }
    };

    let stores = if configuration.database.in_memory {
        tracing::warn!("Using in-memory storage; data is lost on restart");
        Stores::in_memory()
    } else {
        tracing::info!("Attempting to connect to database");

        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(&configuration.database.connection_string())
            .await
            .map_err(|e| {
                tracing::error!("Failed to create connection pool: {}", e);
                std::io::Error::new(
                    std::io::ErrorKind::ConnectionRefused,
                    "Database connection error",
                )
            })?;

        sqlx::migrate!("./migrations").run(&pool).await.map_err(|e| {
            tracing::error!("Failed to run database migrations: {}", e);
            std::io::Error::new(std::io::ErrorKind::Other, "Database migration error")
        })?;

        tracing::info!("Database connection pool created successfully");
        Stores::postgres(pool)
    };

    let address = format!(
        "{}:{}",
        configuration.application.host, configuration.application.port
    );
    tracing::info!("Binding server to address: {}", address);

    let listener = TcpListener::bind(&address)?;

    let server = run(
        listener,
        stores,
        configuration.jwt,
        configuration.application.password_hash_cost,
    )?;
    tracing::info!("Server started successfully");

    server.await
}
