//! Account Hub - JSON API for accounts and devices.
//!
//! Each endpoint decodes a JSON request, runs one parameterized statement
//! against Postgres and encodes the result as JSON.

use std::sync::Arc;
use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;

mod api;
mod auth;
mod config;
mod domain;
mod error;
mod logging;
mod server;
mod storage;

use crate::api::build_router;
use crate::auth::{JwtManager, PasswordHasher};
use crate::config::Config;
use crate::storage::{PostgresStore, Storage};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Account and device persistence.
    pub store: Arc<dyn Storage>,
    /// JWT manager for token operations.
    pub jwt_manager: JwtManager,
    /// bcrypt hashing for account passwords.
    pub password_hasher: PasswordHasher,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file (if present)
    if let Err(e) = dotenvy::dotenv() {
        // Missing .env is expected in production
        eprintln!("Note: No .env file loaded ({e})");
    }

    let config = Config::load().map_err(|e| anyhow::anyhow!("Configuration error: {}", e))?;

    logging::init(config.logging.format);

    tracing::info!("Starting Account Hub v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        host = %config.server.host,
        port = %config.server.port,
        database = %config.database.describe(),
        auth_enabled = %config.auth.enabled,
        "Configuration loaded"
    );

    // Connect to database
    let connect_options = config.database.connect_options()?;
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .acquire_timeout(Duration::from_secs(config.database.acquire_timeout_secs))
        .connect_with(connect_options)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to connect to database");
            anyhow::anyhow!("Database connection error: {}", e)
        })?;

    // Initialize store and schema
    let store = PostgresStore::new(pool);
    store.init_schema().await.map_err(|e| {
        tracing::error!(error = %e, "Failed to initialize database schema");
        anyhow::anyhow!("Schema initialization error: {}", e)
    })?;

    tracing::info!("Database connected and schema initialized");

    let state = AppState {
        store: Arc::new(store),
        jwt_manager: JwtManager::new(
            &config.auth.jwt_secret,
            config.auth.jwt_issuer.clone(),
            config.auth.token_duration_hours,
        ),
        password_hasher: PasswordHasher::new(config.auth.bcrypt_cost),
    };

    let app = build_router(state, config.auth.enabled);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;

    tracing::info!(address = %addr, "Server listening");

    server::serve(
        listener,
        app,
        server::shutdown_signal(),
        config.server.shutdown_timeout(),
    )
    .await?;

    Ok(())
}
