//! IML Operations Tracking Platform - Backend Server
//!
//! Tracks manufacturing orders for an in-mold-labeling and
//! screen-printing workflow through label receipt, production,
//! inventory verification, billing, and dispatch.

use anyhow::Context;
use axum::{routing::get, Router};
use sqlx::postgres::PgPoolOptions;
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod handlers;
mod routes;
mod services;
mod store;
#[cfg(test)]
mod testutil;

pub use config::Config;

use store::{MemoryStore, PgStore, Store};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "iml_ops_backend=debug,tower_http=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::load()?;

    tracing::info!("Starting IML Operations Tracking Server");
    tracing::info!("Environment: {}", config.environment);

    // Select the store backend
    let store: Arc<dyn Store> = match config.store.backend.as_str() {
        "memory" => {
            tracing::warn!("Using in-memory store; data will not survive a restart");
            Arc::new(MemoryStore::new())
        }
        _ => {
            let url = config
                .store
                .url
                .as_deref()
                .context("store.url is required for the postgres backend")?;

            tracing::info!("Connecting to store database...");
            let db_pool = PgPoolOptions::new()
                .max_connections(config.store.max_connections)
                .min_connections(config.store.min_connections)
                .acquire_timeout(Duration::from_secs(30))
                .connect(url)
                .await?;

            tracing::info!("Store connection established");

            // Run migrations in development
            if config.environment == "development" {
                tracing::info!("Running store migrations...");
                sqlx::migrate!("./migrations").run(&db_pool).await?;
                tracing::info!("Migrations completed");
            }

            Arc::new(PgStore::new(db_pool))
        }
    };

    // Create application state
    let state = AppState {
        store,
        config: Arc::new(config.clone()),
    };

    // Build application
    let app = create_app(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes and middleware
fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "IML Operations Tracking Platform API v1.0"
}
