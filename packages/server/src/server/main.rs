// Main entry point for the staff provisioning API server

use std::sync::Arc;

use anyhow::{Context, Result};
use gotrue::{GoTrueAdminService, GoTrueOptions};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use server_core::kernel::{
    scheduled_tasks::start_scheduler, GoTrueAdapter, HttpObjectStore, PgProfileStore, ServerDeps,
};
use server_core::server::{build_router, AppState};
use server_core::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,server_core=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting staff provisioning API");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!("Configuration loaded");

    // Connect to database
    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connected");

    // Run migrations
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Migrations complete");

    // Wire up external collaborators
    let gotrue = Arc::new(GoTrueAdminService::new(GoTrueOptions {
        base_url: config.gotrue_url.clone(),
        service_role_key: config.gotrue_service_role_key.clone(),
    }));
    let deps = Arc::new(ServerDeps::new(
        Arc::new(GoTrueAdapter::new(gotrue)),
        Arc::new(PgProfileStore::new(pool.clone())),
        Arc::new(HttpObjectStore::new(
            config.storage_url.clone(),
            config.storage_api_key.clone(),
            config.storage_bucket.clone(),
        )),
    ));

    // Periodic full badge-counter rebuild
    let _scheduler = start_scheduler(deps.clone(), &config.reconcile_schedule)
        .await
        .context("Failed to start scheduler")?;

    // Build application
    let app = build_router(AppState {
        db_pool: pool,
        deps,
    });

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
