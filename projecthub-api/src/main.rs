//! # ProjectHub API Server
//!
//! Multi-tenant project management over GraphQL.
//!
//! ## Startup
//!
//! 1. Load configuration (defaults, `config/projecthub.toml`, environment)
//! 2. Initialize tracing
//! 3. Open the entity store, creating and migrating the database for the
//!    postgres backend
//! 4. Serve the router until Ctrl+C, then close the store
//!
//! ## Usage
//!
//! ```bash
//! DATABASE_URL=postgresql://localhost/projecthub cargo run -p projecthub-api
//! PROJECTHUB__STORE__BACKEND=memory cargo run -p projecthub-api
//! ```

use anyhow::Context as _;
use projecthub_api::{
    app::{build_router, AppState},
    config::{Config, StoreBackend},
};
use projecthub_shared::{
    db::{
        migrations::{ensure_database_exists, run_migrations},
        pool::create_pool,
    },
    store::{MemoryStore, PgStore, SharedStore},
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("Failed to load configuration")?;

    init_tracing(config.log.json);

    tracing::info!(
        "ProjectHub API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let store = open_store(&config).await?;
    tracing::info!(backend = store.backend(), "Entity store ready");

    let bind_address = config.bind_address();
    let graphql_path = config.api.graphql_path.clone();
    let app = build_router(AppState::new(store.clone(), config));

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;
    tracing::info!("Server listening on http://{}{}", bind_address, graphql_path);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    store.close().await;
    tracing::info!("Server stopped");

    Ok(())
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "projecthub_api=debug,projecthub_shared=debug,tower_http=debug".into()
    });

    let (json_layer, text_layer) = if json {
        (Some(tracing_subscriber::fmt::layer().json()), None)
    } else {
        (None, Some(tracing_subscriber::fmt::layer()))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}

async fn open_store(config: &Config) -> anyhow::Result<SharedStore> {
    match config.store.backend {
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; data is lost on restart");
            Ok(Arc::new(MemoryStore::new()))
        }
        StoreBackend::Postgres => {
            if config.database.run_migrations {
                ensure_database_exists(&config.database.url)
                    .await
                    .context("Failed to create database")?;
            }

            let pool = create_pool(config.pool_config())
                .await
                .context("Failed to connect to PostgreSQL")?;

            if config.database.run_migrations {
                run_migrations(&pool).await.context("Failed to run migrations")?;
            }

            Ok(Arc::new(PgStore::new(pool)))
        }
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, draining connections...");
}
