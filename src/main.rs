use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use spendings_api::{
    api::{create_router, AppState},
    config::{Config, Environment},
    db::{create_pool, seed, SqliteSpendingStore},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,spendings_api=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    tracing::info!(
        app = %config.app_name,
        version = %config.app_version,
        environment = ?config.environment,
        debug = config.debug_mode,
        "Configuration loaded"
    );

    let pool = create_pool(&config.database_url, config.max_connections).await?;
    let store = SqliteSpendingStore::new(pool);
    store.migrate().await?;

    if config.environment == Environment::Deployment {
        seed::seed_if_empty(&store).await?;
    }

    let addr = config.bind_addr();
    let state = AppState::new(Arc::new(store), config);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}
