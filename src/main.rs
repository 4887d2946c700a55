use std::sync::Arc;

use fitfinder_api::{
    api::{create_router, AppState},
    config::Config,
    db::{self, Cache},
    services::{catalog::PgCatalog, ImageRelay},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let pool = db::create_pool(
        &config.database_url,
        config.max_db_connections,
        config.catalog_query_timeout(),
    )
    .await?;
    db::postgres::run_migrations(&pool).await?;
    tracing::info!("Catalog database ready");

    let relay = ImageRelay::new(config.relay_timeout())?;
    let mut state = AppState::new(
        Arc::new(PgCatalog::new(pool)),
        relay,
        config.catalog_query_timeout(),
        config.pinned_image_origin.clone(),
    );

    let mut cache_writer = None;
    if let Some(redis_url) = &config.redis_url {
        let (cache, handle) = Cache::new(db::create_redis_client(redis_url)?).await;
        state = state.with_cache(cache);
        cache_writer = Some(handle);
        tracing::info!("Subcategory caching enabled");
    }

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    tracing::info!(address = %config.bind_address(), "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(handle) = cache_writer {
        handle.shutdown().await;
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}
