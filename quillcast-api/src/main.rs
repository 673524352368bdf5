//! # Quillcast API Server
//!
//! REST backend for a manuscript-publishing marketplace: authors upload
//! manuscripts, the server extracts the text, synthesizes an audio
//! narration, scores the text against genre keyword tables, and persists
//! the result; purchases go through a payment-intent flow.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p quillcast-api
//! ```

use quillcast_api::app::{build_router, AppState};
use quillcast_api::clients::{
    payments::StripeGateway, storage::HttpBlobStorage, tts::TranslateTts,
};
use quillcast_api::config::Config;
use quillcast_shared::db::{migrations, pool};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quillcast_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "Quillcast API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;

    let db = pool::create_pool(pool::DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        ..Default::default()
    })
    .await?;

    migrations::run_migrations(&db).await?;

    let http = reqwest::Client::new();
    let storage = Arc::new(HttpBlobStorage::new(
        http.clone(),
        &config.storage.endpoint,
        &config.storage.access_key,
        &config.storage.public_url,
    ));
    let tts = Arc::new(TranslateTts::new(http.clone(), &config.tts.endpoint));
    let payments = Arc::new(StripeGateway::new(http, &config.payment.secret_key));

    let bind_address = config.bind_address();
    let state = AppState::new(db.clone(), config, storage, tts, payments);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool::close_pool(db).await;
    tracing::info!("Shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
    } else {
        tracing::info!("Shutdown signal received");
    }
}
