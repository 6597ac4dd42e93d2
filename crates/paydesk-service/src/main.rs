//! Paydesk Service - payment capture and fulfillment webhooks
//!
//! This is the main entry point for the paydesk service.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use paydesk_service::{create_router, seed_catalog_from_file, AppState, ServiceConfig};
use paydesk_store::RocksStore;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,paydesk=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Paydesk Service");

    // Load configuration from environment
    let config = ServiceConfig::from_env()?;
    let store_path = config.store_path();

    tracing::info!(
        listen_addr = %config.listen_addr,
        store_path = %store_path.display(),
        access_window_days = config.access_window_days,
        catalog_seed = ?config.catalog_seed_path,
        subject_details = config.enable_subject_details,
        "Service configuration loaded"
    );

    // Initialize RocksDB store
    tracing::info!(path = %store_path.display(), "Opening RocksDB store");
    std::fs::create_dir_all(&store_path)?;
    let store = Arc::new(RocksStore::open(&store_path)?);

    if let Some(seed_path) = &config.catalog_seed_path {
        seed_catalog_from_file(store.as_ref(), seed_path)?;
    }

    // Build app state
    let state = AppState::new(store, config.clone());

    // Create the router
    let app = create_router(state);
    tracing::info!("Router configured with all endpoints");

    // Start HTTP server
    tracing::info!(listen_addr = %config.listen_addr, "Starting HTTP server");
    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
