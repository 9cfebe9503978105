// SPDX-License-Identifier: MIT
// Copyright 2026 The Pathy Authors

//! Pathy API Server
//!
//! Hosts the route recorder: recording sessions fed by device location
//! reports, and the saved-route list backed by the configured route store.

use pathy::{
    config::{Config, StoreBackend},
    db::{FirestoreDb, MemoryRouteStore, RouteStore},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let config = Config::from_env()?;
    tracing::info!(port = config.port, "Starting Pathy API");

    let store: Arc<dyn RouteStore> = match config.store_backend {
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory route store; routes are lost on restart");
            Arc::new(MemoryRouteStore::new())
        }
        StoreBackend::Firestore => Arc::new(FirestoreDb::new(&config.gcp_project_id).await?),
    };

    let state = Arc::new(AppState::new(config.clone(), store));
    let app = pathy::routes::create_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("pathy=debug,info")),
        )
        .with(format)
        .init();
}
