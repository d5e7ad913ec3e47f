// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Imagify API Server
//!
//! Registers users, issues session tokens and reports credit balances.

use imagify::{
    config::Config,
    db::{FileStore, UserDirectory},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(port = config.port, "Starting Imagify API");

    // Open the user store
    let store = FileStore::open(&config.data_dir)?;
    let users = UserDirectory::new(Arc::new(store));

    let state = Arc::new(AppState {
        config: config.clone(),
        users,
    });

    // Build router
    let app = imagify::routes::create_router(state);

    // Start server
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

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("imagify=debug,info"));

    tracing_subscriber::registry().with(filter).with(format).init();
}
