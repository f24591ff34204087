// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! VeloVibe API Server
//!
//! Serves the workout log, its derived statistics and AI coaching to the
//! web frontend.

use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use velovibe::{
    config::Config,
    db::FileStore,
    services::{CoachingBridge, WorkoutStore},
    AppState,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(port = config.port, "Starting VeloVibe API");

    // Open persisted state, migrating older data in place
    let kv = Arc::new(FileStore::new(&config.data_dir)?);
    let store = WorkoutStore::open(kv);
    tracing::info!(
        exercises = store.exercises().len(),
        workouts = store.workouts().len(),
        selected = %store.selected_exercise_id(),
        "Workout store ready"
    );

    let coach = CoachingBridge::from_config(&config)?;

    // Build shared state
    let state = Arc::new(AppState::new(config.clone(), store, coach));

    // Build router
    let app = velovibe::routes::create_router(state);

    // Start server
    let addr = format!("{}:{}", config.bind_address, config.port);
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
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("velovibe=debug,info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(format)
        .init();
}
