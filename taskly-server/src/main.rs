//! Taskly task server -- authoritative per-owner task store.
//!
//! An axum REST server that owns the task collection and enforces owner
//! isolation on every operation. Authentication happens in front of it;
//! requests arrive with the resolved owner identity in a trusted header.
//!
//! # Usage
//!
//! ```bash
//! # Run on default address 0.0.0.0:8080
//! cargo run --bin taskly-server
//!
//! # Run on custom address
//! cargo run --bin taskly-server -- --bind 127.0.0.1:3000
//!
//! # Or via environment variable
//! TASKLY_ADDR=127.0.0.1:3000 cargo run --bin taskly-server
//! ```

use std::sync::Arc;

use clap::Parser;

use taskly_server::config::{ServerCliArgs, ServerConfig};
use taskly_server::routes::{self, AppState};
use taskly_server::store::TaskStore;

#[tokio::main]
async fn main() {
    let cli = ServerCliArgs::parse();

    // Load config from CLI args + config file + env vars + defaults.
    let config = match ServerConfig::load(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading configuration: {e}");
            std::process::exit(1);
        }
    };

    // Initialize tracing with the resolved log level.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    tracing::info!(addr = %config.bind_addr, "starting taskly server");

    let store = TaskStore::with_default_limit(config.default_page_size);
    let state = Arc::new(AppState::new(store));

    match routes::start_server_with_state(&config.bind_addr, state).await {
        Ok((bound_addr, handle)) => {
            tracing::info!(addr = %bound_addr, "taskly server listening");
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "server task failed");
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to start server");
            std::process::exit(1);
        }
    }
}
