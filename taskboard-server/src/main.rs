//! Taskboard server -- server-rendered task manager.
//!
//! An axum HTTP server exposing CRUD routes for tasks plus a
//! "toggle complete" action. Every page is rendered server-side; missing
//! records redirect to the task list instead of returning an error status.
//!
//! # Usage
//!
//! ```bash
//! # Run on default address 0.0.0.0:3000
//! cargo run --bin taskboard-server
//!
//! # Run on custom address
//! cargo run --bin taskboard-server -- --bind 127.0.0.1:8080
//!
//! # Or via environment variable
//! TASKBOARD_ADDR=127.0.0.1:8080 cargo run --bin taskboard-server
//! ```

use std::sync::Arc;

use clap::Parser;
use taskboard_server::config::{ServerCliArgs, ServerConfig};
use taskboard_server::server::{self, AppState};

#[tokio::main]
async fn main() {
    let cli = ServerCliArgs::parse();

    // Resolve the layered configuration before logging is up, so a broken
    // config file is reported on stderr.
    let config = match ServerConfig::load(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("could not load configuration: {e}");
            std::process::exit(1);
        }
    };

    // An explicit RUST_LOG-style env filter wins over the configured level.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    tracing::info!(addr = %config.bind_addr, site = %config.site_name, "starting taskboard");

    let state = Arc::new(AppState::new(config.site_name.clone()));

    match server::start_server(&config.bind_addr, state).await {
        Ok((bound_addr, handle)) => {
            tracing::info!(addr = %bound_addr, "listening for requests");
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "server exited unexpectedly");
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "could not bind server");
            std::process::exit(1);
        }
    }
}
