// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Todo Core - gRPC todo list server
//!
//! Connects the repository, applies migrations, and serves the
//! `TodoListService` until Ctrl-C.

use std::sync::Arc;

use anyhow::Result;
use tracing::{error, info};

use todo_core::config::Config;
use todo_core::handlers::TodoHandlerState;
use todo_core::persistence;
use todo_core::server;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (from crate directory or parent directories)
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("todo_core=info".parse()?),
        )
        .init();

    info!("Starting todo list service");

    // Load configuration
    let config = Config::from_env().map_err(|e| {
        error!("Configuration error: {}", e);
        e
    })?;

    info!(
        grpc_addr = %config.grpc_addr,
        database = ?config.database,
        max_connections = config.max_connections,
        "Configuration loaded"
    );

    // Connect to database (runs migrations)
    info!("Connecting to database...");
    let repository = persistence::connect(&config.database, config.max_connections).await?;
    info!("Database connection established");

    let state = Arc::new(TodoHandlerState::new(repository.clone()));

    // Serve until Ctrl-C
    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for shutdown signal: {}", e);
        }
        info!("Shutting down...");
    };
    let served = server::run_server(config.grpc_addr, state, shutdown).await;

    info!("Closing database connection");
    repository.close().await?;
    info!("Shutdown complete");

    served
}
