// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Repository interfaces and backends for todo-core.
//!
//! This module defines the storage abstraction consumed by the handlers and
//! its implementations: PostgreSQL, SQLite, and an in-memory fixture.

pub mod memory;
pub mod postgres;
pub mod sqlite;

pub use self::memory::MemoryRepository;
pub use self::postgres::PostgresRepository;
pub use self::sqlite::SqliteRepository;

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::postgres::PgConnectOptions;

use crate::config::DatabaseConfig;
use crate::error::CoreError;
use crate::todo::Todo;

/// Storage capability used by the todo handlers.
///
/// Every backend honours the same contract:
/// - ids returned by `insert` are strictly increasing and never 0
/// - a missing row is `None` (`get`, `update`) or a count of 0 (`delete`), never an error
/// - `list` is ordered by ascending id
#[async_trait]
pub trait Repository: Send + Sync {
    /// Persist a todo whose id is unset and return the id assigned to it.
    async fn insert(&self, todo: &Todo) -> Result<i32, CoreError>;

    /// Fetch the todo with `id`.
    async fn get(&self, id: i32) -> Result<Option<Todo>, CoreError>;

    /// Overwrite title, note and due date of the row matching `todo.id`,
    /// returning the row as stored.
    async fn update(&self, todo: &Todo) -> Result<Option<Todo>, CoreError>;

    /// Remove the row with `id`, returning how many rows were removed.
    async fn delete(&self, id: i32) -> Result<u64, CoreError>;

    /// All todos, ascending by id.
    async fn list(&self) -> Result<Vec<Todo>, CoreError>;

    /// Release the underlying resources. Not guaranteed to be idempotent.
    async fn close(&self) -> Result<(), CoreError>;
}

/// Connect the repository backend selected by `config`.
///
/// `sqlite:` URLs open a [`SqliteRepository`]; everything else is treated as
/// PostgreSQL. Migrations are applied before the repository is returned.
pub async fn connect(
    config: &DatabaseConfig,
    max_connections: u32,
) -> Result<Arc<dyn Repository>, CoreError> {
    match config {
        DatabaseConfig::Url(url) if config.is_sqlite() => Ok(Arc::new(
            SqliteRepository::connect(url, max_connections).await?,
        )),
        DatabaseConfig::Url(url) => {
            let options: PgConnectOptions = url
                .parse()
                .map_err(|e| CoreError::database("connect", e))?;
            Ok(Arc::new(
                PostgresRepository::connect(options, max_connections).await?,
            ))
        }
        DatabaseConfig::Postgres {
            user,
            password,
            host,
            port,
            database,
        } => {
            let options = PgConnectOptions::new()
                .host(host)
                .port(*port)
                .username(user)
                .password(password)
                .database(database);
            Ok(Arc::new(
                PostgresRepository::connect(options, max_connections).await?,
            ))
        }
    }
}
