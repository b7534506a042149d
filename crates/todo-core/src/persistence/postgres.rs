// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! PostgreSQL-backed repository.
//!
//! Provides all durable storage access functions for the `todo` table.

use sqlx::PgPool;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use tracing::info;

use crate::error::CoreError;
use crate::migrations;
use crate::todo::Todo;

use super::Repository;

/// PostgreSQL-backed repository implementation.
#[derive(Clone)]
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    /// Create a new Postgres-backed repository over an existing pool.
    ///
    /// The schema is expected to be in place (see [`migrations::run_postgres`]).
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect, verify the connection and apply migrations.
    pub async fn connect(
        options: PgConnectOptions,
        max_connections: u32,
    ) -> Result<Self, CoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .map_err(|e| CoreError::database("connect", e))?;

        let row: (i32,) = sqlx::query_as("SELECT 1").fetch_one(&pool).await?;
        info!(result = row.0, "Database health check passed");

        migrations::run_postgres(&pool).await?;

        Ok(Self { pool })
    }

    /// The underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

// ============================================================================
// Todo Operations
// ============================================================================

/// Insert a todo and return the sequence-assigned id.
pub async fn insert_todo(pool: &PgPool, todo: &Todo) -> Result<i32, CoreError> {
    let (id,): (i32,) = sqlx::query_as(
        r#"
        INSERT INTO todo (title, note, due_date)
        VALUES ($1, $2, $3)
        RETURNING id
        "#,
    )
    .bind(&todo.title)
    .bind(&todo.note)
    .bind(todo.due_date)
    .fetch_one(pool)
    .await
    .map_err(|e| CoreError::database("insert", e))?;

    Ok(id)
}

/// Get a todo by ID.
pub async fn get_todo(pool: &PgPool, id: i32) -> Result<Option<Todo>, CoreError> {
    let record = sqlx::query_as::<_, Todo>(
        r#"
        SELECT id, title, COALESCE(note, '') AS note, due_date
        FROM todo
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(|e| CoreError::database("get", e))?;

    Ok(record)
}

/// Overwrite the mutable columns of a todo, returning the stored row.
pub async fn update_todo(pool: &PgPool, todo: &Todo) -> Result<Option<Todo>, CoreError> {
    let record = sqlx::query_as::<_, Todo>(
        r#"
        UPDATE todo
        SET title = $1, note = $2, due_date = $3
        WHERE id = $4
        RETURNING id, title, COALESCE(note, '') AS note, due_date
        "#,
    )
    .bind(&todo.title)
    .bind(&todo.note)
    .bind(todo.due_date)
    .bind(todo.id)
    .fetch_optional(pool)
    .await
    .map_err(|e| CoreError::database("update", e))?;

    Ok(record)
}

/// Delete a todo, returning the number of rows removed.
pub async fn delete_todo(pool: &PgPool, id: i32) -> Result<u64, CoreError> {
    let result = sqlx::query(
        r#"
        DELETE FROM todo
        WHERE id = $1
        "#,
    )
    .bind(id)
    .execute(pool)
    .await
    .map_err(|e| CoreError::database("delete", e))?;

    Ok(result.rows_affected())
}

/// List all todos ordered by id.
pub async fn list_todos(pool: &PgPool) -> Result<Vec<Todo>, CoreError> {
    let records = sqlx::query_as::<_, Todo>(
        r#"
        SELECT id, title, COALESCE(note, '') AS note, due_date
        FROM todo
        ORDER BY id ASC
        "#,
    )
    .fetch_all(pool)
    .await
    .map_err(|e| CoreError::database("list", e))?;

    Ok(records)
}

#[async_trait::async_trait]
impl Repository for PostgresRepository {
    async fn insert(&self, todo: &Todo) -> Result<i32, CoreError> {
        insert_todo(&self.pool, todo).await
    }

    async fn get(&self, id: i32) -> Result<Option<Todo>, CoreError> {
        get_todo(&self.pool, id).await
    }

    async fn update(&self, todo: &Todo) -> Result<Option<Todo>, CoreError> {
        update_todo(&self.pool, todo).await
    }

    async fn delete(&self, id: i32) -> Result<u64, CoreError> {
        delete_todo(&self.pool, id).await
    }

    async fn list(&self) -> Result<Vec<Todo>, CoreError> {
        list_todos(&self.pool).await
    }

    async fn close(&self) -> Result<(), CoreError> {
        self.pool.close().await;
        Ok(())
    }
}
