// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! SQLite-backed repository implementation.

use std::path::Path;
use std::str::FromStr;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing::info;

use crate::error::CoreError;
use crate::migrations;
use crate::todo::Todo;

use super::Repository;

/// SQLite-backed repository.
#[derive(Clone)]
pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    /// Create a new SQLite repository from an existing, migrated pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to an SQLite URL (`sqlite:todo.db`, `sqlite::memory:`), creating
    /// the database file if needed, verify the connection and apply migrations.
    ///
    /// An in-memory database lives only as long as its connection, so it gets
    /// a single connection that the pool never reaps or recycles.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, CoreError> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(|e| CoreError::database("connect", e))?
            .create_if_missing(true);

        let pool_options = if is_in_memory(url) {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(max_connections)
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| CoreError::DatabaseError {
                operation: "connect".to_string(),
                details: format!("Failed to connect to SQLite at {}: {}", url, e),
            })?;

        let row: (i32,) = sqlx::query_as("SELECT 1").fetch_one(&pool).await?;
        info!(result = row.0, "Database health check passed");

        migrations::run_sqlite(&pool).await?;

        Ok(Self { pool })
    }

    /// The underlying connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create and initialize a new SQLite repository from a file path.
    ///
    /// Creates parent directories if they don't exist.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| CoreError::DatabaseError {
                operation: "create_dir".to_string(),
                details: format!("Failed to create directory {:?}: {}", parent, e),
            })?;
        }

        Self::connect(&format!("sqlite:{}", path.to_string_lossy()), 5).await
    }
}

fn is_in_memory(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

#[async_trait::async_trait]
impl Repository for SqliteRepository {
    async fn insert(&self, todo: &Todo) -> Result<i32, CoreError> {
        let (id,): (i32,) = sqlx::query_as(
            r#"
            INSERT INTO todo (title, note, due_date)
            VALUES (?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(&todo.title)
        .bind(&todo.note)
        .bind(todo.due_date)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| CoreError::database("insert", e))?;

        Ok(id)
    }

    async fn get(&self, id: i32) -> Result<Option<Todo>, CoreError> {
        let record = sqlx::query_as::<_, Todo>(
            r#"
            SELECT id, title, COALESCE(note, '') AS note, due_date
            FROM todo
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| CoreError::database("get", e))?;

        Ok(record)
    }

    async fn update(&self, todo: &Todo) -> Result<Option<Todo>, CoreError> {
        let record = sqlx::query_as::<_, Todo>(
            r#"
            UPDATE todo
            SET title = ?, note = ?, due_date = ?
            WHERE id = ?
            RETURNING id, title, COALESCE(note, '') AS note, due_date
            "#,
        )
        .bind(&todo.title)
        .bind(&todo.note)
        .bind(todo.due_date)
        .bind(todo.id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| CoreError::database("update", e))?;

        Ok(record)
    }

    async fn delete(&self, id: i32) -> Result<u64, CoreError> {
        let result = sqlx::query("DELETE FROM todo WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| CoreError::database("delete", e))?;

        Ok(result.rows_affected())
    }

    async fn list(&self) -> Result<Vec<Todo>, CoreError> {
        let records = sqlx::query_as::<_, Todo>(
            r#"
            SELECT id, title, COALESCE(note, '') AS note, due_date
            FROM todo
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| CoreError::database("list", e))?;

        Ok(records)
    }

    async fn close(&self) -> Result<(), CoreError> {
        self.pool.close().await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    /// Create an in-memory SQLite repository for testing.
    async fn test_repository() -> SqliteRepository {
        SqliteRepository::connect("sqlite::memory:", 5)
            .await
            .expect("Failed to create in-memory SQLite repository")
    }

    fn test_todo(title: &str) -> Todo {
        Todo::new(
            title,
            "This is a test",
            Some(Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap()),
        )
    }

    #[tokio::test]
    async fn test_in_memory_pool_keeps_its_connection() {
        let repo = test_repository().await;
        let options = repo.pool().options();

        assert_eq!(options.get_max_connections(), 1);
        assert_eq!(options.get_min_connections(), 1);
        assert_eq!(options.get_idle_timeout(), None);
        assert_eq!(options.get_max_lifetime(), None);

        repo.insert(&test_todo("Test Todo")).await.unwrap();
        // Releasing the connection back to the pool must not lose the schema or rows
        drop(repo.pool().acquire().await.unwrap());
        assert_eq!(repo.list().await.unwrap().len(), 1);
        assert_eq!(repo.pool().size(), 1);
    }

    #[tokio::test]
    async fn test_file_pool_uses_requested_size() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite:{}", dir.path().join("todo.db").display());
        let repo = SqliteRepository::connect(&url, 3).await.unwrap();

        assert_eq!(repo.pool().options().get_max_connections(), 3);
        assert!(repo.pool().options().get_idle_timeout().is_some());
    }

    #[tokio::test]
    async fn test_first_insert_gets_id_one() {
        let repo = test_repository().await;

        let id = repo.insert(&test_todo("Test Todo")).await.unwrap();
        assert_eq!(id, 1);

        let id = repo.insert(&test_todo("Test Todo")).await.unwrap();
        assert_eq!(id, 2);
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let repo = test_repository().await;

        let id = repo.insert(&test_todo("Test Todo")).await.unwrap();
        let got = repo
            .get(id)
            .await
            .expect("Query should succeed")
            .expect("Todo should exist");

        assert_eq!(got, test_todo("Test Todo").with_id(id));
    }

    #[tokio::test]
    async fn test_get_not_found() {
        let repo = test_repository().await;

        let result = repo.get(99).await.expect("Query should succeed");
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_due_date_keeps_nanoseconds() {
        let repo = test_repository().await;
        let due = Utc.with_ymd_and_hms(2031, 6, 15, 12, 30, 45).unwrap()
            + chrono::Duration::nanoseconds(123_456_789);

        let id = repo
            .insert(&Todo::new("Precise", "", Some(due)))
            .await
            .unwrap();
        let got = repo.get(id).await.unwrap().unwrap();

        assert_eq!(got.due_date, Some(due));
    }

    #[tokio::test]
    async fn test_null_note_and_due_date() {
        let repo = test_repository().await;
        sqlx::query("INSERT INTO todo (title) VALUES ('bare')")
            .execute(&repo.pool)
            .await
            .unwrap();

        let todos = repo.list().await.unwrap();
        assert_eq!(todos.len(), 1);
        assert_eq!(todos[0].note, "");
        assert_eq!(todos[0].due_date, None);
    }

    #[tokio::test]
    async fn test_update() {
        let repo = test_repository().await;
        let id = repo.insert(&test_todo("Test Todo")).await.unwrap();

        let want = test_todo("Update Test Todo").with_id(id);
        let got = repo.update(&want).await.unwrap();

        assert_eq!(got, Some(want.clone()));
        assert_eq!(repo.get(id).await.unwrap(), Some(want));
    }

    #[tokio::test]
    async fn test_update_not_found() {
        let repo = test_repository().await;

        let got = repo.update(&test_todo("Nobody").with_id(42)).await.unwrap();
        assert!(got.is_none());
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = test_repository().await;
        let id = repo.insert(&test_todo("Test Todo")).await.unwrap();

        assert_eq!(repo.delete(id).await.unwrap(), 1);
        assert_eq!(repo.delete(id).await.unwrap(), 0);
        assert!(repo.get(id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_ids_not_reused_after_delete() {
        let repo = test_repository().await;
        let first = repo.insert(&test_todo("a")).await.unwrap();
        repo.delete(first).await.unwrap();

        let second = repo.insert(&test_todo("b")).await.unwrap();
        assert!(second > first);
    }

    #[tokio::test]
    async fn test_list_ordered_by_id() {
        let repo = test_repository().await;
        for id in [5, 3, 8] {
            sqlx::query("INSERT INTO todo (id, title, note) VALUES (?, ?, '')")
                .bind(id)
                .bind(format!("todo {}", id))
                .execute(&repo.pool)
                .await
                .unwrap();
        }

        let ids: Vec<i32> = repo.list().await.unwrap().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![3, 5, 8]);
    }

    #[tokio::test]
    async fn test_from_path_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("todo.db");

        let repo = SqliteRepository::from_path(&path).await.unwrap();
        repo.insert(&test_todo("persisted")).await.unwrap();
        repo.close().await.unwrap();

        assert!(path.exists());

        let reopened = SqliteRepository::from_path(&path).await.unwrap();
        let todos = reopened.list().await.unwrap();
        assert_eq!(todos.len(), 1);
        assert_eq!(todos[0].title, "persisted");
    }

    #[tokio::test]
    async fn test_operations_fail_after_close() {
        let repo = test_repository().await;
        repo.close().await.unwrap();

        let err = repo.list().await.unwrap_err();
        assert_eq!(err.error_code(), "DATABASE_ERROR");
    }
}
