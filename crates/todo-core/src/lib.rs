// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Todo Core - Todo List Service
//!
//! This crate serves CRUD operations on todo items over gRPC, persisting them
//! to PostgreSQL (or SQLite for embedded use).
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         gRPC Clients                                     │
//! │                    (todo-client, any tonic/grpc client)                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//!                                    │
//!                                    ▼
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  server      TodoListService (tonic), CoreError → Status                 │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │  handlers    validation, repository calls, response mapping              │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │  persistence Repository trait: Postgres | SQLite | Memory                │
//! └─────────────────────────────────────────────────────────────────────────┘
//!                                    │
//!                                    ▼
//!                        ┌───────────────────────┐
//!                        │      PostgreSQL       │
//!                        │   table `todo`        │
//!                        └───────────────────────┘
//! ```
//!
//! # Operations
//!
//! | Operation | Validation | Failure codes |
//! |-----------|------------|---------------|
//! | `CreateTodo` | `todo` present | `Internal` |
//! | `ReadTodo` | `todo_id != 0` | `InvalidArgument`, `NotFound`, `Internal` |
//! | `UpdateTodo` | `todo.id != 0` | `InvalidArgument`, `NotFound`, `Internal` |
//! | `DeleteTodo` | `todo_id != 0` | `InvalidArgument`, `NotFound`, `Internal` |
//! | `ListTodos` | - | `Internal` |
//!
//! `ListTodos` streams one message per todo in ascending id order; the end of
//! the stream marks the end of the listing.
//!
//! # Configuration
//!
//! Configuration is loaded from environment variables:
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `TODO_DATABASE_URL` | - | PostgreSQL or SQLite URL, overrides `TODO_DB_*` |
//! | `TODO_DB_USER` | `postgres` | Database user |
//! | `TODO_DB_PASSWORD` | `postgres` | Database password |
//! | `TODO_DB_HOST` | `localhost` | Database host |
//! | `TODO_DB_PORT` | `5432` | Database port |
//! | `TODO_DB_NAME` | `postgres` | Database name |
//! | `TODO_GRPC_PORT` | `5000` | gRPC listen port |
//! | `TODO_DB_MAX_CONNECTIONS` | `10` | Connection pool size |

#![deny(missing_docs)]

/// Server configuration loaded from environment variables.
pub mod config;

/// Error types with gRPC status mapping.
pub mod error;

/// Todo list protocol handlers.
pub mod handlers;

/// Embedded database migrations.
pub mod migrations;

/// Repository abstraction and its backends.
pub mod persistence;

/// gRPC server implementation.
pub mod server;

/// The todo record.
pub mod todo;

pub use todo::Todo;
