// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Todo list protocol handlers for todo-core.
//!
//! Each handler validates its request, calls the repository and turns the
//! result into a protocol response. Failures are returned as [`CoreError`];
//! the gRPC server maps them onto status codes.

use std::sync::Arc;

use tracing::{debug, info, instrument};

use todo_protocol::todolist_proto::{
    CreateTodoRequest, CreateTodoResponse, DeleteTodoRequest, DeleteTodoResponse,
    ListTodosRequest, ListTodosResponse, ReadTodoRequest, ReadTodoResponse, UpdateTodoRequest,
    UpdateTodoResponse,
};

use crate::error::{CoreError, Result};
use crate::persistence::Repository;
use crate::todo::{Todo, UNSET_ID};

/// Shared state for todo handlers.
///
/// Contains the repository shared across all handlers.
pub struct TodoHandlerState {
    /// Repository implementation.
    pub repository: Arc<dyn Repository>,
}

impl TodoHandlerState {
    /// Create a new handler state with the given repository backend.
    pub fn new(repository: Arc<dyn Repository>) -> Self {
        Self { repository }
    }
}

/// Reject the reserved id before any storage access.
fn require_id(field: &str, id: i32) -> Result<i32> {
    if id == UNSET_ID {
        return Err(CoreError::validation(field, "must be a non-zero todo ID"));
    }
    Ok(id)
}

// ============================================================================
// Create
// ============================================================================

/// Handle create request.
///
/// Persists the todo and echoes it back with its assigned id. Any id sent by
/// the caller is ignored. The fields themselves are not validated, but a
/// request without a `todo` message is rejected as `InvalidArgument` since
/// there is nothing to store.
#[instrument(skip(state, request))]
pub async fn handle_create_todo(
    state: &TodoHandlerState,
    request: CreateTodoRequest,
) -> Result<CreateTodoResponse> {
    let todo = request
        .todo
        .ok_or_else(|| CoreError::validation("todo", "is required"))?;
    let todo = Todo::try_from(todo)?;

    let id = state.repository.insert(&todo).await?;
    info!(todo_id = id, "Todo created");

    Ok(CreateTodoResponse {
        todo: Some(todo.with_id(id).into()),
    })
}

// ============================================================================
// Read
// ============================================================================

/// Handle read request.
#[instrument(skip(state, request), fields(todo_id = request.todo_id))]
pub async fn handle_read_todo(
    state: &TodoHandlerState,
    request: ReadTodoRequest,
) -> Result<ReadTodoResponse> {
    let id = require_id("todo_id", request.todo_id)?;

    let todo = state
        .repository
        .get(id)
        .await?
        .ok_or(CoreError::TodoNotFound { todo_id: id })?;

    debug!("Todo read");
    Ok(ReadTodoResponse {
        todo: Some(todo.into()),
    })
}

// ============================================================================
// Update
// ============================================================================

/// Handle update request.
///
/// Overwrites title, note and due date; the response carries the row as stored.
#[instrument(skip(state, request), fields(todo_id = request.todo.as_ref().map(|t| t.id)))]
pub async fn handle_update_todo(
    state: &TodoHandlerState,
    request: UpdateTodoRequest,
) -> Result<UpdateTodoResponse> {
    let todo = request
        .todo
        .ok_or_else(|| CoreError::validation("todo", "is required"))?;
    let id = require_id("todo.id", todo.id)?;
    let todo = Todo::try_from(todo)?;

    let updated = state
        .repository
        .update(&todo)
        .await?
        .ok_or(CoreError::TodoNotFound { todo_id: id })?;

    info!("Todo updated");
    Ok(UpdateTodoResponse {
        todo: Some(updated.into()),
    })
}

// ============================================================================
// Delete
// ============================================================================

/// Handle delete request.
///
/// Deleting an id that matches nothing (including one already deleted) is
/// reported as not found.
#[instrument(skip(state, request), fields(todo_id = request.todo_id))]
pub async fn handle_delete_todo(
    state: &TodoHandlerState,
    request: DeleteTodoRequest,
) -> Result<DeleteTodoResponse> {
    let id = require_id("todo_id", request.todo_id)?;

    let deleted = state.repository.delete(id).await?;
    if deleted == 0 {
        return Err(CoreError::TodoNotFound { todo_id: id });
    }

    info!("Todo deleted");
    Ok(DeleteTodoResponse {})
}

// ============================================================================
// List
// ============================================================================

/// Handle list request.
///
/// Returns one response message per todo in ascending id order. The whole
/// listing is read before anything is streamed, so a storage failure surfaces
/// before the first message.
#[instrument(skip(state, _request))]
pub async fn handle_list_todos(
    state: &TodoHandlerState,
    _request: ListTodosRequest,
) -> Result<Vec<ListTodosResponse>> {
    let todos = state.repository.list().await?;
    debug!(count = todos.len(), "Todos listed");

    Ok(todos
        .into_iter()
        .map(|todo| ListTodosResponse {
            todo: Some(todo.into()),
        })
        .collect())
}
