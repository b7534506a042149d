// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! In-memory repository, used as a test and demo double.

use std::collections::BTreeMap;

use tokio::sync::RwLock;

use crate::error::CoreError;
use crate::todo::Todo;

use super::Repository;

#[derive(Debug)]
struct MemoryState {
    todos: BTreeMap<i32, Todo>,
    // None once i32::MAX has been handed out
    next_id: Option<i32>,
    closed: bool,
}

/// Repository holding todos in a `BTreeMap`, so iteration is already in id order.
#[derive(Debug)]
pub struct MemoryRepository {
    state: RwLock<MemoryState>,
}

impl Default for MemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryRepository {
    /// Create an empty repository whose first assigned id is 1.
    pub fn new() -> Self {
        Self {
            state: RwLock::new(MemoryState {
                todos: BTreeMap::new(),
                next_id: Some(1),
                closed: false,
            }),
        }
    }

    /// Create a repository pre-populated with `todos`, keeping their ids.
    ///
    /// Todos with an unset id are skipped. Later inserts continue after the highest id;
    /// seeding `i32::MAX` leaves the id space exhausted, so the next insert fails.
    pub fn with_todos(todos: impl IntoIterator<Item = Todo>) -> Self {
        let todos: BTreeMap<i32, Todo> = todos
            .into_iter()
            .filter(Todo::has_id)
            .map(|todo| (todo.id, todo))
            .collect();
        let next_id = match todos.keys().next_back() {
            Some(id) => id.checked_add(1),
            None => Some(1),
        };

        Self {
            state: RwLock::new(MemoryState {
                todos,
                next_id,
                closed: false,
            }),
        }
    }
}

fn ensure_open(state: &MemoryState, operation: &str) -> Result<(), CoreError> {
    if state.closed {
        return Err(CoreError::database(operation, "repository is closed"));
    }
    Ok(())
}

#[async_trait::async_trait]
impl Repository for MemoryRepository {
    async fn insert(&self, todo: &Todo) -> Result<i32, CoreError> {
        let mut state = self.state.write().await;
        ensure_open(&state, "insert")?;

        let id = state
            .next_id
            .ok_or_else(|| CoreError::database("insert", "id space exhausted"))?;
        state.next_id = id.checked_add(1);
        state.todos.insert(id, todo.clone().with_id(id));

        Ok(id)
    }

    async fn get(&self, id: i32) -> Result<Option<Todo>, CoreError> {
        let state = self.state.read().await;
        ensure_open(&state, "get")?;

        Ok(state.todos.get(&id).cloned())
    }

    async fn update(&self, todo: &Todo) -> Result<Option<Todo>, CoreError> {
        let mut state = self.state.write().await;
        ensure_open(&state, "update")?;

        let Some(stored) = state.todos.get_mut(&todo.id) else {
            return Ok(None);
        };
        stored.title.clone_from(&todo.title);
        stored.note.clone_from(&todo.note);
        stored.due_date = todo.due_date;

        Ok(Some(stored.clone()))
    }

    async fn delete(&self, id: i32) -> Result<u64, CoreError> {
        let mut state = self.state.write().await;
        ensure_open(&state, "delete")?;

        Ok(u64::from(state.todos.remove(&id).is_some()))
    }

    async fn list(&self) -> Result<Vec<Todo>, CoreError> {
        let state = self.state.read().await;
        ensure_open(&state, "list")?;

        Ok(state.todos.values().cloned().collect())
    }

    async fn close(&self) -> Result<(), CoreError> {
        let mut state = self.state.write().await;
        ensure_open(&state, "close")?;

        state.closed = true;
        Ok(())
    }
}
