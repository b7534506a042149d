// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! The todo record and its conversions to and from the wire type.

use chrono::{DateTime, Utc};
use todo_protocol::todolist_proto as proto;
use todo_protocol::{from_datetime, to_datetime};

use crate::error::CoreError;

/// Reserved identifier meaning "not yet persisted". Never assigned by a repository.
pub const UNSET_ID: i32 = 0;

/// Todo record as stored in the `todo` table.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Todo {
    /// Identifier assigned on insert; `UNSET_ID` before that.
    pub id: i32,
    /// Required title.
    pub title: String,
    /// Free-form note, possibly empty.
    pub note: String,
    /// When the todo is due.
    pub due_date: Option<DateTime<Utc>>,
}

impl Todo {
    /// Create a todo that has not been persisted yet.
    pub fn new(
        title: impl Into<String>,
        note: impl Into<String>,
        due_date: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id: UNSET_ID,
            title: title.into(),
            note: note.into(),
            due_date,
        }
    }

    /// Copy of this todo carrying `id`.
    pub fn with_id(self, id: i32) -> Self {
        Self { id, ..self }
    }

    /// Whether the todo carries a persisted identifier.
    pub fn has_id(&self) -> bool {
        self.id != UNSET_ID
    }
}

impl TryFrom<proto::Todo> for Todo {
    type Error = CoreError;

    fn try_from(todo: proto::Todo) -> Result<Self, Self::Error> {
        let due_date = todo.due_date.as_ref().map(to_datetime).transpose()?;
        Ok(Self {
            id: todo.id,
            title: todo.title,
            note: todo.note,
            due_date,
        })
    }
}

impl From<Todo> for proto::Todo {
    fn from(todo: Todo) -> Self {
        Self {
            id: todo.id,
            title: todo.title,
            note: todo.note,
            due_date: todo.due_date.as_ref().map(from_datetime),
        }
    }
}
