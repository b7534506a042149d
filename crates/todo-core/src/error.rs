// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Error types for todo-core.
//!
//! Provides a unified error type that maps to gRPC status codes.

use std::fmt;

use todo_protocol::TimestampError;
use tonic::{Code, Status};

/// Result type using CoreError
pub type Result<T> = std::result::Result<T, CoreError>;

/// Core errors that can occur during request processing.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CoreError {
    /// Input validation failed. No storage access was attempted.
    ValidationError {
        /// The field that failed validation.
        field: String,
        /// The validation error message.
        message: String,
    },

    /// A well-formed request referenced a todo that does not exist.
    TodoNotFound {
        /// The todo ID that was not found.
        todo_id: i32,
    },

    /// Database operation failed.
    DatabaseError {
        /// The operation that failed.
        operation: String,
        /// Error details.
        details: String,
    },

    /// A value could not be converted between its wire and storage forms.
    ConversionError {
        /// The field being converted.
        field: String,
        /// Error details.
        details: String,
    },
}

impl CoreError {
    /// Shorthand for a validation failure on `field`.
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.to_string(),
            message: message.into(),
        }
    }

    /// Shorthand for a failed storage `operation`.
    pub fn database(operation: &str, details: impl fmt::Display) -> Self {
        Self::DatabaseError {
            operation: operation.to_string(),
            details: details.to_string(),
        }
    }

    /// Get the error code string for this error type.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ValidationError { .. } => "VALIDATION_ERROR",
            Self::TodoNotFound { .. } => "TODO_NOT_FOUND",
            Self::DatabaseError { .. } => "DATABASE_ERROR",
            Self::ConversionError { .. } => "CONVERSION_ERROR",
        }
    }

    /// Get the gRPC status code this error is reported with.
    pub fn status_code(&self) -> Code {
        match self {
            Self::ValidationError { .. } => Code::InvalidArgument,
            Self::TodoNotFound { .. } => Code::NotFound,
            Self::DatabaseError { .. } | Self::ConversionError { .. } => Code::Internal,
        }
    }

    /// Convert this error to a gRPC status for protocol responses.
    pub fn to_status(&self) -> Status {
        Status::new(self.status_code(), self.to_string())
    }
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ValidationError { field, message } => {
                write!(f, "Validation error for '{}': {}", field, message)
            }
            Self::TodoNotFound { todo_id } => {
                write!(f, "Todo with ID {} not found", todo_id)
            }
            Self::DatabaseError { operation, details } => {
                write!(f, "Database error during '{}': {}", operation, details)
            }
            Self::ConversionError { field, details } => {
                write!(f, "Failed to convert '{}': {}", field, details)
            }
        }
    }
}

impl std::error::Error for CoreError {}

impl From<CoreError> for Status {
    fn from(err: CoreError) -> Self {
        err.to_status()
    }
}

impl From<sqlx::Error> for CoreError {
    fn from(err: sqlx::Error) -> Self {
        CoreError::database("query", err)
    }
}

impl From<sqlx::migrate::MigrateError> for CoreError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        CoreError::database("migrate", err)
    }
}

impl From<TimestampError> for CoreError {
    fn from(err: TimestampError) -> Self {
        CoreError::ConversionError {
            field: "due_date".to_string(),
            details: err.to_string(),
        }
    }
}
