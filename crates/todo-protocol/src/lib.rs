// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Todo Protocol - gRPC + Protobuf communication layer
//!
//! This crate provides the wire protocol between todo list clients and
//! the `todo-core` server.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      todo-protocol                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  RPC Layer: unary CRUD calls + server-streamed listing      │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Serialization: Protobuf (prost)                            │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Transport: HTTP/2 (tonic)                                  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use todo_protocol::todolist_proto::{ReadTodoRequest, todo_list_service_client::TodoListServiceClient};
//!
//! let mut client = TodoListServiceClient::connect("http://localhost:5000").await?;
//! let response = client.read_todo(ReadTodoRequest { todo_id: 1 }).await?;
//! println!("{:?}", response.into_inner().todo);
//! ```

pub mod timestamp;

// Re-export generated protobuf and tonic types for the todo list service
pub mod todolist_proto {
    #![allow(missing_docs)]
    tonic::include_proto!("todolist");
}

/// Encoded `FileDescriptorSet` for `todolist.proto`, for gRPC server reflection.
pub const FILE_DESCRIPTOR_SET: &[u8] = tonic::include_file_descriptor_set!("todolist_descriptor");

pub use timestamp::{TimestampError, from_datetime, to_datetime};
pub use todolist_proto::todo_list_service_client::TodoListServiceClient;
pub use todolist_proto::todo_list_service_server::{TodoListService, TodoListServiceServer};
