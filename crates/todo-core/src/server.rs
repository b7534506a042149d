// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! gRPC server for todo-core.
//!
//! Routes `todolist.TodoListService` calls to the handlers and converts
//! handler errors into gRPC status codes.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_stream::wrappers::{ReceiverStream, TcpListenerStream};
use tonic::transport::Server;
use tonic::transport::server::Router;
use tonic::{Code, Request, Response, Status};
use tracing::{debug, error, info, instrument, warn};

use todo_protocol::todolist_proto::{
    CreateTodoRequest, CreateTodoResponse, DeleteTodoRequest, DeleteTodoResponse,
    ListTodosRequest, ListTodosResponse, ReadTodoRequest, ReadTodoResponse, UpdateTodoRequest,
    UpdateTodoResponse,
};
use todo_protocol::{TodoListService, TodoListServiceServer};

use crate::error::CoreError;
use crate::handlers::{
    TodoHandlerState, handle_create_todo, handle_delete_todo, handle_list_todos,
    handle_read_todo, handle_update_todo,
};

/// Buffer between the listing producer task and the response stream.
const LIST_STREAM_BUFFER: usize = 16;

/// tonic service implementation over the shared handler state.
#[derive(Clone)]
pub struct TodoListServer {
    state: Arc<TodoHandlerState>,
}

impl TodoListServer {
    /// Create a new server over `state`.
    pub fn new(state: Arc<TodoHandlerState>) -> Self {
        Self { state }
    }

    /// Wrap into the generated tonic service, ready for `add_service`.
    pub fn into_service(self) -> TodoListServiceServer<Self> {
        TodoListServiceServer::new(self)
    }
}

/// Convert a handler error into a status, logging storage failures.
fn to_status(method: &'static str, err: CoreError) -> Status {
    let status = err.to_status();
    if status.code() == Code::Internal {
        error!(method, code = err.error_code(), "{}", err);
    } else {
        debug!(method, code = err.error_code(), "{}", err);
    }
    status
}

/// Feed `responses` into a bounded stream from a spawned producer task.
///
/// The producer stops at the first failed send, i.e. once the stream is dropped.
fn stream_responses(
    responses: Vec<ListTodosResponse>,
) -> (
    ReceiverStream<Result<ListTodosResponse, Status>>,
    JoinHandle<()>,
) {
    let (tx, rx) = mpsc::channel(LIST_STREAM_BUFFER);
    let producer = tokio::spawn(async move {
        for response in responses {
            if tx.send(Ok(response)).await.is_err() {
                warn!("ListTodos receiver dropped, aborting stream");
                return;
            }
        }
    });

    (ReceiverStream::new(rx), producer)
}

#[tonic::async_trait]
impl TodoListService for TodoListServer {
    type ListTodosStream = ReceiverStream<Result<ListTodosResponse, Status>>;

    async fn create_todo(
        &self,
        request: Request<CreateTodoRequest>,
    ) -> Result<Response<CreateTodoResponse>, Status> {
        handle_create_todo(&self.state, request.into_inner())
            .await
            .map(Response::new)
            .map_err(|e| to_status("CreateTodo", e))
    }

    async fn read_todo(
        &self,
        request: Request<ReadTodoRequest>,
    ) -> Result<Response<ReadTodoResponse>, Status> {
        handle_read_todo(&self.state, request.into_inner())
            .await
            .map(Response::new)
            .map_err(|e| to_status("ReadTodo", e))
    }

    async fn update_todo(
        &self,
        request: Request<UpdateTodoRequest>,
    ) -> Result<Response<UpdateTodoResponse>, Status> {
        handle_update_todo(&self.state, request.into_inner())
            .await
            .map(Response::new)
            .map_err(|e| to_status("UpdateTodo", e))
    }

    async fn delete_todo(
        &self,
        request: Request<DeleteTodoRequest>,
    ) -> Result<Response<DeleteTodoResponse>, Status> {
        handle_delete_todo(&self.state, request.into_inner())
            .await
            .map(Response::new)
            .map_err(|e| to_status("DeleteTodo", e))
    }

    async fn list_todos(
        &self,
        request: Request<ListTodosRequest>,
    ) -> Result<Response<Self::ListTodosStream>, Status> {
        let responses = handle_list_todos(&self.state, request.into_inner())
            .await
            .map_err(|e| to_status("ListTodos", e))?;

        let (stream, _producer) = stream_responses(responses);
        Ok(Response::new(stream))
    }
}

/// Build the router with the todo service, plus server reflection when enabled.
fn routes(state: Arc<TodoHandlerState>) -> Result<Router> {
    let router = Server::builder().add_service(TodoListServer::new(state).into_service());

    #[cfg(feature = "reflection")]
    let router = {
        let reflection = tonic_reflection::server::Builder::configure()
            .register_encoded_file_descriptor_set(todo_protocol::FILE_DESCRIPTOR_SET)
            .build_v1()?;
        router.add_service(reflection)
    };

    Ok(router)
}

/// Run the gRPC server on `bind_addr` until `shutdown` resolves.
#[instrument(skip(state, shutdown))]
pub async fn run_server(
    bind_addr: SocketAddr,
    state: Arc<TodoHandlerState>,
    shutdown: impl Future<Output = ()>,
) -> Result<()> {
    info!(addr = %bind_addr, "gRPC server starting");

    routes(state)?
        .serve_with_shutdown(bind_addr, shutdown)
        .await?;

    info!("gRPC server stopped");
    Ok(())
}

/// Run the gRPC server on an already bound listener until `shutdown` resolves.
///
/// Useful when the port is chosen by the OS (`127.0.0.1:0`).
pub async fn run_server_with_listener(
    listener: TcpListener,
    state: Arc<TodoHandlerState>,
    shutdown: impl Future<Output = ()>,
) -> Result<()> {
    info!(addr = %listener.local_addr()?, "gRPC server starting");

    routes(state)?
        .serve_with_incoming_shutdown(TcpListenerStream::new(listener), shutdown)
        .await?;

    info!("gRPC server stopped");
    Ok(())
}
