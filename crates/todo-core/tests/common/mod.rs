// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Common test infrastructure for todo-core tests.
//!
//! Provides repository doubles and a TestContext that runs a real gRPC server
//! with a connected client.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tonic::transport::Channel;

use todo_core::error::CoreError;
use todo_core::handlers::TodoHandlerState;
use todo_core::persistence::{MemoryRepository, Repository};
use todo_core::todo::Todo;
use todo_protocol::TodoListServiceClient;

/// Helper macro to skip tests if database URL is not set.
#[macro_export]
macro_rules! skip_if_no_db {
    () => {
        if std::env::var("TEST_DATABASE_URL").is_err() {
            eprintln!("Skipping test: TEST_DATABASE_URL not set");
            return;
        }
    };
}

/// 2000-01-01T00:00:00Z, the due date used by most fixtures.
pub fn test_due_date() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap()
}

/// An unsaved todo with the standard fixture note and due date.
pub fn test_todo(title: &str) -> Todo {
    Todo::new(title, "This is a test", Some(test_due_date()))
}

/// Repository that counts calls and forwards them to a [`MemoryRepository`].
#[derive(Default)]
pub struct CountingRepository {
    inner: MemoryRepository,
    calls: AtomicUsize,
}

impl CountingRepository {
    /// Number of repository calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn hit(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl Repository for CountingRepository {
    async fn insert(&self, todo: &Todo) -> Result<i32, CoreError> {
        self.hit();
        self.inner.insert(todo).await
    }

    async fn get(&self, id: i32) -> Result<Option<Todo>, CoreError> {
        self.hit();
        self.inner.get(id).await
    }

    async fn update(&self, todo: &Todo) -> Result<Option<Todo>, CoreError> {
        self.hit();
        self.inner.update(todo).await
    }

    async fn delete(&self, id: i32) -> Result<u64, CoreError> {
        self.hit();
        self.inner.delete(id).await
    }

    async fn list(&self) -> Result<Vec<Todo>, CoreError> {
        self.hit();
        self.inner.list().await
    }

    async fn close(&self) -> Result<(), CoreError> {
        self.inner.close().await
    }
}

/// Repository whose every operation fails like a lost connection.
pub struct FailingRepository;

pub const FAILURE_DETAILS: &str = "connection refused";

#[async_trait]
impl Repository for FailingRepository {
    async fn insert(&self, _todo: &Todo) -> Result<i32, CoreError> {
        Err(CoreError::database("insert", FAILURE_DETAILS))
    }

    async fn get(&self, _id: i32) -> Result<Option<Todo>, CoreError> {
        Err(CoreError::database("get", FAILURE_DETAILS))
    }

    async fn update(&self, _todo: &Todo) -> Result<Option<Todo>, CoreError> {
        Err(CoreError::database("update", FAILURE_DETAILS))
    }

    async fn delete(&self, _id: i32) -> Result<u64, CoreError> {
        Err(CoreError::database("delete", FAILURE_DETAILS))
    }

    async fn list(&self) -> Result<Vec<Todo>, CoreError> {
        Err(CoreError::database("list", FAILURE_DETAILS))
    }

    async fn close(&self) -> Result<(), CoreError> {
        Ok(())
    }
}

/// Handler state over `repository`.
pub fn state_with(repository: Arc<dyn Repository>) -> TodoHandlerState {
    TodoHandlerState::new(repository)
}

/// Test context that runs a gRPC server on a random port with a connected client.
pub struct TestContext {
    pub client: TodoListServiceClient<Channel>,
    pub channel: Channel,
    pub repository: Arc<dyn Repository>,
    shutdown: Option<oneshot::Sender<()>>,
    server: Option<JoinHandle<()>>,
}

impl TestContext {
    /// Start a server over a fresh [`MemoryRepository`].
    pub async fn new() -> Self {
        Self::with_repository(Arc::new(MemoryRepository::new())).await
    }

    /// Start a server over `repository`.
    pub async fn with_repository(repository: Arc<dyn Repository>) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Listener has no address");

        let state = Arc::new(TodoHandlerState::new(repository.clone()));
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let server = tokio::spawn(async move {
            let shutdown = async {
                shutdown_rx.await.ok();
            };
            if let Err(e) =
                todo_core::server::run_server_with_listener(listener, state, shutdown).await
            {
                eprintln!("Test server error: {}", e);
            }
        });

        let channel = connect_with_retry(format!("http://{}", addr)).await;
        let client = TodoListServiceClient::new(channel.clone());

        Self {
            client,
            channel,
            repository,
            shutdown: Some(shutdown_tx),
            server: Some(server),
        }
    }

    /// Stop the server and wait for it to finish.
    pub async fn stop(mut self) {
        if let Some(tx) = self.shutdown.take() {
            tx.send(()).ok();
        }
        if let Some(handle) = self.server.take() {
            handle.await.ok();
        }
    }
}

async fn connect_with_retry(url: String) -> Channel {
    let endpoint = Channel::from_shared(url.clone()).expect("Invalid test server URL");
    for _ in 0..50 {
        if let Ok(channel) = endpoint.connect().await {
            return channel;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("Failed to connect to test server at {}", url);
}
