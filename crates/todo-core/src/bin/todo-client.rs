// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Demo client for the todo list service.
//!
//! Creates a todo, reads it back, updates it, lists all todos and finally
//! deletes the one it created. The server address comes from
//! `TODO_SERVER_URL` (default `http://localhost:5000`).

use anyhow::{Context, Result};
use chrono::Utc;
use tokio_stream::StreamExt;
use tracing::info;

use todo_protocol::todolist_proto::{
    CreateTodoRequest, DeleteTodoRequest, ListTodosRequest, ReadTodoRequest, Todo,
    UpdateTodoRequest,
};
use todo_protocol::{TodoListServiceClient, from_datetime, to_datetime};
use tonic::transport::Channel;

fn print_todo(todo: &Todo) {
    let due = todo
        .due_date
        .as_ref()
        .and_then(|ts| to_datetime(ts).ok())
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_else(|| "-".to_string());

    println!("Todo:");
    println!("  Id: {}", todo.id);
    println!("  Title: {}", todo.title);
    println!("  Note: {}", todo.note);
    println!("  Due date: {}", due);
}

async fn create_todo(client: &mut TodoListServiceClient<Channel>) -> Result<i32> {
    info!("Creating todo");
    let todo = Todo {
        id: 0,
        title: "First Todo".to_string(),
        note: "This is a test".to_string(),
        due_date: Some(from_datetime(&Utc::now())),
    };
    let todo = client
        .create_todo(CreateTodoRequest { todo: Some(todo) })
        .await?
        .into_inner()
        .todo
        .context("CreateTodo returned no todo")?;
    print_todo(&todo);
    Ok(todo.id)
}

async fn read_todo(client: &mut TodoListServiceClient<Channel>, id: i32) -> Result<()> {
    info!(todo_id = id, "Reading todo");
    let response = client.read_todo(ReadTodoRequest { todo_id: id }).await?;
    if let Some(todo) = response.into_inner().todo {
        print_todo(&todo);
    }
    Ok(())
}

async fn update_todo(client: &mut TodoListServiceClient<Channel>, id: i32) -> Result<()> {
    info!(todo_id = id, "Updating todo");
    let todo = Todo {
        id,
        title: "Updated Todo".to_string(),
        note: "This is an updated test".to_string(),
        due_date: Some(from_datetime(&Utc::now())),
    };
    let response = client
        .update_todo(UpdateTodoRequest { todo: Some(todo) })
        .await?;
    if let Some(todo) = response.into_inner().todo {
        print_todo(&todo);
    }
    Ok(())
}

async fn list_todos(client: &mut TodoListServiceClient<Channel>) -> Result<()> {
    info!("Listing todos");
    let mut stream = client.list_todos(ListTodosRequest {}).await?.into_inner();
    while let Some(response) = stream.next().await {
        if let Some(todo) = response?.todo {
            print_todo(&todo);
        }
    }
    Ok(())
}

async fn delete_todo(client: &mut TodoListServiceClient<Channel>, id: i32) -> Result<()> {
    info!(todo_id = id, "Deleting todo");
    client.delete_todo(DeleteTodoRequest { todo_id: id }).await?;
    println!("Successfully deleted: {}", id);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("todo_client=info".parse()?),
        )
        .init();

    let url = std::env::var("TODO_SERVER_URL")
        .unwrap_or_else(|_| "http://localhost:5000".to_string());
    info!(%url, "Connecting to todo list service");

    let mut client = TodoListServiceClient::connect(url.clone())
        .await
        .with_context(|| format!("could not connect to {}", url))?;

    let id = create_todo(&mut client).await?;
    read_todo(&mut client, id).await?;
    update_todo(&mut client, id).await?;
    list_todos(&mut client).await?;
    delete_todo(&mut client, id).await?;

    Ok(())
}
