//! REST API for an ordered todo list.
//!
//! # Overview
//! Handlers translate each request into a [`TodoService`] call and format the
//! result as JSON. Persistence sits behind the [`store::TodoStore`] trait so the
//! router can run against SQLite in production and memory in tests.

pub mod config;
pub mod error;
pub mod model;
pub mod service;
pub mod store;

use std::future::Future;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::{HeaderValue, StatusCode},
    routing::{get, post, put},
    Json, Router,
};
use chrono::Utc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

pub use config::Config;
pub use error::AppError;
pub use model::{AverageLength, EditTodo, Health, Message, NewTodo, Reorder, Todo, Toggled};
pub use service::TodoService;
pub use store::{MemoryStore, SharedStore, SqliteStore, StoreError, TodoStore};

/// CORS policy: listed origins only, any method and header. A `*` entry opens
/// the API to every origin.
pub fn cors_layer(origins: Vec<HeaderValue>) -> CorsLayer {
    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.iter().any(|origin| origin == "*") {
        cors.allow_origin(Any)
    } else {
        cors.allow_origin(origins)
    }
}

pub fn app(service: TodoService, cors: CorsLayer) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/todos", get(list_todos).post(create_todo))
        .route("/todos/reorder", post(reorder_todos))
        .route("/todos/stats/avg-length", get(average_length))
        .route(
            "/todos/{id}",
            put(update_todo).patch(toggle_todo).delete(delete_todo),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

pub async fn run(listener: TcpListener, router: Router) -> Result<(), std::io::Error> {
    axum::serve(listener, router).await
}

/// Serve until `shutdown` resolves, letting in-flight requests finish.
pub async fn run_until<F>(
    listener: TcpListener,
    router: Router,
    shutdown: F,
) -> Result<(), std::io::Error>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await
}

async fn health() -> Json<Health> {
    Json(Health {
        status: "ok",
        timestamp: Utc::now(),
    })
}

async fn list_todos(State(service): State<TodoService>) -> Result<Json<Vec<Todo>>, AppError> {
    Ok(Json(service.list().await?))
}

async fn create_todo(
    State(service): State<TodoService>,
    input: Result<Json<NewTodo>, JsonRejection>,
) -> Result<(StatusCode, Json<Todo>), AppError> {
    let Json(input) = input?;
    let todo = service.create(input).await?;
    Ok((StatusCode::CREATED, Json(todo)))
}

async fn delete_todo(
    State(service): State<TodoService>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Message>, AppError> {
    let Path(id) = id?;
    Ok(Json(service.delete(id).await?))
}

async fn toggle_todo(
    State(service): State<TodoService>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Toggled>, AppError> {
    let Path(id) = id?;
    Ok(Json(service.toggle(id).await?))
}

async fn update_todo(
    State(service): State<TodoService>,
    id: Result<Path<Uuid>, PathRejection>,
    input: Result<Json<EditTodo>, JsonRejection>,
) -> Result<Json<Todo>, AppError> {
    let Path(id) = id?;
    let Json(input) = input?;
    Ok(Json(service.update(id, input).await?))
}

async fn reorder_todos(
    State(service): State<TodoService>,
    input: Result<Json<Reorder>, JsonRejection>,
) -> Result<Json<Message>, AppError> {
    let Json(input) = input?;
    Ok(Json(service.reorder(input).await?))
}

async fn average_length(
    State(service): State<TodoService>,
) -> Result<Json<AverageLength>, AppError> {
    Ok(Json(service.average_length().await?))
}
