//! HTTP service for todos.
//!
//! # Overview
//! Wires `todo_core::TodoService` to an axum router under `/api/v1/todos`,
//! with a PostgreSQL storage gateway, YAML configuration and schema
//! bootstrap for the binary.
//!
//! # Design
//! - `app` takes a ready `TodoService`, so tests mount the router over
//!   `InMemoryTodoRepository` and the binary mounts it over PostgreSQL.
//! - Request logging and panic recovery are tower-http layers.

pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod postgres;

use std::future::Future;

use axum::{
    routing::{get, patch},
    Router,
};
use tokio::net::TcpListener;
use todo_core::TodoService;
use tower_http::{
    catch_panic::CatchPanicLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

pub use config::{Config, ConfigError};
pub use error::AppError;
pub use postgres::PostgresTodoRepository;

pub fn app(service: TodoService) -> Router {
    let api = Router::new()
        .route(
            "/todos",
            get(handlers::list_todos).post(handlers::create_todo),
        )
        .route(
            "/todos/{id}",
            get(handlers::get_todo)
                .put(handlers::update_todo)
                .delete(handlers::delete_todo),
        )
        .route("/todos/{id}/toggle", patch(handlers::toggle_todo));

    Router::new()
        .route("/health", get(handlers::health))
        .nest("/api/v1", api)
        .with_state(service)
        .layer(CatchPanicLayer::new())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}

/// Serve until `shutdown` resolves, then let in-flight requests finish.
pub async fn run<F>(
    listener: TcpListener,
    service: TodoService,
    shutdown: F,
) -> Result<(), std::io::Error>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app(service))
        .with_graceful_shutdown(shutdown)
        .await
}
