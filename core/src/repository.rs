//! Storage gateway seam.
//!
//! # Design
//! `TodoService` talks to persistence only through `TodoRepository`, so the
//! PostgreSQL gateway in the server crate and `InMemoryTodoRepository` are
//! interchangeable. Each method maps to exactly one statement against the
//! store: no caching, no retries, no multi-statement transactions.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{NewTodo, Todo};

#[async_trait]
pub trait TodoRepository: Send + Sync {
    /// Persist a new todo and return the id the store assigned to it.
    async fn insert(&self, todo: &NewTodo) -> Result<i64>;

    /// Look up one todo. A missing row is `Ok(None)`, never an error.
    async fn fetch_by_id(&self, id: i64) -> Result<Option<Todo>>;

    /// All todos, most recently created first.
    async fn fetch_all(&self) -> Result<Vec<Todo>>;

    /// Overwrite title, description, completed and updated_at of an existing
    /// row. Returns `TodoError::NotFound` when no row was affected.
    async fn update_row(&self, todo: &Todo) -> Result<()>;

    /// Remove a row. Returns `TodoError::NotFound` when no row was affected.
    async fn delete_row(&self, id: i64) -> Result<()>;
}
