//! Todo lifecycle rules.
//!
//! # Design
//! `TodoService` validates input, stamps timestamps and drives the storage
//! gateway. It never retries and never swallows an error.
//!
//! Update, delete and toggle read the row first and then issue a separate
//! mutation. A concurrent delete between the two statements is reported as
//! `NotFound` by the gateway's affected-row check rather than by the read.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::error::{Result, TodoError};
use crate::repository::TodoRepository;
use crate::types::{now, NewTodo, Todo};

/// Lifecycle manager for todos. Cheap to clone; clones share one gateway.
#[derive(Clone)]
pub struct TodoService {
    repo: Arc<dyn TodoRepository>,
}

impl TodoService {
    pub fn new(repo: Arc<dyn TodoRepository>) -> Self {
        Self { repo }
    }

    pub async fn create(&self, title: &str, description: &str) -> Result<Todo> {
        if title.is_empty() {
            return Err(TodoError::InvalidData("title is required"));
        }

        let ts = now();
        let new = NewTodo {
            title: title.to_string(),
            description: description.to_string(),
            completed: false,
            created_at: ts,
            updated_at: ts,
        };
        let id = self.repo.insert(&new).await?;
        info!(id, "todo created");
        Ok(new.into_todo(id))
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Todo> {
        check_id(id)?;
        debug!(id, "fetching todo");
        self.fetch_existing(id).await
    }

    /// Every todo, most recently created first. An empty store is not an error.
    pub async fn get_all(&self) -> Result<Vec<Todo>> {
        let todos = self.repo.fetch_all().await?;
        debug!(count = todos.len(), "fetched todos");
        Ok(todos)
    }

    /// Replace a todo's fields.
    ///
    /// An empty `title` leaves the stored title unchanged, while
    /// `description` and `completed` are always overwritten.
    pub async fn update(
        &self,
        id: i64,
        title: &str,
        description: &str,
        completed: bool,
    ) -> Result<Todo> {
        check_id(id)?;
        let mut todo = self.fetch_existing(id).await?;

        if !title.is_empty() {
            todo.title = title.to_string();
        }
        todo.description = description.to_string();
        todo.completed = completed;
        todo.updated_at = refreshed(todo.updated_at);

        self.repo.update_row(&todo).await?;
        info!(id, completed = todo.completed, "todo updated");
        Ok(todo)
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        check_id(id)?;
        self.fetch_existing(id).await?;
        self.repo.delete_row(id).await?;
        info!(id, "todo deleted");
        Ok(())
    }

    pub async fn toggle_complete(&self, id: i64) -> Result<Todo> {
        check_id(id)?;
        let mut todo = self.fetch_existing(id).await?;

        todo.completed = !todo.completed;
        todo.updated_at = refreshed(todo.updated_at);

        self.repo.update_row(&todo).await?;
        info!(id, completed = todo.completed, "todo toggled");
        Ok(todo)
    }

    async fn fetch_existing(&self, id: i64) -> Result<Todo> {
        self.repo
            .fetch_by_id(id)
            .await?
            .ok_or(TodoError::NotFound(id))
    }
}

fn check_id(id: i64) -> Result<()> {
    if id <= 0 {
        return Err(TodoError::InvalidData("id must be positive"));
    }
    Ok(())
}

/// New `updated_at` for a mutation. Never earlier than the previous value,
/// so a clock step backwards can't break `created_at <= updated_at`.
fn refreshed(previous: DateTime<Utc>) -> DateTime<Utc> {
    now().max(previous)
}
