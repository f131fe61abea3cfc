//! In-process storage gateway.
//!
//! # Design
//! Rows live in a `BTreeMap` behind a tokio `RwLock`, shared through an `Arc`
//! so clones of the repository see the same data. Ids come from a sequence
//! that starts at 1 and never reuses a value, matching `BIGSERIAL`.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::{Result, TodoError};
use crate::repository::TodoRepository;
use crate::types::{NewTodo, Todo};

#[derive(Debug, Default)]
struct State {
    rows: BTreeMap<i64, Todo>,
    last_id: i64,
}

/// `TodoRepository` backed by process memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTodoRepository {
    state: Arc<RwLock<State>>,
}

impl InMemoryTodoRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored rows.
    pub async fn len(&self) -> usize {
        self.state.read().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl TodoRepository for InMemoryTodoRepository {
    async fn insert(&self, todo: &NewTodo) -> Result<i64> {
        let mut state = self.state.write().await;
        state.last_id += 1;
        let id = state.last_id;
        state.rows.insert(id, todo.clone().into_todo(id));
        Ok(id)
    }

    async fn fetch_by_id(&self, id: i64) -> Result<Option<Todo>> {
        Ok(self.state.read().await.rows.get(&id).cloned())
    }

    async fn fetch_all(&self) -> Result<Vec<Todo>> {
        let state = self.state.read().await;
        let mut todos: Vec<Todo> = state.rows.values().cloned().collect();
        todos.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(todos)
    }

    async fn update_row(&self, todo: &Todo) -> Result<()> {
        let mut state = self.state.write().await;
        let row = state
            .rows
            .get_mut(&todo.id)
            .ok_or(TodoError::NotFound(todo.id))?;
        row.title = todo.title.clone();
        row.description = todo.description.clone();
        row.completed = todo.completed;
        row.updated_at = todo.updated_at;
        Ok(())
    }

    async fn delete_row(&self, id: i64) -> Result<()> {
        let mut state = self.state.write().await;
        state
            .rows
            .remove(&id)
            .map(|_| ())
            .ok_or(TodoError::NotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::now;

    fn new_todo(title: &str) -> NewTodo {
        let ts = now();
        NewTodo {
            title: title.to_string(),
            description: String::new(),
            completed: false,
            created_at: ts,
            updated_at: ts,
        }
    }

    #[tokio::test]
    async fn ids_start_at_one_and_are_not_reused() {
        let repo = InMemoryTodoRepository::new();
        assert_eq!(repo.insert(&new_todo("a")).await.unwrap(), 1);
        assert_eq!(repo.insert(&new_todo("b")).await.unwrap(), 2);
        repo.delete_row(2).await.unwrap();
        assert_eq!(repo.insert(&new_todo("c")).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn fetch_missing_row_is_none() {
        let repo = InMemoryTodoRepository::new();
        assert!(repo.fetch_by_id(1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn fetch_all_orders_newest_first() {
        let repo = InMemoryTodoRepository::new();
        let mut older = new_todo("older");
        older.created_at -= chrono::Duration::seconds(10);
        older.updated_at = older.created_at;
        repo.insert(&older).await.unwrap();
        repo.insert(&new_todo("newer")).await.unwrap();

        let titles: Vec<String> = repo
            .fetch_all()
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(titles, vec!["newer", "older"]);
    }

    #[tokio::test]
    async fn update_missing_row_is_not_found() {
        let repo = InMemoryTodoRepository::new();
        let todo = new_todo("ghost").into_todo(9);
        let err = repo.update_row(&todo).await.unwrap_err();
        assert!(matches!(err, TodoError::NotFound(9)));
    }

    #[tokio::test]
    async fn update_does_not_touch_created_at() {
        let repo = InMemoryTodoRepository::new();
        let id = repo.insert(&new_todo("keep")).await.unwrap();
        let mut todo = repo.fetch_by_id(id).await.unwrap().unwrap();
        let created_at = todo.created_at;
        todo.created_at += chrono::Duration::days(1);
        todo.updated_at += chrono::Duration::days(1);
        todo.completed = true;
        repo.update_row(&todo).await.unwrap();

        let stored = repo.fetch_by_id(id).await.unwrap().unwrap();
        assert_eq!(stored.created_at, created_at);
        assert!(stored.completed);
    }

    #[tokio::test]
    async fn delete_twice_is_not_found() {
        let repo = InMemoryTodoRepository::new();
        let id = repo.insert(&new_todo("once")).await.unwrap();
        repo.delete_row(id).await.unwrap();
        let err = repo.delete_row(id).await.unwrap_err();
        assert!(matches!(err, TodoError::NotFound(_)));
        assert!(repo.is_empty().await);
    }
}
