//! PostgreSQL storage gateway.
//!
//! Every method issues exactly one parameterized statement against the
//! `todos` table. Driver errors become `TodoError::Storage`; an `UPDATE` or
//! `DELETE` that touches no row becomes `TodoError::NotFound`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use todo_core::{NewTodo, Result, Todo, TodoError, TodoRepository};

#[derive(Debug, FromRow)]
struct TodoRow {
    id: i64,
    title: String,
    description: String,
    completed: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<TodoRow> for Todo {
    fn from(row: TodoRow) -> Self {
        Todo {
            id: row.id,
            title: row.title,
            description: row.description,
            completed: row.completed,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// `TodoRepository` over a shared `PgPool`.
#[derive(Debug, Clone)]
pub struct PostgresTodoRepository {
    pool: PgPool,
}

impl PostgresTodoRepository {
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TodoRepository for PostgresTodoRepository {
    async fn insert(&self, todo: &NewTodo) -> Result<i64> {
        sqlx::query_scalar::<_, i64>(
            r"
            INSERT INTO todos (title, description, completed, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            ",
        )
        .bind(&todo.title)
        .bind(&todo.description)
        .bind(todo.completed)
        .bind(todo.created_at)
        .bind(todo.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| TodoError::storage("failed to create todo", e))
    }

    async fn fetch_by_id(&self, id: i64) -> Result<Option<Todo>> {
        let row: Option<TodoRow> = sqlx::query_as(
            r"
            SELECT id, title, description, completed, created_at, updated_at
            FROM todos
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| TodoError::storage("failed to get todo", e))?;

        Ok(row.map(Todo::from))
    }

    async fn fetch_all(&self) -> Result<Vec<Todo>> {
        let rows: Vec<TodoRow> = sqlx::query_as(
            r"
            SELECT id, title, description, completed, created_at, updated_at
            FROM todos
            ORDER BY created_at DESC, id DESC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| TodoError::storage("failed to get todos", e))?;

        Ok(rows.into_iter().map(Todo::from).collect())
    }

    async fn update_row(&self, todo: &Todo) -> Result<()> {
        let result = sqlx::query(
            r"
            UPDATE todos
            SET title = $1, description = $2, completed = $3, updated_at = $4
            WHERE id = $5
            ",
        )
        .bind(&todo.title)
        .bind(&todo.description)
        .bind(todo.completed)
        .bind(todo.updated_at)
        .bind(todo.id)
        .execute(&self.pool)
        .await
        .map_err(|e| TodoError::storage("failed to update todo", e))?;

        if result.rows_affected() == 0 {
            return Err(TodoError::NotFound(todo.id));
        }
        Ok(())
    }

    async fn delete_row(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM todos WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| TodoError::storage("failed to delete todo", e))?;

        if result.rows_affected() == 0 {
            return Err(TodoError::NotFound(id));
        }
        Ok(())
    }
}
