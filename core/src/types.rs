//! Domain types for the todo service.
//!
//! # Design
//! `Todo` is a row that the store has already accepted, so it always carries
//! a store-assigned `id`. A todo that has not been persisted yet is a
//! `NewTodo`, which has no id at all; there is no "id 0 means unsaved" state.
//!
//! Timestamps are `DateTime<Utc>` truncated to microseconds, the resolution
//! PostgreSQL keeps for `TIMESTAMPTZ`. A freshly created todo therefore
//! compares equal to the same row read back from the database.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

/// A persisted todo item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Todo {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A todo that is about to be inserted. The store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    pub title: String,
    pub description: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl NewTodo {
    /// Attach the id assigned by the store.
    pub fn into_todo(self, id: i64) -> Todo {
        Todo {
            id,
            title: self.title,
            description: self.description,
            completed: self.completed,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Current time at the precision the store can hold.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap()
    }

    #[test]
    fn todo_serializes_with_snake_case_fields() {
        let todo = Todo {
            id: 7,
            title: "Buy milk".to_string(),
            description: "2%".to_string(),
            completed: false,
            created_at: fixed_time(),
            updated_at: fixed_time(),
        };
        let json = serde_json::to_value(&todo).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["title"], "Buy milk");
        assert_eq!(json["description"], "2%");
        assert_eq!(json["completed"], false);
        assert_eq!(json["created_at"], "2024-05-01T12:30:00Z");
        assert_eq!(json["updated_at"], "2024-05-01T12:30:00Z");
    }

    #[test]
    fn new_todo_keeps_fields_when_id_is_attached() {
        let new = NewTodo {
            title: "Walk dog".to_string(),
            description: String::new(),
            completed: false,
            created_at: fixed_time(),
            updated_at: fixed_time(),
        };
        let todo = new.clone().into_todo(42);
        assert_eq!(todo.id, 42);
        assert_eq!(todo.title, new.title);
        assert_eq!(todo.description, new.description);
        assert_eq!(todo.completed, new.completed);
        assert_eq!(todo.created_at, new.created_at);
        assert_eq!(todo.updated_at, new.updated_at);
    }

    #[test]
    fn now_is_truncated_to_microseconds() {
        let ts = now();
        assert_eq!(ts.nanosecond() % 1_000, 0);
    }
}
