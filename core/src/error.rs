//! Error taxonomy shared by the lifecycle manager and every storage gateway.
//!
//! # Design
//! Three outcomes matter to callers: the input was rejected before touching
//! the store (`InvalidData`), the record does not exist (`NotFound`), or the
//! store itself failed (`Storage`). `NotFound` is also what a gateway reports
//! when a mutation affects zero rows, so a delete that races another delete
//! surfaces the same way as a plain miss.

use thiserror::Error;

/// Boxed source error carried by [`TodoError::Storage`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors returned by `TodoService` and `TodoRepository` implementations.
#[derive(Debug, Error)]
pub enum TodoError {
    /// Caller input failed a precondition (empty title, non-positive id).
    #[error("invalid todo data: {0}")]
    InvalidData(&'static str),

    /// No todo exists with the given id.
    #[error("todo {0} not found")]
    NotFound(i64),

    /// The underlying store failed.
    #[error("{context}")]
    Storage {
        context: String,
        #[source]
        source: BoxError,
    },
}

impl TodoError {
    /// Wrap a driver or connection error with a short description of the
    /// operation that failed.
    pub fn storage(context: impl Into<String>, source: impl Into<BoxError>) -> Self {
        TodoError::Storage {
            context: context.into(),
            source: source.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TodoError>;
