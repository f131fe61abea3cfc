//! Domain core for the todo service.
//!
//! # Overview
//! Holds the `Todo` entity, the error taxonomy, the storage gateway trait and
//! `TodoService`, which applies the lifecycle rules (validation, timestamps,
//! toggling) on top of any gateway.
//!
//! # Design
//! - `TodoService` depends on `Arc<dyn TodoRepository>`, never on a concrete
//!   store. The PostgreSQL gateway lives in the server crate.
//! - `InMemoryTodoRepository` satisfies the same contract and backs the tests.
//! - This crate has no HTTP, SQL or configuration dependencies.

pub mod error;
pub mod memory;
pub mod repository;
pub mod service;
pub mod types;

pub use error::{BoxError, Result, TodoError};
pub use memory::InMemoryTodoRepository;
pub use repository::TodoRepository;
pub use service::TodoService;
pub use types::{NewTodo, Todo};
