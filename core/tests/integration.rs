//! Full todo lifecycle through the public `todo_core` API.
//!
//! # Design
//! Drives `TodoService` over `InMemoryTodoRepository` the way a request
//! handler would, checking each step against what the store actually holds.

use std::sync::Arc;

use todo_core::{InMemoryTodoRepository, TodoError, TodoRepository, TodoService};

#[tokio::test]
async fn crud_lifecycle() {
    let repo = InMemoryTodoRepository::new();
    let service = TodoService::new(Arc::new(repo.clone()));

    // Step 1: empty store lists nothing.
    assert!(service.get_all().await.unwrap().is_empty());

    // Step 2: create.
    let created = service.create("Buy milk", "2%").await.unwrap();
    assert_eq!(created.title, "Buy milk");
    assert_eq!(created.description, "2%");
    assert!(!created.completed);
    assert_eq!(created.created_at, created.updated_at);
    let id = created.id;
    assert!(id > 0);

    // Step 3: read back is identical.
    let fetched = service.get_by_id(id).await.unwrap();
    assert_eq!(fetched, created);

    // Step 4: update with an empty title keeps the title.
    let updated = service.update(id, "", "", true).await.unwrap();
    assert_eq!(updated.title, "Buy milk");
    assert_eq!(updated.description, "");
    assert!(updated.completed);
    assert_eq!(repo.fetch_by_id(id).await.unwrap(), Some(updated.clone()));

    // Step 5: toggle flips it back.
    let toggled = service.toggle_complete(id).await.unwrap();
    assert!(!toggled.completed);
    assert!(toggled.updated_at >= updated.updated_at);
    assert!(toggled.created_at <= toggled.updated_at);

    // Step 6: delete, then the record is gone.
    service.delete(id).await.unwrap();
    assert!(matches!(
        service.get_by_id(id).await,
        Err(TodoError::NotFound(missing)) if missing == id
    ));
    assert!(matches!(service.delete(id).await, Err(TodoError::NotFound(_))));
    assert!(service.get_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn list_is_most_recent_first() {
    let service = TodoService::new(Arc::new(InMemoryTodoRepository::new()));
    let first = service.create("first", "").await.unwrap();
    let second = service.create("second", "").await.unwrap();
    let third = service.create("third", "").await.unwrap();

    let ids: Vec<i64> = service
        .get_all()
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.id)
        .collect();
    assert_eq!(ids, vec![third.id, second.id, first.id]);
}

#[tokio::test]
async fn concurrent_creates_get_distinct_ids() {
    let service = TodoService::new(Arc::new(InMemoryTodoRepository::new()));

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let service = service.clone();
            tokio::spawn(async move { service.create(&format!("todo {i}"), "").await })
        })
        .collect();

    let mut ids = Vec::new();
    for handle in handles {
        ids.push(handle.await.unwrap().unwrap().id);
    }
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 16);
    assert_eq!(service.get_all().await.unwrap().len(), 16);
}
