//! Request handlers for `/health` and `/api/v1/todos`.
//!
//! # Design
//! Handlers only translate: parse the path id and JSON body, call
//! `TodoService`, and wrap the result in the `{message, data}` envelope.
//! Extractor rejections are caught here so every 400 carries the same
//! `{"error": ...}` body as lifecycle errors.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use todo_core::{Todo, TodoService};

use crate::error::AppError;

#[derive(Debug, Deserialize)]
pub struct CreateTodoRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// An empty `title` keeps the stored one; `description` and `completed`
/// are always applied, defaulting to `""` and `false` when omitted.
///
/// `title` must be present but `""` is accepted on purpose: it is how a
/// caller changes other fields without resending the title.
#[derive(Debug, Deserialize)]
pub struct UpdateTodoRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub completed: bool,
}

/// Success envelope. `data` is left out when there is nothing to return.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    fn with_data(message: &str, data: T) -> Json<Self> {
        Json(Self {
            message: message.to_string(),
            data: Some(data),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

pub async fn list_todos(
    State(service): State<TodoService>,
) -> Result<Json<ApiResponse<Vec<Todo>>>, AppError> {
    let todos = service
        .get_all()
        .await
        .map_err(|e| AppError::from_todo(e, "Failed to get todos"))?;
    Ok(ApiResponse::with_data("Todos retrieved successfully", todos))
}

pub async fn create_todo(
    State(service): State<TodoService>,
    payload: Result<Json<CreateTodoRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<Todo>>), AppError> {
    let Json(req) = payload.map_err(|_| AppError::invalid_body())?;
    let todo = service
        .create(&req.title, &req.description)
        .await
        .map_err(|e| AppError::from_todo(e, "Failed to create todo"))?;
    Ok((
        StatusCode::CREATED,
        ApiResponse::with_data("Todo created successfully", todo),
    ))
}

pub async fn get_todo(
    State(service): State<TodoService>,
    id: Result<Path<String>, PathRejection>,
) -> Result<Json<ApiResponse<Todo>>, AppError> {
    let id = parse_id(id)?;
    let todo = service
        .get_by_id(id)
        .await
        .map_err(|e| AppError::from_todo(e, "Failed to get todo"))?;
    Ok(ApiResponse::with_data("Todo retrieved successfully", todo))
}

pub async fn update_todo(
    State(service): State<TodoService>,
    id: Result<Path<String>, PathRejection>,
    payload: Result<Json<UpdateTodoRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<Todo>>, AppError> {
    let id = parse_id(id)?;
    let Json(req) = payload.map_err(|_| AppError::invalid_body())?;
    let todo = service
        .update(id, &req.title, &req.description, req.completed)
        .await
        .map_err(|e| AppError::from_todo(e, "Failed to update todo"))?;
    Ok(ApiResponse::with_data("Todo updated successfully", todo))
}

pub async fn delete_todo(
    State(service): State<TodoService>,
    id: Result<Path<String>, PathRejection>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let id = parse_id(id)?;
    service
        .delete(id)
        .await
        .map_err(|e| AppError::from_todo(e, "Failed to delete todo"))?;
    Ok(Json(ApiResponse {
        message: "Todo deleted successfully".to_string(),
        data: None,
    }))
}

pub async fn toggle_todo(
    State(service): State<TodoService>,
    id: Result<Path<String>, PathRejection>,
) -> Result<Json<ApiResponse<Todo>>, AppError> {
    let id = parse_id(id)?;
    let todo = service
        .toggle_complete(id)
        .await
        .map_err(|e| AppError::from_todo(e, "Failed to toggle todo"))?;
    Ok(ApiResponse::with_data("Todo toggled successfully", todo))
}

/// Path ids must be integers. Range checks (id > 0) belong to the service.
fn parse_id(raw: Result<Path<String>, PathRejection>) -> Result<i64, AppError> {
    let Path(raw) = raw.map_err(|_| AppError::invalid_id())?;
    raw.parse().map_err(|_| AppError::invalid_id())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_id_accepts_integers_only() {
        let id = |raw: &str| parse_id(Ok(Path(raw.to_string())));
        assert_eq!(id("42").unwrap(), 42);
        assert_eq!(id("-1").unwrap(), -1);
        assert!(id("abc").is_err());
        assert!(id("1.5").is_err());
        assert!(id("").is_err());
    }

    #[test]
    fn create_request_defaults_description() {
        let req: CreateTodoRequest = serde_json::from_str(r#"{"title":"Buy milk"}"#).unwrap();
        assert_eq!(req.title, "Buy milk");
        assert_eq!(req.description, "");
    }

    #[test]
    fn create_request_requires_title() {
        let result: Result<CreateTodoRequest, _> =
            serde_json::from_str(r#"{"description":"no title"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn update_request_defaults_optional_fields() {
        let req: UpdateTodoRequest = serde_json::from_str(r#"{"title":""}"#).unwrap();
        assert_eq!(req.title, "");
        assert_eq!(req.description, "");
        assert!(!req.completed);
    }

    #[test]
    fn envelope_without_data_deserializes_to_none() {
        let body: ApiResponse<Todo> =
            serde_json::from_str(r#"{"message":"Todo deleted successfully"}"#).unwrap();
        assert!(body.data.is_none());
    }

    #[test]
    fn envelope_omits_missing_data() {
        let body = ApiResponse::<()> {
            message: "Todo deleted successfully".to_string(),
            data: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json, serde_json::json!({"message": "Todo deleted successfully"}));
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let Json(body) = health().await;
        assert_eq!(body.status, "ok");
    }
}
