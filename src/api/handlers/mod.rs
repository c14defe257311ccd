use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::Database;
use crate::error::TaskError;
use crate::models::*;
use crate::service::TaskService;

pub type AppState = TaskService<Database>;

// ============================================================
// Error Handling
// ============================================================

/// JSON body returned for every failed request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: u16,
    pub message: String,
}

pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            code: self.status.as_u16(),
            message: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

/// Maps a task error to its HTTP status. Client errors carry their message;
/// internal errors are logged here and reach the client as a generic text.
impl From<TaskError> for ApiError {
    fn from(err: TaskError) -> Self {
        let status = match &err {
            TaskError::InvalidTitle | TaskError::InvalidDateFormat | TaskError::DeadlineInPast => {
                StatusCode::BAD_REQUEST
            }
            TaskError::NotFound(_) => StatusCode::NOT_FOUND,
            TaskError::Internal(e) => {
                tracing::error!("Internal error: {:#}", e);
                return Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message: "Internal server error".to_string(),
                };
            }
        };

        tracing::warn!("Rejected request: {}", err);
        Self {
            status,
            message: err.to_string(),
        }
    }
}

/// Malformed bodies, query strings and path ids are client errors.
fn bad_request(message: String) -> ApiError {
    tracing::warn!("Malformed request: {}", message);
    ApiError {
        status: StatusCode::BAD_REQUEST,
        message,
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        bad_request(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        bad_request(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        bad_request(rejection.body_text())
    }
}

// ============================================================
// Health
// ============================================================

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ============================================================
// Tasks
// ============================================================

pub async fn list_tasks(
    State(service): State<AppState>,
    query: Result<Query<ListTasksQuery>, QueryRejection>,
) -> Result<Json<Vec<TaskResponse>>, ApiError> {
    let Query(query) = query?;
    let tasks = service.list(&query)?;
    Ok(Json(tasks.into_iter().map(Into::into).collect()))
}

pub async fn create_task(
    State(service): State<AppState>,
    input: Result<Json<CreateTaskInput>, JsonRejection>,
) -> Result<(StatusCode, Json<TaskResponse>), ApiError> {
    let Json(input) = input?;
    let task = service.create(input)?;
    Ok((StatusCode::CREATED, Json(task.into())))
}

pub async fn get_task(
    State(service): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<TaskResponse>, ApiError> {
    let Path(id) = id?;
    Ok(Json(service.get(id)?.into()))
}

pub async fn update_task(
    State(service): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
    input: Result<Json<UpdateTaskInput>, JsonRejection>,
) -> Result<Json<TaskResponse>, ApiError> {
    let Path(id) = id?;
    let Json(input) = input?;
    Ok(Json(service.edit(id, input)?.into()))
}

pub async fn delete_task(
    State(service): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = id?;
    service.delete(id)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn change_task_status(
    State(service): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
    input: Result<Json<ChangeStatusInput>, JsonRejection>,
) -> Result<Json<TaskResponse>, ApiError> {
    let Path(id) = id?;
    let Json(input) = input?;
    Ok(Json(service.change_status(id, input.completed)?.into()))
}
