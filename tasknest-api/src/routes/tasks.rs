/// Task endpoints
///
/// Every handler here sits behind the token gate and only ever sees the
/// caller's own tasks.
///
/// # Endpoints
///
/// - `GET /api/tasks` - List the caller's tasks, newest first
/// - `POST /api/tasks` - Create a task
/// - `DELETE /api/tasks/:id` - Delete one of the caller's tasks

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tasknest_shared::{
    auth::middleware::AuthContext,
    models::task::{CreateTask, Task, TaskPriority},
    store::TaskStore,
};
use uuid::Uuid;

/// Create task request
#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    /// Missing and blank titles are both rejected
    #[serde(default)]
    pub title: String,

    /// Defaults to Medium
    pub priority: Option<TaskPriority>,
}

/// Plain message body
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub msg: String,
}

/// List tasks
///
/// # Endpoint
///
/// ```text
/// GET /api/tasks
/// x-auth-token: eyJ...
/// ```
///
/// # Response
///
/// ```json
/// [
///   {
///     "id": "uuid",
///     "user_id": "uuid",
///     "title": "Buy milk",
///     "priority": "High",
///     "created_at": "2025-01-01T00:00:00Z"
///   }
/// ]
/// ```
pub async fn list_tasks(
    State(state): State<AppState>,
    auth: AuthContext,
) -> ApiResult<Json<Vec<Task>>> {
    let tasks = state.store.list_tasks(auth.user_id).await?;
    Ok(Json(tasks))
}

/// Create a task
///
/// # Endpoint
///
/// ```text
/// POST /api/tasks
/// x-auth-token: eyJ...
/// Content-Type: application/json
///
/// { "title": "Buy milk", "priority": "High" }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Blank title ("Title is required") or unknown priority
/// - `401 Unauthorized`: The token's user no longer exists
pub async fn create_task(
    State(state): State<AppState>,
    auth: AuthContext,
    payload: Result<Json<CreateTaskRequest>, JsonRejection>,
) -> ApiResult<Json<Task>> {
    let Json(req) = payload?;

    let title = req.title.trim();
    if title.is_empty() {
        return Err(ApiError::BadRequest("Title is required".to_string()));
    }

    let task = state
        .store
        .create_task(CreateTask {
            user_id: auth.user_id,
            title: title.to_string(),
            priority: req.priority.unwrap_or_default(),
        })
        .await?;

    tracing::info!(
        user_id = %auth.user_id,
        task_id = %task.id,
        priority = %task.priority,
        "Task created"
    );

    Ok(Json(task))
}

/// Delete a task
///
/// # Endpoint
///
/// ```text
/// DELETE /api/tasks/:id
/// x-auth-token: eyJ...
/// ```
///
/// # Response
///
/// ```json
/// { "msg": "Task removed" }
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: The task belongs to someone else ("Not authorized")
/// - `404 Not Found`: No such task, including ids that are not UUIDs
pub async fn delete_task(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let not_found = || ApiError::NotFound("Task not found".to_string());

    let task_id = Uuid::parse_str(&id).map_err(|_| not_found())?;
    let task = state.store.find_task(task_id).await?.ok_or_else(not_found)?;

    if !task.is_owned_by(auth.user_id) {
        tracing::warn!(
            user_id = %auth.user_id,
            task_id = %task_id,
            "Attempt to delete another user's task"
        );
        return Err(ApiError::Unauthorized("Not authorized".to_string()));
    }

    // Lost a race with a concurrent delete
    if !state.store.delete_task(task_id).await? {
        return Err(not_found());
    }

    tracing::info!(user_id = %auth.user_id, task_id = %task_id, "Task removed");

    Ok(Json(MessageResponse {
        msg: "Task removed".to_string(),
    }))
}
