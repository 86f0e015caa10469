//! Task management API endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use entities::{Task, TaskStatus};
use serde::Deserialize;
use serde_json::{json, Value};
use task_store::{TaskFilter, TaskPatch, TaskStore};
use uuid::Uuid;

use crate::error::ServerResult;
use crate::services::NewTask;
use crate::state::AppState;

/// Request body for creating a task.
#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    /// Task title.
    pub title: String,
    /// Task description.
    pub description: String,
    /// Assigned user's ID.
    #[serde(default)]
    pub assignee_id: Option<Uuid>,
    /// Initial status, defaulting to `todo`.
    #[serde(default)]
    pub status: Option<TaskStatus>,
    /// Due date, stored verbatim.
    #[serde(default)]
    pub due_date: Option<String>,
}

/// Query parameters for listing tasks.
#[derive(Debug, Default, Deserialize)]
pub struct ListTasksQuery {
    /// Filter by status.
    pub status: Option<TaskStatus>,
    /// Filter by assignee ID.
    pub assignee_id: Option<Uuid>,
}

/// Lists tasks with optional filters.
pub async fn list_tasks<S: TaskStore>(
    State(state): State<Arc<AppState<S>>>,
    Query(query): Query<ListTasksQuery>,
) -> ServerResult<Json<Vec<Task>>> {
    let filter = TaskFilter {
        status: query.status,
        assignee_id: query.assignee_id,
    };

    let tasks = state.tasks.list(filter).await?;

    Ok(Json(tasks))
}

/// Gets a task by ID.
pub async fn get_task<S: TaskStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<Uuid>,
) -> ServerResult<Json<Task>> {
    let task = state.tasks.get(id).await?;

    Ok(Json(task))
}

/// Creates a task.
pub async fn create_task<S: TaskStore>(
    State(state): State<Arc<AppState<S>>>,
    Json(request): Json<CreateTaskRequest>,
) -> ServerResult<Json<Task>> {
    let task = state
        .tasks
        .create(NewTask {
            title: request.title,
            description: request.description,
            assignee_id: request.assignee_id,
            status: request.status,
            due_date: request.due_date,
        })
        .await?;

    Ok(Json(task))
}

/// Applies a partial update to a task.
pub async fn update_task<S: TaskStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<Uuid>,
    Json(patch): Json<TaskPatch>,
) -> ServerResult<Json<Task>> {
    let task = state.tasks.update(id, patch).await?;

    Ok(Json(task))
}

/// Deletes a task.
pub async fn delete_task<S: TaskStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<Uuid>,
) -> ServerResult<Json<Value>> {
    state.tasks.delete(id).await?;

    Ok(Json(json!({ "message": "Task deleted successfully" })))
}
