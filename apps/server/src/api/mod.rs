//! API endpoints.

pub mod tasks;
pub mod users;

use std::sync::Arc;

use axum::{routing::get, Json, Router};
use serde_json::{json, Value};
use task_store::TaskStore;

use crate::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router<S: TaskStore + 'static>() -> Router<Arc<AppState<S>>> {
    Router::new()
        // User endpoints
        .route("/api/users", get(users::list_users).post(users::create_user))
        // Task endpoints
        .route("/api/tasks", get(tasks::list_tasks).post(tasks::create_task))
        .route(
            "/api/tasks/{id}",
            get(tasks::get_task)
                .patch(tasks::update_task)
                .delete(tasks::delete_task),
        )
        // API root
        .route("/api/", get(root))
        // Health check
        .route("/health", get(health_check))
}

/// API root endpoint.
async fn root() -> Json<Value> {
    Json(json!({ "message": "Task Tracker API" }))
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
