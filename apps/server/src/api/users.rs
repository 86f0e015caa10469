//! User management API endpoints.

use std::sync::Arc;

use axum::{extract::State, Json};
use entities::User;
use serde::Deserialize;
use task_store::TaskStore;

use crate::error::ServerResult;
use crate::state::AppState;

/// Request body for creating a user.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
}

/// Lists registered users.
pub async fn list_users<S: TaskStore>(
    State(state): State<Arc<AppState<S>>>,
) -> ServerResult<Json<Vec<User>>> {
    let users = state.users.list().await?;

    Ok(Json(users))
}

/// Creates a user.
pub async fn create_user<S: TaskStore>(
    State(state): State<Arc<AppState<S>>>,
    Json(request): Json<CreateUserRequest>,
) -> ServerResult<Json<User>> {
    let user = state.users.create(request.name, request.email).await?;

    Ok(Json(user))
}
