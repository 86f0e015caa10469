//! User management service.

use std::sync::Arc;

use entities::User;
use task_store::TaskStore;

use crate::error::{ServerError, ServerResult};

/// Service for registering and listing users.
pub struct UserService<S> {
    store: Arc<S>,
}

impl<S: TaskStore> UserService<S> {
    /// Creates a new user service backed by `store`.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Registers a new user. Fails with `Conflict` when the email is
    /// already taken.
    pub async fn create(&self, name: String, email: String) -> ServerResult<User> {
        if name.trim().is_empty() {
            return Err(ServerError::InvalidRequest(
                "name must not be empty".to_string(),
            ));
        }
        if email.trim().is_empty() {
            return Err(ServerError::InvalidRequest(
                "email must not be empty".to_string(),
            ));
        }

        let user = self.store.create_user(User::new(name, email)).await?;

        tracing::info!(user_id = %user.id, "User created");

        Ok(user)
    }

    /// Lists registered users.
    pub async fn list(&self) -> ServerResult<Vec<User>> {
        Ok(self.store.list_users().await?)
    }
}
