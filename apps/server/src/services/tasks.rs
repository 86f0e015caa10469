//! Task management service.
//!
//! Owns the assignee-name snapshot: every write that touches `assignee_id`
//! resolves the referenced user and records the user's current name on the
//! task record, so reads never join against the user collection. The
//! snapshot reflects the name only as of the last assignment write.

use std::sync::Arc;

use entities::{Task, TaskStatus, User};
use task_store::{TaskFilter, TaskPatch, TaskStore};
use uuid::Uuid;

use crate::error::{ServerError, ServerResult};

/// Input for creating a task.
#[derive(Debug, Clone, Default)]
pub struct NewTask {
    /// Task title.
    pub title: String,
    /// Task description.
    pub description: String,
    /// Assigned user's ID.
    pub assignee_id: Option<Uuid>,
    /// Initial status; defaults to `todo`.
    pub status: Option<TaskStatus>,
    /// Due date, stored verbatim.
    pub due_date: Option<String>,
}

/// Service for creating, querying, updating, and deleting tasks.
pub struct TaskService<S> {
    store: Arc<S>,
}

impl<S: TaskStore> TaskService<S> {
    /// Creates a new task service backed by `store`.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Creates a task, resolving the assignee's name snapshot when an
    /// assignee is given.
    pub async fn create(&self, input: NewTask) -> ServerResult<Task> {
        if input.title.trim().is_empty() {
            return Err(ServerError::InvalidRequest(
                "title must not be empty".to_string(),
            ));
        }
        if input.description.trim().is_empty() {
            return Err(ServerError::InvalidRequest(
                "description must not be empty".to_string(),
            ));
        }

        // A dangling assignee id is accepted; the snapshot just stays
        // empty.
        let assignee_name = match input.assignee_id {
            Some(assignee_id) => self.store.get_user(assignee_id).await?.map(|u| u.name),
            None => None,
        };

        let mut task = Task::new(input.title, input.description);
        task.assignee_id = input.assignee_id;
        task.assignee_name = assignee_name;
        if let Some(status) = input.status {
            task.status = status;
        }
        task.due_date = input.due_date;

        let task = self.store.create_task(task).await?;

        tracing::info!(task_id = %task.id, "Task created");

        Ok(task)
    }

    /// Gets a task by ID.
    pub async fn get(&self, id: Uuid) -> ServerResult<Task> {
        self.store
            .get_task(id)
            .await?
            .ok_or_else(|| ServerError::NotFound("Task not found".to_string()))
    }

    /// Lists tasks matching the filter.
    pub async fn list(&self, filter: TaskFilter) -> ServerResult<Vec<Task>> {
        Ok(self.store.list_tasks(filter).await?)
    }

    /// Applies a partial update to a task, augmenting the patch with the
    /// assignee name snapshot when the patch touches `assignee_id`.
    /// Returns the fully reloaded record.
    pub async fn update(&self, id: Uuid, patch: TaskPatch) -> ServerResult<Task> {
        let assignee = match patch.assignee_id {
            Some(Some(assignee_id)) => self.store.get_user(assignee_id).await?,
            _ => None,
        };
        let patch = augment_assignee_name(patch, assignee.as_ref());

        let task = self.store.apply_task_patch(id, &patch).await?;

        tracing::info!(task_id = %task.id, "Task updated");

        Ok(task)
    }

    /// Deletes a task.
    pub async fn delete(&self, id: Uuid) -> ServerResult<()> {
        self.store.delete_task(id).await?;

        tracing::info!(task_id = %id, "Task deleted");

        Ok(())
    }
}

/// Adds the derived `assignee_name` field to a caller patch.
///
/// - Reassignment to a resolved user records that user's current name.
/// - Reassignment to an unknown user leaves the stored snapshot as-is, so
///   the previous name stays attached to the new id.
/// - Explicitly clearing `assignee_id` also clears the snapshot.
/// - A patch that does not mention `assignee_id` never touches the
///   snapshot, whatever else it updates.
pub fn augment_assignee_name(mut patch: TaskPatch, assignee: Option<&User>) -> TaskPatch {
    match patch.assignee_id {
        Some(Some(_)) => {
            if let Some(user) = assignee {
                patch.assignee_name = Some(Some(user.name.clone()));
            }
        }
        Some(None) => patch.assignee_name = Some(None),
        None => {}
    }
    patch
}
