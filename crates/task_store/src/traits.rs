//! Store trait and contract types.

use async_trait::async_trait;
use entities::{Task, TaskStatus, User};
use serde::{Deserialize, Deserializer};
use uuid::Uuid;

use crate::TaskStoreResult;

/// Maximum number of records returned by a list operation.
pub const LIST_CAP: usize = 1000;

/// Filter options for listing tasks.
///
/// Present fields are exact-match constraints, combined with logical AND;
/// absent fields impose no constraint.
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    /// Filter by status.
    pub status: Option<TaskStatus>,
    /// Filter by assignee ID.
    pub assignee_id: Option<Uuid>,
}

/// A partial update for a task.
///
/// Unset-aware: a field absent from the request is left untouched by the
/// merge, which is not the same as a field explicitly set to null. Nullable
/// fields are therefore double-`Option`, where the outer `None` means "not
/// in the patch".
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskPatch {
    /// New title.
    #[serde(default)]
    pub title: Option<String>,
    /// New description.
    #[serde(default)]
    pub description: Option<String>,
    /// New assignee ID, or explicit null to unassign.
    #[serde(default, deserialize_with = "double_option")]
    pub assignee_id: Option<Option<Uuid>>,
    /// New status.
    #[serde(default)]
    pub status: Option<TaskStatus>,
    /// New due date, or explicit null to clear it.
    #[serde(default, deserialize_with = "double_option")]
    pub due_date: Option<Option<String>>,
    /// Assignee name snapshot. Never client-supplied; the service layer
    /// fills it in when the patch touches `assignee_id`.
    #[serde(skip)]
    pub assignee_name: Option<Option<String>>,
}

impl TaskPatch {
    /// Returns true if the patch carries no fields at all.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.assignee_id.is_none()
            && self.status.is_none()
            && self.due_date.is_none()
            && self.assignee_name.is_none()
    }
}

/// Deserializes a present field into `Some(value)`, keeping an explicit
/// null as `Some(None)`. Absent fields fall back to the `None` default.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

/// Trait for user and task storage operations.
#[async_trait]
pub trait TaskStore: Send + Sync {
    // =========================================================================
    // User operations
    // =========================================================================

    /// Creates a new user. Fails with `Conflict` when a user with the same
    /// email already exists.
    async fn create_user(&self, user: User) -> TaskStoreResult<User>;

    /// Gets a user by ID.
    async fn get_user(&self, id: Uuid) -> TaskStoreResult<Option<User>>;

    /// Gets a user by email.
    async fn get_user_by_email(&self, email: &str) -> TaskStoreResult<Option<User>>;

    /// Lists users in insertion order, capped at [`LIST_CAP`].
    async fn list_users(&self) -> TaskStoreResult<Vec<User>>;

    // =========================================================================
    // Task operations
    // =========================================================================

    /// Creates a new task.
    async fn create_task(&self, task: Task) -> TaskStoreResult<Task>;

    /// Gets a task by ID.
    async fn get_task(&self, id: Uuid) -> TaskStoreResult<Option<Task>>;

    /// Lists tasks matching the filter, capped at [`LIST_CAP`].
    async fn list_tasks(&self, filter: TaskFilter) -> TaskStoreResult<Vec<Task>>;

    /// Merges only the fields present in `patch` into the stored task and
    /// returns the fully reloaded record. Fails with `NotFound`.
    async fn apply_task_patch(&self, id: Uuid, patch: &TaskPatch) -> TaskStoreResult<Task>;

    /// Deletes a task. Fails with `NotFound`.
    async fn delete_task(&self, id: Uuid) -> TaskStoreResult<()>;
}
