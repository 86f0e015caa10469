//! In-memory store implementation for testing.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use entities::{Task, User};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{TaskFilter, TaskPatch, TaskStore, TaskStoreError, TaskStoreResult, LIST_CAP};

/// In-memory store for testing purposes.
#[derive(Debug, Default)]
pub struct MemoryTaskStore {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
    tasks: Arc<RwLock<HashMap<Uuid, Task>>>,
}

impl MemoryTaskStore {
    /// Creates a new in-memory store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskStore for MemoryTaskStore {
    // =========================================================================
    // User operations
    // =========================================================================

    async fn create_user(&self, user: User) -> TaskStoreResult<User> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == user.email) {
            return Err(TaskStoreError::conflict("User", "email", user.email.clone()));
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn get_user(&self, id: Uuid) -> TaskStoreResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> TaskStoreResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn list_users(&self) -> TaskStoreResult<Vec<User>> {
        let users = self.users.read().await;
        let mut result: Vec<User> = users.values().cloned().collect();
        result.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        result.truncate(LIST_CAP);
        Ok(result)
    }

    // =========================================================================
    // Task operations
    // =========================================================================

    async fn create_task(&self, task: Task) -> TaskStoreResult<Task> {
        let mut tasks = self.tasks.write().await;
        tasks.insert(task.id, task.clone());
        Ok(task)
    }

    async fn get_task(&self, id: Uuid) -> TaskStoreResult<Option<Task>> {
        let tasks = self.tasks.read().await;
        Ok(tasks.get(&id).cloned())
    }

    async fn list_tasks(&self, filter: TaskFilter) -> TaskStoreResult<Vec<Task>> {
        let tasks = self.tasks.read().await;
        let mut result: Vec<Task> = tasks
            .values()
            .filter(|t| {
                filter.status.is_none_or(|s| t.status == s)
                    && filter.assignee_id.is_none_or(|id| t.assignee_id == Some(id))
            })
            .cloned()
            .collect();
        result.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        result.truncate(LIST_CAP);
        Ok(result)
    }

    async fn apply_task_patch(&self, id: Uuid, patch: &TaskPatch) -> TaskStoreResult<Task> {
        let mut tasks = self.tasks.write().await;
        let task = tasks
            .get_mut(&id)
            .ok_or_else(|| TaskStoreError::not_found("Task", id.to_string()))?;

        if let Some(title) = &patch.title {
            task.title = title.clone();
        }
        if let Some(description) = &patch.description {
            task.description = description.clone();
        }
        if let Some(assignee_id) = patch.assignee_id {
            task.assignee_id = assignee_id;
        }
        if let Some(assignee_name) = &patch.assignee_name {
            task.assignee_name = assignee_name.clone();
        }
        if let Some(status) = patch.status {
            task.status = status;
        }
        if let Some(due_date) = &patch.due_date {
            task.due_date = due_date.clone();
        }

        Ok(task.clone())
    }

    async fn delete_task(&self, id: Uuid) -> TaskStoreResult<()> {
        let mut tasks = self.tasks.write().await;
        if tasks.remove(&id).is_none() {
            return Err(TaskStoreError::not_found("Task", id.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use entities::TaskStatus;

    use super::*;

    #[tokio::test]
    async fn test_user_email_conflict() {
        let store = MemoryTaskStore::new();

        let user = store
            .create_user(User::new("John Doe", "john@example.com"))
            .await
            .unwrap();

        let fetched = store.get_user(user.id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "John Doe");

        let err = store
            .create_user(User::new("Other Person", "john@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, TaskStoreError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_task_crud() {
        let store = MemoryTaskStore::new();

        let task = store
            .create_task(Task::new("Fix login", "Session cookie expires too early"))
            .await
            .unwrap();

        let fetched = store.get_task(task.id).await.unwrap().unwrap();
        assert_eq!(fetched.title, "Fix login");

        store.delete_task(task.id).await.unwrap();
        assert!(store.get_task(task.id).await.unwrap().is_none());

        let err = store.delete_task(task.id).await.unwrap_err();
        assert!(matches!(err, TaskStoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_list_tasks_filter() {
        let store = MemoryTaskStore::new();

        let assignee = Uuid::new_v4();
        let mut assigned = Task::new("Task 1", "First").with_status(TaskStatus::Done);
        assigned.assignee_id = Some(assignee);
        store.create_task(assigned).await.unwrap();
        store.create_task(Task::new("Task 2", "Second")).await.unwrap();

        let by_status = store
            .list_tasks(TaskFilter {
                status: Some(TaskStatus::Done),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(by_status.len(), 1);
        assert_eq!(by_status[0].title, "Task 1");

        let by_assignee = store
            .list_tasks(TaskFilter {
                assignee_id: Some(assignee),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(by_assignee.len(), 1);

        let combined = store
            .list_tasks(TaskFilter {
                status: Some(TaskStatus::Todo),
                assignee_id: Some(assignee),
            })
            .await
            .unwrap();
        assert!(combined.is_empty());
    }

    #[tokio::test]
    async fn test_patch_merges_only_present_fields() {
        let store = MemoryTaskStore::new();

        let mut task = Task::new("Ship release", "Cut the release").with_due_date("2026-09-01");
        task.assignee_id = Some(Uuid::new_v4());
        task.assignee_name = Some("John Doe".to_string());
        let task = store.create_task(task).await.unwrap();

        let patch = TaskPatch {
            status: Some(TaskStatus::InProgress),
            ..Default::default()
        };
        let updated = store.apply_task_patch(task.id, &patch).await.unwrap();

        assert_eq!(updated.status, TaskStatus::InProgress);
        assert_eq!(updated.title, "Ship release");
        assert_eq!(updated.assignee_id, task.assignee_id);
        assert_eq!(updated.assignee_name, Some("John Doe".to_string()));
        assert_eq!(updated.due_date, Some("2026-09-01".to_string()));

        let patch = TaskPatch {
            assignee_id: Some(None),
            assignee_name: Some(None),
            ..Default::default()
        };
        let updated = store.apply_task_patch(task.id, &patch).await.unwrap();
        assert!(updated.assignee_id.is_none());
        assert!(updated.assignee_name.is_none());
    }
}
