//! SQLite store implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use entities::{Task, TaskStatus, User};
use sqlx::{sqlite::SqlitePoolOptions, FromRow, Pool, Sqlite};
use uuid::Uuid;

use crate::{TaskFilter, TaskPatch, TaskStore, TaskStoreError, TaskStoreResult, LIST_CAP};

/// SQL schema definition
const SCHEMA_SQL: &str = r#"
-- Users table
CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY NOT NULL,
    name TEXT NOT NULL,
    email TEXT NOT NULL,
    created_at TEXT NOT NULL
);

-- Tasks table
CREATE TABLE IF NOT EXISTS tasks (
    id TEXT PRIMARY KEY NOT NULL,
    title TEXT NOT NULL,
    description TEXT NOT NULL,
    assignee_id TEXT,
    assignee_name TEXT,
    status TEXT NOT NULL DEFAULT 'todo',
    due_date TEXT,
    created_at TEXT NOT NULL
);

-- Indexes for lookups; email uniqueness is checked at creation time and
-- not enforced at the index level
CREATE INDEX IF NOT EXISTS idx_users_email ON users(email);
CREATE INDEX IF NOT EXISTS idx_tasks_status ON tasks(status);
CREATE INDEX IF NOT EXISTS idx_tasks_assignee ON tasks(assignee_id);
"#;

const TASK_COLUMNS: &str =
    "id, title, description, assignee_id, assignee_name, status, due_date, created_at";

/// Database row for User
#[derive(Debug, FromRow)]
struct UserRow {
    id: String,
    name: String,
    email: String,
    created_at: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: parse_id(&row.id),
            name: row.name,
            email: row.email,
            created_at: parse_timestamp(&row.created_at),
        }
    }
}

/// Database row for Task
#[derive(Debug, FromRow)]
struct TaskRow {
    id: String,
    title: String,
    description: String,
    assignee_id: Option<String>,
    assignee_name: Option<String>,
    status: String,
    due_date: Option<String>,
    created_at: String,
}

impl From<TaskRow> for Task {
    fn from(row: TaskRow) -> Self {
        Task {
            id: parse_id(&row.id),
            title: row.title,
            description: row.description,
            assignee_id: row.assignee_id.as_deref().map(parse_id),
            assignee_name: row.assignee_name,
            status: TaskStatus::parse(&row.status).unwrap_or_default(),
            due_date: row.due_date,
            created_at: parse_timestamp(&row.created_at),
        }
    }
}

/// Parses a stored RFC 3339 timestamp back into a structured value.
fn parse_timestamp(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

fn parse_id(s: &str) -> Uuid {
    Uuid::parse_str(s).unwrap_or_else(|_| Uuid::nil())
}

/// SQLite-backed store.
pub struct SqliteTaskStore {
    pool: Pool<Sqlite>,
}

impl SqliteTaskStore {
    /// Opens a connection pool for `database_url` and bootstraps the
    /// schema.
    pub async fn connect(database_url: &str) -> TaskStoreResult<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;

        let store = Self { pool };
        store.init_schema().await?;

        Ok(store)
    }

    /// Opens a single-connection in-memory database, for tests.
    pub async fn in_memory() -> TaskStoreResult<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;

        let store = Self { pool };
        store.init_schema().await?;

        Ok(store)
    }

    async fn init_schema(&self) -> TaskStoreResult<()> {
        sqlx::query(SCHEMA_SQL).execute(&self.pool).await?;
        tracing::debug!("database schema initialized");
        Ok(())
    }
}

#[async_trait]
impl TaskStore for SqliteTaskStore {
    // =========================================================================
    // User operations
    // =========================================================================

    async fn create_user(&self, user: User) -> TaskStoreResult<User> {
        if self.get_user_by_email(&user.email).await?.is_some() {
            return Err(TaskStoreError::conflict("User", "email", user.email.clone()));
        }

        sqlx::query("INSERT INTO users (id, name, email, created_at) VALUES (?, ?, ?, ?)")
            .bind(user.id.to_string())
            .bind(&user.name)
            .bind(&user.email)
            .bind(user.created_at.to_rfc3339())
            .execute(&self.pool)
            .await?;

        Ok(user)
    }

    async fn get_user(&self, id: Uuid) -> TaskStoreResult<Option<User>> {
        let row: Option<UserRow> =
            sqlx::query_as("SELECT id, name, email, created_at FROM users WHERE id = ?")
                .bind(id.to_string())
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(User::from))
    }

    async fn get_user_by_email(&self, email: &str) -> TaskStoreResult<Option<User>> {
        let row: Option<UserRow> =
            sqlx::query_as("SELECT id, name, email, created_at FROM users WHERE email = ? LIMIT 1")
                .bind(email)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(User::from))
    }

    async fn list_users(&self) -> TaskStoreResult<Vec<User>> {
        let sql = format!(
            "SELECT id, name, email, created_at FROM users ORDER BY created_at LIMIT {LIST_CAP}"
        );
        let rows: Vec<UserRow> = sqlx::query_as(&sql).fetch_all(&self.pool).await?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    // =========================================================================
    // Task operations
    // =========================================================================

    async fn create_task(&self, task: Task) -> TaskStoreResult<Task> {
        sqlx::query(
            "INSERT INTO tasks (id, title, description, assignee_id, assignee_name, status, \
             due_date, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(task.id.to_string())
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.assignee_id.map(|id| id.to_string()))
        .bind(&task.assignee_name)
        .bind(task.status.as_str())
        .bind(&task.due_date)
        .bind(task.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(task)
    }

    async fn get_task(&self, id: Uuid) -> TaskStoreResult<Option<Task>> {
        let sql = format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?");
        let row: Option<TaskRow> = sqlx::query_as(&sql)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Task::from))
    }

    async fn list_tasks(&self, filter: TaskFilter) -> TaskStoreResult<Vec<Task>> {
        let mut conditions = Vec::new();
        if filter.status.is_some() {
            conditions.push("status = ?");
        }
        if filter.assignee_id.is_some() {
            conditions.push("assignee_id = ?");
        }
        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conditions.join(" AND "))
        };

        let sql = format!(
            "SELECT {TASK_COLUMNS} FROM tasks{where_clause} ORDER BY created_at LIMIT {LIST_CAP}"
        );

        let mut query = sqlx::query_as::<_, TaskRow>(&sql);
        if let Some(status) = filter.status {
            query = query.bind(status.as_str());
        }
        if let Some(assignee_id) = filter.assignee_id {
            query = query.bind(assignee_id.to_string());
        }

        let rows = query.fetch_all(&self.pool).await?;

        Ok(rows.into_iter().map(Task::from).collect())
    }

    async fn apply_task_patch(&self, id: Uuid, patch: &TaskPatch) -> TaskStoreResult<Task> {
        let mut assignments = Vec::new();
        if patch.title.is_some() {
            assignments.push("title = ?");
        }
        if patch.description.is_some() {
            assignments.push("description = ?");
        }
        if patch.assignee_id.is_some() {
            assignments.push("assignee_id = ?");
        }
        if patch.assignee_name.is_some() {
            assignments.push("assignee_name = ?");
        }
        if patch.status.is_some() {
            assignments.push("status = ?");
        }
        if patch.due_date.is_some() {
            assignments.push("due_date = ?");
        }

        if !assignments.is_empty() {
            let sql = format!("UPDATE tasks SET {} WHERE id = ?", assignments.join(", "));

            let mut query = sqlx::query(&sql);
            if let Some(title) = &patch.title {
                query = query.bind(title);
            }
            if let Some(description) = &patch.description {
                query = query.bind(description);
            }
            if let Some(assignee_id) = patch.assignee_id {
                query = query.bind(assignee_id.map(|id| id.to_string()));
            }
            if let Some(assignee_name) = &patch.assignee_name {
                query = query.bind(assignee_name.clone());
            }
            if let Some(status) = patch.status {
                query = query.bind(status.as_str());
            }
            if let Some(due_date) = &patch.due_date {
                query = query.bind(due_date.clone());
            }

            query.bind(id.to_string()).execute(&self.pool).await?;
        }

        // Reload so the caller sees the true stored state, and so a patch
        // against a missing task still surfaces NotFound.
        self.get_task(id)
            .await?
            .ok_or_else(|| TaskStoreError::not_found("Task", id.to_string()))
    }

    async fn delete_task(&self, id: Uuid) -> TaskStoreResult<()> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(TaskStoreError::not_found("Task", id.to_string()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_user_roundtrip_and_conflict() {
        let store = SqliteTaskStore::in_memory().await.unwrap();

        let user = store
            .create_user(User::new("John Doe", "john@example.com"))
            .await
            .unwrap();

        let fetched = store.get_user(user.id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "John Doe");
        assert_eq!(fetched.created_at, user.created_at);

        let by_email = store
            .get_user_by_email("john@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_email.id, user.id);

        let err = store
            .create_user(User::new("Other Person", "john@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, TaskStoreError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_task_roundtrip() {
        let store = SqliteTaskStore::in_memory().await.unwrap();

        let assignee = Uuid::new_v4();
        let mut task = Task::new("Ship release", "Cut the release").with_due_date("2026-09-01");
        task.assignee_id = Some(assignee);
        task.assignee_name = Some("John Doe".to_string());
        let task = store.create_task(task).await.unwrap();

        let fetched = store.get_task(task.id).await.unwrap().unwrap();
        assert_eq!(fetched.title, "Ship release");
        assert_eq!(fetched.assignee_id, Some(assignee));
        assert_eq!(fetched.assignee_name, Some("John Doe".to_string()));
        assert_eq!(fetched.due_date, Some("2026-09-01".to_string()));
        assert_eq!(fetched.created_at, task.created_at);
    }

    #[tokio::test]
    async fn test_task_patch_merge() {
        let store = SqliteTaskStore::in_memory().await.unwrap();

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

        let err = store
            .apply_task_patch(Uuid::new_v4(), &TaskPatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, TaskStoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_list_tasks_filter_and_delete() {
        let store = SqliteTaskStore::in_memory().await.unwrap();

        let done = Task::new("Task 1", "First").with_status(TaskStatus::Done);
        store.create_task(done).await.unwrap();
        store
            .create_task(Task::new("Task 2", "Second"))
            .await
            .unwrap();

        let by_status = store
            .list_tasks(TaskFilter {
                status: Some(TaskStatus::Done),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(by_status.len(), 1);
        assert_eq!(by_status[0].title, "Task 1");

        let all = store.list_tasks(TaskFilter::default()).await.unwrap();
        assert_eq!(all.len(), 2);

        store.delete_task(all[0].id).await.unwrap();
        let err = store.delete_task(all[0].id).await.unwrap_err();
        assert!(matches!(err, TaskStoreError::NotFound { .. }));
    }
}
