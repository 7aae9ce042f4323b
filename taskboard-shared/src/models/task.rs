/// Task model and database operations
///
/// Tasks belong to exactly one project and inherit its owner. The project
/// reference never changes after creation.
///
/// # Status
///
/// ```text
/// todo ⇄ in-progress ⇄ done
///   ⇅__________________⇅
/// ```
///
/// All three states are mutually reachable; there is no sequencing rule.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_status AS ENUM ('todo', 'in-progress', 'done');
/// CREATE TYPE task_priority AS ENUM ('low', 'medium', 'high');
///
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     project_id UUID NOT NULL REFERENCES projects(id),
///     title TEXT NOT NULL CHECK (char_length(title) > 0),
///     description TEXT NOT NULL DEFAULT '',
///     status task_status NOT NULL DEFAULT 'todo',
///     priority task_priority NOT NULL DEFAULT 'medium',
///     due_date TIMESTAMPTZ,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
///
/// CREATE INDEX idx_tasks_project_created ON tasks (project_id, created_at DESC);
/// ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Board column a task sits in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    /// Not started
    #[default]
    Todo,

    /// Being worked on
    InProgress,

    /// Completed
    Done,
}

impl TaskStatus {
    /// All statuses in board column order
    pub const ALL: [TaskStatus; 3] = [TaskStatus::Todo, TaskStatus::InProgress, TaskStatus::Done];

    /// Wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Done => "done",
        }
    }

    /// Column index on the board
    pub fn column_index(&self) -> usize {
        match self {
            TaskStatus::Todo => 0,
            TaskStatus::InProgress => 1,
            TaskStatus::Done => 2,
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = InvalidEnumValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "todo" => Ok(TaskStatus::Todo),
            "in-progress" => Ok(TaskStatus::InProgress),
            "done" => Ok(TaskStatus::Done),
            other => Err(InvalidEnumValue {
                kind: "status",
                value: other.to_string(),
            }),
        }
    }
}

/// Task priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_priority", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl TaskPriority {
    /// Wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskPriority {
    type Err = InvalidEnumValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(TaskPriority::Low),
            "medium" => Ok(TaskPriority::Medium),
            "high" => Ok(TaskPriority::High),
            other => Err(InvalidEnumValue {
                kind: "priority",
                value: other.to_string(),
            }),
        }
    }
}

/// Error for a string outside a fixed enumeration
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid {kind}: {value}")]
pub struct InvalidEnumValue {
    pub kind: &'static str,
    pub value: String,
}

/// Error for an unparseable due date
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid due date: {0}")]
pub struct InvalidDueDate(pub String);

/// Parses a due date
///
/// Accepts an RFC 3339 timestamp or a plain `YYYY-MM-DD` date, which is taken
/// as midnight UTC.
pub fn parse_due_date(value: &str) -> Result<DateTime<Utc>, InvalidDueDate> {
    let value = value.trim();

    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Ok(ts.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| InvalidDueDate(value.to_string()))
}

/// Task on a project board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique task ID
    pub id: Uuid,

    /// Parent project (immutable)
    pub project_id: Uuid,

    /// Task title (never empty)
    pub title: String,

    /// Free-form description, empty when not given
    pub description: String,

    /// Board column
    pub status: TaskStatus,

    /// Priority
    pub priority: TaskPriority,

    /// Optional due date
    pub due_date: Option<DateTime<Utc>>,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a task
///
/// Defaults are applied by the caller building this struct.
#[derive(Debug, Clone)]
pub struct CreateTask {
    pub project_id: Uuid,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub due_date: Option<DateTime<Utc>>,
}

impl CreateTask {
    /// Creates input with default description, status, priority and due date
    pub fn new(project_id: Uuid, title: impl Into<String>) -> Self {
        Self {
            project_id,
            title: title.into(),
            description: String::new(),
            status: TaskStatus::default(),
            priority: TaskPriority::default(),
            due_date: None,
        }
    }
}

/// Partial task update
///
/// `None` leaves a field unchanged. `due_date: Some(None)` clears the due
/// date. The project reference is not updatable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateTask {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub due_date: Option<Option<DateTime<Utc>>>,
}

impl UpdateTask {
    /// Update that only changes the status
    pub fn status(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    /// Returns true if no field would change
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.priority.is_none()
            && self.due_date.is_none()
    }

    /// Applies the present fields to `task` and bumps `updated_at`
    pub fn apply_to(self, task: &mut Task) {
        if let Some(title) = self.title {
            task.title = title;
        }
        if let Some(description) = self.description {
            task.description = description;
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(due_date) = self.due_date {
            task.due_date = due_date;
        }
        task.updated_at = Utc::now();
    }
}

const TASK_COLUMNS: &str =
    "id, project_id, title, description, status, priority, due_date, created_at, updated_at";

impl Task {
    /// Creates a new task
    pub async fn create(pool: &PgPool, data: CreateTask) -> Result<Self, sqlx::Error> {
        let query = format!(
            r#"
            INSERT INTO tasks (project_id, title, description, status, priority, due_date)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {TASK_COLUMNS}
            "#
        );

        let task = sqlx::query_as::<_, Task>(&query)
            .bind(data.project_id)
            .bind(data.title)
            .bind(data.description)
            .bind(data.status)
            .bind(data.priority)
            .bind(data.due_date)
            .fetch_one(pool)
            .await?;

        Ok(task)
    }

    /// Finds a task by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let query = format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1");

        let task = sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(task)
    }

    /// Lists the tasks of a project, newest first
    pub async fn list_by_project(pool: &PgPool, project_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let query = format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE project_id = $1 ORDER BY created_at DESC, id DESC"
        );

        let tasks = sqlx::query_as::<_, Task>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await?;

        Ok(tasks)
    }

    /// Applies a partial update
    ///
    /// Only fields present in `data` are written. The `updated_at` timestamp
    /// is always refreshed.
    ///
    /// # Returns
    ///
    /// The updated task, or None if it doesn't exist
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        // Build dynamic update query based on which fields are present
        let mut query = String::from("UPDATE tasks SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.title.is_some() {
            bind_count += 1;
            query.push_str(&format!(", title = ${}", bind_count));
        }
        if data.description.is_some() {
            bind_count += 1;
            query.push_str(&format!(", description = ${}", bind_count));
        }
        if data.status.is_some() {
            bind_count += 1;
            query.push_str(&format!(", status = ${}", bind_count));
        }
        if data.priority.is_some() {
            bind_count += 1;
            query.push_str(&format!(", priority = ${}", bind_count));
        }
        if data.due_date.is_some() {
            bind_count += 1;
            query.push_str(&format!(", due_date = ${}", bind_count));
        }

        query.push_str(&format!(" WHERE id = $1 RETURNING {TASK_COLUMNS}"));

        let mut q = sqlx::query_as::<_, Task>(&query).bind(id);

        if let Some(title) = data.title {
            q = q.bind(title);
        }
        if let Some(description) = data.description {
            q = q.bind(description);
        }
        if let Some(status) = data.status {
            q = q.bind(status);
        }
        if let Some(priority) = data.priority {
            q = q.bind(priority);
        }
        if let Some(due_date) = data.due_date {
            q = q.bind(due_date);
        }

        q.fetch_optional(pool).await
    }

    /// Deletes a task
    ///
    /// # Returns
    ///
    /// True if a row was removed
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_task() -> Task {
        Task {
            id: Uuid::new_v4(),
            project_id: Uuid::new_v4(),
            title: "Write brief".to_string(),
            description: "first draft".to_string(),
            status: TaskStatus::Todo,
            priority: TaskPriority::High,
            due_date: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_status_wire_names() {
        assert_eq!(serde_json::to_value(TaskStatus::InProgress).unwrap(), "in-progress");
        assert_eq!(serde_json::to_value(TaskStatus::Todo).unwrap(), "todo");
        assert_eq!(
            serde_json::from_value::<TaskStatus>(serde_json::json!("done")).unwrap(),
            TaskStatus::Done
        );
        assert!(serde_json::from_value::<TaskStatus>(serde_json::json!("in_progress")).is_err());
    }

    #[test]
    fn test_status_from_str() {
        for status in TaskStatus::ALL {
            assert_eq!(status.as_str().parse::<TaskStatus>().unwrap(), status);
        }

        let err = "completed".parse::<TaskStatus>().unwrap_err();
        assert_eq!(err.kind, "status");
        assert_eq!(err.to_string(), "Invalid status: completed");
    }

    #[test]
    fn test_priority_from_str() {
        assert_eq!("low".parse::<TaskPriority>().unwrap(), TaskPriority::Low);
        assert_eq!("high".parse::<TaskPriority>().unwrap(), TaskPriority::High);
        assert!("urgent".parse::<TaskPriority>().is_err());
        assert!("High".parse::<TaskPriority>().is_err());
    }

    #[test]
    fn test_defaults() {
        let input = CreateTask::new(Uuid::new_v4(), "Ship it");
        assert_eq!(input.status, TaskStatus::Todo);
        assert_eq!(input.priority, TaskPriority::Medium);
        assert_eq!(input.description, "");
        assert!(input.due_date.is_none());
    }

    #[test]
    fn test_column_order() {
        let indexes: Vec<usize> = TaskStatus::ALL.iter().map(|s| s.column_index()).collect();
        assert_eq!(indexes, vec![0, 1, 2]);
    }

    #[test]
    fn test_parse_due_date() {
        let date = parse_due_date("2026-03-01").unwrap();
        assert_eq!(date.to_rfc3339(), "2026-03-01T00:00:00+00:00");

        let ts = parse_due_date("2026-03-01T12:30:00+02:00").unwrap();
        assert_eq!(ts.to_rfc3339(), "2026-03-01T10:30:00+00:00");

        assert!(parse_due_date("next tuesday").is_err());
        assert!(parse_due_date("2026-13-01").is_err());
    }

    #[test]
    fn test_update_only_status() {
        let mut task = sample_task();
        let before = task.clone();

        UpdateTask::status(TaskStatus::Done).apply_to(&mut task);

        assert_eq!(task.status, TaskStatus::Done);
        assert_eq!(task.title, before.title);
        assert_eq!(task.description, before.description);
        assert_eq!(task.priority, before.priority);
        assert_eq!(task.due_date, before.due_date);
        assert_eq!(task.project_id, before.project_id);
    }

    #[test]
    fn test_update_clears_due_date() {
        let mut task = sample_task();
        task.due_date = Some(Utc::now());

        UpdateTask {
            due_date: Some(None),
            ..Default::default()
        }
        .apply_to(&mut task);

        assert!(task.due_date.is_none());
    }

    #[test]
    fn test_update_is_empty() {
        assert!(UpdateTask::default().is_empty());
        assert!(!UpdateTask::status(TaskStatus::Done).is_empty());
        assert!(!UpdateTask {
            due_date: Some(None),
            ..Default::default()
        }
        .is_empty());
    }

    #[test]
    fn test_task_serializes_camel_case() {
        let task = sample_task();
        let json = serde_json::to_value(&task).unwrap();

        assert_eq!(json["status"], "todo");
        assert_eq!(json["priority"], "high");
        assert!(json["dueDate"].is_null());
        assert!(json.get("projectId").is_some());
    }
}
