/// Task API contract
///
/// The board depends on [`TaskApi`] rather than on HTTP directly, so it can
/// run against the real server ([`TaskboardClient`]) or a scripted
/// [`MockTaskApi`].
///
/// # Payloads
///
/// [`NewTask`] and [`TaskChanges`] serialize to the request bodies the server
/// expects. In `TaskChanges`, a `None` field is left out of the body, so the
/// server leaves it unchanged; `due_date: Some(None)` sends `null` and clears
/// the date.

mod http;
mod mock;

pub use http::{AuthSession, ClientConfig, HealthStatus, TaskboardClient};
pub use mock::{MockOperation, MockTaskApi};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use taskboard_shared::models::{Task, TaskPriority, TaskStatus, UpdateTask};
use uuid::Uuid;

use crate::error::ClientResult;

/// Task operations the board needs
#[async_trait]
pub trait TaskApi: Send + Sync {
    /// Lists a project's tasks, newest first
    async fn list_tasks(&self, project_id: Uuid) -> ClientResult<Vec<Task>>;

    /// Creates a task and returns the stored copy
    async fn create_task(&self, task: &NewTask) -> ClientResult<Task>;

    /// Applies a partial update and returns the stored copy
    async fn update_task(&self, id: Uuid, changes: &TaskChanges) -> ClientResult<Task>;

    /// Deletes a task
    async fn delete_task(&self, id: Uuid) -> ClientResult<()>;
}

/// Body of a create-task request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub project_id: Uuid,
    pub title: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
}

impl NewTask {
    /// Task with server-side defaults for everything but the title
    pub fn new(project_id: Uuid, title: impl Into<String>) -> Self {
        Self {
            project_id,
            title: title.into(),
            description: None,
            status: None,
            priority: None,
            due_date: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }
}

/// Body of an update-task request
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<Option<DateTime<Utc>>>,
}

impl TaskChanges {
    /// Change that only moves the task to another column
    pub fn status(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }
}

impl From<TaskChanges> for UpdateTask {
    fn from(changes: TaskChanges) -> Self {
        UpdateTask {
            title: changes.title,
            description: changes.description,
            status: changes.status,
            priority: changes.priority,
            due_date: changes.due_date,
        }
    }
}
