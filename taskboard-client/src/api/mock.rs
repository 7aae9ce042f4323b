/// Scripted in-process [`TaskApi`]
///
/// Keeps a server-side task list in memory and answers like the real API.
/// Any operation can be scripted to fail until it is recovered, which is how
/// the board's reconciliation paths are exercised without a server.
///
/// # Example
///
/// ```
/// use taskboard_client::api::{MockOperation, MockTaskApi, TaskApi, TaskChanges};
/// use taskboard_shared::models::TaskStatus;
/// use uuid::Uuid;
///
/// # async fn example() {
/// let project_id = Uuid::new_v4();
/// let task = MockTaskApi::sample_task(project_id, "Write copy", TaskStatus::Todo);
/// let api = MockTaskApi::with_tasks(vec![task.clone()]);
///
/// api.fail(MockOperation::Update).await;
/// assert!(api.update_task(task.id, &TaskChanges::status(TaskStatus::Done)).await.is_err());
/// # }
/// ```

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashSet;
use taskboard_shared::models::{Task, TaskPriority, TaskStatus, UpdateTask};
use tokio::sync::Mutex;
use uuid::Uuid;

use super::{NewTask, TaskApi, TaskChanges};
use crate::error::{ClientError, ClientResult};

/// Operation of the [`TaskApi`] trait
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MockOperation {
    List,
    Create,
    Update,
    Delete,
}

#[derive(Debug, Default)]
struct MockState {
    tasks: Vec<Task>,
    failing: HashSet<MockOperation>,
    calls: Vec<MockOperation>,
}

/// In-memory task API with scripted failures
#[derive(Debug, Default)]
pub struct MockTaskApi {
    state: Mutex<MockState>,
}

impl MockTaskApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts with `tasks` on the server, in list order
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        Self {
            state: Mutex::new(MockState {
                tasks,
                ..Default::default()
            }),
        }
    }

    /// Builds a task with defaults for the unspecified fields
    pub fn sample_task(project_id: Uuid, title: &str, status: TaskStatus) -> Task {
        let now = Utc::now();
        Task {
            id: Uuid::new_v4(),
            project_id,
            title: title.to_string(),
            description: String::new(),
            status,
            priority: TaskPriority::default(),
            due_date: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Makes every later call of `operation` fail with a 500
    pub async fn fail(&self, operation: MockOperation) {
        self.state.lock().await.failing.insert(operation);
    }

    /// Undoes [`MockTaskApi::fail`]
    pub async fn recover(&self, operation: MockOperation) {
        self.state.lock().await.failing.remove(&operation);
    }

    /// Current server-side tasks
    pub async fn server_tasks(&self) -> Vec<Task> {
        self.state.lock().await.tasks.clone()
    }

    /// Operations called so far, in order
    pub async fn calls(&self) -> Vec<MockOperation> {
        self.state.lock().await.calls.clone()
    }

    /// Changes a task behind the client's back
    pub async fn set_server_status(&self, id: Uuid, status: TaskStatus) {
        let mut state = self.state.lock().await;
        if let Some(task) = state.tasks.iter_mut().find(|t| t.id == id) {
            UpdateTask::status(status).apply_to(task);
        }
    }

    /// Deletes a task behind the client's back
    pub async fn remove_on_server(&self, id: Uuid) {
        self.state.lock().await.tasks.retain(|t| t.id != id);
    }

    fn record(state: &mut MockState, operation: MockOperation) -> ClientResult<()> {
        state.calls.push(operation);

        if state.failing.contains(&operation) {
            return Err(ClientError::Api {
                status: 500,
                code: "internal_error".to_string(),
                message: format!("Scripted {:?} failure", operation),
            });
        }

        Ok(())
    }
}

fn task_not_found() -> ClientError {
    ClientError::Api {
        status: 404,
        code: "not_found".to_string(),
        message: "Task not found".to_string(),
    }
}

#[async_trait]
impl TaskApi for MockTaskApi {
    async fn list_tasks(&self, project_id: Uuid) -> ClientResult<Vec<Task>> {
        let mut state = self.state.lock().await;
        Self::record(&mut state, MockOperation::List)?;

        Ok(state
            .tasks
            .iter()
            .filter(|t| t.project_id == project_id)
            .cloned()
            .collect())
    }

    async fn create_task(&self, new: &NewTask) -> ClientResult<Task> {
        let mut state = self.state.lock().await;
        Self::record(&mut state, MockOperation::Create)?;

        let mut task = Self::sample_task(new.project_id, &new.title, new.status.unwrap_or_default());
        task.description = new.description.clone().unwrap_or_default();
        task.priority = new.priority.unwrap_or_default();
        task.due_date = new.due_date;

        state.tasks.insert(0, task.clone());
        Ok(task)
    }

    async fn update_task(&self, id: Uuid, changes: &TaskChanges) -> ClientResult<Task> {
        let mut state = self.state.lock().await;
        Self::record(&mut state, MockOperation::Update)?;

        let task = state
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(task_not_found)?;

        UpdateTask::from(changes.clone()).apply_to(task);
        Ok(task.clone())
    }

    async fn delete_task(&self, id: Uuid) -> ClientResult<()> {
        let mut state = self.state.lock().await;
        Self::record(&mut state, MockOperation::Delete)?;

        let before = state.tasks.len();
        state.tasks.retain(|t| t.id != id);

        if state.tasks.len() == before {
            return Err(task_not_found());
        }
        Ok(())
    }
}
