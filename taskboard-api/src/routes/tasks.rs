/// Task endpoints
///
/// A task is accessible to whoever owns its project. The project is always
/// resolved from the stored task, never from the request body.
///
/// - `GET    {base}/tasks/projects/:project_id/tasks` - List a project's tasks
/// - `POST   {base}/tasks` - Create a task
/// - `PUT    {base}/tasks/:id` - Partially update a task
/// - `DELETE {base}/tasks/:id` - Delete a task
///
/// # Update semantics
///
/// | Body field | Missing | `null` | Value |
/// |---|---|---|---|
/// | `title` | unchanged | 400 | trimmed, must be non-empty |
/// | `description` | unchanged | set to `""` | set |
/// | `status` / `priority` | unchanged | 400 | must be a known value |
/// | `dueDate` | unchanged | cleared | RFC 3339 or `YYYY-MM-DD`; `""` clears |
/// | `projectId` | ignored | ignored | ignored |

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::ValidatedJson,
    routes::{parse_id, MessageResponse},
    validation::{double_option, FieldErrors},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use taskboard_shared::{
    auth::{
        authorization::{load_owned_project, load_owned_task},
        middleware::AuthContext,
    },
    models::{CreateTask, Task, UpdateTask},
};
use tracing::info;
use validator::{Validate, ValidationErrors};

const TASK_NOT_FOUND: &str = "Task not found";
const PROJECT_NOT_FOUND: &str = "Project not found";

/// Create task request
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    pub project_id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub due_date: Option<String>,
}

impl CreateTaskRequest {
    /// Validates every field and builds the store input
    ///
    /// All problems are reported together.
    pub fn parse(&self) -> Result<CreateTask, ValidationErrors> {
        let mut errors = FieldErrors::new();

        let project_id = errors.uuid("projectId", "Project ID", self.project_id.as_deref());
        let title = errors.required_text("title", "Title", self.title.as_deref());
        let status = self.status.as_deref().and_then(|s| errors.status(s));
        let priority = self.priority.as_deref().and_then(|p| errors.priority(p));
        let due_date = match self.due_date.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => errors.due_date(raw),
        };

        let (Some(project_id), Some(title)) = (project_id, title) else {
            return Err(errors.into_errors());
        };
        errors.finish()?;

        Ok(CreateTask {
            project_id,
            title,
            description: self.description.clone().unwrap_or_default(),
            status: status.unwrap_or_default(),
            priority: priority.unwrap_or_default(),
            due_date,
        })
    }
}

impl Validate for CreateTaskRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        self.parse().map(|_| ())
    }
}

/// Update task request
///
/// Fields use `Option<Option<_>>`: outer `None` is a missing field, inner
/// `None` an explicit `null`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    #[serde(default, deserialize_with = "double_option")]
    pub title: Option<Option<String>>,

    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,

    #[serde(default, deserialize_with = "double_option")]
    pub status: Option<Option<String>>,

    #[serde(default, deserialize_with = "double_option")]
    pub priority: Option<Option<String>>,

    #[serde(default, deserialize_with = "double_option")]
    pub due_date: Option<Option<String>>,
}

impl UpdateTaskRequest {
    /// Validates the present fields and builds the partial update
    pub fn parse(&self) -> Result<UpdateTask, ValidationErrors> {
        let mut errors = FieldErrors::new();
        let mut update = UpdateTask::default();

        if let Some(title) = &self.title {
            update.title = errors.required_text("title", "Title", title.as_deref());
        }

        if let Some(description) = &self.description {
            update.description = Some(description.clone().unwrap_or_default());
        }

        match &self.status {
            None => {}
            Some(None) => errors.add("status", "null", "Status cannot be null"),
            Some(Some(status)) => update.status = errors.status(status),
        }

        match &self.priority {
            None => {}
            Some(None) => errors.add("priority", "null", "Priority cannot be null"),
            Some(Some(priority)) => update.priority = errors.priority(priority),
        }

        match self.due_date.as_ref().map(|d| d.as_deref().map(str::trim)) {
            None => {}
            Some(None) | Some(Some("")) => update.due_date = Some(None),
            Some(Some(raw)) => {
                if let Some(date) = errors.due_date(raw) {
                    update.due_date = Some(Some(date));
                }
            }
        }

        errors.finish()?;
        Ok(update)
    }
}

impl Validate for UpdateTaskRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        self.parse().map(|_| ())
    }
}

pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(project_id): Path<String>,
) -> ApiResult<Json<Vec<Task>>> {
    let project_id = parse_id(&project_id, PROJECT_NOT_FOUND)?;
    let project = load_owned_project(state.store.as_ref(), &auth, project_id).await?;

    let tasks = state.store.list_tasks(project.id).await?;
    Ok(Json(tasks))
}

pub async fn create_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ValidatedJson(req): ValidatedJson<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    let data = req.parse()?;

    let project = load_owned_project(state.store.as_ref(), &auth, data.project_id).await?;
    let task = state.store.create_task(data).await?;

    info!(task_id = %task.id, project_id = %project.id, "Task created");

    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn update_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateTaskRequest>,
) -> ApiResult<Json<Task>> {
    let id = parse_id(&id, TASK_NOT_FOUND)?;
    let changes = req.parse()?;

    let (task, _project) = load_owned_task(state.store.as_ref(), &auth, id).await?;

    let updated = state
        .store
        .update_task(task.id, changes)
        .await?
        .ok_or_else(|| ApiError::NotFound(TASK_NOT_FOUND.to_string()))?;

    tracing::debug!(task_id = %updated.id, status = %updated.status, "Task updated");

    Ok(Json(updated))
}

pub async fn delete_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let id = parse_id(&id, TASK_NOT_FOUND)?;
    let (task, _project) = load_owned_task(state.store.as_ref(), &auth, id).await?;

    if !state.store.delete_task(task.id).await? {
        return Err(ApiError::NotFound(TASK_NOT_FOUND.to_string()));
    }

    info!(task_id = %task.id, "Task deleted");

    Ok(Json(MessageResponse::new("Task deleted successfully")))
}
