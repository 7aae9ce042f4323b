/// Project endpoints
///
/// Every route requires a valid access token. A project is visible only to
/// its owner; see `taskboard_shared::auth::authorization`.
///
/// - `GET    {base}/projects` - List the caller's projects, newest first
/// - `POST   {base}/projects` - Create a project
/// - `GET    {base}/projects/:id` - Fetch one project
/// - `DELETE {base}/projects/:id` - Delete a project and all its tasks

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::ValidatedJson,
    routes::{parse_id, MessageResponse},
    validation::trimmed,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use taskboard_shared::{
    auth::{authorization::load_owned_project, middleware::AuthContext},
    models::{CreateProject, Project},
};
use tracing::info;
use validator::Validate;

const PROJECT_NOT_FOUND: &str = "Project not found";

/// Create project request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProjectRequest {
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(length(min = 1, message = "Project name is required"))]
    pub name: String,
}

pub async fn list_projects(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<Project>>> {
    let projects = state.store.list_projects(auth.user_id).await?;
    Ok(Json(projects))
}

pub async fn create_project(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ValidatedJson(req): ValidatedJson<CreateProjectRequest>,
) -> ApiResult<(StatusCode, Json<Project>)> {
    let project = state
        .store
        .create_project(CreateProject {
            name: req.name,
            owner_id: auth.user_id,
        })
        .await?;

    info!(project_id = %project.id, user_id = %auth.user_id, "Project created");

    Ok((StatusCode::CREATED, Json(project)))
}

pub async fn get_project(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
) -> ApiResult<Json<Project>> {
    let id = parse_id(&id, PROJECT_NOT_FOUND)?;
    let project = load_owned_project(state.store.as_ref(), &auth, id).await?;
    Ok(Json(project))
}

/// Deletes a project together with its tasks
///
/// Both go in one transaction; if the project vanished in between, the
/// result is 404 and nothing is removed.
pub async fn delete_project(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let id = parse_id(&id, PROJECT_NOT_FOUND)?;
    let project = load_owned_project(state.store.as_ref(), &auth, id).await?;

    let deleted = state
        .store
        .delete_project(project.id)
        .await?
        .ok_or_else(|| ApiError::NotFound(PROJECT_NOT_FOUND.to_string()))?;

    info!(
        project_id = %project.id,
        tasks_deleted = deleted.tasks_deleted,
        "Project deleted"
    );

    Ok(Json(MessageResponse::new("Project deleted successfully")))
}
