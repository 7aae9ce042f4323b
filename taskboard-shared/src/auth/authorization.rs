/// Ownership-based authorization
///
/// There is one rule: the caller must be the owner of the project, and a task
/// is owned by whoever owns its parent project. Every handler goes through the
/// functions here instead of comparing IDs itself.
///
/// # Check order
///
/// 1. Load the referenced project (or task). Missing → `*NotFound`.
/// 2. For a task, load its parent project from the stored `project_id`,
///    never from client input. Missing parent → `NotAuthorized`.
/// 3. Compare owner with the caller. Mismatch → `NotAuthorized`.
///
/// # Example
///
/// ```no_run
/// use taskboard_shared::auth::authorization::load_owned_project;
/// use taskboard_shared::auth::middleware::AuthContext;
/// use taskboard_shared::store::Store;
/// use uuid::Uuid;
///
/// # async fn example(store: &dyn Store, auth: AuthContext, id: Uuid) -> Result<(), Box<dyn std::error::Error>> {
/// let project = load_owned_project(store, &auth, id).await?;
/// println!("{} belongs to the caller", project.name);
/// # Ok(())
/// # }
/// ```

use uuid::Uuid;

use super::middleware::AuthContext;
use crate::models::{Project, Task};
use crate::store::{Store, StoreError};

/// Error type for authorization checks
#[derive(Debug, thiserror::Error)]
pub enum AuthzError {
    /// Project does not exist
    #[error("Project not found")]
    ProjectNotFound,

    /// Task does not exist
    #[error("Task not found")]
    TaskNotFound,

    /// Caller does not own the resource
    #[error("Not authorized")]
    NotAuthorized,

    /// Store lookup failed
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// A resource subject to the ownership rule
#[derive(Debug, Clone, Copy)]
pub enum Resource<'a> {
    /// A project, owned directly
    Project(&'a Project),

    /// A task together with its parent project, if it could be loaded
    Task {
        task: &'a Task,
        parent: Option<&'a Project>,
    },
}

/// Decides whether `auth` may access `resource`
pub fn authorize(auth: &AuthContext, resource: Resource<'_>) -> Result<(), AuthzError> {
    let project = match resource {
        Resource::Project(project) => project,
        Resource::Task { task, parent } => match parent {
            Some(project) if project.id == task.project_id => project,
            _ => return Err(AuthzError::NotAuthorized),
        },
    };

    if !project.is_owned_by(auth.user_id) {
        return Err(AuthzError::NotAuthorized);
    }

    Ok(())
}

/// Loads a project and checks the caller owns it
pub async fn load_owned_project(
    store: &dyn Store,
    auth: &AuthContext,
    project_id: Uuid,
) -> Result<Project, AuthzError> {
    let project = store
        .find_project(project_id)
        .await?
        .ok_or(AuthzError::ProjectNotFound)?;

    authorize(auth, Resource::Project(&project))?;

    Ok(project)
}

/// Loads a task and its parent project and checks the caller owns them
pub async fn load_owned_task(
    store: &dyn Store,
    auth: &AuthContext,
    task_id: Uuid,
) -> Result<(Task, Project), AuthzError> {
    let task = store
        .find_task(task_id)
        .await?
        .ok_or(AuthzError::TaskNotFound)?;

    let parent = store.find_project(task.project_id).await?;

    authorize(
        auth,
        Resource::Task {
            task: &task,
            parent: parent.as_ref(),
        },
    )?;

    match parent {
        Some(project) => Ok((task, project)),
        None => Err(AuthzError::NotAuthorized),
    }
}
