/// Persistence layer
///
/// Handlers talk to a [`Store`] trait object so the same code runs against
/// PostgreSQL in production and an in-memory store in tests and local
/// development.
///
/// # Backends
///
/// - [`PgStore`]: delegates to the model CRUD functions over a `PgPool`
/// - [`MemoryStore`]: maps behind one `RwLock`, one write guard per mutation
///
/// # Guarantees
///
/// Every operation is a single round-trip with no retry. Cascade delete is
/// all-or-nothing in both backends.
///
/// # Example
///
/// ```
/// use taskboard_shared::store::{MemoryStore, Store};
/// use taskboard_shared::models::{CreateProject, CreateUser};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = MemoryStore::new();
/// let user = store.create_user(CreateUser {
///     name: "Ada".to_string(),
///     email: "ada@example.com".to_string(),
///     password_hash: "hash".to_string(),
/// }).await?;
///
/// let project = store.create_project(CreateProject {
///     name: "Launch".to_string(),
///     owner_id: user.id,
/// }).await?;
///
/// assert_eq!(store.list_projects(user.id).await?.len(), 1);
/// # let _ = project;
/// # Ok(())
/// # }
/// ```

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::models::{CreateProject, CreateTask, CreateUser, Project, Task, UpdateTask, User};

/// Error type for store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Email is already registered
    #[error("Email already registered: {0}")]
    DuplicateEmail(String),

    /// Referenced parent row does not exist
    #[error("Referenced {0} does not exist")]
    MissingReference(&'static str),

    /// Underlying database failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Store result type alias
pub type StoreResult<T> = Result<T, StoreError>;

/// Shared, cloneable store handle
pub type SharedStore = Arc<dyn Store>;

/// Outcome of a cascade delete
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CascadeDelete {
    /// Number of tasks removed with the project
    pub tasks_deleted: u64,
}

/// Persistence operations for users, projects and tasks
///
/// Implementations do not perform ownership checks; see
/// [`crate::auth::authorization`].
#[async_trait]
pub trait Store: Send + Sync {
    /// Backend name for health output and logs
    fn backend(&self) -> &'static str;

    /// Verifies the backend is reachable
    async fn ping(&self) -> StoreResult<()>;

    /// Creates a user; fails with `DuplicateEmail` if the normalized email exists
    async fn create_user(&self, data: CreateUser) -> StoreResult<User>;

    /// Finds a user by ID
    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>>;

    /// Finds a user by email (case-insensitive)
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    /// Creates a project
    async fn create_project(&self, data: CreateProject) -> StoreResult<Project>;

    /// Finds a project by ID
    async fn find_project(&self, id: Uuid) -> StoreResult<Option<Project>>;

    /// Lists projects owned by `owner_id`, newest first
    async fn list_projects(&self, owner_id: Uuid) -> StoreResult<Vec<Project>>;

    /// Deletes a project and all its tasks atomically
    ///
    /// Returns None if the project does not exist.
    async fn delete_project(&self, id: Uuid) -> StoreResult<Option<CascadeDelete>>;

    /// Creates a task
    async fn create_task(&self, data: CreateTask) -> StoreResult<Task>;

    /// Finds a task by ID
    async fn find_task(&self, id: Uuid) -> StoreResult<Option<Task>>;

    /// Lists tasks of a project, newest first
    async fn list_tasks(&self, project_id: Uuid) -> StoreResult<Vec<Task>>;

    /// Applies a partial update; None if the task does not exist
    async fn update_task(&self, id: Uuid, data: UpdateTask) -> StoreResult<Option<Task>>;

    /// Deletes a task; false if it did not exist
    async fn delete_task(&self, id: Uuid) -> StoreResult<bool>;
}
