/// Data models for Taskboard
///
/// Each model carries its PostgreSQL CRUD operations; the in-memory backend in
/// [`crate::store`] mirrors the same semantics.
///
/// # Models
///
/// - `user`: Accounts and credentials
/// - `project`: Projects, each owned by one user
/// - `task`: Tasks, each belonging to one project
///
/// # Relationships
///
/// ```text
/// User 1──* Project 1──* Task
/// ```

pub mod project;
pub mod task;
pub mod user;

pub use project::{CreateProject, Project};
pub use task::{CreateTask, Task, TaskPriority, TaskStatus, UpdateTask};
pub use user::{CreateUser, User, UserProfile};
