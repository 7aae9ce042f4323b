/// PostgreSQL store backed by the model CRUD functions

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{CascadeDelete, Store, StoreError, StoreResult};
use crate::db::pool::health_check;
use crate::models::{
    user::normalize_email, CreateProject, CreateTask, CreateUser, Project, Task, UpdateTask, User,
};

/// Store over a PostgreSQL connection pool
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Wraps an existing pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Underlying pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Maps constraint violations to domain errors
fn map_db_error(err: sqlx::Error, email: Option<&str>, referenced: &'static str) -> StoreError {
    if let sqlx::Error::Database(ref db_err) = err {
        if db_err.is_unique_violation() {
            if let Some(email) = email {
                return StoreError::DuplicateEmail(email.to_string());
            }
        }
        if db_err.is_foreign_key_violation() {
            return StoreError::MissingReference(referenced);
        }
    }
    StoreError::Database(err)
}

#[async_trait]
impl Store for PgStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn ping(&self) -> StoreResult<()> {
        health_check(&self.pool).await?;
        Ok(())
    }

    async fn create_user(&self, data: CreateUser) -> StoreResult<User> {
        let email = normalize_email(&data.email);
        User::create(&self.pool, data)
            .await
            .map_err(|e| map_db_error(e, Some(&email), "user"))
    }

    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(User::find_by_id(&self.pool, id).await?)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(User::find_by_email(&self.pool, email).await?)
    }

    async fn create_project(&self, data: CreateProject) -> StoreResult<Project> {
        Project::create(&self.pool, data)
            .await
            .map_err(|e| map_db_error(e, None, "user"))
    }

    async fn find_project(&self, id: Uuid) -> StoreResult<Option<Project>> {
        Ok(Project::find_by_id(&self.pool, id).await?)
    }

    async fn list_projects(&self, owner_id: Uuid) -> StoreResult<Vec<Project>> {
        Ok(Project::list_by_owner(&self.pool, owner_id).await?)
    }

    async fn delete_project(&self, id: Uuid) -> StoreResult<Option<CascadeDelete>> {
        let deleted = Project::delete_cascade(&self.pool, id).await?;
        Ok(deleted.map(|tasks_deleted| CascadeDelete { tasks_deleted }))
    }

    async fn create_task(&self, data: CreateTask) -> StoreResult<Task> {
        Task::create(&self.pool, data)
            .await
            .map_err(|e| map_db_error(e, None, "project"))
    }

    async fn find_task(&self, id: Uuid) -> StoreResult<Option<Task>> {
        Ok(Task::find_by_id(&self.pool, id).await?)
    }

    async fn list_tasks(&self, project_id: Uuid) -> StoreResult<Vec<Task>> {
        Ok(Task::list_by_project(&self.pool, project_id).await?)
    }

    async fn update_task(&self, id: Uuid, data: UpdateTask) -> StoreResult<Option<Task>> {
        Ok(Task::update(&self.pool, id, data).await?)
    }

    async fn delete_task(&self, id: Uuid) -> StoreResult<bool> {
        Ok(Task::delete(&self.pool, id).await?)
    }
}
