/// In-memory store
///
/// All collections live behind one `RwLock`, so each mutation (including the
/// project cascade) happens under a single write guard and is atomic with
/// respect to every other operation.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{CascadeDelete, Store, StoreError, StoreResult};
use crate::models::{
    user::normalize_email, CreateProject, CreateTask, CreateUser, Project, Task, UpdateTask, User,
};

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    projects: HashMap<Uuid, Project>,
    tasks: HashMap<Uuid, Task>,
    // Insertion sequence, used to break created_at ties
    seq: HashMap<Uuid, u64>,
    next_seq: u64,
}

impl Tables {
    fn stamp(&mut self, id: Uuid) {
        self.next_seq += 1;
        self.seq.insert(id, self.next_seq);
    }

    fn seq_of(&self, id: &Uuid) -> u64 {
        self.seq.get(id).copied().unwrap_or(0)
    }
}

/// Store kept entirely in process memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn create_user(&self, data: CreateUser) -> StoreResult<User> {
        let email = normalize_email(&data.email);
        let mut tables = self.tables.write().await;

        if tables.users.values().any(|u| u.email == email) {
            return Err(StoreError::DuplicateEmail(email));
        }

        let user = User {
            id: Uuid::new_v4(),
            name: data.name.trim().to_string(),
            email,
            password_hash: data.password_hash,
            created_at: Utc::now(),
        };
        tables.stamp(user.id);
        tables.users.insert(user.id, user.clone());

        Ok(user)
    }

    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let email = normalize_email(email);
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn create_project(&self, data: CreateProject) -> StoreResult<Project> {
        let mut tables = self.tables.write().await;

        if !tables.users.contains_key(&data.owner_id) {
            return Err(StoreError::MissingReference("user"));
        }

        let now = Utc::now();
        let project = Project {
            id: Uuid::new_v4(),
            name: data.name,
            owner_id: data.owner_id,
            created_at: now,
            updated_at: now,
        };
        tables.stamp(project.id);
        tables.projects.insert(project.id, project.clone());

        Ok(project)
    }

    async fn find_project(&self, id: Uuid) -> StoreResult<Option<Project>> {
        Ok(self.tables.read().await.projects.get(&id).cloned())
    }

    async fn list_projects(&self, owner_id: Uuid) -> StoreResult<Vec<Project>> {
        let tables = self.tables.read().await;
        let mut projects: Vec<Project> = tables
            .projects
            .values()
            .filter(|p| p.owner_id == owner_id)
            .cloned()
            .collect();

        projects.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| tables.seq_of(&b.id).cmp(&tables.seq_of(&a.id)))
        });

        Ok(projects)
    }

    async fn delete_project(&self, id: Uuid) -> StoreResult<Option<CascadeDelete>> {
        let mut tables = self.tables.write().await;

        if tables.projects.remove(&id).is_none() {
            return Ok(None);
        }

        let doomed: Vec<Uuid> = tables
            .tasks
            .values()
            .filter(|task| task.project_id == id)
            .map(|task| task.id)
            .collect();

        for task_id in &doomed {
            tables.tasks.remove(task_id);
            tables.seq.remove(task_id);
        }
        tables.seq.remove(&id);

        Ok(Some(CascadeDelete {
            tasks_deleted: doomed.len() as u64,
        }))
    }

    async fn create_task(&self, data: CreateTask) -> StoreResult<Task> {
        let mut tables = self.tables.write().await;

        if !tables.projects.contains_key(&data.project_id) {
            return Err(StoreError::MissingReference("project"));
        }

        let now = Utc::now();
        let task = Task {
            id: Uuid::new_v4(),
            project_id: data.project_id,
            title: data.title,
            description: data.description,
            status: data.status,
            priority: data.priority,
            due_date: data.due_date,
            created_at: now,
            updated_at: now,
        };
        tables.stamp(task.id);
        tables.tasks.insert(task.id, task.clone());

        Ok(task)
    }

    async fn find_task(&self, id: Uuid) -> StoreResult<Option<Task>> {
        Ok(self.tables.read().await.tasks.get(&id).cloned())
    }

    async fn list_tasks(&self, project_id: Uuid) -> StoreResult<Vec<Task>> {
        let tables = self.tables.read().await;
        let mut tasks: Vec<Task> = tables
            .tasks
            .values()
            .filter(|t| t.project_id == project_id)
            .cloned()
            .collect();

        tasks.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| tables.seq_of(&b.id).cmp(&tables.seq_of(&a.id)))
        });

        Ok(tasks)
    }

    async fn update_task(&self, id: Uuid, data: UpdateTask) -> StoreResult<Option<Task>> {
        let mut tables = self.tables.write().await;

        Ok(tables.tasks.get_mut(&id).map(|task| {
            data.apply_to(task);
            task.clone()
        }))
    }

    async fn delete_task(&self, id: Uuid) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        tables.seq.remove(&id);
        Ok(tables.tasks.remove(&id).is_some())
    }
}
