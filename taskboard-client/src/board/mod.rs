/// Kanban board for one project
///
/// [`Board`] drives a [`BoardState`] through a [`TaskApi`]:
///
/// - Moves across columns are optimistic. The task moves locally at once; if
///   the server rejects the update the board re-fetches and adopts the
///   server's list. If that re-fetch fails too, the single move is rolled
///   back.
/// - Create, edit and delete are pessimistic. Local state changes only after
///   the server confirms.
/// - Reordering inside a column is local only.
///
/// The state sits behind a `tokio::sync::Mutex` that is released before
/// every network call, so moves may run concurrently. A re-fetch after a
/// failure bumps the epoch, which makes any success still in flight stale.
/// Rollbacks are tracked per task and leave sibling moves alone.
///
/// Failures are returned to the caller and also kept in
/// [`Board::last_error`] for display.

mod state;

pub use state::{BoardState, Columns, PendingMove};

use taskboard_shared::models::{Task, TaskStatus};
use tokio::sync::Mutex;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::api::{NewTask, TaskApi, TaskChanges};
use crate::error::{ClientError, ClientResult};

/// Position of a card on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragLocation {
    pub status: TaskStatus,
    pub index: usize,
}

/// Outcome of a drag gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragResult {
    pub task_id: Uuid,
    pub source: DragLocation,

    /// `None` when the card was dropped outside every column
    pub destination: Option<DragLocation>,
}

#[derive(Debug, Default)]
struct Inner {
    state: BoardState,
    last_error: Option<String>,
}

/// Board for one project over a task API
pub struct Board<A: TaskApi> {
    api: A,
    project_id: Uuid,
    inner: Mutex<Inner>,
}

impl<A: TaskApi> Board<A> {
    /// Creates an empty board; call [`Board::load`] to fill it
    pub fn new(api: A, project_id: Uuid) -> Self {
        Self {
            api,
            project_id,
            inner: Mutex::new(Inner::default()),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn project_id(&self) -> Uuid {
        self.project_id
    }

    /// Copy of the current state
    pub async fn snapshot(&self) -> BoardState {
        self.inner.lock().await.state.clone()
    }

    pub async fn columns(&self) -> Columns {
        self.inner.lock().await.state.columns()
    }

    pub async fn tasks(&self) -> Vec<Task> {
        self.inner.lock().await.state.tasks().to_vec()
    }

    /// Message of the most recent failure
    pub async fn last_error(&self) -> Option<String> {
        self.inner.lock().await.last_error.clone()
    }

    pub async fn clear_error(&self) {
        self.inner.lock().await.last_error = None;
    }

    /// Replaces local state with the server's task list
    pub async fn load(&self) -> ClientResult<()> {
        match self.api.list_tasks(self.project_id).await {
            Ok(tasks) => {
                let mut inner = self.inner.lock().await;
                inner.state.reset_to_server(tasks);
                inner.last_error = None;
                Ok(())
            }
            Err(e) => {
                self.record_error("Failed to load project data", &e).await;
                Err(e)
            }
        }
    }

    /// Handles the end of a drag gesture
    pub async fn on_drag_end(&self, result: DragResult) -> ClientResult<()> {
        let Some(destination) = result.destination else {
            return Ok(());
        };

        if destination.status == result.source.status {
            let mut inner = self.inner.lock().await;
            inner
                .state
                .reorder_within(destination.status, result.source.index, destination.index);
            return Ok(());
        }

        self.move_task(result.task_id, destination.status).await
    }

    /// Moves a task to another column optimistically
    ///
    /// Unknown tasks and moves to the current column are no-ops.
    pub async fn move_task(&self, task_id: Uuid, status: TaskStatus) -> ClientResult<()> {
        let ticket = {
            let mut inner = self.inner.lock().await;
            match inner.state.task(task_id) {
                Some(task) if task.status != status => {}
                _ => return Ok(()),
            }
            match inner.state.apply_optimistic(task_id, status) {
                Some(ticket) => ticket,
                None => return Ok(()),
            }
        };

        match self.api.update_task(task_id, &TaskChanges::status(status)).await {
            Ok(server_task) => {
                let mut inner = self.inner.lock().await;
                if !inner.state.commit(&ticket, server_task) {
                    debug!(task_id = %task_id, "Dropped stale move confirmation");
                }
                Ok(())
            }
            Err(e) => {
                warn!(task_id = %task_id, error = %e, "Move rejected, reconciling with server");
                self.record_error("Failed to update task status", &e).await;
                self.reconcile(&ticket).await;
                Err(e)
            }
        }
    }

    /// Creates a task and puts the server's copy at the top of the board
    pub async fn create_task(&self, task: NewTask) -> ClientResult<Task> {
        match self.api.create_task(&task).await {
            Ok(created) => {
                self.inner.lock().await.state.prepend(created.clone());
                Ok(created)
            }
            Err(e) => {
                self.record_error("Failed to create task", &e).await;
                Err(e)
            }
        }
    }

    /// Updates a task and replaces the local copy with the server's
    pub async fn edit_task(&self, task_id: Uuid, changes: TaskChanges) -> ClientResult<Task> {
        match self.api.update_task(task_id, &changes).await {
            Ok(updated) => {
                self.inner.lock().await.state.replace(updated.clone());
                Ok(updated)
            }
            Err(e) => {
                self.record_error("Failed to update task", &e).await;
                Err(e)
            }
        }
    }

    /// Deletes a task; it leaves the board only once the server confirms
    pub async fn delete_task(&self, task_id: Uuid) -> ClientResult<()> {
        match self.api.delete_task(task_id).await {
            Ok(()) => {
                self.inner.lock().await.state.remove(task_id);
                Ok(())
            }
            Err(e) => {
                self.record_error("Failed to delete task", &e).await;
                Err(e)
            }
        }
    }

    async fn reconcile(&self, ticket: &PendingMove) {
        match self.api.list_tasks(self.project_id).await {
            Ok(tasks) => self.inner.lock().await.state.reset_to_server(tasks),
            Err(e) => {
                warn!(error = %e, "Re-fetch failed, rolling back the move locally");
                let restored = self.inner.lock().await.state.rollback(ticket);
                debug!(
                    task_id = %ticket.task_id,
                    restored,
                    "Rolled back rejected move"
                );
            }
        }
    }

    async fn record_error(&self, context: &str, error: &ClientError) {
        self.inner.lock().await.last_error = Some(format!("{}: {}", context, error));
    }
}
