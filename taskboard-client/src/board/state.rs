/// Board state container
///
/// Holds the task list shown on a project's board and the optimistic move
/// protocol:
///
/// ```text
/// apply_optimistic ──> PendingMove ──┬─> commit(ticket, server_task)   success
///                                    ├─> reset_to_server(fresh list)   failure
///                                    └─> rollback(ticket)              failure, no list
/// ```
///
/// Every [`BoardState::reset_to_server`] bumps the epoch. A ticket remembers
/// the epoch it was issued in, and commit or rollback of a ticket from an
/// older epoch is dropped. Once server truth has been loaded, no in-flight
/// success can overwrite it.
///
/// Between resets each task with moves in flight keeps its last confirmed
/// status. When the last outstanding move of a task is rolled back the task
/// returns to that status, so a failed move never stays on the board no
/// matter how many other moves fail alongside it.
///
/// Columns are derived from the list: a column shows the tasks with its
/// status in list order.

use std::collections::HashMap;
use taskboard_shared::models::{Task, TaskStatus};
use uuid::Uuid;

/// Ticket for an optimistic move that has not been confirmed yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingMove {
    /// Task being moved
    pub task_id: Uuid,

    /// Status before the move
    pub previous: TaskStatus,

    /// Status the task was moved to
    pub target: TaskStatus,

    epoch: u64,
}

impl PendingMove {
    /// Epoch the ticket was issued in
    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}

/// The three board columns in display order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Columns {
    pub todo: Vec<Task>,
    pub in_progress: Vec<Task>,
    pub done: Vec<Task>,
}

impl Columns {
    pub fn get(&self, status: TaskStatus) -> &[Task] {
        match status {
            TaskStatus::Todo => &self.todo,
            TaskStatus::InProgress => &self.in_progress,
            TaskStatus::Done => &self.done,
        }
    }

    /// Column sizes in display order
    pub fn counts(&self) -> [usize; 3] {
        [self.todo.len(), self.in_progress.len(), self.done.len()]
    }
}

/// Moves of one task that the server hasn't answered yet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct InFlight {
    /// Status last confirmed by the server
    confirmed: TaskStatus,
    outstanding: usize,
}

/// Local view of a project's tasks
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardState {
    tasks: Vec<Task>,
    epoch: u64,
    in_flight: HashMap<Uuid, InFlight>,
}

impl BoardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// State holding `tasks` in server order
    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        Self {
            tasks,
            ..Self::default()
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn task(&self, id: Uuid) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Number of moves awaiting a server answer
    pub fn pending_moves(&self) -> usize {
        self.in_flight.values().map(|f| f.outstanding).sum()
    }

    /// Partitions tasks into todo / in-progress / done
    pub fn columns(&self) -> Columns {
        let column = |status: TaskStatus| {
            self.tasks
                .iter()
                .filter(|t| t.status == status)
                .cloned()
                .collect::<Vec<_>>()
        };

        Columns {
            todo: column(TaskStatus::Todo),
            in_progress: column(TaskStatus::InProgress),
            done: column(TaskStatus::Done),
        }
    }

    /// Moves a task locally and returns the ticket for confirming it
    ///
    /// Returns `None` if the task isn't on the board.
    pub fn apply_optimistic(&mut self, task_id: Uuid, status: TaskStatus) -> Option<PendingMove> {
        let epoch = self.epoch;
        let task = self.tasks.iter_mut().find(|t| t.id == task_id)?;

        let previous = task.status;
        task.status = status;

        self.in_flight
            .entry(task_id)
            .or_insert(InFlight {
                confirmed: previous,
                outstanding: 0,
            })
            .outstanding += 1;

        Some(PendingMove {
            task_id,
            previous,
            target: status,
            epoch,
        })
    }

    /// Replaces the moved task with the server's copy
    ///
    /// Returns false, changing nothing, if the state was reset after the
    /// ticket was issued or the task has since left the board.
    pub fn commit(&mut self, ticket: &PendingMove, server_task: Task) -> bool {
        if ticket.epoch != self.epoch || server_task.id != ticket.task_id {
            return false;
        }

        let Some(task) = self.tasks.iter_mut().find(|t| t.id == ticket.task_id) else {
            return false;
        };

        if let Some(flight) = self.in_flight.get_mut(&ticket.task_id) {
            flight.confirmed = server_task.status;
            flight.outstanding = flight.outstanding.saturating_sub(1);
            if flight.outstanding == 0 {
                self.in_flight.remove(&ticket.task_id);
            }
        }

        *task = server_task;
        true
    }

    /// Undoes a rejected move when no fresh server list is available
    ///
    /// While other moves of the same task are still in flight the task keeps
    /// showing the latest one; their answers settle it. Once the last move
    /// is answered the task goes back to its confirmed status. Rollback never
    /// touches the epoch, so sibling moves still commit or roll back on
    /// their own.
    ///
    /// Returns true if the task's status was restored. A stale ticket
    /// returns false: the list it belonged to was already replaced by
    /// server truth.
    pub fn rollback(&mut self, ticket: &PendingMove) -> bool {
        if ticket.epoch != self.epoch {
            return false;
        }

        let Some(flight) = self.in_flight.get_mut(&ticket.task_id) else {
            return false;
        };

        flight.outstanding = flight.outstanding.saturating_sub(1);
        if flight.outstanding > 0 {
            return false;
        }

        let confirmed = flight.confirmed;
        self.in_flight.remove(&ticket.task_id);

        match self.tasks.iter_mut().find(|t| t.id == ticket.task_id) {
            Some(task) if task.status != confirmed => {
                task.status = confirmed;
                true
            }
            _ => false,
        }
    }

    /// Discards local changes and adopts the server's list
    pub fn reset_to_server(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
        self.in_flight.clear();
        self.epoch += 1;
    }

    /// Moves the task at `from` to `to` within one column
    ///
    /// Indices count only the tasks of that column. Purely local: nothing is
    /// persisted. Returns false if either index is out of range.
    pub fn reorder_within(&mut self, status: TaskStatus, from: usize, to: usize) -> bool {
        let positions = self.positions(status);
        if from >= positions.len() || to >= positions.len() {
            return false;
        }
        if from == to {
            return true;
        }

        let task = self.tasks.remove(positions[from]);

        let remaining = self.positions(status);
        let insert_at = match remaining.get(to) {
            Some(&index) => index,
            None => remaining.last().map_or(self.tasks.len(), |&last| last + 1),
        };

        self.tasks.insert(insert_at, task);
        true
    }

    /// Adds a task at the front of the list
    pub fn prepend(&mut self, task: Task) {
        self.tasks.insert(0, task);
    }

    /// Replaces a task with a newer copy; false if it isn't on the board
    pub fn replace(&mut self, task: Task) -> bool {
        if let Some(flight) = self.in_flight.get_mut(&task.id) {
            flight.confirmed = task.status;
        }

        match self.tasks.iter_mut().find(|t| t.id == task.id) {
            Some(existing) => {
                *existing = task;
                true
            }
            None => false,
        }
    }

    /// Removes a task; false if it wasn't on the board
    pub fn remove(&mut self, task_id: Uuid) -> bool {
        let before = self.tasks.len();
        self.in_flight.remove(&task_id);
        self.tasks.retain(|t| t.id != task_id);
        self.tasks.len() != before
    }

    fn positions(&self, status: TaskStatus) -> Vec<usize> {
        self.tasks
            .iter()
            .enumerate()
            .filter(|(_, t)| t.status == status)
            .map(|(i, _)| i)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockTaskApi;

    fn board(titles: &[(&str, TaskStatus)]) -> BoardState {
        let project_id = Uuid::new_v4();
        BoardState::from_tasks(
            titles
                .iter()
                .map(|(title, status)| MockTaskApi::sample_task(project_id, title, *status))
                .collect(),
        )
    }

    fn titles(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().map(|t| t.title.as_str()).collect()
    }

    #[test]
    fn test_columns_partition_in_order() {
        let state = board(&[
            ("a", TaskStatus::Done),
            ("b", TaskStatus::Todo),
            ("c", TaskStatus::InProgress),
            ("d", TaskStatus::Todo),
        ]);

        let columns = state.columns();
        assert_eq!(titles(&columns.todo), vec!["b", "d"]);
        assert_eq!(titles(&columns.in_progress), vec!["c"]);
        assert_eq!(titles(&columns.done), vec!["a"]);
        assert_eq!(columns.counts(), [2, 1, 1]);
        assert_eq!(titles(columns.get(TaskStatus::Done)), vec!["a"]);
    }

    #[test]
    fn test_apply_optimistic_moves_immediately() {
        let mut state = board(&[("a", TaskStatus::Todo)]);
        let id = state.tasks()[0].id;

        let ticket = state.apply_optimistic(id, TaskStatus::Done).unwrap();

        assert_eq!(ticket.previous, TaskStatus::Todo);
        assert_eq!(ticket.target, TaskStatus::Done);
        assert_eq!(state.task(id).unwrap().status, TaskStatus::Done);
        assert!(state.apply_optimistic(Uuid::new_v4(), TaskStatus::Done).is_none());
    }

    #[test]
    fn test_commit_adopts_server_copy() {
        let mut state = board(&[("a", TaskStatus::Todo)]);
        let id = state.tasks()[0].id;
        let ticket = state.apply_optimistic(id, TaskStatus::InProgress).unwrap();

        let mut server = state.task(id).unwrap().clone();
        server.title = "a (server)".to_string();

        assert!(state.commit(&ticket, server));
        assert_eq!(state.task(id).unwrap().title, "a (server)");
    }

    #[test]
    fn test_stale_commit_after_reset_is_dropped() {
        let mut state = board(&[("a", TaskStatus::Todo), ("b", TaskStatus::Todo)]);
        let a = state.tasks()[0].clone();
        let b = state.tasks()[1].clone();

        let ticket_a = state.apply_optimistic(a.id, TaskStatus::Done).unwrap();
        let ticket_b = state.apply_optimistic(b.id, TaskStatus::Done).unwrap();

        // b fails: server truth still has both in todo
        state.reset_to_server(vec![a.clone(), b.clone()]);

        // a's success arrives late and must not overwrite server truth
        let mut late = a.clone();
        late.status = TaskStatus::Done;
        assert!(!state.commit(&ticket_a, late));
        assert!(!state.rollback(&ticket_b));

        assert_eq!(state.tasks(), &[a, b]);
    }

    #[test]
    fn test_rollback_restores_previous_status() {
        let mut state = board(&[("a", TaskStatus::InProgress)]);
        let id = state.tasks()[0].id;
        let epoch = state.epoch();

        let ticket = state.apply_optimistic(id, TaskStatus::Done).unwrap();
        assert_eq!(state.pending_moves(), 1);
        assert!(state.rollback(&ticket));

        assert_eq!(state.task(id).unwrap().status, TaskStatus::InProgress);
        assert_eq!(state.epoch(), epoch);
        assert_eq!(state.pending_moves(), 0);
    }

    #[test]
    fn test_sibling_rollbacks_each_restore() {
        let mut state = board(&[("a", TaskStatus::Todo), ("b", TaskStatus::InProgress)]);
        let a = state.tasks()[0].id;
        let b = state.tasks()[1].id;

        let ticket_a = state.apply_optimistic(a, TaskStatus::Done).unwrap();
        let ticket_b = state.apply_optimistic(b, TaskStatus::Done).unwrap();

        assert!(state.rollback(&ticket_a));
        assert!(state.rollback(&ticket_b));

        assert_eq!(state.task(a).unwrap().status, TaskStatus::Todo);
        assert_eq!(state.task(b).unwrap().status, TaskStatus::InProgress);
    }

    #[test]
    fn test_sibling_commit_survives_rollback() {
        let mut state = board(&[("a", TaskStatus::Todo), ("b", TaskStatus::Todo)]);
        let a = state.tasks()[0].clone();
        let b = state.tasks()[1].id;

        let ticket_a = state.apply_optimistic(a.id, TaskStatus::Done).unwrap();
        let ticket_b = state.apply_optimistic(b, TaskStatus::Done).unwrap();

        assert!(state.rollback(&ticket_b));

        let mut confirmed = a.clone();
        confirmed.status = TaskStatus::Done;
        assert!(state.commit(&ticket_a, confirmed));

        assert_eq!(state.task(a.id).unwrap().status, TaskStatus::Done);
        assert_eq!(state.task(b).unwrap().status, TaskStatus::Todo);
    }

    #[test]
    fn test_repeated_moves_of_one_task_settle_on_confirmed_status() {
        let mut state = board(&[("a", TaskStatus::Todo)]);
        let task = state.tasks()[0].clone();

        let first = state.apply_optimistic(task.id, TaskStatus::Done).unwrap();
        let second = state.apply_optimistic(task.id, TaskStatus::InProgress).unwrap();

        // Both rejected, answers arrive in issue order
        assert!(!state.rollback(&first));
        assert_eq!(state.task(task.id).unwrap().status, TaskStatus::InProgress);
        assert!(state.rollback(&second));
        assert_eq!(state.task(task.id).unwrap().status, TaskStatus::Todo);

        // Later move confirmed before the earlier one is rejected
        let first = state.apply_optimistic(task.id, TaskStatus::Done).unwrap();
        let second = state.apply_optimistic(task.id, TaskStatus::InProgress).unwrap();

        let mut confirmed = task.clone();
        confirmed.status = TaskStatus::InProgress;
        assert!(state.commit(&second, confirmed));
        assert!(!state.rollback(&first));
        assert_eq!(state.task(task.id).unwrap().status, TaskStatus::InProgress);
        assert_eq!(state.pending_moves(), 0);
    }

    #[test]
    fn test_reorder_within_column() {
        let mut state = board(&[
            ("t1", TaskStatus::Todo),
            ("d1", TaskStatus::Done),
            ("t2", TaskStatus::Todo),
            ("t3", TaskStatus::Todo),
        ]);

        assert!(state.reorder_within(TaskStatus::Todo, 0, 2));
        assert_eq!(titles(&state.columns().todo), vec!["t2", "t3", "t1"]);
        assert_eq!(titles(&state.columns().done), vec!["d1"]);

        assert!(state.reorder_within(TaskStatus::Todo, 2, 0));
        assert_eq!(titles(&state.columns().todo), vec!["t1", "t2", "t3"]);

        assert!(!state.reorder_within(TaskStatus::Todo, 0, 3));
        assert!(!state.reorder_within(TaskStatus::InProgress, 0, 0));
    }

    #[test]
    fn test_prepend_replace_remove() {
        let mut state = board(&[("a", TaskStatus::Todo)]);
        let extra = MockTaskApi::sample_task(Uuid::new_v4(), "new", TaskStatus::Todo);

        state.prepend(extra.clone());
        assert_eq!(titles(state.tasks()), vec!["new", "a"]);

        let mut edited = extra.clone();
        edited.title = "edited".to_string();
        assert!(state.replace(edited));
        assert_eq!(state.tasks()[0].title, "edited");

        assert!(state.remove(extra.id));
        assert!(!state.remove(extra.id));
        assert_eq!(titles(state.tasks()), vec!["a"]);
    }
}
