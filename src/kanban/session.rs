//! Client-side board state as an explicit reducer.
//!
//! The board view keeps one in-memory snapshot of a board's tasks. Every
//! mutation goes through [`BoardState::apply`] and is recorded in the action
//! log. Drag and drop is layered on top by [`BoardSession`]: hovering mutates
//! the snapshot optimistically, and a drop is reconciled against the status
//! captured when the drag started into at most one status update.

use uuid::Uuid;

use crate::models::tasks::{Task, TaskStatus};

#[derive(Debug, Clone, PartialEq)]
pub enum BoardAction {
    /// Authoritative fetch. Replaces the snapshot wholesale.
    Replace(Vec<Task>),
    TaskCreated(Task),
    /// Server-confirmed version of a task.
    TaskUpdated(Task),
    TaskDeleted(Uuid),
    /// Optimistic status change that has not been confirmed.
    TaskMoved { task_id: Uuid, status: TaskStatus },
}

#[derive(Debug, Clone, Default)]
pub struct BoardState {
    tasks: Vec<Task>,
    log: Vec<BoardAction>,
}

impl BoardState {
    pub fn new(tasks: Vec<Task>) -> Self {
        let mut state = Self::default();
        state.apply(BoardAction::Replace(tasks));
        state
    }

    pub fn apply(&mut self, action: BoardAction) {
        match &action {
            BoardAction::Replace(tasks) => self.tasks = tasks.clone(),
            BoardAction::TaskCreated(task) => self.tasks.push(task.clone()),
            BoardAction::TaskUpdated(task) => {
                if let Some(existing) = self.tasks.iter_mut().find(|t| t.id == task.id) {
                    *existing = task.clone();
                }
            }
            BoardAction::TaskDeleted(task_id) => self.tasks.retain(|t| t.id != *task_id),
            BoardAction::TaskMoved { task_id, status } => {
                if let Some(existing) = self.tasks.iter_mut().find(|t| t.id == *task_id) {
                    existing.status = *status;
                }
            }
        }
        self.log.push(action);
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn task(&self, task_id: Uuid) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == task_id)
    }

    /// Tasks of one column in render order: position, then newest first.
    pub fn column(&self, status: TaskStatus) -> Vec<&Task> {
        let mut column: Vec<&Task> = self.tasks.iter().filter(|t| t.status == status).collect();
        column.sort_by(|a, b| {
            a.position
                .cmp(&b.position)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        column
    }

    pub fn actions(&self) -> &[BoardAction] {
        &self.log
    }
}

/// Per-task drag interaction state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragState {
    Idle,
    Dragging {
        task_id: Uuid,
        original: TaskStatus,
    },
    HoveringColumn {
        task_id: Uuid,
        original: TaskStatus,
        hover: TaskStatus,
    },
}

/// What the pointer is over when a drag moves or ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropTarget {
    Column(TaskStatus),
    Task(Uuid),
    Nothing,
}

/// Result of reconciling a drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragResolution {
    /// Persist exactly one status change.
    Persist { to: TaskStatus },
    /// Dropped where it started: no network call, restore the original status.
    Revert { to: TaskStatus },
}

/// Reconciles a drop against the status captured at drag start.
///
/// `_current` is the possibly already mutated optimistic status. It never
/// decides whether an update is sent; only `original` vs `target` does.
pub fn reconcile_drag_result(
    original: TaskStatus,
    _current: TaskStatus,
    target: TaskStatus,
) -> DragResolution {
    if target != original {
        DragResolution::Persist { to: target }
    } else {
        DragResolution::Revert { to: original }
    }
}

/// Status update the caller must send to the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusUpdate {
    pub task_id: Uuid,
    pub status: TaskStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    Persist(StatusUpdate),
    Reverted { task_id: Uuid, status: TaskStatus },
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettleOutcome {
    Confirmed,
    /// The optimistic state was discarded; the board must be fetched again.
    RefetchRequired,
}

#[derive(Debug)]
pub struct BoardSession {
    state: BoardState,
    drag: DragState,
    pending: Option<StatusUpdate>,
    needs_refetch: bool,
}

impl BoardSession {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self {
            state: BoardState::new(tasks),
            drag: DragState::Idle,
            pending: None,
            needs_refetch: false,
        }
    }

    /// The local board. While [`Self::needs_refetch`] is true this still holds
    /// the rejected optimistic move and must not be rendered as server state.
    pub fn state(&self) -> &BoardState {
        &self.state
    }

    pub fn drag_state(&self) -> DragState {
        self.drag
    }

    pub fn pending_update(&self) -> Option<StatusUpdate> {
        self.pending
    }

    pub fn needs_refetch(&self) -> bool {
        self.needs_refetch
    }

    /// Non-drag mutations (create dialogs, edits, deletes) go straight to the
    /// reducer.
    pub fn apply(&mut self, action: BoardAction) {
        self.state.apply(action);
    }

    /// Starts a drag and freezes the task's current status as the original.
    /// Refused while the board is stale after a failed update.
    pub fn drag_start(&mut self, task_id: Uuid) -> bool {
        if self.needs_refetch {
            return false;
        }
        let Some(task) = self.state.task(task_id) else {
            return false;
        };
        self.drag = DragState::Dragging {
            task_id,
            original: task.status,
        };
        true
    }

    /// Applies an optimistic column move when hovering a column other than
    /// the task's live status. Hovering a task does not move anything.
    pub fn drag_over(&mut self, target: DropTarget) {
        let (task_id, original) = match self.drag {
            DragState::Idle => return,
            DragState::Dragging { task_id, original }
            | DragState::HoveringColumn {
                task_id, original, ..
            } => (task_id, original),
        };
        let DropTarget::Column(hover) = target else {
            return;
        };
        let Some(live) = self.state.task(task_id).map(|task| task.status) else {
            return;
        };

        if live != hover {
            self.state.apply(BoardAction::TaskMoved {
                task_id,
                status: hover,
            });
            self.drag = DragState::HoveringColumn {
                task_id,
                original,
                hover,
            };
        }
    }

    /// Ends the drag. Returns the single update to send, if any.
    pub fn drop_on(&mut self, target: DropTarget) -> DropOutcome {
        let drag = std::mem::replace(&mut self.drag, DragState::Idle);
        let (task_id, original) = match drag {
            DragState::Idle => return DropOutcome::Ignored,
            DragState::Dragging { task_id, original }
            | DragState::HoveringColumn {
                task_id, original, ..
            } => (task_id, original),
        };
        let Some(current) = self.state.task(task_id).map(|task| task.status) else {
            return DropOutcome::Ignored;
        };

        let target = match target {
            DropTarget::Column(status) => Some(status),
            DropTarget::Task(other_id) => self.state.task(other_id).map(|task| task.status),
            DropTarget::Nothing => None,
        };
        // Dropping outside every column cancels the drag.
        let target = target.unwrap_or(original);

        match reconcile_drag_result(original, current, target) {
            DragResolution::Persist { to } => {
                if current != to {
                    self.state.apply(BoardAction::TaskMoved { task_id, status: to });
                }
                let update = StatusUpdate {
                    task_id,
                    status: to,
                };
                self.pending = Some(update);
                DropOutcome::Persist(update)
            }
            DragResolution::Revert { to } => {
                if current != to {
                    self.state.apply(BoardAction::TaskMoved { task_id, status: to });
                }
                DropOutcome::Reverted {
                    task_id,
                    status: to,
                }
            }
        }
    }

    /// Settles the pending update with the server's answer.
    pub fn settle<E>(&mut self, result: Result<Task, E>) -> SettleOutcome {
        self.pending = None;
        match result {
            Ok(task) => {
                self.state.apply(BoardAction::TaskUpdated(task));
                SettleOutcome::Confirmed
            }
            Err(_) => {
                self.needs_refetch = true;
                SettleOutcome::RefetchRequired
            }
        }
    }

    /// Installs a fresh fetch, either after a failure or from the periodic
    /// refresh. Last fetch wins.
    pub fn refetched(&mut self, tasks: Vec<Task>) {
        self.state.apply(BoardAction::Replace(tasks));
        self.needs_refetch = false;
    }
}
