//! Core types for the Kanban board server.

use serde::{Deserialize, Serialize};

/// Row identifier shared by all four tables.
pub type Id = i64;

/// Sibling position within a parent scope (ascending display order).
pub type Order = i64;

/// A board: the root entity, owns columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pub id: Id,
    pub name: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// An ordered lane within a board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub id: Id,
    pub name: String,
    pub board_id: Id,
    pub order: Order,
    pub created_at: i64,
    pub updated_at: i64,
}

/// A unit of work within a column.
///
/// `subtasks_count` and `completed_subtasks_count` are computed from the
/// live subtask rows every time a task is read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: Id,
    pub title: String,
    pub description: Option<String>,
    pub column_id: Id,
    pub order: Order,
    pub subtasks_count: i64,
    pub completed_subtasks_count: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// A checklist item within a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtask {
    pub id: Id,
    pub title: String,
    pub is_completed: bool,
    pub task_id: Id,
    pub order: Order,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Fields for a new task. Order is always assigned by the store.
#[derive(Debug, Clone, Default)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
}

/// Partial task update; `None` leaves the field untouched.
///
/// `description` is doubly optional: `Some(None)` clears it.
#[derive(Debug, Clone, Default)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub column_id: Option<Id>,
    pub order: Option<Order>,
}

impl TaskUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.column_id.is_none()
            && self.order.is_none()
    }
}

/// Partial subtask update.
#[derive(Debug, Clone, Default)]
pub struct SubtaskUpdate {
    pub title: Option<String>,
    pub is_completed: Option<bool>,
}

/// Column with its tasks, used by board snapshots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnTree {
    #[serde(flatten)]
    pub column: Column,
    pub tasks: Vec<TaskTree>,
}

/// Task with its subtasks, used by board snapshots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskTree {
    #[serde(flatten)]
    pub task: Task,
    pub subtasks: Vec<Subtask>,
}

/// A full board: columns, tasks and subtasks in display order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardTree {
    #[serde(flatten)]
    pub board: Board,
    pub columns: Vec<ColumnTree>,
}

impl BoardTree {
    /// Total number of tasks across all columns.
    pub fn task_count(&self) -> usize {
        self.columns.iter().map(|c| c.tasks.len()).sum()
    }
}

/// Returns true when a required text field carries no content.
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}
