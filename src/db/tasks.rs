//! Task CRUD operations.
//!
//! Every read annotates the task with live subtask counts, so the counts can
//! never drift from the subtask rows.

use super::columns::get_column_internal;
use super::{Database, DbError, next_order, now_ms};
use crate::types::{Id, NewTask, Task, TaskUpdate, is_blank};
use anyhow::Result;
use rusqlite::{Connection, OptionalExtension, Row, params};
use tracing::debug;

const TASK_SELECT: &str = "SELECT t.id, t.title, t.description, t.column_id, t.\"order\",
        t.created_at, t.updated_at,
        (SELECT COUNT(*) FROM subtasks s WHERE s.task_id = t.id) AS subtasks_count,
        (SELECT COUNT(*) FROM subtasks s WHERE s.task_id = t.id AND s.is_completed = 1)
            AS completed_subtasks_count
    FROM tasks t";

pub fn parse_task_row(row: &Row) -> rusqlite::Result<Task> {
    Ok(Task {
        id: row.get("id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        column_id: row.get("column_id")?,
        order: row.get("order")?,
        subtasks_count: row.get("subtasks_count")?,
        completed_subtasks_count: row.get("completed_subtasks_count")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

/// Empty descriptions are stored as NULL.
fn normalize_description(description: Option<String>) -> Option<String> {
    description.filter(|d| !d.trim().is_empty())
}

pub(crate) fn get_task_internal(conn: &Connection, task_id: Id) -> Result<Option<Task>> {
    let task = conn
        .query_row(
            &format!("{TASK_SELECT} WHERE t.id = ?1"),
            params![task_id],
            parse_task_row,
        )
        .optional()?;
    Ok(task)
}

pub(crate) fn list_tasks_internal(conn: &Connection, column_id: Id) -> Result<Vec<Task>> {
    let mut stmt = conn.prepare(&format!(
        "{TASK_SELECT} WHERE t.column_id = ?1 ORDER BY t.\"order\" ASC, t.id ASC"
    ))?;
    let tasks = stmt
        .query_map(params![column_id], parse_task_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(tasks)
}

impl Database {
    /// List the tasks of a column in display order.
    pub fn list_tasks(&self, column_id: Id) -> Result<Vec<Task>> {
        self.with_conn(|conn| list_tasks_internal(conn, column_id))
    }

    /// Get a task by ID.
    pub fn get_task(&self, task_id: Id) -> Result<Option<Task>> {
        self.with_conn(|conn| get_task_internal(conn, task_id))
    }

    /// Append a task to the end of a column.
    pub fn create_task(&self, column_id: Id, task: NewTask) -> Result<Task> {
        if is_blank(&task.title) {
            return Err(DbError::EmptyField("Task title").into());
        }
        let now = now_ms();

        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            if get_column_internal(&tx, column_id)?.is_none() {
                return Err(DbError::ColumnNotFound(column_id).into());
            }
            let order = next_order(&tx, "tasks", "column_id", column_id)?;
            tx.execute(
                "INSERT INTO tasks (title, description, column_id, \"order\", created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
                params![
                    task.title,
                    normalize_description(task.description),
                    column_id,
                    order,
                    now
                ],
            )?;
            let task_id = tx.last_insert_rowid();
            let created = get_task_internal(&tx, task_id)?
                .ok_or(DbError::TaskNotFound(task_id))?;
            tx.commit()?;

            debug!(task_id, column_id, order, "Created task");
            Ok(created)
        })
    }

    /// Apply a partial update to a task. Returns `None` if it does not exist.
    ///
    /// Moving a task to another column without an explicit order appends it
    /// to the end of the target column.
    pub fn update_task(&self, task_id: Id, update: TaskUpdate) -> Result<Option<Task>> {
        if let Some(title) = &update.title
            && is_blank(title)
        {
            return Err(DbError::EmptyField("Task title").into());
        }

        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            let Some(existing) = get_task_internal(&tx, task_id)? else {
                return Ok(None);
            };
            if update.is_empty() {
                return Ok(Some(existing));
            }

            let column_id = update.column_id.unwrap_or(existing.column_id);
            let moved = column_id != existing.column_id;
            if moved && get_column_internal(&tx, column_id)?.is_none() {
                return Err(DbError::ColumnNotFound(column_id).into());
            }

            let order = match update.order {
                Some(order) => order,
                None if moved => next_order(&tx, "tasks", "column_id", column_id)?,
                None => existing.order,
            };
            let title = update.title.unwrap_or(existing.title);
            let description = match update.description {
                Some(description) => normalize_description(description),
                None => existing.description,
            };

            tx.execute(
                "UPDATE tasks SET title = ?1, description = ?2, column_id = ?3, \"order\" = ?4,
                        updated_at = ?5
                 WHERE id = ?6",
                params![title, description, column_id, order, now_ms(), task_id],
            )?;
            let updated = get_task_internal(&tx, task_id)?;
            tx.commit()?;

            if moved {
                debug!(task_id, from = existing.column_id, to = column_id, "Moved task");
            }
            Ok(updated)
        })
    }

    /// Delete a task and its subtasks. Returns false if it did not exist.
    pub fn delete_task(&self, task_id: Id) -> Result<bool> {
        self.with_conn(|conn| {
            let deleted = conn.execute("DELETE FROM tasks WHERE id = ?1", params![task_id])?;
            Ok(deleted > 0)
        })
    }
}
