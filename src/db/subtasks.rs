//! Subtask CRUD, completion toggling and reordering.

use super::tasks::get_task_internal;
use super::{Database, DbError, next_order, now_ms};
use crate::types::{Id, Subtask, SubtaskUpdate, is_blank};
use anyhow::Result;
use rusqlite::{Connection, OptionalExtension, Row, params};
use tracing::debug;

const SUBTASK_FIELDS: &str = "id, title, is_completed, task_id, \"order\", created_at, updated_at";

pub fn parse_subtask_row(row: &Row) -> rusqlite::Result<Subtask> {
    Ok(Subtask {
        id: row.get("id")?,
        title: row.get("title")?,
        is_completed: row.get("is_completed")?,
        task_id: row.get("task_id")?,
        order: row.get("order")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

pub(crate) fn get_subtask_internal(conn: &Connection, subtask_id: Id) -> Result<Option<Subtask>> {
    let subtask = conn
        .query_row(
            &format!("SELECT {SUBTASK_FIELDS} FROM subtasks WHERE id = ?1"),
            params![subtask_id],
            parse_subtask_row,
        )
        .optional()?;
    Ok(subtask)
}

pub(crate) fn list_subtasks_internal(conn: &Connection, task_id: Id) -> Result<Vec<Subtask>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {SUBTASK_FIELDS} FROM subtasks WHERE task_id = ?1 ORDER BY \"order\" ASC, id ASC"
    ))?;
    let subtasks = stmt
        .query_map(params![task_id], parse_subtask_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(subtasks)
}

impl Database {
    /// List the subtasks of a task in display order.
    pub fn list_subtasks(&self, task_id: Id) -> Result<Vec<Subtask>> {
        self.with_conn(|conn| list_subtasks_internal(conn, task_id))
    }

    /// Get a subtask by ID.
    pub fn get_subtask(&self, subtask_id: Id) -> Result<Option<Subtask>> {
        self.with_conn(|conn| get_subtask_internal(conn, subtask_id))
    }

    /// Append an incomplete subtask to the end of a task's checklist.
    pub fn create_subtask(&self, task_id: Id, title: &str) -> Result<Subtask> {
        if is_blank(title) {
            return Err(DbError::EmptyField("Subtask title").into());
        }
        let now = now_ms();

        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            if get_task_internal(&tx, task_id)?.is_none() {
                return Err(DbError::TaskNotFound(task_id).into());
            }
            let order = next_order(&tx, "subtasks", "task_id", task_id)?;
            let subtask = tx.query_row(
                &format!(
                    "INSERT INTO subtasks (title, is_completed, task_id, \"order\", created_at, updated_at)
                     VALUES (?1, 0, ?2, ?3, ?4, ?4)
                     RETURNING {SUBTASK_FIELDS}"
                ),
                params![title, task_id, order, now],
                parse_subtask_row,
            )?;
            tx.commit()?;

            debug!(subtask_id = subtask.id, task_id, order, "Created subtask");
            Ok(subtask)
        })
    }

    /// Update a subtask's title and/or completion. Returns `None` if it does not exist.
    pub fn update_subtask(&self, subtask_id: Id, update: SubtaskUpdate) -> Result<Option<Subtask>> {
        if let Some(title) = &update.title
            && is_blank(title)
        {
            return Err(DbError::EmptyField("Subtask title").into());
        }

        self.with_conn(|conn| {
            let subtask = conn
                .query_row(
                    &format!(
                        "UPDATE subtasks
                         SET title = COALESCE(?1, title),
                             is_completed = COALESCE(?2, is_completed),
                             updated_at = ?3
                         WHERE id = ?4
                         RETURNING {SUBTASK_FIELDS}"
                    ),
                    params![update.title, update.is_completed, now_ms(), subtask_id],
                    parse_subtask_row,
                )
                .optional()?;
            Ok(subtask)
        })
    }

    /// Flip a subtask's completion flag. Returns `None` if it does not exist.
    pub fn toggle_subtask(&self, subtask_id: Id) -> Result<Option<Subtask>> {
        self.with_conn(|conn| {
            let subtask = conn
                .query_row(
                    &format!(
                        "UPDATE subtasks
                         SET is_completed = NOT is_completed, updated_at = ?1
                         WHERE id = ?2
                         RETURNING {SUBTASK_FIELDS}"
                    ),
                    params![now_ms(), subtask_id],
                    parse_subtask_row,
                )
                .optional()?;
            Ok(subtask)
        })
    }

    /// Delete a subtask. Returns false if it did not exist.
    pub fn delete_subtask(&self, subtask_id: Id) -> Result<bool> {
        self.with_conn(|conn| {
            let deleted =
                conn.execute("DELETE FROM subtasks WHERE id = ?1", params![subtask_id])?;
            Ok(deleted > 0)
        })
    }

    /// Rewrite subtask order so each listed id gets its index as order.
    ///
    /// Runs as a single transaction: either every listed subtask is
    /// renumbered or none is. Ids that do not belong to the task are skipped.
    /// Returns the task's subtasks in their new order.
    pub fn reorder_subtasks(&self, task_id: Id, subtask_ids: &[Id]) -> Result<Vec<Subtask>> {
        let now = now_ms();

        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            if get_task_internal(&tx, task_id)?.is_none() {
                return Err(DbError::TaskNotFound(task_id).into());
            }

            let mut renumbered = 0;
            {
                let mut stmt = tx.prepare(
                    "UPDATE subtasks SET \"order\" = ?1, updated_at = ?2
                     WHERE id = ?3 AND task_id = ?4",
                )?;
                for (index, subtask_id) in subtask_ids.iter().enumerate() {
                    renumbered += stmt.execute(params![index as i64, now, subtask_id, task_id])?;
                }
            }

            let subtasks = list_subtasks_internal(&tx, task_id)?;
            tx.commit()?;

            debug!(task_id, requested = subtask_ids.len(), renumbered, "Reordered subtasks");
            Ok(subtasks)
        })
    }
}
