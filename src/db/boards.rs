//! Board CRUD operations.

use super::{Database, DbError, now_ms};
use crate::types::{Board, Id, is_blank};
use anyhow::Result;
use rusqlite::{Connection, OptionalExtension, Row, params};
use tracing::{debug, warn};

pub fn parse_board_row(row: &Row) -> rusqlite::Result<Board> {
    Ok(Board {
        id: row.get("id")?,
        name: row.get("name")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

/// Internal helper to get a board using an existing connection (avoids deadlock).
pub(crate) fn get_board_internal(conn: &Connection, board_id: Id) -> Result<Option<Board>> {
    let board = conn
        .query_row(
            "SELECT id, name, created_at, updated_at FROM boards WHERE id = ?1",
            params![board_id],
            parse_board_row,
        )
        .optional()?;
    Ok(board)
}

/// Insert the default columns for a freshly created board, all or nothing.
fn insert_default_columns(
    conn: &mut Connection,
    board_id: Id,
    names: &[String],
    now: i64,
) -> Result<usize> {
    let tx = conn.transaction()?;
    for (index, name) in names.iter().enumerate() {
        if is_blank(name) {
            return Err(DbError::EmptyField("Column name").into());
        }
        tx.execute(
            "INSERT INTO columns (name, board_id, \"order\", created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?4)",
            params![name, board_id, index as i64 + 1, now],
        )?;
    }
    tx.commit()?;
    Ok(names.len())
}

impl Database {
    /// List all boards, most recently created first.
    pub fn list_boards(&self) -> Result<Vec<Board>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, name, created_at, updated_at FROM boards
                 ORDER BY created_at DESC, id DESC",
            )?;
            let boards = stmt
                .query_map([], parse_board_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(boards)
        })
    }

    /// Get a board by ID.
    pub fn get_board(&self, board_id: Id) -> Result<Option<Board>> {
        self.with_conn(|conn| get_board_internal(conn, board_id))
    }

    /// Create a board and, best-effort, its default columns.
    ///
    /// The default columns are inserted in their own transaction after the
    /// board row is committed. If that fails the board is kept with no
    /// columns and the failure is logged.
    pub fn create_board(&self, name: &str, default_columns: &[String]) -> Result<Board> {
        if is_blank(name) {
            return Err(DbError::EmptyField("Board name").into());
        }
        let now = now_ms();

        self.with_conn_mut(|conn| {
            let board = conn.query_row(
                "INSERT INTO boards (name, created_at, updated_at) VALUES (?1, ?2, ?2)
                 RETURNING id, name, created_at, updated_at",
                params![name, now],
                parse_board_row,
            )?;
            debug!(board_id = board.id, name = %board.name, "Created board");

            if !default_columns.is_empty() {
                match insert_default_columns(conn, board.id, default_columns, now) {
                    Ok(count) => debug!(board_id = board.id, count, "Created default columns"),
                    Err(e) => warn!(
                        board_id = board.id,
                        error = %e,
                        "Failed to create default columns; keeping board without columns"
                    ),
                }
            }

            Ok(board)
        })
    }

    /// Rename a board. Returns `None` if it does not exist.
    pub fn rename_board(&self, board_id: Id, name: &str) -> Result<Option<Board>> {
        if is_blank(name) {
            return Err(DbError::EmptyField("Board name").into());
        }
        self.with_conn(|conn| {
            let board = conn
                .query_row(
                    "UPDATE boards SET name = ?1, updated_at = ?2 WHERE id = ?3
                     RETURNING id, name, created_at, updated_at",
                    params![name, now_ms(), board_id],
                    parse_board_row,
                )
                .optional()?;
            Ok(board)
        })
    }

    /// Delete a board; columns, tasks and subtasks go with it.
    /// Returns false if the board did not exist.
    pub fn delete_board(&self, board_id: Id) -> Result<bool> {
        self.with_conn(|conn| {
            let deleted = conn.execute("DELETE FROM boards WHERE id = ?1", params![board_id])?;
            if deleted > 0 {
                debug!(board_id, "Deleted board");
            }
            Ok(deleted > 0)
        })
    }
}
