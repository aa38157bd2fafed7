//! Column CRUD operations.

use super::boards::get_board_internal;
use super::{Database, DbError, next_order, now_ms};
use crate::types::{Column, Id, is_blank};
use anyhow::Result;
use rusqlite::{Connection, OptionalExtension, Row, params};
use tracing::debug;

const COLUMN_FIELDS: &str = "id, name, board_id, \"order\", created_at, updated_at";

pub fn parse_column_row(row: &Row) -> rusqlite::Result<Column> {
    Ok(Column {
        id: row.get("id")?,
        name: row.get("name")?,
        board_id: row.get("board_id")?,
        order: row.get("order")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

pub(crate) fn get_column_internal(conn: &Connection, column_id: Id) -> Result<Option<Column>> {
    let column = conn
        .query_row(
            &format!("SELECT {COLUMN_FIELDS} FROM columns WHERE id = ?1"),
            params![column_id],
            parse_column_row,
        )
        .optional()?;
    Ok(column)
}

pub(crate) fn list_columns_internal(conn: &Connection, board_id: Id) -> Result<Vec<Column>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLUMN_FIELDS} FROM columns WHERE board_id = ?1 ORDER BY \"order\" ASC, id ASC"
    ))?;
    let columns = stmt
        .query_map(params![board_id], parse_column_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(columns)
}

impl Database {
    /// List the columns of a board in display order.
    pub fn list_columns(&self, board_id: Id) -> Result<Vec<Column>> {
        self.with_conn(|conn| list_columns_internal(conn, board_id))
    }

    /// Get a column by ID.
    pub fn get_column(&self, column_id: Id) -> Result<Option<Column>> {
        self.with_conn(|conn| get_column_internal(conn, column_id))
    }

    /// Append a column to the end of a board.
    pub fn create_column(&self, board_id: Id, name: &str) -> Result<Column> {
        if is_blank(name) {
            return Err(DbError::EmptyField("Column name").into());
        }
        let now = now_ms();

        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            if get_board_internal(&tx, board_id)?.is_none() {
                return Err(DbError::BoardNotFound(board_id).into());
            }
            let order = next_order(&tx, "columns", "board_id", board_id)?;
            let column = tx.query_row(
                &format!(
                    "INSERT INTO columns (name, board_id, \"order\", created_at, updated_at)
                     VALUES (?1, ?2, ?3, ?4, ?4)
                     RETURNING {COLUMN_FIELDS}"
                ),
                params![name, board_id, order, now],
                parse_column_row,
            )?;
            tx.commit()?;

            debug!(column_id = column.id, board_id, order, "Created column");
            Ok(column)
        })
    }

    /// Rename a column. Returns `None` if it does not exist.
    pub fn rename_column(&self, column_id: Id, name: &str) -> Result<Option<Column>> {
        if is_blank(name) {
            return Err(DbError::EmptyField("Column name").into());
        }
        self.with_conn(|conn| {
            let column = conn
                .query_row(
                    &format!(
                        "UPDATE columns SET name = ?1, updated_at = ?2 WHERE id = ?3
                         RETURNING {COLUMN_FIELDS}"
                    ),
                    params![name, now_ms(), column_id],
                    parse_column_row,
                )
                .optional()?;
            Ok(column)
        })
    }

    /// Delete a column and its tasks. Returns false if it did not exist.
    pub fn delete_column(&self, column_id: Id) -> Result<bool> {
        self.with_conn(|conn| {
            let deleted = conn.execute("DELETE FROM columns WHERE id = ?1", params![column_id])?;
            Ok(deleted > 0)
        })
    }
}
