//! Nested board snapshots: board → columns → tasks → subtasks.

use super::boards::{get_board_internal, parse_board_row};
use super::columns::list_columns_internal;
use super::subtasks::list_subtasks_internal;
use super::tasks::list_tasks_internal;
use super::Database;
use crate::types::{Board, BoardTree, ColumnTree, Id, TaskTree};
use anyhow::Result;
use rusqlite::Connection;

fn build_tree(conn: &Connection, board: Board) -> Result<BoardTree> {
    let mut columns = Vec::new();
    for column in list_columns_internal(conn, board.id)? {
        let mut tasks = Vec::new();
        for task in list_tasks_internal(conn, column.id)? {
            let subtasks = list_subtasks_internal(conn, task.id)?;
            tasks.push(TaskTree { task, subtasks });
        }
        columns.push(ColumnTree { column, tasks });
    }
    Ok(BoardTree { board, columns })
}

impl Database {
    /// Snapshot a single board. Returns `None` if it does not exist.
    pub fn board_tree(&self, board_id: Id) -> Result<Option<BoardTree>> {
        self.with_conn(|conn| match get_board_internal(conn, board_id)? {
            Some(board) => Ok(Some(build_tree(conn, board)?)),
            None => Ok(None),
        })
    }

    /// Snapshot every board, oldest first so the output is stable.
    pub fn export_boards(&self) -> Result<Vec<BoardTree>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, name, created_at, updated_at FROM boards
                 ORDER BY created_at ASC, id ASC",
            )?;
            let boards = stmt
                .query_map([], parse_board_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            boards
                .into_iter()
                .map(|board| build_tree(conn, board))
                .collect()
        })
    }
}
