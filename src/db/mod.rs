//! Database layer for the Kanban board server.

pub mod boards;
pub mod columns;
pub mod export;
pub mod seed;
pub mod subtasks;
pub mod tasks;

use anyhow::{Result, anyhow};
use rusqlite::{Connection, OptionalExtension, params};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;

use crate::types::{Id, Order};

mod embedded {
    use refinery::embed_migrations;
    embed_migrations!("migrations");
}

/// Typed failures raised by the data layer that callers may want to match on.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DbError {
    #[error("Board not found: {0}")]
    BoardNotFound(Id),
    #[error("Column not found: {0}")]
    ColumnNotFound(Id),
    #[error("Task not found: {0}")]
    TaskNotFound(Id),
    #[error("Subtask not found: {0}")]
    SubtaskNotFound(Id),
    #[error("{0} cannot be empty")]
    EmptyField(&'static str),
}

/// Database handle wrapping a SQLite connection.
///
/// Cloning is cheap; every clone shares the same connection.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open or create the database at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "PRAGMA journal_mode=WAL;
             PRAGMA foreign_keys=ON;
             PRAGMA busy_timeout=5000;",
        )?;

        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };

        db.run_migrations()?;

        Ok(db)
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;

        conn.execute_batch("PRAGMA foreign_keys=ON;")?;

        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };

        db.run_migrations()?;

        Ok(db)
    }

    /// Run embedded schema migrations. Returns the number applied.
    fn run_migrations(&self) -> Result<usize> {
        let mut conn = self.lock()?;
        let report = embedded::migrations::runner().run(&mut *conn)?;
        let applied = report.applied_migrations().len();
        if applied > 0 {
            tracing::info!(applied, "Applied database migrations");
        }
        Ok(applied)
    }

    /// Latest schema version recorded by the migration runner.
    pub fn schema_version(&self) -> Result<Option<i64>> {
        self.with_conn(|conn| {
            let version = conn
                .query_row(
                    "SELECT MAX(version) FROM refinery_schema_history",
                    [],
                    |row| row.get::<_, Option<i64>>(0),
                )
                .optional()?
                .flatten();
            Ok(version)
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow!("database connection mutex poisoned"))
    }

    /// Execute a function with exclusive access to the connection.
    pub fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self.lock()?;
        f(&conn)
    }

    /// Execute a function with mutable access to the connection (for transactions).
    pub fn with_conn_mut<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T>,
    {
        let mut conn = self.lock()?;
        f(&mut conn)
    }
}

/// Get the current timestamp in milliseconds.
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Order for a new sibling: one past the current maximum, or 1 for the first.
///
/// `table` and `parent_column` are compile-time constants from this module,
/// never user input.
pub(crate) fn next_order(
    conn: &Connection,
    table: &str,
    parent_column: &str,
    parent_id: Id,
) -> rusqlite::Result<Order> {
    let sql = format!(
        "SELECT COALESCE(MAX(\"order\"), 0) + 1 FROM {table} WHERE {parent_column} = ?1"
    );
    conn.query_row(&sql, params![parent_id], |row| row.get(0))
}
