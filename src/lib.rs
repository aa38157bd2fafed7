//! Kanban Board Server Library
//!
//! Boards contain ordered columns, columns contain ordered tasks, and tasks
//! contain ordered subtasks. This crate exports the storage layer, the HTTP
//! API and the supporting configuration for the binary and for tests.

pub mod api;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod types;
