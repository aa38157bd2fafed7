//! JSON HTTP API.
//!
//! Route handlers validate path ids and request bodies, call into
//! [`crate::db::Database`], and map results to status codes. Every error
//! response has the shape `{"error": "..."}`.

mod boards;
mod columns;
mod extract;
mod server;
mod subtasks;
mod tasks;

pub use extract::DeleteResponse;
pub use server::{ApiServer, build_router, serve, shutdown_signal};
