//! HTTP server implementation.
//!
//! Builds the axum router over the shared [`Database`] and manages the
//! listener lifecycle.

use axum::{
    Router,
    response::{IntoResponse, Json},
    routing::get,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use super::{boards, columns, subtasks, tasks};
use crate::config::BoardConfig;
use crate::db::Database;

/// Server state shared across handlers.
#[derive(Clone)]
pub struct ApiServer {
    /// Shared database handle.
    db: Database,
    /// Board behavior (default columns).
    board_config: Arc<BoardConfig>,
}

impl ApiServer {
    /// Create a new server state instance.
    pub fn new(db: Database, board_config: BoardConfig) -> Self {
        Self {
            db,
            board_config: Arc::new(board_config),
        }
    }

    /// Get the database reference.
    pub fn db(&self) -> &Database {
        &self.db
    }

    /// Get the board configuration.
    pub fn board_config(&self) -> &BoardConfig {
        &self.board_config
    }
}

/// Health check response.
#[derive(serde::Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// Health check endpoint.
async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Build the router with all routes.
pub fn build_router(state: ApiServer) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        // Boards
        .route("/boards", get(boards::list_boards).post(boards::create_board))
        .route(
            "/boards/{id}",
            get(boards::get_board)
                .put(boards::update_board)
                .delete(boards::delete_board),
        )
        .route("/boards/{id}/tree", get(boards::get_board_tree))
        .route(
            "/boards/{id}/columns",
            get(columns::list_board_columns).post(columns::create_board_column),
        )
        // Columns
        .route(
            "/columns/{id}",
            get(columns::get_column)
                .put(columns::update_column)
                .delete(columns::delete_column),
        )
        .route(
            "/columns/{id}/tasks",
            get(tasks::list_column_tasks).post(tasks::create_column_task),
        )
        // Tasks
        .route(
            "/tasks/{id}",
            get(tasks::get_task)
                .put(tasks::update_task)
                .delete(tasks::delete_task),
        )
        .route(
            "/tasks/{id}/subtasks",
            get(subtasks::list_task_subtasks)
                .post(subtasks::create_task_subtask)
                .patch(subtasks::reorder_task_subtasks),
        )
        // Subtasks
        .route(
            "/subtasks/{id}",
            get(subtasks::get_subtask)
                .put(subtasks::update_subtask)
                .patch(subtasks::toggle_subtask)
                .delete(subtasks::delete_subtask),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve in the foreground until `shutdown` resolves.
pub async fn serve<F>(state: ApiServer, addr: SocketAddr, shutdown: F) -> anyhow::Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Kanban API listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("Kanban API stopped");
    Ok(())
}

/// Resolves on Ctrl-C.
pub async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
