//! Board routes: `/boards`, `/boards/{id}`, `/boards/{id}/tree`.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::Deserialize;

use super::extract::{DeleteResponse, json_body, parse_id, required_text};
use super::server::ApiServer;
use crate::error::{ApiError, ApiResult, ResultExt};
use crate::types::{Board, BoardTree};

/// Body for creating or renaming a board.
#[derive(Debug, Deserialize)]
pub(crate) struct BoardRequest {
    name: Option<String>,
}

/// GET /boards - all boards, most recent first
pub(crate) async fn list_boards(State(state): State<ApiServer>) -> ApiResult<Json<Vec<Board>>> {
    let boards = state.db().list_boards().or_internal("Failed to fetch boards")?;
    Ok(Json(boards))
}

/// POST /boards - create a board with its default columns
pub(crate) async fn create_board(
    State(state): State<ApiServer>,
    body: Result<Json<BoardRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Board>)> {
    let body = json_body(body)?;
    let name = required_text(body.name, "Board name")?;

    let board = state
        .db()
        .create_board(&name, &state.board_config().default_columns)
        .or_internal("Failed to create board")?;
    Ok((StatusCode::CREATED, Json(board)))
}

/// GET /boards/{id}
pub(crate) async fn get_board(
    State(state): State<ApiServer>,
    Path(id): Path<String>,
) -> ApiResult<Json<Board>> {
    let id = parse_id(&id, "board")?;
    state
        .db()
        .get_board(id)
        .or_internal("Failed to fetch board")?
        .map(Json)
        .ok_or_else(ApiError::board_not_found)
}

/// PUT /boards/{id} - rename
pub(crate) async fn update_board(
    State(state): State<ApiServer>,
    Path(id): Path<String>,
    body: Result<Json<BoardRequest>, JsonRejection>,
) -> ApiResult<Json<Board>> {
    let id = parse_id(&id, "board")?;
    let body = json_body(body)?;
    let name = required_text(body.name, "Board name")?;

    state
        .db()
        .rename_board(id, &name)
        .or_internal("Failed to update board")?
        .map(Json)
        .ok_or_else(ApiError::board_not_found)
}

/// DELETE /boards/{id} - cascades to columns, tasks and subtasks
pub(crate) async fn delete_board(
    State(state): State<ApiServer>,
    Path(id): Path<String>,
) -> ApiResult<Json<DeleteResponse>> {
    let id = parse_id(&id, "board")?;
    if state.db().delete_board(id).or_internal("Failed to delete board")? {
        Ok(DeleteResponse::ok())
    } else {
        Err(ApiError::board_not_found())
    }
}

/// GET /boards/{id}/tree - the board with columns, tasks and subtasks nested
pub(crate) async fn get_board_tree(
    State(state): State<ApiServer>,
    Path(id): Path<String>,
) -> ApiResult<Json<BoardTree>> {
    let id = parse_id(&id, "board")?;
    state
        .db()
        .board_tree(id)
        .or_internal("Failed to fetch board")?
        .map(Json)
        .ok_or_else(ApiError::board_not_found)
}
