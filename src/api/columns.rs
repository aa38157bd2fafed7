//! Column routes: `/boards/{id}/columns`, `/columns/{id}`.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::Deserialize;

use super::extract::{DeleteResponse, json_body, parse_id, required_text};
use super::server::ApiServer;
use crate::error::{ApiError, ApiResult, ResultExt};
use crate::types::{Column, Id};

/// Body for creating or renaming a column.
#[derive(Debug, Deserialize)]
pub(crate) struct ColumnRequest {
    name: Option<String>,
}

fn ensure_board(state: &ApiServer, board_id: Id, context: &str) -> ApiResult<()> {
    match state.db().get_board(board_id).or_internal(context)? {
        Some(_) => Ok(()),
        None => Err(ApiError::board_not_found()),
    }
}

/// GET /boards/{id}/columns - in display order
pub(crate) async fn list_board_columns(
    State(state): State<ApiServer>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<Column>>> {
    let board_id = parse_id(&id, "board")?;
    ensure_board(&state, board_id, "Failed to fetch columns")?;

    let columns = state
        .db()
        .list_columns(board_id)
        .or_internal("Failed to fetch columns")?;
    Ok(Json(columns))
}

/// POST /boards/{id}/columns - append a column
pub(crate) async fn create_board_column(
    State(state): State<ApiServer>,
    Path(id): Path<String>,
    body: Result<Json<ColumnRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Column>)> {
    let board_id = parse_id(&id, "board")?;
    ensure_board(&state, board_id, "Failed to create column")?;
    let name = required_text(json_body(body)?.name, "Column name")?;

    let column = state
        .db()
        .create_column(board_id, &name)
        .or_internal("Failed to create column")?;
    Ok((StatusCode::CREATED, Json(column)))
}

/// GET /columns/{id}
pub(crate) async fn get_column(
    State(state): State<ApiServer>,
    Path(id): Path<String>,
) -> ApiResult<Json<Column>> {
    let id = parse_id(&id, "column")?;
    state
        .db()
        .get_column(id)
        .or_internal("Failed to fetch column")?
        .map(Json)
        .ok_or_else(ApiError::column_not_found)
}

/// PUT /columns/{id} - rename
pub(crate) async fn update_column(
    State(state): State<ApiServer>,
    Path(id): Path<String>,
    body: Result<Json<ColumnRequest>, JsonRejection>,
) -> ApiResult<Json<Column>> {
    let id = parse_id(&id, "column")?;
    let name = required_text(json_body(body)?.name, "Column name")?;

    state
        .db()
        .rename_column(id, &name)
        .or_internal("Failed to update column")?
        .map(Json)
        .ok_or_else(ApiError::column_not_found)
}

/// DELETE /columns/{id} - cascades to tasks and subtasks
pub(crate) async fn delete_column(
    State(state): State<ApiServer>,
    Path(id): Path<String>,
) -> ApiResult<Json<DeleteResponse>> {
    let id = parse_id(&id, "column")?;
    if state.db().delete_column(id).or_internal("Failed to delete column")? {
        Ok(DeleteResponse::ok())
    } else {
        Err(ApiError::column_not_found())
    }
}
