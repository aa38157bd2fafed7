//! Subtask routes: `/tasks/{id}/subtasks`, `/subtasks/{id}`.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::Deserialize;

use super::extract::{DeleteResponse, json_body, non_empty_text, parse_id, required_text};
use super::server::ApiServer;
use crate::error::{ApiError, ApiResult, ResultExt};
use crate::types::{Id, Subtask, SubtaskUpdate};

#[derive(Debug, Deserialize)]
pub(crate) struct CreateSubtaskRequest {
    title: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UpdateSubtaskRequest {
    title: Option<String>,
    is_completed: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ReorderSubtasksRequest {
    subtask_ids: Option<Vec<Id>>,
}

fn ensure_task(state: &ApiServer, task_id: Id, context: &str) -> ApiResult<()> {
    match state.db().get_task(task_id).or_internal(context)? {
        Some(_) => Ok(()),
        None => Err(ApiError::task_not_found()),
    }
}

/// GET /tasks/{id}/subtasks - in display order
pub(crate) async fn list_task_subtasks(
    State(state): State<ApiServer>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<Subtask>>> {
    let task_id = parse_id(&id, "task")?;
    ensure_task(&state, task_id, "Failed to fetch subtasks")?;

    let subtasks = state
        .db()
        .list_subtasks(task_id)
        .or_internal("Failed to fetch subtasks")?;
    Ok(Json(subtasks))
}

/// POST /tasks/{id}/subtasks - append an incomplete subtask
pub(crate) async fn create_task_subtask(
    State(state): State<ApiServer>,
    Path(id): Path<String>,
    body: Result<Json<CreateSubtaskRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Subtask>)> {
    let task_id = parse_id(&id, "task")?;
    ensure_task(&state, task_id, "Failed to create subtask")?;
    let title = required_text(json_body(body)?.title, "Subtask title")?;

    let subtask = state
        .db()
        .create_subtask(task_id, &title)
        .or_internal("Failed to create subtask")?;
    Ok((StatusCode::CREATED, Json(subtask)))
}

/// PATCH /tasks/{id}/subtasks - reorder: `{"subtaskIds": [3, 1, 2]}`
pub(crate) async fn reorder_task_subtasks(
    State(state): State<ApiServer>,
    Path(id): Path<String>,
    body: Result<Json<ReorderSubtasksRequest>, JsonRejection>,
) -> ApiResult<Json<Vec<Subtask>>> {
    let task_id = parse_id(&id, "task")?;
    let subtask_ids = json_body(body)?
        .subtask_ids
        .ok_or_else(|| ApiError::missing_field("Subtask IDs array"))?;
    ensure_task(&state, task_id, "Failed to reorder subtasks")?;

    let subtasks = state
        .db()
        .reorder_subtasks(task_id, &subtask_ids)
        .or_internal("Failed to reorder subtasks")?;
    Ok(Json(subtasks))
}

/// GET /subtasks/{id}
pub(crate) async fn get_subtask(
    State(state): State<ApiServer>,
    Path(id): Path<String>,
) -> ApiResult<Json<Subtask>> {
    let id = parse_id(&id, "subtask")?;
    state
        .db()
        .get_subtask(id)
        .or_internal("Failed to fetch subtask")?
        .map(Json)
        .ok_or_else(ApiError::subtask_not_found)
}

/// PUT /subtasks/{id} - update title and/or completion
pub(crate) async fn update_subtask(
    State(state): State<ApiServer>,
    Path(id): Path<String>,
    body: Result<Json<UpdateSubtaskRequest>, JsonRejection>,
) -> ApiResult<Json<Subtask>> {
    let id = parse_id(&id, "subtask")?;
    let body = json_body(body)?;
    let update = SubtaskUpdate {
        title: non_empty_text(body.title, "Subtask title")?,
        is_completed: body.is_completed,
    };

    state
        .db()
        .update_subtask(id, update)
        .or_internal("Failed to update subtask")?
        .map(Json)
        .ok_or_else(ApiError::subtask_not_found)
}

/// PATCH /subtasks/{id} - flip completion
pub(crate) async fn toggle_subtask(
    State(state): State<ApiServer>,
    Path(id): Path<String>,
) -> ApiResult<Json<Subtask>> {
    let id = parse_id(&id, "subtask")?;
    state
        .db()
        .toggle_subtask(id)
        .or_internal("Failed to toggle subtask completion")?
        .map(Json)
        .ok_or_else(ApiError::subtask_not_found)
}

/// DELETE /subtasks/{id}
pub(crate) async fn delete_subtask(
    State(state): State<ApiServer>,
    Path(id): Path<String>,
) -> ApiResult<Json<DeleteResponse>> {
    let id = parse_id(&id, "subtask")?;
    if state
        .db()
        .delete_subtask(id)
        .or_internal("Failed to delete subtask")?
    {
        Ok(DeleteResponse::ok())
    } else {
        Err(ApiError::subtask_not_found())
    }
}
