//! Task routes: `/columns/{id}/tasks`, `/tasks/{id}`.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::Deserialize;

use super::extract::{
    DeleteResponse, json_body, non_empty_text, nullable, parse_id, required_text,
};
use super::server::ApiServer;
use crate::error::{ApiError, ApiResult, ResultExt};
use crate::types::{Id, NewTask, Order, Task, TaskUpdate};

#[derive(Debug, Deserialize)]
pub(crate) struct CreateTaskRequest {
    title: Option<String>,
    description: Option<String>,
}

/// Partial update; absent fields are left unchanged, `"description": null` clears.
#[derive(Debug, Deserialize)]
pub(crate) struct UpdateTaskRequest {
    title: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    description: Option<Option<String>>,
    column_id: Option<Id>,
    order: Option<Order>,
}

/// GET /columns/{id}/tasks - in display order, with live subtask counts
pub(crate) async fn list_column_tasks(
    State(state): State<ApiServer>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<Task>>> {
    let column_id = parse_id(&id, "column")?;
    if state
        .db()
        .get_column(column_id)
        .or_internal("Failed to fetch tasks")?
        .is_none()
    {
        return Err(ApiError::column_not_found());
    }

    let tasks = state
        .db()
        .list_tasks(column_id)
        .or_internal("Failed to fetch tasks")?;
    Ok(Json(tasks))
}

/// POST /columns/{id}/tasks - append a task
pub(crate) async fn create_column_task(
    State(state): State<ApiServer>,
    Path(id): Path<String>,
    body: Result<Json<CreateTaskRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    let column_id = parse_id(&id, "column")?;
    if state
        .db()
        .get_column(column_id)
        .or_internal("Failed to create task")?
        .is_none()
    {
        return Err(ApiError::column_not_found());
    }

    let body = json_body(body)?;
    let task = NewTask {
        title: required_text(body.title, "Task title")?,
        description: body.description,
    };

    let task = state
        .db()
        .create_task(column_id, task)
        .or_internal("Failed to create task")?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// GET /tasks/{id}
pub(crate) async fn get_task(
    State(state): State<ApiServer>,
    Path(id): Path<String>,
) -> ApiResult<Json<Task>> {
    let id = parse_id(&id, "task")?;
    state
        .db()
        .get_task(id)
        .or_internal("Failed to fetch task")?
        .map(Json)
        .ok_or_else(ApiError::task_not_found)
}

/// PUT /tasks/{id} - partial update, including moving between columns
pub(crate) async fn update_task(
    State(state): State<ApiServer>,
    Path(id): Path<String>,
    body: Result<Json<UpdateTaskRequest>, JsonRejection>,
) -> ApiResult<Json<Task>> {
    let id = parse_id(&id, "task")?;
    let body = json_body(body)?;
    let update = TaskUpdate {
        title: non_empty_text(body.title, "Task title")?,
        description: body.description,
        column_id: body.column_id,
        order: body.order,
    };

    state
        .db()
        .update_task(id, update)
        .or_internal("Failed to update task")?
        .map(Json)
        .ok_or_else(ApiError::task_not_found)
}

/// DELETE /tasks/{id} - cascades to subtasks
pub(crate) async fn delete_task(
    State(state): State<ApiServer>,
    Path(id): Path<String>,
) -> ApiResult<Json<DeleteResponse>> {
    let id = parse_id(&id, "task")?;
    if state.db().delete_task(id).or_internal("Failed to delete task")? {
        Ok(DeleteResponse::ok())
    } else {
        Err(ApiError::task_not_found())
    }
}
