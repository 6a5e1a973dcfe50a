use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use tracing::{instrument, warn};
use uuid::Uuid;

use crate::{
    auth::services::AuthUser,
    error::{AppError, AppResult},
    state::AppState,
    tasks::dto::{MutationResult, TaskPayload},
    tasks::repo_types::Task,
    tasks::services::validate_payload,
};

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/tasks", get(list_tasks))
        .route("/tasks/:id", get(get_task))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/tasks", post(create_task))
        .route("/tasks/:id", put(update_task).delete(delete_task))
}

#[instrument(skip(state, user))]
pub async fn list_tasks(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<Vec<Task>>> {
    let tasks = Task::list_by_user(&state.db, user.id).await?;
    Ok(Json(tasks))
}

#[instrument(skip(state, user))]
pub async fn get_task(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Task>> {
    let task = Task::find_by_id(&state.db, user.id, id)
        .await?
        .ok_or(AppError::NotFoundOrForbidden)?;
    Ok(Json(task))
}

#[instrument(skip(state, user, payload))]
pub async fn create_task(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<TaskPayload>,
) -> AppResult<(StatusCode, Json<Task>)> {
    let input = validate_payload(payload)?;
    let task = Task::insert(&state.db, user.id, &input.title, &input.content, input.status).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

#[instrument(skip(state, user, payload))]
pub async fn update_task(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<TaskPayload>,
) -> AppResult<Json<Task>> {
    let input = validate_payload(payload)?;
    let task = Task::update(
        &state.db,
        user.id,
        id,
        &input.title,
        &input.content,
        input.status,
    )
    .await?
    .ok_or_else(|| {
        warn!(user_id = %user.id, task_id = %id, "update matched no row");
        AppError::NotFoundOrForbidden
    })?;
    Ok(Json(task))
}

#[instrument(skip(state, user))]
pub async fn delete_task(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<MutationResult>> {
    let affected = Task::delete(&state.db, user.id, id).await?;
    if affected == 0 {
        warn!(user_id = %user.id, task_id = %id, "delete matched no row");
        return Err(AppError::NotFoundOrForbidden);
    }
    Ok(Json(MutationResult { success: true }))
}
