use axum::{
    extract::{Extension, Path, State},
    Json,
};

use crate::auth::{self, AccessDecision, AuthenticatedIdentity};
use crate::error::ApiError;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::models::{Task, TaskCreate, TaskUpdate};
use crate::state::AppState;

/// GET /api/:user_id/tasks - list the authenticated user's tasks
pub async fn task_list(
    State(state): State<AppState>,
    Extension(identity): Extension<AuthenticatedIdentity>,
) -> ApiResult<Vec<Task>> {
    let tasks = state.store.list(&identity.subject).await;
    tracing::debug!("Listed {} tasks for subject '{}'", tasks.len(), identity.subject);
    Ok(ApiResponse::success(tasks))
}

/// POST /api/:user_id/tasks - create a task owned by the authenticated user
pub async fn task_create(
    State(state): State<AppState>,
    Extension(identity): Extension<AuthenticatedIdentity>,
    Json(payload): Json<TaskCreate>,
) -> ApiResult<Task> {
    payload
        .validate()
        .map_err(|field_errors| ApiError::unprocessable_entity("Invalid task data", field_errors))?;

    // Owner comes from the token subject; the payload has no say.
    let task = state.store.create(&identity.subject, payload).await;
    tracing::info!("Created task {} for subject '{}'", task.id, identity.subject);
    Ok(ApiResponse::created(task))
}

/// GET /api/:user_id/tasks/:task_id - show a single task
pub async fn task_get(
    State(state): State<AppState>,
    Extension(identity): Extension<AuthenticatedIdentity>,
    Path((_, task_id)): Path<(String, i64)>,
) -> ApiResult<Task> {
    let task = state
        .store
        .get(&identity.subject, task_id)
        .await
        .ok_or_else(task_not_found)?;

    ensure_stored_owner(&task, &identity)?;
    Ok(ApiResponse::success(task))
}

/// PUT /api/:user_id/tasks/:task_id - update a task
pub async fn task_update(
    State(state): State<AppState>,
    Extension(identity): Extension<AuthenticatedIdentity>,
    Path((_, task_id)): Path<(String, i64)>,
    Json(payload): Json<TaskUpdate>,
) -> ApiResult<Task> {
    payload
        .validate()
        .map_err(|field_errors| ApiError::unprocessable_entity("Invalid task data", field_errors))?;

    let task = state
        .store
        .update(&identity.subject, task_id, payload)
        .await
        .ok_or_else(task_not_found)?;

    ensure_stored_owner(&task, &identity)?;
    tracing::info!("Updated task {} for subject '{}'", task.id, identity.subject);
    Ok(ApiResponse::success(task))
}

/// DELETE /api/:user_id/tasks/:task_id - delete a task
pub async fn task_delete(
    State(state): State<AppState>,
    Extension(identity): Extension<AuthenticatedIdentity>,
    Path((_, task_id)): Path<(String, i64)>,
) -> ApiResult<()> {
    if !state.store.delete(&identity.subject, task_id).await {
        return Err(task_not_found());
    }

    tracing::info!("Deleted task {} for subject '{}'", task_id, identity.subject);
    Ok(ApiResponse::no_content())
}

/// PATCH /api/:user_id/tasks/:task_id/complete - toggle completion status
pub async fn task_toggle_completed(
    State(state): State<AppState>,
    Extension(identity): Extension<AuthenticatedIdentity>,
    Path((_, task_id)): Path<(String, i64)>,
) -> ApiResult<Task> {
    let task = state
        .store
        .toggle_completed(&identity.subject, task_id)
        .await
        .ok_or_else(task_not_found)?;

    ensure_stored_owner(&task, &identity)?;
    tracing::info!(
        "Toggled task {} to completed={} for subject '{}'",
        task.id,
        task.completed,
        identity.subject
    );
    Ok(ApiResponse::success(task))
}

/// Uniform not-found policy: a missing task and a foreign-owned task get
/// the same response, so by-id probing cannot reveal other users' records.
fn task_not_found() -> ApiError {
    ApiError::not_found("Task not found")
}

/// Defense in depth: re-check the stored owner even though the store
/// already filters by subject. Guards any future lookup path that is not
/// owner-scoped. A denial here maps to the same uniform 404.
fn ensure_stored_owner(task: &Task, identity: &AuthenticatedIdentity) -> Result<(), ApiError> {
    match auth::authorize_resource(&task.user_id, identity) {
        AccessDecision::Allow => Ok(()),
        AccessDecision::Deny(reason) => {
            tracing::warn!(
                "Stored owner mismatch on task {} fetched by subject '{}': {:?}",
                task.id,
                identity.subject,
                reason
            );
            Err(task_not_found())
        }
    }
}
