use axum::{
    extract::{Path, State},
    routing::get,
    Extension, Json, Router,
};
use serde_json::Value;

use crate::app::AppState;
use crate::database::models::UserGroup;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/progeny/:progeny_id/groups", get(list_for_progeny))
        .route("/api/groups", get(list_mine).post(create))
        .route("/api/groups/:id", get(get_one).put(update).delete(delete))
}

pub async fn list_for_progeny(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(progeny_id): Path<i32>,
) -> ApiResult<Vec<UserGroup>> {
    Ok(ApiResponse::success(state.groups.list_for_progeny(progeny_id, &user.email).await?))
}

/// GET /api/groups - Groups the caller belongs to
pub async fn list_mine(State(state): State<AppState>, Extension(user): Extension<AuthUser>) -> ApiResult<Vec<UserGroup>> {
    Ok(ApiResponse::success(state.groups.list_mine(&user.email).await?))
}

pub async fn get_one(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i32>,
) -> ApiResult<UserGroup> {
    Ok(ApiResponse::success(state.groups.get(id, &user.email).await?))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(group): Json<UserGroup>,
) -> ApiResult<UserGroup> {
    Ok(ApiResponse::success(state.groups.create(group, &user.email).await?))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i32>,
    Json(changes): Json<Value>,
) -> ApiResult<UserGroup> {
    Ok(ApiResponse::success(state.groups.update(id, changes, &user.email).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i32>,
) -> ApiResult<UserGroup> {
    Ok(ApiResponse::success(state.groups.delete(id, &user.email).await?))
}
