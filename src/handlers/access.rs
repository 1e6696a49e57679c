use axum::{
    extract::{Path, State},
    routing::{get, put},
    Extension, Json, Router,
};

use crate::app::AppState;
use crate::database::models::UserAccess;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::UserAccessChanges;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/progeny/:progeny_id/access", get(list_for_progeny))
        .route("/api/access", get(list_mine).post(grant))
        .route("/api/access/:id", put(update).delete(revoke))
}

/// GET /api/progeny/:progeny_id/access - Admin view of every grant
pub async fn list_for_progeny(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(progeny_id): Path<i32>,
) -> ApiResult<Vec<UserAccess>> {
    Ok(ApiResponse::success(state.user_access.list_for_progeny(progeny_id, &user.email).await?))
}

pub async fn list_mine(State(state): State<AppState>, Extension(user): Extension<AuthUser>) -> ApiResult<Vec<UserAccess>> {
    Ok(ApiResponse::success(state.user_access.list_mine(&user.email).await?))
}

pub async fn grant(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(grant): Json<UserAccess>,
) -> ApiResult<UserAccess> {
    Ok(ApiResponse::success(state.user_access.grant(grant, &user.email).await?))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i32>,
    Json(changes): Json<UserAccessChanges>,
) -> ApiResult<UserAccess> {
    Ok(ApiResponse::success(state.user_access.update(id, changes, &user.email).await?))
}

/// DELETE /api/access/:id - Admins revoke, grantees may leave
pub async fn revoke(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i32>,
) -> ApiResult<UserAccess> {
    Ok(ApiResponse::success(state.user_access.revoke(id, &user.email).await?))
}
