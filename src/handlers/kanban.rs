use axum::{
    extract::{Path, State},
    routing::{get, post},
    Extension, Json, Router,
};
use serde_json::Value;

use crate::app::AppState;
use crate::database::models::KanbanItem;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/kanban_boards/:id/items", get(list))
        .route("/api/kanban_items", post(add))
        .route("/api/kanban_items/:id", get(get_one).put(update).delete(delete))
}

/// GET /api/kanban_boards/:id/items - Cards of a board by column and row
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(board_id): Path<i32>,
) -> ApiResult<Vec<KanbanItem>> {
    Ok(ApiResponse::success(state.kanban_items.list(board_id, &user.email).await?))
}

pub async fn get_one(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i32>,
) -> ApiResult<KanbanItem> {
    Ok(ApiResponse::success(state.kanban_items.get(id, &user.email).await?))
}

pub async fn add(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(item): Json<KanbanItem>,
) -> ApiResult<KanbanItem> {
    Ok(ApiResponse::success(state.kanban_items.add(item, &user.email).await?))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i32>,
    Json(changes): Json<Value>,
) -> ApiResult<KanbanItem> {
    Ok(ApiResponse::success(state.kanban_items.update(id, changes, &user.email).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i32>,
) -> ApiResult<KanbanItem> {
    Ok(ApiResponse::success(state.kanban_items.delete(id, &user.email).await?))
}
