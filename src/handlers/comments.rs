use axum::{
    extract::{Path, State},
    routing::{delete, get},
    Extension, Json, Router,
};
use serde::Deserialize;

use crate::app::AppState;
use crate::database::models::{Comment, TimeLineType};
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/timeline/:item_type/:item_id/comments", get(list).post(add))
        .route("/api/comments/:id", delete(remove))
}

#[derive(Debug, Deserialize)]
pub struct NewComment {
    pub comment_text: String,
}

pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path((item_type, item_id)): Path<(TimeLineType, String)>,
) -> ApiResult<Vec<Comment>> {
    Ok(ApiResponse::success(state.comments.list(item_type, &item_id, &user.email).await?))
}

pub async fn add(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path((item_type, item_id)): Path<(TimeLineType, String)>,
    Json(body): Json<NewComment>,
) -> ApiResult<Comment> {
    let comment = state
        .comments
        .add(item_type, &item_id, &body.comment_text, &user.email)
        .await?;
    Ok(ApiResponse::success(comment))
}

pub async fn remove(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i32>,
) -> ApiResult<Comment> {
    Ok(ApiResponse::success(state.comments.delete(id, &user.email).await?))
}
