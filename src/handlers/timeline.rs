use axum::{
    extract::{Path, Query, State},
    routing::get,
    Extension, Router,
};
use serde::Deserialize;

use crate::app::AppState;
use crate::database::models::{TimeLineItem, TimeLineType};
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::{Numbered, Page};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/progeny/:progeny_id/timeline", get(feed))
        .route("/api/timeline/:item_type/:item_id", get(by_item))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FeedQuery {
    pub item_type: Option<TimeLineType>,
    pub page: i32,
    pub page_size: usize,
    /// 1 newest first (default), 0 oldest first
    pub sort: Option<i32>,
}

/// GET /api/progeny/:progeny_id/timeline - Paged feed of visible entries
pub async fn feed(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(progeny_id): Path<i32>,
    Query(query): Query<FeedQuery>,
) -> ApiResult<Page<Numbered<TimeLineItem>>> {
    let page_size = state.config.paging.page_size(query.page_size);
    let descending = query.sort.unwrap_or(1) == 1;
    let page = state
        .timeline
        .feed(progeny_id, &user.email, query.item_type, query.page, page_size, descending)
        .await?;
    Ok(ApiResponse::success(page))
}

/// GET /api/timeline/:item_type/:item_id - Feed entry for one source item
pub async fn by_item(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path((item_type, item_id)): Path<(TimeLineType, String)>,
) -> ApiResult<TimeLineItem> {
    Ok(ApiResponse::success(state.timeline.get_visible(item_type, &item_id, &user.email).await?))
}
