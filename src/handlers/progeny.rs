use axum::{
    extract::{Path, Query, State},
    routing::get,
    Extension, Json, Router,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::app::AppState;
use crate::database::models::{CalendarItem, Progeny, TimeLineType};
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::sleep_stats::{SleepChartDay, SleepStats};
use crate::services::ProgenyAccess;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/progeny", get(list_mine).post(create))
        .route("/api/progeny/:progeny_id", get(get_one).put(update).delete(delete))
        .route("/api/progeny/:progeny_id/tags", get(tags))
        .route("/api/progeny/:progeny_id/sleep/stats", get(sleep_stats))
        .route("/api/progeny/:progeny_id/sleep/chart", get(sleep_chart))
        .route("/api/progeny/:progeny_id/calendar/upcoming", get(upcoming_events))
}

/// GET /api/progeny - Progeny the caller can see, with their level on each
pub async fn list_mine(State(state): State<AppState>, Extension(user): Extension<AuthUser>) -> ApiResult<Vec<ProgenyAccess>> {
    Ok(ApiResponse::success(state.progeny.list_mine(&user.email).await?))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(progeny): Json<Progeny>,
) -> ApiResult<Progeny> {
    let email = user.signed_in()?;
    Ok(ApiResponse::success(state.progeny.create(progeny, email).await?))
}

pub async fn get_one(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(progeny_id): Path<i32>,
) -> ApiResult<ProgenyAccess> {
    Ok(ApiResponse::success(state.progeny.get(progeny_id, &user.email).await?))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(progeny_id): Path<i32>,
    Json(changes): Json<Value>,
) -> ApiResult<Progeny> {
    Ok(ApiResponse::success(state.progeny.update(progeny_id, changes, &user.email).await?))
}

/// DELETE /api/progeny/:progeny_id - Removes the progeny and everything scoped to it
pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(progeny_id): Path<i32>,
) -> ApiResult<Progeny> {
    Ok(ApiResponse::success(state.progeny.delete(progeny_id, &user.email).await?))
}

#[derive(Debug, Deserialize)]
pub struct TagsQuery {
    pub item_type: Option<TimeLineType>,
}

/// GET /api/progeny/:progeny_id/tags - Autosuggest source over visible items
pub async fn tags(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(progeny_id): Path<i32>,
    Query(query): Query<TagsQuery>,
) -> ApiResult<Vec<String>> {
    let access = state.access.resolve(progeny_id, &user.email).await?;
    Ok(ApiResponse::success(state.content.tags(&access, query.item_type).await?))
}

pub async fn sleep_stats(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(progeny_id): Path<i32>,
) -> ApiResult<SleepStats> {
    let stats = state.content.sleep.stats(progeny_id, &user.email, &state.users).await?;
    Ok(ApiResponse::success(stats))
}

#[derive(Debug, Deserialize)]
pub struct ChartQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

pub async fn sleep_chart(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(progeny_id): Path<i32>,
    Query(query): Query<ChartQuery>,
) -> ApiResult<Vec<SleepChartDay>> {
    let days = state
        .content
        .sleep
        .chart(progeny_id, &user.email, &state.users, query.from, query.to)
        .await?;
    Ok(ApiResponse::success(days))
}

#[derive(Debug, Deserialize)]
pub struct UpcomingQuery {
    pub count: Option<usize>,
}

pub async fn upcoming_events(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(progeny_id): Path<i32>,
    Query(query): Query<UpcomingQuery>,
) -> ApiResult<Vec<CalendarItem>> {
    let count = state.config.paging.page_size(query.count.unwrap_or(0));
    let events = state.content.calendar.upcoming(progeny_id, &user.email, Utc::now(), count).await?;
    Ok(ApiResponse::success(events))
}
