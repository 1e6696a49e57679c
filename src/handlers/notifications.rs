use axum::{
    extract::{Path, Query, State},
    routing::{delete, get, post, put},
    Extension, Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::app::AppState;
use crate::database::models::{MobileNotification, PushDevice, WebNotification};
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::{Numbered, Page};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/notifications", get(web_inbox))
        .route("/api/notifications/:id", delete(delete_web))
        .route("/api/notifications/:id/read", put(set_read))
        .route("/api/mobile_notifications", get(mobile_inbox))
        .route("/api/push_devices", post(register_device))
        .route("/api/push_devices/:device_id", delete(unregister_device))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct InboxQuery {
    pub page: i32,
    pub page_size: usize,
    pub unread: bool,
}

/// GET /api/notifications - Newest first
pub async fn web_inbox(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<InboxQuery>,
) -> ApiResult<Page<Numbered<WebNotification>>> {
    let email = user.signed_in()?;
    let page_size = state.config.paging.page_size(query.page_size);
    let page = state.notifications.web_inbox(email, query.page, page_size, query.unread).await?;
    Ok(ApiResponse::success(page))
}

#[derive(Debug, Deserialize)]
pub struct ReadFlag {
    #[serde(default = "default_read")]
    pub is_read: bool,
}

fn default_read() -> bool {
    true
}

pub async fn set_read(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i32>,
    Json(flag): Json<ReadFlag>,
) -> ApiResult<WebNotification> {
    let email = user.signed_in()?;
    Ok(ApiResponse::success(state.notifications.set_read(id, email, flag.is_read).await?))
}

pub async fn delete_web(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i32>,
) -> ApiResult<WebNotification> {
    let email = user.signed_in()?;
    Ok(ApiResponse::success(state.notifications.delete_web(id, email).await?))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct MobileQuery {
    /// 0 uses the default page size
    pub limit: usize,
}

pub async fn mobile_inbox(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<MobileQuery>,
) -> ApiResult<Vec<MobileNotification>> {
    let email = user.signed_in()?;
    let limit = state.config.paging.page_size(query.limit);
    Ok(ApiResponse::success(state.notifications.mobile_inbox(email, limit).await?))
}

pub async fn register_device(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(device): Json<PushDevice>,
) -> ApiResult<PushDevice> {
    let email = user.signed_in()?;
    Ok(ApiResponse::success(state.notifications.register_device(email, device).await?))
}

pub async fn unregister_device(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(device_id): Path<String>,
) -> ApiResult<Value> {
    let email = user.signed_in()?;
    let removed = state.notifications.unregister_device(email, &device_id).await?;
    Ok(ApiResponse::success(json!({ "device_id": device_id, "removed": removed })))
}
