use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Extension, Json, Router,
};
use serde_json::Value;

use crate::app::{AppState, Routed};
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::{Numbered, Page, PageRequest};

/// Routes shared by every content type:
/// - `GET  /api/progeny/:progeny_id/<segment>` paged list
/// - `GET  /api/progeny/:progeny_id/<segment>/tags`
/// - `POST /api/<segment>`
/// - `GET|PUT|DELETE /api/<segment>/:id`
pub fn routes<T: Routed>() -> Router<AppState> {
    Router::new()
        .route(&format!("/api/progeny/:progeny_id/{}", T::SEGMENT), get(list::<T>))
        .route(&format!("/api/progeny/:progeny_id/{}/tags", T::SEGMENT), get(tags::<T>))
        .route(&format!("/api/{}", T::SEGMENT), post(create::<T>))
        .route(
            &format!("/api/{}/:id", T::SEGMENT),
            get(get_one::<T>).put(update::<T>).delete(delete::<T>),
        )
}

pub async fn list<T: Routed>(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(progeny_id): Path<i32>,
    Query(request): Query<PageRequest>,
) -> ApiResult<Page<Numbered<T>>> {
    let page_size = state.config.paging.page_size(request.page_size);
    let page = T::service(&state).page(progeny_id, &user.email, &request, page_size).await?;
    Ok(ApiResponse::success(page))
}

pub async fn tags<T: Routed>(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(progeny_id): Path<i32>,
) -> ApiResult<Vec<String>> {
    let service = T::service(&state);
    let access = service.access().resolve(progeny_id, &user.email).await?;
    Ok(ApiResponse::success(service.tags(&access).await?))
}

pub async fn get_one<T: Routed>(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i32>,
) -> ApiResult<T> {
    Ok(ApiResponse::success(T::service(&state).get(id, &user.email).await?))
}

pub async fn create<T: Routed>(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(item): Json<T>,
) -> ApiResult<T> {
    Ok(ApiResponse::success(T::service(&state).create(item, &user.email).await?))
}

pub async fn update<T: Routed>(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i32>,
    Json(changes): Json<Value>,
) -> ApiResult<T> {
    Ok(ApiResponse::success(T::service(&state).update(id, changes, &user.email).await?))
}

pub async fn delete<T: Routed>(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i32>,
) -> ApiResult<T> {
    Ok(ApiResponse::success(T::service(&state).delete(id, &user.email).await?))
}
