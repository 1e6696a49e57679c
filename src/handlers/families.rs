use axum::{
    extract::{Path, State},
    routing::{get, post},
    Extension, Json, Router,
};
use serde_json::Value;

use crate::app::AppState;
use crate::database::models::Family;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/families", get(list_mine).post(create))
        .route("/api/families/:id", get(get_one).put(update).delete(delete))
        .route(
            "/api/families/:id/progeny/:progeny_id",
            post(add_progeny).delete(remove_progeny),
        )
}

pub async fn list_mine(State(state): State<AppState>, Extension(user): Extension<AuthUser>) -> ApiResult<Vec<Family>> {
    Ok(ApiResponse::success(state.families.list_mine(&user.email).await?))
}

pub async fn get_one(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i32>,
) -> ApiResult<Family> {
    Ok(ApiResponse::success(state.families.get(id, &user.email).await?))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(family): Json<Family>,
) -> ApiResult<Family> {
    let email = user.signed_in()?;
    Ok(ApiResponse::success(state.families.create(family, email).await?))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i32>,
    Json(changes): Json<Value>,
) -> ApiResult<Family> {
    Ok(ApiResponse::success(state.families.update(id, changes, &user.email).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i32>,
) -> ApiResult<Family> {
    Ok(ApiResponse::success(state.families.delete(id, &user.email).await?))
}

pub async fn add_progeny(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path((id, progeny_id)): Path<(i32, i32)>,
) -> ApiResult<Family> {
    Ok(ApiResponse::success(state.families.add_progeny(id, progeny_id, &user.email).await?))
}

pub async fn remove_progeny(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path((id, progeny_id)): Path<(i32, i32)>,
) -> ApiResult<Family> {
    Ok(ApiResponse::success(state.families.remove_progeny(id, progeny_id, &user.email).await?))
}
