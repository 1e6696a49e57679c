use axum::{extract::State, routing::get, Extension, Json, Router};
use serde_json::{json, Value};

use crate::app::AppState;
use crate::database::models::UserInfo;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/users/me", get(whoami).put(update_profile))
}

/// GET /api/users/me - Caller identity plus stored profile
pub async fn whoami(State(state): State<AppState>, Extension(user): Extension<AuthUser>) -> ApiResult<Value> {
    let profile = state.users.profile(&user.email).await?;
    Ok(ApiResponse::success(json!({
        "email": user.email,
        "name": user.name,
        "anonymous": user.anonymous,
        "profile": profile,
    })))
}

pub async fn update_profile(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(info): Json<UserInfo>,
) -> ApiResult<UserInfo> {
    let email = user.signed_in()?;
    Ok(ApiResponse::success(state.users.save(email, info).await?))
}
