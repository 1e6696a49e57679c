use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::app::AppState;

pub async fn root() -> Json<Value> {
    Json(json!({
        "success": true,
        "data": {
            "name": "KinaUna API",
            "version": env!("CARGO_PKG_VERSION"),
            "description": "Family journaling backend: progeny-scoped content with timeline feeds",
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "progeny": "/api/progeny[/:progeny_id] (bearer or default user)",
                "content": "/api/<type>[/:id], /api/progeny/:progeny_id/<type>",
                "timeline": "/api/progeny/:progeny_id/timeline, /api/timeline/:item_type/:item_id",
                "comments": "/api/timeline/:item_type/:item_id/comments, /api/comments/:id",
                "access": "/api/access[/:id], /api/progeny/:progeny_id/access",
                "groups": "/api/groups[/:id], /api/progeny/:progeny_id/groups",
                "families": "/api/families[/:id]",
                "notifications": "/api/notifications, /api/mobile_notifications, /api/push_devices",
                "users": "/api/users/me",
            }
        }
    }))
}

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.store.health_check().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok",
                    "observers": state.pipeline.observer_names()
                }
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "error": true,
                    "message": "database unavailable",
                    "code": "SERVICE_UNAVAILABLE",
                    "data": {
                        "status": "degraded",
                        "timestamp": now
                    }
                })),
            )
        }
    }
}
