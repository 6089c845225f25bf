use axum::{extract::State, Extension, Json};
use chrono::Utc;
use serde_json::{json, Value};

use crate::{
    activity,
    auth::AuthUser,
    dashboard,
    error::AppError,
    models::activity::{ActivityItem, PublicStats},
    response::ApiResponse,
    AppState,
};

/// Owner-scoped feed. Always succeeds; see [`activity::recent_activity`].
pub async fn recent_activity(
    State(state): State<AppState>,
    user: Option<Extension<AuthUser>>,
) -> ApiResponse<Vec<ActivityItem>> {
    let user_id = user.as_ref().map(|Extension(u)| u.user_id.as_str());
    ApiResponse::ok(activity::recent_activity(&state.store, user_id).await)
}

pub async fn public_stats(
    State(state): State<AppState>,
) -> Result<ApiResponse<PublicStats>, AppError> {
    Ok(ApiResponse::ok(dashboard::public_stats(&state.store).await?))
}

pub async fn public_activity(
    State(state): State<AppState>,
) -> Result<ApiResponse<Vec<ActivityItem>>, AppError> {
    Ok(ApiResponse::ok(dashboard::public_activity(&state.store).await?))
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "OK", "timestamp": Utc::now().to_rfc3339() }))
}
