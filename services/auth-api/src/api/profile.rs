//! 账户路由（需要 bearer 认证）

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;

use super::AppState;
use super::auth::MessageResponse;
use super::error::ApiResult;
use super::extract::AuthenticatedUser;

pub fn routes() -> Router<AppState> {
    Router::new().route("/change_password", post(change_password))
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub password: String,
}

async fn change_password(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(req): Json<ChangePasswordRequest>,
) -> ApiResult<Json<MessageResponse>> {
    state
        .auth_service
        .change_password(&user.user_id, &req.current_password, &req.password)
        .await?;

    Ok(Json(MessageResponse {
        status: "success".to_string(),
        message: "Password updated successfully".to_string(),
    }))
}
