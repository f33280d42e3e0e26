//! HTTP 边界层（axum）

pub mod auth;
pub mod error;
pub mod extract;
pub mod profile;

use std::sync::Arc;

use axum::{Json, Router, routing::get};
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use verigate_auth_core::TokenService;

use crate::domain::services::AuthService;

/// 共享应用状态
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService>,
    pub token_service: Arc<TokenService>,
}

/// 构建完整路由
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(auth::routes())
        .merge(profile::routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}
