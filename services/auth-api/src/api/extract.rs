//! 请求级身份提取
//!
//! 受保护的端点显式声明 `AuthenticatedUser` 参数，身份始终
//! 来自当前请求的 bearer 令牌，不存在进程级的"当前用户"。

use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;
use verigate_common::UserId;
use verigate_errors::AppError;

use super::AppState;
use super::error::ApiError;

/// 已认证的调用方
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
}

impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or_else(|| AppError::unauthorized("Missing bearer token"))?;

        let claims = state.token_service.validate_access_token(token)?;
        let user_id = claims.user_id()?;

        Ok(Self { user_id })
    }
}
