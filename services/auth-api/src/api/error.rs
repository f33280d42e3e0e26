//! API 错误响应
//!
//! 统一的 `{"status": "failed", "message": ...}` 错误体，
//! 状态码由 `AppError::status_code` 给出。

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use verigate_errors::AppError;

pub struct ApiError(pub AppError);

impl<E> From<E> for ApiError
where
    E: Into<AppError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        // 响应体只带用户可见消息，不带错误类别前缀
        let message = match &self.0 {
            AppError::NotFound(m)
            | AppError::Validation(m)
            | AppError::Unauthorized(m)
            | AppError::Forbidden(m)
            | AppError::Conflict(m)
            | AppError::Internal(m)
            | AppError::ExternalService(m)
            | AppError::Unavailable(m) => m.clone(),
        };

        (status, Json(json!({ "status": "failed", "message": message }))).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
