//! 认证路由

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::AppState;
use super::error::ApiResult;
use crate::domain::User;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/verify_user_email", post(verify_user_email))
        .route(
            "/auth/resend_email_verification_link",
            post(resend_email_verification_link),
        )
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub verified_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.to_string(),
            name: user.name,
            email: user.email.to_string(),
            verified_at: user.verified_at,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub status: String,
    pub user: UserResponse,
    pub access_token: String,
    #[serde(rename = "type")]
    pub token_type: String,
}

async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<RegisterResponse>)> {
    let outcome = state
        .auth_service
        .register(&req.name, &req.email, &req.password)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            status: "success".to_string(),
            user: outcome.user.into(),
            access_token: outcome.access_token,
            token_type: "bearer".to_string(),
        }),
    ))
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub status: String,
    pub access_token: String,
    #[serde(rename = "type")]
    pub token_type: String,
}

async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let access_token = state.auth_service.login(&req.email, &req.password).await?;

    Ok(Json(LoginResponse {
        status: "success".to_string(),
        access_token,
        token_type: "bearer".to_string(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct VerifyEmailRequest {
    pub token: String,
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct VerifyEmailResponse {
    pub status: String,
    pub message: String,
    pub user: UserResponse,
}

async fn verify_user_email(
    State(state): State<AppState>,
    Json(req): Json<VerifyEmailRequest>,
) -> ApiResult<Json<VerifyEmailResponse>> {
    let user = state
        .auth_service
        .verify_email(&req.token, &req.email)
        .await?;

    Ok(Json(VerifyEmailResponse {
        status: "success".to_string(),
        message: "Email verified successfully".to_string(),
        user: user.into(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct ResendVerificationRequest {
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub status: String,
    pub message: String,
}

async fn resend_email_verification_link(
    State(state): State<AppState>,
    Json(req): Json<ResendVerificationRequest>,
) -> ApiResult<Json<MessageResponse>> {
    state.auth_service.resend_verification(&req.email).await?;

    Ok(Json(MessageResponse {
        status: "success".to_string(),
        message: "Verification link sent to your email".to_string(),
    }))
}
