//! HTTP 层测试（路由直接喂请求，不起监听）

use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use chrono::Utc;
use http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::util::ServiceExt;
use verigate_adapter_email::EmailSender;
use verigate_auth_core::TokenService;
use verigate_common::FixedClock;
use verigate_config::VerificationConfig;
use verigate_errors::AppResult;

use auth_api::api::{self, AppState};
use auth_api::domain::services::{AuthService, VerificationTokenService};
use auth_api::infrastructure::persistence::{
    InMemoryUserRepository, InMemoryVerificationTokenRepository,
};

#[derive(Default)]
struct CapturingEmailSender {
    bodies: Mutex<Vec<String>>,
}

impl CapturingEmailSender {
    fn last_token(&self) -> String {
        let bodies = self.bodies.lock().unwrap();
        let body = bodies.last().expect("no email captured");
        let start = body.find("token=").unwrap() + "token=".len();
        let rest = &body[start..];
        rest[..rest.find('&').unwrap()].to_string()
    }
}

#[async_trait]
impl EmailSender for CapturingEmailSender {
    async fn send_text_email(&self, _to: &str, _subject: &str, body: &str) -> AppResult<()> {
        self.bodies.lock().unwrap().push(body.to_string());
        Ok(())
    }
}

fn build_app() -> (Router, Arc<CapturingEmailSender>) {
    let clock = Arc::new(FixedClock::new(Utc::now()));
    let sender = Arc::new(CapturingEmailSender::default());

    let verification = Arc::new(VerificationTokenService::new(
        Arc::new(InMemoryVerificationTokenRepository::new()),
        clock.clone(),
        VerificationConfig {
            token_expires_minutes: 60,
            link_base_url: "http://localhost:8080/auth/verify".to_string(),
            store_timeout_secs: 5,
        },
    ));
    let token_service = Arc::new(TokenService::new(
        "test-secret-key-at-least-32-chars-long",
        3600,
        "verigate".to_string(),
        "verigate-clients".to_string(),
    ));
    let auth_service = Arc::new(AuthService::new(
        Arc::new(InMemoryUserRepository::new()),
        verification,
        sender.clone(),
        token_service.clone(),
        clock,
        Duration::from_secs(5),
    ));

    let app = api::router(AppState {
        auth_service,
        token_service,
    });

    (app, sender)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn post_json_bearer(uri: &str, token: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn register_body(email: &str) -> Value {
    json!({ "name": "Alice", "email": email, "password": "secret123" })
}

#[tokio::test]
async fn test_health() {
    let (app, _) = build_app();

    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "ok");
}

#[tokio::test]
async fn test_register_returns_created_with_bearer_token() {
    let (app, _) = build_app();

    let response = app
        .oneshot(post_json(
            "/auth/register",
            register_body("alice@example.com"),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["status"], "success");
    assert_eq!(body["type"], "bearer");
    assert_eq!(body["user"]["email"], "alice@example.com");
    assert!(body["user"]["verified_at"].is_null());
    assert!(!body["access_token"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_register_duplicate_email_conflicts() {
    let (app, _) = build_app();

    app.clone()
        .oneshot(post_json(
            "/auth/register",
            register_body("alice@example.com"),
        ))
        .await
        .unwrap();

    let response = app
        .oneshot(post_json(
            "/auth/register",
            register_body("alice@example.com"),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = body_json(response).await;
    assert_eq!(body["status"], "failed");
    assert!(body["message"].as_str().unwrap().contains("already exists"));
}

#[tokio::test]
async fn test_login_before_verification_is_forbidden() {
    let (app, _) = build_app();

    app.clone()
        .oneshot(post_json(
            "/auth/register",
            register_body("alice@example.com"),
        ))
        .await
        .unwrap();

    let response = app
        .oneshot(post_json(
            "/auth/login",
            json!({ "email": "alice@example.com", "password": "secret123" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_json(response).await;
    assert_eq!(body["status"], "failed");
    assert!(body["message"].as_str().unwrap().contains("not verified"));
}

#[tokio::test]
async fn test_login_with_bad_credentials_is_unauthorized() {
    let (app, _) = build_app();

    let response = app
        .oneshot(post_json(
            "/auth/login",
            json!({ "email": "ghost@example.com", "password": "secret123" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["status"], "failed");
}

#[tokio::test]
async fn test_verify_with_bad_token_is_rejected() {
    let (app, _) = build_app();

    app.clone()
        .oneshot(post_json(
            "/auth/register",
            register_body("alice@example.com"),
        ))
        .await
        .unwrap();

    let response = app
        .oneshot(post_json(
            "/auth/verify_user_email",
            json!({ "token": "0".repeat(64), "email": "alice@example.com" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(
        body["message"]
            .as_str()
            .unwrap()
            .contains("Invalid verification token")
    );
}

#[tokio::test]
async fn test_full_flow_verify_login_change_password() {
    let (app, sender) = build_app();

    app.clone()
        .oneshot(post_json(
            "/auth/register",
            register_body("alice@example.com"),
        ))
        .await
        .unwrap();
    let token = sender.last_token();

    // 验证邮箱
    let response = app
        .clone()
        .oneshot(post_json(
            "/auth/verify_user_email",
            json!({ "token": token, "email": "alice@example.com" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "success");
    assert!(!body["user"]["verified_at"].is_null());

    // 登录
    let response = app
        .clone()
        .oneshot(post_json(
            "/auth/login",
            json!({ "email": "alice@example.com", "password": "secret123" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let login = body_json(response).await;
    assert_eq!(login["type"], "bearer");
    let access_token = login["access_token"].as_str().unwrap().to_string();

    // 带 bearer 修改密码
    let response = app
        .clone()
        .oneshot(post_json_bearer(
            "/change_password",
            &access_token,
            json!({ "current_password": "secret123", "password": "newsecret456" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // 新密码可登录
    let response = app
        .oneshot(post_json(
            "/auth/login",
            json!({ "email": "alice@example.com", "password": "newsecret456" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_change_password_requires_bearer_token() {
    let (app, _) = build_app();

    let response = app
        .oneshot(post_json(
            "/change_password",
            json!({ "current_password": "secret123", "password": "newsecret456" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["status"], "failed");
    assert!(body["message"].as_str().unwrap().contains("bearer token"));
}

#[tokio::test]
async fn test_resend_issues_fresh_link() {
    let (app, sender) = build_app();

    app.clone()
        .oneshot(post_json(
            "/auth/register",
            register_body("alice@example.com"),
        ))
        .await
        .unwrap();
    let first = sender.last_token();

    let response = app
        .clone()
        .oneshot(post_json(
            "/auth/resend_email_verification_link",
            json!({ "email": "alice@example.com" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let second = sender.last_token();
    assert_ne!(first, second);

    // 旧链接已作废
    let response = app
        .oneshot(post_json(
            "/auth/verify_user_email",
            json!({ "token": first, "email": "alice@example.com" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
