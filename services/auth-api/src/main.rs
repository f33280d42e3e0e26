//! verigate auth-api 服务入口

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use secrecy::ExposeSecret;
use tracing::info;
use verigate_adapter_email::EmailClient;
use verigate_auth_core::TokenService;
use verigate_common::SystemClock;
use verigate_config::AppConfig;
use verigate_telemetry::{init_tracing, init_tracing_json};

use auth_api::api::{self, AppState};
use auth_api::domain::services::{AuthService, VerificationTokenService};
use auth_api::infrastructure::persistence::{
    InMemoryUserRepository, InMemoryVerificationTokenRepository,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load("config")?;

    if config.is_production() {
        init_tracing_json(&config.telemetry.log_level);
    } else {
        init_tracing(&config.telemetry.log_level);
    }

    info!(app = %config.app_name, env = %config.app_env, "Starting auth-api");

    // 1. 基础设施
    let clock = Arc::new(SystemClock);
    let user_repo = Arc::new(InMemoryUserRepository::new());
    let token_repo = Arc::new(InMemoryVerificationTokenRepository::new());
    let email_client = Arc::new(EmailClient::new(config.email.clone()));

    // 2. 领域服务
    let verification = Arc::new(VerificationTokenService::new(
        token_repo,
        clock.clone(),
        config.verification.clone(),
    ));
    let token_service = Arc::new(TokenService::new(
        config.jwt.secret.expose_secret(),
        config.jwt.expires_in,
        config.jwt.issuer.clone(),
        config.jwt.audience.clone(),
    ));
    let auth_service = Arc::new(AuthService::new(
        user_repo,
        verification,
        email_client,
        token_service.clone(),
        clock,
        Duration::from_secs(config.verification.store_timeout_secs),
    ));

    // 3. HTTP 服务
    let app = api::router(AppState {
        auth_service,
        token_service,
    });

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    info!(%addr, "auth-api listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
