//! 认证服务
//!
//! 注册、登录、邮箱验证、重发验证链接、修改密码。
//! 登录以 `verified_at` 为闸门；验证与重发在同一邮箱上
//! 通过邮箱级锁串行执行。

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};
use verigate_adapter_email::EmailSender;
use verigate_auth_core::TokenService;
use verigate_common::{Clock, UserId};
use verigate_errors::{AppError, AppResult};

use super::password_service::PasswordService;
use super::store_call;
use super::verification_token_service::VerificationTokenService;
use crate::domain::User;
use crate::domain::repositories::UserRepository;
use crate::domain::value_objects::Email;
use crate::error::AuthError;
use crate::infrastructure::locks::EmailLockRegistry;

/// 注册结果
#[derive(Debug, Clone)]
pub struct RegisterOutcome {
    pub user: User,
    pub access_token: String,
}

/// 认证服务
pub struct AuthService {
    user_repo: Arc<dyn UserRepository>,
    verification: Arc<VerificationTokenService>,
    email_sender: Arc<dyn EmailSender>,
    token_service: Arc<TokenService>,
    clock: Arc<dyn Clock>,
    locks: EmailLockRegistry,
    store_timeout: Duration,
}

impl AuthService {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        verification: Arc<VerificationTokenService>,
        email_sender: Arc<dyn EmailSender>,
        token_service: Arc<TokenService>,
        clock: Arc<dyn Clock>,
        store_timeout: Duration,
    ) -> Self {
        Self {
            user_repo,
            verification,
            email_sender,
            token_service,
            clock,
            locks: EmailLockRegistry::new(),
            store_timeout,
        }
    }

    /// 注册新用户
    ///
    /// 创建未验证用户并签发验证链接邮件。邮件投递失败不阻断
    /// 注册，用户可以随后重发。
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> AppResult<RegisterOutcome> {
        let email = Email::new(email)?;
        info!(email = %email, "Registering user");

        if store_call(self.store_timeout, self.user_repo.exists_by_email(&email)).await? {
            warn!(email = %email, "Registration rejected: email already taken");
            return Err(AuthError::DuplicateEmail.into());
        }

        let password_hash = PasswordService::hash_password(password)?;
        let user = User::new(name, email.clone(), password_hash, self.clock.now());

        match store_call(self.store_timeout, self.user_repo.save(&user)).await {
            Ok(()) => {}
            // exists 检查与 save 之间的并发注册，存储层兜底
            Err(AppError::Conflict(_)) => return Err(AuthError::DuplicateEmail.into()),
            Err(e) => return Err(e),
        }

        if let Err(e) = self.dispatch_verification_email(&user).await {
            warn!(
                email = %email,
                error = %e,
                "Verification email dispatch failed after registration"
            );
        }

        let access_token = self.token_service.generate_access_token(&user.id)?;
        info!(user_id = %user.id, email = %email, "User registered");

        Ok(RegisterOutcome { user, access_token })
    }

    /// 登录
    ///
    /// 凭证正确但邮箱未验证时拒绝登录。
    pub async fn login(&self, email: &str, password: &str) -> AppResult<String> {
        let email = Email::new(email).map_err(|_| AppError::from(AuthError::InvalidCredentials))?;

        let user = store_call(self.store_timeout, self.user_repo.find_by_email(&email))
            .await?
            .ok_or_else(|| AppError::from(AuthError::InvalidCredentials))?;

        if !PasswordService::verify_password(password, &user.password_hash)? {
            warn!(email = %email, "Login failed: bad password");
            return Err(AuthError::InvalidCredentials.into());
        }

        if !user.is_verified() {
            warn!(email = %email, "Login blocked: email not verified");
            return Err(AuthError::EmailNotVerified.into());
        }

        let access_token = self.token_service.generate_access_token(&user.id)?;
        info!(user_id = %user.id, "User logged in");
        Ok(access_token)
    }

    /// 验证邮箱
    ///
    /// 先翻转 `verified_at` 再消费令牌：翻转失败时令牌保留，
    /// 同一链接可以重试。
    pub async fn verify_email(&self, token: &str, email: &str) -> AppResult<User> {
        let email = Email::new(email)?;
        let lock = self.locks.lock_for(email.as_str());
        let _guard = lock.lock().await;

        let mut user = store_call(self.store_timeout, self.user_repo.find_by_email(&email))
            .await?
            .ok_or_else(|| AppError::from(AuthError::UserNotFound))?;

        if user.is_verified() {
            return Err(AuthError::AlreadyVerified.into());
        }

        self.verification.validate(token, email.as_str()).await?;

        user.mark_verified(self.clock.now());
        if let Err(e) = store_call(self.store_timeout, self.user_repo.update(&user)).await {
            return Err(match e {
                AppError::Unavailable(_) => e,
                other => {
                    warn!(email = %email, error = %other, "Verified flip failed, token kept");
                    AuthError::VerificationFailed.into()
                }
            });
        }

        self.verification.consume(email.as_str()).await?;
        info!(user_id = %user.id, email = %email, "Email verified");
        Ok(user)
    }

    /// 重发验证链接
    ///
    /// 覆盖写入顶替旧令牌。这里投递失败要向调用方暴露，
    /// 投递就是本操作的全部意义。
    pub async fn resend_verification(&self, email: &str) -> AppResult<()> {
        let email = Email::new(email)?;
        let lock = self.locks.lock_for(email.as_str());
        let _guard = lock.lock().await;

        let user = store_call(self.store_timeout, self.user_repo.find_by_email(&email))
            .await?
            .ok_or_else(|| AppError::from(AuthError::UserNotFound))?;

        self.dispatch_verification_email(&user).await?;
        info!(email = %email, "Verification link resent");
        Ok(())
    }

    /// 修改密码
    ///
    /// 调用方身份来自请求（bearer 令牌解出的 user_id），
    /// 仍需提供当前密码。
    pub async fn change_password(
        &self,
        user_id: &UserId,
        current_password: &str,
        new_password: &str,
    ) -> AppResult<()> {
        let mut user = store_call(self.store_timeout, self.user_repo.find_by_id(user_id))
            .await?
            .ok_or_else(|| AppError::from(AuthError::UserNotFound))?;

        if !PasswordService::verify_password(current_password, &user.password_hash)? {
            warn!(user_id = %user_id, "Password change rejected: bad current password");
            return Err(AuthError::InvalidCredentials.into());
        }

        user.update_password(PasswordService::hash_password(new_password)?);
        store_call(self.store_timeout, self.user_repo.update(&user)).await?;

        info!(user_id = %user_id, "Password changed");
        Ok(())
    }

    /// 签发令牌并发送验证邮件
    async fn dispatch_verification_email(&self, user: &User) -> AppResult<()> {
        let issued = self.verification.issue(user.email.as_str()).await?;

        let body = format!(
            "Hi {},\n\n\
             Please click the link below to verify your email address:\n\n\
             {}\n\n\
             This link expires in 60 minutes. If you did not create an account, \
             you can ignore this email.",
            user.name, issued.link
        );

        self.email_sender
            .send_text_email(user.email.as_str(), "Verify your email address", &body)
            .await
    }
}
