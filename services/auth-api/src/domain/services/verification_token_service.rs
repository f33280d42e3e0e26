//! 邮箱验证令牌服务
//!
//! 签发、校验、消费验证令牌。令牌 32 字节随机数（hex 编码），
//! 存储只保留 SHA-256 哈希。

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::Rng;
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};
use verigate_common::Clock;
use verigate_config::VerificationConfig;
use verigate_errors::{AppError, AppResult};

use super::store_call;
use crate::domain::VerificationToken;
use crate::domain::repositories::VerificationTokenRepository;
use crate::error::AuthError;

/// 一次签发的结果
#[derive(Debug, Clone)]
pub struct IssuedVerification {
    /// 原始令牌（只出现在链接里，不落盘）
    pub token: String,
    /// 验证链接
    pub link: String,
    /// 过期时间
    pub expires_at: DateTime<Utc>,
}

/// 邮箱验证令牌服务
pub struct VerificationTokenService {
    token_repo: Arc<dyn VerificationTokenRepository>,
    clock: Arc<dyn Clock>,
    config: VerificationConfig,
}

impl VerificationTokenService {
    pub fn new(
        token_repo: Arc<dyn VerificationTokenRepository>,
        clock: Arc<dyn Clock>,
        config: VerificationConfig,
    ) -> Self {
        Self {
            token_repo,
            clock,
            config,
        }
    }

    fn store_timeout(&self) -> Duration {
        Duration::from_secs(self.config.store_timeout_secs)
    }

    /// 签发验证令牌
    ///
    /// 同一邮箱的旧令牌在存储的覆盖写入中被删除，每个邮箱
    /// 最多一条存活记录。返回嵌入令牌和邮箱的验证链接。
    pub async fn issue(&self, email: &str) -> AppResult<IssuedVerification> {
        debug!(email = %email, "Issuing verification token");

        let token = generate_token();
        let record = VerificationToken::new(
            email,
            hash_token(&token),
            self.clock.now(),
            self.config.token_expires_minutes,
        );

        store_call(self.store_timeout(), self.token_repo.save(&record)).await?;

        let link = format!(
            "{}?token={}&email={}",
            self.config.link_base_url,
            token,
            urlencoding::encode(email)
        );

        info!(
            email = %email,
            expires_at = %record.expires_at,
            "Verification token issued"
        );

        Ok(IssuedVerification {
            token,
            link,
            expires_at: record.expires_at,
        })
    }

    /// 校验令牌
    ///
    /// 过期的记录在检测时即被删除，调用方只能重新申请。
    /// 成功时返回令牌记录，消费（删除）由调用方在验证状态
    /// 翻转成功之后执行。
    pub async fn validate(&self, token: &str, email: &str) -> AppResult<VerificationToken> {
        let record = store_call(self.store_timeout(), self.token_repo.find_by_email(email))
            .await?
            .ok_or_else(|| AppError::from(AuthError::TokenNotFound))?;

        if record.token_hash != hash_token(token) {
            warn!(email = %email, "Verification token mismatch");
            return Err(AuthError::TokenNotFound.into());
        }

        if record.is_expired(self.clock.now()) {
            store_call(self.store_timeout(), self.token_repo.delete_by_email(email)).await?;
            warn!(email = %email, expires_at = %record.expires_at, "Verification token expired");
            return Err(AuthError::TokenExpired.into());
        }

        Ok(record)
    }

    /// 消费令牌（验证状态翻转成功后删除）
    pub async fn consume(&self, email: &str) -> AppResult<()> {
        store_call(self.store_timeout(), self.token_repo.delete_by_email(email)).await?;
        Ok(())
    }
}

/// 生成 32 字节随机令牌（hex 编码）
fn generate_token() -> String {
    let token_bytes: [u8; 32] = rand::thread_rng().r#gen();
    hex::encode(token_bytes)
}

/// 计算令牌的 SHA-256 哈希
fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}
