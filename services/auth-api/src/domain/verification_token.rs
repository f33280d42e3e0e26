//! 邮箱验证令牌实体

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// 邮箱验证令牌
///
/// 按邮箱为键存储，每个邮箱同一时刻最多一条存活记录。
/// 只保存令牌的 SHA-256 哈希，原始令牌不落盘。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationToken {
    /// 邮箱地址（存储键）
    pub email: String,

    /// 令牌哈希
    pub token_hash: String,

    /// 过期时间
    pub expires_at: DateTime<Utc>,

    /// 创建时间
    pub created_at: DateTime<Utc>,
}

impl VerificationToken {
    pub fn new(
        email: impl Into<String>,
        token_hash: String,
        issued_at: DateTime<Utc>,
        expires_in_minutes: i64,
    ) -> Self {
        Self {
            email: email.into(),
            token_hash,
            expires_at: issued_at + Duration::minutes(expires_in_minutes),
            created_at: issued_at,
        }
    }

    /// 检查令牌是否过期（严格早于当前时间）
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }

    /// 获取剩余有效时间（秒）
    pub fn remaining_seconds(&self, now: DateTime<Utc>) -> i64 {
        if now > self.expires_at {
            0
        } else {
            (self.expires_at - now).num_seconds()
        }
    }
}
