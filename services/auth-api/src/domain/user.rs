//! 用户实体

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use verigate_common::UserId;

use crate::domain::value_objects::{Email, HashedPassword};

/// 用户实体
///
/// `verified_at` 只在验证成功时被设置一次，核心从不删除用户。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub password_hash: HashedPassword,
    pub verified_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(
        name: impl Into<String>,
        email: Email,
        password_hash: HashedPassword,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: UserId::new(),
            name: name.into(),
            email,
            password_hash,
            verified_at: None,
            created_at,
        }
    }

    /// 是否已完成邮箱验证
    pub fn is_verified(&self) -> bool {
        self.verified_at.is_some()
    }

    /// 标记为已验证（终态，不可回退）
    pub fn mark_verified(&mut self, at: DateTime<Utc>) {
        if self.verified_at.is_none() {
            self.verified_at = Some(at);
        }
    }

    pub fn update_password(&mut self, password_hash: HashedPassword) {
        self.password_hash = password_hash;
    }
}
