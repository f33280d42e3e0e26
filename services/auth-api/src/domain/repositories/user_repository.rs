//! 用户 Repository trait

use async_trait::async_trait;
use verigate_common::UserId;
use verigate_errors::AppResult;

use crate::domain::User;
use crate::domain::value_objects::Email;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// 保存新用户，邮箱已存在则返回 Conflict
    async fn save(&self, user: &User) -> AppResult<()>;

    /// 更新用户
    async fn update(&self, user: &User) -> AppResult<()>;

    /// 根据 ID 查找用户
    async fn find_by_id(&self, id: &UserId) -> AppResult<Option<User>>;

    /// 根据邮箱查找用户
    async fn find_by_email(&self, email: &Email) -> AppResult<Option<User>>;

    /// 检查邮箱是否存在
    async fn exists_by_email(&self, email: &Email) -> AppResult<bool>;
}
