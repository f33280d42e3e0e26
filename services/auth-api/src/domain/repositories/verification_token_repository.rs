//! 验证令牌仓储接口
//!
//! 以邮箱为键的存储（TokenStore），每个邮箱最多一条存活记录。

use async_trait::async_trait;
use verigate_errors::AppResult;

use crate::domain::VerificationToken;

#[async_trait]
pub trait VerificationTokenRepository: Send + Sync {
    /// 保存令牌；同一邮箱的旧令牌在同一次存储调用中被覆盖删除
    async fn save(&self, token: &VerificationToken) -> AppResult<()>;

    /// 根据邮箱查找存活令牌
    async fn find_by_email(&self, email: &str) -> AppResult<Option<VerificationToken>>;

    /// 删除邮箱对应的令牌，返回是否确有删除
    async fn delete_by_email(&self, email: &str) -> AppResult<bool>;

    /// 统计邮箱对应的令牌数量
    async fn count_by_email(&self, email: &str) -> AppResult<i64>;
}
