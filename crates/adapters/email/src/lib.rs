//! Email 适配器
//!
//! 邮件投递出口。核心只负责生成验证链接，投递本身走这里。

mod client;

pub use client::{EmailClient, EmailMessage};

use verigate_errors::AppResult;

/// 邮件发送接口
#[async_trait::async_trait]
pub trait EmailSender: Send + Sync {
    /// 发送纯文本邮件
    async fn send_text_email(&self, to: &str, subject: &str, body: &str) -> AppResult<()>;
}
