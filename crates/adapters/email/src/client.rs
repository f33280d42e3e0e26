//! 邮件客户端实现

use crate::EmailSender;
use lettre::message::header;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use secrecy::ExposeSecret;
use std::time::Duration;
use tracing::{debug, info};
use verigate_config::EmailConfig;
use verigate_errors::{AppError, AppResult};

/// 邮件消息
#[derive(Debug, Clone)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub text_body: String,
}

/// SMTP 邮件客户端
pub struct EmailClient {
    config: EmailConfig,
}

impl EmailClient {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    /// 构建 SMTP 传输
    fn build_transport(&self) -> AppResult<SmtpTransport> {
        let credentials = Credentials::new(
            self.config.username.clone(),
            self.config.password.expose_secret().clone(),
        );

        let transport = if self.config.use_tls {
            SmtpTransport::starttls_relay(&self.config.smtp_host)
        } else {
            SmtpTransport::relay(&self.config.smtp_host)
        }
        .map_err(|e| AppError::internal(format!("Failed to create SMTP transport: {}", e)))?
        .port(self.config.smtp_port)
        .credentials(credentials)
        .timeout(Some(Duration::from_secs(self.config.timeout_secs)))
        .build();

        Ok(transport)
    }

    /// 构建邮件消息
    fn build_message(&self, msg: &EmailMessage) -> AppResult<Message> {
        let from = format!("{} <{}>", self.config.from_name, self.config.from_email)
            .parse()
            .map_err(|e| AppError::internal(format!("Invalid from address: {}", e)))?;

        let to = msg
            .to
            .parse()
            .map_err(|e| AppError::validation(format!("Invalid to address: {}", e)))?;

        Message::builder()
            .from(from)
            .to(to)
            .subject(&msg.subject)
            .header(header::ContentType::TEXT_PLAIN)
            .body(msg.text_body.clone())
            .map_err(|e| AppError::internal(format!("Failed to build message: {}", e)))
    }

    /// 发送邮件
    async fn send_message(&self, message: Message) -> AppResult<()> {
        let transport = self.build_transport()?;

        // 在 tokio 的 blocking 线程池中执行同步操作
        tokio::task::spawn_blocking(move || {
            transport
                .send(&message)
                .map_err(|e| AppError::external_service(format!("Failed to send email: {}", e)))
        })
        .await
        .map_err(|e| AppError::internal(format!("Task join error: {}", e)))??;

        Ok(())
    }
}

#[async_trait::async_trait]
impl EmailSender for EmailClient {
    async fn send_text_email(&self, to: &str, subject: &str, body: &str) -> AppResult<()> {
        debug!(to = %to, subject = %subject, "Sending text email");

        let msg = EmailMessage {
            to: to.to_string(),
            subject: subject.to_string(),
            text_body: body.to_string(),
        };

        let message = self.build_message(&msg)?;
        self.send_message(message).await?;

        info!(to = %to, subject = %subject, "Text email sent successfully");
        Ok(())
    }
}
