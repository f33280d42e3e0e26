pub mod auth_service;
pub mod password_service;
pub mod verification_token_service;

pub use auth_service::AuthService;
pub use password_service::PasswordService;
pub use verification_token_service::{IssuedVerification, VerificationTokenService};

use std::future::Future;
use std::time::Duration;

use verigate_errors::AppResult;

use crate::error::AuthError;

/// 给存储调用加超时，超时映射为 StoreUnavailable 而不是悬挂
pub(crate) async fn store_call<T>(
    timeout: Duration,
    fut: impl Future<Output = AppResult<T>>,
) -> AppResult<T> {
    match tokio::time::timeout(timeout, fut).await {
        Ok(result) => result,
        Err(_) => Err(AuthError::StoreUnavailable.into()),
    }
}
