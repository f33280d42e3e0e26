//! 服务错误定义

use thiserror::Error;
use verigate_errors::AppError;

use crate::domain::value_objects::EmailError;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Your email is not verified. Please verify your email before logging in.")]
    EmailNotVerified,

    #[error("Email is already verified")]
    AlreadyVerified,

    #[error("User not found")]
    UserNotFound,

    #[error("A user with this email already exists")]
    DuplicateEmail,

    #[error("Invalid verification token")]
    TokenNotFound,

    #[error("Verification token has expired")]
    TokenExpired,

    #[error("Store did not respond in time")]
    StoreUnavailable,

    #[error("An error occurred while updating verification status")]
    VerificationFailed,
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => AppError::unauthorized(err.to_string()),
            AuthError::EmailNotVerified => AppError::forbidden(err.to_string()),
            AuthError::AlreadyVerified => AppError::validation(err.to_string()),
            AuthError::UserNotFound => AppError::not_found(err.to_string()),
            AuthError::DuplicateEmail => AppError::conflict(err.to_string()),
            AuthError::TokenNotFound => AppError::validation(err.to_string()),
            AuthError::TokenExpired => AppError::validation(err.to_string()),
            AuthError::StoreUnavailable => AppError::unavailable(err.to_string()),
            AuthError::VerificationFailed => AppError::internal(err.to_string()),
        }
    }
}

impl From<EmailError> for AppError {
    fn from(error: EmailError) -> Self {
        AppError::validation(error.to_string())
    }
}
