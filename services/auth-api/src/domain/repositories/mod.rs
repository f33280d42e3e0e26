pub mod user_repository;
pub mod verification_token_repository;

pub use user_repository::UserRepository;
pub use verification_token_repository::VerificationTokenRepository;
