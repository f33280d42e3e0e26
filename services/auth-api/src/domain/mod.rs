pub mod repositories;
pub mod services;
pub mod user;
pub mod value_objects;
pub mod verification_token;

pub use user::User;
pub use verification_token::VerificationToken;
