pub mod email;
pub mod password;

pub use email::{Email, EmailError};
pub use password::{HashedPassword, PasswordError};
