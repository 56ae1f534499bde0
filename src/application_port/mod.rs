mod auth_service;
mod credential;
mod error;
mod token_service;
mod user_verifier;

pub use auth_service::*;
pub use credential::*;
pub use error::*;
pub use token_service::*;
pub use user_verifier::*;
