mod auth_service_impl;
mod fingerprint;
mod token_service_impl;
mod user_verifier_impl;

pub use auth_service_impl::*;
pub use fingerprint::*;
pub use token_service_impl::*;
pub use user_verifier_impl::*;
