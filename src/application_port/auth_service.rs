use super::AuthError;
use crate::domain_model::{AccessToken, UserId};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Principal {
    pub user_id: UserId,
    pub roles: Vec<String>,
}

/// Accepts access credentials on authenticated calls. Stateless: no store
/// lookup, only signature, expiry and client binding.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    async fn verify(&self, token: &AccessToken, fingerprint: &[u8])
    -> Result<Principal, AuthError>;
}
