use super::AuthError;
use crate::domain_model::UserId;

#[async_trait::async_trait]
pub trait UserVerifier: Send + Sync {
    /// Fails with `UserNotExist` or `PasswordIncorrect` on bad input.
    async fn verify(&self, name: &str, password: &str) -> Result<UserId, AuthError>;
}

#[async_trait::async_trait]
pub trait CredentialHasher: Send + Sync {
    async fn hash_password(&self, password: &str) -> Result<String, AuthError>;
    async fn verify_password(&self, password: &str, password_hash: &str)
    -> Result<bool, AuthError>;
}
