use super::AuthError;
use crate::domain_model::{RefreshTokenId, RefreshTokenRecord, TokenPair, UserId};

/// Token lifecycle: issue, rotate and revoke access/refresh pairs bound to a
/// client signal.
#[async_trait::async_trait]
pub trait TokenService: Send + Sync {
    /// Starts a new session for an already authenticated user.
    async fn create(
        &self,
        user_id: UserId,
        fingerprint: &[u8],
        persistent: bool,
    ) -> Result<TokenPair, AuthError>;

    /// Consumes a refresh token and issues a new pair. Not idempotent.
    async fn refresh(&self, id: RefreshTokenId, fingerprint: &[u8])
    -> Result<TokenPair, AuthError>;

    async fn get(&self, id: RefreshTokenId) -> Result<RefreshTokenRecord, AuthError>;

    /// Logout of one session.
    async fn delete(&self, id: RefreshTokenId, fingerprint: &[u8]) -> Result<(), AuthError>;

    /// Logout of every session of the token's owner.
    async fn delete_all(&self, id: RefreshTokenId, fingerprint: &[u8]) -> Result<(), AuthError>;
}
