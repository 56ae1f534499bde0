use super::Fingerprint;
use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use crate::logger::*;
use chrono::{Duration, Utc};
use std::sync::Arc;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TokenParamsError {
    #[error("access token age must be positive")]
    AccessAge,
    #[error("refresh token age must be positive")]
    RefreshAge,
    #[error("refresh token capacity must be at least 1")]
    RefreshCap,
    #[error("token age is too large to compute an expiry")]
    AgeOverflow,
}

#[derive(Debug, Clone, Copy)]
pub struct TokenParams {
    access_age: Duration,
    refresh_age: Duration,
    refresh_cap: usize,
}

impl TokenParams {
    pub fn try_new(
        access_age_minutes: i64,
        refresh_age_days: i64,
        refresh_cap: usize,
    ) -> Result<Self, TokenParamsError> {
        if access_age_minutes <= 0 {
            return Err(TokenParamsError::AccessAge);
        }
        if refresh_age_days <= 0 {
            return Err(TokenParamsError::RefreshAge);
        }
        if refresh_cap < 1 {
            return Err(TokenParamsError::RefreshCap);
        }

        let access_age =
            Duration::try_minutes(access_age_minutes).ok_or(TokenParamsError::AgeOverflow)?;
        let refresh_age =
            Duration::try_days(refresh_age_days).ok_or(TokenParamsError::AgeOverflow)?;
        let now = Utc::now();
        if now.checked_add_signed(access_age).is_none()
            || now.checked_add_signed(refresh_age).is_none()
        {
            return Err(TokenParamsError::AgeOverflow);
        }

        Ok(TokenParams {
            access_age,
            refresh_age,
            refresh_cap,
        })
    }

    pub fn access_age(&self) -> Duration {
        self.access_age
    }

    pub fn refresh_age(&self) -> Duration {
        self.refresh_age
    }

    pub fn refresh_cap(&self) -> usize {
        self.refresh_cap
    }
}

pub struct RealTokenService {
    token_repo: Arc<dyn TokenRepo>,
    role_repo: Arc<dyn RoleRepo>,
    builder: Arc<dyn CredentialBuilder>,
    params: TokenParams,
}

impl RealTokenService {
    pub fn new(
        token_repo: Arc<dyn TokenRepo>,
        role_repo: Arc<dyn RoleRepo>,
        builder: Arc<dyn CredentialBuilder>,
        params: TokenParams,
    ) -> Self {
        Self {
            token_repo,
            role_repo,
            builder,
            params,
        }
    }

    fn new_record(
        &self,
        user_id: UserId,
        fingerprint: &[u8],
        persistent: bool,
    ) -> Result<RefreshTokenRecord, AuthError> {
        let expires_at = Utc::now()
            .checked_add_signed(self.params.refresh_age)
            .ok_or_else(|| AuthError::InternalError("refresh token expiry overflowed".into()))?;

        Ok(RefreshTokenRecord {
            id: RefreshTokenId::new_v4(),
            expires_at,
            fingerprint: Fingerprint::new(user_id, fingerprint).hash(),
            persistent,
            user_id,
        })
    }

    async fn issue_access_token(&self, record: &RefreshTokenRecord) -> Result<AccessToken, AuthError> {
        let roles: Vec<String> = self
            .role_repo
            .get_by_user(record.user_id)
            .await?
            .into_iter()
            .map(|role| role.title)
            .collect();

        let token = self.builder.build(
            &record.user_id.to_string(),
            self.params.access_age,
            &hex::encode(&record.fingerprint),
            &roles,
        )?;
        Ok(AccessToken(token))
    }

    /// Makes room for one more session. Normally evicts exactly one record;
    /// if concurrent creates overshot the cap, the surplus goes too.
    async fn evict_for_capacity(&self, user_id: UserId) -> Result<(), AuthError> {
        let tokens = self.token_repo.get_by_user(user_id).await?;
        if tokens.len() < self.params.refresh_cap {
            return Ok(());
        }

        let excess = tokens.len() + 1 - self.params.refresh_cap;
        for token in tokens.iter().take(excess) {
            self.token_repo.delete_by_id(token.id).await?;
        }
        debug!(%user_id, evicted = excess, "refresh token capacity reached");
        Ok(())
    }

    async fn find(&self, id: RefreshTokenId) -> Result<RefreshTokenRecord, AuthError> {
        self.token_repo.get_by_id(id).await?.ok_or_else(|| {
            debug!(token_id = %id, "refresh token not found");
            AuthError::TokenIncorrect
        })
    }

    /// Lookup for the operations a client triggers with its refresh token.
    /// The binding is checked before expiry, so a foreign client learns
    /// nothing about the token's state.
    async fn find_bound(
        &self,
        id: RefreshTokenId,
        fingerprint: &[u8],
    ) -> Result<RefreshTokenRecord, AuthError> {
        let record = self.find(id).await?;

        Fingerprint::new(record.user_id, fingerprint)
            .verify(&record.fingerprint)
            .inspect_err(|_| {
                warn!(token_id = %id, user_id = %record.user_id, "refresh token fingerprint mismatch")
            })?;

        if record.is_expired_at(Utc::now()) {
            debug!(token_id = %id, "refresh token expired");
            return Err(AuthError::TokenExpired);
        }

        Ok(record)
    }
}

#[async_trait::async_trait]
impl TokenService for RealTokenService {
    async fn create(
        &self,
        user_id: UserId,
        fingerprint: &[u8],
        persistent: bool,
    ) -> Result<TokenPair, AuthError> {
        self.evict_for_capacity(user_id).await?;

        let record = self.new_record(user_id, fingerprint, persistent)?;
        let refresh_token = self.token_repo.create(record).await?;
        let access_token = self.issue_access_token(&refresh_token).await?;

        info!(%user_id, token_id = %refresh_token.id, persistent, "session created");
        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    async fn refresh(
        &self,
        id: RefreshTokenId,
        fingerprint: &[u8],
    ) -> Result<TokenPair, AuthError> {
        let record = self.find_bound(id, fingerprint).await?;

        let new_record = self.new_record(record.user_id, fingerprint, record.persistent)?;
        let refresh_token = self
            .token_repo
            .rotate(record.id, Utc::now(), new_record)
            .await?
            .ok_or_else(|| {
                // Lost either to a concurrent refresh or to the clock.
                if record.is_expired_at(Utc::now()) {
                    debug!(token_id = %id, "refresh token expired during rotation");
                    AuthError::TokenExpired
                } else {
                    warn!(token_id = %id, "refresh token consumed concurrently");
                    AuthError::TokenIncorrect
                }
            })?;
        let access_token = self.issue_access_token(&refresh_token).await?;

        debug!(user_id = %record.user_id, old = %id, new = %refresh_token.id, "refresh token rotated");
        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    async fn get(&self, id: RefreshTokenId) -> Result<RefreshTokenRecord, AuthError> {
        let record = self.find(id).await?;
        if record.is_expired_at(Utc::now()) {
            return Err(AuthError::TokenExpired);
        }
        Ok(record)
    }

    async fn delete(&self, id: RefreshTokenId, fingerprint: &[u8]) -> Result<(), AuthError> {
        let record = self.find_bound(id, fingerprint).await?;
        self.token_repo.delete_by_id(record.id).await?;

        info!(user_id = %record.user_id, token_id = %id, "session deleted");
        Ok(())
    }

    async fn delete_all(&self, id: RefreshTokenId, fingerprint: &[u8]) -> Result<(), AuthError> {
        let record = self.find_bound(id, fingerprint).await?;
        self.token_repo.delete_by_user(record.user_id).await?;

        info!(user_id = %record.user_id, "all sessions deleted");
        Ok(())
    }
}
