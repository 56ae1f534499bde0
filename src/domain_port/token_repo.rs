use crate::application_port::*;
use crate::domain_model::*;
use chrono::{DateTime, Utc};

#[async_trait::async_trait]
pub trait TokenRepo: Send + Sync {
    async fn create(&self, record: RefreshTokenRecord) -> Result<RefreshTokenRecord, AuthError>;

    async fn get_by_id(&self, id: RefreshTokenId)
    -> Result<Option<RefreshTokenRecord>, AuthError>;

    /// All records owned by the user, soonest-to-expire first.
    async fn get_by_user(&self, user_id: UserId) -> Result<Vec<RefreshTokenRecord>, AuthError>;

    async fn delete_by_id(&self, id: RefreshTokenId) -> Result<(), AuthError>;

    async fn delete_by_user(&self, user_id: UserId) -> Result<(), AuthError>;

    /// Deletes `old_id` if it still exists and has not expired at `now`, and
    /// inserts `new` in the same unit of work. Returns `None` and inserts
    /// nothing when `old_id` was already gone or had expired by `now`.
    async fn rotate(
        &self,
        old_id: RefreshTokenId,
        now: DateTime<Utc>,
        new: RefreshTokenRecord,
    ) -> Result<Option<RefreshTokenRecord>, AuthError>;
}
