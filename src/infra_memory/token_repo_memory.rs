use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use chrono::{DateTime, Utc};
use dashmap::DashMap;

#[derive(Default)]
pub struct MemoryTokenRepo {
    tokens: DashMap<RefreshTokenId, RefreshTokenRecord>,
}

impl MemoryTokenRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[async_trait::async_trait]
impl TokenRepo for MemoryTokenRepo {
    async fn create(&self, record: RefreshTokenRecord) -> Result<RefreshTokenRecord, AuthError> {
        self.tokens.insert(record.id, record.clone());
        Ok(record)
    }

    async fn get_by_id(
        &self,
        id: RefreshTokenId,
    ) -> Result<Option<RefreshTokenRecord>, AuthError> {
        Ok(self.tokens.get(&id).map(|entry| entry.value().clone()))
    }

    async fn get_by_user(&self, user_id: UserId) -> Result<Vec<RefreshTokenRecord>, AuthError> {
        let mut records: Vec<RefreshTokenRecord> = self
            .tokens
            .iter()
            .filter(|entry| entry.value().user_id == user_id)
            .map(|entry| entry.value().clone())
            .collect();
        records.sort_by_key(|record| record.expires_at);
        Ok(records)
    }

    async fn delete_by_id(&self, id: RefreshTokenId) -> Result<(), AuthError> {
        self.tokens.remove(&id);
        Ok(())
    }

    async fn delete_by_user(&self, user_id: UserId) -> Result<(), AuthError> {
        self.tokens.retain(|_, record| record.user_id != user_id);
        Ok(())
    }

    async fn rotate(
        &self,
        old_id: RefreshTokenId,
        now: DateTime<Utc>,
        new: RefreshTokenRecord,
    ) -> Result<Option<RefreshTokenRecord>, AuthError> {
        // remove_if holds the shard lock, so only one caller can win.
        let removed = self
            .tokens
            .remove_if(&old_id, |_, record| !record.is_expired_at(now));
        if removed.is_none() {
            return Ok(None);
        }

        self.tokens.insert(new.id, new.clone());
        Ok(Some(new))
    }
}
