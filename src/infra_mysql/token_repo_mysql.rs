use super::util::{store_err, uuid_from_bytes};
use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use chrono::{DateTime, Utc};
use sqlx::mysql::MySqlRow;
use sqlx::{MySqlPool, Row};

pub struct MySqlTokenRepo {
    pool: MySqlPool,
}

impl MySqlTokenRepo {
    pub fn new(pool: MySqlPool) -> Self {
        MySqlTokenRepo { pool }
    }

    fn row_to_record(row: MySqlRow) -> Result<RefreshTokenRecord, AuthError> {
        let id: Vec<u8> = row.try_get("id").map_err(store_err)?;
        let expires_at: DateTime<Utc> = row.try_get("expires_at").map_err(store_err)?;
        let fingerprint: Vec<u8> = row.try_get("fingerprint").map_err(store_err)?;
        let persistent: bool = row.try_get("is_persistent").map_err(store_err)?;
        let user_id: Vec<u8> = row.try_get("user_id").map_err(store_err)?;

        Ok(RefreshTokenRecord {
            id: RefreshTokenId(uuid_from_bytes(&id)?),
            expires_at,
            fingerprint,
            persistent,
            user_id: UserId(uuid_from_bytes(&user_id)?),
        })
    }
}

const INSERT_TOKEN: &str = r#"
INSERT INTO refresh_token (id, expires_at, fingerprint, is_persistent, user_id)
VALUES (?, ?, ?, ?, ?)
"#;

// Same boundary as `RefreshTokenRecord::is_expired_at`: a record expiring
// exactly at `now` is still live.
const DELETE_LIVE_TOKEN: &str = "DELETE FROM refresh_token WHERE id = ? AND expires_at >= ?";

#[async_trait::async_trait]
impl TokenRepo for MySqlTokenRepo {
    async fn create(&self, record: RefreshTokenRecord) -> Result<RefreshTokenRecord, AuthError> {
        sqlx::query(INSERT_TOKEN)
            .bind(record.id.0.as_bytes().as_slice())
            .bind(record.expires_at)
            .bind(record.fingerprint.as_slice())
            .bind(record.persistent)
            .bind(record.user_id.as_bytes())
            .execute(&self.pool)
            .await
            .map_err(store_err)?;

        Ok(record)
    }

    async fn get_by_id(
        &self,
        id: RefreshTokenId,
    ) -> Result<Option<RefreshTokenRecord>, AuthError> {
        let row_opt: Option<MySqlRow> = sqlx::query(
            r#"
SELECT id, expires_at, fingerprint, is_persistent, user_id
FROM refresh_token
WHERE id = ?
"#,
        )
        .bind(id.0.as_bytes().as_slice())
        .fetch_optional(&self.pool)
        .await
        .map_err(store_err)?;

        row_opt.map(Self::row_to_record).transpose()
    }

    async fn get_by_user(&self, user_id: UserId) -> Result<Vec<RefreshTokenRecord>, AuthError> {
        let rows: Vec<MySqlRow> = sqlx::query(
            r#"
SELECT id, expires_at, fingerprint, is_persistent, user_id
FROM refresh_token
WHERE user_id = ?
ORDER BY expires_at ASC
"#,
        )
        .bind(user_id.as_bytes())
        .fetch_all(&self.pool)
        .await
        .map_err(store_err)?;

        rows.into_iter().map(Self::row_to_record).collect()
    }

    async fn delete_by_id(&self, id: RefreshTokenId) -> Result<(), AuthError> {
        sqlx::query("DELETE FROM refresh_token WHERE id = ?")
            .bind(id.0.as_bytes().as_slice())
            .execute(&self.pool)
            .await
            .map_err(store_err)?;
        Ok(())
    }

    async fn delete_by_user(&self, user_id: UserId) -> Result<(), AuthError> {
        sqlx::query("DELETE FROM refresh_token WHERE user_id = ?")
            .bind(user_id.as_bytes())
            .execute(&self.pool)
            .await
            .map_err(store_err)?;
        Ok(())
    }

    async fn rotate(
        &self,
        old_id: RefreshTokenId,
        now: DateTime<Utc>,
        new: RefreshTokenRecord,
    ) -> Result<Option<RefreshTokenRecord>, AuthError> {
        let mut tx = self.pool.begin().await.map_err(store_err)?;

        // The row lock taken by DELETE serializes concurrent refreshes of the
        // same token; the loser sees zero affected rows.
        let deleted = sqlx::query(DELETE_LIVE_TOKEN)
            .bind(old_id.0.as_bytes().as_slice())
            .bind(now)
            .execute(&mut *tx)
            .await
            .map_err(store_err)?
            .rows_affected();

        if deleted != 1 {
            tx.rollback().await.map_err(store_err)?;
            return Ok(None);
        }

        sqlx::query(INSERT_TOKEN)
            .bind(new.id.0.as_bytes().as_slice())
            .bind(new.expires_at)
            .bind(new.fingerprint.as_slice())
            .bind(new.persistent)
            .bind(new.user_id.as_bytes())
            .execute(&mut *tx)
            .await
            .map_err(store_err)?;

        tx.commit().await.map_err(store_err)?;
        Ok(Some(new))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use sqlx::MySqlPool;

    fn record(user_id: UserId, expires_in: Duration) -> RefreshTokenRecord {
        RefreshTokenRecord {
            id: RefreshTokenId::new_v4(),
            // DATETIME(6) keeps microseconds only.
            expires_at: DateTime::from_timestamp_micros((Utc::now() + expires_in).timestamp_micros())
                .unwrap(),
            fingerprint: vec![7; 32],
            persistent: true,
            user_id,
        }
    }

    /// Needs a scratch database: `AUTHGATE_TEST_DSN=mysql://... cargo test -- --ignored`.
    async fn scratch_repo() -> (MySqlTokenRepo, UserId) {
        let dsn = std::env::var("AUTHGATE_TEST_DSN").unwrap();
        let pool = MySqlPool::connect(&dsn).await.unwrap();
        sqlx::raw_sql(include_str!("../../sql/schema.sql"))
            .execute(&pool)
            .await
            .unwrap();

        let user_id = UserId(uuid::Uuid::new_v4());
        sqlx::query("INSERT INTO user (user_id, name, password_hash) VALUES (?, ?, ?)")
            .bind(user_id.as_bytes())
            .bind(format!("rotate-{}", user_id))
            .bind("unused")
            .execute(&pool)
            .await
            .unwrap();

        (MySqlTokenRepo::new(pool), user_id)
    }

    #[tokio::test]
    #[ignore]
    async fn rotate_consumes_once() {
        let (repo, user_id) = scratch_repo().await;
        let old = repo.create(record(user_id, Duration::days(1))).await.unwrap();

        let first = repo
            .rotate(old.id, Utc::now(), record(user_id, Duration::days(1)))
            .await
            .unwrap()
            .unwrap();
        let second = repo
            .rotate(old.id, Utc::now(), record(user_id, Duration::days(1)))
            .await
            .unwrap();

        assert!(second.is_none());
        assert_eq!(repo.get_by_id(old.id).await.unwrap(), None);
        assert_eq!(repo.get_by_id(first.id).await.unwrap(), Some(first));
        repo.delete_by_user(user_id).await.unwrap();
    }

    #[tokio::test]
    #[ignore]
    async fn rotate_keeps_expired_record_and_inserts_nothing() {
        let (repo, user_id) = scratch_repo().await;
        let old = repo.create(record(user_id, Duration::minutes(-1))).await.unwrap();
        let new = record(user_id, Duration::days(1));

        let rotated = repo.rotate(old.id, Utc::now(), new.clone()).await.unwrap();

        assert!(rotated.is_none());
        assert_eq!(repo.get_by_id(old.id).await.unwrap(), Some(old));
        assert_eq!(repo.get_by_id(new.id).await.unwrap(), None);
        repo.delete_by_user(user_id).await.unwrap();
    }

    #[tokio::test]
    #[ignore]
    async fn rotate_at_exact_expiry_succeeds() {
        let (repo, user_id) = scratch_repo().await;
        let old = repo.create(record(user_id, Duration::days(1))).await.unwrap();
        assert!(!old.is_expired_at(old.expires_at));

        let rotated = repo
            .rotate(old.id, old.expires_at, record(user_id, Duration::days(1)))
            .await
            .unwrap();

        assert!(rotated.is_some());
        repo.delete_by_user(user_id).await.unwrap();
    }
}
